//! Store lifecycle: table ownership, sentinel locks and recovery.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use fs2::FileExt;
use hex_slice::AsHex;
use parking_lot::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tiny_keccak::sha3_256;

use chain::Hash;
use error::{ErrorKind, Result};
use query::Query;
use serial::{Reader, Writer};
use settings::{InternalSettings, Settings};
use storage::Storage;
use tables::address::AddressTable;
use tables::filter_bk::FilterBkTable;
use tables::filter_tx::FilterTxTable;
use tables::header::HeaderTable;
use tables::height::HeightTable;
use tables::input::InputTable;
use tables::output::OutputTable;
use tables::point::PointTable;
use tables::prevout::PrevoutTable;
use tables::puts::PutsTable;
use tables::strong_tx::StrongTxTable;
use tables::transaction::TxTable;
use tables::txs::TxsTable;
use tables::validated_bk::ValidatedBkTable;
use tables::validated_tx::ValidatedTxTable;

const FLUSH_LOCK: &str = "flush_lock";
const EXCLUSIVE_LOCK: &str = "exclusive_lock";
const PROCESS_LOCK: &str = "process_lock";
const BACKUP_MANIFEST: &str = "backup";

const CHECKSUM_SIZE: usize = 32;

/// Lifecycle notification kinds passed to the event handler.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
	Create,
	Open,
	Close,
	Backup,
	Restore,
}

/// Identifies the table an event refers to.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TableId {
	Header,
	Point,
	Input,
	Output,
	Puts,
	Tx,
	Txs,
	Candidate,
	Confirmed,
	StrongTx,
	Prevout,
	ValidatedBk,
	ValidatedTx,
	Address,
	FilterBk,
	FilterTx,
}

macro_rules! each_table {
	($self_:ident, $handler:ident, $event:expr, $method:ident) => {{
		$handler($event, TableId::Header);
		$self_.header.$method()?;
		$handler($event, TableId::Point);
		$self_.point.$method()?;
		$handler($event, TableId::Input);
		$self_.input.$method()?;
		$handler($event, TableId::Output);
		$self_.output.$method()?;
		$handler($event, TableId::Puts);
		$self_.puts.$method()?;
		$handler($event, TableId::Tx);
		$self_.tx.$method()?;
		$handler($event, TableId::Txs);
		$self_.txs.$method()?;
		$handler($event, TableId::Candidate);
		$self_.candidate.$method()?;
		$handler($event, TableId::Confirmed);
		$self_.confirmed.$method()?;
		$handler($event, TableId::StrongTx);
		$self_.strong_tx.$method()?;
		$handler($event, TableId::Prevout);
		$self_.prevout.$method()?;
		$handler($event, TableId::ValidatedBk);
		$self_.validated_bk.$method()?;
		$handler($event, TableId::ValidatedTx);
		$self_.validated_tx.$method()?;
		if let Some(ref table) = $self_.address {
			$handler($event, TableId::Address);
			table.$method()?;
		}
		if let Some(ref table) = $self_.filter_bk {
			$handler($event, TableId::FilterBk);
			table.$method()?;
		}
		if let Some(ref table) = $self_.filter_tx {
			$handler($event, TableId::FilterTx);
			table.$method()?;
		}
	}}
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
	Create,
	Open,
}

/// The set of archive tables plus lifecycle state.
///
/// A store owns every table and sequences their create/open/close. A
/// single process owns a database instance: the exclusive sentinel is
/// held for the store's lifetime, and the flush sentinel is present
/// whenever the store is open, forcing explicit recovery after a crash.
#[derive(Debug)]
pub struct Store {
	pub(crate) settings: InternalSettings,
	pub(crate) header: HeaderTable,
	pub(crate) point: PointTable,
	pub(crate) input: InputTable,
	pub(crate) output: OutputTable,
	pub(crate) puts: PutsTable,
	pub(crate) tx: TxTable,
	pub(crate) txs: TxsTable,
	pub(crate) candidate: HeightTable,
	pub(crate) confirmed: HeightTable,
	pub(crate) strong_tx: StrongTxTable,
	pub(crate) prevout: PrevoutTable,
	pub(crate) validated_bk: ValidatedBkTable,
	pub(crate) validated_tx: ValidatedTxTable,
	pub(crate) address: Option<AddressTable>,
	pub(crate) filter_bk: Option<FilterBkTable>,
	pub(crate) filter_tx: Option<FilterTxTable>,
	// Guards compound multi-table operations in the query layer.
	write_lock: RwLock<()>,
	// Confirmed-interval merkle subroots; rebuilt on demand.
	pub(crate) interval_cache: Mutex<BTreeMap<u64, Hash>>,
	path: PathBuf,
	exclusive_file: File,
}

impl Store {
	fn acquire_exclusive<P: AsRef<Path>>(path: P) -> Result<File> {
		let lock_path = path.as_ref().join(EXCLUSIVE_LOCK);
		let lock_file = fs::OpenOptions::new()
			.write(true)
			.create(true)
			.open(&lock_path)?;
		lock_file.try_lock_exclusive()
			.map_err(|_| ErrorKind::DatabaseLocked(lock_path))?;
		Ok(lock_file)
	}

	fn write_process_lock<P: AsRef<Path>>(path: P) -> Result<()> {
		let mut file = fs::OpenOptions::new()
			.write(true)
			.create(true)
			.truncate(true)
			.open(path.as_ref().join(PROCESS_LOCK))?;
		writeln!(file, "{}", process::id())?;
		Ok(())
	}

	fn storage_pair(path: &Path, name: &str, reserve: u64, growth: u64, mode: Mode)
		-> Result<(Storage, Storage)>
	{
		let head_path = path.join(format!("{}.head", name));
		let body_path = path.join(format!("{}.body", name));
		match mode {
			Mode::Create => Ok((
				Storage::create(head_path, 0, growth)?,
				Storage::create(body_path, reserve, growth)?,
			)),
			Mode::Open => Ok((
				Storage::open(head_path, growth)?,
				Storage::open(body_path, growth)?,
			)),
		}
	}

	fn assemble(settings: InternalSettings, path: PathBuf, exclusive_file: File, mode: Mode)
		-> Result<Store>
	{
		let growth = settings.external.file_growth_rate as u64;
		let external = &settings.external;

		let (head, body) = Self::storage_pair(&path, "header", external.header_size, growth, mode)?;
		let header = HeaderTable::new(head, body, external.header_buckets, settings.header_link);

		let (head, body) = Self::storage_pair(&path, "point", external.point_size, growth, mode)?;
		let point = PointTable::new(head, body, external.point_buckets, settings.point_link);

		let (head, body) = Self::storage_pair(&path, "input", external.input_size, growth, mode)?;
		let input = InputTable::new(
			head, body, settings.input_link, settings.tx_link, settings.point_link);

		let (head, body) = Self::storage_pair(&path, "output", external.output_size, growth, mode)?;
		let output = OutputTable::new(head, body, settings.output_link, settings.tx_link);

		let (head, body) = Self::storage_pair(&path, "puts", external.puts_size, growth, mode)?;
		let puts = PutsTable::new(head, body, settings.puts_link, settings.puts_link);

		let (head, body) = Self::storage_pair(&path, "tx", external.tx_size, growth, mode)?;
		let tx = TxTable::new(head, body, external.tx_buckets, settings.tx_link, settings.puts_link);

		let (head, body) = Self::storage_pair(&path, "txs", external.txs_size, growth, mode)?;
		let txs = TxsTable::new(head, body, external.txs_buckets, settings.txs_link, settings.tx_link);

		let (head, body) = Self::storage_pair(&path, "candidate", external.candidate_size, growth, mode)?;
		let candidate = HeightTable::new(head, body, settings.height_link, settings.header_link);

		let (head, body) = Self::storage_pair(&path, "confirmed", external.confirmed_size, growth, mode)?;
		let confirmed = HeightTable::new(head, body, settings.height_link, settings.header_link);

		let (head, body) = Self::storage_pair(&path, "strong_tx", external.strong_tx_size, growth, mode)?;
		let strong_tx = StrongTxTable::new(head, body, external.strong_tx_buckets,
			settings.strong_tx_link, settings.tx_link, settings.header_link);

		let (head, body) = Self::storage_pair(&path, "prevout", external.prevout_size, growth, mode)?;
		let prevout = PrevoutTable::new(head, body, external.prevout_buckets,
			settings.prevout_link, settings.output_link);

		let (head, body) = Self::storage_pair(&path, "validated_bk", external.validated_bk_size, growth, mode)?;
		let validated_bk = ValidatedBkTable::new(head, body, external.validated_bk_buckets,
			settings.validated_bk_link, settings.header_link);

		let (head, body) = Self::storage_pair(&path, "validated_tx", external.validated_tx_size, growth, mode)?;
		let validated_tx = ValidatedTxTable::new(head, body, external.validated_tx_buckets,
			settings.validated_tx_link, settings.tx_link);

		let address = if settings.address_buckets() > 0 {
			let (head, body) = Self::storage_pair(&path, "address", external.address_size, growth, mode)?;
			Some(AddressTable::new(head, body, settings.address_buckets(),
				settings.address_link, settings.output_link))
		} else {
			None
		};

		let (filter_bk, filter_tx) = if settings.neutrino_buckets() > 0 {
			let (head, body) = Self::storage_pair(&path, "filter_bk", external.filter_bk_size, growth, mode)?;
			let bk = FilterBkTable::new(head, body, settings.neutrino_buckets(),
				settings.filter_bk_link);
			let (head, body) = Self::storage_pair(&path, "filter_tx", external.filter_tx_size, growth, mode)?;
			let tx = FilterTxTable::new(head, body, settings.neutrino_buckets(),
				settings.filter_tx_link);
			(Some(bk), Some(tx))
		} else {
			(None, None)
		};

		Ok(Store {
			settings,
			header,
			point,
			input,
			output,
			puts,
			tx,
			txs,
			candidate,
			confirmed,
			strong_tx,
			prevout,
			validated_bk,
			validated_tx,
			address,
			filter_bk,
			filter_tx,
			write_lock: RwLock::new(()),
			interval_cache: Mutex::new(BTreeMap::new()),
			path,
			exclusive_file,
		})
	}

	fn flush_lock_path(&self) -> PathBuf {
		self.path.join(FLUSH_LOCK)
	}

	fn set_flush_lock(path: &Path) -> Result<()> {
		fs::OpenOptions::new()
			.write(true)
			.create(true)
			.open(path.join(FLUSH_LOCK))?;
		Ok(())
	}

	/// Creates a new database at `settings.path`.
	pub fn create<F>(settings: Settings, mut handler: F) -> Result<Store>
	where
		F: FnMut(Event, TableId),
	{
		let settings = InternalSettings::from_external(settings)?;
		let path = settings.external.path.clone();
		fs::create_dir_all(&path)?;

		let exclusive_file = Self::acquire_exclusive(&path)?;
		Self::write_process_lock(&path)?;
		Self::set_flush_lock(&path)?;

		let store = Self::assemble(settings, path, exclusive_file, Mode::Create)?;
		each_table!(store, handler, Event::Create, create);
		Ok(store)
	}

	/// Opens an existing database.
	///
	/// Fails with `DirtyShutdown` when the flush sentinel is still
	/// present; a crashed writer leaves it behind and `restore` is the
	/// only way forward.
	pub fn open<F>(settings: Settings, mut handler: F) -> Result<Store>
	where
		F: FnMut(Event, TableId),
	{
		let settings = InternalSettings::from_external(settings)?;
		let path = settings.external.path.clone();

		let exclusive_file = Self::acquire_exclusive(&path)?;
		let flush_lock = path.join(FLUSH_LOCK);
		if flush_lock.exists() {
			bail!(ErrorKind::DirtyShutdown(flush_lock));
		}

		Self::write_process_lock(&path)?;
		Self::set_flush_lock(&path)?;

		let store = Self::assemble(settings, path, exclusive_file, Mode::Open)?;
		each_table!(store, handler, Event::Open, open);
		Ok(store)
	}

	/// Recovers a database that was not closed cleanly.
	///
	/// Every table's body is truncated back to the extent recorded in
	/// its head; when a backup manifest is present its checksum and
	/// extents are verified first.
	pub fn restore<F>(settings: Settings, mut handler: F) -> Result<Store>
	where
		F: FnMut(Event, TableId),
	{
		let settings = InternalSettings::from_external(settings)?;
		let path = settings.external.path.clone();

		let exclusive_file = Self::acquire_exclusive(&path)?;
		Self::write_process_lock(&path)?;
		Self::set_flush_lock(&path)?;

		let store = Self::assemble(settings, path, exclusive_file, Mode::Open)?;
		each_table!(store, handler, Event::Restore, open);
		store.verify_manifest()?;
		Ok(store)
	}

	/// Closes every table cleanly and releases the flush sentinel.
	pub fn close<F>(&self, mut handler: F) -> Result<()>
	where
		F: FnMut(Event, TableId),
	{
		each_table!(self, handler, Event::Close, close);
		fs::remove_file(self.flush_lock_path())?;
		Ok(())
	}

	/// Publishes every table's extent and writes the checksummed backup
	/// manifest.
	pub fn backup<F>(&self, mut handler: F) -> Result<()>
	where
		F: FnMut(Event, TableId),
	{
		each_table!(self, handler, Event::Backup, backup);
		self.write_manifest()
	}

	/// Checks every table's head extent and body alignment.
	pub fn verify(&self) -> Result<()> {
		let mut handler = |_: Event, _: TableId| {};
		each_table!(self, handler, Event::Open, verify);

		let enabled = self.header.enabled() && self.point.enabled()
			&& self.input.enabled() && self.output.enabled()
			&& self.puts.enabled() && self.tx.enabled() && self.txs.enabled()
			&& self.candidate.enabled() && self.confirmed.enabled()
			&& self.strong_tx.enabled() && self.prevout.enabled()
			&& self.validated_bk.enabled() && self.validated_tx.enabled();
		if !enabled {
			bail!(ErrorKind::InvalidRecord("store"));
		}
		Ok(())
	}

	fn extents(&self) -> Vec<u64> {
		vec![
			self.header.count(),
			self.point.count(),
			self.input.count(),
			self.output.count(),
			self.puts.count(),
			self.tx.count(),
			self.txs.count(),
			self.candidate.count(),
			self.confirmed.count(),
			self.strong_tx.count(),
			self.prevout.count(),
			self.validated_bk.count(),
			self.validated_tx.count(),
			self.address.as_ref().map_or(0, |table| table.count()),
			self.filter_bk.as_ref().map_or(0, |table| table.count()),
			self.filter_tx.as_ref().map_or(0, |table| table.count()),
		]
	}

	fn write_manifest(&self) -> Result<()> {
		let mut writer = Writer::new();
		for extent in self.extents() {
			writer.write_u64(extent);
		}
		let payload = writer.into_vec();
		let checksum = sha3_256(&payload);

		let mut file = fs::OpenOptions::new()
			.write(true)
			.create(true)
			.truncate(true)
			.open(self.path.join(BACKUP_MANIFEST))?;
		file.write_all(&checksum)?;
		file.write_all(&payload)?;
		file.flush()?;
		Ok(())
	}

	fn verify_manifest(&self) -> Result<()> {
		let manifest_path = self.path.join(BACKUP_MANIFEST);
		if !manifest_path.exists() {
			return Ok(());
		}

		let mut data = Vec::new();
		File::open(&manifest_path)?.read_to_end(&mut data)?;
		if data.len() < CHECKSUM_SIZE {
			bail!(ErrorKind::CorruptedBackup(manifest_path, "Manifest too short.".into()));
		}

		let (checksum, payload) = data.split_at(CHECKSUM_SIZE);
		let hash = sha3_256(payload);
		if hash != checksum {
			bail!(ErrorKind::CorruptedBackup(
				manifest_path,
				format!("Expected: {:02x}, Got: {:02x}", hash.as_hex(), checksum.as_hex())
			));
		}

		let mut reader = Reader::new(payload);
		for (index, live) in self.extents().into_iter().enumerate() {
			let recorded = reader.read_u64()?;
			if recorded != live {
				bail!(ErrorKind::CorruptedBackup(
					manifest_path,
					format!("Table {} extent {} does not match recorded {}.",
						index, live, recorded)
				));
			}
		}
		Ok(())
	}

	/// A typed view over the archive.
	pub fn query(&self) -> Query {
		Query::new(self)
	}

	pub(crate) fn read_guard(&self) -> RwLockReadGuard<()> {
		self.write_lock.read()
	}

	pub(crate) fn write_guard(&self) -> RwLockWriteGuard<()> {
		self.write_lock.write()
	}

	/// Publish extents on every table when `flush_writes` is set.
	pub(crate) fn maybe_flush(&self) -> Result<()> {
		if !self.settings.external.flush_writes {
			return Ok(());
		}
		let mut handler = |_: Event, _: TableId| {};
		each_table!(self, handler, Event::Backup, backup);
		Ok(())
	}
}

impl Drop for Store {
	fn drop(&mut self) {
		let _ = self.exclusive_file.unlock();
	}
}
