//! Generic hashed table: open-chained buckets in the head, record or
//! slab elements in the body.

use parking_lot::Mutex;

use error::{ErrorKind, Result};
use link::{is_terminal, Link, Linkage, TERMINAL};
use primitives::head::HashHead;
use primitives::iterator::ElementIter;
use primitives::manager::{ElementSize, Manager};
use serial::{Reader, Writer};
use storage::Storage;

/// Hashed table over a head/body storage pair.
///
/// Duplicate keys are permitted; within a bucket the chain is insertion
/// order newest-first, so `first` returns the latest element for a key.
#[derive(Debug)]
pub struct HashMap {
	head: HashHead,
	body: Manager,
	// Serializes the allocate -> write -> link sequence of a put.
	write_lock: Mutex<()>,
}

impl HashMap {
	pub fn new(
		head_storage: Storage,
		body_storage: Storage,
		buckets: u64,
		link: Linkage,
		key_size: usize,
		element: ElementSize,
	) -> HashMap {
		HashMap {
			head: HashHead::new(head_storage, link, buckets),
			body: Manager::new(body_storage, link, key_size, element),
			write_lock: Mutex::new(()),
		}
	}

	pub fn create(&self) -> Result<()> {
		self.head.head().create()
	}

	pub fn open(&self) -> Result<()> {
		self.head.head().open()?;
		self.restore()
	}

	pub fn verify(&self) -> Result<()> {
		self.head.head().verify()?;
		if !self.body.aligned() || self.body.fault().is_some() {
			bail!(ErrorKind::InvalidRecord("body"));
		}
		Ok(())
	}

	/// Truncate the body back to the extent recorded in the head.
	pub fn restore(&self) -> Result<()> {
		self.body.truncate(self.head.head().get_body_count()?)
	}

	/// Flush the body, then publish the logical extent into the head.
	pub fn close(&self) -> Result<()> {
		self.body.flush()?;
		self.head.head().set_body_count(self.body.count())?;
		self.head.head().flush()
	}

	/// Snapshot the logical extent without tearing anything down.
	pub fn backup(&self) -> Result<()> {
		self.close()
	}

	pub fn enabled(&self) -> bool {
		self.head.head().buckets() > 0 && self.body.aligned()
	}

	pub fn buckets(&self) -> u64 {
		self.head.head().buckets()
	}

	/// Logical element count (records) or byte extent (slabs).
	pub fn count(&self) -> u64 {
		self.body.count()
	}

	pub fn body_size(&self) -> u64 {
		self.body.body_size()
	}

	pub fn key_size(&self) -> usize {
		self.body.key_size()
	}

	fn check_key(&self, key: &[u8]) -> Result<()> {
		if key.len() != self.body.key_size() {
			bail!(ErrorKind::InvalidKeyLen(self.body.key_size(), key.len()));
		}
		Ok(())
	}

	fn check_payload(&self, payload: &[u8]) -> Result<()> {
		if let ElementSize::Record(size) = self.body.element() {
			if payload.len() != size {
				bail!(ErrorKind::InvalidRecord("record payload width"));
			}
		}
		Ok(())
	}

	/// An iterator over every element matching `key`.
	pub fn it(&self, key: &[u8]) -> Result<ElementIter> {
		self.check_key(key)?;
		let bucket = self.head.index(key);
		let top = self.head.top(key)?;
		Ok(ElementIter::new(&self.body, top, key.to_vec(), bucket))
	}

	/// The link of the most recent element for `key`; terminal when
	/// absent.
	pub fn first(&self, key: &[u8]) -> Result<Link> {
		let mut it = self.it(key)?;
		Ok(it.advance()?.unwrap_or(TERMINAL))
	}

	pub fn exists(&self, key: &[u8]) -> Result<bool> {
		Ok(!is_terminal(self.first(key)?))
	}

	/// Head link of a bucket by index.
	pub fn top(&self, bucket: u64) -> Result<Link> {
		self.head.head().top(bucket)
	}

	/// Head link of the bucket selected by `key`.
	pub fn at(&self, key: &[u8]) -> Result<Link> {
		self.check_key(key)?;
		self.head.top(key)
	}

	/// Reserve `chunks` records (or bytes) ahead of a multi-phase write.
	pub fn allocate(&self, chunks: u64) -> Result<Link> {
		self.body.allocate(chunks)
	}

	fn element(&self, next: Link, key: &[u8], payload: &[u8]) -> Result<Vec<u8>> {
		let mut writer =
			Writer::with_capacity(self.body.link().size() + key.len() + payload.len());
		self.body.link().write(&mut writer, next)?;
		writer.write_bytes(key);
		writer.write_bytes(payload);
		Ok(writer.into_vec())
	}

	/// Write an element at a pre-allocated link without linking it into
	/// the head. `commit` publishes it.
	pub fn set(&self, link: Link, key: &[u8], payload: &[u8]) -> Result<()> {
		self.check_key(key)?;
		self.check_payload(payload)?;
		let element = self.element(TERMINAL, key, payload)?;
		self.body.set(link, &element)
	}

	/// Link a previously `set` element into its bucket chain.
	pub fn commit(&self, link: Link, key: &[u8]) -> Result<()> {
		self.check_key(key)?;
		let _guard = self.write_lock.lock();
		let bucket = self.head.index(key);
		let top = self.head.head().top(bucket)?;
		// The element's next field is rewritten first so a reader never
		// follows a published head into an unwritten chain.
		let mut writer = Writer::with_capacity(self.body.link().size());
		self.body.link().write(&mut writer, top)?;
		self.body.set(link, &writer.into_vec())?;
		self.head.head().set_top(bucket, link)
	}

	/// Allocate, write and link an element in one step, returning its
	/// link.
	pub fn put(&self, key: &[u8], payload: &[u8]) -> Result<Link> {
		self.check_key(key)?;
		self.check_payload(payload)?;

		let _guard = self.write_lock.lock();
		let chunks = match self.body.element() {
			ElementSize::Record(_) => 1,
			ElementSize::Slab =>
				(self.body.link().size() + key.len() + payload.len()) as u64,
		};
		let link = self.body.allocate(chunks)?;
		let bucket = self.head.index(key);
		let top = self.head.head().top(bucket)?;
		let element = self.element(top, key, payload)?;
		self.body.set(link, &element)?;
		self.head.head().set_top(bucket, link)?;
		Ok(link)
	}

	/// Read an element's payload through `f`, positioned past the
	/// `next` field and key. `None` for terminal or unallocated links.
	pub fn read<T, F>(&self, link: Link, f: F) -> Result<Option<T>>
	where
		F: FnOnce(&mut Reader) -> Result<T>,
	{
		let accessor = match self.body.get(link) {
			Some(accessor) => accessor,
			None => return Ok(None),
		};
		let mut reader = Reader::new(accessor.as_slice());
		self.body.link().read(&mut reader)?;
		reader.read_bytes(self.body.key_size())?;
		f(&mut reader).map(Some)
	}

	/// The key stored at `link`.
	pub fn get_key(&self, link: Link) -> Result<Option<Vec<u8>>> {
		let accessor = match self.body.get(link) {
			Some(accessor) => accessor,
			None => return Ok(None),
		};
		let mut reader = Reader::new(accessor.as_slice());
		self.body.link().read(&mut reader)?;
		Ok(Some(reader.read_bytes(self.body.key_size())?.to_vec()))
	}
}
