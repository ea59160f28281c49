//! Transaction archive table.
//!
//! Hashed records keyed by the witness-stripped transaction hash. The
//! record points at the transaction's output run in the puts table;
//! the input run immediately precedes it, so `ins_fk` is derived
//! rather than stored.

use chain::Hash;
use error::Result;
use link::{Link, Linkage};
use primitives::hashmap::HashMap;
use primitives::manager::ElementSize;
use serial::Writer;
use storage::Storage;

#[derive(Debug, Clone, PartialEq)]
pub struct TxRecord {
	pub coinbase: bool,
	/// Witness-stripped wire size; 24-bit field.
	pub witless_size: u32,
	/// Witness wire size; 24-bit field.
	pub witness_size: u32,
	pub locktime: u32,
	pub version: u32,
	pub ins_count: u32,
	pub outs_count: u32,
	/// First record of the output run in the puts table.
	pub outs_fk: Link,
}

impl TxRecord {
	/// First record of the input run: inputs precede outputs.
	pub fn ins_fk(&self) -> Link {
		self.outs_fk - self.ins_count as u64
	}
}

#[derive(Debug)]
pub struct TxTable {
	map: HashMap,
	puts_link: Linkage,
}

impl TxTable {
	const KEY_SIZE: usize = 32;

	pub fn new(head: Storage, body: Storage, buckets: u64, link: Linkage,
		puts_link: Linkage) -> TxTable
	{
		let payload = 1 + 3 + 3 + 4 + 4 + 3 + 3 + puts_link.size();
		TxTable {
			map: HashMap::new(head, body, buckets, link, Self::KEY_SIZE,
				ElementSize::Record(payload)),
			puts_link,
		}
	}

	lifecycle!(map);

	pub fn buckets(&self) -> u64 {
		self.map.buckets()
	}

	fn payload(&self, record: &TxRecord) -> Result<Vec<u8>> {
		let mut writer = Writer::new();
		writer.write_u8(record.coinbase as u8);
		writer.write_uint((record.witless_size & 0x00ff_ffff) as u64, 3);
		writer.write_uint((record.witness_size & 0x00ff_ffff) as u64, 3);
		writer.write_u32(record.locktime);
		writer.write_u32(record.version);
		writer.write_uint((record.ins_count & 0x00ff_ffff) as u64, 3);
		writer.write_uint((record.outs_count & 0x00ff_ffff) as u64, 3);
		self.puts_link.write(&mut writer, record.outs_fk)?;
		Ok(writer.into_vec())
	}

	pub fn put(&self, hash: &Hash, record: &TxRecord) -> Result<Link> {
		let payload = self.payload(record)?;
		self.map.put(hash, &payload)
	}

	/// Reserve a record link ahead of a multi-phase insert.
	pub fn allocate(&self) -> Result<Link> {
		self.map.allocate(1)
	}

	/// Write a record at a reserved link without publishing it.
	pub fn set(&self, link: Link, hash: &Hash, record: &TxRecord) -> Result<()> {
		let payload = self.payload(record)?;
		self.map.set(link, hash, &payload)
	}

	/// Publish a previously `set` record into its bucket chain.
	pub fn commit(&self, link: Link, hash: &Hash) -> Result<()> {
		self.map.commit(link, hash)
	}

	pub fn get(&self, link: Link) -> Result<Option<TxRecord>> {
		let puts_link = self.puts_link;
		self.map.read(link, |reader| {
			Ok(TxRecord {
				coinbase: reader.read_u8()? != 0,
				witless_size: reader.read_uint(3)? as u32,
				witness_size: reader.read_uint(3)? as u32,
				locktime: reader.read_u32()?,
				version: reader.read_u32()?,
				ins_count: reader.read_uint(3)? as u32,
				outs_count: reader.read_uint(3)? as u32,
				outs_fk: puts_link.read(reader)?,
			})
		})
	}

	/// Coinbase flag alone.
	pub fn get_coinbase(&self, link: Link) -> Result<Option<bool>> {
		self.map.read(link, |reader| Ok(reader.read_u8()? != 0))
	}

	pub fn first(&self, hash: &Hash) -> Result<Link> {
		self.map.first(hash)
	}

	pub fn exists(&self, hash: &Hash) -> Result<bool> {
		self.map.exists(hash)
	}

	pub fn get_key(&self, link: Link) -> Result<Option<Hash>> {
		Ok(self.map.get_key(link)?.map(|key| {
			let mut hash = [0u8; 32];
			hash.copy_from_slice(&key);
			hash
		}))
	}
}

#[cfg(test)]
mod tests {
	extern crate tempdir;

	use super::{TxRecord, TxTable};
	use link::Linkage;
	use storage::Storage;

	fn table(temp: &tempdir::TempDir) -> TxTable {
		let head = Storage::create(temp.path().join("tx.head"), 0, 50).unwrap();
		let body = Storage::create(temp.path().join("tx.body"), 0, 50).unwrap();
		let table = TxTable::new(head, body, 16, Linkage::new(4), Linkage::new(5));
		table.create().unwrap();
		table
	}

	fn record() -> TxRecord {
		TxRecord {
			coinbase: true,
			witless_size: 0x341201,
			witness_size: 0x341202,
			locktime: 0x56341203,
			version: 0x56341204,
			ins_count: 2,
			outs_count: 3,
			outs_fk: 7,
		}
	}

	#[test]
	fn test_put_get_roundtrip() {
		let temp = tempdir::TempDir::new("table_tx").unwrap();
		let table = table(&temp);
		let hash = [0x11u8; 32];

		let link = table.put(&hash, &record()).unwrap();
		assert_eq!(table.get(link).unwrap().unwrap(), record());
		assert_eq!(table.get_coinbase(link).unwrap().unwrap(), true);
		assert_eq!(table.first(&hash).unwrap(), link);
		assert_eq!(table.get_key(link).unwrap().unwrap(), hash);
	}

	#[test]
	fn test_input_run_precedes_outputs() {
		let record = record();
		assert_eq!(record.ins_fk(), 5);
	}
}
