//! Block header archive table.
//!
//! Hashed records keyed by block hash. Wire fields keep their on-wire
//! little-endian order; the parent is a link into this same table so
//! ancestry walks never touch the hash index.

use chain::Hash;
use error::Result;
use link::{Link, Linkage};
use primitives::hashmap::HashMap;
use primitives::manager::ElementSize;
use serial::Writer;
use storage::Storage;
use tables::context::{Context, CONTEXT_SIZE};

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderRecord {
	pub context: Context,
	pub milestone: bool,
	pub parent_fk: Link,
	pub version: u32,
	pub timestamp: u32,
	pub bits: u32,
	pub nonce: u32,
	pub merkle_root: Hash,
}

#[derive(Debug)]
pub struct HeaderTable {
	map: HashMap,
	link: Linkage,
}

impl HeaderTable {
	const KEY_SIZE: usize = 32;

	pub fn new(head: Storage, body: Storage, buckets: u64, link: Linkage) -> HeaderTable {
		let payload = CONTEXT_SIZE + 1 + link.size() + 4 + 4 + 4 + 4 + 32;
		HeaderTable {
			map: HashMap::new(head, body, buckets, link, Self::KEY_SIZE,
				ElementSize::Record(payload)),
			link,
		}
	}

	lifecycle!(map);

	pub fn buckets(&self) -> u64 {
		self.map.buckets()
	}

	pub fn put(&self, hash: &Hash, record: &HeaderRecord) -> Result<Link> {
		let mut writer = Writer::new();
		record.context.write(&mut writer);
		writer.write_u8(record.milestone as u8);
		self.link.write(&mut writer, record.parent_fk)?;
		writer.write_u32(record.version);
		writer.write_u32(record.timestamp);
		writer.write_u32(record.bits);
		writer.write_u32(record.nonce);
		writer.write_bytes(&record.merkle_root);
		self.map.put(hash, &writer.into_vec())
	}

	pub fn get(&self, link: Link) -> Result<Option<HeaderRecord>> {
		let linkage = self.link;
		self.map.read(link, |reader| {
			Ok(HeaderRecord {
				context: Context::read(reader)?,
				milestone: reader.read_u8()? != 0,
				parent_fk: linkage.read(reader)?,
				version: reader.read_u32()?,
				timestamp: reader.read_u32()?,
				bits: reader.read_u32()?,
				nonce: reader.read_u32()?,
				merkle_root: reader.read_hash()?,
			})
		})
	}

	/// Height field alone; avoids materializing the whole record.
	pub fn get_height(&self, link: Link) -> Result<Option<u32>> {
		self.map.read(link, |reader| {
			reader.read_u32()?;
			Ok(reader.read_uint(3)? as u32)
		})
	}

	/// Block hash to header link; terminal when absent.
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
