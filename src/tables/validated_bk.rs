//! Block validation state cache.
//!
//! Hashed slabs keyed by header link: a result code byte and the block
//! fee as a compact-size integer. Revalidation chains a fresh slab;
//! the newest entry wins.

use error::{Code, ErrorKind, Result};
use link::{Link, Linkage};
use primitives::hashmap::HashMap;
use primitives::manager::ElementSize;
use serial::Writer;
use storage::Storage;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedBkRecord {
	pub code: Code,
	pub fees: u64,
}

#[derive(Debug)]
pub struct ValidatedBkTable {
	map: HashMap,
	header_link: Linkage,
}

impl ValidatedBkTable {
	pub fn new(head: Storage, body: Storage, buckets: u64, link: Linkage,
		header_link: Linkage) -> ValidatedBkTable
	{
		ValidatedBkTable {
			map: HashMap::new(head, body, buckets, link, header_link.size(),
				ElementSize::Slab),
			header_link,
		}
	}

	lifecycle!(map);

	pub fn buckets(&self) -> u64 {
		self.map.buckets()
	}

	fn key(&self, header_fk: Link) -> Vec<u8> {
		let mut writer = Writer::with_capacity(self.header_link.size());
		writer.write_uint(header_fk, self.header_link.size());
		writer.into_vec()
	}

	pub fn put(&self, header_fk: Link, record: &ValidatedBkRecord) -> Result<Link> {
		let mut writer = Writer::new();
		writer.write_u8(record.code as u8);
		writer.write_varint(record.fees);
		self.map.put(&self.key(header_fk), &writer.into_vec())
	}

	/// The most recent validation state for `header_fk`.
	pub fn get(&self, header_fk: Link) -> Result<Option<ValidatedBkRecord>> {
		let first = self.map.first(&self.key(header_fk))?;
		self.map.read(first, |reader| {
			let byte = reader.read_u8()?;
			let code = Code::from_u8(byte)
				.ok_or_else(|| ErrorKind::InvalidRecord("validated_bk"))?;
			Ok(ValidatedBkRecord {
				code,
				fees: reader.read_varint()?,
			})
		})
	}
}
