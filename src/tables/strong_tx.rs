//! Transaction-to-block strength markers.
//!
//! Hashed records keyed by the transaction link (as little-endian key
//! bytes). The payload is the claiming block link with its top bit
//! carrying the positive/negative marker, so a reorganization appends a
//! negative marker rather than rewriting history. Newest-first chain
//! order makes the most recent marker win.

use error::{ErrorKind, Result};
use link::{Link, Linkage};
use primitives::hashmap::HashMap;
use primitives::manager::ElementSize;
use serial::Writer;
use storage::Storage;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrongRecord {
	pub header_fk: Link,
	pub positive: bool,
}

#[derive(Debug)]
pub struct StrongTxTable {
	map: HashMap,
	tx_link: Linkage,
	header_link: Linkage,
}

impl StrongTxTable {
	pub fn new(head: Storage, body: Storage, buckets: u64, link: Linkage,
		tx_link: Linkage, header_link: Linkage) -> StrongTxTable
	{
		StrongTxTable {
			map: HashMap::new(head, body, buckets, link, tx_link.size(),
				ElementSize::Record(header_link.size())),
			tx_link,
			header_link,
		}
	}

	lifecycle!(map);

	pub fn buckets(&self) -> u64 {
		self.map.buckets()
	}

	fn key(&self, tx_fk: Link) -> Vec<u8> {
		let mut writer = Writer::with_capacity(self.tx_link.size());
		writer.write_uint(tx_fk, self.tx_link.size());
		writer.into_vec()
	}

	fn marker_bit(&self) -> u64 {
		1 << (8 * self.header_link.size() - 1)
	}

	/// Append a marker for `tx_fk`.
	pub fn put(&self, tx_fk: Link, record: &StrongRecord) -> Result<Link> {
		let bit = self.marker_bit();
		if record.header_fk >= bit {
			bail!(ErrorKind::LinkWidth(self.header_link.size(), record.header_fk));
		}
		let raw = record.header_fk | if record.positive { bit } else { 0 };
		let mut writer = Writer::with_capacity(self.header_link.size());
		writer.write_uint(raw, self.header_link.size());
		self.map.put(&self.key(tx_fk), &writer.into_vec())
	}

	/// The most recent marker for `tx_fk`.
	pub fn get(&self, tx_fk: Link) -> Result<Option<StrongRecord>> {
		let first = self.map.first(&self.key(tx_fk))?;
		let bit = self.marker_bit();
		let width = self.header_link.size();
		self.map.read(first, |reader| {
			let raw = reader.read_uint(width)?;
			Ok(StrongRecord {
				header_fk: raw & (bit - 1),
				positive: raw & bit != 0,
			})
		})
	}
}
