//! Spend metadata cache.
//!
//! Array-indexed records keyed by spend link (the input's record number
//! in the puts table): the spent output's link, its coinbase flag and
//! the height of the block that claimed its parent transaction. Written
//! through on block association; readers fall back to the archive walk
//! when a row is absent.

use error::Result;
use link::{Link, Linkage};
use primitives::arraymap::ArrayMap;
use primitives::manager::ElementSize;
use serial::Writer;
use storage::Storage;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrevoutRecord {
	pub coinbase: bool,
	pub parent_height: u32,
	pub output_fk: Link,
}

#[derive(Debug)]
pub struct PrevoutTable {
	map: ArrayMap,
	output_link: Linkage,
}

impl PrevoutTable {
	pub fn new(head: Storage, body: Storage, buckets: u64, link: Linkage,
		output_link: Linkage) -> PrevoutTable
	{
		PrevoutTable {
			map: ArrayMap::new(head, body, buckets, link,
				ElementSize::Record(1 + 4 + output_link.size())),
			output_link,
		}
	}

	lifecycle!(map);

	pub fn buckets(&self) -> u64 {
		self.map.buckets()
	}

	pub fn put(&self, spend_fk: Link, record: &PrevoutRecord) -> Result<Link> {
		let mut writer = Writer::new();
		writer.write_u8(record.coinbase as u8);
		writer.write_u32(record.parent_height);
		self.output_link.write(&mut writer, record.output_fk)?;
		self.map.put(spend_fk, &writer.into_vec())
	}

	/// The most recent cached row for `spend_fk`.
	pub fn get(&self, spend_fk: Link) -> Result<Option<PrevoutRecord>> {
		let output_link = self.output_link;
		self.map.read_at(spend_fk, |reader| {
			Ok(PrevoutRecord {
				coinbase: reader.read_u8()? != 0,
				parent_height: reader.read_u32()?,
				output_fk: output_link.read(reader)?,
			})
		})
	}
}
