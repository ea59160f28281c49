//! Optional compact-filter body cache.
//!
//! Array-indexed slabs keyed by header link holding the block's filter
//! bytes.

use error::Result;
use link::{Link, Linkage};
use primitives::arraymap::ArrayMap;
use primitives::manager::ElementSize;
use serial::Writer;
use storage::Storage;

#[derive(Debug)]
pub struct FilterTxTable {
	map: ArrayMap,
}

impl FilterTxTable {
	pub fn new(head: Storage, body: Storage, buckets: u64, link: Linkage) -> FilterTxTable {
		FilterTxTable {
			map: ArrayMap::new(head, body, buckets, link, ElementSize::Slab),
		}
	}

	lifecycle!(map);

	pub fn buckets(&self) -> u64 {
		self.map.buckets()
	}

	pub fn put(&self, header_fk: Link, filter: &[u8]) -> Result<Link> {
		let mut writer = Writer::new();
		writer.write_varbytes(filter);
		self.map.put(header_fk, &writer.into_vec())
	}

	pub fn get(&self, header_fk: Link) -> Result<Option<Vec<u8>>> {
		self.map.read_at(header_fk, |reader| {
			Ok(reader.read_varbytes()?.to_vec())
		})
	}
}
