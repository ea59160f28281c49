//! Optional compact-filter header cache.
//!
//! Array-indexed records keyed by header link: the filter header chain
//! value and the filter hash for that block.

use chain::Hash;
use error::Result;
use link::{Link, Linkage};
use primitives::arraymap::ArrayMap;
use primitives::manager::ElementSize;
use serial::Writer;
use storage::Storage;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterBkRecord {
	pub head: Hash,
	pub hash: Hash,
}

#[derive(Debug)]
pub struct FilterBkTable {
	map: ArrayMap,
}

impl FilterBkTable {
	pub fn new(head: Storage, body: Storage, buckets: u64, link: Linkage) -> FilterBkTable {
		FilterBkTable {
			map: ArrayMap::new(head, body, buckets, link, ElementSize::Record(64)),
		}
	}

	lifecycle!(map);

	pub fn buckets(&self) -> u64 {
		self.map.buckets()
	}

	pub fn put(&self, header_fk: Link, record: &FilterBkRecord) -> Result<Link> {
		let mut writer = Writer::with_capacity(64);
		writer.write_bytes(&record.head);
		writer.write_bytes(&record.hash);
		self.map.put(header_fk, &writer.into_vec())
	}

	pub fn get(&self, header_fk: Link) -> Result<Option<FilterBkRecord>> {
		self.map.read_at(header_fk, |reader| {
			Ok(FilterBkRecord {
				head: reader.read_hash()?,
				hash: reader.read_hash()?,
			})
		})
	}
}
