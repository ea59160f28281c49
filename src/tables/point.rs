//! Prevout point hash index.
//!
//! Hashed records whose key is the whole payload: a transaction hash
//! referenced by some input. Link zero is reserved for the null hash,
//! written at store initialization, so null points resolve without a
//! lookup.

use chain::Hash;
use error::Result;
use link::{is_terminal, Link, Linkage};
use primitives::hashmap::HashMap;
use primitives::manager::ElementSize;
use storage::Storage;

#[derive(Debug)]
pub struct PointTable {
	map: HashMap,
}

impl PointTable {
	const KEY_SIZE: usize = 32;

	pub fn new(head: Storage, body: Storage, buckets: u64, link: Linkage) -> PointTable {
		PointTable {
			map: HashMap::new(head, body, buckets, link, Self::KEY_SIZE, ElementSize::Record(0)),
		}
	}

	lifecycle!(map);

	pub fn buckets(&self) -> u64 {
		self.map.buckets()
	}

	/// Insert the hash unless present, returning its link either way.
	pub fn put_if_absent(&self, hash: &Hash) -> Result<Link> {
		let existing = self.map.first(hash)?;
		if !is_terminal(existing) {
			return Ok(existing);
		}
		self.map.put(hash, &[])
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
