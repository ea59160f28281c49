//! Per-transaction input/output listing.
//!
//! A record array whose records are single links into the input or
//! output slab tables. A transaction's inputs occupy one contiguous run
//! immediately followed by its outputs, so the transaction record needs
//! only the output start and the two counts. A spend is addressed by
//! its record number here.

use error::Result;
use link::{Link, Linkage};
use primitives::manager::ElementSize;
use primitives::nomap::NoMap;
use serial::Writer;
use storage::Storage;

#[derive(Debug)]
pub struct PutsTable {
	map: NoMap,
	put_link: Linkage,
}

impl PutsTable {
	pub fn new(head: Storage, body: Storage, link: Linkage, put_link: Linkage) -> PutsTable {
		PutsTable {
			map: NoMap::new(head, body, link, ElementSize::Record(put_link.size())),
			put_link,
		}
	}

	lifecycle!(map);

	/// Append a run of put links, returning the first record number.
	pub fn put(&self, links: &[Link]) -> Result<Link> {
		let first = self.map.allocate(links.len() as u64)?;
		for (index, &value) in links.iter().enumerate() {
			let mut writer = Writer::with_capacity(self.put_link.size());
			self.put_link.write(&mut writer, value)?;
			self.map.set(first + index as u64, &writer.into_vec())?;
		}
		Ok(first)
	}

	/// The input/output slab link stored at record `link`.
	pub fn get(&self, link: Link) -> Result<Option<Link>> {
		let put_link = self.put_link;
		self.map.read(link, |reader| put_link.read(reader))
	}

	/// The `count` slab links starting at record `first`.
	pub fn get_run(&self, first: Link, count: u64) -> Result<Option<Vec<Link>>> {
		let mut run = Vec::with_capacity(count as usize);
		for index in 0..count {
			match self.get(first + index)? {
				Some(value) => run.push(value),
				None => return Ok(None),
			}
		}
		Ok(Some(run))
	}
}
