//! Height-indexed header stack (candidate and confirmed chains).
//!
//! A record array where the record number is the height: pushing
//! appends the next height, popping truncates the top. Two instances
//! exist, one per chain state.

use error::{ErrorKind, Result};
use link::{Link, Linkage, TERMINAL};
use primitives::manager::ElementSize;
use primitives::nomap::NoMap;
use serial::Writer;
use storage::Storage;

#[derive(Debug)]
pub struct HeightTable {
	map: NoMap,
	header_link: Linkage,
}

impl HeightTable {
	pub fn new(head: Storage, body: Storage, link: Linkage, header_link: Linkage) -> HeightTable {
		HeightTable {
			map: NoMap::new(head, body, link, ElementSize::Record(header_link.size())),
			header_link,
		}
	}

	lifecycle!(map);

	/// Append `header_fk` at the next height.
	pub fn push(&self, header_fk: Link) -> Result<u64> {
		if !self.header_link.fits(header_fk) {
			bail!(ErrorKind::LinkWidth(self.header_link.size(), header_fk));
		}
		let mut writer = Writer::with_capacity(self.header_link.size());
		self.header_link.write(&mut writer, header_fk)?;
		self.map.put(&writer.into_vec())
	}

	/// Remove and return the top entry.
	pub fn pop(&self) -> Result<Link> {
		let count = self.map.count();
		if count == 0 {
			bail!(ErrorKind::TruncateBeyondExtent(0, 0));
		}
		let top = self.at(count - 1)?;
		self.map.truncate(count - 1)?;
		Ok(top)
	}

	/// The header link at `height`; terminal past the top.
	pub fn at(&self, height: u64) -> Result<Link> {
		let header_link = self.header_link;
		Ok(self.map
			.read(height, |reader| header_link.read(reader))?
			.unwrap_or(TERMINAL))
	}

	/// The top height, if any entry exists.
	pub fn top(&self) -> Option<u64> {
		let count = self.map.count();
		if count == 0 {
			None
		} else {
			Some(count - 1)
		}
	}

	/// True when `height` can be addressed by this index.
	pub fn addressable(&self, height: u64) -> bool {
		self.map.addressable(height)
	}
}
