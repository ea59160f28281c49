//! Output slab archive.
//!
//! Append-only slabs addressed by body byte offset: parent transaction
//! link, compact-size value, lock script.

use error::Result;
use link::{Link, Linkage};
use primitives::manager::ElementSize;
use primitives::nomap::NoMap;
use serial::Writer;
use storage::Storage;

#[derive(Debug, Clone, PartialEq)]
pub struct OutputRecord {
	pub parent_fk: Link,
	pub value: u64,
	pub script: Vec<u8>,
}

#[derive(Debug)]
pub struct OutputTable {
	map: NoMap,
	tx_link: Linkage,
}

impl OutputTable {
	pub fn new(head: Storage, body: Storage, link: Linkage, tx_link: Linkage) -> OutputTable {
		OutputTable {
			map: NoMap::new(head, body, link, ElementSize::Slab),
			tx_link,
		}
	}

	lifecycle!(map);

	/// Grow physical headroom for `bytes` of upcoming slabs.
	pub fn reserve(&self, bytes: u64) -> Result<()> {
		self.map.reserve(bytes)
	}

	pub fn put(&self, record: &OutputRecord) -> Result<Link> {
		let mut writer = Writer::new();
		self.tx_link.write(&mut writer, record.parent_fk)?;
		writer.write_varint(record.value);
		writer.write_varbytes(&record.script);
		self.map.put(&writer.into_vec())
	}

	pub fn get(&self, link: Link) -> Result<Option<OutputRecord>> {
		let tx_link = self.tx_link;
		self.map.read(link, |reader| {
			Ok(OutputRecord {
				parent_fk: tx_link.read(reader)?,
				value: reader.read_varint()?,
				script: reader.read_varbytes()?.to_vec(),
			})
		})
	}

	/// Parent transaction link alone.
	pub fn get_parent(&self, link: Link) -> Result<Option<Link>> {
		let tx_link = self.tx_link;
		self.map.read(link, |reader| tx_link.read(reader))
	}
}
