//! Block-to-transactions association.
//!
//! Array-indexed slabs keyed by header link: an ordered list of
//! transaction links plus the block's wire size. Re-association after
//! a reorganization chains a fresh slab; the newest entry wins.

use error::Result;
use link::{Link, Linkage};
use primitives::arraymap::ArrayMap;
use primitives::manager::ElementSize;
use serial::Writer;
use storage::Storage;

#[derive(Debug, Clone, PartialEq)]
pub struct TxsRecord {
	/// Block wire size; 24-bit field.
	pub wire_size: u32,
	pub tx_fks: Vec<Link>,
}

#[derive(Debug)]
pub struct TxsTable {
	map: ArrayMap,
	tx_link: Linkage,
}

impl TxsTable {
	pub fn new(head: Storage, body: Storage, buckets: u64, link: Linkage,
		tx_link: Linkage) -> TxsTable
	{
		TxsTable {
			map: ArrayMap::new(head, body, buckets, link, ElementSize::Slab),
			tx_link,
		}
	}

	lifecycle!(map);

	pub fn buckets(&self) -> u64 {
		self.map.buckets()
	}

	pub fn put(&self, header_fk: Link, record: &TxsRecord) -> Result<Link> {
		let mut writer = Writer::new();
		writer.write_uint(record.tx_fks.len() as u64 & 0x00ff_ffff, 3);
		writer.write_uint((record.wire_size & 0x00ff_ffff) as u64, 3);
		for &tx_fk in &record.tx_fks {
			self.tx_link.write(&mut writer, tx_fk)?;
		}
		self.map.put(header_fk, &writer.into_vec())
	}

	pub fn get(&self, header_fk: Link) -> Result<Option<TxsRecord>> {
		let tx_link = self.tx_link;
		self.map.read_at(header_fk, |reader| {
			let count = reader.read_uint(3)?;
			let wire_size = reader.read_uint(3)? as u32;
			let mut tx_fks = Vec::with_capacity(count as usize);
			for _ in 0..count {
				tx_fks.push(tx_link.read(reader)?);
			}
			Ok(TxsRecord { wire_size, tx_fks })
		})
	}

	pub fn exists(&self, header_fk: Link) -> Result<bool> {
		self.map.exists(header_fk)
	}

	/// Transaction count without materializing the link list.
	pub fn get_count(&self, header_fk: Link) -> Result<Option<u64>> {
		self.map.read_at(header_fk, |reader| reader.read_uint(3))
	}
}
