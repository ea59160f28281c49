//! Input slab archive.
//!
//! Append-only slabs addressed by body byte offset. Each slab carries
//! its parent transaction link, the spent point (as a point-table link
//! plus output index), the sequence, and the variable script and
//! witness stack. Slabs are self-delimiting, so the whole body can be
//! scanned without an index; the spend-graph queries rely on that.

use error::Result;
use link::{Link, Linkage};
use primitives::manager::ElementSize;
use primitives::nomap::NoMap;
use serial::{Reader, Writer};
use storage::Storage;

/// Output index stored for null points.
pub const NULL_POINT_INDEX: u32 = 0xffff_ffff;

#[derive(Debug, Clone, PartialEq)]
pub struct InputRecord {
	pub parent_fk: Link,
	pub point_fk: Link,
	pub point_index: u32,
	pub sequence: u32,
	pub script: Vec<u8>,
	pub witness: Vec<Vec<u8>>,
}

impl InputRecord {
	pub fn is_null_point(&self) -> bool {
		self.point_index == NULL_POINT_INDEX && self.point_fk == 0
	}
}

#[derive(Debug)]
pub struct InputTable {
	map: NoMap,
	tx_link: Linkage,
	point_link: Linkage,
}

impl InputTable {
	pub fn new(head: Storage, body: Storage, link: Linkage, tx_link: Linkage,
		point_link: Linkage) -> InputTable
	{
		InputTable {
			map: NoMap::new(head, body, link, ElementSize::Slab),
			tx_link,
			point_link,
		}
	}

	lifecycle!(map);

	/// Grow physical headroom for `bytes` of upcoming slabs.
	pub fn reserve(&self, bytes: u64) -> Result<()> {
		self.map.reserve(bytes)
	}

	pub fn put(&self, record: &InputRecord) -> Result<Link> {
		let mut writer = Writer::new();
		self.tx_link.write(&mut writer, record.parent_fk)?;
		self.point_link.write(&mut writer, record.point_fk)?;
		writer.write_u32(record.point_index);
		writer.write_u32(record.sequence);
		writer.write_varbytes(&record.script);
		writer.write_varint(record.witness.len() as u64);
		for item in &record.witness {
			writer.write_varbytes(item);
		}
		self.map.put(&writer.into_vec())
	}

	fn read_record(&self, reader: &mut Reader) -> Result<InputRecord> {
		let parent_fk = self.tx_link.read(reader)?;
		let point_fk = self.point_link.read(reader)?;
		let point_index = reader.read_u32()?;
		let sequence = reader.read_u32()?;
		let script = reader.read_varbytes()?.to_vec();
		let count = reader.read_varint()? as usize;
		let mut witness = Vec::with_capacity(count);
		for _ in 0..count {
			witness.push(reader.read_varbytes()?.to_vec());
		}
		Ok(InputRecord { parent_fk, point_fk, point_index, sequence, script, witness })
	}

	pub fn get(&self, link: Link) -> Result<Option<InputRecord>> {
		self.map.read(link, |reader| self.read_record(reader))
	}

	/// Walk every slab in insertion order, stopping early when `f`
	/// returns false.
	pub fn scan<F>(&self, mut f: F) -> Result<()>
	where
		F: FnMut(Link, &InputRecord) -> Result<bool>,
	{
		let extent = self.map.count();
		let mut link = 0u64;
		while link < extent {
			let (record, consumed) = match self.map.read(link, |reader| {
				let record = self.read_record(reader)?;
				Ok((record, reader.offset() as u64))
			})? {
				Some(read) => read,
				None => break,
			};
			if !f(link, &record)? {
				break;
			}
			link += consumed;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	extern crate tempdir;

	use super::{InputRecord, InputTable, NULL_POINT_INDEX};
	use link::Linkage;
	use storage::Storage;

	fn table(temp: &tempdir::TempDir) -> InputTable {
		let head = Storage::create(temp.path().join("input.head"), 0, 50).unwrap();
		let body = Storage::create(temp.path().join("input.body"), 0, 50).unwrap();
		let table = InputTable::new(head, body, Linkage::new(5), Linkage::new(4), Linkage::new(4));
		table.create().unwrap();
		table
	}

	fn record(point_fk: u64, point_index: u32) -> InputRecord {
		InputRecord {
			parent_fk: 1,
			point_fk,
			point_index,
			sequence: 0x2a,
			script: vec![0x6a, 0x79],
			witness: vec![vec![0x24, 0x24, 0x24]],
		}
	}

	#[test]
	fn test_put_get_roundtrip() {
		let temp = tempdir::TempDir::new("table_input").unwrap();
		let table = table(&temp);

		let first = table.put(&record(2, 0x18)).unwrap();
		let second = table.put(&record(3, 0x2a)).unwrap();
		assert_eq!(first, 0);
		assert!(second > first);

		assert_eq!(table.get(first).unwrap().unwrap(), record(2, 0x18));
		assert_eq!(table.get(second).unwrap().unwrap(), record(3, 0x2a));
	}

	#[test]
	fn test_null_point() {
		let temp = tempdir::TempDir::new("table_input_null").unwrap();
		let table = table(&temp);

		let link = table.put(&record(0, NULL_POINT_INDEX)).unwrap();
		assert!(table.get(link).unwrap().unwrap().is_null_point());
	}

	#[test]
	fn test_scan_visits_all() {
		let temp = tempdir::TempDir::new("table_input_scan").unwrap();
		let table = table(&temp);

		let mut expected = Vec::new();
		for index in 0..4 {
			expected.push(table.put(&record(index, index as u32)).unwrap());
		}

		let mut seen = Vec::new();
		table.scan(|link, record| {
			seen.push((link, record.point_fk));
			Ok(true)
		}).unwrap();

		assert_eq!(seen.len(), 4);
		for (index, &(link, point_fk)) in seen.iter().enumerate() {
			assert_eq!(link, expected[index]);
			assert_eq!(point_fk, index as u64);
		}
	}

	#[test]
	fn test_scan_stops_early() {
		let temp = tempdir::TempDir::new("table_input_stop").unwrap();
		let table = table(&temp);
		table.put(&record(0, 0)).unwrap();
		table.put(&record(1, 1)).unwrap();

		let mut visits = 0;
		table.scan(|_, _| {
			visits += 1;
			Ok(false)
		}).unwrap();
		assert_eq!(visits, 1);
	}
}
