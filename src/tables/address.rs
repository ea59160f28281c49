//! Optional address index.
//!
//! Hashed records keyed by output script hash, each carrying one output
//! link. A script in use by many outputs chains one record per output.

use chain::Hash;
use error::Result;
use link::{Link, Linkage};
use primitives::hashmap::HashMap;
use primitives::manager::ElementSize;
use serial::Writer;
use storage::Storage;

#[derive(Debug)]
pub struct AddressTable {
	map: HashMap,
	output_link: Linkage,
}

impl AddressTable {
	const KEY_SIZE: usize = 32;

	pub fn new(head: Storage, body: Storage, buckets: u64, link: Linkage,
		output_link: Linkage) -> AddressTable
	{
		AddressTable {
			map: HashMap::new(head, body, buckets, link, Self::KEY_SIZE,
				ElementSize::Record(output_link.size())),
			output_link,
		}
	}

	lifecycle!(map);

	pub fn buckets(&self) -> u64 {
		self.map.buckets()
	}

	pub fn put(&self, script_hash: &Hash, output_fk: Link) -> Result<Link> {
		let mut writer = Writer::with_capacity(self.output_link.size());
		self.output_link.write(&mut writer, output_fk)?;
		self.map.put(script_hash, &writer.into_vec())
	}

	/// Every output link recorded for `script_hash`, newest first.
	pub fn outputs(&self, script_hash: &Hash) -> Result<Vec<Link>> {
		let output_link = self.output_link;
		let mut outputs = Vec::new();
		let mut it = self.map.it(script_hash)?;
		while let Some(link) = it.advance()? {
			if let Some(output_fk) = self.map.read(link, |reader| output_link.read(reader))? {
				outputs.push(output_fk);
			}
		}
		Ok(outputs)
	}

	pub fn exists(&self, script_hash: &Hash) -> Result<bool> {
		self.map.exists(script_hash)
	}
}

#[cfg(test)]
mod tests {
	extern crate tempdir;

	use super::AddressTable;
	use link::Linkage;
	use storage::Storage;

	fn table(temp: &tempdir::TempDir) -> AddressTable {
		let head = Storage::create(temp.path().join("address.head"), 0, 50).unwrap();
		let body = Storage::create(temp.path().join("address.body"), 0, 50).unwrap();
		let table = AddressTable::new(head, body, 16, Linkage::new(4), Linkage::new(5));
		table.create().unwrap();
		table
	}

	#[test]
	fn test_chains_per_script() {
		let temp = tempdir::TempDir::new("table_address").unwrap();
		let table = table(&temp);

		let script_hash = [3u8; 32];
		assert!(!table.exists(&script_hash).unwrap());
		table.put(&script_hash, 10).unwrap();
		table.put(&script_hash, 20).unwrap();
		table.put(&[4u8; 32], 30).unwrap();

		assert_eq!(table.outputs(&script_hash).unwrap(), vec![20, 10]);
		assert_eq!(table.outputs(&[4u8; 32]).unwrap(), vec![30]);
		assert!(table.outputs(&[5u8; 32]).unwrap().is_empty());
	}
}
