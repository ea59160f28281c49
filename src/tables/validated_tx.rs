//! Transaction validation state cache.
//!
//! Hashed slabs keyed by transaction link: the validation context, a
//! result code byte, and fee/sigops as compact-size integers. A
//! transaction may hold one entry per context; lookups match contexts
//! along the chain.

use error::{Code, ErrorKind, Result};
use link::{Link, Linkage};
use primitives::hashmap::HashMap;
use primitives::manager::ElementSize;
use serial::{Reader, Writer};
use storage::Storage;
use tables::context::Context;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedTxRecord {
	pub context: Context,
	pub code: Code,
	pub fee: u64,
	pub sigops: u64,
}

#[derive(Debug)]
pub struct ValidatedTxTable {
	map: HashMap,
	tx_link: Linkage,
}

impl ValidatedTxTable {
	pub fn new(head: Storage, body: Storage, buckets: u64, link: Linkage,
		tx_link: Linkage) -> ValidatedTxTable
	{
		ValidatedTxTable {
			map: HashMap::new(head, body, buckets, link, tx_link.size(), ElementSize::Slab),
			tx_link,
		}
	}

	lifecycle!(map);

	pub fn buckets(&self) -> u64 {
		self.map.buckets()
	}

	fn key(&self, tx_fk: Link) -> Vec<u8> {
		let mut writer = Writer::with_capacity(self.tx_link.size());
		writer.write_uint(tx_fk, self.tx_link.size());
		writer.into_vec()
	}

	fn read_record(reader: &mut Reader) -> Result<ValidatedTxRecord> {
		let context = Context::read(reader)?;
		let byte = reader.read_u8()?;
		let code = Code::from_u8(byte)
			.ok_or_else(|| ErrorKind::InvalidRecord("validated_tx"))?;
		Ok(ValidatedTxRecord {
			context,
			code,
			fee: reader.read_varint()?,
			sigops: reader.read_varint()?,
		})
	}

	pub fn put(&self, tx_fk: Link, record: &ValidatedTxRecord) -> Result<Link> {
		let mut writer = Writer::new();
		record.context.write(&mut writer);
		writer.write_u8(record.code as u8);
		writer.write_varint(record.fee);
		writer.write_varint(record.sigops);
		self.map.put(&self.key(tx_fk), &writer.into_vec())
	}

	/// The most recent entry for `tx_fk` regardless of context.
	pub fn get_latest(&self, tx_fk: Link) -> Result<Option<ValidatedTxRecord>> {
		let first = self.map.first(&self.key(tx_fk))?;
		self.map.read(first, Self::read_record)
	}

	/// The most recent entry for `tx_fk` validated under `context`.
	pub fn get(&self, tx_fk: Link, context: &Context) -> Result<Option<ValidatedTxRecord>> {
		let mut it = self.map.it(&self.key(tx_fk))?;
		while let Some(link) = it.advance()? {
			let record = self.map.read(link, Self::read_record)?;
			if let Some(record) = record {
				if record.context == *context {
					return Ok(Some(record));
				}
			}
		}
		Ok(None)
	}
}
