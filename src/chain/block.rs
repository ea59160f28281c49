//! Blocks: header plus ordered transactions.

#![allow(missing_docs)]

use chain::hash::{merkle_root, Hash};
use chain::header::Header;
use chain::transaction::Transaction;
use error::Result;
use serial::{Reader, Writer};

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
	pub header: Header,
	pub transactions: Vec<Transaction>,
}

impl Block {
	pub fn hash(&self) -> Hash {
		self.header.hash()
	}

	/// Merkle root over the contained transactions' identity hashes.
	pub fn generate_merkle_root(&self) -> Hash {
		merkle_root(self.transactions.iter().map(Transaction::hash).collect())
	}

	pub fn to_bytes(&self, witness: bool) -> Vec<u8> {
		let mut writer = Writer::new();
		self.header.write(&mut writer);
		writer.write_varint(self.transactions.len() as u64);
		for tx in &self.transactions {
			tx.write(&mut writer, witness);
		}
		writer.into_vec()
	}

	pub fn from_bytes(data: &[u8]) -> Result<Block> {
		let mut reader = Reader::new(data);
		let header = Header::read(&mut reader)?;
		let count = reader.read_varint()? as usize;
		let mut transactions = Vec::with_capacity(count);
		for _ in 0..count {
			transactions.push(Transaction::read(&mut reader)?);
		}
		Ok(Block { header, transactions })
	}

	pub fn serialized_size(&self, witness: bool) -> usize {
		self.to_bytes(witness).len()
	}
}
