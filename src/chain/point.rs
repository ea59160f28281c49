//! A reference to a previous transaction output.

#![allow(missing_docs)]

use chain::hash::{Hash, NULL_HASH};
use error::Result;
use serial::{Reader, Writer};

/// The output index marking a null (coinbase) point.
pub const NULL_INDEX: u32 = 0xffff_ffff;

/// Outpoint: transaction hash plus output index.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
	pub hash: Hash,
	pub index: u32,
}

impl Point {
	/// The null point found in coinbase inputs.
	pub fn null() -> Point {
		Point { hash: NULL_HASH, index: NULL_INDEX }
	}

	pub fn is_null(&self) -> bool {
		self.index == NULL_INDEX && self.hash == NULL_HASH
	}

	pub fn write(&self, writer: &mut Writer) {
		writer.write_bytes(&self.hash);
		writer.write_u32(self.index);
	}

	pub fn read(reader: &mut Reader) -> Result<Point> {
		Ok(Point {
			hash: reader.read_hash()?,
			index: reader.read_u32()?,
		})
	}
}
