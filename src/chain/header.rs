//! Block header wire form and identity.

#![allow(missing_docs)]

use chain::hash::{sha256d, Hash};
use error::Result;
use serial::{Reader, Writer};

/// Wire byte length of a serialized header.
pub const HEADER_SIZE: usize = 80;

/// An 80-byte proof-of-work block header.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
	pub version: u32,
	pub previous: Hash,
	pub merkle_root: Hash,
	pub timestamp: u32,
	pub bits: u32,
	pub nonce: u32,
}

impl Header {
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut writer = Writer::with_capacity(HEADER_SIZE);
		self.write(&mut writer);
		writer.into_vec()
	}

	pub fn write(&self, writer: &mut Writer) {
		writer.write_u32(self.version);
		writer.write_bytes(&self.previous);
		writer.write_bytes(&self.merkle_root);
		writer.write_u32(self.timestamp);
		writer.write_u32(self.bits);
		writer.write_u32(self.nonce);
	}

	pub fn read(reader: &mut Reader) -> Result<Header> {
		Ok(Header {
			version: reader.read_u32()?,
			previous: reader.read_hash()?,
			merkle_root: reader.read_hash()?,
			timestamp: reader.read_u32()?,
			bits: reader.read_u32()?,
			nonce: reader.read_u32()?,
		})
	}

	/// Double-sha256 of the wire form.
	pub fn hash(&self) -> Hash {
		sha256d(&self.to_bytes())
	}
}
