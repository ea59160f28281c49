//! Bounds-checked little-endian readers and writers.

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

use error::{ErrorKind, Result};

/// A cursor over a byte slice reading little-endian fields.
pub struct Reader<'a> {
	data: &'a [u8],
	offset: usize,
}

impl<'a> Reader<'a> {
	pub fn new(data: &'a [u8]) -> Self {
		Reader { data, offset: 0 }
	}

	pub fn offset(&self) -> usize {
		self.offset
	}

	pub fn remaining(&self) -> usize {
		self.data.len() - self.offset
	}

	fn require(&self, len: usize) -> Result<()> {
		if self.remaining() < len {
			bail!(ErrorKind::Exhausted(len, self.remaining()));
		}
		Ok(())
	}

	pub fn read_u8(&mut self) -> Result<u8> {
		self.require(1)?;
		let byte = self.data[self.offset];
		self.offset += 1;
		Ok(byte)
	}

	pub fn read_u16(&mut self) -> Result<u16> {
		self.require(2)?;
		let value = LittleEndian::read_u16(&self.data[self.offset..]);
		self.offset += 2;
		Ok(value)
	}

	pub fn read_u32(&mut self) -> Result<u32> {
		self.require(4)?;
		let value = LittleEndian::read_u32(&self.data[self.offset..]);
		self.offset += 4;
		Ok(value)
	}

	pub fn read_u64(&mut self) -> Result<u64> {
		self.require(8)?;
		let value = LittleEndian::read_u64(&self.data[self.offset..]);
		self.offset += 8;
		Ok(value)
	}

	/// Read an unsigned integer of `width` little-endian bytes, 1 to 8.
	pub fn read_uint(&mut self, width: usize) -> Result<u64> {
		self.require(width)?;
		let value = LittleEndian::read_uint(&self.data[self.offset..], width);
		self.offset += width;
		Ok(value)
	}

	pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
		self.require(len)?;
		let bytes = &self.data[self.offset..self.offset + len];
		self.offset += len;
		Ok(bytes)
	}

	pub fn read_hash(&mut self) -> Result<[u8; 32]> {
		let bytes = self.read_bytes(32)?;
		let mut hash = [0u8; 32];
		hash.copy_from_slice(bytes);
		Ok(hash)
	}

	/// Read a Bitcoin compact-size integer (1, 3, 5 or 9 bytes).
	pub fn read_varint(&mut self) -> Result<u64> {
		let lead = self.read_u8()?;
		match lead {
			0xfd => Ok(self.read_u16()? as u64),
			0xfe => Ok(self.read_u32()? as u64),
			0xff => self.read_u64(),
			byte => Ok(byte as u64),
		}
	}

	/// Read a compact-size length followed by that many bytes.
	pub fn read_varbytes(&mut self) -> Result<&'a [u8]> {
		let len = self.read_varint()? as usize;
		self.read_bytes(len)
	}
}

/// An appending writer emitting little-endian fields.
pub struct Writer {
	out: Vec<u8>,
}

impl Writer {
	pub fn new() -> Self {
		Writer { out: Vec::new() }
	}

	pub fn with_capacity(capacity: usize) -> Self {
		Writer { out: Vec::with_capacity(capacity) }
	}

	pub fn write_u8(&mut self, value: u8) {
		self.out.push(value);
	}

	pub fn write_u16(&mut self, value: u16) {
		self.out.write_u16::<LittleEndian>(value).expect("writing to a Vec cannot fail; qed");
	}

	pub fn write_u32(&mut self, value: u32) {
		self.out.write_u32::<LittleEndian>(value).expect("writing to a Vec cannot fail; qed");
	}

	pub fn write_u64(&mut self, value: u64) {
		self.out.write_u64::<LittleEndian>(value).expect("writing to a Vec cannot fail; qed");
	}

	/// Write the low `width` little-endian bytes of `value`.
	pub fn write_uint(&mut self, value: u64, width: usize) {
		self.out.write_uint::<LittleEndian>(value, width)
			.expect("writing to a Vec cannot fail; qed");
	}

	pub fn write_bytes(&mut self, bytes: &[u8]) {
		self.out.extend_from_slice(bytes);
	}

	pub fn write_varint(&mut self, value: u64) {
		if value < 0xfd {
			self.write_u8(value as u8);
		} else if value <= 0xffff {
			self.write_u8(0xfd);
			self.write_u16(value as u16);
		} else if value <= 0xffff_ffff {
			self.write_u8(0xfe);
			self.write_u32(value as u32);
		} else {
			self.write_u8(0xff);
			self.write_u64(value);
		}
	}

	pub fn write_varbytes(&mut self, bytes: &[u8]) {
		self.write_varint(bytes.len() as u64);
		self.write_bytes(bytes);
	}

	pub fn into_vec(self) -> Vec<u8> {
		self.out
	}
}

/// Byte length of a compact-size integer.
pub fn varint_size(value: u64) -> usize {
	if value < 0xfd {
		1
	} else if value <= 0xffff {
		3
	} else if value <= 0xffff_ffff {
		5
	} else {
		9
	}
}
