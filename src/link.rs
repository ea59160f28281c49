//! Variable-width little-endian links with a terminal sentinel.

use error::{ErrorKind, Result};
use serial::{Reader, Writer};

/// A table link: a record number or body byte offset.
///
/// In memory every link is a `u64` regardless of the width it occupies
/// on disk; the all-ones in-memory value is the terminal sentinel and
/// maps to the all-ones on-disk value of whatever width the owning
/// table declares.
pub type Link = u64;

/// The "none"/"end of chain" sentinel.
pub const TERMINAL: Link = ::std::u64::MAX;

/// True when the link is the terminal sentinel.
#[inline]
pub fn is_terminal(link: Link) -> bool {
	link == TERMINAL
}

/// Width descriptor for one table's link fields.
///
/// The width bounds the addressable body extent: an N-byte link stores
/// values in `[0, 2^(8N) - 1)` with the top value reserved as terminal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Linkage {
	size: usize,
}

impl Linkage {
	pub fn new(size: usize) -> Linkage {
		assert!(size >= 1 && size <= 7, "link width must be between 1 and 7 bytes");
		Linkage { size }
	}

	/// Width in bytes.
	#[inline]
	pub fn size(&self) -> usize {
		self.size
	}

	/// The on-disk all-ones value for this width.
	#[inline]
	pub fn raw_terminal(&self) -> u64 {
		!0u64 >> (8 * (8 - self.size))
	}

	/// True when `link` is representable as a non-terminal value.
	#[inline]
	pub fn fits(&self, link: Link) -> bool {
		link < self.raw_terminal()
	}

	pub fn read(&self, reader: &mut Reader) -> Result<Link> {
		let raw = reader.read_uint(self.size)?;
		if raw == self.raw_terminal() {
			Ok(TERMINAL)
		} else {
			Ok(raw)
		}
	}

	pub fn write(&self, writer: &mut Writer, link: Link) -> Result<()> {
		if is_terminal(link) {
			writer.write_uint(self.raw_terminal(), self.size);
			return Ok(());
		}
		if !self.fits(link) {
			bail!(ErrorKind::LinkWidth(self.size, link));
		}
		writer.write_uint(link, self.size);
		Ok(())
	}

	/// Read a link from the front of a raw slice.
	pub fn get(&self, data: &[u8]) -> Result<Link> {
		self.read(&mut Reader::new(data))
	}
}
