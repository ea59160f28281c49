//! Chain-state context recorded alongside headers and validations.

use error::Result;
use serial::{Reader, Writer};

/// Byte width of a serialized context: flags, 24-bit height, mtp.
pub const CONTEXT_SIZE: usize = 4 + 3 + 4;

/// The fork flags, height and median-time-past under which an object
/// was stored or validated.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Context {
	/// Active fork flag mask.
	pub flags: u32,
	/// Associated height; stored as a 24-bit field.
	pub height: u32,
	/// Median time past.
	pub mtp: u32,
}

impl Context {
	pub(crate) fn write(&self, writer: &mut Writer) {
		writer.write_u32(self.flags);
		// 24-bit field.
		writer.write_uint((self.height & 0x00ff_ffff) as u64, 3);
		writer.write_u32(self.mtp);
	}

	pub(crate) fn read(reader: &mut Reader) -> Result<Context> {
		Ok(Context {
			flags: reader.read_u32()?,
			height: reader.read_uint(3)? as u32,
			mtp: reader.read_u32()?,
		})
	}
}
