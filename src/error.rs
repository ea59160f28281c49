#![allow(unknown_lints)]
#![allow(missing_docs)]

use std::io;
use std::path::PathBuf;

error_chain! {
	foreign_links {
		Io(io::Error);
	}

	errors {
		InvalidOptions(field: &'static str, error: String) {
			description("Invalid options were provided"),
			display("Invalid value of `{}`: {}", field, error),
		}
		DatabaseLocked(path: PathBuf) {
			description("Database file lock is currently acquired"),
			display("Could not acquire database file lock: {}. \
					 If you're sure that no other process is using \
					 the database you can delete this file.", path.display()),
		}
		DirtyShutdown(path: PathBuf) {
			description("Flush sentinel present at open"),
			display("Flush sentinel found at {}; the database was not closed \
					 cleanly and requires restore.", path.display()),
		}
		CorruptedBackup(path: PathBuf, msg: String) {
			description("Hash of backup manifest is invalid"),
			display("Backup manifest corruption detected in file at {}. {}", path.display(), msg),
		}
		InvalidKeyLen(expected: usize, got: usize) {
			description("Invalid key length"),
			display("Invalid key length. Expected: {}, got: {}", expected, got),
		}
		LinkWidth(width: usize, value: u64) {
			description("Link value exceeds field width"),
			display("Value {} does not fit a {}-byte link field.", value, width),
		}
		BodyEof(needed: u64, capacity: u64) {
			description("Allocation beyond addressable extent"),
			display("Cannot allocate {} bytes; addressable capacity is {}.", needed, capacity),
		}
		TruncateBeyondExtent(requested: u64, size: u64) {
			description("Truncation past live extent"),
			display("Cannot truncate to {}; current size is {}.", requested, size),
		}
		Exhausted(needed: usize, available: usize) {
			description("Read past end of element"),
			display("Element read of {} bytes exceeds the {} available.", needed, available),
		}
		InvalidRecord(table: &'static str) {
			description("Record failed to deserialize"),
			display("A `{}` record failed to deserialize.", table),
		}
		ChainLoop(bucket: u64) {
			description("Bucket chain exceeds element count"),
			display("Chain walk from bucket {} exceeds the body element count.", bucket),
		}
		GenesisFloor {
			description("Confirmed height zero is reserved for genesis"),
			display("Confirmed height zero holds the genesis block; it is \
					 pushed at initialization only and never popped."),
		}
	}
}

impl PartialEq for ErrorKind {
	fn eq(&self, other: &Self) -> bool {
		use self::ErrorKind::*;

		match (self, other) {
			(&InvalidOptions(field, ref error), &InvalidOptions(field2, ref error2))
				if field == field2 && error == error2 => true,
			(&InvalidKeyLen(expected, got), &InvalidKeyLen(expected2, got2))
				if expected == expected2 && got == got2 => true,
			(&DirtyShutdown(ref path), &DirtyShutdown(ref path2))
				if path == path2 => true,
			(&CorruptedBackup(ref path, ref msg), &CorruptedBackup(ref path2, ref msg2))
				if path == path2 && msg == msg2 => true,
			(&LinkWidth(width, value), &LinkWidth(width2, value2))
				if width == width2 && value == value2 => true,
			(&BodyEof(needed, capacity), &BodyEof(needed2, capacity2))
				if needed == needed2 && capacity == capacity2 => true,
			(&TruncateBeyondExtent(requested, size), &TruncateBeyondExtent(requested2, size2))
				if requested == requested2 && size == size2 => true,
			(&Exhausted(needed, available), &Exhausted(needed2, available2))
				if needed == needed2 && available == available2 => true,
			(&InvalidRecord(table), &InvalidRecord(table2))
				if table == table2 => true,
			(&ChainLoop(bucket), &ChainLoop(bucket2))
				if bucket == bucket2 => true,
			(&GenesisFloor, &GenesisFloor) => true,
			_ => false,
		}
	}
}

/// Stable result codes surfaced by the query layer.
///
/// `Success` means the operation completed and, where applicable, the
/// domain predicate holds. The byte values are stable across releases;
/// validation caches persist them.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
	Success = 0,
	OperationFailed = 1,
	StoreLockFailure = 2,
	Integrity1 = 3,
	MerkleArguments = 4,
	MerkleNotFound = 5,
	MerkleProof = 6,
	Unvalidated = 7,
	Unassociated = 8,
	BlockConfirmable = 9,
	BlockValid = 10,
	BlockUnconfirmable = 11,
	TxConnected = 12,
	TxDisconnected = 13,
	CoinbaseMaturity = 14,
	ConfirmedDoubleSpend = 15,
}

impl Code {
	/// True for `Code::Success` only.
	pub fn is_success(&self) -> bool {
		*self == Code::Success
	}

	/// Recover a code from its stable byte value.
	pub fn from_u8(byte: u8) -> Option<Code> {
		use self::Code::*;

		Some(match byte {
			0 => Success,
			1 => OperationFailed,
			2 => StoreLockFailure,
			3 => Integrity1,
			4 => MerkleArguments,
			5 => MerkleNotFound,
			6 => MerkleProof,
			7 => Unvalidated,
			8 => Unassociated,
			9 => BlockConfirmable,
			10 => BlockValid,
			11 => BlockUnconfirmable,
			12 => TxConnected,
			13 => TxDisconnected,
			14 => CoinbaseMaturity,
			15 => ConfirmedDoubleSpend,
			_ => return None,
		})
	}
}

/// Result of a fallible domain query carrying a `Code` on failure.
pub type CodeResult<T> = ::std::result::Result<T, Code>;

#[cfg(test)]
mod tests {
	use super::Code;

	#[test]
	fn test_code_roundtrip() {
		for byte in 0..16u8 {
			let code = Code::from_u8(byte).unwrap();
			assert_eq!(code as u8, byte);
		}
		assert_eq!(Code::from_u8(16), None);
	}

	#[test]
	fn test_success() {
		assert!(Code::Success.is_success());
		assert!(!Code::OperationFailed.is_success());
	}
}
