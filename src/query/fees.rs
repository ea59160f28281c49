//! Fee queries over the validation caches.

use std::sync::atomic::{AtomicBool, Ordering};

use error::{Code, CodeResult};
use link::{is_terminal, Link};
use query::Query;

impl<'a> Query<'a> {
	/// The cached fee of a validated transaction.
	pub fn get_tx_fee(&self, tx_fk: Link) -> CodeResult<u64> {
		match self.store.validated_tx.get_latest(tx_fk) {
			Ok(Some(record)) => Ok(record.fee),
			Ok(None) => Err(Code::Unvalidated),
			Err(_) => Err(Code::OperationFailed),
		}
	}

	/// The cached fee per thousand witness-stripped wire bytes.
	pub fn get_tx_rate(&self, tx_fk: Link) -> CodeResult<u64> {
		let fee = self.get_tx_fee(tx_fk)?;
		let size = match self.get_tx_sizes(tx_fk) {
			Ok(Some((witless, _))) if witless > 0 => witless as u64,
			_ => return Err(Code::OperationFailed),
		};
		Ok(fee * 1000 / size)
	}

	/// The block's total fee per thousand wire bytes.
	pub fn get_block_rate(&self, header_fk: Link) -> CodeResult<u64> {
		let fees = self.get_block_fees(header_fk)?;
		let size = match self.store.txs.get(header_fk) {
			Ok(Some(ref record)) if record.wire_size > 0 => record.wire_size as u64,
			_ => return Err(Code::OperationFailed),
		};
		Ok(fees * 1000 / size)
	}

	/// Sum of the block's non-coinbase transaction fees.
	pub fn get_block_fees(&self, header_fk: Link) -> CodeResult<u64> {
		let tx_fks = match self.get_tx_keys(header_fk) {
			Ok(tx_fks) => tx_fks,
			Err(_) => return Err(Code::OperationFailed),
		};
		if tx_fks.is_empty() {
			return Err(Code::Unassociated);
		}

		let mut fees = 0u64;
		for &tx_fk in tx_fks.iter() {
			match self.store.tx.get_coinbase(tx_fk) {
				Ok(Some(true)) => continue,
				Ok(Some(false)) => {}
				_ => return Err(Code::OperationFailed),
			}
			fees = fees.checked_add(self.get_tx_fee(tx_fk)?)
				.ok_or(Code::OperationFailed)?;
		}
		Ok(fees)
	}

	/// Sum of block fees along the ancestry of `header_fk` down to
	/// genesis.
	///
	/// `cancel` is polled once per block; cancellation surfaces as
	/// `OperationFailed` without corrupting state.
	pub fn get_branch_fees(&self, header_fk: Link, cancel: &AtomicBool) -> CodeResult<u64> {
		let mut fees = 0u64;
		let mut link = header_fk;

		while !is_terminal(link) {
			if cancel.load(Ordering::Relaxed) {
				return Err(Code::OperationFailed);
			}

			fees = fees.checked_add(self.get_block_fees(link)?)
				.ok_or(Code::OperationFailed)?;

			link = match self.store.header.get(link) {
				Ok(Some(record)) => record.parent_fk,
				Ok(None) => return Err(Code::Integrity1),
				Err(_) => return Err(Code::OperationFailed),
			};
		}
		Ok(fees)
	}
}
