//! Validation state caches.

use error::{Code, CodeResult, Result};
use link::Link;
use query::Query;
use tables::context::Context;
use tables::validated_bk::ValidatedBkRecord;
use tables::validated_tx::ValidatedTxRecord;

impl<'a> Query<'a> {
	/// Record a block's validation result and fee total.
	pub fn set_block_state(&self, header_fk: Link, code: Code, fees: u64) -> Result<()> {
		self.store.validated_bk.put(header_fk, &ValidatedBkRecord { code, fees })?;
		Ok(())
	}

	/// The most recent validation state of a block.
	pub fn get_block_state(&self, header_fk: Link) -> CodeResult<(Code, u64)> {
		match self.store.validated_bk.get(header_fk) {
			Ok(Some(record)) => Ok((record.code, record.fees)),
			Ok(None) => Err(Code::Unvalidated),
			Err(_) => Err(Code::OperationFailed),
		}
	}

	/// Record a transaction's validation result under a context.
	pub fn set_tx_state(&self, tx_fk: Link, context: &Context, code: Code, fee: u64,
		sigops: u64) -> Result<()>
	{
		self.store.validated_tx.put(tx_fk, &ValidatedTxRecord {
			context: *context,
			code,
			fee,
			sigops,
		})?;
		Ok(())
	}

	/// The transaction's validation state under exactly `context`.
	pub fn get_tx_state(&self, tx_fk: Link, context: &Context) -> CodeResult<(Code, u64, u64)> {
		match self.store.validated_tx.get(tx_fk, context) {
			Ok(Some(record)) => Ok((record.code, record.fee, record.sigops)),
			Ok(None) => Err(Code::Unvalidated),
			Err(_) => Err(Code::OperationFailed),
		}
	}
}
