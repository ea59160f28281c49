//! Candidate/confirmed tracking, strength markers, spend analysis and
//! block confirmability.

use error::{Code, ErrorKind, Result};
use link::{is_terminal, Link, TERMINAL};
use query::Query;
use tables::input::InputRecord;
use tables::strong_tx::StrongRecord;

/// Blocks a coinbase output must wait before being spent.
pub const COINBASE_MATURITY: u32 = 100;

/// A coinbase recorded at height zero is the genesis coinbase and
/// never matures.
fn is_coinbase_mature(coinbase_height: u32, height: u32) -> bool {
	coinbase_height != 0 && coinbase_height.saturating_add(COINBASE_MATURITY) <= height
}

impl<'a> Query<'a> {
	// Candidate / confirmed height arrays.
	// ------------------------------------------------------------------

	/// Push a header link atop the candidate array, returning its
	/// height.
	pub fn push_candidate(&self, header_fk: Link) -> Result<u64> {
		self.store.candidate.push(header_fk)
	}

	/// Pop and return the top candidate.
	pub fn pop_candidate(&self) -> Result<Link> {
		self.store.candidate.pop()
	}

	/// Push a header link atop the confirmed array, returning its
	/// height.
	///
	/// Height zero is reserved for genesis: pushing onto an empty array
	/// is refused unless `allow_top_zero` is set, which initialization
	/// does exactly once.
	pub fn push_confirmed(&self, header_fk: Link, allow_top_zero: bool) -> Result<u64> {
		if !allow_top_zero && self.store.confirmed.top().is_none() {
			bail!(ErrorKind::GenesisFloor);
		}
		self.store.confirmed.push(header_fk)
	}

	/// Pop and return the top confirmed block. Genesis stays put: the
	/// height-zero entry is never removed.
	pub fn pop_confirmed(&self) -> Result<Link> {
		if self.store.confirmed.top().map_or(true, |top| top == 0) {
			bail!(ErrorKind::GenesisFloor);
		}
		self.store.confirmed.pop()
	}

	/// Replace the candidate branch above `fork_height` with `incoming`,
	/// returning the displaced links newest-first.
	///
	/// Refused up front when the resulting top would not be addressable
	/// by the height index, so a failed call never mutates state.
	pub fn reorganize(&self, fork_height: u64, incoming: &[Link]) -> Result<Vec<Link>> {
		let _guard = self.store.write_guard();

		let top = match self.store.candidate.top() {
			Some(top) => top,
			None => bail!(ErrorKind::TruncateBeyondExtent(fork_height, 0)),
		};
		if fork_height > top {
			bail!(ErrorKind::TruncateBeyondExtent(fork_height, top));
		}
		match fork_height.checked_add(incoming.len() as u64) {
			Some(target) if self.store.candidate.addressable(target) => {}
			_ => bail!(ErrorKind::BodyEof(incoming.len() as u64, top)),
		}

		let mut outgoing = Vec::with_capacity((top - fork_height) as usize);
		while self.store.candidate.top().map_or(false, |current| current > fork_height) {
			outgoing.push(self.store.candidate.pop()?);
		}
		for &header_fk in incoming {
			self.store.candidate.push(header_fk)?;
		}
		self.store.maybe_flush()?;
		Ok(outgoing)
	}

	/// True when `header_fk` sits at its own height in the candidate
	/// array.
	pub fn is_candidate_header(&self, header_fk: Link) -> Result<bool> {
		let height = match self.store.header.get_height(header_fk)? {
			Some(height) => height,
			None => return Ok(false),
		};
		Ok(self.store.candidate.at(height as u64)? == header_fk)
	}

	/// True when `header_fk` sits at its own height in the confirmed
	/// array.
	pub fn is_confirmed_block(&self, header_fk: Link) -> Result<bool> {
		let height = match self.store.header.get_height(header_fk)? {
			Some(height) => height,
			None => return Ok(false),
		};
		Ok(self.store.confirmed.at(height as u64)? == header_fk)
	}

	// Strength markers.
	// ------------------------------------------------------------------

	/// Mark every transaction of the block as claimed by it.
	pub fn set_strong(&self, header_fk: Link) -> Result<()> {
		self.set_strength(header_fk, true)
	}

	/// Append negative markers for every transaction of the block.
	pub fn set_unstrong(&self, header_fk: Link) -> Result<()> {
		self.set_strength(header_fk, false)
	}

	fn set_strength(&self, header_fk: Link, positive: bool) -> Result<()> {
		let _guard = self.store.write_guard();
		for tx_fk in self.get_tx_keys(header_fk)? {
			self.store.strong_tx.put(tx_fk, &StrongRecord { header_fk, positive })?;
		}
		self.store.maybe_flush()?;
		Ok(())
	}

	/// True when the most recent marker for the transaction is
	/// positive.
	pub fn is_strong_tx(&self, tx_fk: Link) -> Result<bool> {
		Ok(self.store.strong_tx.get(tx_fk)?.map_or(false, |record| record.positive))
	}

	/// The block currently claiming the transaction; terminal when
	/// unclaimed or negatively marked.
	pub fn to_strong_block(&self, tx_fk: Link) -> Result<Link> {
		Ok(match self.store.strong_tx.get(tx_fk)? {
			Some(ref record) if record.positive => record.header_fk,
			_ => TERMINAL,
		})
	}

	/// True when the block's coinbase is strongly claimed by it.
	pub fn is_strong_block(&self, header_fk: Link) -> Result<bool> {
		let tx_fks = self.get_tx_keys(header_fk)?;
		let coinbase = match tx_fks.first() {
			Some(&coinbase) => coinbase,
			None => return Ok(false),
		};
		Ok(self.to_strong_block(coinbase)? == header_fk)
	}

	// Confirmation predicates.
	// ------------------------------------------------------------------

	/// Strong, positively marked, and the claiming block is confirmed
	/// at its height.
	pub fn is_confirmed_tx(&self, tx_fk: Link) -> Result<bool> {
		let block = self.to_strong_block(tx_fk)?;
		if is_terminal(block) {
			return Ok(false);
		}
		self.is_confirmed_block(block)
	}

	/// The spend's parent transaction is confirmed.
	pub fn is_confirmed_input(&self, spend_fk: Link) -> Result<bool> {
		let (_, input) = match self.get_spend(spend_fk)? {
			Some(spend) => spend,
			None => return Ok(false),
		};
		self.is_confirmed_tx(input.parent_fk)
	}

	/// The output's parent transaction is confirmed.
	pub fn is_confirmed_output(&self, output_fk: Link) -> Result<bool> {
		let parent = self.to_output_tx(output_fk)?;
		if is_terminal(parent) {
			return Ok(false);
		}
		self.is_confirmed_tx(parent)
	}

	// Spend analysis.
	// ------------------------------------------------------------------

	/// True when the output this spend targets is also spent by a
	/// strong transaction other than the spend's own.
	///
	/// The spend's own parent claiming the output is not a double
	/// spend, so it is excluded.
	pub fn is_spent(&self, spend_fk: Link) -> Result<bool> {
		let (_, input) = match self.get_spend(spend_fk)? {
			Some(spend) => spend,
			None => return Ok(false),
		};
		if input.is_null_point() {
			return Ok(false);
		}

		let prevout_tx = match self.spend_prevout_tx(&input)? {
			Some(prevout_tx) => prevout_tx,
			None => return Ok(false),
		};
		self.spent_by_other(prevout_tx, input.point_index, input.parent_fk)
	}

	/// True when any strong transaction spends the output.
	pub fn is_spent_output(&self, output_fk: Link) -> Result<bool> {
		let (tx_fk, index) = match self.locate_output(output_fk)? {
			Some(coordinates) => coordinates,
			None => return Ok(false),
		};
		self.spent_by_other(tx_fk, index, TERMINAL)
	}

	// True when a strong-positive transaction other than `excluded`
	// spends output (prevout_tx, index).
	fn spent_by_other(&self, prevout_tx: Link, index: u32, excluded: Link) -> Result<bool> {
		for input_fk in self.get_spenders(prevout_tx, index)? {
			let spender = match self.store.input.get(input_fk)? {
				Some(spender) => spender,
				None => continue,
			};
			if spender.parent_fk == excluded {
				continue;
			}
			if self.is_strong_tx(spender.parent_fk)? {
				return Ok(true);
			}
		}
		Ok(false)
	}

	// The transaction whose output this input spends.
	fn spend_prevout_tx(&self, input: &InputRecord) -> Result<Option<Link>> {
		let hash = match self.store.point.get_key(input.point_fk)? {
			Some(hash) => hash,
			None => return Ok(None),
		};
		let prevout_tx = self.store.tx.first(&hash)?;
		if is_terminal(prevout_tx) {
			Ok(None)
		} else {
			Ok(Some(prevout_tx))
		}
	}

	// Maturity.
	// ------------------------------------------------------------------

	/// Whether the spend's prevout is spendable at `height`.
	///
	/// Null points are always mature; non-coinbase prevouts are always
	/// mature; a coinbase prevout requires one hundred confirmations,
	/// and the genesis coinbase never matures. Unresolvable spends are
	/// immature.
	pub fn is_mature(&self, spend_fk: Link, height: u32) -> Result<bool> {
		let (_, input) = match self.get_spend(spend_fk)? {
			Some(spend) => spend,
			None => return Ok(false),
		};
		if input.is_null_point() {
			return Ok(true);
		}

		let metadata = match self.get_spend_metadata(spend_fk)? {
			Some(metadata) => metadata,
			None => return Ok(false),
		};
		if !metadata.coinbase {
			return Ok(true);
		}
		Ok(is_coinbase_mature(metadata.parent_height, height))
	}

	// Confirmability.
	// ------------------------------------------------------------------

	/// Whether every structural precondition holds for confirming the
	/// block at its stored height: strong prevouts present, coinbase
	/// maturity satisfied, no confirmed double spend.
	pub fn block_confirmable(&self, header_fk: Link) -> Result<Code> {
		let height = match self.store.header.get_height(header_fk)? {
			Some(height) => height,
			None => return Ok(Code::Integrity1),
		};
		let tx_fks = self.get_tx_keys(header_fk)?;
		if tx_fks.is_empty() {
			return Ok(Code::Integrity1);
		}

		for &tx_fk in tx_fks.iter() {
			let record = match self.store.tx.get(tx_fk)? {
				Some(record) => record,
				None => return Ok(Code::Integrity1),
			};
			// The coinbase spends nothing.
			if record.coinbase {
				continue;
			}
			for index in 0..record.ins_count {
				let spend_fk = record.ins_fk() + index as u64;
				let (_, input) = match self.get_spend(spend_fk)? {
					Some(spend) => spend,
					None => return Ok(Code::Integrity1),
				};
				if input.is_null_point() {
					continue;
				}

				let metadata = match self.get_spend_metadata(spend_fk)? {
					Some(metadata) => metadata,
					None => return Ok(Code::Integrity1),
				};
				if metadata.coinbase && !is_coinbase_mature(metadata.parent_height, height) {
					return Ok(Code::CoinbaseMaturity);
				}
				if self.is_spent(spend_fk)? {
					return Ok(Code::ConfirmedDoubleSpend);
				}
			}
		}
		Ok(Code::Success)
	}
}
