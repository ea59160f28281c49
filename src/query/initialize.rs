//! Store bootstrap.

use chain::{Block, NULL_HASH};
use error::Result;
use link::Link;
use query::Query;
use tables::context::Context;

impl<'a> Query<'a> {
	/// Bootstrap a freshly created store with its genesis block.
	///
	/// Reserves point link zero for the null hash, archives the block
	/// under a zeroed context, pushes it onto both height arrays and
	/// marks its transactions strong.
	pub fn initialize(&self, genesis: &Block) -> Result<Link> {
		self.store.point.put_if_absent(&NULL_HASH)?;

		let header_fk = self.set_block(genesis, &Context::default(), false)?;
		self.push_candidate(header_fk)?;
		self.push_confirmed(header_fk, true)?;
		self.set_strong(header_fk)?;
		Ok(header_fk)
	}

	/// True once a confirmed block exists.
	pub fn is_initialized(&self) -> bool {
		self.store.confirmed.top().is_some()
	}
}
