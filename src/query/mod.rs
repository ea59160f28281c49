//! Typed query layer over the archive tables.
//!
//! Translates blocks, transactions, inputs, outputs and points between
//! domain objects and table records, and maintains the confirmation
//! indexes and caches. Operation families are split per file:
//! archival, confirmation, merkle services, heights, extents, fees,
//! validation states, initialization and the optional indexes.

mod archive;
mod confirm;
mod extent;
mod fees;
mod height;
mod initialize;
mod optional;
mod services;
mod validate;

use store::Store;

/// A borrow of the store exposing the typed operations.
///
/// Compound write operations hold the store's write guard for their
/// duration; point reads rely on the per-storage shared locks alone.
pub struct Query<'a> {
	store: &'a Store,
}

impl<'a> Query<'a> {
	pub(crate) fn new(store: &'a Store) -> Query<'a> {
		Query { store }
	}
}
