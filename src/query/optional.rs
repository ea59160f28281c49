//! Optional address and compact-filter indexes.
//!
//! Each index is present only when its configured width is non-zero;
//! operations on a disabled index succeed vacuously for writes and
//! return empty results for reads.

use chain::Hash;
use error::Result;
use link::Link;
use query::Query;
use tables::filter_bk::FilterBkRecord;

impl<'a> Query<'a> {
	/// True when the address index is configured.
	pub fn address_enabled(&self) -> bool {
		self.store.address.is_some()
	}

	/// True when the compact-filter caches are configured.
	pub fn filter_enabled(&self) -> bool {
		self.store.filter_bk.is_some() && self.store.filter_tx.is_some()
	}

	/// Output links recorded for a script hash, newest first.
	pub fn to_address_outputs(&self, script_hash: &Hash) -> Result<Vec<Link>> {
		match self.store.address {
			Some(ref address) => address.outputs(script_hash),
			None => Ok(Vec::new()),
		}
	}

	/// Record a block's filter header chain value and filter hash.
	pub fn set_filter_head(&self, header_fk: Link, head: &Hash, hash: &Hash) -> Result<()> {
		if let Some(ref filter_bk) = self.store.filter_bk {
			filter_bk.put(header_fk, &FilterBkRecord { head: *head, hash: *hash })?;
		}
		Ok(())
	}

	/// The block's filter header chain value and filter hash.
	pub fn get_filter_head(&self, header_fk: Link) -> Result<Option<(Hash, Hash)>> {
		match self.store.filter_bk {
			Some(ref filter_bk) =>
				Ok(filter_bk.get(header_fk)?.map(|record| (record.head, record.hash))),
			None => Ok(None),
		}
	}

	/// Record a block's filter body.
	pub fn set_filter_body(&self, header_fk: Link, filter: &[u8]) -> Result<()> {
		if let Some(ref filter_tx) = self.store.filter_tx {
			filter_tx.put(header_fk, filter)?;
		}
		Ok(())
	}

	/// The block's filter body.
	pub fn get_filter_body(&self, header_fk: Link) -> Result<Option<Vec<u8>>> {
		match self.store.filter_tx {
			Some(ref filter_tx) => filter_tx.get(header_fk),
			None => Ok(None),
		}
	}
}
