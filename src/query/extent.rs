//! Extent metrics: table sizes, record counts and per-object sizes.

use error::Result;
use link::Link;
use query::Query;

#[allow(missing_docs)]
impl<'a> Query<'a> {
	/// Logical body byte size of the header table.
	pub fn header_body_size(&self) -> u64 {
		self.store.header.body_size()
	}

	pub fn header_records(&self) -> u64 {
		self.store.header.count()
	}

	pub fn point_records(&self) -> u64 {
		self.store.point.count()
	}

	pub fn tx_records(&self) -> u64 {
		self.store.tx.count()
	}

	pub fn puts_records(&self) -> u64 {
		self.store.puts.count()
	}

	pub fn candidate_records(&self) -> u64 {
		self.store.candidate.count()
	}

	pub fn confirmed_records(&self) -> u64 {
		self.store.confirmed.count()
	}

	pub fn strong_tx_records(&self) -> u64 {
		self.store.strong_tx.count()
	}

	/// Input body byte extent (slabs).
	pub fn input_body_size(&self) -> u64 {
		self.store.input.body_size()
	}

	/// Output body byte extent (slabs).
	pub fn output_body_size(&self) -> u64 {
		self.store.output.body_size()
	}

	/// Association body byte extent (slabs).
	pub fn txs_body_size(&self) -> u64 {
		self.store.txs.body_size()
	}

	/// Total archive body bytes across every table.
	pub fn archive_size(&self) -> u64 {
		self.store.header.body_size()
			+ self.store.point.body_size()
			+ self.store.input.body_size()
			+ self.store.output.body_size()
			+ self.store.puts.body_size()
			+ self.store.tx.body_size()
			+ self.store.txs.body_size()
			+ self.store.candidate.body_size()
			+ self.store.confirmed.body_size()
			+ self.store.strong_tx.body_size()
			+ self.store.prevout.body_size()
			+ self.store.validated_bk.body_size()
			+ self.store.validated_tx.body_size()
	}

	/// Transaction count of a block.
	pub fn get_tx_count(&self, header_fk: Link) -> Result<Option<u64>> {
		self.store.txs.get_count(header_fk)
	}

	/// Witness-stripped and witness wire sizes of a transaction.
	pub fn get_tx_sizes(&self, tx_fk: Link) -> Result<Option<(u32, u32)>> {
		Ok(self.store.tx.get(tx_fk)?
			.map(|record| (record.witless_size, record.witness_size)))
	}

	/// Value of an output by its slab link.
	pub fn get_value(&self, output_fk: Link) -> Result<Option<u64>> {
		Ok(self.store.output.get(output_fk)?.map(|record| record.value))
	}
}
