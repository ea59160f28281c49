//! Archival operations: decompose domain objects into table records
//! and reassemble them.

use chain::{Block, Hash, Header, Input, Output, Point, Transaction, NULL_HASH};
use error::Result;
use link::{is_terminal, Link, TERMINAL};
use query::Query;
use tables::context::Context;
use tables::header::HeaderRecord;
use tables::input::{InputRecord, NULL_POINT_INDEX};
use tables::output::OutputRecord;
use tables::prevout::PrevoutRecord;
use tables::transaction::TxRecord;
use tables::txs::TxsRecord;

impl<'a> Query<'a> {
	// Translations.
	// ------------------------------------------------------------------

	/// Block hash to header link; terminal when unknown.
	pub fn to_header(&self, hash: &Hash) -> Result<Link> {
		self.store.header.first(hash)
	}

	/// Transaction hash to transaction link; terminal when unknown.
	pub fn to_tx(&self, hash: &Hash) -> Result<Link> {
		self.store.tx.first(hash)
	}

	/// Transaction hash to point link; terminal when no input spends it.
	pub fn to_point(&self, hash: &Hash) -> Result<Link> {
		self.store.point.first(hash)
	}

	/// The output slab link of `(tx, index)`; terminal when out of
	/// range.
	pub fn to_output(&self, tx_fk: Link, index: u32) -> Result<Link> {
		let record = match self.store.tx.get(tx_fk)? {
			Some(record) => record,
			None => return Ok(TERMINAL),
		};
		if index >= record.outs_count {
			return Ok(TERMINAL);
		}
		Ok(self.store.puts.get(record.outs_fk + index as u64)?.unwrap_or(TERMINAL))
	}

	/// The input slab link of `(tx, index)`; terminal when out of range.
	pub fn to_input(&self, tx_fk: Link, index: u32) -> Result<Link> {
		let spend_fk = self.to_spend(tx_fk, index)?;
		if is_terminal(spend_fk) {
			return Ok(TERMINAL);
		}
		Ok(self.store.puts.get(spend_fk)?.unwrap_or(TERMINAL))
	}

	/// The spend link of `(tx, index)`: the input's record number in
	/// the puts table.
	pub fn to_spend(&self, tx_fk: Link, index: u32) -> Result<Link> {
		let record = match self.store.tx.get(tx_fk)? {
			Some(record) => record,
			None => return Ok(TERMINAL),
		};
		if index >= record.ins_count {
			return Ok(TERMINAL);
		}
		Ok(record.ins_fk() + index as u64)
	}

	/// Parent transaction of an input slab link.
	pub fn to_input_tx(&self, input_fk: Link) -> Result<Link> {
		Ok(self.store.input.get(input_fk)?.map_or(TERMINAL, |record| record.parent_fk))
	}

	/// Parent transaction of an output slab link.
	pub fn to_output_tx(&self, output_fk: Link) -> Result<Link> {
		Ok(self.store.output.get_parent(output_fk)?.unwrap_or(TERMINAL))
	}

	/// The transaction whose output an input spends; terminal for null
	/// points and unknown prevouts.
	pub fn to_prevout_tx(&self, input_fk: Link) -> Result<Link> {
		let record = match self.store.input.get(input_fk)? {
			Some(record) => record,
			None => return Ok(TERMINAL),
		};
		if record.is_null_point() {
			return Ok(TERMINAL);
		}
		let hash = match self.store.point.get_key(record.point_fk)? {
			Some(hash) => hash,
			None => return Ok(TERMINAL),
		};
		self.store.tx.first(&hash)
	}

	/// The spent output's slab link for a spend link; terminal for null
	/// points and unresolved prevouts.
	pub fn to_prevout(&self, spend_fk: Link) -> Result<Link> {
		match self.get_spend_metadata(spend_fk)? {
			Some(metadata) => Ok(metadata.output_fk),
			None => Ok(TERMINAL),
		}
	}

	/// Stored block hash of a header link.
	pub fn get_header_key(&self, header_fk: Link) -> Result<Option<Hash>> {
		self.store.header.get_key(header_fk)
	}

	/// Stored hash of a transaction link.
	pub fn get_tx_key(&self, tx_fk: Link) -> Result<Option<Hash>> {
		self.store.tx.get_key(tx_fk)
	}

	/// Stored hash of a point link.
	pub fn get_point_key(&self, point_fk: Link) -> Result<Option<Hash>> {
		self.store.point.get_key(point_fk)
	}

	// Writes.
	// ------------------------------------------------------------------

	/// Store a header under the given context; idempotent on the block
	/// hash.
	pub fn set_header(&self, header: &Header, context: &Context, milestone: bool)
		-> Result<Link>
	{
		let _guard = self.store.write_guard();
		let link = self.set_header_internal(header, context, milestone)?;
		self.store.maybe_flush()?;
		Ok(link)
	}

	fn set_header_internal(&self, header: &Header, context: &Context, milestone: bool)
		-> Result<Link>
	{
		let hash = header.hash();
		let existing = self.store.header.first(&hash)?;
		if !is_terminal(existing) {
			return Ok(existing);
		}

		let parent_fk = self.store.header.first(&header.previous)?;
		self.store.header.put(&hash, &HeaderRecord {
			context: *context,
			milestone,
			parent_fk,
			version: header.version,
			timestamp: header.timestamp,
			bits: header.bits,
			nonce: header.nonce,
			merkle_root: header.merkle_root,
		})
	}

	/// Store a loose transaction; idempotent on the transaction hash.
	pub fn set_tx(&self, tx: &Transaction) -> Result<Link> {
		let _guard = self.store.write_guard();
		let link = self.set_tx_internal(tx)?;
		self.store.maybe_flush()?;
		Ok(link)
	}

	// Points first, then output and input slabs, then the transaction
	// record last, published only once its puts runs exist.
	fn set_tx_internal(&self, tx: &Transaction) -> Result<Link> {
		let hash = tx.hash();
		let existing = self.store.tx.first(&hash)?;
		if !is_terminal(existing) {
			return Ok(existing);
		}

		let tx_fk = self.store.tx.allocate()?;

		let mut input_links = Vec::with_capacity(tx.inputs.len());
		for input in &tx.inputs {
			let (point_fk, point_index) = if input.point.is_null() {
				(self.store.point.put_if_absent(&NULL_HASH)?, NULL_POINT_INDEX)
			} else {
				(self.store.point.put_if_absent(&input.point.hash)?, input.point.index)
			};
			input_links.push(self.store.input.put(&InputRecord {
				parent_fk: tx_fk,
				point_fk,
				point_index,
				sequence: input.sequence,
				script: input.script.clone(),
				witness: input.witness.clone(),
			})?);
		}

		let mut output_links = Vec::with_capacity(tx.outputs.len());
		for output in &tx.outputs {
			let output_fk = self.store.output.put(&OutputRecord {
				parent_fk: tx_fk,
				value: output.value,
				script: output.script.clone(),
			})?;
			output_links.push(output_fk);
			if let Some(ref address) = self.store.address {
				address.put(&output.script_hash(), output_fk)?;
			}
		}

		let ins_fk = self.store.puts.put(&input_links)?;
		let outs_fk = self.store.puts.put(&output_links)?;
		debug_assert_eq!(outs_fk, ins_fk + input_links.len() as u64);

		let record = TxRecord {
			coinbase: tx.is_coinbase(),
			witless_size: tx.serialized_size(false) as u32,
			witness_size: tx.serialized_size(true) as u32,
			locktime: tx.locktime,
			version: tx.version,
			ins_count: tx.inputs.len() as u32,
			outs_count: tx.outputs.len() as u32,
			outs_fk,
		};
		self.store.tx.set(tx_fk, &hash, &record)?;
		self.store.tx.commit(tx_fk, &hash)?;
		Ok(tx_fk)
	}

	/// Store a block: header, any missing transactions, and the
	/// association; idempotent on the block hash.
	pub fn set_block(&self, block: &Block, context: &Context, milestone: bool)
		-> Result<Link>
	{
		let _guard = self.store.write_guard();

		let header_fk = self.set_header_internal(&block.header, context, milestone)?;
		if self.store.txs.exists(header_fk)? {
			self.store.maybe_flush()?;
			return Ok(header_fk);
		}

		// The block's wire size bounds its slab consumption; one grow
		// up front instead of one per transaction.
		let wire_size = block.serialized_size(true) as u64;
		self.store.input.reserve(wire_size)?;
		self.store.output.reserve(wire_size)?;

		let mut tx_fks = Vec::with_capacity(block.transactions.len());
		for tx in &block.transactions {
			tx_fks.push(self.set_tx_internal(tx)?);
		}

		self.store.txs.put(header_fk, &TxsRecord {
			wire_size: wire_size as u32,
			tx_fks: tx_fks.clone(),
		})?;

		self.set_prevouts(&tx_fks)?;
		self.store.maybe_flush()?;
		Ok(header_fk)
	}

	// Best-effort spend-metadata write-through; readers resolve through
	// the archive when a row is missing.
	fn set_prevouts(&self, tx_fks: &[Link]) -> Result<()> {
		let buckets = self.store.prevout.buckets();
		for &tx_fk in tx_fks {
			let record = match self.store.tx.get(tx_fk)? {
				Some(record) => record,
				None => continue,
			};
			if record.coinbase {
				continue;
			}
			for index in 0..record.ins_count {
				let spend_fk = record.ins_fk() + index as u64;
				if spend_fk >= buckets {
					continue;
				}
				if let Some(metadata) = self.resolve_spend_metadata(spend_fk)? {
					self.store.prevout.put(spend_fk, &metadata)?;
				}
			}
		}
		Ok(())
	}

	// Reads.
	// ------------------------------------------------------------------

	/// Reassemble a header from its record; `None` for unknown links.
	pub fn get_header(&self, header_fk: Link) -> Result<Option<Header>> {
		let record = match self.store.header.get(header_fk)? {
			Some(record) => record,
			None => return Ok(None),
		};
		let previous = if is_terminal(record.parent_fk) {
			NULL_HASH
		} else {
			self.store.header.get_key(record.parent_fk)?.unwrap_or(NULL_HASH)
		};
		Ok(Some(Header {
			version: record.version,
			previous,
			merkle_root: record.merkle_root,
			timestamp: record.timestamp,
			bits: record.bits,
			nonce: record.nonce,
		}))
	}

	/// Reassemble a transaction by joining its record, puts runs and
	/// slabs; `None` for unknown links.
	pub fn get_tx(&self, tx_fk: Link) -> Result<Option<Transaction>> {
		let record = match self.store.tx.get(tx_fk)? {
			Some(record) => record,
			None => return Ok(None),
		};

		let input_links = match self.store.puts
			.get_run(record.ins_fk(), record.ins_count as u64)?
		{
			Some(links) => links,
			None => return Ok(None),
		};
		let mut inputs = Vec::with_capacity(input_links.len());
		for input_fk in input_links {
			let slab = match self.store.input.get(input_fk)? {
				Some(slab) => slab,
				None => return Ok(None),
			};
			let point = if slab.point_index == NULL_POINT_INDEX {
				Point::null()
			} else {
				let hash = self.store.point.get_key(slab.point_fk)?.unwrap_or(NULL_HASH);
				Point { hash, index: slab.point_index }
			};
			inputs.push(Input {
				point,
				script: slab.script,
				witness: slab.witness,
				sequence: slab.sequence,
			});
		}

		let output_links = match self.store.puts
			.get_run(record.outs_fk, record.outs_count as u64)?
		{
			Some(links) => links,
			None => return Ok(None),
		};
		let mut outputs = Vec::with_capacity(output_links.len());
		for output_fk in output_links {
			let slab = match self.store.output.get(output_fk)? {
				Some(slab) => slab,
				None => return Ok(None),
			};
			outputs.push(Output { value: slab.value, script: slab.script });
		}

		Ok(Some(Transaction {
			version: record.version,
			inputs,
			outputs,
			locktime: record.locktime,
		}))
	}

	/// Reassemble a whole block; `None` when the header or association
	/// is unknown.
	///
	/// Holds the store's read guard so the join observes no
	/// mid-compound writer state.
	pub fn get_block(&self, header_fk: Link) -> Result<Option<Block>> {
		let _guard = self.store.read_guard();
		let header = match self.get_header(header_fk)? {
			Some(header) => header,
			None => return Ok(None),
		};
		let association = match self.store.txs.get(header_fk)? {
			Some(association) => association,
			None => return Ok(None),
		};

		let mut transactions = Vec::with_capacity(association.tx_fks.len());
		for tx_fk in association.tx_fks {
			match self.get_tx(tx_fk)? {
				Some(tx) => transactions.push(tx),
				None => return Ok(None),
			}
		}
		Ok(Some(Block { header, transactions }))
	}

	/// Ordered transaction links of a block.
	pub fn get_tx_keys(&self, header_fk: Link) -> Result<Vec<Link>> {
		Ok(self.store.txs.get(header_fk)?.map_or_else(Vec::new, |record| record.tx_fks))
	}

	/// Ordered transaction hashes of a block.
	pub fn get_tx_hashes(&self, header_fk: Link) -> Result<Vec<Hash>> {
		let mut hashes = Vec::new();
		for tx_fk in self.get_tx_keys(header_fk)? {
			match self.store.tx.get_key(tx_fk)? {
				Some(hash) => hashes.push(hash),
				None => return Ok(Vec::new()),
			}
		}
		Ok(hashes)
	}

	/// Every input slab spending `(tx, index)`, confirmed or not, in
	/// insertion order.
	pub fn get_spenders(&self, tx_fk: Link, index: u32) -> Result<Vec<Link>> {
		let hash = match self.store.tx.get_key(tx_fk)? {
			Some(hash) => hash,
			None => return Ok(Vec::new()),
		};
		let point_fk = self.store.point.first(&hash)?;
		if is_terminal(point_fk) {
			return Ok(Vec::new());
		}

		let mut spenders = Vec::new();
		self.store.input.scan(|link, record| {
			if record.point_fk == point_fk && record.point_index == index {
				spenders.push(link);
			}
			Ok(true)
		})?;
		Ok(spenders)
	}

	/// Spenders of an output identified by its slab link.
	pub fn get_output_spenders(&self, output_fk: Link) -> Result<Vec<Link>> {
		match self.locate_output(output_fk)? {
			Some((tx_fk, index)) => self.get_spenders(tx_fk, index),
			None => Ok(Vec::new()),
		}
	}

	// Finds the (tx, index) coordinates of an output slab link.
	pub(crate) fn locate_output(&self, output_fk: Link) -> Result<Option<(Link, u32)>> {
		let parent_fk = match self.store.output.get_parent(output_fk)? {
			Some(parent_fk) => parent_fk,
			None => return Ok(None),
		};
		let record = match self.store.tx.get(parent_fk)? {
			Some(record) => record,
			None => return Ok(None),
		};
		for index in 0..record.outs_count {
			if self.store.puts.get(record.outs_fk + index as u64)? == Some(output_fk) {
				return Ok(Some((parent_fk, index)));
			}
		}
		Ok(None)
	}

	// Spend metadata.
	// ------------------------------------------------------------------

	/// The input slab behind a spend link.
	pub(crate) fn get_spend(&self, spend_fk: Link) -> Result<Option<(Link, InputRecord)>> {
		let input_fk = match self.store.puts.get(spend_fk)? {
			Some(input_fk) => input_fk,
			None => return Ok(None),
		};
		Ok(self.store.input.get(input_fk)?.map(|record| (input_fk, record)))
	}

	/// Cached or archive-resolved metadata for a spend: the spent
	/// output, its coinbase flag and the claiming block's height.
	pub(crate) fn get_spend_metadata(&self, spend_fk: Link) -> Result<Option<PrevoutRecord>> {
		if spend_fk < self.store.prevout.buckets() {
			if let Some(cached) = self.store.prevout.get(spend_fk)? {
				return Ok(Some(cached));
			}
		}
		self.resolve_spend_metadata(spend_fk)
	}

	// Resolves spend metadata through the archive: prevout tx by point
	// hash, its strong block, its coinbase flag and output link.
	fn resolve_spend_metadata(&self, spend_fk: Link) -> Result<Option<PrevoutRecord>> {
		let (_, input) = match self.get_spend(spend_fk)? {
			Some(spend) => spend,
			None => return Ok(None),
		};
		if input.is_null_point() {
			return Ok(None);
		}

		let hash = match self.store.point.get_key(input.point_fk)? {
			Some(hash) => hash,
			None => return Ok(None),
		};
		let prevout_tx = self.store.tx.first(&hash)?;
		if is_terminal(prevout_tx) {
			return Ok(None);
		}

		let strong = match self.store.strong_tx.get(prevout_tx)? {
			Some(strong) => strong,
			None => return Ok(None),
		};
		if !strong.positive {
			return Ok(None);
		}

		let parent_height = match self.store.header.get_height(strong.header_fk)? {
			Some(height) => height,
			None => return Ok(None),
		};
		let coinbase = match self.store.tx.get_coinbase(prevout_tx)? {
			Some(coinbase) => coinbase,
			None => return Ok(None),
		};
		let output_fk = self.to_output(prevout_tx, input.point_index)?;
		if is_terminal(output_fk) {
			return Ok(None);
		}

		Ok(Some(PrevoutRecord { coinbase, parent_height, output_fk }))
	}
}
