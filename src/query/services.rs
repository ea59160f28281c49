//! Merkle services over the confirmed-header array.
//!
//! The confirmed chain is treated as a merkle tree of block hashes up
//! to a caller-chosen waypoint. Whole intervals of `2^interval_depth`
//! leaves can be summarized by cached subroots so proofs skip them.

use itertools::Itertools;

use chain::{merkle_root, Hash, NULL_HASH};
use error::{Code, CodeResult, Result};
use link::is_terminal;
use query::Query;

impl<'a> Query<'a> {
	/// Leaves per cached interval; `max` when the cache is disabled,
	/// which collapses everything into a single interval.
	pub fn interval_span(&self) -> u64 {
		let depth = self.store.settings.external.interval_depth;
		if depth >= 64 {
			::std::u64::MAX
		} else {
			1 << depth
		}
	}

	// Confirmed block hash at `height`.
	fn confirmed_hash(&self, height: u64) -> Result<Option<Hash>> {
		let header_fk = self.store.confirmed.at(height)?;
		if is_terminal(header_fk) {
			return Ok(None);
		}
		self.store.header.get_key(header_fk)
	}

	// Confirmed block hashes over `[first, last]`.
	fn confirmed_hashes(&self, first: u64, last: u64) -> Result<Option<Vec<Hash>>> {
		let mut hashes = Vec::with_capacity((last - first + 1) as usize);
		for height in first..last + 1 {
			match self.confirmed_hash(height)? {
				Some(hash) => hashes.push(hash),
				None => return Ok(None),
			}
		}
		Ok(Some(hashes))
	}

	/// Compute and cache the subroot of the interval ending at
	/// `height`; `None` unless `height` is an interval's last leaf.
	pub fn create_interval(&self, header_fk: u64, height: u64) -> Result<Option<Hash>> {
		let span = self.interval_span();
		if span == ::std::u64::MAX || (height + 1) % span != 0 {
			return Ok(None);
		}
		if self.store.confirmed.at(height)? != header_fk {
			return Ok(None);
		}

		let first = height + 1 - span;
		let hashes = match self.confirmed_hashes(first, height)? {
			Some(hashes) => hashes,
			None => return Ok(None),
		};
		let root = merkle_root(hashes);
		self.store.interval_cache.lock().insert(height / span, root);
		Ok(Some(root))
	}

	/// The cached subroot covering the interval that ends at `height`;
	/// recomputed on a cache miss. `None` for heights that are not an
	/// interval's last leaf.
	pub fn get_confirmed_interval(&self, height: u64) -> Result<Option<Hash>> {
		let span = self.interval_span();
		if span == ::std::u64::MAX || (height + 1) % span != 0 {
			return Ok(None);
		}

		if let Some(&root) = self.store.interval_cache.lock().get(&(height / span)) {
			return Ok(Some(root));
		}

		let first = height + 1 - span;
		let hashes = match self.confirmed_hashes(first, height)? {
			Some(hashes) => hashes,
			None => return Ok(None),
		};
		let root = merkle_root(hashes);
		self.store.interval_cache.lock().insert(height / span, root);
		Ok(Some(root))
	}

	/// Fold `from` down to its root, appending the sibling of
	/// `target_index` at every level onto `to`.
	///
	/// Odd-length levels duplicate their last element before pairing; a
	/// sibling that is the duplicate of the target itself reveals
	/// nothing and is skipped. The final root is not appended.
	pub fn merge_merkle(to: &mut Vec<Hash>, mut from: Vec<Hash>, mut target_index: usize) {
		while from.len() > 1 {
			let width = from.len();
			if width % 2 != 0 {
				let last = *from.last().expect("non-empty by the loop condition; qed");
				from.push(last);
			}

			let sibling = target_index ^ 1;
			if sibling < width {
				to.push(from[sibling]);
			}

			from = from.into_iter()
				.tuples()
				.map(|(left, right)| merkle_root(vec![left, right]))
				.collect();
			target_index /= 2;
		}
	}

	/// The sibling path from `target_height` up to `waypoint_height`,
	/// using `roots` as precomputed interval subroots to skip whole
	/// intervals.
	pub fn get_merkle_proof(&self, roots: &[Hash], target_height: u64, waypoint_height: u64)
		-> CodeResult<Vec<Hash>>
	{
		let top = match self.store.confirmed.top() {
			Some(top) => top,
			None => return Err(Code::MerkleProof),
		};
		if top < target_height {
			return Err(Code::MerkleProof);
		}

		let span = self.interval_span();
		let (interval, first) = if span == ::std::u64::MAX {
			(0, 0)
		} else {
			(target_height / span, target_height / span * span)
		};
		let last = if span == ::std::u64::MAX {
			waypoint_height
		} else {
			::std::cmp::min(first + span - 1, waypoint_height)
		};

		let leaves = match self.confirmed_hashes(first, last) {
			Ok(Some(leaves)) => leaves,
			_ => return Err(Code::MerkleProof),
		};

		let mut proof = Vec::new();
		Self::merge_merkle(&mut proof, leaves, (target_height - first) as usize);
		if !roots.is_empty() {
			Self::merge_merkle(&mut proof, roots.to_vec(), interval as usize);
		}
		Ok(proof)
	}

	/// The merkle tree of all confirmed blocks up to the waypoint,
	/// reduced to a single root (the block hash itself at waypoint
	/// zero).
	pub fn get_merkle_tree(&self, waypoint_height: u64) -> CodeResult<Vec<Hash>> {
		let top = match self.store.confirmed.top() {
			Some(top) => top,
			None => return Err(Code::MerkleNotFound),
		};
		if waypoint_height > top {
			return Err(Code::MerkleNotFound);
		}

		match self.confirmed_hashes(0, waypoint_height) {
			Ok(Some(hashes)) => Ok(vec![merkle_root(hashes)]),
			_ => Err(Code::MerkleNotFound),
		}
	}

	/// The root at `waypoint_height`; null on any failure.
	pub fn get_merkle_root(&self, waypoint_height: u64) -> Hash {
		match self.get_merkle_tree(waypoint_height) {
			Ok(tree) => tree[0],
			Err(_) => NULL_HASH,
		}
	}

	/// Root and sibling path in one call.
	pub fn get_merkle_root_and_proof(&self, target_height: u64, waypoint_height: u64)
		-> CodeResult<(Hash, Vec<Hash>)>
	{
		if target_height > waypoint_height {
			return Err(Code::MerkleArguments);
		}
		let top = match self.store.confirmed.top() {
			Some(top) => top,
			None => return Err(Code::MerkleNotFound),
		};
		if waypoint_height > top {
			return Err(Code::MerkleNotFound);
		}

		let span = self.interval_span();
		let roots = if span == ::std::u64::MAX {
			Vec::new()
		} else {
			let mut roots = Vec::new();
			let mut first = 0u64;
			while first <= waypoint_height {
				let last = ::std::cmp::min(first + span - 1, waypoint_height);
				if last == first + span - 1 {
					match self.get_confirmed_interval(last) {
						Ok(Some(root)) => roots.push(root),
						_ => return Err(Code::MerkleProof),
					}
				} else {
					match self.confirmed_hashes(first, last) {
						Ok(Some(hashes)) => roots.push(merkle_root(hashes)),
						_ => return Err(Code::MerkleProof),
					}
				}
				first += span;
			}
			roots
		};

		let proof = self.get_merkle_proof(&roots, target_height, waypoint_height)?;
		let root = self.get_merkle_root(waypoint_height);
		Ok((root, proof))
	}
}
