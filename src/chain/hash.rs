//! Double-sha256 hashing and the block-hash merkle fold.

use itertools::Itertools;
use sha2::{Digest, Sha256};

/// A 32-byte double-sha256 digest.
pub type Hash = [u8; 32];

/// The all-zero hash; marks null prevout points.
pub const NULL_HASH: Hash = [0u8; 32];

/// The little-endian hash of value one, used by tests and fixtures.
pub const ONE_HASH: Hash = [
	1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
	0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];

/// `sha256(sha256(data))`.
pub fn sha256d(data: &[u8]) -> Hash {
	let first = Sha256::digest(data);
	let second = Sha256::digest(&first);
	second.into()
}

fn paired(left: &Hash, right: &Hash) -> Hash {
	let mut buffer = [0u8; 64];
	buffer[..32].copy_from_slice(left);
	buffer[32..].copy_from_slice(right);
	sha256d(&buffer)
}

/// Reduce a list of hashes to its merkle root: pairwise double-sha256,
/// duplicating the last element of odd-length levels. An empty list
/// yields the null hash; a single hash is its own root.
pub fn merkle_root(mut hashes: Vec<Hash>) -> Hash {
	if hashes.is_empty() {
		return NULL_HASH;
	}

	while hashes.len() > 1 {
		if hashes.len() % 2 != 0 {
			let last = *hashes.last().expect("non-empty by the loop condition; qed");
			hashes.push(last);
		}
		hashes = hashes.into_iter()
			.tuples()
			.map(|(left, right)| paired(&left, &right))
			.collect();
	}

	hashes[0]
}
