//! Walk of a bucket chain, matching a search key.

use error::{ErrorKind, Result};
use link::{is_terminal, Link, TERMINAL};
use primitives::manager::Manager;
use serial::Reader;

/// Lazy traversal of the linked elements sharing one bucket.
///
/// Each element is read under its own shared lock; the walk is bounded
/// by the body element count to catch corrupted (looping) chains. With
/// an empty sought key every element matches, which is how array chains
/// iterate.
pub struct ElementIter<'a> {
	manager: &'a Manager,
	key: Vec<u8>,
	current: Link,
	candidate: Link,
	bucket: u64,
}

impl<'a> ElementIter<'a> {
	pub fn new(manager: &'a Manager, start: Link, key: Vec<u8>, bucket: u64) -> ElementIter<'a> {
		ElementIter {
			manager,
			key,
			current: TERMINAL,
			candidate: start,
			bucket,
		}
	}

	/// The link of the element last matched; terminal before the first
	/// advance and after exhaustion.
	pub fn self_link(&self) -> Link {
		self.current
	}

	/// The sought key, unchanged regardless of walk state.
	pub fn key(&self) -> &[u8] {
		&self.key
	}

	/// Exhaust the walk while preserving the key.
	pub fn reset(&mut self) {
		self.current = TERMINAL;
		self.candidate = TERMINAL;
	}

	/// Advance to the next element whose stored key matches, following
	/// `next` links until a match or the terminal.
	pub fn advance(&mut self) -> Result<Option<Link>> {
		let mut steps = 0u64;
		let bound = self.manager.count() + 1;

		let mut candidate = self.candidate;
		while !is_terminal(candidate) {
			steps += 1;
			if steps > bound {
				bail!(ErrorKind::ChainLoop(self.bucket));
			}

			let (next, matched) = self.probe(candidate)?;
			if matched {
				self.current = candidate;
				self.candidate = next;
				return Ok(Some(candidate));
			}
			candidate = next;
		}

		self.current = TERMINAL;
		self.candidate = TERMINAL;
		Ok(None)
	}

	// Reads one element's next link and compares its stored key. A
	// link past the body extent (a head published before a crash that
	// was truncated away by restore) ends the chain.
	fn probe(&self, link: Link) -> Result<(Link, bool)> {
		let accessor = match self.manager.get(link) {
			Some(accessor) => accessor,
			None => return Ok((TERMINAL, false)),
		};
		let mut reader = Reader::new(accessor.as_slice());
		let next = self.manager.link().read(&mut reader)?;
		let stored = reader.read_bytes(self.manager.key_size())?;
		// Stored keys may be shorter than the sought hash; compare the
		// stored width.
		let matched = stored == &self.key[..self.manager.key_size()];
		Ok((next, matched))
	}
}
