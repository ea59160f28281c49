//! Height and locator queries.

use chain::Hash;
use error::Result;
use link::{is_terminal, Link};
use query::Query;

impl<'a> Query<'a> {
	/// Top candidate height; `None` before initialization.
	pub fn get_top_candidate(&self) -> Option<u64> {
		self.store.candidate.top()
	}

	/// Top confirmed height; `None` before initialization.
	pub fn get_top_confirmed(&self) -> Option<u64> {
		self.store.confirmed.top()
	}

	/// Stored height of a header link.
	pub fn get_height(&self, header_fk: Link) -> Result<Option<u32>> {
		self.store.header.get_height(header_fk)
	}

	/// Header link at a candidate height; terminal past the top.
	pub fn to_candidate(&self, height: u64) -> Result<Link> {
		self.store.candidate.at(height)
	}

	/// Header link at a confirmed height; terminal past the top.
	pub fn to_confirmed(&self, height: u64) -> Result<Link> {
		self.store.confirmed.at(height)
	}

	/// Highest height at which the candidate and confirmed arrays
	/// agree; zero when only genesis is shared.
	pub fn get_fork(&self) -> Result<u64> {
		let candidate_top = self.store.candidate.top().unwrap_or(0);
		let confirmed_top = self.store.confirmed.top().unwrap_or(0);
		let mut height = ::std::cmp::min(candidate_top, confirmed_top);

		while height > 0 {
			let candidate = self.store.candidate.at(height)?;
			if !is_terminal(candidate) && candidate == self.store.confirmed.at(height)? {
				break;
			}
			height -= 1;
		}
		Ok(height)
	}

	/// The exponential back-off height list from `top` down to zero:
	/// ten unit steps, then doubling.
	pub fn get_locator_heights(top: u64) -> Vec<u64> {
		let mut heights = Vec::new();
		let mut height = top as i64;
		let mut step = 1i64;

		while height > 0 {
			heights.push(height as u64);
			if heights.len() >= 10 {
				step *= 2;
			}
			height -= step;
		}
		heights.push(0);
		heights
	}

	/// Confirmed block hashes at the locator heights.
	pub fn get_locator(&self) -> Result<Vec<Hash>> {
		let top = match self.store.confirmed.top() {
			Some(top) => top,
			None => return Ok(Vec::new()),
		};

		let mut locator = Vec::new();
		for height in Self::get_locator_heights(top) {
			let header_fk = self.store.confirmed.at(height)?;
			if is_terminal(header_fk) {
				continue;
			}
			if let Some(hash) = self.store.header.get_key(header_fk)? {
				locator.push(hash);
			}
		}
		Ok(locator)
	}
}
