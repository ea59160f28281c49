//! Body bounds, allocation and truncation with record/slab addressing.

use error::{ErrorKind, Result};
use link::{is_terminal, Link, Linkage};
use storage::{Accessor, Fault, Storage};

/// Element sizing: fixed records (link units are records) or
/// variable-size slabs (link units are bytes).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementSize {
	/// Fixed payload byte size, excluding the `next` field and key.
	Record(usize),
	/// Self-delimiting variable payloads.
	Slab,
}

impl ElementSize {
	pub fn is_slab(&self) -> bool {
		match *self {
			ElementSize::Record(_) => false,
			ElementSize::Slab => true,
		}
	}
}

/// Addressing over one body storage.
#[derive(Debug)]
pub struct Manager {
	storage: Storage,
	link: Linkage,
	key_size: usize,
	element: ElementSize,
	linked: bool,
}

impl Manager {
	pub fn new(storage: Storage, link: Linkage, key_size: usize, element: ElementSize) -> Manager {
		Manager { storage, link, key_size, element, linked: true }
	}

	/// A body of bare elements with no `next` field and no key, for
	/// tables addressed by record number or byte offset alone.
	pub fn unlinked(storage: Storage, link: Linkage, element: ElementSize) -> Manager {
		Manager { storage, link, key_size: 0, element, linked: false }
	}

	pub fn link(&self) -> Linkage {
		self.link
	}

	pub fn key_size(&self) -> usize {
		self.key_size
	}

	pub fn element(&self) -> ElementSize {
		self.element
	}

	/// Full element stride: `next` link plus key plus record payload.
	/// Meaningless for slabs.
	pub fn stride(&self) -> u64 {
		let overhead = if self.linked { self.link.size() + self.key_size } else { 0 };
		match self.element {
			ElementSize::Record(payload) => (overhead + payload) as u64,
			ElementSize::Slab => 1,
		}
	}

	/// Logical element count (records) or byte extent (slabs).
	pub fn count(&self) -> u64 {
		match self.element {
			ElementSize::Record(_) => self.storage.size() / self.stride(),
			ElementSize::Slab => self.storage.size(),
		}
	}

	pub fn body_size(&self) -> u64 {
		self.storage.size()
	}

	/// Extend the body by `chunks` records or bytes, returning the link
	/// of the new region's start.
	pub fn allocate(&self, chunks: u64) -> Result<Link> {
		let bytes = match self.element {
			ElementSize::Record(_) => chunks * self.stride(),
			ElementSize::Slab => chunks,
		};
		let offset = self.storage.allocate(bytes)?;
		let link = match self.element {
			ElementSize::Record(_) => offset / self.stride(),
			ElementSize::Slab => offset,
		};
		if !self.link.fits(link) {
			bail!(ErrorKind::LinkWidth(self.link.size(), link));
		}
		Ok(link)
	}

	/// Grow physical headroom for `chunks` records or bytes without
	/// publishing any logical size change.
	pub fn reserve(&self, chunks: u64) -> Result<()> {
		let bytes = match self.element {
			ElementSize::Record(_) => chunks * self.stride(),
			ElementSize::Slab => chunks,
		};
		self.storage.reserve(bytes)
	}

	/// The body storage's sticky fault, if any.
	pub fn fault(&self) -> Option<Fault> {
		self.storage.fault()
	}

	/// Revert the body to a prior logical extent.
	pub fn truncate(&self, count: u64) -> Result<()> {
		let bytes = match self.element {
			ElementSize::Record(_) => count * self.stride(),
			ElementSize::Slab => count,
		};
		self.storage.truncate(bytes)
	}

	pub fn offset(&self, link: Link) -> u64 {
		match self.element {
			ElementSize::Record(_) => link * self.stride(),
			ElementSize::Slab => link,
		}
	}

	/// Accessor over `[element start, body size)`; `None` for terminal
	/// or out-of-extent links.
	pub fn get(&self, link: Link) -> Option<Accessor> {
		if is_terminal(link) {
			return None;
		}
		let accessor = self.storage.get(self.offset(link));
		if accessor.is_empty() {
			None
		} else {
			Some(accessor)
		}
	}

	pub fn set(&self, link: Link, data: &[u8]) -> Result<()> {
		self.storage.set(self.offset(link), data)
	}

	pub fn flush(&self) -> Result<()> {
		self.storage.flush()
	}

	/// True when the body extent is consistent with the element sizing.
	pub fn aligned(&self) -> bool {
		match self.element {
			ElementSize::Record(_) => self.storage.size() % self.stride() == 0,
			ElementSize::Slab => true,
		}
	}
}
