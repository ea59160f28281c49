//! Append-only table without a search index.
//!
//! Links are record numbers or body byte offsets; the head file carries
//! only the body extent field (zero buckets).

use parking_lot::Mutex;

use error::{ErrorKind, Result};
use link::{Link, Linkage};
use primitives::head::Head;
use primitives::manager::{ElementSize, Manager};
use serial::Reader;
use storage::Storage;

#[derive(Debug)]
pub struct NoMap {
	head: Head,
	body: Manager,
	write_lock: Mutex<()>,
}

impl NoMap {
	pub fn new(
		head_storage: Storage,
		body_storage: Storage,
		link: Linkage,
		element: ElementSize,
	) -> NoMap {
		NoMap {
			head: Head::new(head_storage, link, 0),
			body: Manager::unlinked(body_storage, link, element),
			write_lock: Mutex::new(()),
		}
	}

	pub fn create(&self) -> Result<()> {
		self.head.create()
	}

	pub fn open(&self) -> Result<()> {
		self.head.open()?;
		self.restore()
	}

	pub fn verify(&self) -> Result<()> {
		self.head.verify()?;
		if !self.body.aligned() || self.body.fault().is_some() {
			bail!(ErrorKind::InvalidRecord("body"));
		}
		Ok(())
	}

	pub fn restore(&self) -> Result<()> {
		self.body.truncate(self.head.get_body_count()?)
	}

	pub fn close(&self) -> Result<()> {
		self.body.flush()?;
		self.head.set_body_count(self.body.count())?;
		self.head.flush()
	}

	pub fn backup(&self) -> Result<()> {
		self.close()
	}

	pub fn enabled(&self) -> bool {
		self.body.aligned()
	}

	pub fn count(&self) -> u64 {
		self.body.count()
	}

	pub fn body_size(&self) -> u64 {
		self.body.body_size()
	}

	/// Append one element, returning its link.
	pub fn put(&self, payload: &[u8]) -> Result<Link> {
		if let ElementSize::Record(size) = self.body.element() {
			if payload.len() != size {
				bail!(ErrorKind::InvalidRecord("record payload width"));
			}
		}

		let _guard = self.write_lock.lock();
		let chunks = match self.body.element() {
			ElementSize::Record(_) => 1,
			ElementSize::Slab => payload.len() as u64,
		};
		let link = self.body.allocate(chunks)?;
		self.body.set(link, payload)?;
		Ok(link)
	}

	/// Reserve `chunks` elements (records) or bytes (slabs).
	pub fn allocate(&self, chunks: u64) -> Result<Link> {
		let _guard = self.write_lock.lock();
		self.body.allocate(chunks)
	}

	/// Grow physical headroom without publishing logical size.
	pub fn reserve(&self, chunks: u64) -> Result<()> {
		self.body.reserve(chunks)
	}

	/// True when `link` is representable by this table's link width.
	pub fn addressable(&self, link: Link) -> bool {
		self.body.link().fits(link)
	}

	/// Write a payload at a pre-allocated link.
	pub fn set(&self, link: Link, payload: &[u8]) -> Result<()> {
		if let ElementSize::Record(size) = self.body.element() {
			if payload.len() != size {
				bail!(ErrorKind::InvalidRecord("record payload width"));
			}
		}
		self.body.set(link, payload)
	}

	/// Revert to a prior element count (records) or byte extent (slabs).
	pub fn truncate(&self, count: u64) -> Result<()> {
		self.body.truncate(count)
	}

	/// Read the element at `link` through `f`.
	pub fn read<T, F>(&self, link: Link, f: F) -> Result<Option<T>>
	where
		F: FnOnce(&mut Reader) -> Result<T>,
	{
		let accessor = match self.body.get(link) {
			Some(accessor) => accessor,
			None => return Ok(None),
		};
		let mut reader = Reader::new(accessor.as_slice());
		f(&mut reader).map(Some)
	}
}
