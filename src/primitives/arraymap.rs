//! Array-indexed table: the key is the bucket index.

use parking_lot::Mutex;

use error::{ErrorKind, Result};
use link::{is_terminal, Link, Linkage};
use primitives::head::ArrayHead;
use primitives::iterator::ElementIter;
use primitives::manager::{ElementSize, Manager};
use serial::{Reader, Writer};
use storage::Storage;

/// Integer-keyed table over a head/body storage pair.
///
/// Elements store no key; every element chained from a bucket belongs
/// to that bucket's key. Multiple entries per key chain newest-first,
/// like the hashed variant.
#[derive(Debug)]
pub struct ArrayMap {
	head: ArrayHead,
	body: Manager,
	write_lock: Mutex<()>,
}

impl ArrayMap {
	pub fn new(
		head_storage: Storage,
		body_storage: Storage,
		buckets: u64,
		link: Linkage,
		element: ElementSize,
	) -> ArrayMap {
		ArrayMap {
			head: ArrayHead::new(head_storage, link, buckets),
			body: Manager::new(body_storage, link, 0, element),
			write_lock: Mutex::new(()),
		}
	}

	pub fn create(&self) -> Result<()> {
		self.head.head().create()
	}

	pub fn open(&self) -> Result<()> {
		self.head.head().open()?;
		self.restore()
	}

	pub fn verify(&self) -> Result<()> {
		self.head.head().verify()?;
		if !self.body.aligned() || self.body.fault().is_some() {
			bail!(ErrorKind::InvalidRecord("body"));
		}
		Ok(())
	}

	pub fn restore(&self) -> Result<()> {
		self.body.truncate(self.head.head().get_body_count()?)
	}

	pub fn close(&self) -> Result<()> {
		self.body.flush()?;
		self.head.head().set_body_count(self.body.count())?;
		self.head.head().flush()
	}

	pub fn backup(&self) -> Result<()> {
		self.close()
	}

	pub fn enabled(&self) -> bool {
		self.head.head().buckets() > 0 && self.body.aligned()
	}

	pub fn buckets(&self) -> u64 {
		self.head.head().buckets()
	}

	pub fn count(&self) -> u64 {
		self.body.count()
	}

	pub fn body_size(&self) -> u64 {
		self.body.body_size()
	}

	/// The most recent element link for `key`; terminal when absent.
	pub fn at(&self, key: u64) -> Result<Link> {
		self.head.at(key)
	}

	pub fn exists(&self, key: u64) -> Result<bool> {
		Ok(!is_terminal(self.at(key)?))
	}

	/// An iterator over every element chained under `key`.
	pub fn it(&self, key: u64) -> Result<ElementIter> {
		let top = self.head.at(key)?;
		Ok(ElementIter::new(&self.body, top, Vec::new(), key))
	}

	/// Append an element under `key`, returning its link.
	pub fn put(&self, key: u64, payload: &[u8]) -> Result<Link> {
		if let ElementSize::Record(size) = self.body.element() {
			if payload.len() != size {
				bail!(ErrorKind::InvalidRecord("record payload width"));
			}
		}

		let _guard = self.write_lock.lock();
		let top = self.head.at(key)?;
		let chunks = match self.body.element() {
			ElementSize::Record(_) => 1,
			ElementSize::Slab => (self.body.link().size() + payload.len()) as u64,
		};
		let link = self.body.allocate(chunks)?;

		let mut writer = Writer::with_capacity(self.body.link().size() + payload.len());
		self.body.link().write(&mut writer, top)?;
		writer.write_bytes(payload);
		self.body.set(link, &writer.into_vec())?;

		self.head.head().set_top(key, link)?;
		Ok(link)
	}

	/// Read an element's payload through `f`, positioned past the
	/// `next` field.
	pub fn read<T, F>(&self, link: Link, f: F) -> Result<Option<T>>
	where
		F: FnOnce(&mut Reader) -> Result<T>,
	{
		let accessor = match self.body.get(link) {
			Some(accessor) => accessor,
			None => return Ok(None),
		};
		let mut reader = Reader::new(accessor.as_slice());
		self.body.link().read(&mut reader)?;
		f(&mut reader).map(Some)
	}

	/// Read the most recent payload for `key`.
	pub fn read_at<T, F>(&self, key: u64, f: F) -> Result<Option<T>>
	where
		F: FnOnce(&mut Reader) -> Result<T>,
	{
		let top = self.head.at(key)?;
		if is_terminal(top) {
			return Ok(None);
		}
		self.read(top, f)
	}
}
