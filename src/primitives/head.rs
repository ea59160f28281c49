//! Table head: body extent field plus the bucket array.

use error::{ErrorKind, Result};
use link::{Link, Linkage, TERMINAL};
use serial::{Reader, Writer};
use storage::Storage;

/// A fast non-cryptographic fold using every key byte.
///
/// Bucket selection masks this down to the table's power-of-two bucket
/// count.
pub fn unique_hash(key: &[u8]) -> u64 {
	let mut hash = 5381u64;
	for &byte in key {
		hash = (hash << 5).wrapping_add(hash) ^ byte as u64;
	}
	hash
}

/// Head file: `count(L) | bucket[0](L) | .. | bucket[buckets-1](L)`.
///
/// The leading field carries the body's logical element count (records)
/// or byte extent (slabs) and is the recovery authority across restart.
#[derive(Debug)]
pub struct Head {
	storage: Storage,
	link: Linkage,
	buckets: u64,
}

impl Head {
	pub fn new(storage: Storage, link: Linkage, buckets: u64) -> Head {
		Head { storage, link, buckets }
	}

	pub fn buckets(&self) -> u64 {
		self.buckets
	}

	fn extent(&self) -> u64 {
		(1 + self.buckets) * self.link.size() as u64
	}

	fn bucket_offset(&self, bucket: u64) -> u64 {
		(1 + bucket) * self.link.size() as u64
	}

	/// Write a zero count and fill every bucket with terminal.
	pub fn create(&self) -> Result<()> {
		let offset = self.storage.allocate(self.extent())?;
		debug_assert_eq!(offset, 0);
		self.reset()
	}

	/// Reinitialize an already-created head in place.
	pub fn reset(&self) -> Result<()> {
		let mut writer = Writer::with_capacity(self.extent() as usize);
		writer.write_uint(0, self.link.size());
		for _ in 0..self.buckets {
			self.link.write(&mut writer, TERMINAL)?;
		}
		self.storage.set(0, &writer.into_vec())
	}

	/// Clamp a freshly opened head to its fixed extent and check it.
	pub fn open(&self) -> Result<()> {
		if self.storage.size() >= self.extent() {
			self.storage.truncate(self.extent())?;
		}
		self.verify()
	}

	pub fn verify(&self) -> Result<()> {
		if self.storage.size() != self.extent() {
			bail!(ErrorKind::InvalidRecord("head"));
		}
		Ok(())
	}

	pub fn get_body_count(&self) -> Result<u64> {
		let accessor = self.storage.get(0);
		let mut reader = Reader::new(accessor.as_slice());
		reader.read_uint(self.link.size())
	}

	pub fn set_body_count(&self, count: u64) -> Result<()> {
		let mut writer = Writer::with_capacity(self.link.size());
		writer.write_uint(count, self.link.size());
		self.storage.set(0, &writer.into_vec())
	}

	/// The head link of `bucket`.
	pub fn top(&self, bucket: u64) -> Result<Link> {
		if bucket >= self.buckets {
			bail!(ErrorKind::LinkWidth(self.link.size(), bucket));
		}
		let accessor = self.storage.get(self.bucket_offset(bucket));
		self.link.get(accessor.as_slice())
	}

	/// Overwrite the bucket head link. This is the publish step: the
	/// element body (including its `next` field) must already be
	/// written.
	pub fn set_top(&self, bucket: u64, link: Link) -> Result<()> {
		if bucket >= self.buckets {
			bail!(ErrorKind::LinkWidth(self.link.size(), bucket));
		}
		let mut writer = Writer::with_capacity(self.link.size());
		self.link.write(&mut writer, link)?;
		self.storage.set(self.bucket_offset(bucket), &writer.into_vec())
	}

	/// Store `current` as the bucket head, returning the displaced link.
	///
	/// The returned link becomes the pushed element's `next`; callers
	/// must have written the element body before calling.
	pub fn push(&self, current: Link, bucket: u64) -> Result<Link> {
		let next = self.top(bucket)?;
		self.set_top(bucket, current)?;
		Ok(next)
	}

	pub fn flush(&self) -> Result<()> {
		self.storage.flush()
	}
}

/// Head variant bucketing by `unique_hash(key) & (buckets - 1)`.
#[derive(Debug)]
pub struct HashHead {
	head: Head,
}

impl HashHead {
	pub fn new(storage: Storage, link: Linkage, buckets: u64) -> HashHead {
		assert!(buckets.is_power_of_two(), "hash bucket counts must be powers of two");
		HashHead { head: Head::new(storage, link, buckets) }
	}

	pub fn head(&self) -> &Head {
		&self.head
	}

	pub fn index(&self, key: &[u8]) -> u64 {
		unique_hash(key) & (self.head.buckets() - 1)
	}

	pub fn top(&self, key: &[u8]) -> Result<Link> {
		self.head.top(self.index(key))
	}

	pub fn push(&self, current: Link, key: &[u8]) -> Result<Link> {
		self.head.push(current, self.index(key))
	}
}

/// Head variant where the key is the bucket index.
#[derive(Debug)]
pub struct ArrayHead {
	head: Head,
}

impl ArrayHead {
	pub fn new(storage: Storage, link: Linkage, buckets: u64) -> ArrayHead {
		ArrayHead { head: Head::new(storage, link, buckets) }
	}

	pub fn head(&self) -> &Head {
		&self.head
	}

	/// The stored link at `key`; terminal when never pushed.
	pub fn at(&self, key: u64) -> Result<Link> {
		self.head.top(key)
	}

	pub fn push(&self, current: Link, key: u64) -> Result<Link> {
		self.head.push(current, key)
	}
}
