//! Memory-mapped byte storage with a logical/physical size split.
//!
//! One `Storage` backs one file. The logical `size` is the committed
//! extent; the physical `capacity` is the mapped file length and may
//! exceed it. Readers receive [`Accessor`]s that hold the map lock
//! shared for their lifetime, so the mapping cannot be re-pointed
//! underneath them while an append forces a growth-and-remap.

use std::fs;
use std::path::{Path, PathBuf};

use memmap::{Mmap, Protection};
use parking_lot::{Mutex, RwLock, RwLockReadGuard};

use error::{ErrorKind, Result};

/// Storage never maps less than this; mapping an empty file fails.
const MIN_CAPACITY: u64 = 64;

/// Sticky storage fault categories.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fault {
	/// Allocation beyond the addressable extent.
	Eof,
	/// Truncation past the live extent.
	Truncate,
	/// Read past the committed extent.
	Read,
	/// Underlying file or mapping failure.
	Io,
}

#[derive(Debug)]
struct Fields {
	size: u64,
	capacity: u64,
}

/// A file-backed byte buffer with stable addresses for concurrent reads.
#[derive(Debug)]
pub struct Storage {
	path: PathBuf,
	map: RwLock<Mmap>,
	fields: RwLock<Fields>,
	fault: Mutex<Option<Fault>>,
	growth: u64,
}

impl Storage {
	/// Create a fresh storage file with the given initial reserve.
	///
	/// The logical size starts at zero; `reserve` only sets capacity.
	pub fn create<P: AsRef<Path>>(path: P, reserve: u64, growth: u64) -> Result<Storage> {
		let capacity = ::std::cmp::max(reserve, MIN_CAPACITY);
		{
			let file = fs::OpenOptions::new()
				.write(true)
				.create_new(true)
				.open(path.as_ref())?;
			file.set_len(capacity)?;
			file.sync_all()?;
		}

		let map = Mmap::open_path(path.as_ref(), Protection::ReadWrite)?;
		Ok(Storage {
			path: path.as_ref().to_owned(),
			map: RwLock::new(map),
			fields: RwLock::new(Fields { size: 0, capacity }),
			fault: Mutex::new(None),
			growth,
		})
	}

	/// Map an existing storage file.
	///
	/// The logical size starts at the file length; the owning table
	/// truncates back to the authoritative extent recorded in its head.
	pub fn open<P: AsRef<Path>>(path: P, growth: u64) -> Result<Storage> {
		let len = fs::metadata(path.as_ref())?.len();
		if len < MIN_CAPACITY {
			let file = fs::OpenOptions::new().write(true).open(path.as_ref())?;
			file.set_len(MIN_CAPACITY)?;
		}
		let map = Mmap::open_path(path.as_ref(), Protection::ReadWrite)?;
		let capacity = map.len() as u64;
		Ok(Storage {
			path: path.as_ref().to_owned(),
			map: RwLock::new(map),
			fields: RwLock::new(Fields { size: len, capacity }),
			fault: Mutex::new(None),
			growth,
		})
	}

	/// Committed byte count.
	pub fn size(&self) -> u64 {
		self.fields.read().size
	}

	/// Physical allocation; may exceed `size`.
	pub fn capacity(&self) -> u64 {
		self.fields.read().capacity
	}

	/// The sticky fault, if any operation has failed.
	pub fn fault(&self) -> Option<Fault> {
		*self.fault.lock()
	}

	fn fail(&self, fault: Fault) {
		let mut slot = self.fault.lock();
		if slot.is_none() {
			*slot = Some(fault);
		}
	}

	/// Extend the logical size by `chunk` bytes, returning the start
	/// offset of the new region.
	pub fn allocate(&self, chunk: u64) -> Result<u64> {
		let mut fields = self.fields.write();
		let offset = fields.size;
		let needed = match offset.checked_add(chunk) {
			Some(needed) => needed,
			None => {
				self.fail(Fault::Eof);
				bail!(ErrorKind::BodyEof(chunk, fields.capacity));
			}
		};

		if needed > fields.capacity {
			let grown = fields.capacity + fields.capacity * self.growth / 100;
			let capacity = ::std::cmp::max(needed, grown);
			self.remap(capacity)?;
			fields.capacity = capacity;
		}

		fields.size = needed;
		Ok(offset)
	}

	/// Grow the physical capacity to at least `size` without publishing
	/// any logical size change.
	pub fn expand(&self, size: u64) -> Result<()> {
		let mut fields = self.fields.write();
		if size <= fields.capacity {
			return Ok(());
		}
		self.remap(size)?;
		fields.capacity = size;
		Ok(())
	}

	/// Reserve `chunk` bytes of headroom past the current logical size.
	pub fn reserve(&self, chunk: u64) -> Result<()> {
		let needed = {
			let fields = self.fields.read();
			match fields.size.checked_add(chunk) {
				Some(needed) => needed,
				None => {
					self.fail(Fault::Eof);
					bail!(ErrorKind::BodyEof(chunk, fields.capacity));
				}
			}
		};
		self.expand(needed)
	}

	/// Shrink the logical size. Fails when `size` exceeds the current
	/// extent; capacity is left untouched.
	pub fn truncate(&self, size: u64) -> Result<()> {
		let mut fields = self.fields.write();
		if size > fields.size {
			self.fail(Fault::Truncate);
			bail!(ErrorKind::TruncateBeyondExtent(size, fields.size));
		}
		fields.size = size;
		Ok(())
	}

	/// Copy `data` into the committed region at `offset`.
	pub fn set(&self, offset: u64, data: &[u8]) -> Result<()> {
		let end = offset + data.len() as u64;
		if end > self.size() {
			self.fail(Fault::Read);
			bail!(ErrorKind::Exhausted(data.len(), (self.size().saturating_sub(offset)) as usize));
		}
		let mut map = self.map.write();
		unsafe {
			map.as_mut_slice()[offset as usize..end as usize].copy_from_slice(data);
		}
		Ok(())
	}

	/// Shared-lock view of `[offset, size)`. Empty when `offset` is at
	/// or past the committed extent.
	pub fn get(&self, offset: u64) -> Accessor {
		let size = self.size();
		let guard = self.map.read();
		if offset >= size {
			return Accessor { guard, offset: 0, end: 0 };
		}
		Accessor {
			guard,
			offset: offset as usize,
			end: size as usize,
		}
	}

	/// Shared-lock view of `[offset, capacity)`.
	pub fn get_capacity(&self, offset: u64) -> Accessor {
		let capacity = self.capacity();
		let guard = self.map.read();
		if offset >= capacity {
			return Accessor { guard, offset: 0, end: 0 };
		}
		Accessor {
			guard,
			offset: offset as usize,
			end: capacity as usize,
		}
	}

	/// Flush the mapping to disk.
	pub fn flush(&self) -> Result<()> {
		self.map.write().flush()?;
		Ok(())
	}

	// Grows the file and re-points the mapping. Callers hold the field
	// write lock; taking the map write lock here waits out accessors.
	fn remap(&self, capacity: u64) -> Result<()> {
		let mut map = self.map.write();
		map.flush().and_then(|_| {
			let file = fs::OpenOptions::new().write(true).open(&self.path)?;
			file.set_len(capacity)?;
			let remapped = Mmap::open_path(&self.path, Protection::ReadWrite)?;
			*map = remapped;
			Ok(())
		}).map_err(|err| {
			self.fail(Fault::Io);
			err.into()
		})
	}
}

/// A shared-lock view into a storage mapping.
///
/// The accessor holds the map lock shared; drops release it.
pub struct Accessor<'a> {
	guard: RwLockReadGuard<'a, Mmap>,
	offset: usize,
	end: usize,
}

impl<'a> Accessor<'a> {
	/// The viewed bytes.
	pub fn as_slice(&self) -> &[u8] {
		unsafe { &self.guard.as_slice()[self.offset..self.end] }
	}

	pub fn is_empty(&self) -> bool {
		self.offset >= self.end
	}
}
