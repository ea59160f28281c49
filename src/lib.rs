//! Memory-mapped archive of a proof-of-work blockchain.
//!
//! Assumptions:
//!
//! - append-only tables, each backed by a head and a body file
//!
//! - with blazingly fast key lookups over open-chained buckets
//!
//! - and stable links: once written, an element never moves
//!
//! - no individual deletes; the only shrink is truncation to a prior extent
//!
//! - a single process owns each database instance
//!
//! Each table element begins with a `next` link chaining it to the prior
//! element of the same bucket, followed by its search key (hashed tables
//! only) and a payload.
//!
//! ```text
//!  next   key        payload
//!   /     /          /
//! |...|........|...........|
//! ```
//!
//! The head file carries the body's logical extent and the bucket array.
//!
//! ```text
//!  count  bucket[0] .. bucket[n-1]
//!   /      /
//! |....|....|....|....|....|
//! ```
//!
//! A bucket holds the link of the most recently inserted element for that
//! bucket, or the terminal sentinel when empty.
//!
//! The tables compose into an archive of headers, transactions, inputs,
//! outputs and prevout points, with candidate/confirmed height indexes,
//! strong-transaction markers, validation caches and optional address and
//! compact-filter indexes. The [`Query`] layer translates between domain
//! objects and table records.

#![warn(missing_docs)]

extern crate byteorder;
#[macro_use]
extern crate error_chain;
extern crate fs2;
extern crate hex;
extern crate hex_slice;
extern crate itertools;
extern crate memmap;
extern crate parking_lot;
extern crate sha2;
extern crate tiny_keccak;
#[cfg(test)]
#[macro_use]
extern crate matches;
#[cfg(test)]
#[macro_use]
extern crate quickcheck;

pub mod chain;
mod error;
mod link;
mod primitives;
mod query;
mod serial;
mod settings;
mod storage;
mod store;
mod tables;

pub use error::{Code, CodeResult, Error, ErrorKind, Result};
pub use link::{Link, TERMINAL};
pub use query::Query;
pub use settings::Settings;
pub use store::{Event, Store, TableId};
pub use tables::context::Context;
