//! Concrete schema tables binding the generic templates to fixed
//! record layouts.

macro_rules! lifecycle {
	($field:ident) => {
		pub fn create(&self) -> Result<()> { self.$field.create() }
		pub fn open(&self) -> Result<()> { self.$field.open() }
		pub fn verify(&self) -> Result<()> { self.$field.verify() }
		pub fn restore(&self) -> Result<()> { self.$field.restore() }
		pub fn close(&self) -> Result<()> { self.$field.close() }
		pub fn backup(&self) -> Result<()> { self.$field.backup() }
		pub fn enabled(&self) -> bool { self.$field.enabled() }
		pub fn body_size(&self) -> u64 { self.$field.body_size() }
		pub fn count(&self) -> u64 { self.$field.count() }
	}
}

pub mod address;
pub mod context;
pub mod filter_bk;
pub mod filter_tx;
pub mod header;
pub mod height;
pub mod input;
pub mod output;
pub mod point;
pub mod prevout;
pub mod puts;
pub mod strong_tx;
pub mod transaction;
pub mod txs;
pub mod validated_bk;
pub mod validated_tx;
