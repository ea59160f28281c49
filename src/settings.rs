//! Store configuration and the derived internal parameters.

use std::path::PathBuf;

use error::{ErrorKind, Result};
use link::Linkage;

/// `interval_depth` value disabling the confirmed-interval merkle cache.
pub const INTERVAL_DISABLED: u8 = ::std::u8::MAX;

/// External store configuration.
///
/// Bucket counts apply to the hashed and array-indexed tables and must
/// be powers of two; `*_size` fields are initial body reserves in
/// bytes. `minimize` selects the narrow link-width profile, shrinking
/// records at the cost of addressable extent.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
	/// Storage root directory.
	pub path: PathBuf,
	/// Fsync on each compound write.
	pub flush_writes: bool,
	/// Use minimum link widths.
	pub minimize: bool,
	/// Body growth per reallocation, in percent.
	pub file_growth_rate: u8,
	/// Confirmed-interval merkle cache exponent; `INTERVAL_DISABLED`
	/// turns the cache off.
	pub interval_depth: u8,
	/// Address index width exponent; zero disables the index.
	pub address_bits: u8,
	/// Compact-filter index width exponent; zero disables the caches.
	pub neutrino_bits: u8,

	pub header_buckets: u64,
	pub point_buckets: u64,
	pub tx_buckets: u64,
	pub txs_buckets: u64,
	pub strong_tx_buckets: u64,
	pub prevout_buckets: u64,
	pub validated_bk_buckets: u64,
	pub validated_tx_buckets: u64,

	pub header_size: u64,
	pub point_size: u64,
	pub input_size: u64,
	pub output_size: u64,
	pub puts_size: u64,
	pub tx_size: u64,
	pub txs_size: u64,
	pub candidate_size: u64,
	pub confirmed_size: u64,
	pub strong_tx_size: u64,
	pub prevout_size: u64,
	pub validated_bk_size: u64,
	pub validated_tx_size: u64,
	pub address_size: u64,
	pub filter_bk_size: u64,
	pub filter_tx_size: u64,
}

impl Default for Settings {
	fn default() -> Self {
		Settings {
			path: PathBuf::new(),
			flush_writes: false,
			minimize: false,
			file_growth_rate: 50,
			interval_depth: INTERVAL_DISABLED,
			address_bits: 0,
			neutrino_bits: 0,

			header_buckets: 1 << 16,
			point_buckets: 1 << 16,
			tx_buckets: 1 << 16,
			txs_buckets: 1 << 16,
			strong_tx_buckets: 1 << 16,
			prevout_buckets: 1 << 16,
			validated_bk_buckets: 1 << 10,
			validated_tx_buckets: 1 << 10,

			header_size: 0,
			point_size: 0,
			input_size: 0,
			output_size: 0,
			puts_size: 0,
			tx_size: 0,
			txs_size: 0,
			candidate_size: 0,
			confirmed_size: 0,
			strong_tx_size: 0,
			prevout_size: 0,
			validated_bk_size: 0,
			validated_tx_size: 0,
			address_size: 0,
			filter_bk_size: 0,
			filter_tx_size: 0,
		}
	}
}

/// Settings with the derived link-width profile.
#[derive(Debug)]
pub struct InternalSettings {
	pub external: Settings,

	pub header_link: Linkage,
	pub point_link: Linkage,
	pub tx_link: Linkage,
	pub input_link: Linkage,
	pub output_link: Linkage,
	pub puts_link: Linkage,
	pub txs_link: Linkage,
	pub height_link: Linkage,
	pub strong_tx_link: Linkage,
	pub prevout_link: Linkage,
	pub validated_bk_link: Linkage,
	pub validated_tx_link: Linkage,
	pub address_link: Linkage,
	pub filter_bk_link: Linkage,
	pub filter_tx_link: Linkage,
}

impl InternalSettings {
	pub fn from_external(external: Settings) -> Result<Self> {
		if external.file_growth_rate == 0 || external.file_growth_rate > 100 {
			bail!(ErrorKind::InvalidOptions(
				"file_growth_rate",
				format!("Not satisfied: 0 < {} <= 100", external.file_growth_rate)
			));
		}

		for &(field, buckets) in &[
			("header_buckets", external.header_buckets),
			("point_buckets", external.point_buckets),
			("tx_buckets", external.tx_buckets),
			("strong_tx_buckets", external.strong_tx_buckets),
			("validated_bk_buckets", external.validated_bk_buckets),
			("validated_tx_buckets", external.validated_tx_buckets),
		] {
			if !buckets.is_power_of_two() {
				bail!(ErrorKind::InvalidOptions(
					field,
					format!("{} is not a power of two", buckets)
				));
			}
		}

		for &(field, bits) in &[
			("address_bits", external.address_bits),
			("neutrino_bits", external.neutrino_bits),
		] {
			if bits > 24 {
				bail!(ErrorKind::InvalidOptions(
					field,
					format!("{} exceeds the supported maximum of 24", bits)
				));
			}
		}

		// The narrow profile trades addressable extent for record width.
		let (archive, slab) = if external.minimize { (3, 4) } else { (4, 5) };

		Ok(InternalSettings {
			header_link: Linkage::new(archive),
			point_link: Linkage::new(archive),
			tx_link: Linkage::new(4),
			input_link: Linkage::new(slab),
			output_link: Linkage::new(slab),
			puts_link: Linkage::new(slab),
			txs_link: Linkage::new(slab),
			height_link: Linkage::new(archive),
			strong_tx_link: Linkage::new(4),
			prevout_link: Linkage::new(4),
			validated_bk_link: Linkage::new(slab),
			validated_tx_link: Linkage::new(slab),
			address_link: Linkage::new(4),
			filter_bk_link: Linkage::new(4),
			filter_tx_link: Linkage::new(slab),
			external,
		})
	}

	/// Bucket count of the optional address index; zero when disabled.
	pub fn address_buckets(&self) -> u64 {
		if self.external.address_bits == 0 {
			0
		} else {
			1 << self.external.address_bits
		}
	}

	/// Bucket count of the optional filter caches; zero when disabled.
	pub fn neutrino_buckets(&self) -> u64 {
		if self.external.neutrino_bits == 0 {
			0
		} else {
			1 << self.external.neutrino_bits
		}
	}
}

#[cfg(test)]
mod tests {
	use super::{InternalSettings, Settings};
	use error::ErrorKind;

	#[test]
	fn test_default_widths() {
		let internal = InternalSettings::from_external(Settings::default()).unwrap();
		assert_eq!(internal.header_link.size(), 4);
		assert_eq!(internal.input_link.size(), 5);
		assert_eq!(internal.tx_link.size(), 4);
	}

	#[test]
	fn test_minimize_widths() {
		let settings = Settings { minimize: true, ..Default::default() };
		let internal = InternalSettings::from_external(settings).unwrap();
		assert_eq!(internal.header_link.size(), 3);
		assert_eq!(internal.input_link.size(), 4);
		assert_eq!(internal.tx_link.size(), 4);
	}

	#[test]
	fn test_bucket_validation() {
		let settings = Settings { header_buckets: 100, ..Default::default() };
		assert_eq!(
			*InternalSettings::from_external(settings).unwrap_err().kind(),
			ErrorKind::InvalidOptions("header_buckets", "100 is not a power of two".into())
		);
	}

	#[test]
	fn test_growth_validation() {
		let settings = Settings { file_growth_rate: 0, ..Default::default() };
		assert!(InternalSettings::from_external(settings).is_err());
	}

	#[test]
	fn test_optional_buckets() {
		let internal = InternalSettings::from_external(Settings::default()).unwrap();
		assert_eq!(internal.address_buckets(), 0);
		assert_eq!(internal.neutrino_buckets(), 0);

		let settings = Settings { address_bits: 4, neutrino_bits: 3, ..Default::default() };
		let internal = InternalSettings::from_external(settings).unwrap();
		assert_eq!(internal.address_buckets(), 16);
		assert_eq!(internal.neutrino_buckets(), 8);
	}
}
