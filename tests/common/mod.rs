//! Shared fixtures: a temp-directory store plus synthetic fork blocks.

use hex;
use tempdir;

use ledgerdb::chain::{
	mainnet_genesis, Block, Hash, Header, Input, Output, Point, Transaction, NULL_HASH,
	ONE_HASH,
};
use ledgerdb::{Event, Settings, Store, TableId};

pub fn two_hash() -> Hash {
	let mut hash = [0u8; 32];
	hash[0] = 2;
	hash
}

pub fn ignore(_: Event, _: TableId) {}

pub fn settings(path: ::std::path::PathBuf) -> Settings {
	Settings {
		path,
		header_buckets: 32,
		point_buckets: 32,
		tx_buckets: 32,
		txs_buckets: 32,
		strong_tx_buckets: 32,
		prevout_buckets: 256,
		validated_bk_buckets: 32,
		validated_tx_buckets: 32,
		..Default::default()
	}
}

pub fn create_store(temp: &tempdir::TempDir) -> Store {
	Store::create(settings(temp.path().join("db")), ignore).unwrap()
}

fn input(point: Point, script: Vec<u8>, witness: Vec<Vec<u8>>, sequence: u32) -> Input {
	Input { point, script, witness, sequence }
}

fn output(value: u64, script: Vec<u8>) -> Output {
	Output { value, script }
}

/// First fork block: one non-coinbase transaction with three missing
/// prevouts and two outputs.
pub fn block1a() -> Block {
	Block {
		header: Header {
			version: 0x31323334,
			previous: mainnet_genesis().hash(),
			merkle_root: NULL_HASH,
			timestamp: 0x41424344,
			bits: 0x51525354,
			nonce: 0x61626364,
		},
		transactions: vec![Transaction {
			version: 0x2a,
			inputs: vec![
				input(Point { hash: ONE_HASH, index: 0x18 },
					vec![0x6a, 0x79], vec![vec![0x24, 0x24, 0x24]], 0x2a),
				input(Point { hash: ONE_HASH, index: 0x2a },
					vec![0x6a, 0x7a], vec![vec![0x31, 0x31, 0x31]], 0x18),
				input(Point { hash: two_hash(), index: 0x2b },
					vec![0x6a, 0x7a], vec![vec![0x42, 0x42, 0x42]], 0x19),
			],
			outputs: vec![
				output(0x18, vec![0x79]),
				output(0x2a, vec![0x7a]),
			],
			locktime: 0x18,
		}],
	}
}

fn block1a_tx_hash() -> Hash {
	block1a().transactions[0].hash()
}

/// Second fork block: its first transaction spends both block1a
/// outputs; the second carries missing prevouts.
pub fn block2a() -> Block {
	Block {
		header: Header {
			version: 0x31323334,
			previous: block1a().hash(),
			merkle_root: ONE_HASH,
			timestamp: 0x41424344,
			bits: 0x51525354,
			nonce: 0x61626364,
		},
		transactions: vec![
			Transaction {
				version: 0xa2,
				inputs: vec![
					input(Point { hash: block1a_tx_hash(), index: 0x00 },
						vec![0xae, 0x79], vec![vec![0x24, 0x24, 0x24]], 0xa2),
					input(Point { hash: block1a_tx_hash(), index: 0x01 },
						vec![0xae, 0x7a], vec![vec![0x31, 0x31, 0x31]], 0x81),
				],
				outputs: vec![output(0x81, vec![0x79])],
				locktime: 0x81,
			},
			Transaction {
				version: 0xa2,
				inputs: vec![
					input(Point { hash: ONE_HASH, index: 0x20 },
						vec![0xae, 0x79], vec![vec![0x24, 0x24, 0x24]], 0xa2),
					input(Point { hash: ONE_HASH, index: 0x21 },
						vec![0xae, 0x7a], vec![vec![0x31, 0x31, 0x31]], 0x81),
				],
				outputs: vec![output(0x81, vec![0x79])],
				locktime: 0x81,
			},
		],
	}
}

/// Third fork block: double-spends both block1a outputs.
pub fn block3a() -> Block {
	Block {
		header: Header {
			version: 0x31323334,
			previous: block2a().hash(),
			merkle_root: ONE_HASH,
			timestamp: 0x41424344,
			bits: 0x51525354,
			nonce: 0x61626364,
		},
		transactions: vec![Transaction {
			version: 0xa3,
			inputs: vec![
				input(Point { hash: block1a_tx_hash(), index: 0x01 },
					vec![0xae, 0x82], vec![vec![0x94, 0x94, 0x94]], 0xa3),
				input(Point { hash: block1a_tx_hash(), index: 0x00 },
					vec![0xae, 0x82], vec![vec![0x91, 0x91, 0x91]], 0x83),
			],
			outputs: vec![output(0x83, vec![0x79])],
			locktime: 0x83,
		}],
	}
}

/// Loose transaction double-spending the same outputs as block2a.
pub fn tx4() -> Transaction {
	Transaction {
		version: 0xa5,
		inputs: vec![
			input(Point { hash: block1a_tx_hash(), index: 0x00 },
				vec![0xae, 0x79], vec![vec![0x25, 0x25, 0x25]], 0xa5),
			input(Point { hash: block1a_tx_hash(), index: 0x01 },
				vec![0xae, 0x7a], vec![vec![0x35, 0x35, 0x35]], 0x85),
		],
		outputs: vec![output(0x85, vec![0x79])],
		locktime: 0x85,
	}
}

/// Coinbase-only block on top of genesis.
pub fn block1b() -> Block {
	Block {
		header: Header {
			version: 0x31323334,
			previous: mainnet_genesis().hash(),
			merkle_root: ONE_HASH,
			timestamp: 0x41424344,
			bits: 0x51525354,
			nonce: 0x61626364,
		},
		transactions: vec![Transaction {
			version: 0xb1,
			inputs: vec![input(Point::null(), vec![0xae, 0x82], vec![], 0xb1)],
			outputs: vec![output(0xb1, vec![0x79])],
			locktime: 0xb1,
		}],
	}
}

/// Loose transaction spending the block1b coinbase output.
pub fn tx2b() -> Transaction {
	Transaction {
		version: 0xb1,
		inputs: vec![input(
			Point { hash: block1b().transactions[0].hash(), index: 0x00 },
			vec![0xae, 0x82], vec![], 0xb1)],
		outputs: vec![output(0xb1, vec![0x79])],
		locktime: 0xb1,
	}
}

/// Loose transaction spending the genesis coinbase output.
pub fn tx_spend_genesis() -> Transaction {
	Transaction {
		version: 0xa6,
		inputs: vec![input(
			Point { hash: mainnet_genesis().transactions[0].hash(), index: 0x00 },
			vec![0xae, 0x79], vec![vec![0x26, 0x26, 0x26]], 0xa6)],
		outputs: vec![output(0x86, vec![0x79])],
		locktime: 0x86,
	}
}

/// Mainnet blocks one through three, wire-exact.
pub fn mainnet_block(index: usize) -> Block {
	// blockchain.info/rawblock/[block-hash]?format=hex
	const DATA: [&str; 3] = [
		"010000006fe28c0ab6f1b372c1a6a246ae63f74f931e8365e15a089c68d61900\
		 00000000982051fd1e4ba744bbbe680e1fee14677ba1a3c3540bf7b1cdb606e8\
		 57233e0e61bc6649ffff001d01e3629901010000000100000000000000000000\
		 00000000000000000000000000000000000000000000ffffffff0704ffff001d\
		 0104ffffffff0100f2052a0100000043410496b538e853519c726a2c91e61ec1\
		 1600ae1390813a627c66fb8be7947be63c52da7589379515d4e0a604f8141781\
		 e62294721166bf621e73a82cbf2342c858eeac00000000",
		"010000004860eb18bf1b1620e37e9490fc8a427514416fd75159ab86688e9a83\
		 00000000d5fdcc541e25de1c7a5addedf24858b8bb665c9f36ef744ee42c3160\
		 22c90f9bb0bc6649ffff001d08d2bd6101010000000100000000000000000000\
		 00000000000000000000000000000000000000000000ffffffff0704ffff001d\
		 010bffffffff0100f2052a010000004341047211a824f55b505228e4c3d5194c\
		 1fcfaa15a456abdf37f9b9d97a4040afc073dee6c89064984f03385237d92167\
		 c13e236446b417ab79a0fcae412ae3316b77ac00000000",
		"01000000bddd99ccfda39da1b108ce1a5d70038d0a967bacb68b6b63065f626a\
		 0000000044f672226090d85db9a9f2fbfe5f0f9609b387af7be5b7fbb7a1767c\
		 831c9e995dbe6649ffff001d05e0ed6d01010000000100000000000000000000\
		 00000000000000000000000000000000000000000000ffffffff0704ffff001d\
		 010effffffff0100f2052a0100000043410494b9d3e76c5b1629ecf97fff95d7\
		 a4bbdac87cc26099ada28066c6ff1eb9191223cd897194a08d0c2726c5747f1d\
		 b49e8cf90e75dc3e3550ae9b30086f3cd5aaac00000000",
	];

	Block::from_bytes(&hex::decode(DATA[index - 1]).unwrap()).unwrap()
}
