//! End-to-end query scenarios against a temp-directory store.

extern crate hex;
extern crate ledgerdb;
extern crate tempdir;

mod common;

use std::sync::atomic::{AtomicBool, Ordering};

use ledgerdb::chain::{
	mainnet_genesis, merkle_root, Input, Output, Point, Transaction, NULL_HASH,
};
use ledgerdb::{Code, Context, Settings, Store, TERMINAL};

use common::{
	block1a, block1b, block2a, block3a, create_store, ignore, mainnet_block, settings,
	tx2b, tx4, tx_spend_genesis,
};

fn context(height: u32) -> Context {
	Context { flags: 0, height, mtp: 0 }
}

#[test]
fn empty_store() {
	let temp = tempdir::TempDir::new("query_empty").unwrap();
	let store = create_store(&temp);
	let query = store.query();

	store.verify().unwrap();
	assert_eq!(query.header_body_size(), 0);
	assert_eq!(query.header_records(), 0);
	assert_eq!(query.candidate_records(), 0);
	assert_eq!(query.confirmed_records(), 0);
	assert_eq!(query.archive_size(), 0);
	assert!(!query.is_initialized());
	store.close(ignore).unwrap();
}

#[test]
fn genesis_initialization() {
	let temp = tempdir::TempDir::new("query_genesis").unwrap();
	let store = create_store(&temp);
	let query = store.query();
	let genesis = mainnet_genesis();

	query.initialize(&genesis).unwrap();
	assert!(query.is_initialized());

	assert_eq!(query.get_top_confirmed(), Some(0));
	assert_eq!(query.get_top_candidate(), Some(0));
	assert_eq!(query.get_header_key(0).unwrap().unwrap(), genesis.hash());
	assert_eq!(query.to_header(&genesis.hash()).unwrap(), 0);

	assert!(query.is_strong_tx(0).unwrap());
	assert!(query.is_strong_block(0).unwrap());
	assert!(query.is_confirmed_tx(0).unwrap());
	assert!(query.is_confirmed_block(0).unwrap());

	assert_eq!(query.get_tx_count(0).unwrap(), Some(1));
	assert_eq!(query.get_tx_sizes(0).unwrap(), Some((204, 204)));
	let coinbase_output = query.to_output(0, 0).unwrap();
	assert_eq!(query.get_value(coinbase_output).unwrap(), Some(50_0000_0000));
	store.close(ignore).unwrap();
}

#[test]
fn header_roundtrip() {
	let temp = tempdir::TempDir::new("query_header").unwrap();
	let store = create_store(&temp);
	let query = store.query();
	query.initialize(&mainnet_genesis()).unwrap();

	let header = block1a().header;
	let context = Context { flags: 0x01020304, height: 0x121314, mtp: 0x21222324 };
	let link = query.set_header(&header, &context, true).unwrap();

	assert_eq!(query.to_header(&header.hash()).unwrap(), link);
	assert_eq!(query.get_header(link).unwrap().unwrap(), header);
	assert_eq!(query.get_height(link).unwrap(), Some(0x121314));
	assert_eq!(query.get_header_key(link).unwrap().unwrap(), header.hash());

	// Unknown links and hashes resolve to nothing.
	assert!(query.get_header(99).unwrap().is_none());
	assert_eq!(query.to_header(&[9u8; 32]).unwrap(), TERMINAL);
	store.close(ignore).unwrap();
}

#[test]
fn null_input_transaction() {
	let temp = tempdir::TempDir::new("query_null_input").unwrap();
	let store = create_store(&temp);
	let query = store.query();
	query.initialize(&mainnet_genesis()).unwrap();

	let tx = Transaction {
		version: 0x2a,
		inputs: vec![Input {
			point: Point::null(),
			script: vec![],
			witness: vec![],
			sequence: 0x2a,
		}],
		outputs: vec![Output { value: 0, script: vec![] }],
		locktime: 0,
	};

	let link = query.set_tx(&tx).unwrap();
	assert_eq!(query.get_tx(link).unwrap().unwrap(), tx);
	assert!(query.get_spenders(link, 0).unwrap().is_empty());

	// A null-point spend is mature at any height.
	let spend = query.to_spend(link, 0).unwrap();
	assert!(query.is_mature(spend, 0).unwrap());
	store.close(ignore).unwrap();
}

#[test]
fn block_roundtrip_preserves_witness() {
	let temp = tempdir::TempDir::new("query_block_roundtrip").unwrap();
	let store = create_store(&temp);
	let query = store.query();
	query.initialize(&mainnet_genesis()).unwrap();

	let block = block1a();
	let link = query.set_block(&block, &context(1), false).unwrap();
	assert_eq!(query.get_block(link).unwrap().unwrap(), block);
	assert_eq!(query.get_tx_hashes(link).unwrap(), vec![block.transactions[0].hash()]);
	store.close(ignore).unwrap();
}

#[test]
fn set_is_idempotent() {
	let temp = tempdir::TempDir::new("query_idempotent").unwrap();
	let store = create_store(&temp);
	let query = store.query();
	query.initialize(&mainnet_genesis()).unwrap();

	let tx = tx_spend_genesis();
	let first = query.set_tx(&tx).unwrap();
	let puts = query.puts_records();
	let points = query.point_records();

	let second = query.set_tx(&tx).unwrap();
	assert_eq!(first, second);
	assert_eq!(query.puts_records(), puts);
	assert_eq!(query.point_records(), points);
	assert_eq!(query.tx_records(), 2);

	let block = block1a();
	let header_fk = query.set_block(&block, &context(1), false).unwrap();
	let inputs = query.input_body_size();
	assert_eq!(query.set_block(&block, &context(1), false).unwrap(), header_fk);
	assert_eq!(query.input_body_size(), inputs);
	store.close(ignore).unwrap();
}

#[test]
fn double_spend_visibility() {
	let temp = tempdir::TempDir::new("query_double_spend").unwrap();
	let store = create_store(&temp);
	let query = store.query();
	query.initialize(&mainnet_genesis()).unwrap();

	// Header links 1 and 2, transaction links 1 (block1a) and 2/3
	// (block2a), 4 (tx4).
	assert_eq!(query.set_block(&block1a(), &context(1), false).unwrap(), 1);
	assert_eq!(query.set_block(&block2a(), &context(2), false).unwrap(), 2);
	query.set_tx(&tx4()).unwrap();

	// Both block1a outputs have two spenders: block2a's first tx and
	// the loose tx4.
	assert_eq!(query.get_spenders(1, 0).unwrap().len(), 2);
	assert_eq!(query.get_spenders(1, 1).unwrap().len(), 2);
	let output0 = query.to_output(1, 0).unwrap();
	assert_eq!(query.get_output_spenders(output0).unwrap().len(), 2);

	// Nothing is spent until a spender is strong.
	assert!(!query.is_spent_output(output0).unwrap());

	query.set_strong(1).unwrap();
	query.set_strong(2).unwrap();
	query.push_confirmed(1, false).unwrap();
	query.push_confirmed(2, false).unwrap();
	assert!(query.is_spent_output(output0).unwrap());

	// Retracting block2a leaves only tx4, which was never strong.
	query.set_unstrong(2).unwrap();
	assert!(!query.is_spent_output(output0).unwrap());

	// A third strong spender re-establishes the double spend.
	assert_eq!(query.set_block(&block3a(), &context(3), false).unwrap(), 3);
	query.set_strong(3).unwrap();
	assert!(query.is_spent_output(output0).unwrap());

	// The spend-level check excludes the spend's own transaction:
	// block2a's spend of the same output sees only block3a's strong
	// claim.
	let spend = query.to_spend(2, 0).unwrap();
	assert!(query.is_spent(spend).unwrap());
	store.close(ignore).unwrap();
}

#[test]
fn merkle_tree_and_proofs() {
	let temp = tempdir::TempDir::new("query_merkle").unwrap();
	let store = Store::create(Settings {
		interval_depth: 2,
		..settings(temp.path().join("db"))
	}, ignore).unwrap();
	let query = store.query();

	let genesis = mainnet_genesis();
	let blocks = [mainnet_block(1), mainnet_block(2), mainnet_block(3)];
	query.initialize(&genesis).unwrap();
	for (index, block) in blocks.iter().enumerate() {
		let link = query.set_block(block, &context(index as u32 + 1), false).unwrap();
		query.push_confirmed(link, false).unwrap();
	}

	assert_eq!(query.interval_span(), 4);
	assert!(query.get_confirmed_interval(0).unwrap().is_none());
	assert!(query.get_confirmed_interval(2).unwrap().is_none());
	assert!(query.get_confirmed_interval(3).unwrap().is_some());
	assert!(query.get_confirmed_interval(4).unwrap().is_none());

	let leaves = vec![
		genesis.hash(),
		blocks[0].hash(),
		blocks[1].hash(),
		blocks[2].hash(),
	];
	let expected_root = merkle_root(leaves.clone());

	let tree = query.get_merkle_tree(3).unwrap();
	assert_eq!(tree, vec![expected_root]);
	assert_eq!(query.get_merkle_root(3), expected_root);

	// Rightmost target: siblings are block2 alone, then the left pair.
	let (root, proof) = query.get_merkle_root_and_proof(3, 3).unwrap();
	assert_eq!(root, expected_root);
	assert_eq!(proof.len(), 2);
	assert_eq!(proof[0], merkle_root(vec![blocks[1].hash()]));
	assert_eq!(proof[1], merkle_root(vec![genesis.hash(), blocks[0].hash()]));

	// Deeper path because the target is not the rightmost leaf.
	let (root, proof) = query.get_merkle_root_and_proof(1, 3).unwrap();
	assert_eq!(root, expected_root);
	assert_eq!(proof.len(), 2);
	assert_eq!(proof[0], merkle_root(vec![genesis.hash()]));
	assert_eq!(proof[1], merkle_root(vec![blocks[1].hash(), blocks[2].hash()]));

	// Waypoint zero collapses to the genesis hash.
	assert_eq!(query.get_merkle_tree(0).unwrap(), vec![genesis.hash()]);

	assert_eq!(query.get_merkle_root_and_proof(5, 3).unwrap_err(), Code::MerkleArguments);
	assert_eq!(query.get_merkle_root_and_proof(0, 100).unwrap_err(), Code::MerkleNotFound);
	assert_eq!(query.get_merkle_root(100), NULL_HASH);
	store.close(ignore).unwrap();
}

#[test]
fn merkle_proof_with_supplied_roots() {
	let temp = tempdir::TempDir::new("query_merkle_roots").unwrap();
	let store = Store::create(Settings {
		interval_depth: 1,
		..settings(temp.path().join("db"))
	}, ignore).unwrap();
	let query = store.query();

	let genesis = mainnet_genesis();
	let blocks = [mainnet_block(1), mainnet_block(2), mainnet_block(3)];
	query.initialize(&genesis).unwrap();
	for (index, block) in blocks.iter().enumerate() {
		let link = query.set_block(block, &context(index as u32 + 1), false).unwrap();
		query.push_confirmed(link, false).unwrap();
	}

	let roots = vec![
		merkle_root(vec![genesis.hash(), blocks[0].hash()]),
		merkle_root(vec![blocks[1].hash(), blocks[2].hash()]),
	];
	let proof = query.get_merkle_proof(&roots, 3, 3).unwrap();
	assert_eq!(proof.len(), 2);
	assert_eq!(proof[0], merkle_root(vec![blocks[1].hash()]));
	assert_eq!(proof[1], roots[0]);

	// Below the first confirmed block nothing can be proven.
	let empty = Store::create(Settings {
		interval_depth: 1,
		..settings(temp.path().join("empty"))
	}, ignore).unwrap();
	empty.query().initialize(&genesis).unwrap();
	assert_eq!(empty.query().get_merkle_proof(&[], 5, 10).unwrap_err(), Code::MerkleProof);
	empty.close(ignore).unwrap();
	store.close(ignore).unwrap();
}

#[test]
fn maturity() {
	let temp = tempdir::TempDir::new("query_maturity").unwrap();
	let store = create_store(&temp);
	let query = store.query();
	query.initialize(&mainnet_genesis()).unwrap();

	// The genesis coinbase never matures.
	let spender = query.set_tx(&tx_spend_genesis()).unwrap();
	let genesis_spend = query.to_spend(spender, 0).unwrap();
	assert!(!query.is_mature(genesis_spend, 0).unwrap());
	assert!(!query.is_mature(genesis_spend, 100).unwrap());

	// Unknown spends are immature.
	assert_eq!(query.to_spend(0, 1).unwrap(), TERMINAL);
	assert!(!query.is_mature(TERMINAL, 1000).unwrap());

	// The genesis coinbase's own null input is mature.
	assert!(query.is_mature(query.to_spend(0, 0).unwrap(), 0).unwrap());
	store.close(ignore).unwrap();
}

#[test]
fn coinbase_maturity_boundary() {
	let temp = tempdir::TempDir::new("query_maturity_coinbase").unwrap();
	let store = create_store(&temp);
	let query = store.query();
	query.initialize(&mainnet_genesis()).unwrap();

	query.set_block(&block1b(), &context(1), false).unwrap();
	query.set_strong(1).unwrap();

	let spender = query.set_tx(&tx2b()).unwrap();
	let spend = query.to_spend(spender, 0).unwrap();
	assert!(!query.is_mature(spend, 100).unwrap());
	assert!(query.is_mature(spend, 101).unwrap());
	store.close(ignore).unwrap();
}

#[test]
fn non_coinbase_always_mature() {
	let temp = tempdir::TempDir::new("query_maturity_plain").unwrap();
	let store = create_store(&temp);
	let query = store.query();
	query.initialize(&mainnet_genesis()).unwrap();

	query.set_block(&block1a(), &context(1), false).unwrap();
	query.set_strong(1).unwrap();

	let spender = query.set_tx(&tx4()).unwrap();
	let spend = query.to_spend(spender, 0).unwrap();
	assert!(query.is_mature(spend, 1).unwrap());
	store.close(ignore).unwrap();
}

fn block2b() -> ledgerdb::chain::Block {
	ledgerdb::chain::Block {
		header: ledgerdb::chain::Header {
			version: 0x31323334,
			previous: block1b().hash(),
			merkle_root: [3u8; 32],
			timestamp: 0x41424344,
			bits: 0x51525354,
			nonce: 0x61626364,
		},
		transactions: vec![
			Transaction {
				version: 0xb2,
				inputs: vec![Input {
					point: Point::null(),
					script: vec![0xb2],
					witness: vec![],
					sequence: 0xb2,
				}],
				outputs: vec![Output { value: 0xb2, script: vec![0x79] }],
				locktime: 0xb2,
			},
			tx2b(),
		],
	}
}

#[test]
fn block_confirmable_coinbase_only() {
	let temp = tempdir::TempDir::new("query_confirmable_coinbase").unwrap();
	let store = create_store(&temp);
	let query = store.query();
	query.initialize(&mainnet_genesis()).unwrap();

	query.set_block(&block1b(), &context(1), false).unwrap();
	query.set_strong(1).unwrap();
	assert_eq!(query.block_confirmable(1).unwrap(), Code::Success);

	// Unknown header link.
	assert_eq!(query.block_confirmable(9).unwrap(), Code::Integrity1);
	store.close(ignore).unwrap();
}

#[test]
fn block_confirmable_immature_spend() {
	let temp = tempdir::TempDir::new("query_confirmable_immature").unwrap();
	let store = create_store(&temp);
	let query = store.query();
	query.initialize(&mainnet_genesis()).unwrap();

	query.set_block(&block1b(), &context(1), false).unwrap();
	query.set_strong(1).unwrap();

	// block2b spends block1b's coinbase one block too early.
	let link = query.set_block(&block2b(), &context(100), false).unwrap();
	query.set_strong(link).unwrap();
	assert_eq!(query.block_confirmable(link).unwrap(), Code::CoinbaseMaturity);
	store.close(ignore).unwrap();
}

#[test]
fn block_confirmable_mature_spend() {
	let temp = tempdir::TempDir::new("query_confirmable_mature").unwrap();
	let store = create_store(&temp);
	let query = store.query();
	query.initialize(&mainnet_genesis()).unwrap();

	query.set_block(&block1b(), &context(1), false).unwrap();
	query.set_strong(1).unwrap();

	let link = query.set_block(&block2b(), &context(101), false).unwrap();
	query.set_strong(link).unwrap();
	assert_eq!(query.block_confirmable(link).unwrap(), Code::Success);
	store.close(ignore).unwrap();
}

#[test]
fn block_confirmable_missing_prevouts() {
	let temp = tempdir::TempDir::new("query_confirmable_missing").unwrap();
	let store = create_store(&temp);
	let query = store.query();
	query.initialize(&mainnet_genesis()).unwrap();

	// block2a's second transaction spends outputs that do not exist.
	query.set_block(&block1a(), &context(1), false).unwrap();
	query.set_strong(1).unwrap();
	query.set_block(&block2a(), &context(2), false).unwrap();
	query.set_strong(2).unwrap();
	assert_eq!(query.block_confirmable(2).unwrap(), Code::Integrity1);
	store.close(ignore).unwrap();
}

#[test]
fn block_confirmable_double_spend() {
	let temp = tempdir::TempDir::new("query_confirmable_double").unwrap();
	let store = create_store(&temp);
	let query = store.query();
	query.initialize(&mainnet_genesis()).unwrap();

	query.set_block(&block1a(), &context(1), false).unwrap();
	query.set_strong(1).unwrap();
	query.set_block(&block2a(), &context(2), false).unwrap();
	query.set_strong(2).unwrap();

	// block3a re-spends the outputs block2a's first tx already claims.
	let link = query.set_block(&block3a(), &context(3), false).unwrap();
	query.set_strong(link).unwrap();
	assert_eq!(query.block_confirmable(link).unwrap(), Code::ConfirmedDoubleSpend);
	store.close(ignore).unwrap();
}

#[test]
fn candidate_confirmed_stacks() {
	let temp = tempdir::TempDir::new("query_stacks").unwrap();
	let store = create_store(&temp);
	let query = store.query();
	query.initialize(&mainnet_genesis()).unwrap();

	let link1 = query.set_block(&block1a(), &context(1), false).unwrap();
	let link2 = query.set_block(&block2a(), &context(2), false).unwrap();

	query.push_candidate(link1).unwrap();
	query.push_candidate(link2).unwrap();
	assert_eq!(query.get_top_candidate(), Some(2));
	assert!(query.is_candidate_header(link1).unwrap());
	assert!(query.is_candidate_header(link2).unwrap());
	assert!(!query.is_confirmed_block(link1).unwrap());

	// Candidate and confirmed agree only at genesis.
	assert_eq!(query.get_fork().unwrap(), 0);

	query.push_confirmed(link1, false).unwrap();
	assert_eq!(query.get_fork().unwrap(), 1);

	// Pop restores the prior state.
	assert_eq!(query.pop_candidate().unwrap(), link2);
	assert_eq!(query.pop_candidate().unwrap(), link1);
	assert_eq!(query.get_top_candidate(), Some(0));
	assert!(!query.is_candidate_header(link1).unwrap());

	assert_eq!(query.pop_confirmed().unwrap(), link1);
	assert_eq!(query.get_top_confirmed(), Some(0));

	// Genesis is always present: the height-zero entry never pops.
	assert!(query.pop_confirmed().is_err());
	assert_eq!(query.get_top_confirmed(), Some(0));
	assert!(query.is_confirmed_block(0).unwrap());
	store.close(ignore).unwrap();
}

#[test]
fn confirmed_floor_requires_genesis_push() {
	let temp = tempdir::TempDir::new("query_floor").unwrap();
	let store = create_store(&temp);
	let query = store.query();

	// Before initialization nothing may be pushed without the
	// top-zero override, and nothing can be popped.
	assert!(query.push_confirmed(0, false).is_err());
	assert!(query.pop_confirmed().is_err());
	assert_eq!(query.get_top_confirmed(), None);

	// Initialization pushes genesis with the override set.
	query.initialize(&mainnet_genesis()).unwrap();
	assert_eq!(query.get_top_confirmed(), Some(0));
	assert!(query.pop_confirmed().is_err());
	store.close(ignore).unwrap();
}

#[test]
fn reorganize_swaps_candidate_branch() {
	let temp = tempdir::TempDir::new("query_reorganize").unwrap();
	let store = create_store(&temp);
	let query = store.query();
	query.initialize(&mainnet_genesis()).unwrap();

	let link1 = query.set_block(&block1a(), &context(1), false).unwrap();
	let link2 = query.set_block(&block2a(), &context(2), false).unwrap();
	let link1b = query.set_header(&block1b().header, &context(1), false).unwrap();

	// Extend above genesis.
	let outgoing = query.reorganize(0, &[link1, link2]).unwrap();
	assert!(outgoing.is_empty());
	assert_eq!(query.get_top_candidate(), Some(2));

	// Swap the whole branch for the competing header.
	let outgoing = query.reorganize(0, &[link1b]).unwrap();
	assert_eq!(outgoing, vec![link2, link1]);
	assert_eq!(query.get_top_candidate(), Some(1));
	assert_eq!(query.to_candidate(1).unwrap(), link1b);

	// A fork point above the top never mutates state.
	assert!(query.reorganize(5, &[link1]).is_err());
	assert_eq!(query.get_top_candidate(), Some(1));
	store.close(ignore).unwrap();
}

#[test]
fn strong_markers_compose() {
	let temp = tempdir::TempDir::new("query_strong").unwrap();
	let store = create_store(&temp);
	let query = store.query();
	query.initialize(&mainnet_genesis()).unwrap();

	query.set_block(&block1a(), &context(1), false).unwrap();
	assert!(!query.is_strong_tx(1).unwrap());
	assert!(!query.is_strong_block(1).unwrap());

	query.set_strong(1).unwrap();
	assert!(query.is_strong_tx(1).unwrap());
	assert!(query.is_strong_block(1).unwrap());
	assert_eq!(query.to_strong_block(1).unwrap(), 1);

	query.set_unstrong(1).unwrap();
	assert!(!query.is_strong_tx(1).unwrap());
	assert_eq!(query.to_strong_block(1).unwrap(), TERMINAL);

	query.set_strong(1).unwrap();
	assert!(query.is_strong_tx(1).unwrap());
	store.close(ignore).unwrap();
}

#[test]
fn validation_states_and_fees() {
	let temp = tempdir::TempDir::new("query_fees").unwrap();
	let store = create_store(&temp);
	let query = store.query();
	query.initialize(&mainnet_genesis()).unwrap();

	let link = query.set_block(&block1a(), &context(1), false).unwrap();
	let tx_fk = 1;

	assert_eq!(query.get_tx_fee(tx_fk).unwrap_err(), Code::Unvalidated);
	assert_eq!(query.get_block_state(link).unwrap_err(), Code::Unvalidated);

	let validated = context(1);
	query.set_tx_state(tx_fk, &validated, Code::TxConnected, 500, 4).unwrap();
	assert_eq!(query.get_tx_state(tx_fk, &validated).unwrap(), (Code::TxConnected, 500, 4));
	assert_eq!(query.get_tx_fee(tx_fk).unwrap(), 500);

	query.set_block_state(link, Code::BlockValid, 500).unwrap();
	assert_eq!(query.get_block_state(link).unwrap(), (Code::BlockValid, 500));

	assert_eq!(query.get_block_fees(link).unwrap(), 500);
	// Genesis carries only its coinbase.
	assert_eq!(query.get_block_fees(0).unwrap(), 0);

	// Rates are fee per thousand wire bytes.
	let (witless, _) = query.get_tx_sizes(tx_fk).unwrap().unwrap();
	assert_eq!(query.get_tx_rate(tx_fk).unwrap(), 500 * 1000 / witless as u64);
	let wire_size = block1a().serialized_size(true) as u64;
	assert_eq!(query.get_block_rate(link).unwrap(), 500 * 1000 / wire_size);

	let cancel = AtomicBool::new(false);
	assert_eq!(query.get_branch_fees(link, &cancel).unwrap(), 500);

	cancel.store(true, Ordering::Relaxed);
	assert_eq!(query.get_branch_fees(link, &cancel).unwrap_err(), Code::OperationFailed);
	store.close(ignore).unwrap();
}

#[test]
fn persistence_across_reopen() {
	let temp = tempdir::TempDir::new("query_reopen").unwrap();
	let config = settings(temp.path().join("db"));

	{
		let store = Store::create(config.clone(), ignore).unwrap();
		let query = store.query();
		query.initialize(&mainnet_genesis()).unwrap();
		query.set_block(&block1a(), &context(1), false).unwrap();
		query.set_strong(1).unwrap();
		store.close(ignore).unwrap();
	}

	let store = Store::open(config, ignore).unwrap();
	let query = store.query();
	assert!(query.is_initialized());
	assert_eq!(query.get_block(1).unwrap().unwrap(), block1a());
	assert_eq!(query.to_header(&block1a().hash()).unwrap(), 1);
	assert!(query.is_strong_tx(1).unwrap());
	assert_eq!(query.get_header_key(0).unwrap().unwrap(), mainnet_genesis().hash());
	store.close(ignore).unwrap();
}

#[test]
fn optional_indexes() {
	let temp = tempdir::TempDir::new("query_optional").unwrap();
	let store = Store::create(Settings {
		address_bits: 6,
		neutrino_bits: 6,
		..settings(temp.path().join("db"))
	}, ignore).unwrap();
	let query = store.query();
	query.initialize(&mainnet_genesis()).unwrap();

	assert!(query.address_enabled());
	assert!(query.filter_enabled());

	query.set_block(&block1a(), &context(1), false).unwrap();
	let script_hash = block1a().transactions[0].outputs[0].script_hash();
	let outputs = query.to_address_outputs(&script_hash).unwrap();
	assert_eq!(outputs.len(), 1);
	assert_eq!(outputs[0], query.to_output(1, 0).unwrap());

	query.set_filter_head(1, &[1u8; 32], &[2u8; 32]).unwrap();
	assert_eq!(query.get_filter_head(1).unwrap(), Some(([1u8; 32], [2u8; 32])));
	query.set_filter_body(1, &[9, 8, 7]).unwrap();
	assert_eq!(query.get_filter_body(1).unwrap(), Some(vec![9, 8, 7]));
	store.close(ignore).unwrap();
}

#[test]
fn disabled_indexes_are_vacuous() {
	let temp = tempdir::TempDir::new("query_disabled").unwrap();
	let store = create_store(&temp);
	let query = store.query();
	query.initialize(&mainnet_genesis()).unwrap();

	assert!(!query.address_enabled());
	assert!(!query.filter_enabled());
	assert!(query.to_address_outputs(&[1u8; 32]).unwrap().is_empty());
	query.set_filter_body(0, &[1]).unwrap();
	assert_eq!(query.get_filter_body(0).unwrap(), None);
	store.close(ignore).unwrap();
}

#[test]
fn locators() {
	let temp = tempdir::TempDir::new("query_locator").unwrap();
	let store = create_store(&temp);
	let query = store.query();
	query.initialize(&mainnet_genesis()).unwrap();

	assert_eq!(ledgerdb::Query::get_locator_heights(0), vec![0]);
	assert_eq!(
		ledgerdb::Query::get_locator_heights(5),
		vec![5, 4, 3, 2, 1, 0]
	);
	let heights = ledgerdb::Query::get_locator_heights(100);
	assert_eq!(&heights[..10], &[100, 99, 98, 97, 96, 95, 94, 93, 92, 91]);
	assert_eq!(*heights.last().unwrap(), 0);

	let locator = query.get_locator().unwrap();
	assert_eq!(locator, vec![mainnet_genesis().hash()]);
	store.close(ignore).unwrap();
}

#[test]
fn spend_translations() {
	let temp = tempdir::TempDir::new("query_translations").unwrap();
	let store = create_store(&temp);
	let query = store.query();
	query.initialize(&mainnet_genesis()).unwrap();

	query.set_block(&block1a(), &context(1), false).unwrap();
	query.set_strong(1).unwrap();
	query.set_block(&block2a(), &context(2), false).unwrap();

	// block2a's first tx (link 2) spends block1a's outputs.
	let input_fk = query.to_input(2, 0).unwrap();
	assert_ne!(input_fk, TERMINAL);
	assert_eq!(query.to_input_tx(input_fk).unwrap(), 2);
	assert_eq!(query.to_prevout_tx(input_fk).unwrap(), 1);

	let output_fk = query.to_output(1, 0).unwrap();
	assert_eq!(query.to_output_tx(output_fk).unwrap(), 1);

	let spend_fk = query.to_spend(2, 0).unwrap();
	assert_eq!(query.to_prevout(spend_fk).unwrap(), output_fk);

	// Out-of-range indexes are terminal.
	assert_eq!(query.to_output(1, 9).unwrap(), TERMINAL);
	assert_eq!(query.to_input(1, 9).unwrap(), TERMINAL);
	store.close(ignore).unwrap();
}
