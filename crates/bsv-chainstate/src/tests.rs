//! Tests for the chain-state collaborators and the coin probe.

use bsv_primitives::chainhash::Hash;
use bsv_script::Script;
use bsv_transaction::{Block, BlockHeader, OutPoint, Transaction, TransactionInput, TransactionOutput};

use crate::access::{access_by_txid, MAX_PROBE_OUTPUT_INDEX};
use crate::coin::Coin;
use crate::memory::{MemoryBlockStore, MemoryChain, MemoryCoinView, MemoryTxIndex, MemoryTxPool};
use crate::view::{BlockStore, ChainIndex, CoinView, TxIndex, TxPool};
use crate::ChainStateError;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn coin(height: u32) -> Coin {
    Coin::new(1_000, Script::from_hex("51").unwrap(), height, false)
}

fn spend_tx(prev: Hash, outputs: usize) -> Transaction {
    let mut tx = Transaction::new();
    tx.add_input(TransactionInput::new(OutPoint::new(prev, 0), 0xFFFF_FFFF));
    for i in 0..outputs {
        tx.add_output(TransactionOutput::new(100 + i as i64, Script::from_hex("51").unwrap()));
    }
    tx
}

fn header_on(prev: Hash, nonce: u32) -> BlockHeader {
    BlockHeader {
        version: 1,
        prev_block: prev,
        timestamp: 1_600_000_000 + nonce,
        nonce,
        ..BlockHeader::default()
    }
}

// -----------------------------------------------------------------------
// access_by_txid
// -----------------------------------------------------------------------

#[test]
fn test_probe_returns_lowest_unspent() {
    init_logger();
    let view = MemoryCoinView::new();
    let h = Hash::new([1; 32]);
    view.add_coin(OutPoint::new(h, 7), coin(70));
    view.add_coin(OutPoint::new(h, 3), coin(30));

    let (index, found) = access_by_txid(&view, &h, MAX_PROBE_OUTPUT_INDEX).unwrap();
    assert_eq!(index, 3);
    assert_eq!(found.height, 30);
}

#[test]
fn test_probe_ceiling_is_exclusive() {
    let view = MemoryCoinView::new();
    let h = Hash::new([2; 32]);
    view.add_coin(OutPoint::new(h, MAX_PROBE_OUTPUT_INDEX), coin(5));
    assert!(access_by_txid(&view, &h, MAX_PROBE_OUTPUT_INDEX).is_none());

    view.add_coin(OutPoint::new(h, MAX_PROBE_OUTPUT_INDEX - 1), coin(6));
    let (index, _) = access_by_txid(&view, &h, MAX_PROBE_OUTPUT_INDEX).unwrap();
    assert_eq!(index, MAX_PROBE_OUTPUT_INDEX - 1);
}

#[test]
fn test_probe_ignores_other_hashes() {
    let view = MemoryCoinView::new();
    view.add_coin(OutPoint::new(Hash::new([3; 32]), 0), coin(1));
    assert!(access_by_txid(&view, &Hash::new([4; 32]), 10).is_none());
    assert!(access_by_txid(&view, &Hash::new([3; 32]), 0).is_none());
}

#[test]
fn test_fully_spent_transaction_is_not_found() {
    let view = MemoryCoinView::new();
    let tx = spend_tx(Hash::new([9; 32]), 2);
    view.connect_transaction(&tx, 10);
    let h = tx.hash();
    assert!(access_by_txid(&view, &h, 100).is_some());

    view.spend_coin(&OutPoint::new(h, 0));
    view.spend_coin(&OutPoint::new(h, 1));
    assert!(access_by_txid(&view, &h, 100).is_none());
}

// -----------------------------------------------------------------------
// Coin view
// -----------------------------------------------------------------------

#[test]
fn test_connect_transaction_spends_inputs() {
    let view = MemoryCoinView::new();
    let funding = spend_tx(Hash::new([5; 32]), 1);
    view.connect_transaction(&funding, 1);
    assert!(view.have_coin(&OutPoint::new(funding.hash(), 0)));

    let spender = spend_tx(funding.hash(), 1);
    view.connect_transaction(&spender, 2);
    assert!(!view.have_coin(&OutPoint::new(funding.hash(), 0)));

    let created = view.get_coin(&OutPoint::new(spender.hash(), 0)).unwrap();
    assert_eq!(created.height, 2);
    assert_eq!(created.value, 100);
    assert!(!created.is_coinbase);
    assert_eq!(view.len(), 1);
}

// -----------------------------------------------------------------------
// Pool and index
// -----------------------------------------------------------------------

#[test]
fn test_pool_lookup() {
    let pool = MemoryTxPool::new();
    let tx = spend_tx(Hash::new([6; 32]), 1);
    let h = pool.insert(tx.clone());
    assert_eq!(h, tx.hash());
    assert_eq!(*pool.find_by_hash(&h).unwrap(), tx);
    assert!(TxPool::contains(&pool, &h));
    pool.remove(&h);
    assert!(pool.find_by_hash(&h).is_none());
    assert!(pool.is_empty());

    pool.insert(tx.clone());
    pool.insert(spend_tx(Hash::new([9; 32]), 2));
    assert_eq!(pool.drain().len(), 2);
    assert!(pool.is_empty());
}

#[test]
fn test_index_block_positions() {
    let txs = vec![spend_tx(Hash::new([7; 32]), 1), spend_tx(Hash::new([8; 32]), 2)];
    let block = Block::new(header_on(Hash::default(), 1), txs.clone());
    let index = MemoryTxIndex::new();
    index.index_block(&block);

    let pos = index.resolve(&txs[1].hash()).unwrap();
    assert_eq!(pos.block_hash, block.hash());
    assert_eq!(pos.tx_offset, 1);
    assert!(index.resolve(&Hash::new([0xee; 32])).is_none());
}

// -----------------------------------------------------------------------
// Chain index and block store
// -----------------------------------------------------------------------

#[test]
fn test_chain_heights_and_membership() {
    init_logger();
    let chain = MemoryChain::new();
    let genesis = chain.push_header(header_on(Hash::default(), 0)).unwrap();
    let one = chain.push_header(header_on(genesis.hash, 1)).unwrap();
    let two = chain.push_header(header_on(one.hash, 2)).unwrap();

    assert_eq!(chain.active_height(), 2);
    assert_eq!(chain.index_at_height(1).unwrap(), one);
    assert_eq!(two.parent, Some(one.hash));
    assert!(chain.contains(&two));
    assert!(chain.index_at_height(3).is_none());

    let side = chain.add_side_header(header_on(one.hash, 99)).unwrap();
    assert_eq!(side.height, 2);
    assert!(!chain.contains(&side));
    assert_eq!(chain.find_block_index(&side.hash).unwrap(), side);

    assert_eq!(chain.disconnect_tip().unwrap(), two);
    assert!(!chain.contains(&two));
    assert_eq!(chain.active_height(), 1);
}

#[test]
fn test_chain_rejects_orphans() {
    let chain = MemoryChain::new();
    let genesis = chain.push_header(header_on(Hash::default(), 0)).unwrap();
    assert!(matches!(
        chain.push_header(header_on(Hash::new([1; 32]), 1)),
        Err(ChainStateError::OrphanBlock(_))
    ));
    assert!(chain.add_side_header(header_on(Hash::new([1; 32]), 1)).is_err());
    assert_eq!(chain.active_height(), genesis.height);
}

#[test]
fn test_block_store_read() {
    let chain = MemoryChain::new();
    let store = MemoryBlockStore::new();
    let block = Block::new(header_on(Hash::default(), 0), vec![spend_tx(Hash::new([1; 32]), 1)]);
    let entry = chain.push_header(block.header).unwrap();

    assert!(matches!(store.read_block(&entry), Err(ChainStateError::BlockNotFound(_))));
    store.put_block(block.clone());
    assert_eq!(store.read_block(&entry).unwrap(), block);
}
