//! End-to-end raw-transaction flow over in-memory chain state.

use std::sync::Arc;

use bsv_node::chainstate::{
    MemoryBlockStore, MemoryChain, MemoryCoinView, MemoryTxIndex, MemoryTxPool,
};
use bsv_node::primitives::chainhash::Hash;
use bsv_node::rawtx::{
    CreateRawTransactionCmd, GetRawTransactionCmd, NodeContext, RawTransactionReply, RawTxConfig,
    RawTxRpc, RecordingRelay, RpcError, SendRawTransactionCmd,
};
use bsv_node::script::Script;
use bsv_node::transaction::{Block, BlockHeader, OutPoint, Transaction, TransactionInput, TransactionOutput};

const FUNDING_ADDR: &str = "1E7ucTTWRTahCyViPhxSMor2pj4VGQdFMr";

struct Harness {
    coins: Arc<MemoryCoinView>,
    pool: Arc<MemoryTxPool>,
    index: Arc<MemoryTxIndex>,
    chain: Arc<MemoryChain>,
    blocks: Arc<MemoryBlockStore>,
    relay: Arc<RecordingRelay>,
}

impl Harness {
    fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let pool = Arc::new(MemoryTxPool::new());
        Harness {
            coins: Arc::new(MemoryCoinView::new()),
            relay: Arc::new(RecordingRelay::accepting_into(pool.clone())),
            pool,
            index: Arc::new(MemoryTxIndex::new()),
            chain: Arc::new(MemoryChain::new()),
            blocks: Arc::new(MemoryBlockStore::new()),
        }
    }

    fn rpc(&self, config: RawTxConfig) -> RawTxRpc {
        RawTxRpc::new(
            config,
            NodeContext {
                coins: self.coins.clone(),
                pool: self.pool.clone(),
                tx_index: Some(self.index.clone()),
                chain: self.chain.clone(),
                blocks: self.blocks.clone(),
                relay: self.relay.clone(),
            },
        )
    }

    /// Mine the pooled transactions (plus a coinbase) on top of `prev`,
    /// moving them from the pool into the chain state.
    fn mine(&self, prev: Hash, height: u32) -> Hash {
        let mut script = Script::new();
        script.append_number(height as i64 + 100).unwrap();
        let mut coinbase = Transaction::new();
        coinbase.add_input(TransactionInput {
            previous_output: OutPoint::null(),
            unlocking_script: script,
            sequence: u32::MAX,
        });
        coinbase.add_output(TransactionOutput::new(5_000_000_000, Script::from_hex("51").unwrap()));

        let mut txs = vec![coinbase];
        txs.extend(self.pool.drain().into_iter().map(|tx| (*tx).clone()));

        let mut block = Block::new(BlockHeader::default(), txs);
        block.header = BlockHeader {
            version: 1,
            prev_block: prev,
            merkle_root: block.compute_merkle_root(),
            timestamp: 1_700_000_000 + height,
            bits: 0x207f_ffff,
            nonce: height,
        };
        self.chain.push_header(block.header).unwrap();
        self.index.index_block(&block);
        for tx in &block.transactions {
            self.coins.connect_transaction(tx, height);
        }
        self.blocks.put_block(block)
    }
}

fn create_cmd(txid: &str, vout: i64) -> CreateRawTransactionCmd {
    let json = format!(
        r#"{{"inputs":[{{"txid":"{}","vout":{}}}],"amounts":{{"{}":0.75}}}}"#,
        txid, vout, FUNDING_ADDR
    );
    serde_json::from_str(&json).unwrap()
}

#[test]
fn create_send_mine_and_look_up() {
    let node = Harness::new();
    let genesis = node.mine(Hash::default(), 0);
    let rpc = node.rpc(RawTxConfig::default());

    // Build and submit a spend.
    let prev = Hash::new([0x42; 32]).to_string();
    let hex = rpc.create_raw_transaction(&create_cmd(&prev, 0)).unwrap();
    let send = SendRawTransactionCmd { hex_tx: hex.clone(), allow_high_fees: None };
    let txid = rpc.send_raw_transaction(&send).unwrap();
    let tx = Transaction::from_hex(&hex).unwrap();
    assert_eq!(txid, tx.hash().to_string());

    // Pooled: found with no block.
    let get = GetRawTransactionCmd { txid: txid.clone(), verbose: Some(1) };
    let json = serde_json::to_value(rpc.get_raw_transaction(&get).unwrap()).unwrap();
    assert!(json.get("blockhash").is_none());
    assert_eq!(json["vout"][0]["n"], 0);

    // Resubmitting a pooled transaction reprocesses it.
    assert_eq!(rpc.send_raw_transaction(&send).unwrap(), txid);
    assert_eq!(node.relay.log().reprocessed, vec![tx.hash()]);

    // Mined: found through the coin view, one confirmation.
    let block = node.mine(genesis, 1);
    assert!(node.pool.is_empty());
    match rpc.get_raw_transaction(&get).unwrap() {
        RawTransactionReply::Verbose(result) => {
            assert_eq!(result.blockhash, Some(block.to_string()));
            assert_eq!(result.confirmations, Some(1));
            assert_eq!(result.time, Some(1_700_000_001));
        }
        other => panic!("unexpected reply {:?}", other),
    }

    // Resubmitting a confirmed transaction is refused.
    let err = rpc.send_raw_transaction(&send).unwrap_err();
    assert!(matches!(err, RpcError::AlreadyInChain(_)));

    // Once its only output is spent, only the index can find it.
    node.coins.spend_coin(&OutPoint::new(tx.hash(), 0));
    assert_eq!(rpc.get_raw_transaction(&get).unwrap_err().code(), -5);
    let indexed = node.rpc(RawTxConfig { tx_index: true, ..RawTxConfig::default() });
    let get_hex = GetRawTransactionCmd { txid, verbose: None };
    assert_eq!(indexed.get_raw_transaction(&get_hex).unwrap(), RawTransactionReply::Hex(hex));
}

#[test]
fn config_from_json_drives_the_service() {
    let node = Harness::new();
    node.mine(Hash::default(), 0);
    let config = RawTxConfig::from_json_str(r#"{"network":"testnet","max_tx_fee":2500}"#).unwrap();
    let rpc = node.rpc(config);

    // Mainnet destinations are refused on testnet.
    let err = rpc.create_raw_transaction(&create_cmd(&Hash::new([1; 32]).to_string(), 0)).unwrap_err();
    assert_eq!(err.code(), -5);

    let mut tx = Transaction::new();
    tx.add_input(TransactionInput::new(OutPoint::new(Hash::new([2; 32]), 1), u32::MAX));
    tx.add_output(TransactionOutput::new(1_000, Script::from_hex("51").unwrap()));
    let send = SendRawTransactionCmd { hex_tx: tx.to_hex(), allow_high_fees: Some(false) };
    rpc.send_raw_transaction(&send).unwrap();
    assert_eq!(node.relay.log().submitted, vec![(tx.hash(), 2500)]);
}
