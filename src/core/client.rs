//! Network configuration and the transport seam.
//!
//! The crate builds and signs transactions; it does not speak HTTP. The
//! transport lives behind [`TransactionSubmitter`] so callers can plug in
//! whatever client they run, and tests can plug in a mock.

use crate::core::transaction::SignedTransaction;
use crate::types::hash::Hash;

/// Header every request to a fullnode should carry so operators can
/// attribute traffic to a client implementation.
pub const CLIENT_HEADER: &str = "x-aptos-client";

/// Value for [`CLIENT_HEADER`]: client name and crate version.
pub const CLIENT_HEADER_VALUE: &str = concat!("aptos-client-rust/", env!("CARGO_PKG_VERSION"));

/// Everything needed to address one deployment of the network.
///
/// Configuration is an explicit value handed to whatever transport the
/// caller wires up; nothing in this crate reads it from global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub name: &'static str,
    /// Published chain id, or 0 where the deployment rotates its id on
    /// reset (devnet) and it must be fetched from the node.
    pub chain_id: u8,
    pub node_url: &'static str,
    pub faucet_url: Option<&'static str>,
}

impl NetworkConfig {
    pub const MAINNET: NetworkConfig = NetworkConfig {
        name: "mainnet",
        chain_id: 1,
        node_url: "https://api.mainnet.aptoslabs.com/v1",
        faucet_url: None,
    };

    pub const TESTNET: NetworkConfig = NetworkConfig {
        name: "testnet",
        chain_id: 2,
        node_url: "https://api.testnet.aptoslabs.com/v1",
        faucet_url: Some("https://faucet.testnet.aptoslabs.com"),
    };

    /// Devnet resets weekly; its chain id is only knowable at runtime.
    pub const DEVNET: NetworkConfig = NetworkConfig {
        name: "devnet",
        chain_id: 0,
        node_url: "https://api.devnet.aptoslabs.com/v1",
        faucet_url: Some("https://faucet.devnet.aptoslabs.com"),
    };

    pub const LOCALNET: NetworkConfig = NetworkConfig {
        name: "localnet",
        chain_id: 4,
        node_url: "http://localhost:8080/v1",
        faucet_url: Some("http://localhost:8081"),
    };
}

/// Terminal outcome of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitStatus {
    /// Executed and committed successfully.
    Success,
    /// Committed but the payload aborted; carries the VM status string.
    Failure { vm_status: String },
}

/// The two capabilities a transport must provide.
///
/// Implementations decide their own timeout and retry policy; callers of
/// `wait_for_transaction` only learn the terminal status.
pub trait TransactionSubmitter {
    type Error;

    /// Submits a signed transaction, returning its transaction hash.
    fn submit_transaction(&mut self, txn: &SignedTransaction) -> Result<Hash, Self::Error>;

    /// Blocks until the transaction reaches a terminal status.
    fn wait_for_transaction(&mut self, hash: &Hash) -> Result<CommitStatus, Self::Error>;
}
