//! ERC-8004 identity registry access through a wallet backend.
//!
//! - `WalletBackend`: simulate / send / await-confirmation / view-call capability
//! - `IdentityRegistry`: typed read accessors over one registry contract
//! - `Registration`: the add-agent flow (simulate before send, three visible phases)
//! - `MockWallet`: in-memory backend for tests and offline demos

mod flow;
mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

pub use flow::{Registration, RegistrationPhase};
pub use mock::MockWallet;

/// Wallet and contract-call errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("wallet not connected")]
    WalletNotConnected,
    #[error("token URI is required")]
    EmptyTokenUri,
    #[error("registration has not been simulated")]
    NotSimulated,
    #[error("simulation failed: {0}")]
    Simulation(String),
    #[error("transaction send failed: {0}")]
    Send(String),
    #[error("confirmation failed: {0}")]
    Confirmation(String),
    #[error("contract read failed: {0}")]
    Read(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
}

/// A state-changing registration call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "function", rename_all_fields = "camelCase")]
pub enum RegisterCall {
    /// `register(string tokenURI) returns (uint256 agentId)`
    #[serde(rename = "register")]
    TokenUri { token_uri: String },
    /// `newAgent(string agentDomain, address agentAddress) returns (uint256 agentId)`
    #[serde(rename = "newAgent")]
    DomainAddress { domain: String, address: String },
}

/// A view call on the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryRead {
    /// `totalSupply()` / `getAgentCount()`
    TotalCount,
    /// `ownerOf(uint256)`
    OwnerOf(u64),
    /// `tokenURI(uint256)`
    TokenUri(u64),
    /// `REGISTRATION_FEE()`
    RegistrationFee,
}

/// Outcome of a successful dry run; the only value `send` accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simulation {
    pub registry: String,
    pub call: RegisterCall,
    /// Prepared transaction request as the wallet encodes it.
    pub request: Value,
    /// Return value of the dry run, when the backend reports it.
    pub predicted_agent_id: Option<u64>,
}

/// A submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TxHandle {
    pub hash: String,
}

impl TxHandle {
    /// First 10 characters of the hash, for status lines.
    pub fn short_hash(&self) -> &str {
        self.hash.get(..10).unwrap_or(&self.hash)
    }
}

/// A mined transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: String,
    pub block_number: u64,
    pub success: bool,
    /// Agent id taken from the registration event, if decoded.
    pub agent_id: Option<u64>,
}

/// Wallet-connection capability: the transaction lifecycle is owned by the backend.
#[async_trait]
pub trait WalletBackend: Send + Sync {
    /// Connected account address, `None` when disconnected.
    fn account(&self) -> Option<String>;

    /// Dry-runs `call` against `registry`.
    async fn simulate(&self, registry: &str, call: &RegisterCall)
        -> Result<Simulation, RegistryError>;

    /// Signs and broadcasts a simulated call.
    async fn send(&self, simulation: &Simulation) -> Result<TxHandle, RegistryError>;

    /// Waits until `tx` is mined.
    async fn await_confirmation(&self, tx: &TxHandle) -> Result<Receipt, RegistryError>;

    /// Executes a view call and returns the decoded value.
    async fn read(&self, registry: &str, call: RegistryRead) -> Result<Value, RegistryError>;
}

/// Typed read accessors for one registry contract.
#[derive(Clone)]
pub struct IdentityRegistry {
    address: String,
    wallet: Arc<dyn WalletBackend>,
}

impl IdentityRegistry {
    pub fn new(address: impl Into<String>, wallet: Arc<dyn WalletBackend>) -> Self {
        Self {
            address: address.into(),
            wallet,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Number of registered agents.
    pub async fn total_agents(&self) -> Result<u64, RegistryError> {
        let v = self.wallet.read(&self.address, RegistryRead::TotalCount).await?;
        as_u64(&v)
    }

    /// Owner address of `agent_id`.
    pub async fn owner_of(&self, agent_id: u64) -> Result<String, RegistryError> {
        let v = self
            .wallet
            .read(&self.address, RegistryRead::OwnerOf(agent_id))
            .await?;
        as_string(v)
    }

    /// Token URI (agent card location) of `agent_id`.
    pub async fn token_uri(&self, agent_id: u64) -> Result<String, RegistryError> {
        let v = self
            .wallet
            .read(&self.address, RegistryRead::TokenUri(agent_id))
            .await?;
        as_string(v)
    }

    /// Registration fee in wei.
    pub async fn registration_fee(&self) -> Result<u128, RegistryError> {
        let v = self
            .wallet
            .read(&self.address, RegistryRead::RegistrationFee)
            .await?;
        match &v {
            Value::String(s) => s.parse::<u128>().map_err(|e| RegistryError::Read(e.to_string())),
            _ => as_u64(&v).map(u128::from),
        }
    }
}

/// uint256 values arrive either as JSON numbers or decimal strings.
fn as_u64(v: &Value) -> Result<u64, RegistryError> {
    match v {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| RegistryError::Read(format!("not an unsigned integer: {}", n))),
        Value::String(s) => s
            .parse::<u64>()
            .map_err(|e| RegistryError::Read(format!("{:?}: {}", s, e))),
        other => Err(RegistryError::Read(format!("unexpected value: {}", other))),
    }
}

fn as_string(v: Value) -> Result<String, RegistryError> {
    match v {
        Value::String(s) => Ok(s),
        other => Err(RegistryError::Read(format!("expected string, got {}", other))),
    }
}
