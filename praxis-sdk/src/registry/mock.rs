//! In-memory wallet backend for tests and offline demos.
//!
//! Keeps a list of registered agents; a confirmed registration appends to it,
//! so reads after `await_confirmation` observe the new agent.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{
    Receipt, RegisterCall, RegistryError, RegistryRead, Simulation, TxHandle, WalletBackend,
};

/// Mock wallet: fixed account, optional injected failures, in-memory registry.
pub struct MockWallet {
    account: Option<String>,
    /// (owner, token URI or domain) by agent id - 1.
    agents: Mutex<Vec<(String, String)>>,
    /// Sent but not yet confirmed, by tx hash.
    pending: Mutex<HashMap<String, (String, String)>>,
    registration_fee: u128,
    simulation_error: Option<String>,
    send_error: Option<String>,
    sends: AtomicUsize,
    next_tx: AtomicU64,
}

impl MockWallet {
    /// Wallet connected as `account`.
    pub fn connected(account: impl Into<String>) -> Self {
        Self::build(Some(account.into()))
    }

    /// Wallet with no connected account; every transaction call fails.
    pub fn disconnected() -> Self {
        Self::build(None)
    }

    fn build(account: Option<String>) -> Self {
        Self {
            account,
            agents: Mutex::new(Vec::new()),
            pending: Mutex::new(HashMap::new()),
            registration_fee: 0,
            simulation_error: None,
            send_error: None,
            sends: AtomicUsize::new(0),
            next_tx: AtomicU64::new(1),
        }
    }

    /// Pre-registers an agent (ids are assigned 1, 2, ...).
    pub fn with_agent(self, owner: impl Into<String>, token_uri: impl Into<String>) -> Self {
        self.agents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((owner.into(), token_uri.into()));
        self
    }

    pub fn with_registration_fee(mut self, wei: u128) -> Self {
        self.registration_fee = wei;
        self
    }

    /// Makes every `simulate` fail with `message` (e.g. a contract revert).
    pub fn with_simulation_error(mut self, message: impl Into<String>) -> Self {
        self.simulation_error = Some(message.into());
        self
    }

    /// Makes every `send` fail with `message` (e.g. user rejected).
    pub fn with_send_error(mut self, message: impl Into<String>) -> Self {
        self.send_error = Some(message.into());
        self
    }

    /// Number of `send` calls that reached the wallet.
    pub fn sends(&self) -> usize {
        self.sends.load(Ordering::SeqCst)
    }

    fn agent(&self, agent_id: u64) -> Result<(String, String), RegistryError> {
        let agents = self.agents.lock().unwrap_or_else(PoisonError::into_inner);
        agent_id
            .checked_sub(1)
            .and_then(|i| usize::try_from(i).ok())
            .and_then(|i| agents.get(i).cloned())
            .ok_or_else(|| RegistryError::Read(format!("nonexistent agent {}", agent_id)))
    }
}

#[async_trait]
impl WalletBackend for MockWallet {
    fn account(&self) -> Option<String> {
        self.account.clone()
    }

    async fn simulate(
        &self,
        registry: &str,
        call: &RegisterCall,
    ) -> Result<Simulation, RegistryError> {
        let from = self.account.clone().ok_or(RegistryError::WalletNotConnected)?;
        if let Some(msg) = &self.simulation_error {
            return Err(RegistryError::Simulation(msg.clone()));
        }
        if let RegisterCall::TokenUri { token_uri } = call {
            if token_uri.trim().is_empty() {
                return Err(RegistryError::Simulation("empty token URI".to_string()));
            }
        }
        let next_id = self.agents.lock().unwrap_or_else(PoisonError::into_inner).len() as u64 + 1;
        Ok(Simulation {
            registry: registry.to_string(),
            call: call.clone(),
            request: json!({ "from": from, "to": registry, "call": call }),
            predicted_agent_id: Some(next_id),
        })
    }

    async fn send(&self, simulation: &Simulation) -> Result<TxHandle, RegistryError> {
        let owner = self.account.clone().ok_or(RegistryError::WalletNotConnected)?;
        self.sends.fetch_add(1, Ordering::SeqCst);
        if let Some(msg) = &self.send_error {
            return Err(RegistryError::Send(msg.clone()));
        }
        let n = self.next_tx.fetch_add(1, Ordering::SeqCst);
        let hash = format!("0x{:064x}", n);
        let locator = match &simulation.call {
            RegisterCall::TokenUri { token_uri } => token_uri.clone(),
            RegisterCall::DomainAddress { domain, .. } => domain.clone(),
        };
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(hash.clone(), (owner, locator));
        Ok(TxHandle { hash })
    }

    async fn await_confirmation(&self, tx: &TxHandle) -> Result<Receipt, RegistryError> {
        let entry = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&tx.hash)
            .ok_or_else(|| RegistryError::Confirmation(format!("unknown transaction {}", tx.hash)))?;
        let mut agents = self.agents.lock().unwrap_or_else(PoisonError::into_inner);
        agents.push(entry);
        Ok(Receipt {
            tx_hash: tx.hash.clone(),
            block_number: self.next_tx.load(Ordering::SeqCst),
            success: true,
            agent_id: Some(agents.len() as u64),
        })
    }

    async fn read(&self, _registry: &str, call: RegistryRead) -> Result<Value, RegistryError> {
        match call {
            RegistryRead::TotalCount => {
                let n = self.agents.lock().unwrap_or_else(PoisonError::into_inner).len();
                Ok(json!(n))
            }
            RegistryRead::OwnerOf(id) => self.agent(id).map(|(owner, _)| json!(owner)),
            RegistryRead::TokenUri(id) => self.agent(id).map(|(_, uri)| json!(uri)),
            RegistryRead::RegistrationFee => Ok(json!(self.registration_fee.to_string())),
        }
    }
}
