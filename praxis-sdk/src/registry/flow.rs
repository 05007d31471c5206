//! Add-agent registration flow.
//!
//! Simulate first; sending is only possible from a successful simulation.
//! Sending and confirming are separate steps so callers can show each phase.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{Receipt, RegisterCall, RegistryError, Simulation, TxHandle, WalletBackend};
use crate::ipfs::is_content_addressed;

/// Where a registration currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationPhase {
    /// Editing; nothing simulated yet.
    Idle,
    /// Dry run succeeded; ready to send.
    Simulated(Simulation),
    SimulationFailed(RegistryError),
    /// Waiting for the wallet to sign and broadcast.
    Sending,
    /// Broadcast; waiting to be mined.
    Confirming(TxHandle),
    Confirmed(Receipt),
    /// Send or confirmation failed.
    Failed(RegistryError),
}

type Observer = Box<dyn Fn(&RegistrationPhase) + Send + Sync>;

/// Registration of a new agent by token URI.
pub struct Registration {
    wallet: Arc<dyn WalletBackend>,
    registry: String,
    token_uri: String,
    phase: RegistrationPhase,
    observer: Option<Observer>,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("registry", &self.registry)
            .field("token_uri", &self.token_uri)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl Registration {
    pub fn new(registry: impl Into<String>, wallet: Arc<dyn WalletBackend>) -> Self {
        Self {
            wallet,
            registry: registry.into(),
            token_uri: String::new(),
            phase: RegistrationPhase::Idle,
            observer: None,
        }
    }

    /// Calls `f` on every phase change, including the transient `Sending`.
    pub fn on_transition<F>(mut self, f: F) -> Self
    where
        F: Fn(&RegistrationPhase) + Send + Sync + 'static,
    {
        self.observer = Some(Box::new(f));
        self
    }

    /// Replaces the token URI; any previous simulation is discarded.
    pub fn set_token_uri(&mut self, token_uri: impl Into<String>) {
        self.token_uri = token_uri.into();
        self.transition(RegistrationPhase::Idle);
    }

    pub fn token_uri(&self) -> &str {
        &self.token_uri
    }

    pub fn phase(&self) -> &RegistrationPhase {
        &self.phase
    }

    /// Non-blank token URI.
    pub fn token_uri_ok(&self) -> bool {
        !self.token_uri.trim().is_empty()
    }

    /// The token URI points at IPFS; the card will be resolved through gateways.
    pub fn is_ipfs(&self) -> bool {
        is_content_addressed(self.token_uri.trim())
    }

    pub fn is_connected(&self) -> bool {
        self.wallet.account().is_some()
    }

    /// Connected, non-blank URI, and simulated.
    pub fn can_submit(&self) -> bool {
        self.is_connected()
            && self.token_uri_ok()
            && matches!(self.phase, RegistrationPhase::Simulated(_))
    }

    /// Button label for the current phase.
    pub fn status_label(&self) -> &'static str {
        match self.phase {
            RegistrationPhase::Sending => "Sending...",
            RegistrationPhase::Confirming(_) => "Confirming...",
            _ => "Register Agent",
        }
    }

    /// Error to show, if the last step failed.
    pub fn error(&self) -> Option<&RegistryError> {
        match &self.phase {
            RegistrationPhase::SimulationFailed(e) | RegistrationPhase::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Dry-runs `register(tokenURI)`.
    ///
    /// Fails without touching the phase when the wallet is disconnected or
    /// the URI is blank.
    pub async fn simulate(&mut self) -> Result<Simulation, RegistryError> {
        self.check_inputs()?;
        let call = RegisterCall::TokenUri {
            token_uri: self.token_uri.trim().to_string(),
        };
        debug!(registry = %self.registry, ipfs = self.is_ipfs(), "simulating registration");
        match self.wallet.simulate(&self.registry, &call).await {
            Ok(sim) => {
                info!(predicted_agent_id = ?sim.predicted_agent_id, "registration simulated");
                self.transition(RegistrationPhase::Simulated(sim.clone()));
                Ok(sim)
            }
            Err(e) => {
                warn!(error = %e, "registration simulation failed");
                self.transition(RegistrationPhase::SimulationFailed(e.clone()));
                Err(e)
            }
        }
    }

    /// Sends the simulated transaction; moves to `Confirming` on success.
    pub async fn send(&mut self) -> Result<TxHandle, RegistryError> {
        self.check_inputs()?;
        let sim = match &self.phase {
            RegistrationPhase::Simulated(sim) => sim.clone(),
            _ => return Err(RegistryError::NotSimulated),
        };
        self.transition(RegistrationPhase::Sending);
        match self.wallet.send(&sim).await {
            Ok(tx) => {
                info!(tx = %tx.short_hash(), "registration submitted");
                self.transition(RegistrationPhase::Confirming(tx.clone()));
                Ok(tx)
            }
            Err(e) => {
                warn!(error = %e, "registration send failed");
                self.transition(RegistrationPhase::Failed(e.clone()));
                Err(e)
            }
        }
    }

    /// Waits for the submitted transaction. Clears the token URI on success.
    pub async fn confirm(&mut self) -> Result<Receipt, RegistryError> {
        let tx = match &self.phase {
            RegistrationPhase::Confirming(tx) => tx.clone(),
            other => {
                return Err(RegistryError::InvalidState(format!(
                    "no transaction awaiting confirmation ({:?})",
                    PhaseName(other)
                )))
            }
        };
        let result = match self.wallet.await_confirmation(&tx).await {
            Ok(receipt) if receipt.success => Ok(receipt),
            Ok(receipt) => Err(RegistryError::Confirmation(format!(
                "transaction {} reverted",
                receipt.tx_hash
            ))),
            Err(e) => Err(e),
        };
        match result {
            Ok(receipt) => {
                info!(agent_id = ?receipt.agent_id, block = receipt.block_number, "registration confirmed");
                self.token_uri.clear();
                self.transition(RegistrationPhase::Confirmed(receipt.clone()));
                Ok(receipt)
            }
            Err(e) => {
                warn!(error = %e, "registration confirmation failed");
                self.transition(RegistrationPhase::Failed(e.clone()));
                Err(e)
            }
        }
    }

    /// `send` then `confirm`.
    pub async fn submit(&mut self) -> Result<Receipt, RegistryError> {
        self.send().await?;
        self.confirm().await
    }

    fn check_inputs(&self) -> Result<(), RegistryError> {
        if !self.is_connected() {
            return Err(RegistryError::WalletNotConnected);
        }
        if !self.token_uri_ok() {
            return Err(RegistryError::EmptyTokenUri);
        }
        Ok(())
    }

    fn transition(&mut self, next: RegistrationPhase) {
        debug!(from = ?PhaseName(&self.phase), to = ?PhaseName(&next), "registration phase");
        self.phase = next;
        if let Some(observer) = &self.observer {
            observer(&self.phase);
        }
    }
}

/// Phase without its payload, for logs.
struct PhaseName<'a>(&'a RegistrationPhase);

impl fmt::Debug for PhaseName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.0 {
            RegistrationPhase::Idle => "Idle",
            RegistrationPhase::Simulated(_) => "Simulated",
            RegistrationPhase::SimulationFailed(_) => "SimulationFailed",
            RegistrationPhase::Sending => "Sending",
            RegistrationPhase::Confirming(_) => "Confirming",
            RegistrationPhase::Confirmed(_) => "Confirmed",
            RegistrationPhase::Failed(_) => "Failed",
        };
        f.write_str(name)
    }
}
