//! Praxis SDK for Rust
//!
//! Type-safe client for the Praxis explorer API: search and fetch ERC-8004
//! agent identities, resolve IPFS-hosted agent cards through public gateways,
//! and drive the identity-registry registration flow through a wallet backend.

pub mod agent;
pub mod client;
pub mod config;
pub mod error;
pub mod ipfs;
pub mod log;
pub mod registry;
mod request;

pub use agent::{AgentRecord, RefreshRequest, SearchPage, SearchQuery};
pub use client::{Client, ClientBuilder};
pub use config::ExplorerConfig;
pub use error::{Error, GatewayFailure};
pub use ipfs::{
    candidate_urls, fetch_with_fallback, is_content_addressed, IpfsFetcher, DEFAULT_GATEWAYS,
};
pub use registry::{
    IdentityRegistry, MockWallet, Receipt, RegisterCall, Registration, RegistrationPhase,
    RegistryError, RegistryRead, Simulation, TxHandle, WalletBackend,
};
