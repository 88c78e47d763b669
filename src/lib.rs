//! Remit Gateway - multi-partner remittance orchestration
//!
//! One transaction model (stage, process, search, list) executed by many
//! incompatible money-transfer partners.
//!
//! # Modules
//!
//! - [`money`] - Currency-tagged minor-unit amounts
//! - [`remit`] - Lifecycle types, error taxonomy, history recorder, orchestrator
//! - [`partners`] - Per-partner adapters and their error tables
//! - [`client`] - Partner client contract (HTTP and mock)
//! - [`store`] - Transaction store (PostgreSQL and in-memory)
//! - [`config`] - YAML configuration
//! - [`logging`] - Tracing bootstrap
//! - [`db`] - PostgreSQL pool

pub mod client;
pub mod config;
pub mod db;
pub mod logging;
pub mod money;
pub mod partners;
pub mod remit;
pub mod store;

// Convenient re-exports at crate root
pub use money::{Currency, Money, MoneyError};
pub use partners::{PartnerAdapter, PartnerProfile, RemitAdapter};
pub use remit::{
    ErrorKind, ProcessRemit, RemitError, RemitOrchestrator, RemitResponse, Remittance,
    SearchRemit, TransactionId,
};
pub use store::{ListFilter, MemoryStore, PgStore, TransactionStore};
