//! Staged Remittance Lifecycle
//!
//! Every transfer runs in two phases against one partner:
//!
//! ```text
//! stage (create | disburse) → STAGED → process → PROCESSING → COMPLETED
//!                                                    ↓
//!                                                  FAILED
//! ```
//!
//! # Invariants
//!
//! 1. **Idempotency**: the caller order id is checked before any partner call
//!    and is unique in the store
//! 2. **Single confirm**: process claims the cached row with a CAS
//!    `STAGED → PROCESSING` before calling the partner
//! 3. **Explicit fail**: a row moves to `FAILED` only on an explicit partner
//!    rejection, never on a timeout or transport error
//! 4. **Audit**: process always appends exactly one history row; stage-create
//!    always appends one; stage-disburse appends one on failure

pub mod error;
pub mod history;
pub mod orchestrator;
pub mod records;
pub mod state;
pub mod types;


pub use error::{ErrorKind, PartnerFault, RemitError};
pub use history::HistoryGuard;
pub use orchestrator::{RegistryError, RemitOrchestrator};
pub use records::{CachedTxn, HistoryId, StagedPayload, TransactionHistory};
pub use state::{HistoryStatus, Step, TxnKind};
pub use types::{
    Agent, Party, PersonName, ProcessRemit, RemitResponse, Remittance, SearchRemit,
    TransactionId,
};
