//! Ledger business services.
//!
//! # Responsibility
//! - Orchestrate entity-store calls into invariant-preserving operations.
//! - Keep presentation layers decoupled from storage details.

pub mod allocation;
pub mod backup;
pub mod ledger;
pub mod scheduler;
