//! # escrow-types
//!
//! Shared types, errors, and configuration for the two-party escrow contract.
//!
//! This crate is the leaf dependency of the workspace. Every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Identity`], [`InvocationId`]
//! - **Invocation envelope**: [`Invocation`], [`Operation`], [`Function`]
//! - **Escrow model**: [`EscrowRecord`], [`EscrowStatus`], [`Party`]
//! - **Outcomes**: [`Outcome`], [`Effect`], [`Rejection`]
//! - **Statistics**: [`ContractStats`]
//! - **Configuration**: [`ContractConfig`]
//! - **Errors**: [`EscrowError`] with `ESC_ERR_` prefix codes
//! - **Constants**: dispatch indices and defaults

pub mod config;
pub mod constants;
pub mod error;
pub mod escrow;
pub mod ids;
pub mod invocation;
pub mod outcome;
pub mod stats;

// Re-export all primary types at crate root for ergonomic imports:
//   use escrow_types::{EscrowRecord, EscrowStatus, Identity, ...};

pub use config::*;
pub use error::*;
pub use escrow::*;
pub use ids::*;
pub use invocation::*;
pub use outcome::*;
pub use stats::*;

// Constants are accessed via `escrow_types::constants::FOO`
// (not re-exported to avoid name collisions).
