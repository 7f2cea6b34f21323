//! # escrow-host
//!
//! **Reference host** for the escrow contract: the ledger, invocation
//! envelope, and audit loop that a real ledger-processing node provides.
//!
//! ## Architecture
//!
//! 1. **InMemoryLedger**: per-identity balances plus the contract account, journaled
//! 2. **SupplyConservation**: `Σ balances == minted - burned`
//! 3. **Host**: attaches invocation value, dispatches, rolls back on fault, audits
//!
//! ## Invocation Flow
//!
//! ```text
//! Host.invoke(caller, value, procedure)
//!     → InMemoryLedger.attach() → EscrowContract.execute() → Host.audit()
//! ```

pub mod host;
pub mod ledger;
pub mod supply_conservation;

pub use host::{Host, InvocationReceipt};
pub use ledger::{Checkpoint, EntryKind, InMemoryLedger, LedgerEntry};
pub use supply_conservation::SupplyConservation;
