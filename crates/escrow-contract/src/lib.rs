//! # escrow-contract
//!
//! **Two-party escrow contract**: a buyer deposits value, both parties
//! confirm and the seller is paid, or either party cancels and the buyer is
//! refunded.
//!
//! ## Architecture
//!
//! 1. **EscrowMachine**: the record and its four escrow entry points
//! 2. **RewardCounters**: Echo/Burn pass-throughs and their call counters
//! 3. **Ledger**: the host seam through which value leaves the contract
//! 4. **EscrowContract**: initialization, dispatch by procedure index, snapshots
//!
//! ## Invocation Flow
//!
//! ```text
//! Host → EscrowContract.invoke_procedure(index, invocation, ledger)
//!      → EscrowMachine / RewardCounters → Ledger.transfer() | Ledger.burn()
//! ```
//!
//! Precondition failures never surface to the caller: they come back as
//! [`escrow_types::Outcome::Rejected`] internally and as `Ok(())` outside.

pub mod contract;
pub mod ledger;
pub mod machine;
pub mod rewards;
pub mod snapshot;

pub use contract::{EscrowContract, FunctionOutput};
pub use ledger::Ledger;
#[cfg(any(test, feature = "test-helpers"))]
pub use ledger::RecordingLedger;
pub use machine::EscrowMachine;
pub use rewards::RewardCounters;
pub use snapshot::ContractSnapshot;
