//! Supply conservation invariant checker.
//!
//! Invariant enforced after every invocation:
//! ```text
//! Σ(balances) == Σ(minted) - Σ(burned)
//! ```
//!
//! Burns are fed from the contract's reported effects, mints from the host.
//! The ledger's own balance sum is checked against both, so a contract that
//! moved value it did not report (or reported value it did not move) trips
//! the check.

use escrow_types::{EscrowError, Result};

/// Running totals of value created and destroyed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SupplyConservation {
    minted: u128,
    burned: u128,
}

impl SupplyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_mint(&mut self, amount: u64) {
        self.minted += u128::from(amount);
    }

    pub fn record_burn(&mut self, amount: u64) {
        self.burned += u128::from(amount);
    }

    /// Expected total supply: minted - burned.
    #[must_use]
    pub fn expected_supply(&self) -> u128 {
        self.minted.saturating_sub(self.burned)
    }

    #[must_use]
    pub fn total_minted(&self) -> u128 {
        self.minted
    }

    #[must_use]
    pub fn total_burned(&self) -> u128 {
        self.burned
    }

    /// # Errors
    /// Returns [`EscrowError::SupplyInvariantViolation`] if actual ≠ expected.
    pub fn verify(&self, actual_supply: u128) -> Result<()> {
        let expected = self.expected_supply();
        if actual_supply != expected {
            return Err(EscrowError::SupplyInvariantViolation {
                reason: format!(
                    "actual supply {actual_supply} != expected {expected} \
                     (minted={}, burned={})",
                    self.minted, self.burned
                ),
            });
        }
        Ok(())
    }
}
