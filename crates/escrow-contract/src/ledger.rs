//! The host ledger seam.
//!
//! The contract never touches balances directly. Value leaves the contract
//! account only through this trait: a transfer to some identity, or a burn.
//! Hosts guarantee the contract account can cover what the contract asks
//! for, so an `Err` here means the host itself is broken and the
//! invocation must abort.

use escrow_types::{Identity, Result};

/// Outward value movements available to the contract.
pub trait Ledger {
    /// Move `amount` from the contract account to `to`.
    fn transfer(&mut self, to: Identity, amount: u64) -> Result<()>;

    /// Permanently remove `amount` held by the contract account from circulation.
    fn burn(&mut self, amount: u64) -> Result<()>;
}

impl<L: Ledger + ?Sized> Ledger for &mut L {
    fn transfer(&mut self, to: Identity, amount: u64) -> Result<()> {
        (**self).transfer(to, amount)
    }

    fn burn(&mut self, amount: u64) -> Result<()> {
        (**self).burn(amount)
    }
}

/// Ledger double that records every instruction. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Default)]
pub struct RecordingLedger {
    /// Transfers in the order they were issued.
    pub transfers: Vec<(Identity, u64)>,
    /// Burns in the order they were issued.
    pub burns: Vec<u64>,
    /// When set, every instruction fails with a ledger fault.
    pub faulty: bool,
}

#[cfg(any(test, feature = "test-helpers"))]
impl RecordingLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn faulty() -> Self {
        Self {
            faulty: true,
            ..Self::default()
        }
    }

    /// Total value sent to `to`.
    #[must_use]
    pub fn sent_to(&self, to: Identity) -> u64 {
        self.transfers
            .iter()
            .filter(|(dest, _)| *dest == to)
            .map(|(_, amount)| amount)
            .sum()
    }

    fn check(&self) -> Result<()> {
        if self.faulty {
            return Err(escrow_types::EscrowError::Ledger {
                reason: "recording ledger set to fail".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl Ledger for RecordingLedger {
    fn transfer(&mut self, to: Identity, amount: u64) -> Result<()> {
        self.check()?;
        self.transfers.push((to, amount));
        Ok(())
    }

    fn burn(&mut self, amount: u64) -> Result<()> {
        self.check()?;
        self.burns.push(amount);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pay<L: Ledger>(mut ledger: L, to: Identity) -> Result<()> {
        ledger.transfer(to, 5)?;
        ledger.burn(2)
    }

    #[test]
    fn mut_ref_forwards() {
        let mut ledger = RecordingLedger::new();
        let to = Identity::random();
        pay(&mut ledger, to).unwrap();
        assert_eq!(ledger.transfers, vec![(to, 5)]);
        assert_eq!(ledger.burns, vec![2]);
        assert_eq!(ledger.sent_to(to), 5);
    }

    #[test]
    fn faulty_ledger_records_nothing() {
        let mut ledger = RecordingLedger::faulty();
        assert!(ledger.transfer(Identity::random(), 1).is_err());
        assert!(ledger.burn(1).is_err());
        assert!(ledger.transfers.is_empty());
        assert!(ledger.burns.is_empty());
    }
}
