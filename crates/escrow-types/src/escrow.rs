//! # EscrowRecord: the single pending transaction
//!
//! ## State Machine
//!
//! ```text
//!   ┌──────────────────┐  deposit   ┌───────────┐  both confirm  ┌──────────┐
//!   │ AWAITING_DEPOSIT ├───────────▶│ DEPOSITED ├───────────────▶│ RELEASED │
//!   └──────────────────┘            └─────┬─────┘                └──────────┘
//!                                         │ buyer or seller cancels
//!                                         ▼
//!                                   ┌───────────┐
//!                                   │ CANCELLED │
//!                                   └───────────┘
//! ```
//!
//! Released and Cancelled are terminal: no transition leaves them, so the
//! escrowed amount can move out at most once per record lifetime.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{EscrowError, Identity, Result};

/// Lifecycle stage of the escrow record.
///
/// Transitions are **monotonic**:
/// - `AwaitingDeposit → Deposited`
/// - `Deposited → Released` (both parties confirmed)
/// - `Deposited → Cancelled` (either party cancelled)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EscrowStatus {
    /// No value held. Anyone may deposit.
    AwaitingDeposit,
    /// Value held, waiting for confirmations or a cancel.
    Deposited,
    /// Value paid out to the seller. **Terminal.**
    Released,
    /// Value refunded to the buyer. **Terminal.**
    Cancelled,
}

impl EscrowStatus {
    /// Can the record move from this status to `target`?
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::AwaitingDeposit, Self::Deposited)
                | (Self::Deposited, Self::Released | Self::Cancelled)
        )
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Released | Self::Cancelled)
    }
}

impl fmt::Display for EscrowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingDeposit => write!(f, "AWAITING_DEPOSIT"),
            Self::Deposited => write!(f, "DEPOSITED"),
            Self::Released => write!(f, "RELEASED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// The two roles in an escrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Party {
    Buyer,
    Seller,
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buyer => write!(f, "BUYER"),
            Self::Seller => write!(f, "SELLER"),
        }
    }
}

/// The contract's escrow state.
///
/// The seller is fixed when the record is created. The buyer is whoever
/// made the deposit and stays `None` until then.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowRecord {
    pub status: EscrowStatus,
    /// Value currently held. Non-zero only while `Deposited`.
    pub amount: u64,
    pub buyer: Option<Identity>,
    pub seller: Identity,
    pub buyer_confirmed: bool,
    pub seller_confirmed: bool,
}

impl EscrowRecord {
    /// Fresh record awaiting a deposit.
    #[must_use]
    pub fn new(seller: Identity) -> Self {
        Self {
            status: EscrowStatus::AwaitingDeposit,
            amount: 0,
            buyer: None,
            seller,
            buyer_confirmed: false,
            seller_confirmed: false,
        }
    }

    #[must_use]
    pub fn is_buyer(&self, who: Identity) -> bool {
        self.buyer == Some(who)
    }

    #[must_use]
    pub fn is_seller(&self, who: Identity) -> bool {
        self.seller == who
    }

    /// Record a deposit. Starts a fresh confirmation cycle.
    ///
    /// # Errors
    /// Returns `InvariantViolation` if the record is not awaiting a deposit
    /// or `amount` is zero; callers check both before getting here.
    pub fn mark_deposited(&mut self, buyer: Identity, amount: u64) -> Result<()> {
        self.guard_transition(EscrowStatus::Deposited)?;
        if amount == 0 {
            return Err(EscrowError::InvariantViolation {
                reason: "cannot enter DEPOSITED with zero amount".to_string(),
            });
        }
        self.buyer = Some(buyer);
        self.amount = amount;
        self.status = EscrowStatus::Deposited;
        self.buyer_confirmed = false;
        self.seller_confirmed = false;
        Ok(())
    }

    /// Move to RELEASED, returning the amount that leaves escrow.
    pub fn mark_released(&mut self) -> Result<u64> {
        self.close(EscrowStatus::Released)
    }

    /// Move to CANCELLED, returning the amount that leaves escrow.
    pub fn mark_cancelled(&mut self) -> Result<u64> {
        self.close(EscrowStatus::Cancelled)
    }

    fn close(&mut self, target: EscrowStatus) -> Result<u64> {
        self.guard_transition(target)?;
        let amount = std::mem::take(&mut self.amount);
        self.status = target;
        self.buyer_confirmed = false;
        self.seller_confirmed = false;
        Ok(amount)
    }

    fn guard_transition(&self, target: EscrowStatus) -> Result<()> {
        if self.status.can_transition_to(target) {
            Ok(())
        } else {
            Err(EscrowError::InvariantViolation {
                reason: format!("illegal transition {} -> {target}", self.status),
            })
        }
    }

    /// Check the structural invariants of the record.
    ///
    /// - `amount > 0` iff `Deposited`
    /// - confirmation flags only set while `Deposited`
    /// - buyer present iff a deposit has happened
    /// - seller is never the null identity
    ///
    /// # Errors
    /// Returns [`EscrowError::InvariantViolation`] naming the first broken rule.
    pub fn check_invariants(&self) -> Result<()> {
        let deposited = self.status == EscrowStatus::Deposited;
        let violation =
            |reason: String| -> Result<()> { Err(EscrowError::InvariantViolation { reason }) };

        if deposited && self.amount == 0 {
            return violation("DEPOSITED with zero amount".to_string());
        }
        if !deposited && self.amount != 0 {
            return violation(format!("{} holding amount {}", self.status, self.amount));
        }
        if !deposited && (self.buyer_confirmed || self.seller_confirmed) {
            return violation(format!("confirmation flag set while {}", self.status));
        }
        if self.buyer.is_some() == (self.status == EscrowStatus::AwaitingDeposit) {
            return violation(format!(
                "buyer {} while {}",
                if self.buyer.is_some() { "set" } else { "missing" },
                self.status
            ));
        }
        if self.seller.is_null() {
            return violation("seller is the null identity".to_string());
        }
        Ok(())
    }
}
