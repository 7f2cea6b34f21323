//! The escrow state machine.
//!
//! Four entry points act on the single [`EscrowRecord`]. Any identity may
//! call any of them at any time, so every entry point re-validates status
//! first and caller second; the first failing check becomes the
//! [`Rejection`] reason and nothing changes.
//!
//! Release needs both confirmations. Cancel needs only one party. Whichever
//! confirmation arrives second triggers the payout, in either order.
//!
//! Value leaves escrow through the [`Ledger`] *before* the record is
//! updated: if the host faults, the record is untouched and the error
//! propagates.

use escrow_types::{
    Effect, EscrowRecord, EscrowStatus, Identity, Invocation, Operation, Outcome, Party,
    Rejection, Result,
};

use crate::ledger::Ledger;

/// Owns the escrow record and applies entry points to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscrowMachine {
    record: EscrowRecord,
}

impl EscrowMachine {
    /// Create a machine awaiting its first deposit.
    #[must_use]
    pub fn new(seller: Identity) -> Self {
        Self {
            record: EscrowRecord::new(seller),
        }
    }

    /// Resume from a persisted record.
    ///
    /// # Errors
    /// Returns `InvariantViolation` if the record is inconsistent.
    pub fn from_record(record: EscrowRecord) -> Result<Self> {
        record.check_invariants()?;
        Ok(Self { record })
    }

    #[must_use]
    pub fn record(&self) -> &EscrowRecord {
        &self.record
    }

    #[must_use]
    pub fn status(&self) -> EscrowStatus {
        self.record.status
    }

    /// Lock the attached value in escrow with the caller as buyer.
    ///
    /// Rejected unless the record is awaiting a deposit and value is
    /// attached. A rejected deposit's value stays with the contract account;
    /// it is not refunded here.
    pub fn deposit(&mut self, inv: &Invocation) -> Result<Outcome> {
        if self.record.status != EscrowStatus::AwaitingDeposit {
            return Ok(reject(Rejection::InvalidStateTransition {
                operation: Operation::Deposit,
                status: self.record.status,
            }));
        }
        if !inv.has_value() {
            return Ok(reject(Rejection::ZeroValueDeposit));
        }

        self.record.mark_deposited(inv.caller, inv.attached_value)?;

        tracing::info!(
            invocation = %inv.id,
            buyer = %inv.caller,
            amount = inv.attached_value,
            "Escrow deposited"
        );
        Ok(Outcome::Applied(Effect::Deposited {
            buyer: inv.caller,
            amount: inv.attached_value,
        }))
    }

    /// Buyer's confirmation. Releases to the seller if the seller already confirmed.
    pub fn confirm_by_buyer<L: Ledger + ?Sized>(
        &mut self,
        inv: &Invocation,
        ledger: &mut L,
    ) -> Result<Outcome> {
        self.confirm(Party::Buyer, inv, ledger)
    }

    /// Seller's confirmation. Releases to the seller if the buyer already confirmed.
    pub fn confirm_by_seller<L: Ledger + ?Sized>(
        &mut self,
        inv: &Invocation,
        ledger: &mut L,
    ) -> Result<Outcome> {
        self.confirm(Party::Seller, inv, ledger)
    }

    fn confirm<L: Ledger + ?Sized>(
        &mut self,
        party: Party,
        inv: &Invocation,
        ledger: &mut L,
    ) -> Result<Outcome> {
        let operation = match party {
            Party::Buyer => Operation::ConfirmByBuyer,
            Party::Seller => Operation::ConfirmBySeller,
        };
        if let Some(rejection) = self.require_deposited(operation) {
            return Ok(reject(rejection));
        }

        let (authorized, counterpart_confirmed) = match party {
            Party::Buyer => (
                self.record.is_buyer(inv.caller),
                self.record.seller_confirmed,
            ),
            Party::Seller => (
                self.record.is_seller(inv.caller),
                self.record.buyer_confirmed,
            ),
        };
        if !authorized {
            return Ok(reject(Rejection::Unauthorized {
                operation,
                caller: inv.caller,
            }));
        }

        if !counterpart_confirmed {
            match party {
                Party::Buyer => self.record.buyer_confirmed = true,
                Party::Seller => self.record.seller_confirmed = true,
            }
            tracing::debug!(
                invocation = %inv.id,
                %party,
                "Escrow confirmation recorded, awaiting counterpart"
            );
            return Ok(Outcome::Applied(Effect::Confirmed { party }));
        }

        let seller = self.record.seller;
        ledger.transfer(seller, self.record.amount)?;
        let amount = self.record.mark_released()?;

        tracing::info!(
            invocation = %inv.id,
            %seller,
            amount,
            second = %party,
            "Escrow released to seller"
        );
        Ok(Outcome::Applied(Effect::Released { seller, amount }))
    }

    /// Refund the buyer. Either party may cancel alone.
    pub fn cancel<L: Ledger + ?Sized>(
        &mut self,
        inv: &Invocation,
        ledger: &mut L,
    ) -> Result<Outcome> {
        if let Some(rejection) = self.require_deposited(Operation::Cancel) {
            return Ok(reject(rejection));
        }
        let by = if self.record.is_buyer(inv.caller) {
            Party::Buyer
        } else if self.record.is_seller(inv.caller) {
            Party::Seller
        } else {
            return Ok(reject(Rejection::Unauthorized {
                operation: Operation::Cancel,
                caller: inv.caller,
            }));
        };

        // Deposited always carries a buyer; `check_invariants` enforces it.
        let Some(buyer) = self.record.buyer else {
            return Err(escrow_types::EscrowError::InvariantViolation {
                reason: "DEPOSITED without a buyer".to_string(),
            });
        };
        ledger.transfer(buyer, self.record.amount)?;
        let amount = self.record.mark_cancelled()?;

        tracing::info!(
            invocation = %inv.id,
            %buyer,
            amount,
            %by,
            "Escrow cancelled, buyer refunded"
        );
        Ok(Outcome::Applied(Effect::Cancelled { by, buyer, amount }))
    }

    fn require_deposited(&self, operation: Operation) -> Option<Rejection> {
        (self.record.status != EscrowStatus::Deposited).then_some(
            Rejection::InvalidStateTransition {
                operation,
                status: self.record.status,
            },
        )
    }
}

fn reject(rejection: Rejection) -> Outcome {
    tracing::debug!(reason = %rejection, "Escrow call rejected");
    Outcome::Rejected(rejection)
}
