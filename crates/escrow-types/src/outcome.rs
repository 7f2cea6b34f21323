//! Entry-point outcomes and the rejection taxonomy.
//!
//! Every escrow entry point answers with an [`Outcome`]. Precondition
//! failures are a [`Rejection`], never an error: the dispatch surface
//! swallows them and the caller sees an ordinary successful return.
//! Keeping the reason around lets tests and logs tell a wrong-state call
//! from an unauthorized one.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{EscrowStatus, Identity, Operation, Party};

/// Why an entry point declined to act.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum Rejection {
    /// The record is in the wrong status for the requested operation.
    #[error("ESC_ERR_100: {operation} not allowed while {status}")]
    InvalidStateTransition {
        operation: Operation,
        status: EscrowStatus,
    },

    /// The caller is not the party the operation requires.
    #[error("ESC_ERR_101: {caller} is not authorized to {operation}")]
    Unauthorized {
        operation: Operation,
        caller: Identity,
    },

    /// A deposit arrived with no value attached.
    #[error("ESC_ERR_102: Deposit requires attached value")]
    ZeroValueDeposit,
}

/// What an applied entry point did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Value locked in escrow; a new confirmation cycle began.
    Deposited { buyer: Identity, amount: u64 },
    /// One party confirmed; still waiting on the other.
    Confirmed { party: Party },
    /// Second confirmation arrived; escrow paid out to the seller.
    Released { seller: Identity, amount: u64 },
    /// A party cancelled; escrow refunded to the buyer.
    Cancelled {
        by: Party,
        buyer: Identity,
        amount: u64,
    },
    /// Echo counted; `amount` (possibly zero) returned to the caller.
    Echoed { to: Identity, amount: u64 },
    /// Burn counted; `amount` (possibly zero) removed from circulation.
    Burned { amount: u64 },
}

impl Effect {
    /// Value this effect moved out of the contract account.
    #[must_use]
    pub fn outflow(&self) -> u64 {
        match self {
            Self::Deposited { .. } | Self::Confirmed { .. } => 0,
            Self::Released { amount, .. }
            | Self::Cancelled { amount, .. }
            | Self::Echoed { amount, .. }
            | Self::Burned { amount } => *amount,
        }
    }
}

/// Result of running one entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Applied(Effect),
    Rejected(Rejection),
}

impl Outcome {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    #[must_use]
    pub fn effect(&self) -> Option<&Effect> {
        match self {
            Self::Applied(effect) => Some(effect),
            Self::Rejected(_) => None,
        }
    }

    #[must_use]
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Applied(_) => None,
            Self::Rejected(rejection) => Some(rejection),
        }
    }
}

impl From<Rejection> for Outcome {
    fn from(rejection: Rejection) -> Self {
        Self::Rejected(rejection)
    }
}
