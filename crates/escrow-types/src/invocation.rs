//! The invocation envelope and entry-point selectors.
//!
//! The host hands the contract one [`Invocation`] per call: who is calling
//! and how much value rode along with the call. The selector ([`Operation`]
//! or [`Function`]) is carried separately as a dispatch index.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Identity, InvocationId, constants};

/// A single request to execute one contract entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub id: InvocationId,
    /// Identity of the account that issued the call.
    pub caller: Identity,
    /// Value transferred into the contract as part of this call.
    pub attached_value: u64,
}

impl Invocation {
    #[must_use]
    pub fn new(caller: Identity, attached_value: u64) -> Self {
        Self {
            id: InvocationId::new(),
            caller,
            attached_value,
        }
    }

    /// Invocation with no value attached.
    #[must_use]
    pub fn bare(caller: Identity) -> Self {
        Self::new(caller, 0)
    }

    #[must_use]
    pub fn has_value(&self) -> bool {
        self.attached_value > 0
    }
}

/// Mutating entry points (procedures).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Echo,
    Burn,
    Deposit,
    ConfirmByBuyer,
    ConfirmBySeller,
    Cancel,
}

impl Operation {
    /// Every procedure, in dispatch-index order.
    pub const ALL: [Self; 6] = [
        Self::Echo,
        Self::Burn,
        Self::Deposit,
        Self::ConfirmByBuyer,
        Self::ConfirmBySeller,
        Self::Cancel,
    ];

    #[must_use]
    pub fn procedure_index(self) -> u16 {
        match self {
            Self::Echo => constants::PROC_ECHO,
            Self::Burn => constants::PROC_BURN,
            Self::Deposit => constants::PROC_DEPOSIT,
            Self::ConfirmByBuyer => constants::PROC_CONFIRM_BY_BUYER,
            Self::ConfirmBySeller => constants::PROC_CONFIRM_BY_SELLER,
            Self::Cancel => constants::PROC_CANCEL,
        }
    }

    #[must_use]
    pub fn from_procedure_index(index: u16) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.procedure_index() == index)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Echo => write!(f, "ECHO"),
            Self::Burn => write!(f, "BURN"),
            Self::Deposit => write!(f, "DEPOSIT"),
            Self::ConfirmByBuyer => write!(f, "CONFIRM_BY_BUYER"),
            Self::ConfirmBySeller => write!(f, "CONFIRM_BY_SELLER"),
            Self::Cancel => write!(f, "CANCEL"),
        }
    }
}

/// Read-only entry points (functions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Function {
    GetStats,
}

impl Function {
    #[must_use]
    pub fn function_index(self) -> u16 {
        match self {
            Self::GetStats => constants::FN_GET_STATS,
        }
    }

    #[must_use]
    pub fn from_function_index(index: u16) -> Option<Self> {
        (index == constants::FN_GET_STATS).then_some(Self::GetStats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn procedure_indices_round_trip() {
        for op in Operation::ALL {
            assert_eq!(Operation::from_procedure_index(op.procedure_index()), Some(op));
        }
        assert_eq!(Operation::from_procedure_index(0), None);
        assert_eq!(Operation::from_procedure_index(7), None);
    }

    #[test]
    fn registration_numbers_are_fixed() {
        assert_eq!(Operation::Echo.procedure_index(), 1);
        assert_eq!(Operation::Burn.procedure_index(), 2);
        assert_eq!(Operation::Deposit.procedure_index(), 3);
        assert_eq!(Operation::ConfirmByBuyer.procedure_index(), 4);
        assert_eq!(Operation::ConfirmBySeller.procedure_index(), 5);
        assert_eq!(Operation::Cancel.procedure_index(), 6);
        assert_eq!(Function::GetStats.function_index(), 1);
        assert_eq!(Function::from_function_index(2), None);
    }

    #[test]
    fn bare_invocation_has_no_value() {
        let inv = Invocation::bare(Identity::random());
        assert!(!inv.has_value());
        assert!(Invocation::new(inv.caller, 1).has_value());
    }
}
