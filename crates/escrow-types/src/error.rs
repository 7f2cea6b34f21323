//! Error types for the escrow contract.
//!
//! All errors use the `ESC_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Entry-point rejections (carried by [`Rejection`](crate::Rejection),
//!   never raised as an error)
//! - 2xx: Ledger errors
//! - 3xx: Dispatch errors
//! - 4xx: State integrity errors
//! - 9xx: General / internal errors
//!
//! Rejections are swallowed at the dispatch surface. Everything here
//! reaches the host.

use thiserror::Error;

use crate::Identity;

/// Central error enum for all escrow operations.
#[derive(Debug, Error)]
pub enum EscrowError {
    // =================================================================
    // Ledger Errors (2xx)
    // =================================================================
    /// The account does not hold enough value for the movement.
    #[error("ESC_ERR_200: Insufficient balance for {account}: need {needed}, have {available}")]
    InsufficientBalance {
        account: Identity,
        needed: u64,
        available: u64,
    },

    /// Crediting the account would overflow its balance.
    #[error("ESC_ERR_201: Balance overflow crediting {account}")]
    BalanceOverflow { account: Identity },

    /// The host ledger refused a transfer or burn.
    #[error("ESC_ERR_202: Ledger fault: {reason}")]
    Ledger { reason: String },

    // =================================================================
    // Dispatch Errors (3xx)
    // =================================================================
    /// No procedure is registered under this index.
    #[error("ESC_ERR_300: Unknown procedure index {0}")]
    UnknownProcedure(u16),

    /// No function is registered under this index.
    #[error("ESC_ERR_301: Unknown function index {0}")]
    UnknownFunction(u16),

    // =================================================================
    // State Integrity Errors (4xx)
    // =================================================================
    /// The escrow record broke one of its structural invariants.
    #[error("ESC_ERR_400: Escrow invariant violation: {reason}")]
    InvariantViolation { reason: String },

    /// Supply conservation invariant violated. Critical safety alert.
    #[error("ESC_ERR_401: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    /// A snapshot was written by an incompatible version.
    #[error("ESC_ERR_402: Unsupported snapshot version {found} (expected {expected})")]
    UnsupportedSnapshotVersion { found: u32, expected: u32 },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("ESC_ERR_900: Configuration error: {0}")]
    Configuration(String),

    /// Serialization / deserialization error.
    #[error("ESC_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// I/O error.
    #[error("ESC_ERR_902: I/O error: {0}")]
    Io(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, EscrowError>;

impl From<std::io::Error> for EscrowError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for EscrowError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = EscrowError::UnknownProcedure(42);
        let msg = format!("{err}");
        assert!(msg.starts_with("ESC_ERR_300"), "Got: {msg}");
        assert!(msg.contains("42"));
    }

    #[test]
    fn insufficient_balance_display() {
        let err = EscrowError::InsufficientBalance {
            account: Identity::from_bytes([1; 32]),
            needed: 100,
            available: 50,
        };
        let msg = format!("{err}");
        assert!(msg.contains("ESC_ERR_200"));
        assert!(msg.contains("100"));
        assert!(msg.contains("50"));
    }

    #[test]
    fn all_errors_have_esc_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(EscrowError::UnknownFunction(9)),
            Box::new(EscrowError::Ledger { reason: "x".into() }),
            Box::new(EscrowError::InvariantViolation { reason: "x".into() }),
            Box::new(EscrowError::UnsupportedSnapshotVersion {
                found: 9,
                expected: 1,
            }),
            Box::new(EscrowError::Configuration("test".into())),
            Box::new(EscrowError::SupplyInvariantViolation { reason: "x".into() }),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("ESC_ERR_"),
                "Error missing ESC_ERR_ prefix: {msg}"
            );
        }
    }

    #[test]
    fn json_errors_convert() {
        let err: EscrowError = serde_json::from_str::<u64>("nope").unwrap_err().into();
        assert!(matches!(err, EscrowError::Serialization(_)));
    }
}
