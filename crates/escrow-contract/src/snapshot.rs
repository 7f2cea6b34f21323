//! Persisted contract state.
//!
//! The whole durable state is the escrow record plus the two call
//! counters. Snapshots are versioned JSON so a host can store them between
//! invocations.

use escrow_types::{ContractStats, EscrowError, EscrowRecord, Result, constants};
use serde::{Deserialize, Serialize};

/// Versioned image of everything the contract persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSnapshot {
    pub version: u32,
    pub record: EscrowRecord,
    pub stats: ContractStats,
}

impl ContractSnapshot {
    #[must_use]
    pub fn new(record: EscrowRecord, stats: ContractStats) -> Self {
        Self {
            version: constants::SNAPSHOT_VERSION,
            record,
            stats,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a snapshot and check it is safe to resume from.
    ///
    /// # Errors
    /// - `Serialization` if the JSON is malformed
    /// - `UnsupportedSnapshotVersion` if written by another version
    /// - `InvariantViolation` if the record is inconsistent
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn validate(&self) -> Result<()> {
        if self.version != constants::SNAPSHOT_VERSION {
            return Err(EscrowError::UnsupportedSnapshotVersion {
                found: self.version,
                expected: constants::SNAPSHOT_VERSION,
            });
        }
        self.record.check_invariants()
    }
}
