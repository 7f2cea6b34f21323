//! Contract configuration.
//!
//! The seller is configuration, not runtime input: it is fixed when the
//! contract is initialized and no entry point can change it.

use serde::{Deserialize, Serialize};

use crate::{EscrowError, Identity, Result, constants};

/// Configuration supplied to the initialization hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractConfig {
    /// Identity that receives escrow on joint release.
    pub seller: Identity,
    /// Name used in log fields.
    #[serde(default = "default_name")]
    pub name: String,
}

fn default_name() -> String {
    constants::CONTRACT_NAME.to_string()
}

impl ContractConfig {
    #[must_use]
    pub fn with_seller(seller: Identity) -> Self {
        Self {
            seller,
            name: default_name(),
        }
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| EscrowError::Configuration(format!("invalid contract config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// # Errors
    /// Returns `Configuration` if the seller is the null identity or the
    /// name is empty.
    pub fn validate(&self) -> Result<()> {
        if self.seller.is_null() {
            return Err(EscrowError::Configuration(
                "seller must not be the null identity".to_string(),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(EscrowError::Configuration(
                "contract name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ContractConfig {
    /// Seller derived from the well-known `"seller_address"` label.
    fn default() -> Self {
        Self::with_seller(Identity::from_label(constants::DEFAULT_SELLER_LABEL))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_seller_is_label_derived() {
        let cfg = ContractConfig::default();
        assert_eq!(cfg.seller, Identity::from_label("seller_address"));
        assert_eq!(cfg.name, "escrow");
        cfg.validate().unwrap();
    }

    #[test]
    fn null_seller_rejected() {
        let cfg = ContractConfig::with_seller(Identity::NULL);
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, EscrowError::Configuration(_)));
    }

    #[test]
    fn from_json_fills_default_name() {
        let seller = Identity::random();
        let json = format!("{{\"seller\":\"{}\"}}", hex::encode(seller.0));
        let cfg = ContractConfig::from_json(&json).unwrap();
        assert_eq!(cfg.seller, seller);
        assert_eq!(cfg.name, "escrow");
    }

    #[test]
    fn from_json_rejects_garbage() {
        let err = ContractConfig::from_json("{\"seller\":\"xyz\"}").unwrap_err();
        assert!(matches!(err, EscrowError::Configuration(_)));

        let null = format!("{{\"seller\":\"{}\"}}", "00".repeat(32));
        assert!(ContractConfig::from_json(&null).is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ContractConfig::load("/nonexistent/escrow.json").unwrap_err();
        assert!(matches!(err, EscrowError::Io(_)));
    }

    #[test]
    fn serde_roundtrip() {
        let cfg = ContractConfig::with_seller(Identity::random());
        let json = serde_json::to_string(&cfg).unwrap();
        let back: ContractConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}
