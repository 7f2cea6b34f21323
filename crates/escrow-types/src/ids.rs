//! Identifiers used throughout the escrow contract.
//!
//! An [`Identity`] is the raw 32-byte account key the host uses to name
//! callers and transfer destinations. Invocations carry a UUIDv7
//! [`InvocationId`] so host journals sort by submission time.

use std::{fmt, str::FromStr};

use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{EscrowError, constants};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Account identity: a 32-byte public key, compared by value.
///
/// Serialized as a lowercase hex string so it reads naturally in JSON
/// configs and snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct Identity(pub [u8; 32]);

impl Identity {
    /// The all-zero identity. Never a valid seller.
    pub const NULL: Self = Self([0u8; 32]);

    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Identity of an ed25519 key holder.
    #[must_use]
    pub fn from_verifying_key(key: &VerifyingKey) -> Self {
        Self(key.to_bytes())
    }

    /// Deterministic identity derived from a human-readable label.
    ///
    /// `SHA-256("escrow:identity:v1:" || label)`. Used for fixed,
    /// well-known accounts such as the default seller.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(constants::IDENTITY_LABEL_DOMAIN);
        hasher.update(label.as_bytes());
        Self(hasher.finalize().into())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id:{}", hex::encode(&self.0[..8]))
    }
}

impl FromStr for Identity {
    type Err = EscrowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = hex::decode(s)
            .map_err(|e| EscrowError::Serialization(format!("identity is not hex: {e}")))?;
        let bytes: [u8; 32] = raw.try_into().map_err(|raw: Vec<u8>| {
            EscrowError::Serialization(format!("identity must be 32 bytes, got {}", raw.len()))
        })?;
        Ok(Self(bytes))
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Random identities for tests. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl Identity {
    pub fn random() -> Self {
        Self(rand::random::<[u8; 32]>())
    }
}

// ---------------------------------------------------------------------------
// InvocationId
// ---------------------------------------------------------------------------

/// Unique identifier for a single invocation. Uses UUIDv7 for time-ordered sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct InvocationId(pub Uuid);

impl InvocationId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for InvocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InvocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "inv:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::SigningKey;

    #[test]
    fn label_identity_is_deterministic() {
        let a = Identity::from_label("seller_address");
        let b = Identity::from_label("seller_address");
        assert_eq!(a, b);
        assert_ne!(a, Identity::from_label("buyer_address"));
        assert!(!a.is_null());
    }

    #[test]
    fn verifying_key_identity_matches_key_bytes() {
        let signing = SigningKey::generate(&mut rand::rngs::OsRng);
        let key = signing.verifying_key();
        let id = Identity::from_verifying_key(&key);
        assert_eq!(id.as_bytes(), key.as_bytes());
    }

    #[test]
    fn display_is_prefixed_hex() {
        let id = Identity::from_bytes([0xab; 32]);
        assert_eq!(id.to_string(), "id:abababababababab");
    }

    #[test]
    fn parse_rejects_wrong_length() {
        let err = "abcd".parse::<Identity>().unwrap_err();
        assert!(matches!(err, EscrowError::Serialization(_)));
        assert!("zz".parse::<Identity>().is_err());
    }

    #[test]
    fn serde_uses_hex_string() {
        let id = Identity::random();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", hex::encode(id.0)));
        let back: Identity = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn invocation_id_ordering() {
        let a = InvocationId::new();
        let b = InvocationId::new();
        assert!(a < b);
    }
}
