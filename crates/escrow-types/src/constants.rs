//! Contract-wide constants: dispatch indices, defaults, and the snapshot version.

/// Procedure index: return attached value to the caller.
pub const PROC_ECHO: u16 = 1;

/// Procedure index: burn attached value.
pub const PROC_BURN: u16 = 2;

/// Procedure index: buyer deposits attached value into escrow.
pub const PROC_DEPOSIT: u16 = 3;

/// Procedure index: buyer confirms the pending transaction.
pub const PROC_CONFIRM_BY_BUYER: u16 = 4;

/// Procedure index: seller confirms the pending transaction.
pub const PROC_CONFIRM_BY_SELLER: u16 = 5;

/// Procedure index: either party cancels and the buyer is refunded.
pub const PROC_CANCEL: u16 = 6;

/// Function index: read the Echo/Burn call counters.
pub const FN_GET_STATS: u16 = 1;

/// Label the default seller identity is derived from.
pub const DEFAULT_SELLER_LABEL: &str = "seller_address";

/// Domain separator for label-derived identities.
pub const IDENTITY_LABEL_DOMAIN: &[u8] = b"escrow:identity:v1:";

/// Version tag written into every contract snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Contract name used in logs when the config does not override it.
pub const CONTRACT_NAME: &str = "escrow";

