//! Call counters for the reward pass-through procedures.

use serde::{Deserialize, Serialize};

/// Output of the `GetStats` function.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractStats {
    /// Number of Echo invocations since initialization.
    pub echo_calls: u64,
    /// Number of Burn invocations since initialization.
    pub burn_calls: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_zero() {
        let stats = ContractStats::default();
        assert_eq!(stats.echo_calls, 0);
        assert_eq!(stats.burn_calls, 0);
    }
}
