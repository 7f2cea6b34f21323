//! Echo and Burn: reward pass-throughs that ignore escrow state.
//!
//! Both count every call, including calls with nothing attached.

use escrow_types::{ContractStats, Effect, Invocation, Outcome, Result};

use crate::ledger::Ledger;

/// Call counters plus the two pass-through procedures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewardCounters {
    stats: ContractStats,
}

impl RewardCounters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_stats(stats: ContractStats) -> Self {
        Self { stats }
    }

    #[must_use]
    pub fn stats(&self) -> ContractStats {
        self.stats
    }

    /// Send the attached value straight back to the caller.
    pub fn echo<L: Ledger + ?Sized>(&mut self, inv: &Invocation, ledger: &mut L) -> Result<Outcome> {
        if inv.has_value() {
            ledger.transfer(inv.caller, inv.attached_value)?;
        }
        self.stats.echo_calls = self.stats.echo_calls.saturating_add(1);

        tracing::info!(
            invocation = %inv.id,
            caller = %inv.caller,
            amount = inv.attached_value,
            echo_calls = self.stats.echo_calls,
            "Echo"
        );
        Ok(Outcome::Applied(Effect::Echoed {
            to: inv.caller,
            amount: inv.attached_value,
        }))
    }

    /// Remove the attached value from circulation.
    pub fn burn<L: Ledger + ?Sized>(&mut self, inv: &Invocation, ledger: &mut L) -> Result<Outcome> {
        if inv.has_value() {
            ledger.burn(inv.attached_value)?;
        }
        self.stats.burn_calls = self.stats.burn_calls.saturating_add(1);

        tracing::info!(
            invocation = %inv.id,
            caller = %inv.caller,
            amount = inv.attached_value,
            burn_calls = self.stats.burn_calls,
            "Burn"
        );
        Ok(Outcome::Applied(Effect::Burned {
            amount: inv.attached_value,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::RecordingLedger;
    use escrow_types::Identity;

    #[test]
    fn echo_returns_value_and_counts() {
        let mut rewards = RewardCounters::new();
        let mut ledger = RecordingLedger::new();
        let caller = Identity::random();

        rewards.echo(&Invocation::new(caller, 12), &mut ledger).unwrap();
        assert_eq!(ledger.transfers, vec![(caller, 12)]);
        assert_eq!(rewards.stats().echo_calls, 1);
        assert_eq!(rewards.stats().burn_calls, 0);
    }

    #[test]
    fn zero_value_calls_still_count() {
        let mut rewards = RewardCounters::new();
        let mut ledger = RecordingLedger::new();
        let inv = Invocation::bare(Identity::random());

        rewards.echo(&inv, &mut ledger).unwrap();
        rewards.burn(&inv, &mut ledger).unwrap();
        assert!(ledger.transfers.is_empty());
        assert!(ledger.burns.is_empty());
        assert_eq!(
            rewards.stats(),
            ContractStats {
                echo_calls: 1,
                burn_calls: 1
            }
        );
    }

    #[test]
    fn burn_destroys_value() {
        let mut rewards = RewardCounters::new();
        let mut ledger = RecordingLedger::new();
        rewards
            .burn(&Invocation::new(Identity::random(), 9), &mut ledger)
            .unwrap();
        assert_eq!(ledger.burns, vec![9]);
        assert!(ledger.transfers.is_empty());
    }

    #[test]
    fn ledger_fault_does_not_count() {
        let mut rewards = RewardCounters::new();
        let mut ledger = RecordingLedger::faulty();
        assert!(
            rewards
                .echo(&Invocation::new(Identity::random(), 1), &mut ledger)
                .is_err()
        );
        assert_eq!(rewards.stats().echo_calls, 0);
    }

    #[test]
    fn counters_saturate() {
        let mut rewards = RewardCounters::from_stats(ContractStats {
            echo_calls: u64::MAX,
            burn_calls: 0,
        });
        rewards
            .echo(&Invocation::bare(Identity::random()), &mut RecordingLedger::new())
            .unwrap();
        assert_eq!(rewards.stats().echo_calls, u64::MAX);
    }
}
