//! The contract instance: initialization hook, dispatch table, and state.
//!
//! One [`EscrowContract`] is built at initialization and then driven by the
//! host, one invocation at a time, through `&mut self`. There is no global
//! state; two instances are fully independent.
//!
//! ## Dispatch
//!
//! ```text
//! procedure 1 Echo             procedure 4 ConfirmByBuyer
//! procedure 2 Burn             procedure 5 ConfirmBySeller
//! procedure 3 Deposit          procedure 6 Cancel
//! function  1 GetStats
//! ```
//!
//! [`EscrowContract::invoke_procedure`] is the caller-facing surface: a
//! rejected call returns `Ok(())` exactly like an applied one.
//! [`EscrowContract::dispatch`] returns the tagged [`Outcome`] for hosts and
//! tests that want to see why.

use escrow_types::{
    ContractConfig, ContractStats, EscrowError, EscrowRecord, Function, Invocation, Operation,
    Outcome, Result,
};

use crate::{
    ledger::Ledger, machine::EscrowMachine, rewards::RewardCounters, snapshot::ContractSnapshot,
};

/// Output of a read-only function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionOutput {
    Stats(ContractStats),
}

/// A fully initialized escrow contract.
#[derive(Debug, Clone)]
pub struct EscrowContract {
    config: ContractConfig,
    machine: EscrowMachine,
    rewards: RewardCounters,
}

impl EscrowContract {
    /// Initialization hook: empty escrow, zeroed counters, seller from config.
    ///
    /// # Errors
    /// Returns `Configuration` if the config fails validation.
    pub fn initialize(config: ContractConfig) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            contract = %config.name,
            seller = %config.seller,
            "Escrow contract initialized"
        );
        Ok(Self {
            machine: EscrowMachine::new(config.seller),
            rewards: RewardCounters::new(),
            config,
        })
    }

    /// Resume a contract from a persisted snapshot.
    ///
    /// # Errors
    /// - `Configuration` if the config is invalid or names a different seller
    /// - anything [`ContractSnapshot::validate`] reports
    pub fn restore(config: ContractConfig, snapshot: ContractSnapshot) -> Result<Self> {
        config.validate()?;
        snapshot.validate()?;
        if snapshot.record.seller != config.seller {
            return Err(EscrowError::Configuration(format!(
                "snapshot seller {} does not match configured seller {}",
                snapshot.record.seller, config.seller
            )));
        }
        Ok(Self {
            machine: EscrowMachine::from_record(snapshot.record)?,
            rewards: RewardCounters::from_stats(snapshot.stats),
            config,
        })
    }

    #[must_use]
    pub fn snapshot(&self) -> ContractSnapshot {
        ContractSnapshot::new(self.machine.record().clone(), self.rewards.stats())
    }

    #[must_use]
    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    #[must_use]
    pub fn record(&self) -> &EscrowRecord {
        self.machine.record()
    }

    /// `GetStats`.
    #[must_use]
    pub fn stats(&self) -> ContractStats {
        self.rewards.stats()
    }

    /// Run one procedure and report what happened.
    pub fn execute<L: Ledger + ?Sized>(
        &mut self,
        operation: Operation,
        inv: &Invocation,
        ledger: &mut L,
    ) -> Result<Outcome> {
        let _span = tracing::debug_span!(
            "invoke",
            contract = %self.config.name,
            op = %operation,
            caller = %inv.caller,
            value = inv.attached_value
        )
        .entered();

        match operation {
            Operation::Echo => self.rewards.echo(inv, ledger),
            Operation::Burn => self.rewards.burn(inv, ledger),
            Operation::Deposit => self.machine.deposit(inv),
            Operation::ConfirmByBuyer => self.machine.confirm_by_buyer(inv, ledger),
            Operation::ConfirmBySeller => self.machine.confirm_by_seller(inv, ledger),
            Operation::Cancel => self.machine.cancel(inv, ledger),
        }
    }

    /// Resolve a procedure index and run it.
    ///
    /// # Errors
    /// `UnknownProcedure` for unregistered indices, ledger faults otherwise.
    pub fn dispatch<L: Ledger + ?Sized>(
        &mut self,
        index: u16,
        inv: &Invocation,
        ledger: &mut L,
    ) -> Result<Outcome> {
        let operation =
            Operation::from_procedure_index(index).ok_or(EscrowError::UnknownProcedure(index))?;
        self.execute(operation, inv, ledger)
    }

    /// Caller-facing procedure entry. Rejections are indistinguishable from success.
    pub fn invoke_procedure<L: Ledger + ?Sized>(
        &mut self,
        index: u16,
        inv: &Invocation,
        ledger: &mut L,
    ) -> Result<()> {
        self.dispatch(index, inv, ledger).map(|_| ())
    }

    /// Caller-facing function entry.
    ///
    /// # Errors
    /// `UnknownFunction` for unregistered indices.
    pub fn call_function(&self, index: u16) -> Result<FunctionOutput> {
        match Function::from_function_index(index) {
            Some(Function::GetStats) => Ok(FunctionOutput::Stats(self.stats())),
            None => Err(EscrowError::UnknownFunction(index)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::RecordingLedger;
    use escrow_types::{EscrowStatus, Identity, Rejection, constants};

    fn contract() -> (EscrowContract, Identity) {
        let seller = Identity::random();
        let c = EscrowContract::initialize(ContractConfig::with_seller(seller)).unwrap();
        (c, seller)
    }

    #[test]
    fn initialize_builds_empty_escrow() {
        let (c, seller) = contract();
        assert_eq!(c.record(), &EscrowRecord::new(seller));
        assert_eq!(c.stats(), ContractStats::default());
    }

    #[test]
    fn initialize_rejects_null_seller() {
        let err = EscrowContract::initialize(ContractConfig::with_seller(Identity::NULL))
            .unwrap_err();
        assert!(matches!(err, EscrowError::Configuration(_)));
    }

    #[test]
    fn default_config_uses_label_seller() {
        let c = EscrowContract::initialize(ContractConfig::default()).unwrap();
        assert_eq!(c.record().seller, Identity::from_label("seller_address"));
    }

    #[test]
    fn procedures_dispatch_by_index() {
        let (mut c, seller) = contract();
        let mut ledger = RecordingLedger::new();
        let buyer = Identity::random();

        c.invoke_procedure(constants::PROC_DEPOSIT, &Invocation::new(buyer, 80), &mut ledger)
            .unwrap();
        c.invoke_procedure(constants::PROC_CONFIRM_BY_SELLER, &Invocation::bare(seller), &mut ledger)
            .unwrap();
        c.invoke_procedure(constants::PROC_CONFIRM_BY_BUYER, &Invocation::bare(buyer), &mut ledger)
            .unwrap();

        assert_eq!(c.record().status, EscrowStatus::Released);
        assert_eq!(ledger.transfers, vec![(seller, 80)]);
    }

    #[test]
    fn rejected_call_is_silent() {
        let (mut c, _) = contract();
        let mut ledger = RecordingLedger::new();
        let stranger = Invocation::bare(Identity::random());

        c.invoke_procedure(constants::PROC_CANCEL, &stranger, &mut ledger)
            .unwrap();
        let out = c.dispatch(constants::PROC_CANCEL, &stranger, &mut ledger).unwrap();
        assert!(matches!(
            out.rejection(),
            Some(Rejection::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn unknown_indices_error() {
        let (mut c, _) = contract();
        let mut ledger = RecordingLedger::new();
        let err = c
            .invoke_procedure(0, &Invocation::bare(Identity::random()), &mut ledger)
            .unwrap_err();
        assert!(matches!(err, EscrowError::UnknownProcedure(0)));
        assert!(matches!(
            c.call_function(2).unwrap_err(),
            EscrowError::UnknownFunction(2)
        ));
    }

    #[test]
    fn get_stats_counts_rewards_only() {
        let (mut c, _) = contract();
        let mut ledger = RecordingLedger::new();
        let caller = Identity::random();

        c.invoke_procedure(constants::PROC_ECHO, &Invocation::new(caller, 5), &mut ledger)
            .unwrap();
        c.invoke_procedure(constants::PROC_BURN, &Invocation::new(caller, 3), &mut ledger)
            .unwrap();
        c.invoke_procedure(constants::PROC_BURN, &Invocation::bare(caller), &mut ledger)
            .unwrap();
        c.invoke_procedure(constants::PROC_DEPOSIT, &Invocation::new(caller, 1), &mut ledger)
            .unwrap();

        let FunctionOutput::Stats(stats) = c.call_function(constants::FN_GET_STATS).unwrap();
        assert_eq!(
            stats,
            ContractStats {
                echo_calls: 1,
                burn_calls: 2
            }
        );
        assert_eq!(ledger.transfers, vec![(caller, 5)]);
        assert_eq!(ledger.burns, vec![3]);
    }

    #[test]
    fn rewards_ignore_escrow_state() {
        let (mut c, seller) = contract();
        let mut ledger = RecordingLedger::new();
        let buyer = Identity::random();
        c.execute(Operation::Deposit, &Invocation::new(buyer, 10), &mut ledger)
            .unwrap();
        c.execute(Operation::Cancel, &Invocation::bare(seller), &mut ledger)
            .unwrap();

        let out = c
            .execute(Operation::Echo, &Invocation::new(buyer, 4), &mut ledger)
            .unwrap();
        assert!(out.is_applied());
        assert_eq!(c.record().status, EscrowStatus::Cancelled);
    }

    #[test]
    fn snapshot_restore_roundtrip() {
        let (mut c, seller) = contract();
        let mut ledger = RecordingLedger::new();
        let buyer = Identity::random();
        c.execute(Operation::Deposit, &Invocation::new(buyer, 42), &mut ledger)
            .unwrap();
        c.execute(Operation::ConfirmBySeller, &Invocation::bare(seller), &mut ledger)
            .unwrap();
        c.execute(Operation::Echo, &Invocation::bare(buyer), &mut ledger)
            .unwrap();

        let snap = ContractSnapshot::from_json(&c.snapshot().to_json().unwrap()).unwrap();
        let mut resumed = EscrowContract::restore(c.config().clone(), snap).unwrap();
        assert_eq!(resumed.record(), c.record());
        assert_eq!(resumed.stats(), c.stats());

        resumed
            .execute(Operation::ConfirmByBuyer, &Invocation::bare(buyer), &mut ledger)
            .unwrap();
        assert_eq!(resumed.record().status, EscrowStatus::Released);
        assert_eq!(ledger.sent_to(seller), 42);
    }

    #[test]
    fn restore_rejects_foreign_seller() {
        let (c, _) = contract();
        let err = EscrowContract::restore(
            ContractConfig::with_seller(Identity::random()),
            c.snapshot(),
        )
        .unwrap_err();
        assert!(matches!(err, EscrowError::Configuration(_)));
    }
}
