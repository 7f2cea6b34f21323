//! Reference host: runs invocations against one contract instance.
//!
//! Each call to [`Host::invoke`] is one atomic invocation:
//! 1. Resolve the procedure index (unknown index: nothing moves)
//! 2. Attach the caller's value to the contract account
//! 3. Run the entry point against the in-memory ledger
//! 4. Check the contract account moved exactly what the outcome reports
//! 5. Audit: record invariants, supply conservation, contract solvency
//! 6. Append an [`InvocationReceipt`]
//!
//! If step 3, 4 or 5 fails, the ledger and the contract are both put back
//! to how they were before step 2 and no receipt is written.

use escrow_contract::{ContractSnapshot, EscrowContract, FunctionOutput};
use escrow_types::{
    ContractConfig, ContractStats, Effect, EscrowError, EscrowRecord, Identity, Invocation,
    Operation, Outcome, Result, constants,
};
use serde::{Deserialize, Serialize};

use crate::{ledger::InMemoryLedger, supply_conservation::SupplyConservation};

/// What one invocation did, as seen by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationReceipt {
    pub invocation: Invocation,
    pub operation: Operation,
    pub outcome: Outcome,
}

/// Ledger, contract, and audit state for a single contract instance.
pub struct Host {
    ledger: InMemoryLedger,
    contract: EscrowContract,
    supply: SupplyConservation,
    receipts: Vec<InvocationReceipt>,
}

impl Host {
    /// Initialize a contract and an empty ledger around it.
    ///
    /// The contract account identity is derived from the contract name.
    pub fn new(config: ContractConfig) -> Result<Self> {
        let contract_account = Identity::from_label(&format!("contract:{}", config.name));
        let contract = EscrowContract::initialize(config)?;
        Ok(Self {
            ledger: InMemoryLedger::new(contract_account),
            contract,
            supply: SupplyConservation::new(),
            receipts: Vec::new(),
        })
    }

    /// Give `who` new value to spend.
    pub fn fund(&mut self, who: Identity, amount: u64) -> Result<()> {
        self.ledger.mint(who, amount)?;
        self.supply.record_mint(amount);
        Ok(())
    }

    /// Run one procedure on behalf of `caller` with `value` attached.
    ///
    /// # Errors
    /// - `UnknownProcedure` for unregistered indices
    /// - `InsufficientBalance` if the caller cannot cover `value`
    /// - ledger faults raised by the contract
    /// - audit failures (`InvariantViolation`, `SupplyInvariantViolation`)
    ///
    /// After any error other than the first two, the ledger and contract are
    /// rolled back to their state before the call.
    pub fn invoke(&mut self, caller: Identity, value: u64, procedure: u16) -> Result<Outcome> {
        let operation = Operation::from_procedure_index(procedure)
            .ok_or(EscrowError::UnknownProcedure(procedure))?;
        let inv = Invocation::new(caller, value);

        let checkpoint = self.ledger.checkpoint();
        let held_before = self.ledger.contract_balance();
        if inv.has_value() {
            self.ledger.attach(caller, value)?;
        }

        let previous = (self.contract.clone(), self.supply);
        let committed = self.execute_checked(operation, &inv, held_before);

        let outcome = match committed {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!(invocation = %inv.id, %operation, error = %err, "Invocation aborted");
                self.ledger.rollback(checkpoint);
                (self.contract, self.supply) = previous;
                return Err(err);
            }
        };

        self.receipts.push(InvocationReceipt {
            invocation: inv,
            operation,
            outcome,
        });
        Ok(outcome)
    }

    /// `invoke` by operation rather than index.
    pub fn call(&mut self, caller: Identity, value: u64, operation: Operation) -> Result<Outcome> {
        self.invoke(caller, value, operation.procedure_index())
    }

    fn execute_checked(
        &mut self,
        operation: Operation,
        inv: &Invocation,
        held_before: u64,
    ) -> Result<Outcome> {
        let outcome = self.contract.execute(operation, inv, &mut self.ledger)?;
        self.verify_contract_flow(held_before, inv.attached_value, &outcome)?;
        if let Outcome::Applied(Effect::Burned { amount }) = outcome {
            self.supply.record_burn(amount);
        }
        self.audit()?;
        Ok(outcome)
    }

    /// The contract account must end the call holding what it held before,
    /// plus the attached value, minus what the outcome says left it.
    fn verify_contract_flow(&self, held_before: u64, value: u64, outcome: &Outcome) -> Result<()> {
        let outflow = outcome.effect().map_or(0, Effect::outflow);
        let expected = held_before
            .checked_add(value)
            .and_then(|held| held.checked_sub(outflow));
        let held = self.ledger.contract_balance();
        if expected == Some(held) {
            return Ok(());
        }
        tracing::warn!(held_before, value, outflow, held, "Contract account moved unreported value");
        Err(EscrowError::InvariantViolation {
            reason: format!(
                "contract account holds {held} after receiving {value} on {held_before} and paying out {outflow}"
            ),
        })
    }

    /// Check every cross-cutting invariant.
    ///
    /// # Errors
    /// The first violated invariant.
    pub fn audit(&self) -> Result<()> {
        let record = self.contract.record();
        record.check_invariants().inspect_err(|err| {
            tracing::warn!(error = %err, "Escrow record failed audit");
        })?;

        self.supply
            .verify(self.ledger.total_supply())
            .inspect_err(|err| {
                tracing::warn!(error = %err, "Supply conservation failed audit");
            })?;

        let held = self.ledger.contract_balance();
        if held < record.amount {
            tracing::warn!(held, escrowed = record.amount, "Contract account insolvent");
            return Err(EscrowError::InvariantViolation {
                reason: format!(
                    "contract account holds {held}, escrow owes {}",
                    record.amount
                ),
            });
        }
        Ok(())
    }

    /// `GetStats` through the function dispatch table.
    pub fn query_stats(&self) -> Result<ContractStats> {
        match self.contract.call_function(constants::FN_GET_STATS)? {
            FunctionOutput::Stats(stats) => Ok(stats),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> ContractSnapshot {
        self.contract.snapshot()
    }

    /// Replace the contract state with a persisted snapshot.
    ///
    /// The previous state is kept if the restored one fails the audit.
    pub fn restore(&mut self, snapshot: ContractSnapshot) -> Result<()> {
        let restored = EscrowContract::restore(self.contract.config().clone(), snapshot)?;
        let previous = std::mem::replace(&mut self.contract, restored);
        if let Err(err) = self.audit() {
            self.contract = previous;
            return Err(err);
        }
        Ok(())
    }

    #[must_use]
    pub fn record(&self) -> &EscrowRecord {
        self.contract.record()
    }

    #[must_use]
    pub fn contract(&self) -> &EscrowContract {
        &self.contract
    }

    #[must_use]
    pub fn ledger(&self) -> &InMemoryLedger {
        &self.ledger
    }

    #[must_use]
    pub fn supply(&self) -> &SupplyConservation {
        &self.supply
    }

    #[must_use]
    pub fn receipts(&self) -> &[InvocationReceipt] {
        &self.receipts
    }

    #[must_use]
    pub fn balance(&self, who: Identity) -> u64 {
        self.ledger.balance(who)
    }
}
