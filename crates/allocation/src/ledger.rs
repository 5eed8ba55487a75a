//! Accumulated per-participant contributions across a run.

use num_traits::Zero;
use poolaudit_types::{Address, Contribution};
use std::collections::BTreeMap;

/// Running per-participant contribution totals plus the grand total.
///
/// Write-and-read only: totals grow monotonically as blocks are folded in,
/// nothing is ever removed, and the ledger lives for a single run. Values
/// stay exact rationals; scaling to a display unit happens only at the
/// output boundary.
#[derive(Debug, Clone, Default)]
pub struct ContributionLedger {
    totals: BTreeMap<Address, Contribution>,
    grand_total: Contribution,
}

impl ContributionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an allocation to the participant's running total and to the grand
    /// total, creating the participant entry at zero if absent.
    pub fn record(&mut self, participant: Address, allocation: Contribution) {
        *self
            .totals
            .entry(participant)
            .or_insert_with(Contribution::zero) += allocation.clone();
        self.grand_total += allocation;
    }

    /// The grand total as of now.
    pub fn grand_total(&self) -> &Contribution {
        &self.grand_total
    }

    /// Full mapping and grand total as of the call time.
    pub fn snapshot(&self) -> (BTreeMap<Address, Contribution>, Contribution) {
        (self.totals.clone(), self.grand_total.clone())
    }
}
