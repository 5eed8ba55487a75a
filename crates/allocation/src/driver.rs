//! Run orchestration: fetch, group, allocate, fold, report.

use crate::allocator::allocate_block;
use crate::errors::AuditError;
use crate::grouper::group_events;
use crate::ledger::ContributionLedger;
use crate::sources::{BalanceSource, EventSource};
use poolaudit_types::{display_units, to_decimal_string, Address, BlockNumber, DISPLAY_DECIMALS};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// What to audit: the pool account and the inclusive block range to scan for
/// issuance events.
#[derive(Debug, Clone)]
pub struct AuditParams {
    pub pool: Address,
    pub from_block: BlockNumber,
    pub to_block: BlockNumber,
}

/// Final result of a run.
///
/// Contribution values are exact wei amounts rendered as decimal strings, so
/// the report serializes as a flat address-to-numeric-string object. The
/// pool's actual balance at the end of the range is carried alongside the
/// grand total for external cross-checking; the two are not asserted equal
/// here.
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub contributions: BTreeMap<String, String>,
    pub grand_total: String,
    pub grand_total_display: String,
    pub pool_balance: String,
}

/// Reconstruct every participant's contribution to pool growth over the
/// configured range.
///
/// Blocks are processed strictly ascending; a progress line with the running
/// grand total is emitted per block. Any source failure aborts the run with
/// no report, and already-emitted progress lines are not a valid partial
/// result.
pub fn run_audit(
    events: &dyn EventSource,
    balances: &dyn BalanceSource,
    params: &AuditParams,
) -> Result<AuditReport, AuditError> {
    let raw_events = events.fetch_issuance_events(params.from_block, params.to_block)?;
    debug!(
        from_block = params.from_block,
        to_block = params.to_block,
        events = raw_events.len(),
        "fetched issuance events"
    );

    let groups = group_events(raw_events);
    let mut ledger = ContributionLedger::new();

    for (block_number, group) in &groups {
        let allocation = allocate_block(group, &params.pool, balances)?;
        for (participant, share) in allocation.allocations {
            ledger.record(participant, share);
        }
        info!(
            block_number,
            running_total = %display_units(ledger.grand_total()),
            "processed block"
        );
    }

    let pool_balance = balances.balance_of(&params.pool, params.to_block)?;
    let (totals, grand_total) = ledger.snapshot();

    let contributions = totals
        .into_iter()
        .map(|(participant, total)| {
            (
                participant.to_string(),
                to_decimal_string(&total, DISPLAY_DECIMALS),
            )
        })
        .collect();

    Ok(AuditReport {
        contributions,
        grand_total: to_decimal_string(&grand_total, DISPLAY_DECIMALS),
        grand_total_display: display_units(&grand_total),
        pool_balance: pool_balance.to_string(),
    })
}
