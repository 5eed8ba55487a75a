//! The core proportional split of a block's pool delta.

use crate::errors::AuditError;
use crate::sources::BalanceSource;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use poolaudit_types::{Address, BlockGroup, BlockNumber, Contribution, Wei};
use std::collections::BTreeMap;

/// One block's allocation result. Ephemeral: computed once, folded into the
/// contribution ledger, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockAllocation {
    pub block_number: BlockNumber,
    /// How much the pool balance moved across this block; can be negative.
    pub pool_delta: Wei,
    /// Sum of all token amounts issued in this block.
    pub token_total: BigInt,
    /// Strictly positive shares only; zero and negative shares are dropped.
    pub allocations: BTreeMap<Address, Contribution>,
}

/// Exact proportional shares of `pool_delta` for every participant in the
/// group, before the positivity filter.
///
/// `share_p = amount_p * pool_delta / token_total`, carried as exact
/// rationals so the shares always sum back to `pool_delta` precisely.
/// Panics on a zero `token_total`; callers go through [`allocate_block`],
/// which rejects that case first.
pub fn proportional_shares(
    group: &BlockGroup,
    pool_delta: &Wei,
    token_total: &BigInt,
) -> BTreeMap<Address, Contribution> {
    group
        .issuances
        .iter()
        .map(|(participant, amount)| {
            let share = BigRational::new(
                BigInt::from(amount.clone()) * pool_delta,
                token_total.clone(),
            );
            (participant.clone(), share)
        })
        .collect()
}

/// Compute one block's pool delta and distribute it across the block's
/// recipients in proportion to tokens issued.
///
/// The delta is the pool balance at the end of this block minus the balance
/// at the end of the previous one (zero before block 0). A shrinking pool is
/// not guarded against: every share of a negative delta is negative and
/// silently dropped by the positivity filter, so such a block contributes
/// nothing to anyone.
pub fn allocate_block(
    group: &BlockGroup,
    pool: &Address,
    balances: &dyn BalanceSource,
) -> Result<BlockAllocation, AuditError> {
    let current = balances.balance_of(pool, group.block_number)?;
    let previous = if group.block_number == 0 {
        BigInt::zero()
    } else {
        BigInt::from(balances.balance_of(pool, group.block_number - 1)?)
    };
    let pool_delta = BigInt::from(current) - previous;

    let token_total = BigInt::from(group.token_total());
    if token_total.is_zero() {
        // Unreachable for grouper-built groups; surfaced rather than letting
        // the rational constructor divide by zero.
        return Err(AuditError::DivisionUndefined {
            block_number: group.block_number,
        });
    }

    let allocations = proportional_shares(group, &pool_delta, &token_total)
        .into_iter()
        .filter(|(_, share)| share.is_positive())
        .collect();

    Ok(BlockAllocation {
        block_number: group.block_number,
        pool_delta,
        token_total,
        allocations,
    })
}
