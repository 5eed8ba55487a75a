//! Collaborator interfaces for on-chain data.
//!
//! The allocation pipeline never talks to a ledger node directly; it consumes
//! these two traits, which a shell implements against whatever backend it has.
//! In-memory implementations live here for tests and fixture-driven runs.

use crate::errors::SourceError;
use num_bigint::BigUint;
use poolaudit_types::{Address, BlockNumber, IssuanceEvent, TokenAmount};
use std::collections::BTreeMap;

/// Supplies every issuance event in an inclusive block range.
pub trait EventSource {
    fn fetch_issuance_events(
        &self,
        from_block: BlockNumber,
        to_block: BlockNumber,
    ) -> Result<Vec<IssuanceEvent>, SourceError>;
}

/// Supplies the exact balance of an account as of the end of a block.
pub trait BalanceSource {
    fn balance_of(
        &self,
        address: &Address,
        block_number: BlockNumber,
    ) -> Result<BigUint, SourceError>;
}

// -----------------------------------------------------------------------------
// In-memory implementations (for tests and fixture-driven runs)
// -----------------------------------------------------------------------------

/// Event source backed by a plain vector of validated events.
#[derive(Debug, Clone, Default)]
pub struct MemoryEventSource {
    events: Vec<IssuanceEvent>,
}

impl MemoryEventSource {
    pub fn new(events: Vec<IssuanceEvent>) -> Self {
        Self { events }
    }

    pub fn push(&mut self, participant: Address, amount: TokenAmount, block_number: BlockNumber) {
        self.events.push(IssuanceEvent {
            participant,
            amount,
            block_number,
        });
    }
}

impl EventSource for MemoryEventSource {
    fn fetch_issuance_events(
        &self,
        from_block: BlockNumber,
        to_block: BlockNumber,
    ) -> Result<Vec<IssuanceEvent>, SourceError> {
        Ok(self
            .events
            .iter()
            .filter(|event| event.block_number >= from_block && event.block_number <= to_block)
            .cloned()
            .collect())
    }
}

/// Balance source backed by per-account balance checkpoints.
///
/// A checkpoint at block `n` means "balance as of the end of block `n`"; a
/// query resolves to the most recent checkpoint at or below the queried
/// height, and to zero before the first checkpoint. This mirrors how an
/// account balance is defined at every height of a real chain.
#[derive(Debug, Clone, Default)]
pub struct MemoryBalanceSource {
    checkpoints: BTreeMap<Address, BTreeMap<BlockNumber, BigUint>>,
}

impl MemoryBalanceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_balance(&mut self, address: Address, block_number: BlockNumber, balance: BigUint) {
        self.checkpoints
            .entry(address)
            .or_default()
            .insert(block_number, balance);
    }
}

impl BalanceSource for MemoryBalanceSource {
    fn balance_of(
        &self,
        address: &Address,
        block_number: BlockNumber,
    ) -> Result<BigUint, SourceError> {
        let balance = self
            .checkpoints
            .get(address)
            .and_then(|history| history.range(..=block_number).next_back())
            .map(|(_, balance)| balance.clone())
            .unwrap_or_default();
        Ok(balance)
    }
}

/// Balance source that always fails, for exercising abort paths.
#[derive(Debug, Clone, Default)]
pub struct UnavailableBalanceSource;

impl BalanceSource for UnavailableBalanceSource {
    fn balance_of(
        &self,
        _address: &Address,
        block_number: BlockNumber,
    ) -> Result<BigUint, SourceError> {
        Err(SourceError::Unavailable {
            context: format!("balance query at block {block_number} refused"),
        })
    }
}
