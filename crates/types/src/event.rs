use crate::address::Address;
use crate::BlockNumber;
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Quantity of tokens granted by an issuance; unbounded, token totals can
/// exceed any native integer width.
pub type TokenAmount = BigUint;

/// Errors raised while validating a raw issuance event from the log.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("issuance amount {amount:?} at block {block_number} is negative")]
    NegativeAmount {
        amount: String,
        block_number: BlockNumber,
    },
    #[error("issuance amount {amount:?} at block {block_number} is not a decimal integer")]
    NonNumericAmount {
        amount: String,
        block_number: BlockNumber,
    },
    #[error("invalid participant address: {0}")]
    InvalidParticipant(#[from] crate::address::AddressError),
}

/// Wire form of an issuance event as it appears in a decoded log entry.
///
/// The amount travels as a decimal string because issuance amounts do not fit
/// fixed-width JSON numbers; validation happens in [`IssuanceEvent::try_from`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawIssuanceEvent {
    pub participant: String,
    pub amount: String,
    pub block_number: BlockNumber,
}

/// A validated record that a participant was granted tokens at a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuanceEvent {
    pub participant: Address,
    pub amount: TokenAmount,
    pub block_number: BlockNumber,
}

impl TryFrom<RawIssuanceEvent> for IssuanceEvent {
    type Error = EventError;

    fn try_from(raw: RawIssuanceEvent) -> Result<Self, Self::Error> {
        let participant = Address::parse(&raw.participant)?;

        let trimmed = raw.amount.trim();
        if trimmed.starts_with('-') {
            return Err(EventError::NegativeAmount {
                amount: raw.amount,
                block_number: raw.block_number,
            });
        }

        let amount: TokenAmount = trimmed.parse().map_err(|_| EventError::NonNumericAmount {
            amount: raw.amount.clone(),
            block_number: raw.block_number,
        })?;

        Ok(IssuanceEvent {
            participant,
            amount,
            block_number: raw.block_number,
        })
    }
}

/// All issuance activity observed in a single block, merged per participant.
///
/// Every stored amount is strictly positive: zero-amount issuances are no-ops
/// and never create an entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockGroup {
    pub block_number: BlockNumber,
    pub issuances: BTreeMap<Address, TokenAmount>,
}

impl BlockGroup {
    pub fn new(block_number: BlockNumber) -> Self {
        Self {
            block_number,
            issuances: BTreeMap::new(),
        }
    }

    /// Add an issuance to the group, summing with any amount the participant
    /// already received in this block. Zero amounts are dropped.
    pub fn add_issuance(&mut self, participant: Address, amount: TokenAmount) {
        if amount.is_zero() {
            return;
        }
        *self
            .issuances
            .entry(participant)
            .or_insert_with(TokenAmount::zero) += amount;
    }

    /// Sum of all token amounts issued in this block.
    pub fn token_total(&self) -> TokenAmount {
        self.issuances.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.issuances.is_empty()
    }
}
