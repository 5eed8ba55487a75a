//! JSON fixture files standing at the event/balance source interface.
//!
//! Live ledger connectivity is deliberately out of scope; a run consumes a
//! decoded event log and a set of pool balance checkpoints from disk instead.
//!
//! Events file: an array of raw issuance events,
//! `[{"participant": "0x..", "amount": "100", "block_number": 10}, ...]`.
//! Balances file: checkpoints per account,
//! `{"0x..": {"10": "1000", "20": "2500"}}` — balance as of the end of the
//! given block, in wei.

use anyhow::{Context, Result};
use num_bigint::BigUint;
use poolaudit_allocation::{AuditError, MemoryBalanceSource, MemoryEventSource, SourceError};
use poolaudit_types::{Address, BlockNumber, IssuanceEvent, RawIssuanceEvent};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load and validate the issuance event log from a JSON fixture.
///
/// Malformed events (negative or non-numeric amounts, bad addresses) are
/// rejected here, before anything reaches the grouper.
pub fn load_event_source(path: &Path) -> Result<MemoryEventSource> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read events fixture {}", path.display()))?;

    let raw_events: Vec<RawIssuanceEvent> = serde_json::from_str(&contents)
        .with_context(|| format!("events fixture {} is not valid JSON", path.display()))?;

    let events = raw_events
        .into_iter()
        .map(|raw| IssuanceEvent::try_from(raw).map_err(AuditError::from))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(path = %path.display(), events = events.len(), "loaded events fixture");
    Ok(MemoryEventSource::new(events))
}

/// Load pool balance checkpoints from a JSON fixture.
pub fn load_balance_source(path: &Path) -> Result<MemoryBalanceSource> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read balances fixture {}", path.display()))?;

    let checkpoints: BTreeMap<String, BTreeMap<String, String>> = serde_json::from_str(&contents)
        .with_context(|| format!("balances fixture {} is not valid JSON", path.display()))?;

    let mut source = MemoryBalanceSource::new();
    for (address, history) in checkpoints {
        let address = Address::parse(&address)
            .with_context(|| format!("balances fixture {}: bad address", path.display()))?;

        for (block_number, balance) in history {
            let block_number: BlockNumber =
                block_number
                    .parse()
                    .map_err(|_| SourceError::MalformedData {
                        context: format!("block height {block_number:?} is not an integer"),
                    })?;
            let balance: BigUint = balance.parse().map_err(|_| SourceError::MalformedData {
                context: format!("balance {balance:?} at block {block_number} is not a decimal integer"),
            })?;

            source.set_balance(address.clone(), block_number, balance);
        }
    }

    debug!(path = %path.display(), "loaded balances fixture");
    Ok(source)
}
