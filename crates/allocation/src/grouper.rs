//! Partitioning of the flat issuance log into per-block groups.

use poolaudit_types::{BlockGroup, BlockNumber, IssuanceEvent};
use std::collections::BTreeMap;

/// Partition a sequence of issuance events into per-block groups.
///
/// Events sharing a block and participant are summed, never deduplicated:
/// two identical-looking events are two real issuances and both count. The
/// input order is irrelevant; the `BTreeMap` result hands callers the blocks
/// in ascending order. Pure transformation, no events are dropped (zero
/// amounts aside, which are no-ops by the group invariant).
pub fn group_events(
    events: impl IntoIterator<Item = IssuanceEvent>,
) -> BTreeMap<BlockNumber, BlockGroup> {
    let mut groups: BTreeMap<BlockNumber, BlockGroup> = BTreeMap::new();

    for event in events {
        groups
            .entry(event.block_number)
            .or_insert_with(|| BlockGroup::new(event.block_number))
            .add_issuance(event.participant, event.amount);
    }

    // Only zero-amount events can leave a group empty; such groups carry no
    // issuance activity and must not reach the allocator.
    groups.retain(|_, group| !group.is_empty());
    groups
}
