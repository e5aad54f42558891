use crate::comparison::ComparisonSet;
use crate::data_processing::{Catalog, ItemId};
use crate::error::RankError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A candidate set did not match the requested arity and was repaired. Never fatal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleTypeMismatch {
    pub expected: usize,
    pub found: usize,
    pub duplicates_dropped: usize,
    pub unknown_dropped: usize,
    pub padded: usize,
    pub truncated: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Validated {
    pub set: ComparisonSet,
    pub warning: Option<BattleTypeMismatch>,
}

/// Ensures `set` holds exactly `expected_arity` distinct catalog ids.
/// Repairs deterministically: drop duplicates and unknown ids (keeping first occurrences),
/// truncate the tail, then pad with the earliest unused ids of `pool`.
pub fn validate(
    set: ComparisonSet,
    expected_arity: usize,
    catalog: &Catalog,
    pool: &[ItemId],
) -> Result<Validated, RankError> {
    let found = set.ids.len();
    let mut seen = HashSet::with_capacity(found);
    let mut duplicates_dropped = 0;
    let mut unknown_dropped = 0;
    let mut ids = Vec::with_capacity(expected_arity);
    for id in set.ids {
        if !catalog.contains(id) {
            unknown_dropped += 1;
        } else if !seen.insert(id) {
            duplicates_dropped += 1;
        } else {
            ids.push(id);
        }
    }

    let truncated = ids.len().saturating_sub(expected_arity);
    ids.truncate(expected_arity);

    let mut padded = 0;
    for &id in pool {
        if ids.len() >= expected_arity {
            break;
        }
        if catalog.contains(id) && seen.insert(id) {
            ids.push(id);
            padded += 1;
        }
    }
    if ids.len() < expected_arity {
        return Err(RankError::InsufficientCandidates {
            eligible: ids.len(),
            arity: expected_arity,
        });
    }

    let repaired = duplicates_dropped + unknown_dropped + padded + truncated > 0;
    let warning = (repaired || found != expected_arity || set.arity != expected_arity).then(|| {
        let warning = BattleTypeMismatch {
            expected: expected_arity,
            found,
            duplicates_dropped,
            unknown_dropped,
            padded,
            truncated,
        };
        tracing::warn!("Repaired comparison set: {:?}", warning);
        warning
    });

    Ok(Validated {
        set: ComparisonSet::new(ids, expected_arity, set.created_at_ms),
        warning,
    })
}
