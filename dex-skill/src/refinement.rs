use crate::data_processing::ItemId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefinementReason {
    NewlySurfaced,
    UserFlagged,
    ManualReorder,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinementEntry {
    pub item_id: ItemId,
    pub remaining_required: u32,
    pub reason: RefinementReason,
}

/// Items that must appear in a minimum number of upcoming comparisons.
/// At most one entry per item; an entry disappears once its requirement is met.
#[derive(Clone, Debug, Default)]
pub struct RefinementQueue {
    entries: BTreeMap<ItemId, RefinementEntry>,
}

impl RefinementQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests at least `required_battles` more appearances for `item_id`.
    /// Re-enqueueing keeps the larger requirement, so progress is never reset downwards.
    /// Returns true if the queue changed.
    pub fn enqueue(
        &mut self,
        item_id: ItemId,
        required_battles: u32,
        reason: RefinementReason,
    ) -> bool {
        if required_battles == 0 {
            return false;
        }
        match self.entries.get_mut(&item_id) {
            Some(entry) if entry.remaining_required >= required_battles => false,
            Some(entry) => {
                entry.remaining_required = required_battles;
                entry.reason = reason;
                true
            }
            None => {
                self.entries.insert(
                    item_id,
                    RefinementEntry {
                        item_id,
                        remaining_required: required_battles,
                        reason,
                    },
                );
                true
            }
        }
    }

    /// Counts one appearance for every queued participant, win or lose.
    /// Returns true if the queue changed.
    pub fn on_battle_observed(&mut self, participant_ids: &[ItemId]) -> bool {
        let mut changed = false;
        for id in participant_ids {
            let Some(entry) = self.entries.get_mut(id) else {
                continue;
            };
            entry.remaining_required = entry.remaining_required.saturating_sub(1);
            let satisfied = entry.remaining_required == 0;
            if satisfied {
                self.entries.remove(id);
            }
            changed = true;
        }
        changed
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, item_id: ItemId) -> Option<&RefinementEntry> {
        self.entries.get(&item_id)
    }

    /// The most urgent item: highest remaining requirement, then fewest battles, then lowest id.
    pub fn peek_next(&self, battle_count: impl Fn(ItemId) -> u32) -> Option<ItemId> {
        self.entries
            .values()
            .min_by_key(|entry| {
                (
                    std::cmp::Reverse(entry.remaining_required),
                    battle_count(entry.item_id),
                    entry.item_id,
                )
            })
            .map(|entry| entry.item_id)
    }

    pub fn entries(&self) -> impl Iterator<Item = &RefinementEntry> {
        self.entries.values()
    }

    pub fn restore(&mut self, entries: impl IntoIterator<Item = RefinementEntry>) {
        self.entries.clear();
        for entry in entries {
            self.enqueue(entry.item_id, entry.remaining_required, entry.reason);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
