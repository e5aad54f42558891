use crate::data_processing::ItemId;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// How many items are presented per battle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BattleType {
    #[default]
    Pairs,
    Triplets,
}

impl BattleType {
    pub fn arity(self) -> usize {
        match self {
            Self::Pairs => 2,
            Self::Triplets => 3,
        }
    }
}

/// The items presented together in one round-trip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSet {
    pub ids: Vec<ItemId>,
    pub arity: usize,
    pub created_at_ms: u64,
}

impl ComparisonSet {
    pub fn new(ids: Vec<ItemId>, arity: usize, created_at_ms: u64) -> Self {
        Self {
            ids,
            arity,
            created_at_ms,
        }
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.ids.contains(&id)
    }

    /// True if both sets hold the same multiset of ids, in any order.
    pub fn same_ids(&self, other: &[ItemId]) -> bool {
        same_multiset(&self.ids, other)
    }
}

pub fn same_multiset(a: &[ItemId], b: &[ItemId]) -> bool {
    a.len() == b.len() && a.iter().sorted().eq(b.iter().sorted())
}

/// The outcome of one comparison. Each participant carries a place; lower is better and
/// equal places are unordered against each other. Immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub set_ids: Vec<ItemId>,
    pub placements: Vec<(ItemId, usize)>,
    pub timestamp_ms: u64,
    /// Synthesized from a manual reorder rather than picked by the rater.
    #[serde(default)]
    pub implied: bool,
}

impl ComparisonResult {
    /// A two-item result.
    pub fn duel(winner: ItemId, loser: ItemId, timestamp_ms: u64) -> Self {
        Self {
            set_ids: vec![winner, loser],
            placements: vec![(winner, 0), (loser, 1)],
            timestamp_ms,
            implied: false,
        }
    }

    /// The chosen ids share first place; every other presented id shares second.
    pub fn from_choice(set_ids: &[ItemId], chosen: &[ItemId], timestamp_ms: u64) -> Self {
        let placements = set_ids
            .iter()
            .map(|&id| (id, if chosen.contains(&id) { 0 } else { 1 }))
            .collect();
        Self {
            set_ids: set_ids.to_vec(),
            placements,
            timestamp_ms,
            implied: false,
        }
    }

    /// A full ordering of the presented ids, best first.
    pub fn from_ranking(ranked: &[ItemId], timestamp_ms: u64) -> Self {
        Self {
            set_ids: ranked.to_vec(),
            placements: ranked.iter().enumerate().map(|(i, &id)| (id, i)).collect(),
            timestamp_ms,
            implied: false,
        }
    }

    pub fn implied(mut self) -> Self {
        self.implied = true;
        self
    }

    /// The unique first-placed item, if there is exactly one.
    pub fn winner_id(&self) -> Option<ItemId> {
        self.placements
            .iter()
            .filter(|(_, place)| *place == 0)
            .map(|&(id, _)| id)
            .exactly_one()
            .ok()
    }

    /// All ordered (better, worse) pairs the placements imply.
    pub fn induced_pairs(&self) -> Vec<(ItemId, ItemId)> {
        self.placements
            .iter()
            .cartesian_product(self.placements.iter())
            .filter(|((_, a), (_, b))| a < b)
            .map(|(&(better, _), &(worse, _))| (better, worse))
            .collect()
    }
}
