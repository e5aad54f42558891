use super::{BeliefParams, ItemRating, Rating, RatingSystem};
use crate::comparison::ComparisonResult;
use crate::data_processing::ItemId;
use std::collections::HashMap;

pub type RatingsById = HashMap<ItemId, ItemRating>;

/// Holds one Gaussian belief per item. Knows nothing about scheduling and performs no I/O;
/// callers publish change notifications from the ids its mutations return.
#[derive(Debug)]
pub struct RatingStore {
    ratings: RatingsById,
    params: BeliefParams,
    system: Box<dyn RatingSystem + Send + Sync>,
}

impl RatingStore {
    pub fn new(params: BeliefParams, system: Box<dyn RatingSystem + Send + Sync>) -> Self {
        Self {
            ratings: HashMap::new(),
            params,
            system,
        }
    }

    pub fn params(&self) -> &BeliefParams {
        &self.params
    }

    fn newbie(&self, item_id: ItemId) -> ItemRating {
        ItemRating {
            item_id,
            rating: self.params.newbie(),
            battle_count: 0,
        }
    }

    /// Returns the entry for `item_id`, creating the default belief on first reference.
    pub fn get_rating(&mut self, item_id: ItemId) -> ItemRating {
        let newbie = self.newbie(item_id);
        *self.ratings.entry(item_id).or_insert(newbie)
    }

    /// Like `get_rating`, but never inserts. Used by read-only projections.
    pub fn peek_rating(&self, item_id: ItemId) -> ItemRating {
        self.ratings
            .get(&item_id)
            .copied()
            .unwrap_or_else(|| self.newbie(item_id))
    }

    pub fn battle_count(&self, item_id: ItemId) -> u32 {
        self.ratings.get(&item_id).map_or(0, |r| r.battle_count)
    }

    pub fn conservative_score(&self, item_id: ItemId) -> f64 {
        self.peek_rating(item_id).conservative_score(&self.params)
    }

    pub fn get_all_ratings(&self) -> &RatingsById {
        &self.ratings
    }

    /// Folds one result into the beliefs of its participants. Unknown ids are created
    /// with the default belief, so replaying a result is always safe.
    /// Returns the ids whose entries changed.
    pub fn update_from_result(&mut self, result: &ComparisonResult) -> Vec<ItemId> {
        let standings: Vec<(Rating, usize)> = result
            .placements
            .iter()
            .map(|&(id, place)| (self.get_rating(id).rating, place))
            .collect();
        let posteriors = self.system.round_update(&self.params, &standings);

        let mut changed = Vec::with_capacity(posteriors.len());
        for (&(id, _), posterior) in result.placements.iter().zip(posteriors) {
            if let Some(entry) = self.ratings.get_mut(&id) {
                entry.rating = posterior;
                entry.battle_count += 1;
                changed.push(id);
            }
        }
        tracing::debug!(
            "Updated {} ratings from a result with winner {:?}",
            changed.len(),
            result.winner_id()
        );
        changed
    }

    /// Sets the belief mean so that the conservative score equals `score` exactly,
    /// leaving uncertainty and battle count untouched.
    pub fn pin_score(&mut self, item_id: ItemId, score: f64) -> ItemRating {
        let k = self.params.conservative_k;
        let newbie = self.newbie(item_id);
        let entry = self.ratings.entry(item_id).or_insert(newbie);
        entry.rating.mu = score + k * entry.rating.sig;
        *entry
    }

    /// Replaces the whole store, e.g. from an imported snapshot.
    pub fn restore(&mut self, ratings: impl IntoIterator<Item = ItemRating>) {
        let sig_min = self.params.sig_min;
        self.ratings = ratings
            .into_iter()
            .map(|mut r| {
                if !(r.rating.sig > 0.) {
                    tracing::warn!("Raising non-positive sigma of item {} to the floor", r.item_id);
                    r.rating.sig = sig_min;
                }
                (r.item_id, r)
            })
            .collect();
    }

    pub fn clear(&mut self) {
        self.ratings.clear();
    }
}
