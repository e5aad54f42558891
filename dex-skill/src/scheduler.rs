use crate::comparison::{ComparisonSet, same_multiset};
use crate::data_processing::{Catalog, ItemId};
use crate::error::RankError;
use crate::refinement::RefinementQueue;
use crate::systems::RatingStore;
use crate::validator::{BattleTypeMismatch, validate};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulerState {
    Idle,
    Generating,
    AwaitingResult,
    Blocked,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Generated {
    pub set: ComparisonSet,
    pub warning: Option<BattleTypeMismatch>,
    /// False when the in-flight set was handed out again instead of a new one.
    pub fresh: bool,
}

/// Chooses what to compare next. At most one set is in flight at any time.
#[derive(Debug)]
pub struct Scheduler {
    state: SchedulerState,
    blocked: bool,
    in_flight: Option<ComparisonSet>,
    recent: VecDeque<Vec<ItemId>>,
    recent_window: usize,
    // First pick of the previous round, before any resampling.
    last_pick: Option<Vec<ItemId>>,
    consecutive_identical: usize,
    rng: StdRng,
}

impl Scheduler {
    pub fn new(recent_window: usize, rng_seed: Option<u64>) -> Self {
        let rng = match rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            state: SchedulerState::Idle,
            blocked: false,
            in_flight: None,
            recent: VecDeque::new(),
            recent_window: recent_window.max(1),
            last_pick: None,
            consecutive_identical: 0,
            rng,
        }
    }

    pub fn state(&self) -> SchedulerState {
        if self.blocked {
            SchedulerState::Blocked
        } else {
            self.state
        }
    }

    pub fn in_flight(&self) -> Option<&ComparisonSet> {
        self.in_flight.as_ref()
    }

    /// How many rounds in a row the first pick repeated the previous set or the previous
    /// first pick.
    pub fn consecutive_identical(&self) -> usize {
        self.consecutive_identical
    }

    pub fn block(&mut self) {
        self.blocked = true;
    }

    pub fn unblock(&mut self) {
        self.blocked = false;
    }

    /// Returns the set awaiting a result, generating one if none is in flight.
    ///
    /// Generation runs under `&mut self`, so a second generation cannot start before this
    /// one returns; `Generating` is only observable from inside the call.
    pub fn next_set(
        &mut self,
        arity: usize,
        catalog: &Catalog,
        store: &RatingStore,
        queue: &RefinementQueue,
        now_ms: u64,
    ) -> Result<Generated, RankError> {
        if self.blocked {
            return Err(RankError::SchedulerBlocked);
        }
        if let Some(set) = &self.in_flight {
            if set.arity == arity {
                return Ok(Generated {
                    set: set.clone(),
                    warning: None,
                    fresh: false,
                });
            }
            tracing::debug!("Discarding in-flight set {:?} after arity change", set.ids);
            self.in_flight = None;
        }

        self.state = SchedulerState::Generating;
        let generated = self.generate(arity, catalog, store, queue, now_ms);

        match &generated {
            Ok(generated) => {
                self.recent.push_back(generated.set.ids.clone());
                while self.recent.len() > self.recent_window {
                    self.recent.pop_front();
                }
                self.in_flight = Some(generated.set.clone());
                self.state = SchedulerState::AwaitingResult;
            }
            Err(_) => self.state = SchedulerState::Idle,
        }
        generated
    }

    /// The in-flight set received its result.
    pub fn complete(&mut self) {
        self.in_flight = None;
        self.state = SchedulerState::Idle;
    }

    pub fn discard_in_flight(&mut self) {
        self.complete();
    }

    /// Forgets all history and unblocks. The random stream carries on.
    pub fn reset(&mut self) {
        self.state = SchedulerState::Idle;
        self.blocked = false;
        self.in_flight = None;
        self.recent.clear();
        self.last_pick = None;
        self.consecutive_identical = 0;
    }

    // Fewest battles first, then most uncertain; remaining ties in random order.
    fn exploration_order(&mut self, catalog: &Catalog, store: &RatingStore) -> Vec<ItemId> {
        let mut pool = catalog.ids().to_vec();
        pool.shuffle(&mut self.rng);
        pool.sort_by(|&a, &b| {
            let (ra, rb) = (store.peek_rating(a), store.peek_rating(b));
            ra.battle_count
                .cmp(&rb.battle_count)
                .then(rb.rating.sig.total_cmp(&ra.rating.sig))
        });
        pool
    }

    fn assemble(
        anchor: Option<ItemId>,
        pool: &[ItemId],
        excluded: &HashSet<ItemId>,
        arity: usize,
    ) -> Vec<ItemId> {
        let mut picked: Vec<ItemId> = anchor.into_iter().collect();
        let needed = arity.saturating_sub(picked.len());
        picked.extend(
            pool.iter()
                .copied()
                .filter(|&id| Some(id) != anchor && !excluded.contains(&id))
                .take(needed),
        );
        picked
    }

    fn generate(
        &mut self,
        arity: usize,
        catalog: &Catalog,
        store: &RatingStore,
        queue: &RefinementQueue,
        now_ms: u64,
    ) -> Result<Generated, RankError> {
        if catalog.len() < arity {
            tracing::warn!(
                "Cannot schedule a battle of {} from {} items",
                arity,
                catalog.len()
            );
            return Err(RankError::InsufficientCandidates {
                eligible: catalog.len(),
                arity,
            });
        }

        let pool = self.exploration_order(catalog, store);
        let anchor = queue
            .peek_next(|id| store.battle_count(id))
            .filter(|&id| catalog.contains(id));
        if let Some(id) = anchor {
            tracing::debug!("Anchoring the next set on refinement item {}", id);
        }

        let mut picked = Self::assemble(anchor, &pool, &HashSet::new(), arity);
        // A stall persists while the first pick keeps coming back, even once resampling
        // has made the previous set differ from it.
        let stalled = self.consecutive_identical > 0
            && self
                .last_pick
                .as_ref()
                .is_some_and(|last| same_multiset(&picked, last));
        let repeats = stalled
            || self
                .recent
                .back()
                .is_some_and(|last| same_multiset(&picked, last));
        self.last_pick = Some(picked.clone());
        if repeats {
            self.consecutive_identical += 1;
            picked = self.resample(anchor, &pool, arity, picked);
        } else {
            self.consecutive_identical = 0;
        }

        let candidate = ComparisonSet::new(picked, arity, now_ms);
        let validated = validate(candidate, arity, catalog, &pool)?;
        Ok(Generated {
            set: validated.set,
            warning: validated.warning,
            fresh: true,
        })
    }

    // The exclusion radius (in past sets) grows with the number of consecutive repeats.
    fn resample(
        &self,
        anchor: Option<ItemId>,
        pool: &[ItemId],
        arity: usize,
        repeated: Vec<ItemId>,
    ) -> Vec<ItemId> {
        let Some(last) = self.recent.back() else {
            return repeated;
        };
        let radius = self.consecutive_identical.clamp(1, self.recent.len());
        for r in (1..=radius).rev() {
            let excluded: HashSet<ItemId> = self
                .recent
                .iter()
                .rev()
                .take(r)
                .flatten()
                .copied()
                .filter(|&id| Some(id) != anchor)
                .collect();
            let picked = Self::assemble(anchor, pool, &excluded, arity);
            if picked.len() == arity && !same_multiset(&picked, last) {
                tracing::debug!("Resampled a repeated set with radius {}", r);
                return picked;
            }
        }

        // Not enough unexcluded items: swap in the best item absent from the last set.
        let mut picked = repeated;
        match pool.iter().copied().find(|id| !last.contains(id)) {
            Some(fresh) => {
                if let Some(slot) = picked.iter().rposition(|&id| Some(id) != anchor) {
                    picked[slot] = fresh;
                }
            }
            None => tracing::warn!(
                "Only {} eligible items; repeating the previous set",
                pool.len()
            ),
        }
        picked
    }
}
