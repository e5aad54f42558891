//! The core's entire public surface: one rater ranking one catalog.

use crate::clock::Clock;
use crate::comparison::{BattleType, ComparisonResult, ComparisonSet};
use crate::completion::CompletionHandler;
use crate::data_processing::{Catalog, ItemId};
use crate::error::RankError;
use crate::events::{EventBus, SessionEvent};
use crate::milestone::{MilestoneCoordinator, MilestoneSnapshot, MilestoneState};
use crate::refinement::{RefinementEntry, RefinementQueue, RefinementReason};
use crate::reorder::{ReorderOutcome, ReorderTranslator};
use crate::scheduler::{Scheduler, SchedulerState};
use crate::session_config::SessionConfig;
use crate::summary::{RankedItem, make_leaderboard};
use crate::systems::{ItemRating, RatingStore, get_rating_system_by_name};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::mpsc::Receiver;

/// Everything a persistence collaborator needs to rebuild a session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub ratings: Vec<ItemRating>,
    pub battle_counter: u64,
    pub refinement_queue: Vec<RefinementEntry>,
}

#[derive(Debug)]
pub struct Session {
    catalog: Catalog,
    config: SessionConfig,
    battle_type: BattleType,
    store: RatingStore,
    scheduler: Scheduler,
    completion: CompletionHandler,
    milestones: MilestoneCoordinator,
    queue: RefinementQueue,
    translator: ReorderTranslator,
    events: EventBus,
    clock: Arc<dyn Clock>,
}

impl Session {
    pub fn new(
        catalog: Catalog,
        config: SessionConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, RankError> {
        config.validate()?;
        let system =
            get_rating_system_by_name(&config.rating_system).map_err(RankError::InvalidConfig)?;
        let milestones =
            MilestoneCoordinator::new(config.thresholds.clone(), config.grace_delay_ms)?;
        tracing::info!(
            "Starting a {:?} session over {} items with {:?}",
            config.battle_type,
            catalog.len(),
            system
        );

        Ok(Self {
            battle_type: config.battle_type,
            store: RatingStore::new(config.belief, system),
            scheduler: Scheduler::new(config.recent_window, config.rng_seed),
            completion: CompletionHandler::new(config.dedup_window_ms),
            milestones,
            queue: RefinementQueue::new(),
            translator: ReorderTranslator {
                boost: config.reorder_boost,
                refinement_battles: config.reorder_refinement_battles,
            },
            events: EventBus::default(),
            catalog,
            config,
            clock,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn store(&self) -> &RatingStore {
        &self.store
    }

    pub fn refinement_queue(&self) -> &RefinementQueue {
        &self.queue
    }

    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    pub fn battle_type(&self) -> BattleType {
        self.battle_type
    }

    pub fn battle_counter(&self) -> u64 {
        self.completion.battle_counter()
    }

    pub fn history(&self) -> &[ComparisonResult] {
        self.completion.history()
    }

    pub fn milestone_snapshot(&self) -> Option<&MilestoneSnapshot> {
        self.milestones.latest_snapshot()
    }

    pub fn subscribe(&mut self) -> Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Fires deferred work that has come due. Every entry point calls this first.
    pub fn poll(&mut self) {
        let now = self.clock.now_ms();
        if self.milestones.poll(now) {
            self.scheduler.unblock();
            self.events.publish(SessionEvent::MilestoneCleared);
        }
    }

    /// Switches between pairs and triplets. Any in-flight set is discarded.
    pub fn set_battle_type(&mut self, battle_type: BattleType) {
        if battle_type != self.battle_type {
            self.battle_type = battle_type;
            self.scheduler.discard_in_flight();
            self.completion.finish_processing();
        }
    }

    pub fn get_next_comparison_set(&mut self) -> Result<ComparisonSet, RankError> {
        self.poll();
        let now = self.clock.now_ms();
        let generated = self.scheduler.next_set(
            self.battle_type.arity(),
            &self.catalog,
            &self.store,
            &self.queue,
            now,
        )?;
        if let Some(warning) = generated.warning {
            self.events.publish(SessionEvent::BattleTypeMismatch(warning));
        }
        if generated.fresh {
            self.completion.finish_processing();
        }
        Ok(generated.set)
    }

    /// Applies the rater's pick to the in-flight set. `Ok(None)` means the pick was
    /// ignored as a duplicate or stale dispatch.
    pub fn submit_choice(&mut self, ids: &[ItemId]) -> Result<Option<ComparisonResult>, RankError> {
        self.poll();
        if self.milestones.is_blocked() {
            tracing::debug!("Ignoring choice {:?} while blocked at a milestone", ids);
            return Ok(None);
        }
        let Some(presented) = self.scheduler.in_flight().cloned() else {
            tracing::debug!("Ignoring choice {:?} with no set in flight", ids);
            return Ok(None);
        };
        let now = self.clock.now_ms();
        let Some(result) =
            self.completion
                .on_user_choice(ids, &presented, now, &mut self.store)?
        else {
            return Ok(None);
        };
        self.scheduler.complete();

        self.events.publish(SessionEvent::RatingsUpdated {
            item_ids: result.set_ids.clone(),
            implied: false,
        });
        if self.queue.on_battle_observed(&result.set_ids) {
            self.events.publish(SessionEvent::RefinementQueueChanged {
                len: self.queue.len(),
            });
        }

        let battle_count = self.completion.battle_counter();
        let reached = self.milestones.on_battle_count(battle_count, now, || {
            (
                make_leaderboard(&self.catalog, &self.store),
                self.completion.history().to_vec(),
            )
        });
        if let Some(reached) = reached {
            self.scheduler.block();
            self.events.publish(SessionEvent::MilestoneReached {
                threshold: reached.threshold,
                crossed_count: reached.crossed_count,
            });
        }
        Ok(Some(result))
    }

    pub fn get_ranked_view(&self) -> Vec<RankedItem> {
        make_leaderboard(&self.catalog, &self.store)
    }

    pub fn get_milestone_state(&mut self) -> MilestoneState {
        self.poll();
        self.milestones.state()
    }

    /// Requests the unblock; it takes effect once the grace delay has passed.
    pub fn dismiss_milestone(&mut self) -> bool {
        self.poll();
        let now = self.clock.now_ms();
        let scheduled = self.milestones.dismiss(now);
        if scheduled && self.config.grace_delay_ms == 0 {
            self.poll();
        }
        scheduled
    }

    /// Moves `item_id` from `from` to `to` in the current ranked view.
    pub fn move_item(
        &mut self,
        item_id: ItemId,
        from: usize,
        to: usize,
    ) -> Result<ReorderOutcome, RankError> {
        self.poll();
        if !self.catalog.contains(item_id) {
            return Err(RankError::UnknownItemReference(item_id));
        }
        let now = self.clock.now_ms();
        let view = self.get_ranked_view();
        let outcome = self.translator.on_manual_move(
            item_id,
            from,
            to,
            &view,
            &mut self.store,
            &mut self.queue,
            now,
        )?;

        if !outcome.implied.is_empty() {
            let mut item_ids: Vec<ItemId> = outcome
                .implied
                .iter()
                .flat_map(|result| result.set_ids.iter().copied())
                .collect();
            item_ids.sort_unstable();
            item_ids.dedup();
            self.events.publish(SessionEvent::RatingsUpdated {
                item_ids,
                implied: true,
            });
        }
        if outcome.queue_changed {
            self.events.publish(SessionEvent::RefinementQueueChanged {
                len: self.queue.len(),
            });
        }
        Ok(outcome)
    }

    /// Asks for extra comparisons of an item the rater is unsure about.
    pub fn flag_item(&mut self, item_id: ItemId) -> Result<(), RankError> {
        let battles = self.config.flag_refinement_battles;
        self.enqueue_refinement(&[item_id], battles, RefinementReason::UserFlagged)
    }

    /// Gives priority exposure to items that just became visible to the rater.
    pub fn surface_items(&mut self, item_ids: &[ItemId]) -> Result<(), RankError> {
        let battles = self.config.surfaced_refinement_battles;
        self.enqueue_refinement(item_ids, battles, RefinementReason::NewlySurfaced)
    }

    fn enqueue_refinement(
        &mut self,
        item_ids: &[ItemId],
        battles: u32,
        reason: RefinementReason,
    ) -> Result<(), RankError> {
        if let Some(&unknown) = item_ids.iter().find(|&&id| !self.catalog.contains(id)) {
            return Err(RankError::UnknownItemReference(unknown));
        }
        let mut changed = false;
        for &id in item_ids {
            changed |= self.queue.enqueue(id, battles, reason);
        }
        if changed {
            self.events.publish(SessionEvent::RefinementQueueChanged {
                len: self.queue.len(),
            });
        }
        Ok(())
    }

    /// Discards all core state at once, including any pending unblock.
    pub fn reset_session(&mut self) {
        self.store.clear();
        self.queue.clear();
        self.milestones.reset();
        self.completion.reset();
        self.scheduler.reset();
        tracing::info!("Session reset");
        self.events.publish(SessionEvent::SessionReset);
    }

    pub fn export_state(&self) -> SessionState {
        let mut ratings: Vec<ItemRating> = self.store.get_all_ratings().values().copied().collect();
        ratings.sort_unstable_by_key(|r| r.item_id);
        SessionState {
            ratings,
            battle_counter: self.completion.battle_counter(),
            refinement_queue: self.queue.entries().copied().collect(),
        }
    }

    /// Replaces the session's state with a snapshot. Milestones at or below the imported
    /// counter count as already crossed.
    pub fn import_state(&mut self, state: SessionState) {
        tracing::info!(
            "Importing {} ratings at battle {}",
            state.ratings.len(),
            state.battle_counter
        );
        self.scheduler.reset();
        self.store.restore(state.ratings);
        self.queue.restore(state.refinement_queue);
        self.completion.restore(state.battle_counter);
        self.milestones.restore_progress(state.battle_counter);
        let item_ids = self.store.get_all_ratings().keys().copied().collect();
        self.events.publish(SessionEvent::RatingsUpdated {
            item_ids,
            implied: false,
        });
        self.events.publish(SessionEvent::RefinementQueueChanged {
            len: self.queue.len(),
        });
    }
}
