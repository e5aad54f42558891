use crate::clock::ScheduledTask;
use crate::comparison::ComparisonResult;
use crate::error::RankError;
use crate::summary::RankedItem;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MilestonePhase {
    Watching,
    Snapshotting,
    Blocked,
}

/// Public view of the coordinator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MilestoneState {
    pub thresholds: Vec<u64>,
    pub crossed_count: usize,
    pub blocked: bool,
    pub phase: MilestonePhase,
    pub next_threshold: Option<u64>,
    /// Set while a dismissal is waiting out its grace delay.
    pub unblock_due_ms: Option<u64>,
}

/// Immutable copy of the session taken when a threshold is crossed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MilestoneSnapshot {
    pub threshold: u64,
    pub battle_count: u64,
    pub taken_at_ms: u64,
    pub ranking: Vec<RankedItem>,
    pub history: Vec<ComparisonResult>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MilestoneReached {
    pub threshold: u64,
    pub thresholds_consumed: usize,
    pub crossed_count: usize,
}

/// Gates the scheduler at fixed battle-count checkpoints.
#[derive(Debug)]
pub struct MilestoneCoordinator {
    thresholds: Vec<u64>,
    crossed_count: usize,
    phase: MilestonePhase,
    grace_delay_ms: u64,
    pending_unblock: Option<ScheduledTask>,
    snapshots: Vec<MilestoneSnapshot>,
}

impl MilestoneCoordinator {
    pub fn new(thresholds: Vec<u64>, grace_delay_ms: u64) -> Result<Self, RankError> {
        if thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(RankError::InvalidConfig(format!(
                "milestone thresholds {:?} are not strictly ascending",
                thresholds
            )));
        }
        if thresholds.first() == Some(&0) {
            return Err(RankError::InvalidConfig(
                "a milestone threshold of 0 can never be crossed".into(),
            ));
        }
        Ok(Self {
            thresholds,
            crossed_count: 0,
            phase: MilestonePhase::Watching,
            grace_delay_ms,
            pending_unblock: None,
            snapshots: vec![],
        })
    }

    pub fn is_blocked(&self) -> bool {
        self.phase == MilestonePhase::Blocked
    }

    pub fn state(&self) -> MilestoneState {
        MilestoneState {
            thresholds: self.thresholds.clone(),
            crossed_count: self.crossed_count,
            blocked: self.is_blocked(),
            phase: self.phase,
            next_threshold: self.thresholds.get(self.crossed_count).copied(),
            unblock_due_ms: self.pending_unblock.as_ref().map(ScheduledTask::due_ms),
        }
    }

    pub fn snapshots(&self) -> &[MilestoneSnapshot] {
        &self.snapshots
    }

    pub fn latest_snapshot(&self) -> Option<&MilestoneSnapshot> {
        self.snapshots.last()
    }

    /// Checks the new battle count. Every unconsumed threshold at or below it is consumed
    /// at once; a single snapshot is taken for the highest of them and the coordinator blocks.
    pub fn on_battle_count(
        &mut self,
        battle_count: u64,
        now_ms: u64,
        snapshot: impl FnOnce() -> (Vec<RankedItem>, Vec<ComparisonResult>),
    ) -> Option<MilestoneReached> {
        let consumed = self.thresholds[self.crossed_count..]
            .iter()
            .take_while(|&&t| t <= battle_count)
            .count();
        if consumed == 0 {
            return None;
        }
        self.crossed_count += consumed;
        let threshold = self.thresholds[self.crossed_count - 1];

        self.phase = MilestonePhase::Snapshotting;
        let (ranking, history) = snapshot();
        self.snapshots.push(MilestoneSnapshot {
            threshold,
            battle_count,
            taken_at_ms: now_ms,
            ranking,
            history,
        });
        if let Some(task) = self.pending_unblock.as_mut() {
            task.cancel();
        }
        self.pending_unblock = None;
        self.phase = MilestonePhase::Blocked;
        tracing::info!(
            "Milestone {} reached at {} battles ({} consumed)",
            threshold,
            battle_count,
            consumed
        );

        Some(MilestoneReached {
            threshold,
            thresholds_consumed: consumed,
            crossed_count: self.crossed_count,
        })
    }

    /// Schedules the return to watching after the grace delay.
    /// Returns false if not blocked or a dismissal is already pending.
    pub fn dismiss(&mut self, now_ms: u64) -> bool {
        if !self.is_blocked() || self.pending_unblock.is_some() {
            return false;
        }
        self.pending_unblock = Some(ScheduledTask::after(now_ms, self.grace_delay_ms));
        true
    }

    /// Fires the pending unblock if it is due. Returns true if the coordinator unblocked.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match &self.pending_unblock {
            Some(task) if task.is_due(now_ms) => {
                self.pending_unblock = None;
                self.phase = MilestonePhase::Watching;
                tracing::info!("Milestone dismissed; scheduling resumes");
                true
            }
            _ => false,
        }
    }

    /// Marks every threshold up to `battle_count` as already consumed, without blocking.
    pub fn restore_progress(&mut self, battle_count: u64) {
        self.reset();
        self.crossed_count = self.thresholds.iter().take_while(|&&t| t <= battle_count).count();
    }

    pub fn reset(&mut self) {
        if let Some(task) = self.pending_unblock.as_mut() {
            task.cancel();
        }
        self.pending_unblock = None;
        self.crossed_count = 0;
        self.phase = MilestonePhase::Watching;
        self.snapshots.clear();
    }
}
