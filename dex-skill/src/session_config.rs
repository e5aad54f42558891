use crate::comparison::BattleType;
use crate::error::RankError;
use crate::systems::{BeliefParams, get_rating_system_by_name};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_thresholds() -> Vec<u64> {
    vec![10, 25, 50, 100, 200, 350, 500, 750, 1000]
}

fn default_window_ms() -> u64 {
    300
}

fn default_reorder_boost() -> f64 {
    100.
}

fn default_reorder_battles() -> u32 {
    3
}

fn default_flag_battles() -> u32 {
    5
}

fn default_surfaced_battles() -> u32 {
    2
}

fn default_rating_system() -> String {
    "gaussian".into()
}

fn default_recent_window() -> usize {
    8
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub battle_type: BattleType,
    #[serde(default = "default_thresholds")]
    pub thresholds: Vec<u64>,
    #[serde(default = "default_window_ms")]
    pub grace_delay_ms: u64,
    #[serde(default = "default_window_ms")]
    pub dedup_window_ms: u64,
    #[serde(default = "default_reorder_boost")]
    pub reorder_boost: f64,
    #[serde(default = "default_reorder_battles")]
    pub reorder_refinement_battles: u32,
    #[serde(default = "default_flag_battles")]
    pub flag_refinement_battles: u32,
    #[serde(default = "default_surfaced_battles")]
    pub surfaced_refinement_battles: u32,
    #[serde(default = "default_rating_system")]
    pub rating_system: String,
    #[serde(default)]
    pub belief: BeliefParams,
    // number of past sets remembered for repeat avoidance
    #[serde(default = "default_recent_window")]
    pub recent_window: usize,
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            battle_type: BattleType::default(),
            thresholds: default_thresholds(),
            grace_delay_ms: default_window_ms(),
            dedup_window_ms: default_window_ms(),
            reorder_boost: default_reorder_boost(),
            reorder_refinement_battles: default_reorder_battles(),
            flag_refinement_battles: default_flag_battles(),
            surfaced_refinement_battles: default_surfaced_battles(),
            rating_system: default_rating_system(),
            belief: BeliefParams::default(),
            recent_window: default_recent_window(),
            rng_seed: None,
        }
    }
}

impl SessionConfig {
    pub fn from_file(source: impl AsRef<Path>) -> Result<Self, RankError> {
        // json5 tolerates comments and trailing commas in hand-written configs
        let params_json = std::fs::read_to_string(source)?;
        let config: Self =
            json5::from_str(&params_json).map_err(|e| RankError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RankError> {
        self.belief.validate().map_err(RankError::InvalidConfig)?;
        get_rating_system_by_name(&self.rating_system).map_err(RankError::InvalidConfig)?;
        if self.thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(RankError::InvalidConfig(format!(
                "thresholds {:?} must be strictly ascending",
                self.thresholds
            )));
        }
        if !(self.reorder_boost > 0.) {
            return Err(RankError::InvalidConfig(format!(
                "reorder_boost={} must be positive",
                self.reorder_boost
            )));
        }
        Ok(())
    }
}
