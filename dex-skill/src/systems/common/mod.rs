use crate::data_processing::ItemId;
use serde::{Deserialize, Serialize};

/// Gaussian belief about an item's latent skill.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub mu: f64,
    pub sig: f64,
}

impl Rating {
    pub fn conservative(&self, k: f64) -> f64 {
        self.mu - k * self.sig
    }

    /// Shrinks the variance in excess of `sig_min^2` by `factor`, so that updates lose
    /// their effect as the uncertainty approaches its floor. `factor` must lie in (0, 1].
    pub fn shrink_excess_variance(self, factor: f64, sig_min: f64) -> Self {
        let var = self.sig * self.sig;
        let var_min = sig_min * sig_min;
        let sig = if var <= var_min {
            self.sig
        } else {
            (var_min + (var - var_min) * factor).sqrt()
        };
        Self { mu: self.mu, sig }
    }
}

/// A Rating Store entry: the belief plus the number of results the item took part in.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemRating {
    pub item_id: ItemId,
    pub rating: Rating,
    pub battle_count: u32,
}

impl ItemRating {
    pub fn conservative_score(&self, params: &BeliefParams) -> f64 {
        self.rating.conservative(params.conservative_k)
    }
}

fn default_mu_noob() -> f64 {
    25.
}

fn default_sig_noob() -> f64 {
    25. / 3.
}

fn default_sig_min() -> f64 {
    0.5
}

fn default_beta() -> f64 {
    25. / 6.
}

fn default_conservative_k() -> f64 {
    3.
}

/// Hyperparameters of the belief model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BeliefParams {
    // prior of every newly referenced item
    #[serde(default = "default_mu_noob")]
    pub mu_noob: f64,
    #[serde(default = "default_sig_noob")]
    pub sig_noob: f64,
    // uncertainty floor; information gain vanishes as sig approaches it
    #[serde(default = "default_sig_min")]
    pub sig_min: f64,
    // performance noise of a single pick
    #[serde(default = "default_beta")]
    pub beta: f64,
    // number of standard deviations subtracted to get the displayed score
    #[serde(default = "default_conservative_k")]
    pub conservative_k: f64,
}

impl Default for BeliefParams {
    fn default() -> Self {
        Self {
            mu_noob: default_mu_noob(),
            sig_noob: default_sig_noob(),
            sig_min: default_sig_min(),
            beta: default_beta(),
            conservative_k: default_conservative_k(),
        }
    }
}

impl BeliefParams {
    pub fn newbie(&self) -> Rating {
        Rating {
            mu: self.mu_noob,
            sig: self.sig_noob,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.sig_min > 0.) {
            return Err(format!("sig_min={} must be positive", self.sig_min));
        }
        if !(self.sig_noob > self.sig_min) {
            return Err(format!(
                "sig_noob={} must exceed sig_min={}",
                self.sig_noob, self.sig_min
            ));
        }
        if !(self.beta > 0.) || !self.mu_noob.is_finite() || !(self.conservative_k >= 0.) {
            return Err("beta must be positive; mu_noob finite; conservative_k non-negative".into());
        }
        Ok(())
    }
}

/// An update law. `standings` pairs each participant's pre-update rating with its place,
/// where a lower place is better and equal places are unordered against each other.
/// Returns the posterior ratings in the same order.
pub trait RatingSystem: std::fmt::Debug {
    fn round_update(&self, params: &BeliefParams, standings: &[(Rating, usize)]) -> Vec<Rating>;
}

/// True if no pair of participants is ordered, making the result uninformative.
pub fn outcome_free(standings: &[(Rating, usize)]) -> bool {
    standings
        .iter()
        .all(|(_, place)| *place == standings[0].1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shrink_respects_floor() {
        let rating = Rating { mu: 0., sig: 4. };
        let shrunk = rating.shrink_excess_variance(0.5, 1.);
        assert!(shrunk.sig < 4. && shrunk.sig > 1.);
        let floored = Rating { mu: 0., sig: 1. }.shrink_excess_variance(0.01, 1.);
        assert_eq!(floored.sig, 1.);
    }

    #[test]
    fn test_default_params_are_valid() {
        assert!(BeliefParams::default().validate().is_ok());
        let bad = BeliefParams {
            sig_min: 10.,
            ..BeliefParams::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_outcome_free() {
        let r = Rating { mu: 0., sig: 1. };
        assert!(outcome_free(&[(r, 0), (r, 0)]));
        assert!(!outcome_free(&[(r, 0), (r, 1)]));
    }
}
