//! Two-player TrueSkill factor update, applied to every ordered pair of a result.
//! Details: https://www.microsoft.com/en-us/research/publication/trueskilltm-a-bayesian-skill-rating-system/

use super::{BeliefParams, Rating, RatingSystem, outcome_free};
use crate::numerical::win_truncation_factors;

#[derive(Debug)]
pub struct GaussianDuel {
    // scales beta; 1 gives the textbook model
    pub perf_scale: f64,
}

impl Default for GaussianDuel {
    fn default() -> Self {
        Self { perf_scale: 1. }
    }
}

impl GaussianDuel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RatingSystem for GaussianDuel {
    fn round_update(&self, params: &BeliefParams, standings: &[(Rating, usize)]) -> Vec<Rating> {
        let old: Vec<Rating> = standings.iter().map(|&(rating, _)| rating).collect();
        if outcome_free(standings) {
            return old;
        }
        let beta = params.beta * self.perf_scale;

        // Every induced pair is evaluated against the pre-update snapshot.
        let mut mu_delta = vec![0.; old.len()];
        let mut var_factor = vec![1.; old.len()];
        for (i, &(winner, w_place)) in standings.iter().enumerate() {
            for (j, &(loser, l_place)) in standings.iter().enumerate() {
                if w_place >= l_place {
                    continue;
                }
                let w_var = winner.sig * winner.sig;
                let l_var = loser.sig * loser.sig;
                let c_sq = 2. * beta * beta + w_var + l_var;
                let c = c_sq.sqrt();
                let (v, w) = win_truncation_factors((winner.mu - loser.mu) / c);

                mu_delta[i] += w_var / c * v;
                mu_delta[j] -= l_var / c * v;
                var_factor[i] *= 1. - w_var / c_sq * w;
                var_factor[j] *= 1. - l_var / c_sq * w;
            }
        }

        old.iter()
            .zip(mu_delta)
            .zip(var_factor)
            .map(|((rating, delta), factor)| {
                Rating {
                    mu: rating.mu + delta,
                    sig: rating.sig,
                }
                .shrink_excess_variance(factor, params.sig_min)
            })
            .collect()
    }
}
