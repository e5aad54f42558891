//! Glicko system details: https://en.wikipedia.org/wiki/Glicko_rating_system

use super::{BeliefParams, Rating, RatingSystem, outcome_free};
use crate::numerical::{TANH_MULTIPLIER, standard_logistic_cdf};

#[derive(Debug, Default)]
pub struct Glicko;

impl Glicko {
    fn win_probability(&self, sig_perf: f64, player: &Rating, foe: &Rating) -> f64 {
        let z = (player.mu - foe.mu) / foe.sig.hypot(sig_perf);
        standard_logistic_cdf(z)
    }
}

impl RatingSystem for Glicko {
    fn round_update(&self, params: &BeliefParams, standings: &[(Rating, usize)]) -> Vec<Rating> {
        if outcome_free(standings) {
            return standings.iter().map(|&(rating, _)| rating).collect();
        }
        let sig_perf = params.beta;
        let gli_q = TANH_MULTIPLIER / sig_perf;

        standings
            .iter()
            .map(|&(my_rating, my_place)| {
                let mut info = 0.;
                let mut update = 0.;
                for &(rating, place) in standings {
                    let outcome = match my_place.cmp(&place) {
                        std::cmp::Ordering::Less => 1.,
                        std::cmp::Ordering::Greater => 0.,
                        // Unordered against itself and co-placed items
                        std::cmp::Ordering::Equal => continue,
                    };
                    let g = 1f64.hypot(rating.sig / sig_perf).recip();
                    let probability = self.win_probability(sig_perf, &my_rating, &rating);
                    info += g * g * probability * (1. - probability);
                    update += g * (outcome - probability);
                }
                if info == 0. {
                    return my_rating;
                }

                // Compute new rating deviation
                info *= gli_q * gli_q;
                let var = my_rating.sig * my_rating.sig;
                let posterior_var = (var.recip() + info).recip();

                // Compute new rating
                let mu = my_rating.mu + update * gli_q * posterior_var;
                Rating {
                    mu,
                    sig: my_rating.sig,
                }
                .shrink_excess_variance(posterior_var / var, params.sig_min)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upset_moves_more_than_expected_win() {
        let params = BeliefParams::default();
        let strong = Rating { mu: 35., sig: 3. };
        let weak = Rating { mu: 15., sig: 3. };

        let expected = Glicko.round_update(&params, &[(strong, 0), (weak, 1)]);
        let upset = Glicko.round_update(&params, &[(strong, 1), (weak, 0)]);

        let expected_gain = expected[0].mu - strong.mu;
        let upset_gain = upset[1].mu - weak.mu;
        assert!(expected_gain > 0.);
        assert!(upset_gain > expected_gain);
        assert!(upset[0].mu < strong.mu);
    }

    #[test]
    fn test_sigma_shrinks_toward_floor() {
        let params = BeliefParams::default();
        let mut a = params.newbie();
        let mut b = params.newbie();
        for round in 0..300 {
            let places = if round % 2 == 0 { (0, 1) } else { (1, 0) };
            let new = Glicko.round_update(&params, &[(a, places.0), (b, places.1)]);
            a = new[0];
            b = new[1];
        }
        assert!(a.sig >= params.sig_min && a.sig < params.sig_noob);
        assert!(b.sig >= params.sig_min && b.sig < params.sig_noob);
    }
}
