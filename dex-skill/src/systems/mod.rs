mod common;
mod gaussian_duel;
mod glicko;
mod store;

pub use common::{BeliefParams, ItemRating, Rating, RatingSystem, outcome_free};
pub use gaussian_duel::GaussianDuel;
pub use glicko::Glicko;
pub use store::{RatingStore, RatingsById};

pub fn get_rating_system_by_name(
    system_name: &str,
) -> Result<Box<dyn RatingSystem + Send + Sync>, String> {
    match system_name {
        "gaussian" | "trueskill" => Ok(Box::new(GaussianDuel::default())),
        "glicko" => Ok(Box::new(Glicko)),
        name => Err(format!(
            "{} is not a valid rating system. Must be one of: gaussian, trueskill, glicko",
            name
        )),
    }
}
