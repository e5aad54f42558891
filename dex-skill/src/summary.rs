use crate::data_processing::{Catalog, ItemId, try_write_slice_to_file};
use crate::systems::RatingStore;
use serde::{Deserialize, Serialize};

/// One displayable leaderboard row. Recomputed on demand, never stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedItem {
    pub rank: usize,
    pub id: ItemId,
    pub name: String,
    pub score: f64,
    /// 0 for a fresh prior, approaching 100 as uncertainty vanishes.
    pub confidence: f64,
    pub battle_count: u32,
}

pub fn confidence(sig: f64, sig_max: f64) -> f64 {
    (100. * (1. - sig / sig_max)).clamp(0., 100.)
}

/// Projects the store onto the catalog, best first. Never creates store entries:
/// unrated items show their prior.
pub fn make_leaderboard(catalog: &Catalog, store: &RatingStore) -> Vec<RankedItem> {
    let params = store.params();
    let mut leaderboard: Vec<RankedItem> = catalog
        .items()
        .iter()
        .map(|item| {
            let entry = store.peek_rating(item.id);
            RankedItem {
                rank: 0,
                id: item.id,
                name: item.name.clone(),
                score: entry.conservative_score(params),
                confidence: confidence(entry.rating.sig, params.sig_noob),
                battle_count: entry.battle_count,
            }
        })
        .collect();
    sort_leaderboard(&mut leaderboard);
    leaderboard
}

/// Orders by descending score, ties by ascending id, and renumbers ranks from 1.
pub fn sort_leaderboard(leaderboard: &mut [RankedItem]) {
    leaderboard.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.id.cmp(&b.id)));
    for (i, item) in leaderboard.iter_mut().enumerate() {
        item.rank = i + 1;
    }
}

pub fn write_leaderboard(leaderboard: &[RankedItem], path: impl AsRef<std::path::Path>) -> bool {
    if let Some(top) = leaderboard.first() {
        tracing::info!(
            "#1 of {}: {} with score {:.2}",
            leaderboard.len(),
            top.name,
            top.score
        );
    }
    try_write_slice_to_file(leaderboard, path)
}
