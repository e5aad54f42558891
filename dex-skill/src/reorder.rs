use crate::comparison::ComparisonResult;
use crate::data_processing::ItemId;
use crate::error::RankError;
use crate::refinement::{RefinementQueue, RefinementReason};
use crate::summary::RankedItem;
use crate::systems::RatingStore;

/// What a manual move did to the session.
#[derive(Clone, Debug, PartialEq)]
pub struct ReorderOutcome {
    pub item_id: ItemId,
    pub implied: Vec<ComparisonResult>,
    pub pinned_score: Option<f64>,
    /// Whether the refinement queue gained the item or a larger requirement for it.
    pub queue_changed: bool,
}

/// Translates leaderboard drags into implied battles plus a direct score.
#[derive(Clone, Copy, Debug)]
pub struct ReorderTranslator {
    pub boost: f64,
    pub refinement_battles: u32,
}

/// One result per boundary crossed: the moved item beats everything it jumped over
/// upwards, and loses to everything it sank below.
pub fn implied_results(
    item_id: ItemId,
    from: usize,
    to: usize,
    current_order: &[RankedItem],
    now_ms: u64,
) -> Vec<ComparisonResult> {
    let duel = |winner, loser| ComparisonResult::duel(winner, loser, now_ms).implied();
    if to < from {
        current_order[to..from]
            .iter()
            .map(|other| duel(item_id, other.id))
            .collect()
    } else {
        current_order[from + 1..=to]
            .iter()
            .map(|other| duel(other.id, item_id))
            .collect()
    }
}

/// Score for an item inserted at `to` among `others`, which are sorted best first and
/// exclude the moved item.
pub fn interpolate_score(to: usize, others: &[f64], boost: f64) -> Option<f64> {
    let (first, last) = (others.first()?, others.last()?);
    Some(if to == 0 {
        first + boost
    } else if to >= others.len() {
        last - boost
    } else {
        0.5 * (others[to - 1] + others[to])
    })
}

impl ReorderTranslator {
    pub fn on_manual_move(
        &self,
        item_id: ItemId,
        from: usize,
        to: usize,
        current_order: &[RankedItem],
        store: &mut RatingStore,
        queue: &mut RefinementQueue,
        now_ms: u64,
    ) -> Result<ReorderOutcome, RankError> {
        let len = current_order.len();
        let invalid = RankError::InvalidMove {
            item_id,
            from,
            to,
            len,
        };
        if from >= len || to >= len || current_order[from].id != item_id {
            return Err(invalid);
        }
        if from == to {
            return Ok(ReorderOutcome {
                item_id,
                implied: vec![],
                pinned_score: None,
                queue_changed: false,
            });
        }

        let implied = implied_results(item_id, from, to, current_order, now_ms);
        for result in &implied {
            store.update_from_result(result);
        }

        // Neighbours are taken from the post-update order of everyone else, so the pinned
        // score lands the item at `to` in the next projection.
        let mut others: Vec<(f64, ItemId)> = current_order
            .iter()
            .filter(|item| item.id != item_id)
            .map(|item| (store.conservative_score(item.id), item.id))
            .collect();
        others.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
        let scores: Vec<f64> = others.iter().map(|&(score, _)| score).collect();

        let pinned_score = interpolate_score(to, &scores, self.boost);
        if let Some(score) = pinned_score {
            store.pin_score(item_id, score);
        }
        let queue_changed =
            queue.enqueue(item_id, self.refinement_battles, RefinementReason::ManualReorder);
        tracing::debug!(
            "Moved item {} from {} to {} with {} implied results, pinned at {:?}",
            item_id,
            from,
            to,
            implied.len(),
            pinned_score
        );

        Ok(ReorderOutcome {
            item_id,
            implied,
            pinned_score,
            queue_changed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_processing::Catalog;
    use crate::summary::make_leaderboard;
    use crate::systems::{BeliefParams, GaussianDuel};
    use claims::{assert_err, assert_ok, assert_some};

    fn translator() -> ReorderTranslator {
        ReorderTranslator {
            boost: 100.,
            refinement_battles: 3,
        }
    }

    // A 10-item store whose scores strictly decrease with the id.
    fn spread_store(catalog: &Catalog) -> RatingStore {
        let mut store = RatingStore::new(BeliefParams::default(), Box::new(GaussianDuel::new()));
        for &id in catalog.ids() {
            store.pin_score(id, 100. - 10. * id as f64);
        }
        store
    }

    fn position(view: &[RankedItem], id: ItemId) -> Option<usize> {
        view.iter().position(|item| item.id == id)
    }

    #[test]
    fn test_interpolation_rules() {
        let others = [30., 20., 10.];
        assert_eq!(interpolate_score(0, &others, 100.), Some(130.));
        assert_eq!(interpolate_score(3, &others, 100.), Some(-90.));
        assert_eq!(interpolate_score(1, &others, 100.), Some(25.));
        assert_eq!(interpolate_score(0, &[], 100.), None);
    }

    #[test]
    fn test_move_up_to_first_creates_one_win_per_item_passed() {
        let catalog = Catalog::numbered(10);
        let mut store = spread_store(&catalog);
        let mut queue = RefinementQueue::new();
        let view = make_leaderboard(&catalog, &store);
        assert_eq!(view[4].id, 5);

        let outcome = assert_ok!(translator().on_manual_move(
            5, 4, 0, &view, &mut store, &mut queue, 0
        ));
        assert_eq!(outcome.implied.len(), 4);
        for (result, loser) in outcome.implied.iter().zip(1..=4) {
            assert_eq!(result.winner_id(), Some(5));
            assert!(result.implied);
            assert!(result.set_ids.contains(&loser));
        }
        let new_view = make_leaderboard(&catalog, &store);
        assert_eq!(position(&new_view, 5), Some(0));
        let pinned = assert_some!(outcome.pinned_score);
        assert!((pinned - (new_view[1].score + 100.)).abs() < 1e-9);
        assert_eq!(store.battle_count(5), 4);
        assert_eq!(queue.get(5).map(|e| e.reason), Some(RefinementReason::ManualReorder));
        assert!(outcome.queue_changed);
    }

    #[test]
    fn test_move_down_into_the_middle() {
        let catalog = Catalog::numbered(10);
        let mut store = spread_store(&catalog);
        let mut queue = RefinementQueue::new();
        let view = make_leaderboard(&catalog, &store);

        let outcome = assert_ok!(translator().on_manual_move(
            2, 1, 6, &view, &mut store, &mut queue, 0
        ));
        assert_eq!(outcome.implied.len(), 5);
        assert!(outcome.implied.iter().all(|r| r.winner_id() != Some(2)));

        let new_view = make_leaderboard(&catalog, &store);
        assert_eq!(position(&new_view, 2), Some(6));
        let score = new_view[6].score;
        assert!(new_view[5].score > score && score > new_view[7].score);
    }

    #[test]
    fn test_move_to_last() {
        let catalog = Catalog::numbered(5);
        let mut store = spread_store(&catalog);
        let mut queue = RefinementQueue::new();
        let view = make_leaderboard(&catalog, &store);

        assert_ok!(translator().on_manual_move(1, 0, 4, &view, &mut store, &mut queue, 0));
        let new_view = make_leaderboard(&catalog, &store);
        assert_eq!(position(&new_view, 1), Some(4));
        assert!((new_view[3].score - 100. - new_view[4].score).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_moves() {
        let catalog = Catalog::numbered(3);
        let mut store = spread_store(&catalog);
        let mut queue = RefinementQueue::new();
        let view = make_leaderboard(&catalog, &store);
        let t = translator();
        assert_err!(t.on_manual_move(1, 0, 3, &view, &mut store, &mut queue, 0));
        assert_err!(t.on_manual_move(2, 0, 1, &view, &mut store, &mut queue, 0));
        let noop = assert_ok!(t.on_manual_move(1, 0, 0, &view, &mut store, &mut queue, 0));
        assert!(noop.implied.is_empty());
        assert!(!noop.queue_changed);
        assert!(queue.is_empty());
    }
}
