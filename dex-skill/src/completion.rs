use crate::comparison::{ComparisonResult, ComparisonSet, same_multiset};
use crate::data_processing::ItemId;
use crate::error::RankError;
use crate::systems::RatingStore;
use std::collections::HashSet;

/// The last accepted submission, kept to debounce repeated clicks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LastSubmission {
    pub at_ms: u64,
    pub chosen: Vec<ItemId>,
}

/// True if `chosen` repeats the previous submission within `window_ms`.
pub fn is_duplicate_submission(
    now_ms: u64,
    last: Option<&LastSubmission>,
    chosen: &[ItemId],
    window_ms: u64,
) -> bool {
    last.is_some_and(|last| {
        now_ms.saturating_sub(last.at_ms) < window_ms && same_multiset(&last.chosen, chosen)
    })
}

/// Turns rater picks into results, at most once per presented set.
#[derive(Debug)]
pub struct CompletionHandler {
    processing: bool,
    last_submission: Option<LastSubmission>,
    battle_counter: u64,
    history: Vec<ComparisonResult>,
    dedup_window_ms: u64,
}

impl CompletionHandler {
    pub fn new(dedup_window_ms: u64) -> Self {
        Self {
            processing: false,
            last_submission: None,
            battle_counter: 0,
            history: vec![],
            dedup_window_ms,
        }
    }

    pub fn battle_counter(&self) -> u64 {
        self.battle_counter
    }

    pub fn history(&self) -> &[ComparisonResult] {
        &self.history
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Called once the next set is presented; choices are accepted again from then on.
    pub fn finish_processing(&mut self) {
        self.processing = false;
    }

    /// Consumes a pick against the presented set. Returns `Ok(None)` without touching any
    /// state when the pick is a duplicate dispatch. Otherwise the result is folded into the
    /// store and the battle counter advances by exactly one.
    ///
    /// For pairs exactly one id must be chosen. For triplets the chosen ids tie for first,
    /// unless all three are given, in which case their order is a full ranking.
    pub fn on_user_choice(
        &mut self,
        chosen: &[ItemId],
        presented: &ComparisonSet,
        now_ms: u64,
        store: &mut RatingStore,
    ) -> Result<Option<ComparisonResult>, RankError> {
        if self.processing {
            tracing::debug!("Ignoring choice {:?} while processing the previous one", chosen);
            return Ok(None);
        }
        if is_duplicate_submission(
            now_ms,
            self.last_submission.as_ref(),
            chosen,
            self.dedup_window_ms,
        ) {
            tracing::debug!("Ignoring repeated choice {:?} inside the debounce window", chosen);
            return Ok(None);
        }
        let result = build_result(chosen, presented, now_ms)?;

        self.processing = true;
        self.last_submission = Some(LastSubmission {
            at_ms: now_ms,
            chosen: chosen.to_vec(),
        });
        store.update_from_result(&result);
        self.battle_counter += 1;
        self.history.push(result.clone());
        Ok(Some(result))
    }

    /// Restores the counter from a snapshot. Individual results are not persisted.
    pub fn restore(&mut self, battle_counter: u64) {
        self.reset();
        self.battle_counter = battle_counter;
    }

    pub fn reset(&mut self) {
        self.processing = false;
        self.last_submission = None;
        self.battle_counter = 0;
        self.history.clear();
    }
}

fn build_result(
    chosen: &[ItemId],
    presented: &ComparisonSet,
    now_ms: u64,
) -> Result<ComparisonResult, RankError> {
    let distinct: HashSet<ItemId> = chosen.iter().copied().collect();
    if chosen.is_empty() {
        return Err(RankError::InvalidChoice("nothing was chosen".into()));
    }
    if distinct.len() != chosen.len() {
        return Err(RankError::InvalidChoice(format!(
            "{:?} contains duplicates",
            chosen
        )));
    }
    if let Some(stranger) = chosen.iter().find(|&&id| !presented.contains(id)) {
        return Err(RankError::InvalidChoice(format!(
            "{} was not presented in {:?}",
            stranger, presented.ids
        )));
    }
    let arity = presented.ids.len();
    if arity == 2 && chosen.len() != 1 {
        return Err(RankError::InvalidChoice(
            "a pair needs exactly one winner".into(),
        ));
    }

    Ok(if chosen.len() == arity {
        ComparisonResult::from_ranking(chosen, now_ms)
    } else {
        ComparisonResult::from_choice(&presented.ids, chosen, now_ms)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::{BeliefParams, GaussianDuel};
    use claims::{assert_err, assert_none, assert_ok, assert_some};

    fn store() -> RatingStore {
        RatingStore::new(BeliefParams::default(), Box::new(GaussianDuel::new()))
    }

    #[test]
    fn test_debounce_guard() {
        let last = LastSubmission {
            at_ms: 1_000,
            chosen: vec![6],
        };
        assert!(is_duplicate_submission(1_299, Some(&last), &[6], 300));
        assert!(!is_duplicate_submission(1_300, Some(&last), &[6], 300));
        assert!(!is_duplicate_submission(1_100, Some(&last), &[9], 300));
        assert!(!is_duplicate_submission(1_100, None, &[6], 300));
    }

    #[test]
    fn test_double_click_yields_one_result() {
        let mut store = store();
        let mut handler = CompletionHandler::new(300);
        let set = ComparisonSet::new(vec![1, 2], 2, 0);
        assert_some!(assert_ok!(handler.on_user_choice(&[1], &set, 10, &mut store)));
        assert_none!(assert_ok!(handler.on_user_choice(&[1], &set, 50, &mut store)));
        assert_eq!(handler.battle_counter(), 1);
        assert_eq!(handler.history().len(), 1);
        assert_eq!(store.battle_count(1), 1);
    }

    #[test]
    fn test_same_choice_within_window_on_next_set_is_ignored() {
        let mut store = store();
        let mut handler = CompletionHandler::new(300);
        let first = ComparisonSet::new(vec![1, 2], 2, 0);
        let second = ComparisonSet::new(vec![1, 3], 2, 0);
        assert_some!(assert_ok!(handler.on_user_choice(&[1], &first, 10, &mut store)));
        handler.finish_processing();
        assert_none!(assert_ok!(handler.on_user_choice(&[1], &second, 200, &mut store)));
        assert_some!(assert_ok!(handler.on_user_choice(&[1], &second, 310, &mut store)));
        assert_eq!(handler.battle_counter(), 2);
    }

    #[test]
    fn test_invalid_choices_are_rejected_without_side_effects() {
        let mut store = store();
        let mut handler = CompletionHandler::new(300);
        let pair = ComparisonSet::new(vec![1, 2], 2, 0);
        assert_err!(handler.on_user_choice(&[], &pair, 0, &mut store));
        assert_err!(handler.on_user_choice(&[3], &pair, 0, &mut store));
        assert_err!(handler.on_user_choice(&[1, 2], &pair, 0, &mut store));
        assert_err!(handler.on_user_choice(&[1, 1], &pair, 0, &mut store));
        assert_eq!(handler.battle_counter(), 0);
        assert!(store.get_all_ratings().is_empty());
        assert!(!handler.is_processing());
    }

    #[test]
    fn test_triplet_choices() {
        let mut store = store();
        let mut handler = CompletionHandler::new(300);
        let triplet = ComparisonSet::new(vec![4, 5, 6], 3, 0);
        let single = assert_some!(assert_ok!(handler.on_user_choice(&[5], &triplet, 0, &mut store)));
        assert_eq!(single.induced_pairs().len(), 2);
        handler.finish_processing();
        let ranked =
            assert_some!(assert_ok!(handler.on_user_choice(&[6, 4, 5], &triplet, 1_000, &mut store)));
        assert_eq!(ranked.induced_pairs().len(), 3);
        assert_eq!(ranked.winner_id(), Some(6));
        assert_eq!(store.battle_count(4), 2);
    }
}
