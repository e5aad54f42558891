use dex_skill::ItemId;
use std::collections::HashSet;

/// The largest set a battle can present.
const MAX_CHOSEN: usize = 3;

/// Body of `POST /battle/choice`.
#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct ChoiceRequest {
    pub ids: Vec<ItemId>,
}

/// A well-formed pick: between one and three distinct ids. Whether the ids were
/// actually presented is for the session to decide.
#[derive(Debug)]
pub struct Choice(Vec<ItemId>);

impl Choice {
    pub fn parse(ids: Vec<ItemId>) -> Result<Self, String> {
        let distinct: HashSet<ItemId> = ids.iter().copied().collect();
        if ids.is_empty() {
            Err("A choice needs at least one id.".into())
        } else if ids.len() > MAX_CHOSEN {
            Err(format!("A choice of {} ids is larger than any battle.", ids.len()))
        } else if distinct.len() != ids.len() {
            Err(format!("Choice {:?} repeats an id.", ids))
        } else {
            Ok(Self(ids))
        }
    }
}

impl AsRef<[ItemId]> for Choice {
    fn as_ref(&self) -> &[ItemId] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::Choice;
    use claims::{assert_err, assert_ok};
    use quickcheck_macros::quickcheck;

    #[test]
    fn empty_choice_is_rejected() {
        assert_err!(Choice::parse(vec![]));
    }

    #[test]
    fn four_ids_are_rejected() {
        assert_err!(Choice::parse(vec![1, 2, 3, 4]));
    }

    #[test]
    fn repeated_ids_are_rejected() {
        assert_err!(Choice::parse(vec![7, 7]));
    }

    #[test]
    fn a_single_winner_is_parsed_successfully() {
        let choice = assert_ok!(Choice::parse(vec![25]));
        assert_eq!(choice.as_ref(), &[25]);
    }

    #[quickcheck]
    fn small_distinct_choices_are_valid(first: u32, len: u8) -> bool {
        let len = 1 + len as u32 % 3;
        let ids = (0..len).map(|i| first.wrapping_add(i)).collect();
        Choice::parse(ids).is_ok()
    }
}
