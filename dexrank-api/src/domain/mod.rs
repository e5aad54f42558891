mod choice;

pub use choice::{Choice, ChoiceRequest};
pub use dex_skill::milestone::MilestoneState;
pub use dex_skill::{ComparisonResult, ComparisonSet, RankedItem, SessionState};
