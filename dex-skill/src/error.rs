use crate::data_processing::ItemId;

/// Every failure the core can report. None of them invalidate the in-memory session.
#[derive(Debug, thiserror::Error)]
pub enum RankError {
    #[error("only {eligible} eligible items, but a battle needs {arity}")]
    InsufficientCandidates { eligible: usize, arity: usize },
    #[error("the scheduler is blocked at a milestone")]
    SchedulerBlocked,
    #[error("invalid choice: {0}")]
    InvalidChoice(String),
    #[error("item {0} is not in the catalog")]
    UnknownItemReference(ItemId),
    #[error("cannot move item {item_id} from {from} to {to} in a view of {len} items")]
    InvalidMove {
        item_id: ItemId,
        from: usize,
        to: usize,
        len: usize,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl From<std::io::Error> for RankError {
    fn from(e: std::io::Error) -> Self {
        Self::Persistence(e.to_string())
    }
}

impl From<serde_json::Error> for RankError {
    fn from(e: serde_json::Error) -> Self {
        Self::Persistence(e.to_string())
    }
}

impl From<csv::Error> for RankError {
    fn from(e: csv::Error) -> Self {
        Self::Persistence(e.to_string())
    }
}
