pub mod clock;
pub mod comparison;
pub mod completion;
pub mod data_processing;
pub mod error;
pub mod events;
pub mod metrics;
pub mod milestone;
pub mod numerical;
pub mod refinement;
pub mod reorder;
pub mod scheduler;
pub mod session;
pub mod session_config;
pub mod summary;
pub mod systems;
pub mod validator;

pub use clock::{Clock, ManualClock, SystemClock};
pub use comparison::{BattleType, ComparisonResult, ComparisonSet};
pub use data_processing::{Catalog, CatalogItem, ItemId};
pub use error::RankError;
pub use events::SessionEvent;
pub use milestone::MilestoneState;
pub use session::{Session, SessionState};
pub use session_config::SessionConfig;
pub use summary::RankedItem;
