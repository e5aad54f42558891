mod battle;
mod health_check;
mod milestone;
mod ranking;
mod session;

pub use battle::{next_battle, submit_choice};
pub use health_check::health_check;
pub use milestone::{dismiss_milestone, milestone_state};
pub use ranking::{move_item, ranking};
pub use session::{export_state, import_state, reset_session};

use crate::startup::SharedSession;
use actix_web::ResponseError;
use actix_web::http::StatusCode;
use dex_skill::{RankError, Session};
use std::sync::MutexGuard;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    Rejected(RankError),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl From<RankError> for ApiError {
    fn from(e: RankError) -> Self {
        match e {
            RankError::Persistence(_) => Self::UnexpectedError(e.into()),
            e => Self::Rejected(e),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::Rejected(e) => match e {
                RankError::SchedulerBlocked => StatusCode::CONFLICT,
                RankError::InsufficientCandidates { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                RankError::UnknownItemReference(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_REQUEST,
            },
            Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn lock_session(session: &SharedSession) -> Result<MutexGuard<'_, Session>, ApiError> {
    session
        .lock()
        .map_err(|_| ApiError::UnexpectedError(anyhow::anyhow!("The session lock was poisoned")))
}
