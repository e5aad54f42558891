use super::{ApiError, lock_session};
use crate::startup::SharedSession;
use actix_web::HttpResponse;

#[tracing::instrument(name = "Requesting the milestone state", skip(session))]
pub async fn milestone_state(session: SharedSession) -> Result<HttpResponse, ApiError> {
    let state = lock_session(&session)?.get_milestone_state();
    Ok(HttpResponse::Ok().json(state))
}

/// Starts the grace delay; battles resume once it has passed.
#[tracing::instrument(name = "Dismissing the milestone", skip(session))]
pub async fn dismiss_milestone(session: SharedSession) -> Result<HttpResponse, ApiError> {
    let mut session = lock_session(&session)?;
    session.dismiss_milestone();
    Ok(HttpResponse::Ok().json(session.get_milestone_state()))
}
