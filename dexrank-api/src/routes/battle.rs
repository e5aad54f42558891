use super::{ApiError, lock_session};
use crate::domain::{Choice, ChoiceRequest};
use crate::startup::SharedSession;
use actix_web::{HttpResponse, web};

#[tracing::instrument(name = "Requesting the next battle", skip(session))]
pub async fn next_battle(session: SharedSession) -> Result<HttpResponse, ApiError> {
    let set = lock_session(&session)?.get_next_comparison_set()?;
    Ok(HttpResponse::Ok().json(set))
}

#[tracing::instrument(
    name = "Submitting a battle choice",
    skip(body, session),
    fields(ids = ?body.ids)
)]
pub async fn submit_choice(
    body: web::Json<ChoiceRequest>,
    session: SharedSession,
) -> Result<HttpResponse, ApiError> {
    let choice = Choice::parse(body.0.ids).map_err(ApiError::ValidationError)?;
    let outcome = lock_session(&session)?.submit_choice(choice.as_ref())?;
    Ok(match outcome {
        Some(result) => HttpResponse::Ok().json(result),
        // Duplicate or stale dispatches are acknowledged and dropped.
        None => HttpResponse::Accepted().finish(),
    })
}
