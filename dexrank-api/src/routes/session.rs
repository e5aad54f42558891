use super::{ApiError, lock_session};
use crate::domain::SessionState;
use crate::startup::SharedSession;
use actix_web::{HttpResponse, web};

#[tracing::instrument(name = "Resetting the session", skip(session))]
pub async fn reset_session(session: SharedSession) -> Result<HttpResponse, ApiError> {
    lock_session(&session)?.reset_session();
    Ok(HttpResponse::Ok().finish())
}

#[tracing::instrument(name = "Exporting the session state", skip(session))]
pub async fn export_state(session: SharedSession) -> Result<HttpResponse, ApiError> {
    let state = lock_session(&session)?.export_state();
    Ok(HttpResponse::Ok().json(state))
}

#[tracing::instrument(
    name = "Importing a session state",
    skip(body, session),
    fields(ratings = %body.ratings.len(), battle_counter = %body.battle_counter)
)]
pub async fn import_state(
    body: web::Json<SessionState>,
    session: SharedSession,
) -> Result<HttpResponse, ApiError> {
    let mut session = lock_session(&session)?;
    let catalog = session.catalog();
    let stranger = body
        .ratings
        .iter()
        .map(|r| r.item_id)
        .chain(body.refinement_queue.iter().map(|e| e.item_id))
        .find(|&id| !catalog.contains(id));
    if let Some(stranger) = stranger {
        return Err(ApiError::ValidationError(format!(
            "Item {} is not in the catalog",
            stranger
        )));
    }
    session.import_state(body.0);
    Ok(HttpResponse::Ok().finish())
}
