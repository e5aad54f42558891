use super::{ApiError, lock_session};
use crate::startup::SharedSession;
use actix_web::{HttpResponse, web};
use dex_skill::ItemId;

#[tracing::instrument(name = "Requesting the ranked view", skip(session))]
pub async fn ranking(session: SharedSession) -> Result<HttpResponse, ApiError> {
    let view = lock_session(&session)?.get_ranked_view();
    Ok(HttpResponse::Ok().json(view))
}

#[derive(serde::Deserialize)]
pub struct MoveForm {
    item_id: ItemId,
    from: usize,
    to: usize,
}

#[tracing::instrument(
    name = "Moving an item in the ranking",
    skip(form, session),
    fields(item_id = %form.item_id, from = %form.from, to = %form.to)
)]
pub async fn move_item(
    form: web::Form<MoveForm>,
    session: SharedSession,
) -> Result<HttpResponse, ApiError> {
    let mut session = lock_session(&session)?;
    session.move_item(form.item_id, form.from, form.to)?;
    Ok(HttpResponse::Ok().json(session.get_ranked_view()))
}
