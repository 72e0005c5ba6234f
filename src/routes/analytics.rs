use actix_web::{HttpResponse, Responder, get, post, web};

use crate::dto::ApiResponse;
use crate::forms::analytics::{TrackEventForm, TrackEventPayload};
use crate::repository::DieselRepository;
use crate::routes::{invalid_form, ok, service_error};
use crate::services::analytics as service;

/// Client-reported events. Storage failures are logged, not returned.
#[post("/analytics/events")]
pub async fn track_event(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<TrackEventForm>,
) -> impl Responder {
    let payload: TrackEventPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return invalid_form(e),
    };

    match service::record_event(payload, repo.get_ref()) {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::done("Event recorded")),
        Err(err) => service_error(err, "Entity"),
    }
}

#[get("/analytics/{entity_type}/{entity_id}")]
pub async fn analytics_summary(
    path: web::Path<(String, String)>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let (entity_type, entity_id) = path.into_inner();
    match service::analytics_summary(&entity_type, &entity_id, repo.get_ref()) {
        Ok(summary) => ok(summary),
        Err(err) => service_error(err, "Entity"),
    }
}
