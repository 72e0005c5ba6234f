use actix_web::{HttpResponse, Responder, delete, get, post, web};

use crate::dto::ApiResponse;
use crate::forms::reviews::{
    CreateReviewForm, CreateReviewPayload, ReviewResponseForm, ReviewResponsePayload,
};
use crate::repository::DieselRepository;
use crate::routes::{created, invalid_form, ok, service_error};
use crate::services::reviews as service;

#[get("/businesses/{id}/reviews")]
pub async fn list_reviews(
    business_id: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match service::list_reviews(&business_id, repo.get_ref()) {
        Ok(reviews) => ok(reviews),
        Err(err) => service_error(err, "Business"),
    }
}

#[post("/businesses/{id}/reviews")]
pub async fn create_review(
    business_id: web::Path<String>,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CreateReviewForm>,
) -> impl Responder {
    let payload: CreateReviewPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return invalid_form(e),
    };

    match service::create_review(&business_id, payload, repo.get_ref()) {
        Ok(review) => created(review, "Review submitted successfully"),
        Err(err) => service_error(err, "Business"),
    }
}

#[delete("/reviews/{id}")]
pub async fn delete_review(
    id: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match service::delete_review(&id, repo.get_ref()) {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::done("Review deleted successfully")),
        Err(err) => service_error(err, "Review"),
    }
}

#[post("/reviews/{id}/helpful")]
pub async fn mark_review_helpful(
    id: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match service::mark_review_helpful(&id, repo.get_ref()) {
        Ok(review) => ok(review),
        Err(err) => service_error(err, "Review"),
    }
}

#[post("/reviews/{id}/response")]
pub async fn respond_to_review(
    id: web::Path<String>,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ReviewResponseForm>,
) -> impl Responder {
    let payload: ReviewResponsePayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return invalid_form(e),
    };

    match service::respond_to_review(&id, payload, repo.get_ref()) {
        Ok(review) => ok(review),
        Err(err) => service_error(err, "Review"),
    }
}
