use actix_web::{HttpResponse, Responder, delete, get, patch, post, web};

use crate::domain::query::SearchRequest;
use crate::dto::ApiResponse;
use crate::forms::businesses::{
    ClaimBusinessForm, ClaimBusinessPayload, CreateBusinessForm, CreateBusinessPayload,
    SearchBusinessesQuery, UpdateBusinessForm, UpdateBusinessPayload,
};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{created, invalid_form, ok, service_error};
use crate::services::businesses as service;

#[get("/businesses")]
pub async fn search_businesses(
    query: web::Query<SearchBusinessesQuery>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    let request: SearchRequest = match query.into_inner().try_into() {
        Ok(request) => request,
        Err(e) => return invalid_form(e),
    };

    match service::search_businesses(&request, config.default_page_size, repo.get_ref()) {
        Ok(page) => HttpResponse::Ok().json(ApiResponse::page(page)),
        Err(err) => service_error(err, "Business"),
    }
}

#[get("/businesses/slug/{slug}")]
pub async fn get_business_by_slug(
    slug: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match service::get_business_by_slug(&slug, repo.get_ref()) {
        Ok(business) => ok(business),
        Err(err) => service_error(err, "Business"),
    }
}

#[get("/businesses/{id}")]
pub async fn get_business(
    id: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match service::get_business(&id, repo.get_ref()) {
        Ok(business) => ok(business),
        Err(err) => service_error(err, "Business"),
    }
}

#[post("/businesses")]
pub async fn create_business(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CreateBusinessForm>,
) -> impl Responder {
    let payload: CreateBusinessPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return invalid_form(e),
    };

    match service::create_business(payload, repo.get_ref()) {
        Ok(business) => created(business, "Business created successfully"),
        Err(err) => service_error(err, "Business"),
    }
}

#[patch("/businesses/{id}")]
pub async fn update_business(
    id: web::Path<String>,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateBusinessForm>,
) -> impl Responder {
    let payload: UpdateBusinessPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return invalid_form(e),
    };

    match service::update_business(&id, payload, repo.get_ref()) {
        Ok(business) => ok(business),
        Err(err) => service_error(err, "Business"),
    }
}

#[delete("/businesses/{id}")]
pub async fn delete_business(
    id: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match service::soft_delete_business(&id, repo.get_ref()) {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::done("Business deleted successfully")),
        Err(err) => service_error(err, "Business"),
    }
}

#[post("/businesses/{id}/claim")]
pub async fn claim_business(
    id: web::Path<String>,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ClaimBusinessForm>,
) -> impl Responder {
    let payload: ClaimBusinessPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return invalid_form(e),
    };

    match service::claim_business(&id, payload, repo.get_ref()) {
        Ok(business) => ok(business),
        Err(err) => service_error(err, "Business"),
    }
}
