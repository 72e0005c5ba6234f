use actix_web::{HttpResponse, Responder, delete, get, post, web};

use crate::dto::ApiResponse;
use crate::repository::DieselRepository;
use crate::routes::{ok, service_error};
use crate::services::saved as service;

#[get("/users/{user_id}/saved")]
pub async fn list_saved(
    user_id: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match service::list_saved(&user_id, repo.get_ref()) {
        Ok(businesses) => ok(businesses),
        Err(err) => service_error(err, "User"),
    }
}

#[post("/users/{user_id}/saved/{business_id}")]
pub async fn save_business(
    path: web::Path<(String, String)>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let (user_id, business_id) = path.into_inner();
    match service::save_business(&user_id, &business_id, repo.get_ref()) {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::done("Business saved")),
        Err(err) => service_error(err, "User or business"),
    }
}

#[delete("/users/{user_id}/saved/{business_id}")]
pub async fn unsave_business(
    path: web::Path<(String, String)>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let (user_id, business_id) = path.into_inner();
    match service::unsave_business(&user_id, &business_id, repo.get_ref()) {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::done("Business removed from saved")),
        Err(err) => service_error(err, "Saved business"),
    }
}
