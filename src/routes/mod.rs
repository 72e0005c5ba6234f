//! HTTP handlers. Every response uses the [`ApiResponse`] envelope.

use actix_web::error::InternalError;
use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::dto::ApiResponse;
use crate::services::ServiceError;

pub mod analytics;
pub mod blog;
pub mod businesses;
pub mod categories;
pub mod content;
pub mod health;
pub mod reviews;
pub mod saved;

/// Registers every route of the service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| {
        let response = HttpResponse::BadRequest().json(ApiResponse::error(err.to_string()));
        InternalError::from_response(err, response).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _| {
        let response = HttpResponse::BadRequest().json(ApiResponse::error(err.to_string()));
        InternalError::from_response(err, response).into()
    }))
    .service(health::health)
    .service(
        web::scope("/api")
            .service(businesses::search_businesses)
            .service(businesses::create_business)
            .service(businesses::get_business_by_slug)
            .service(businesses::get_business)
            .service(businesses::update_business)
            .service(businesses::delete_business)
            .service(businesses::claim_business)
            .service(reviews::list_reviews)
            .service(reviews::create_review)
            .service(reviews::delete_review)
            .service(reviews::mark_review_helpful)
            .service(reviews::respond_to_review)
            .service(categories::list_categories)
            .service(categories::create_category)
            .service(categories::get_category)
            .service(categories::set_category_parent)
            .service(blog::list_blog_posts)
            .service(blog::create_blog_post)
            .service(blog::get_blog_post)
            .service(saved::list_saved)
            .service(saved::save_business)
            .service(saved::unsave_business)
            .service(analytics::track_event)
            .service(analytics::analytics_summary)
            .service(content::categories)
            .service(content::businesses)
            .service(content::search)
            .service(content::submit_business),
    );
}

pub(crate) fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(data))
}

pub(crate) fn created<T: Serialize>(data: T, message: &str) -> HttpResponse {
    HttpResponse::Created().json(ApiResponse::ok(data).with_message(message))
}

/// Translates a service failure into its status code and envelope.
///
/// `entity` names the missing thing in 404 messages, e.g. `"Business"`.
pub(crate) fn service_error(error: ServiceError, entity: &str) -> HttpResponse {
    match error {
        ServiceError::NotFound => {
            HttpResponse::NotFound().json(ApiResponse::error(format!("{entity} not found")))
        }
        ServiceError::Form(message) => HttpResponse::BadRequest().json(ApiResponse::error(message)),
        ServiceError::Conflict(message) => {
            HttpResponse::Conflict().json(ApiResponse::error(format!("Already exists: {message}")))
        }
        ServiceError::Internal => {
            HttpResponse::InternalServerError().json(ApiResponse::error("Internal server error"))
        }
    }
}

/// Response for a form that could not be turned into a payload.
pub(crate) fn invalid_form(error: impl Into<ServiceError>) -> HttpResponse {
    service_error(error.into(), "Resource")
}
