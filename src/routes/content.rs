//! Remote-or-fallback endpoints. These answer 200 whichever source served
//! the data; only malformed input is rejected.

use actix_web::{HttpResponse, Responder, get, post, web};

use crate::client::DirectoryClient;
use crate::domain::business::BusinessFilters;
use crate::domain::query::SearchRequest;
use crate::dto::ApiResponse;
use crate::forms::businesses::{CreateBusinessForm, CreateBusinessPayload, SearchBusinessesQuery};
use crate::routes::{invalid_form, ok, service_error};
use crate::services::content as service;

#[get("/content/categories")]
pub async fn categories(client: web::Data<DirectoryClient>) -> impl Responder {
    ok(service::content_categories(client.get_ref()).await)
}

#[get("/content/businesses")]
pub async fn businesses(
    filters: web::Query<BusinessFilters>,
    client: web::Data<DirectoryClient>,
) -> impl Responder {
    ok(service::content_businesses(&filters, client.get_ref()).await)
}

#[get("/content/search")]
pub async fn search(
    query: web::Query<SearchBusinessesQuery>,
    client: web::Data<DirectoryClient>,
) -> impl Responder {
    let request: SearchRequest = match query.into_inner().try_into() {
        Ok(request) => request,
        Err(e) => return invalid_form(e),
    };

    let page = service::content_search(&request, client.get_ref()).await;
    HttpResponse::Ok().json(ApiResponse::page(page))
}

#[post("/content/businesses")]
pub async fn submit_business(
    client: web::Data<DirectoryClient>,
    web::Json(form): web::Json<CreateBusinessForm>,
) -> impl Responder {
    let payload: CreateBusinessPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return invalid_form(e),
    };

    match service::submit_business(payload, client.get_ref()).await {
        Ok(submitted) => HttpResponse::Ok()
            .json(ApiResponse::ok(submitted).with_message("Business submitted for review")),
        Err(err) => service_error(err, "Business"),
    }
}
