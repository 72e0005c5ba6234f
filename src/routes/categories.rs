use actix_web::{Responder, get, post, put, web};

use crate::forms::categories::{
    AddCategoryForm, AddCategoryFormPayload, SetCategoryParentForm, SetCategoryParentFormPayload,
};
use crate::repository::DieselRepository;
use crate::routes::{created, invalid_form, ok, service_error};
use crate::services::categories as service;

#[get("/categories")]
pub async fn list_categories(repo: web::Data<DieselRepository>) -> impl Responder {
    match service::list_categories(repo.get_ref()) {
        Ok(categories) => ok(categories),
        Err(err) => service_error(err, "Category"),
    }
}

#[get("/categories/{id_or_slug}")]
pub async fn get_category(
    id_or_slug: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match service::get_category(&id_or_slug, repo.get_ref()) {
        Ok(category) => ok(category),
        Err(err) => service_error(err, "Category"),
    }
}

#[post("/categories")]
pub async fn create_category(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddCategoryForm>,
) -> impl Responder {
    let payload: AddCategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return invalid_form(e),
    };

    match service::create_category(payload, repo.get_ref()) {
        Ok(category) => created(category, "Category created successfully"),
        Err(err) => service_error(err, "Category"),
    }
}

#[put("/categories/{id}/parent")]
pub async fn set_category_parent(
    id: web::Path<String>,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<SetCategoryParentForm>,
) -> impl Responder {
    let payload: SetCategoryParentFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return invalid_form(e),
    };

    match service::set_category_parent(&id, payload, repo.get_ref()) {
        Ok(category) => ok(category),
        Err(err) => service_error(err, "Category"),
    }
}
