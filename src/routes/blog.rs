use actix_web::{HttpResponse, Responder, get, post, web};

use crate::dto::ApiResponse;
use crate::forms::blog::{CreateBlogPostForm, CreateBlogPostPayload};
use crate::repository::DieselRepository;
use crate::routes::{created, invalid_form, ok, service_error};
use crate::services::blog::{self as service, BlogListParams};

#[get("/blog")]
pub async fn list_blog_posts(
    params: web::Query<BlogListParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match service::list_blog_posts(&params, repo.get_ref()) {
        Ok(page) => HttpResponse::Ok().json(ApiResponse::page(page)),
        Err(err) => service_error(err, "Blog post"),
    }
}

#[get("/blog/{slug}")]
pub async fn get_blog_post(
    slug: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match service::get_blog_post(&slug, repo.get_ref()) {
        Ok(post) => ok(post),
        Err(err) => service_error(err, "Blog post"),
    }
}

#[post("/blog")]
pub async fn create_blog_post(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CreateBlogPostForm>,
) -> impl Responder {
    let payload: CreateBlogPostPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return invalid_form(e),
    };

    match service::create_blog_post(payload, repo.get_ref()) {
        Ok(post) => created(post, "Blog post created successfully"),
        Err(err) => service_error(err, "Blog post"),
    }
}
