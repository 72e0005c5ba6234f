//! Domain entities and value objects of the business directory.

pub mod analytics;
pub mod blog_post;
pub mod business;
pub mod category;
pub mod custom_field;
pub mod query;
pub mod review;
pub mod types;
pub mod user;
