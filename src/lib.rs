//! Core library exports for the business directory service.
//!
//! With only the `data` feature the crate provides the domain model, Diesel
//! persistence, the search engine and the sample directory. The `server`
//! feature adds forms, services, the content client and the HTTP routes.

#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod error_conversions;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod pagination;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "data")]
pub mod sample;
#[cfg(feature = "data")]
pub mod schema;
#[cfg(feature = "data")]
pub mod search;

#[cfg(feature = "server")]
pub mod client;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;
