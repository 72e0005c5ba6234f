use actix_web::{Responder, get};
use chrono::Utc;
use serde_json::json;

use crate::routes::ok;
use crate::sample::SITE_NAME;

#[get("/health")]
pub async fn health() -> impl Responder {
    ok(json!({
        "status": "ok",
        "site": SITE_NAME,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
