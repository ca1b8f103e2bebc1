use axum::response::Response;
use serde::Serialize;

use crate::utils::response::success;

pub mod activities;
pub mod implements;
pub mod instruments;
pub mod members;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "band-server",
    };

    success(payload, "Health check successful")
}
