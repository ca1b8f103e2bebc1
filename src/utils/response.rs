use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

const STATUS_SUCCESS: &str = "success";
const STATUS_ERROR: &str = "error";

#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub status: &'static str,
    pub message: Option<String>,
    pub data: Option<T>,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub status: &'static str,
    pub code: String,
    pub message: String,
    pub details: Option<Value>,
}

pub fn success<T>(data: T, message: impl Into<String>) -> Response
where
    T: Serialize,
{
    with_status(StatusCode::OK, data, message)
}

pub fn created<T>(data: T, message: impl Into<String>) -> Response
where
    T: Serialize,
{
    with_status(StatusCode::CREATED, data, message)
}

fn with_status<T>(status: StatusCode, data: T, message: impl Into<String>) -> Response
where
    T: Serialize,
{
    let body = ApiResponse {
        status: STATUS_SUCCESS,
        message: Some(message.into()),
        data: Some(data),
    };
    (status, Json(body)).into_response()
}

pub fn error(
    code: &str,
    message: impl Into<String>,
    details: Option<Value>,
    status: StatusCode,
) -> Response {
    let body = ApiErrorResponse {
        status: STATUS_ERROR,
        code: code.to_string(),
        message: message.into(),
        details,
    };

    (status, Json(body)).into_response()
}
