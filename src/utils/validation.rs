use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::Json;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::utils::error::AppError;

/// National id (RUT): digits, a dash, and a check digit (`0-9` or `K`).
static RUT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+[-‐][0-9kK]$").expect("valid RUT pattern"));

/// Wall-clock time of day, `HH:MM`.
static TIME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("valid time pattern"));

/// Parses a path id, rejecting malformed values before any lookup happens.
pub fn parse_id(raw: &str, what: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        AppError::ValidationError(format!("The provided {} id is not a valid identifier.", what))
    })
}

pub fn validate_rut(value: &str) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if !(9..=10).contains(&len) {
        return Err(ValidationError::new("rut_length")
            .with_message("The RUT must be 9 or 10 characters long.".into()));
    }
    if RUT_PATTERN.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new("rut_format")
            .with_message("The RUT must have the form XXXXXXXX-X, e.g. 12345678-9.".into()))
    }
}

pub fn validate_time(value: &str) -> Result<(), ValidationError> {
    if TIME_PATTERN.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new("time_format")
            .with_message("The time must have the form HH:MM.".into()))
    }
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank").with_message("Fields cannot be blank.".into()))
    } else {
        Ok(())
    }
}

/// JSON body extractor that runs the `validator` rules of `T` and reports
/// malformed bodies through the standard error envelope.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::ValidationError(rejection.body_text()))?;

        value.validate()?;

        Ok(Self(value))
    }
}
