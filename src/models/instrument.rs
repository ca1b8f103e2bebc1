use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::validate_not_blank;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Instrument {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub condition: String,
    pub kind: String,
    pub assigned_to: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct InstrumentRequest {
    #[validate(
        length(min = 1, max = 100, message = "The name must be 1 to 100 characters long."),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    #[validate(
        length(min = 1, max = 100, message = "The brand must be 1 to 100 characters long."),
        custom(function = "validate_not_blank")
    )]
    pub brand: String,

    #[validate(
        length(min = 1, max = 50, message = "The condition must be 1 to 50 characters long."),
        custom(function = "validate_not_blank")
    )]
    pub condition: String,

    #[validate(
        length(min = 1, max = 100, message = "The kind must be 1 to 100 characters long."),
        custom(function = "validate_not_blank")
    )]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssignRequest {
    pub member_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Implement {
    pub id: Uuid,
    pub name: String,
    pub instrument: String,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ImplementRequest {
    #[validate(
        length(min = 1, max = 100, message = "The name must be 1 to 100 characters long."),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    #[validate(
        length(min = 1, max = 100, message = "The instrument must be 1 to 100 characters long."),
        custom(function = "validate_not_blank")
    )]
    pub instrument: String,

    #[validate(range(min = 0, max = 99, message = "The stock must be between 0 and 99."))]
    pub stock: i32,
}
