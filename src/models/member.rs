use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgHasArrayType, PgTypeInfo};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::{validate_not_blank, validate_rut};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "member_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Member,
    Administrator,
}

impl PgHasArrayType for Role {
    fn array_type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("_member_role")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Member {
    pub id: Uuid,
    pub username: String,
    pub rut: String,
    pub birthdate: NaiveDate,
    pub phone: String,
    pub email: String,
    pub instrument: Option<String>,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Administrator)
    }

    pub fn summary(&self) -> MemberSummary {
        MemberSummary {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// Public view returned by the lookup-by-email endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct NewMember {
    #[validate(
        length(min = 1, max = 100, message = "The username must be 1 to 100 characters long."),
        custom(function = "validate_not_blank")
    )]
    pub username: String,

    #[validate(custom(function = "validate_rut"))]
    pub rut: String,

    pub birthdate: NaiveDate,

    #[validate(length(min = 8, max = 12, message = "The phone must be 8 to 12 characters long."))]
    pub phone: String,

    #[validate(email(message = "The email must be a valid address."))]
    pub email: String,

    #[validate(length(min = 1, max = 100, message = "The instrument cannot be empty."))]
    pub instrument: Option<String>,

    #[validate(length(min = 1, message = "At least one role is required."))]
    pub roles: Vec<Role>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct MemberPatch {
    #[validate(
        length(min = 1, max = 100, message = "The username must be 1 to 100 characters long."),
        custom(function = "validate_not_blank")
    )]
    pub username: Option<String>,

    #[validate(custom(function = "validate_rut"))]
    pub rut: Option<String>,

    pub birthdate: Option<NaiveDate>,

    #[validate(length(min = 8, max = 12, message = "The phone must be 8 to 12 characters long."))]
    pub phone: Option<String>,

    #[validate(email(message = "The email must be a valid address."))]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 100, message = "The instrument cannot be empty."))]
    pub instrument: Option<String>,

    #[validate(length(min = 1, message = "At least one role is required."))]
    pub roles: Option<Vec<Role>>,
}
