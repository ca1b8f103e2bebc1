use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::utils::error::AppError;
use crate::utils::validation::{validate_not_blank, validate_time};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "participation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ParticipationStatus {
    Pending,
    Confirmed,
    Declined,
}

/// One member's attendance record inside an activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participation {
    #[serde(rename = "member")]
    pub member_id: Uuid,
    pub status: ParticipationStatus,
    pub justification: Option<String>,
}

impl Participation {
    pub fn pending(member_id: Uuid) -> Self {
        Self {
            member_id,
            status: ParticipationStatus::Pending,
            justification: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub participants: Vec<Participation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Activity {
    pub fn participant(&self, member_id: Uuid) -> Option<&Participation> {
        self.participants.iter().find(|p| p.member_id == member_id)
    }
}

/// `activities` row; the roster lives in `activity_participants`.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[sqlx(rename = "activity_date")]
    pub date: NaiveDate,
    #[sqlx(rename = "activity_time")]
    pub time: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ActivityRow {
    pub fn with_participants(self, participants: Vec<Participation>) -> Activity {
        Activity {
            id: self.id,
            title: self.title,
            description: self.description,
            date: self.date,
            time: self.time,
            location: self.location,
            participants,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Descriptive fields accepted on create and full update. A `participants`
/// key in the body is ignored; the roster is always computed server-side.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ActivityRequest {
    #[validate(
        length(min = 1, max = 200, message = "The title must be 1 to 200 characters long."),
        custom(function = "validate_not_blank")
    )]
    pub title: String,

    #[validate(
        length(min = 1, max = 2000, message = "The description must be 1 to 2000 characters long."),
        custom(function = "validate_not_blank")
    )]
    pub description: String,

    pub date: NaiveDate,

    #[validate(custom(function = "validate_time"))]
    pub time: String,

    #[validate(
        length(min = 1, max = 200, message = "The location must be 1 to 200 characters long."),
        custom(function = "validate_not_blank")
    )]
    pub location: String,
}

/// Outcomes a caller may pick; `pending` is only ever set at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipationChoice {
    Confirmed,
    Declined,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ParticipationRequest {
    pub participation: ParticipationChoice,

    #[validate(length(max = 500, message = "The justification cannot exceed 500 characters."))]
    pub justification: Option<String>,
}

/// A validated change to one participation entry. Declining always carries a
/// justification; a confirmed entry never keeps one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParticipationChange {
    Confirm,
    Decline { justification: String },
}

impl ParticipationChange {
    pub fn status(&self) -> ParticipationStatus {
        match self {
            ParticipationChange::Confirm => ParticipationStatus::Confirmed,
            ParticipationChange::Decline { .. } => ParticipationStatus::Declined,
        }
    }

    pub fn justification(&self) -> Option<&str> {
        match self {
            ParticipationChange::Confirm => None,
            ParticipationChange::Decline { justification } => Some(justification),
        }
    }

    /// Overwrites status and justification; nothing of the previous state survives.
    pub fn apply_to(&self, participation: &mut Participation) {
        participation.status = self.status();
        participation.justification = self.justification().map(str::to_string);
    }
}

impl TryFrom<ParticipationRequest> for ParticipationChange {
    type Error = AppError;

    fn try_from(request: ParticipationRequest) -> Result<Self, Self::Error> {
        let justification = request
            .justification
            .map(|j| j.trim().to_string())
            .filter(|j| !j.is_empty());

        // Text sent along with a confirmation is dropped
        match (request.participation, justification) {
            (ParticipationChoice::Confirmed, _) => Ok(ParticipationChange::Confirm),
            (ParticipationChoice::Declined, Some(justification)) => {
                Ok(ParticipationChange::Decline { justification })
            }
            (ParticipationChoice::Declined, None) => Err(AppError::ValidationError(
                "A justification is required when declining participation.".to_string(),
            )),
        }
    }
}
