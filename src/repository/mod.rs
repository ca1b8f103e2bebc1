//! Persistence seams. Each trait has a PostgreSQL implementation; handlers and
//! services only ever see the trait objects held in `AppState`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    Activity, ActivityRequest, Implement, ImplementRequest, Instrument, InstrumentRequest, Member,
    MemberPatch, NewMember, ParticipationChange,
};
use crate::utils::error::{AppError, AppResult};

pub mod activity_repo;
pub mod implement_repo;
pub mod instrument_repo;
pub mod member_repo;

#[cfg(test)]
pub mod memory;

pub use activity_repo::PgActivityRepository;
pub use implement_repo::PgImplementRepository;
pub use instrument_repo::PgInstrumentRepository;
pub use member_repo::PgMemberRepository;

#[async_trait]
pub trait ActivityRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Activity>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Activity>>;

    /// Persists the activity and one pending participation per member, in order.
    async fn create(&self, details: &ActivityRequest, participants: &[Uuid]) -> AppResult<Activity>;

    /// Overwrites the descriptive fields only; the roster is left as is.
    async fn update_details(&self, id: Uuid, details: &ActivityRequest)
        -> AppResult<Option<Activity>>;

    async fn delete(&self, id: Uuid) -> AppResult<Option<Activity>>;

    /// Targeted update of the single entry matching both ids. `None` when the
    /// activity is missing or the member is not on its roster.
    async fn set_participation(
        &self,
        activity_id: Uuid,
        member_id: Uuid,
        change: &ParticipationChange,
    ) -> AppResult<Option<Activity>>;
}

#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Member>>;

    /// Members without the administrator role, oldest first.
    async fn list_non_admin(&self) -> AppResult<Vec<Member>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Member>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Member>>;

    async fn create(&self, member: &NewMember) -> AppResult<Member>;

    async fn update(&self, id: Uuid, patch: MemberPatch) -> AppResult<Option<Member>>;

    async fn delete(&self, id: Uuid) -> AppResult<Option<Member>>;
}

/// Result of a conditional assignment change on an instrument.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentOutcome {
    Updated(Instrument),
    /// The instrument exists but was already in the requested state.
    Unchanged,
    NotFound,
}

#[async_trait]
pub trait InstrumentRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Instrument>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Instrument>>;

    async fn create(&self, instrument: &InstrumentRequest) -> AppResult<Instrument>;

    async fn update(&self, id: Uuid, instrument: &InstrumentRequest)
        -> AppResult<Option<Instrument>>;

    async fn delete(&self, id: Uuid) -> AppResult<Option<Instrument>>;

    async fn assign(&self, id: Uuid, member_id: Uuid) -> AppResult<AssignmentOutcome>;

    async fn unassign(&self, id: Uuid) -> AppResult<AssignmentOutcome>;
}

#[async_trait]
pub trait ImplementRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Implement>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Implement>>;

    async fn create(&self, implement: &ImplementRequest) -> AppResult<Implement>;

    async fn update(&self, id: Uuid, implement: &ImplementRequest) -> AppResult<Option<Implement>>;

    async fn delete(&self, id: Uuid) -> AppResult<Option<Implement>>;
}

/// Maps unique-constraint violations to a conflict, everything else stays a
/// database error.
pub(crate) fn conflict_on_unique(err: sqlx::Error, message: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(message.to_string())
        }
        _ => AppError::DatabaseError(err),
    }
}
