use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::models::{Activity, ActivityRequest, ParticipationChange};
use crate::repository::{ActivityRepository, MemberRepository};
use crate::services::notification::{self, Notification, Notifier};
use crate::services::participation::{authorize, ConfirmationPath};
use crate::utils::error::{AppError, AppResult};

const ACTIVITY_NOT_FOUND: &str = "No activity was found with the provided id.";
const PARTICIPATION_NOT_FOUND: &str =
    "No activity with the provided id lists that member as a participant.";

#[derive(Clone)]
pub struct ActivityService {
    activities: Arc<dyn ActivityRepository>,
    members: Arc<dyn MemberRepository>,
    notifier: Arc<dyn Notifier>,
}

impl ActivityService {
    pub fn new(
        activities: Arc<dyn ActivityRepository>,
        members: Arc<dyn MemberRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            activities,
            members,
            notifier,
        }
    }

    pub async fn list(&self) -> AppResult<Vec<Activity>> {
        self.activities.list().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Activity> {
        self.activities
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(ACTIVITY_NOT_FOUND.to_string()))
    }

    /// Creates the activity with a pending entry for every current
    /// non-administrator member, then announces it to them.
    pub async fn create(&self, details: ActivityRequest) -> AppResult<Activity> {
        let members = self.members.list_non_admin().await?;
        let roster: Vec<Uuid> = members.iter().map(|m| m.id).collect();

        let activity = self.activities.create(&details, &roster).await?;
        info!(
            activity_id = %activity.id,
            participants = activity.participants.len(),
            "Activity created"
        );

        let recipients = members.into_iter().map(|m| m.email).collect();
        // Detached; creation does not wait on delivery
        notification::dispatch(
            Arc::clone(&self.notifier),
            recipients,
            Notification::activity_announcement(&activity),
        );

        Ok(activity)
    }

    pub async fn update_details(&self, id: Uuid, details: ActivityRequest) -> AppResult<Activity> {
        let activity = self
            .activities
            .update_details(id, &details)
            .await?
            .ok_or_else(|| AppError::NotFound(ACTIVITY_NOT_FOUND.to_string()))?;

        info!(activity_id = %id, "Activity details updated");
        Ok(activity)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<Activity> {
        let activity = self
            .activities
            .delete(id)
            .await?
            .ok_or_else(|| AppError::NotFound(ACTIVITY_NOT_FOUND.to_string()))?;

        info!(activity_id = %id, "Activity deleted");
        Ok(activity)
    }

    /// Sets one member's answer on one activity once the gate for `path` passes.
    pub async fn confirm_participation(
        &self,
        path: ConfirmationPath,
        caller: &CurrentUser,
        activity_id: Uuid,
        member_id: Uuid,
        change: ParticipationChange,
    ) -> AppResult<Activity> {
        match path {
            ConfirmationPath::SelfService => {
                let target = self.members.find_by_id(member_id).await?;
                authorize(path, caller, target.as_ref())?;
            }
            ConfirmationPath::Administrative => authorize(path, caller, None)?,
        }

        let activity = self
            .activities
            .set_participation(activity_id, member_id, &change)
            .await?
            .ok_or_else(|| AppError::NotFound(PARTICIPATION_NOT_FOUND.to_string()))?;

        info!(
            activity_id = %activity_id,
            member_id = %member_id,
            caller = %caller.id,
            path = ?path,
            status = ?change.status(),
            "Participation updated"
        );
        Ok(activity)
    }
}
