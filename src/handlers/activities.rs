use axum::extract::{Path, State};
use axum::response::Response;
use axum::Extension;

use crate::middleware::{require_admin, CurrentUser};
use crate::models::{ActivityRequest, ParticipationChange, ParticipationRequest};
use crate::services::ConfirmationPath;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};
use crate::utils::response::{created, success};
use crate::utils::validation::{parse_id, ValidatedJson};

pub async fn list_activities(State(state): State<AppState>) -> AppResult<Response> {
    let activities = state.activities.list().await?;
    Ok(success(activities, "Activities retrieved successfully"))
}

pub async fn get_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id, "activity")?;
    let activity = state.activities.get(id).await?;
    Ok(success(activity, "Activity retrieved successfully"))
}

pub async fn create_activity(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(body): ValidatedJson<ActivityRequest>,
) -> AppResult<Response> {
    require_admin(&user)?;
    let activity = state.activities.create(body).await?;
    Ok(created(activity, "Activity created successfully"))
}

pub async fn update_activity(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<ActivityRequest>,
) -> AppResult<Response> {
    let id = parse_id(&id, "activity")?;
    require_admin(&user)?;
    let activity = state.activities.update_details(id, body).await?;
    Ok(success(activity, "Activity updated successfully"))
}

pub async fn delete_activity(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id, "activity")?;
    require_admin(&user)?;
    let activity = state.activities.delete(id).await?;
    Ok(success(activity, "Activity deleted successfully"))
}

/// `PATCH /activities/:id/confirm/:member_id`
pub async fn confirm_participation(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(ids): Path<(String, String)>,
    body: Result<ValidatedJson<ParticipationRequest>, AppError>,
) -> AppResult<Response> {
    change_participation(state, user, ids, body, ConfirmationPath::SelfService).await
}

/// `PATCH /activities/:id/confirmAdmin/:member_id`
pub async fn confirm_participation_admin(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(ids): Path<(String, String)>,
    body: Result<ValidatedJson<ParticipationRequest>, AppError>,
) -> AppResult<Response> {
    change_participation(state, user, ids, body, ConfirmationPath::Administrative).await
}

// Ids are checked before the body, the body before the gate.
async fn change_participation(
    state: AppState,
    user: CurrentUser,
    (activity_id, member_id): (String, String),
    body: Result<ValidatedJson<ParticipationRequest>, AppError>,
    path: ConfirmationPath,
) -> AppResult<Response> {
    let activity_id = parse_id(&activity_id, "activity")?;
    let member_id = parse_id(&member_id, "member")?;

    let ValidatedJson(request) = body?;
    let change = ParticipationChange::try_from(request)?;

    let activity = state
        .activities
        .confirm_participation(path, &user, activity_id, member_id, change)
        .await?;

    Ok(success(activity, "Participation updated successfully"))
}
