use axum::extract::{Path, State};
use axum::response::Response;
use axum::Extension;
use tracing::info;

use crate::middleware::{require_admin, CurrentUser};
use crate::models::{MemberPatch, NewMember};
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};
use crate::utils::response::{created, success};
use crate::utils::validation::{parse_id, ValidatedJson};

const MEMBER_NOT_FOUND: &str = "No member was found with the provided id.";

pub async fn list_members(State(state): State<AppState>) -> AppResult<Response> {
    let members = state.members.list().await?;
    Ok(success(members, "Members retrieved successfully"))
}

pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id, "member")?;
    let member = state
        .members
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(MEMBER_NOT_FOUND.to_string()))?;
    Ok(success(member, "Member retrieved successfully"))
}

/// Resolves an email to `{id, username, email}`; clients use it to find their own id.
pub async fn get_member_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Response> {
    let member = state
        .members
        .find_by_email(email.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("No member was found with that email.".to_string()))?;
    Ok(success(member.summary(), "Member retrieved successfully"))
}

pub async fn create_member(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(body): ValidatedJson<NewMember>,
) -> AppResult<Response> {
    require_admin(&user)?;
    let member = state.members.create(&body).await?;
    info!(member_id = %member.id, "Member created");
    Ok(created(member, "Member created successfully"))
}

pub async fn update_member(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<MemberPatch>,
) -> AppResult<Response> {
    let id = parse_id(&id, "member")?;
    require_admin(&user)?;
    let member = state
        .members
        .update(id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound(MEMBER_NOT_FOUND.to_string()))?;
    info!(member_id = %id, "Member updated");
    Ok(success(member, "Member updated successfully"))
}

pub async fn delete_member(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id, "member")?;
    require_admin(&user)?;
    let member = state
        .members
        .delete(id)
        .await?
        .ok_or_else(|| AppError::NotFound(MEMBER_NOT_FOUND.to_string()))?;
    info!(member_id = %id, "Member deleted");
    Ok(success(member, "Member deleted successfully"))
}
