use axum::extract::{Path, State};
use axum::response::Response;
use axum::Extension;

use crate::middleware::{require_admin, CurrentUser};
use crate::models::ImplementRequest;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};
use crate::utils::response::{created, success};
use crate::utils::validation::{parse_id, ValidatedJson};

fn not_found() -> AppError {
    AppError::NotFound("No implement was found with the provided id.".to_string())
}

pub async fn list_implements(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Response> {
    require_admin(&user)?;
    let implements = state.implements.list().await?;
    Ok(success(implements, "Implements retrieved successfully"))
}

pub async fn get_implement(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id, "implement")?;
    require_admin(&user)?;
    let implement = state.implements.find_by_id(id).await?.ok_or_else(not_found)?;
    Ok(success(implement, "Implement retrieved successfully"))
}

pub async fn create_implement(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(body): ValidatedJson<ImplementRequest>,
) -> AppResult<Response> {
    require_admin(&user)?;
    let implement = state.implements.create(&body).await?;
    Ok(created(implement, "Implement created successfully"))
}

pub async fn update_implement(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<ImplementRequest>,
) -> AppResult<Response> {
    let id = parse_id(&id, "implement")?;
    require_admin(&user)?;
    let implement = state
        .implements
        .update(id, &body)
        .await?
        .ok_or_else(not_found)?;
    Ok(success(implement, "Implement updated successfully"))
}

pub async fn delete_implement(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id, "implement")?;
    require_admin(&user)?;
    let implement = state.implements.delete(id).await?.ok_or_else(not_found)?;
    Ok(success(implement, "Implement deleted successfully"))
}
