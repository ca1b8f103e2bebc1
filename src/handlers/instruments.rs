use axum::extract::{Path, State};
use axum::response::Response;
use axum::Extension;
use tracing::info;

use crate::middleware::{require_admin, CurrentUser};
use crate::models::{AssignRequest, InstrumentRequest};
use crate::repository::AssignmentOutcome;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};
use crate::utils::response::{created, success};
use crate::utils::validation::{parse_id, ValidatedJson};

const INSTRUMENT_NOT_FOUND: &str = "No instrument was found with the provided id.";

fn not_found() -> AppError {
    AppError::NotFound(INSTRUMENT_NOT_FOUND.to_string())
}

pub async fn list_instruments(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Response> {
    require_admin(&user)?;
    let instruments = state.instruments.list().await?;
    Ok(success(instruments, "Instruments retrieved successfully"))
}

pub async fn get_instrument(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id, "instrument")?;
    require_admin(&user)?;
    let instrument = state.instruments.find_by_id(id).await?.ok_or_else(not_found)?;
    Ok(success(instrument, "Instrument retrieved successfully"))
}

pub async fn create_instrument(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(body): ValidatedJson<InstrumentRequest>,
) -> AppResult<Response> {
    require_admin(&user)?;
    let instrument = state.instruments.create(&body).await?;
    info!(instrument_id = %instrument.id, "Instrument created");
    Ok(created(instrument, "Instrument created successfully"))
}

pub async fn update_instrument(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<InstrumentRequest>,
) -> AppResult<Response> {
    let id = parse_id(&id, "instrument")?;
    require_admin(&user)?;
    let instrument = state
        .instruments
        .update(id, &body)
        .await?
        .ok_or_else(not_found)?;
    Ok(success(instrument, "Instrument updated successfully"))
}

pub async fn delete_instrument(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id, "instrument")?;
    require_admin(&user)?;
    let instrument = state.instruments.delete(id).await?.ok_or_else(not_found)?;
    info!(instrument_id = %id, "Instrument deleted");
    Ok(success(instrument, "Instrument deleted successfully"))
}

pub async fn assign_instrument(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<AssignRequest>,
) -> AppResult<Response> {
    let id = parse_id(&id, "instrument")?;
    require_admin(&user)?;

    if state.members.find_by_id(body.member_id).await?.is_none() {
        return Err(AppError::NotFound(
            "No member was found with the provided id.".to_string(),
        ));
    }

    match state.instruments.assign(id, body.member_id).await? {
        AssignmentOutcome::Updated(instrument) => {
            info!(instrument_id = %id, member_id = %body.member_id, "Instrument assigned");
            Ok(success(instrument, "Instrument assigned successfully"))
        }
        AssignmentOutcome::Unchanged => Err(AppError::Conflict(
            "The instrument is already assigned to a member.".to_string(),
        )),
        AssignmentOutcome::NotFound => Err(not_found()),
    }
}

pub async fn unassign_instrument(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id, "instrument")?;
    require_admin(&user)?;

    match state.instruments.unassign(id).await? {
        AssignmentOutcome::Updated(instrument) => {
            info!(instrument_id = %id, "Instrument unassigned");
            Ok(success(instrument, "Instrument unassigned successfully"))
        }
        AssignmentOutcome::Unchanged => Err(AppError::Conflict(
            "The instrument is not assigned to anyone.".to_string(),
        )),
        AssignmentOutcome::NotFound => Err(not_found()),
    }
}
