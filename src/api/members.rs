//! Member API endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use super::read_or_fallback;
use crate::errors::AppError;
use crate::models::{JoinRequest, JoinResponse, MemberCount, MemberList};
use crate::AppState;

const WELCOME_MESSAGE: &str = "Welcome to TYTC! We'll be in touch soon.";
const JOIN_FAILED_MESSAGE: &str = "Failed to join TYTC. Please try again.";

/// GET /members/count - Current member count, 0 when unknown.
pub async fn member_count(State(state): State<AppState>) -> Result<Json<MemberCount>, AppError> {
    let count = read_or_fallback(
        state.repo.member_count().await,
        state.config.read_fail_open,
        "member count",
    )?;
    Ok(Json(MemberCount { count }))
}

/// POST /members/join - Register a new member.
pub async fn join_members(
    State(state): State<AppState>,
    payload: Result<Json<JoinRequest>, JsonRejection>,
) -> Result<Json<JoinResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    if state.config.validate_submissions {
        request.validate().map_err(AppError::Validation)?;
    }

    let member = state.repo.create_member(request).await.map_err(|e| {
        tracing::error!("Error joining TYTC: {}", e);
        e.with_public_message(JOIN_FAILED_MESSAGE)
    })?;

    Ok(Json(JoinResponse {
        success: true,
        message: WELCOME_MESSAGE.to_string(),
        member_id: member.id,
    }))
}

/// GET /admin/members - All member records, unordered.
pub async fn list_members(State(state): State<AppState>) -> Result<Json<MemberList>, AppError> {
    let members = read_or_fallback(
        state.repo.list_members().await,
        state.config.read_fail_open,
        "members",
    )?;
    Ok(Json(MemberList { members }))
}
