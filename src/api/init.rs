//! Data initialization endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::AppState;

/// Response body for a successful initialization.
#[derive(Debug, Serialize)]
pub struct InitResponse {
    pub success: bool,
    pub message: String,
}

/// POST /init - Idempotently seed the member count and news.
pub async fn initialize(State(state): State<AppState>) -> Result<Json<InitResponse>, AppError> {
    state.repo.initialize().await.map_err(|e| {
        tracing::error!("Error initializing data: {}", e);
        e.with_public_message("Failed to initialize data")
    })?;

    Ok(Json(InitResponse {
        success: true,
        message: "Data initialized successfully".to_string(),
    }))
}
