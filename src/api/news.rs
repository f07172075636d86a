//! News API endpoints.

use axum::{extract::State, Json};

use super::read_or_fallback;
use crate::errors::AppError;
use crate::models::NewsArticle;
use crate::AppState;

/// GET /news - All news articles, newest first.
pub async fn list_news(State(state): State<AppState>) -> Result<Json<Vec<NewsArticle>>, AppError> {
    let news = read_or_fallback(
        state.repo.list_news().await,
        state.config.read_fail_open,
        "news",
    )?;
    Ok(Json(news))
}
