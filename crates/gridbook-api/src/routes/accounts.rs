//! Account routes

use crate::{ApiError, AppState};
use axum::extract::State;
use axum::Json;
use gridbook_core::AccountOption;

/// Account options for the From/To select columns (JSON API)
pub async fn api_accounts(
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountOption>>, ApiError> {
    let options = state.accounts.options().await.map_err(|e| {
        log::error!("Failed to load account options: {}", e);
        ApiError::InternalError
    })?;
    Ok(Json(options))
}
