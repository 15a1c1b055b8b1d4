use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::state::AppState;

/// `POST /invoke`: run one invocation
///
/// The HTTP status mirrors `statusCode`; the body is the full response object.
pub async fn invoke(State(state): State<AppState>) -> impl IntoResponse {
    let response = state.invoker.invoke().await;
    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response))
}
