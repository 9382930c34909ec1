use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::dto::session_dto::{CreateSessionResponse, SessionView};
use crate::error::{Error, Result};
use crate::AppState;

#[axum::debug_handler]
pub async fn create_session(State(state): State<AppState>) -> impl IntoResponse {
    let (session_id, _) = state.sessions.create();
    let response = CreateSessionResponse {
        session_id,
        expires_in_seconds: state.session_ttl.as_secs(),
    };
    (StatusCode::CREATED, Json(response))
}

#[axum::debug_handler]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>> {
    let handle = state.sessions.get(id)?;
    let session = handle.lock().await;
    let view = SessionView::from(&*session);
    Ok(Json(view))
}

#[axum::debug_handler]
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    if state.sessions.remove(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::NotFound(format!("Session {} not found or expired", id)))
    }
}
