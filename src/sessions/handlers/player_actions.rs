use crate::app_context::AppContext;
use crate::map::models::LatLng;
use crate::sessions::handlers::session::status_of;
use crate::sessions::services::http::SessionHttpHandler;
use crate::sessions::services::responses::{
    SessionActionError, SessionResponse, SubmitGuessResponse,
};
use crate::storage::sessions::HashMapSessionsStorage;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Json;
use http::StatusCode;

#[axum::debug_handler]
pub async fn click(
    Path(session_id): Path<String>,
    State(app_context): State<AppContext<HashMapSessionsStorage>>,
    payload: Result<Json<LatLng>, JsonRejection>,
) -> (StatusCode, Json<SessionResponse>) {
    let position = match payload {
        Ok(Json(position)) => position,
        Err(rejection) => {
            tracing::warn!(
                session_id = %session_id,
                error = %rejection,
                "Rejected a malformed click."
            );
            let response = SessionResponse::from_result(Err(SessionActionError::InvalidCoordinate));
            return (status_of(response.error_code), Json(response));
        }
    };
    let response = SessionHttpHandler::new(app_context, &session_id)
        .place_guess(position)
        .await;
    (status_of(response.error_code), Json(response))
}

#[axum::debug_handler]
pub async fn submit_guess(
    Path(session_id): Path<String>,
    State(app_context): State<AppContext<HashMapSessionsStorage>>,
) -> (StatusCode, Json<SubmitGuessResponse>) {
    let response = SessionHttpHandler::new(app_context, &session_id)
        .submit_guess()
        .await;
    (status_of(response.error_code), Json(response))
}

#[axum::debug_handler]
pub async fn new_round(
    Path(session_id): Path<String>,
    State(app_context): State<AppContext<HashMapSessionsStorage>>,
) -> (StatusCode, Json<SessionResponse>) {
    let response = SessionHttpHandler::new(app_context, &session_id)
        .new_round()
        .await;
    (status_of(response.error_code), Json(response))
}

#[axum::debug_handler]
pub async fn restart(
    Path(session_id): Path<String>,
    State(app_context): State<AppContext<HashMapSessionsStorage>>,
) -> (StatusCode, Json<SessionResponse>) {
    let response = SessionHttpHandler::new(app_context, &session_id)
        .restart()
        .await;
    (status_of(response.error_code), Json(response))
}
