use crate::app_context::AppContext;
use crate::http::query_params::LaunchParams;
use crate::sessions::services::http::{CreateSessionHttpHandler, SessionHttpHandler};
use crate::sessions::services::responses::{
    CreateSessionResponse, DestroySessionResponse, SessionActionError, SessionResponse,
    SummaryResponse,
};
use crate::storage::sessions::HashMapSessionsStorage;
use axum::extract::{Path, Query, State};
use axum::response::Json;
use http::StatusCode;

#[axum::debug_handler]
pub async fn create(
    Query(params): Query<LaunchParams>,
    State(app_context): State<AppContext<HashMapSessionsStorage>>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let response = CreateSessionHttpHandler::new(app_context)
        .create(params.rounds.as_deref(), params.area.as_deref())
        .await;
    let status = match response.error_code {
        Some(error_code) => error_code.status_code(),
        None => StatusCode::CREATED,
    };
    (status, Json(response))
}

#[axum::debug_handler]
pub async fn view(
    Path(session_id): Path<String>,
    State(app_context): State<AppContext<HashMapSessionsStorage>>,
) -> (StatusCode, Json<SessionResponse>) {
    let response = SessionHttpHandler::new(app_context, &session_id)
        .view()
        .await;
    (status_of(response.error_code), Json(response))
}

#[axum::debug_handler]
pub async fn destroy(
    Path(session_id): Path<String>,
    State(app_context): State<AppContext<HashMapSessionsStorage>>,
) -> (StatusCode, Json<DestroySessionResponse>) {
    let response = SessionHttpHandler::new(app_context, &session_id)
        .destroy()
        .await;
    (status_of(response.error_code), Json(response))
}

#[axum::debug_handler]
pub async fn summary(
    Path(session_id): Path<String>,
    State(app_context): State<AppContext<HashMapSessionsStorage>>,
) -> (StatusCode, Json<SummaryResponse>) {
    let response = SessionHttpHandler::new(app_context, &session_id)
        .summary()
        .await;
    (status_of(response.error_code), Json(response))
}

pub(super) fn status_of(error_code: Option<SessionActionError>) -> StatusCode {
    error_code.map_or(StatusCode::OK, |error_code| error_code.status_code())
}
