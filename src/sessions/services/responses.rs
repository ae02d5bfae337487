use crate::map::catalog::EmptyCatalogError;
use crate::map::models::UnknownRegion;
use crate::sessions::engine::{EngineError, InitializationError};
use crate::sessions::models::{GameSummary, RoundResolution, SessionSnapshot};
use http::StatusCode;
use serde::Serialize;

/// All possible reasons why an action on an existing session is refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionActionError {
    SessionNotFound,
    NotInitialized,
    AlreadyInitialized,
    RoundNotActive,
    NoGuessPlaced,
    RoundInProgress,
    GameOver,
    GameNotOver,
    InvalidCoordinate,
}

impl SessionActionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::SessionNotFound => StatusCode::NOT_FOUND,
            Self::InvalidCoordinate => StatusCode::BAD_REQUEST,
            _ => StatusCode::CONFLICT,
        }
    }
}

impl From<EngineError> for SessionActionError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::NotInitialized => Self::NotInitialized,
            EngineError::AlreadyInitialized => Self::AlreadyInitialized,
            EngineError::RoundNotActive => Self::RoundNotActive,
            EngineError::NoGuessPlaced => Self::NoGuessPlaced,
            EngineError::RoundInProgress => Self::RoundInProgress,
            EngineError::GameOver => Self::GameOver,
        }
    }
}

/// All possible reasons why a session can't be created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionCreationError {
    UnknownArea,
    EmptyCatalog,
    AlreadyInitialized,
}

impl SessionCreationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UnknownArea => StatusCode::BAD_REQUEST,
            Self::EmptyCatalog => StatusCode::UNPROCESSABLE_ENTITY,
            Self::AlreadyInitialized => StatusCode::CONFLICT,
        }
    }
}

impl From<UnknownRegion> for SessionCreationError {
    fn from(_err: UnknownRegion) -> Self {
        Self::UnknownArea
    }
}

impl From<EmptyCatalogError> for SessionCreationError {
    fn from(_err: EmptyCatalogError) -> Self {
        Self::EmptyCatalog
    }
}

impl From<InitializationError> for SessionCreationError {
    fn from(err: InitializationError) -> Self {
        match err {
            InitializationError::EmptyCatalog(err) => err.into(),
            InitializationError::Engine(_) => Self::AlreadyInitialized,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<SessionCreationError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionSnapshot>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<SessionActionError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionSnapshot>,
}

impl SessionResponse {
    pub fn from_result(result: Result<SessionSnapshot, SessionActionError>) -> Self {
        match result {
            Ok(session) => Self {
                error: false,
                error_code: None,
                session: Some(session),
            },
            Err(err) => Self {
                error: true,
                error_code: Some(err),
                session: None,
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitGuessResponse {
    pub error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<SessionActionError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<RoundResolution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionSnapshot>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<SessionActionError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<GameSummary>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestroySessionResponse {
    pub error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<SessionActionError>,
}
