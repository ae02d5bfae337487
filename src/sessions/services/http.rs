use crate::app_context::AppContext;
use crate::map::models::LatLng;
use crate::sessions::models::SessionConfig;
use crate::sessions::services::responses::{
    CreateSessionResponse, DestroySessionResponse, SessionActionError, SessionCreationError,
    SessionResponse, SubmitGuessResponse, SummaryResponse,
};
use crate::storage::interface::ISessionStorage;

pub struct CreateSessionHttpHandler<SS: ISessionStorage> {
    app_context: AppContext<SS>,
}

impl<SS> CreateSessionHttpHandler<SS>
where
    SS: ISessionStorage,
{
    pub fn new(app_context: AppContext<SS>) -> Self {
        Self { app_context }
    }

    pub async fn create(&self, rounds: Option<&str>, area: Option<&str>) -> CreateSessionResponse {
        let config = match SessionConfig::from_launch_params(rounds, area) {
            Ok(config) => config,
            Err(err) => {
                let message = err.to_string();
                return creation_failure(err.into(), message);
            }
        };
        match self
            .app_context
            .sessions
            .create(config, &self.app_context.catalog)
            .await
        {
            Ok((session_id, session)) => CreateSessionResponse {
                error: false,
                error_code: None,
                message: None,
                session_id: Some(session_id),
                session: Some(session),
            },
            Err(err) => {
                tracing::warn!(
                    task = "session_creation_refused",
                    region = %config.region,
                    error = %err,
                );
                creation_failure(err.into(), err.to_string())
            }
        }
    }
}

fn creation_failure(error_code: SessionCreationError, message: String) -> CreateSessionResponse {
    CreateSessionResponse {
        error: true,
        error_code: Some(error_code),
        message: Some(message),
        session_id: None,
        session: None,
    }
}

pub struct SessionHttpHandler<'a, SS: ISessionStorage> {
    app_context: AppContext<SS>,
    session_id: &'a str,
}

impl<'a, SS> SessionHttpHandler<'a, SS>
where
    SS: ISessionStorage,
{
    pub fn new(app_context: AppContext<SS>, session_id: &'a str) -> Self {
        Self {
            app_context,
            session_id,
        }
    }

    pub async fn view(&self) -> SessionResponse {
        SessionResponse::from_result(self.app_context.sessions.snapshot(self.session_id).await)
    }

    pub async fn destroy(&self) -> DestroySessionResponse {
        if self.app_context.sessions.remove(self.session_id).await {
            DestroySessionResponse {
                error: false,
                error_code: None,
            }
        } else {
            DestroySessionResponse {
                error: true,
                error_code: Some(SessionActionError::SessionNotFound),
            }
        }
    }

    pub async fn place_guess(&self, position: LatLng) -> SessionResponse {
        SessionResponse::from_result(
            self.app_context
                .sessions
                .place_guess(self.session_id, position)
                .await,
        )
    }

    pub async fn submit_guess(&self) -> SubmitGuessResponse {
        match self.app_context.sessions.submit_guess(self.session_id).await {
            Ok((resolution, session)) => SubmitGuessResponse {
                error: false,
                error_code: None,
                resolution: Some(resolution),
                session: Some(session),
            },
            Err(err) => SubmitGuessResponse {
                error: true,
                error_code: Some(err),
                resolution: None,
                session: None,
            },
        }
    }

    pub async fn new_round(&self) -> SessionResponse {
        SessionResponse::from_result(self.app_context.sessions.start_round(self.session_id).await)
    }

    pub async fn restart(&self) -> SessionResponse {
        SessionResponse::from_result(self.app_context.sessions.restart(self.session_id).await)
    }

    pub async fn summary(&self) -> SummaryResponse {
        match self.app_context.sessions.summary(self.session_id).await {
            Ok(summary) => SummaryResponse {
                error: false,
                error_code: None,
                summary: Some(summary),
            },
            Err(err) => SummaryResponse {
                error: true,
                error_code: Some(err),
                summary: None,
            },
        }
    }
}
