use crate::map::catalog::Catalog;
use crate::map::models::LatLng;
use crate::sessions::engine::InitializationError;
use crate::sessions::models::{GameSummary, RoundResolution, SessionConfig, SessionSnapshot};
use crate::sessions::services::responses::SessionActionError;

pub trait ISessionStorage: SessionRepo + SessionGameFlowHandler + SessionSocketsRepo {}

pub trait SessionRepo {
    async fn exists(&self, session_id: &str) -> bool;

    async fn create(
        &self,
        config: SessionConfig,
        catalog: &Catalog,
    ) -> Result<(String, SessionSnapshot), InitializationError>;

    /// Returns `false` if there was no such session.
    async fn remove(&self, session_id: &str) -> bool;

    async fn snapshot(&self, session_id: &str) -> Result<SessionSnapshot, SessionActionError>;

    async fn summary(&self, session_id: &str) -> Result<GameSummary, SessionActionError>;
}

pub trait SessionGameFlowHandler {
    async fn start_round(&self, session_id: &str) -> Result<SessionSnapshot, SessionActionError>;

    async fn place_guess(
        &self,
        session_id: &str,
        position: LatLng,
    ) -> Result<SessionSnapshot, SessionActionError>;

    async fn submit_guess(
        &self,
        session_id: &str,
    ) -> Result<(RoundResolution, SessionSnapshot), SessionActionError>;

    async fn restart(&self, session_id: &str) -> Result<SessionSnapshot, SessionActionError>;
}

pub trait SessionSocketsRepo {
    /// Returns `false` if there was no such session.
    async fn add_socket(&self, session_id: &str, socket_id: usize) -> bool;

    /// Returns `true` if this was the last socket and the session was dropped.
    async fn remove_socket(&self, session_id: &str, socket_id: usize) -> bool;
}
