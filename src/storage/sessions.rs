use crate::map::catalog::Catalog;
use crate::map::display::MapCommand;
use crate::map::models::LatLng;
use crate::map::SharedOracle;
use crate::sessions::consts::SESSION_ID_LENGTH;
use crate::sessions::engine::{InitializationError, RoundEngine};
use crate::sessions::message_types::ServerSentSocketMessage;
use crate::sessions::models::{
    GameSummary, RoundResolution, SessionConfig, SessionSnapshot, TickOutcome,
};
use crate::sessions::services::responses::SessionActionError;
use crate::sessions::timer::RoundTimer;
use crate::storage::interface::{
    ISessionStorage, SessionGameFlowHandler, SessionRepo, SessionSocketsRepo,
};
use crate::storage::sockets::HashMapClientSocketsStorage;
use rand::{distributions::Alphanumeric, Rng};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

pub struct Session {
    pub engine: RoundEngine,
    pub timer: RoundTimer,
    pub socket_ids: Vec<usize>,
}

#[derive(Clone)]
pub struct HashMapSessionsStorage {
    storage: Arc<RwLock<HashMap<String, Session>>>,
    sockets: HashMapClientSocketsStorage,
    oracle: SharedOracle,
}

impl HashMapSessionsStorage {
    pub fn new(sockets: HashMapClientSocketsStorage, oracle: SharedOracle) -> Self {
        Self {
            storage: Arc::default(),
            sockets,
            oracle,
        }
    }

    fn start_round_clock(&self, session_id: &str, session: &mut Session) {
        let storage_handle = self.clone();
        let session_id = session_id.to_string();
        session.timer.start(move |epoch| async move {
            storage_handle.run_round_clock(session_id, epoch).await;
        });
    }

    async fn run_round_clock(self, session_id: String, epoch: u64) {
        loop {
            tokio::time::sleep(Duration::from_secs(1)).await;
            let mut storage_guard = self.storage.write().await;
            let Some(session) = storage_guard.get_mut(&session_id) else {
                return;
            };
            // A newer round (or a restart) owns the clock now.
            if !session.timer.is_current(epoch) {
                return;
            }
            let mut commands = Vec::new();
            match session.engine.tick(self.oracle.as_ref(), &mut commands) {
                Ok(TickOutcome::Running { time_left_secs }) => {
                    let messages = [ServerSentSocketMessage::tick(time_left_secs)];
                    self.broadcast(&messages, &session.socket_ids).await;
                }
                Ok(TickOutcome::Resolved(resolution)) => {
                    session.timer.detach();
                    log_round_finished(&session_id, &resolution, "timeout");
                    let mut messages = vec![ServerSentSocketMessage::tick(0)];
                    messages.extend(ServerSentSocketMessage::map_commands(commands));
                    messages.extend(ServerSentSocketMessage::round_finished(resolution));
                    self.broadcast(&messages, &session.socket_ids).await;
                    return;
                }
                Err(err) => {
                    session.timer.detach();
                    tracing::warn!(
                        task = "round_clock",
                        session_id = %session_id,
                        error = %err,
                        "Round clock stopped."
                    );
                    return;
                }
            }
        }
    }

    /// Must be called with the session still locked, so that events of one
    /// session reach the sockets in the order they happened.
    async fn broadcast(&self, messages: &[ServerSentSocketMessage], socket_ids: &[usize]) {
        if socket_ids.is_empty() {
            return;
        }
        for raw_msg in messages.iter().filter_map(ServerSentSocketMessage::to_json) {
            self.sockets.broadcast_msg(&raw_msg, socket_ids).await;
        }
    }
}

impl ISessionStorage for HashMapSessionsStorage {}

impl SessionRepo for HashMapSessionsStorage {
    async fn exists(&self, session_id: &str) -> bool {
        self.storage.read().await.contains_key(session_id)
    }

    async fn create(
        &self,
        config: SessionConfig,
        catalog: &Catalog,
    ) -> Result<(String, SessionSnapshot), InitializationError> {
        let mut engine = RoundEngine::new(config);
        // Nobody is listening yet; clients get the snapshot instead.
        let mut commands: Vec<MapCommand> = Vec::new();
        engine.initialize(catalog, &mut commands)?;
        let mut session = Session {
            engine,
            timer: RoundTimer::default(),
            socket_ids: vec![],
        };
        let snapshot = session.engine.snapshot();

        let mut storage_guard = self.storage.write().await;
        let mut session_id = generate_session_id();
        while storage_guard.contains_key(&session_id) {
            session_id = generate_session_id();
        }
        self.start_round_clock(&session_id, &mut session);
        storage_guard.insert(session_id.clone(), session);
        tracing::info!(
            task = "session_created",
            session_id = %session_id,
            max_rounds = config.max_rounds,
            region = %config.region,
        );
        Ok((session_id, snapshot))
    }

    async fn remove(&self, session_id: &str) -> bool {
        let removed = self.storage.write().await.remove(session_id);
        match removed {
            Some(mut session) => {
                let clock_running = session.timer.is_running();
                session.timer.cancel();
                tracing::info!(
                    task = "session_removed",
                    session_id,
                    reason = "destroyed",
                    clock_running,
                );
                true
            }
            None => false,
        }
    }

    async fn snapshot(&self, session_id: &str) -> Result<SessionSnapshot, SessionActionError> {
        self.storage
            .read()
            .await
            .get(session_id)
            .map(|session| session.engine.snapshot())
            .ok_or(SessionActionError::SessionNotFound)
    }

    async fn summary(&self, session_id: &str) -> Result<GameSummary, SessionActionError> {
        self.storage
            .read()
            .await
            .get(session_id)
            .ok_or(SessionActionError::SessionNotFound)?
            .engine
            .summary()
            .ok_or(SessionActionError::GameNotOver)
    }
}

impl SessionGameFlowHandler for HashMapSessionsStorage {
    async fn start_round(&self, session_id: &str) -> Result<SessionSnapshot, SessionActionError> {
        let mut storage_guard = self.storage.write().await;
        let session = storage_guard
            .get_mut(session_id)
            .ok_or(SessionActionError::SessionNotFound)?;
        let mut commands = Vec::new();
        let start = session.engine.start_round(&mut commands)?;
        self.start_round_clock(session_id, session);
        let mut messages: Vec<_> = ServerSentSocketMessage::map_commands(commands).collect();
        messages.push(ServerSentSocketMessage::round_started(start));
        self.broadcast(&messages, &session.socket_ids).await;
        Ok(session.engine.snapshot())
    }

    async fn place_guess(
        &self,
        session_id: &str,
        position: LatLng,
    ) -> Result<SessionSnapshot, SessionActionError> {
        let mut storage_guard = self.storage.write().await;
        let session = storage_guard
            .get_mut(session_id)
            .ok_or(SessionActionError::SessionNotFound)?;
        let mut commands = Vec::new();
        session.engine.on_map_clicked(position, &mut commands)?;
        let mut messages: Vec<_> = ServerSentSocketMessage::map_commands(commands).collect();
        messages.push(ServerSentSocketMessage::guess_placed(position));
        self.broadcast(&messages, &session.socket_ids).await;
        Ok(session.engine.snapshot())
    }

    async fn submit_guess(
        &self,
        session_id: &str,
    ) -> Result<(RoundResolution, SessionSnapshot), SessionActionError> {
        let mut storage_guard = self.storage.write().await;
        let session = storage_guard
            .get_mut(session_id)
            .ok_or(SessionActionError::SessionNotFound)?;
        let mut commands = Vec::new();
        let resolution = session
            .engine
            .submit_guess(self.oracle.as_ref(), &mut commands)?;
        session.timer.cancel();
        log_round_finished(session_id, &resolution, "submitted");
        let mut messages: Vec<_> = ServerSentSocketMessage::map_commands(commands).collect();
        messages.extend(ServerSentSocketMessage::round_finished(resolution.clone()));
        self.broadcast(&messages, &session.socket_ids).await;
        Ok((resolution, session.engine.snapshot()))
    }

    async fn restart(&self, session_id: &str) -> Result<SessionSnapshot, SessionActionError> {
        let mut storage_guard = self.storage.write().await;
        let session = storage_guard
            .get_mut(session_id)
            .ok_or(SessionActionError::SessionNotFound)?;
        let mut commands = Vec::new();
        let start = session.engine.restart(&mut commands)?;
        self.start_round_clock(session_id, session);
        tracing::info!(task = "session_restarted", session_id);
        let mut messages: Vec<_> = ServerSentSocketMessage::map_commands(commands).collect();
        messages.push(ServerSentSocketMessage::round_started(start));
        self.broadcast(&messages, &session.socket_ids).await;
        Ok(session.engine.snapshot())
    }
}

impl SessionSocketsRepo for HashMapSessionsStorage {
    async fn add_socket(&self, session_id: &str, socket_id: usize) -> bool {
        match self.storage.write().await.get_mut(session_id) {
            Some(session) => {
                session.socket_ids.push(socket_id);
                true
            }
            None => false,
        }
    }

    async fn remove_socket(&self, session_id: &str, socket_id: usize) -> bool {
        let mut storage_guard = self.storage.write().await;
        let Some(session) = storage_guard.get_mut(session_id) else {
            return false;
        };
        session.socket_ids.retain(|&id| id != socket_id);
        if !session.socket_ids.is_empty() {
            return false;
        }
        // The last viewer left the game page.
        if let Some(mut session) = storage_guard.remove(session_id) {
            session.timer.cancel();
        }
        tracing::info!(task = "session_removed", session_id, reason = "last_socket_closed");
        true
    }
}

fn log_round_finished(session_id: &str, resolution: &RoundResolution, reason: &str) {
    tracing::info!(
        task = "round_finished",
        session_id,
        reason,
        round = resolution.record.round_index,
        target = %resolution.record.target_name,
        distance_km = resolution.record.distance_km,
        points = resolution.record.points,
        score = resolution.score,
        game_over = resolution.game_over,
    );
}

fn generate_session_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_ID_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::catalog::LocationEntry;
    use crate::map::models::Region;
    use crate::map::Haversine;
    use crate::sessions::consts::ROUND_DURATION_SECS;
    use crate::sessions::models::GamePhase;
    use axum::extract::ws::Message;
    use tokio::sync::mpsc;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            LocationEntry {
                name: String::from("Perth"),
                lat: -31.95,
                lng: 115.86,
                region: String::from("WA-S"),
            },
            LocationEntry {
                name: String::from("Hobart"),
                lat: -42.88,
                lng: 147.33,
                region: String::from("TAS"),
            },
        ])
    }

    fn storage() -> HashMapSessionsStorage {
        HashMapSessionsStorage::new(HashMapClientSocketsStorage::default(), Arc::new(Haversine))
    }

    fn config(max_rounds: u64) -> SessionConfig {
        SessionConfig {
            max_rounds,
            region: Region::AllRegions,
        }
    }

    async fn listen(
        storage: &HashMapSessionsStorage,
        session_id: &str,
    ) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let socket_id = storage.sockets.add(tx).await;
        assert!(storage.add_socket(session_id, socket_id).await);
        rx
    }

    fn received_types(rx: &mut mpsc::UnboundedReceiver<Message>) -> Vec<String> {
        let mut types = Vec::new();
        while let Ok(Message::Text(raw)) = rx.try_recv() {
            let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
            types.push(value["type"].as_str().unwrap().to_string());
        }
        types
    }

    async fn current_target(storage: &HashMapSessionsStorage, session_id: &str) -> LatLng {
        let storage_guard = storage.storage.read().await;
        let engine = &storage_guard.get(session_id).unwrap().engine;
        engine
            .catalog()
            .get(engine.state().current_target.unwrap())
            .unwrap()
            .position()
    }

    #[tokio::test]
    async fn create_fails_for_empty_region() {
        let storage = storage();
        let result = storage
            .create(
                SessionConfig {
                    max_rounds: 3,
                    region: Region::Victoria,
                },
                &catalog(),
            )
            .await;
        assert!(matches!(result, Err(InitializationError::EmptyCatalog(_))));
    }

    #[tokio::test]
    async fn unknown_session_is_reported() {
        let storage = storage();
        assert!(!storage.exists("nope").await);
        assert_eq!(
            storage.start_round("nope").await,
            Err(SessionActionError::SessionNotFound)
        );
        assert_eq!(
            storage.summary("nope").await,
            Err(SessionActionError::SessionNotFound)
        );
        assert!(!storage.remove("nope").await);
    }

    #[tokio::test]
    async fn a_full_round_is_broadcast() {
        let storage = storage();
        let (session_id, snapshot) = storage.create(config(1), &catalog()).await.unwrap();
        assert_eq!(snapshot.phase, GamePhase::RoundActive);
        assert_eq!(session_id.len(), SESSION_ID_LENGTH);
        let mut rx = listen(&storage, &session_id).await;

        let target = current_target(&storage, &session_id).await;
        storage.place_guess(&session_id, target).await.unwrap();
        let (resolution, snapshot) = storage.submit_guess(&session_id).await.unwrap();

        assert_eq!(resolution.record.points, 1000);
        assert_eq!(snapshot.phase, GamePhase::GameOver);
        assert_eq!(storage.summary(&session_id).await.unwrap().total_points, 1000);
        assert_eq!(
            received_types(&mut rx),
            vec![
                "MapCommand",
                "MapCommand",
                "GuessPlaced",
                "MapCommand",
                "MapCommand",
                "RoundFinished",
                "GameFinished",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn round_times_out_without_a_guess() {
        let storage = storage();
        let (session_id, _) = storage.create(config(3), &catalog()).await.unwrap();
        let mut rx = listen(&storage, &session_id).await;

        tokio::time::sleep(Duration::from_millis(ROUND_DURATION_SECS * 1000 + 500)).await;

        let snapshot = storage.snapshot(&session_id).await.unwrap();
        assert_eq!(snapshot.phase, GamePhase::RoundResolved);
        assert_eq!(snapshot.current_round, 2);
        assert_eq!(snapshot.history[0].points, 0);
        assert_eq!(snapshot.history[0].distance_km, None);
        let types = received_types(&mut rx);
        assert_eq!(
            types.iter().filter(|t| t.as_str() == "Tick").count(),
            ROUND_DURATION_SECS as usize
        );
        assert_eq!(types.last().map(String::as_str), Some("RoundFinished"));

        // The clock is gone: nothing else happens while waiting for "New Round".
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(received_types(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn new_round_runs_a_single_clock() {
        let storage = storage();
        let (session_id, _) = storage.create(config(3), &catalog()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2500)).await;
        let target = current_target(&storage, &session_id).await;
        storage.place_guess(&session_id, target).await.unwrap();
        storage.submit_guess(&session_id).await.unwrap();

        storage.start_round(&session_id).await.unwrap();
        tokio::time::sleep(Duration::from_millis(3500)).await;

        let snapshot = storage.snapshot(&session_id).await.unwrap();
        assert_eq!(snapshot.time_left_secs, ROUND_DURATION_SECS - 3);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_mid_round_replaces_the_clock() {
        let storage = storage();
        let (session_id, _) = storage.create(config(3), &catalog()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(4500)).await;

        let snapshot = storage.restart(&session_id).await.unwrap();
        assert_eq!(snapshot.time_left_secs, ROUND_DURATION_SECS);
        tokio::time::sleep(Duration::from_millis(2500)).await;

        let snapshot = storage.snapshot(&session_id).await.unwrap();
        assert_eq!(snapshot.current_round, 1);
        assert_eq!(snapshot.time_left_secs, ROUND_DURATION_SECS - 2);
    }

    #[tokio::test]
    async fn refused_actions_leave_the_session_alone() {
        let storage = storage();
        let (session_id, before) = storage.create(config(3), &catalog()).await.unwrap();
        assert_eq!(
            storage.submit_guess(&session_id).await,
            Err(SessionActionError::NoGuessPlaced)
        );
        assert_eq!(
            storage.start_round(&session_id).await,
            Err(SessionActionError::RoundInProgress)
        );
        assert_eq!(
            storage.summary(&session_id).await,
            Err(SessionActionError::GameNotOver)
        );
        let after = storage.snapshot(&session_id).await.unwrap();
        assert_eq!(after.history, before.history);
        assert_eq!(after.phase, before.phase);
    }

    #[tokio::test]
    async fn removing_a_session_cancels_its_clock() {
        let storage = storage();
        let (session_id, _) = storage.create(config(3), &catalog()).await.unwrap();
        assert!(storage.remove(&session_id).await);
        assert!(!storage.exists(&session_id).await);
        assert!(!storage.add_socket(&session_id, 1).await);
    }

    #[tokio::test]
    async fn last_socket_closing_removes_the_session() {
        let storage = storage();
        let (session_id, _) = storage.create(config(3), &catalog()).await.unwrap();
        let (tx_1, _rx_1) = mpsc::unbounded_channel();
        let (tx_2, _rx_2) = mpsc::unbounded_channel();
        let socket_1 = storage.sockets.add(tx_1).await;
        let socket_2 = storage.sockets.add(tx_2).await;
        assert!(storage.add_socket(&session_id, socket_1).await);
        assert!(storage.add_socket(&session_id, socket_2).await);

        assert!(!storage.remove_socket(&session_id, socket_1).await);
        assert!(storage.exists(&session_id).await);

        assert!(storage.remove_socket(&session_id, socket_2).await);
        assert!(!storage.exists(&session_id).await);
        assert!(!storage.remove_socket(&session_id, socket_2).await);
    }

    #[tokio::test(start_paused = true)]
    async fn no_tick_follows_a_submitted_round() {
        let storage = storage();
        let (session_id, _) = storage.create(config(3), &catalog()).await.unwrap();
        let mut rx = listen(&storage, &session_id).await;
        tokio::time::sleep(Duration::from_millis(2500)).await;

        let target = current_target(&storage, &session_id).await;
        storage.place_guess(&session_id, target).await.unwrap();
        storage.submit_guess(&session_id).await.unwrap();
        tokio::time::sleep(Duration::from_secs(3)).await;

        let types = received_types(&mut rx);
        let finished_at = types
            .iter()
            .position(|t| t == "RoundFinished")
            .expect("Round was not finished.");
        assert_eq!(types.iter().filter(|t| t.as_str() == "Tick").count(), 2);
        assert!(types[finished_at..].iter().all(|t| t != "Tick"));
    }
}
