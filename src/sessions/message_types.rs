use crate::map::display;
use crate::map::models::LatLng;
use crate::sessions::models::{GameSummary, RoundResolution, RoundStart, SessionSnapshot};
use serde::{Deserialize, Serialize};
use serde_unit_struct::{Deserialize_unit_struct, Serialize_unit_struct};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ClientSentSocketMessage {
    Ping {
        #[allow(dead_code)]
        // Only pattern-matched on.
        r#type: Ping,
    },
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ServerSentSocketMessage {
    Snapshot {
        r#type: Snapshot,
        payload: Box<SessionSnapshot>,
    },
    RoundStarted {
        r#type: RoundStarted,
        payload: RoundStart,
    },
    Tick {
        r#type: Tick,
        payload: u64,
    },
    GuessPlaced {
        r#type: GuessPlaced,
        payload: LatLng,
    },
    RoundFinished {
        r#type: RoundFinished,
        payload: RoundResolution,
    },
    GameFinished {
        r#type: GameFinished,
        payload: GameSummary,
    },
    MapCommand {
        r#type: MapCommand,
        payload: display::MapCommand,
    },
    Pong {
        r#type: Pong,
    },
}

impl ServerSentSocketMessage {
    pub fn snapshot(snapshot: SessionSnapshot) -> Self {
        Self::Snapshot {
            r#type: Snapshot,
            payload: Box::new(snapshot),
        }
    }

    pub fn round_started(start: RoundStart) -> Self {
        Self::RoundStarted {
            r#type: RoundStarted,
            payload: start,
        }
    }

    pub fn tick(time_left_secs: u64) -> Self {
        Self::Tick {
            r#type: Tick,
            payload: time_left_secs,
        }
    }

    pub fn guess_placed(position: LatLng) -> Self {
        Self::GuessPlaced {
            r#type: GuessPlaced,
            payload: position,
        }
    }

    /// `RoundFinished`, followed by `GameFinished` if that was the last round.
    pub fn round_finished(resolution: RoundResolution) -> Vec<Self> {
        let game_finished = resolution.summary.clone().map(|summary| Self::GameFinished {
            r#type: GameFinished,
            payload: summary,
        });
        let mut messages = vec![Self::RoundFinished {
            r#type: RoundFinished,
            payload: resolution,
        }];
        messages.extend(game_finished);
        messages
    }

    pub fn map_commands(commands: Vec<display::MapCommand>) -> impl Iterator<Item = Self> {
        commands.into_iter().map(|command| Self::MapCommand {
            r#type: MapCommand,
            payload: command,
        })
    }

    pub fn pong() -> Self {
        Self::Pong { r#type: Pong }
    }

    pub fn to_json(&self) -> Option<String> {
        match serde_json::to_string(self) {
            Ok(raw) => Some(raw),
            Err(err) => {
                tracing::error!(error = %err, "Failed to serialize a socket message.");
                None
            }
        }
    }
}

#[derive(Debug, Serialize_unit_struct, Deserialize_unit_struct)]
pub struct Snapshot;

#[derive(Debug, Serialize_unit_struct, Deserialize_unit_struct)]
pub struct RoundStarted;

#[derive(Debug, Serialize_unit_struct, Deserialize_unit_struct)]
pub struct Tick;

#[derive(Debug, Serialize_unit_struct, Deserialize_unit_struct)]
pub struct GuessPlaced;

#[derive(Debug, Serialize_unit_struct, Deserialize_unit_struct)]
pub struct RoundFinished;

#[derive(Debug, Serialize_unit_struct, Deserialize_unit_struct)]
pub struct GameFinished;

#[derive(Debug, Serialize_unit_struct, Deserialize_unit_struct)]
pub struct MapCommand;

#[derive(Debug, Serialize_unit_struct, Deserialize_unit_struct)]
pub struct Ping;

#[derive(Debug, Serialize_unit_struct, Deserialize_unit_struct)]
pub struct Pong;
