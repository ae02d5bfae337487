use crate::map::models::{LatLng, Region, UnknownRegion};
use crate::sessions::consts::DEFAULT_ROUNDS_PER_GAME;
use crate::sessions::labels;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    pub max_rounds: u64,
    pub region: Region,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_ROUNDS_PER_GAME,
            region: Region::AllRegions,
        }
    }
}

impl SessionConfig {
    // `rounds` is read up to its first non-digit, so "10abc" is 10.
    pub fn from_launch_params(
        rounds: Option<&str>,
        area: Option<&str>,
    ) -> Result<Self, UnknownRegion> {
        let max_rounds = rounds
            .and_then(leading_integer)
            .filter(|&rounds| rounds > 0)
            .map(|rounds| rounds as u64)
            .unwrap_or(DEFAULT_ROUNDS_PER_GAME);
        let region = match area {
            Some(area) => area.parse()?,
            None => Region::AllRegions,
        };
        Ok(Self { max_rounds, region })
    }
}

fn leading_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|value| sign * value)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    Loading,
    RoundActive,
    RoundResolved,
    GameOver,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundRecord {
    pub round_index: u64,
    pub target_name: String,
    pub distance_km: Option<f64>,
    pub points: u64,
}

#[derive(Clone, Debug, Default)]
pub struct SessionState {
    pub current_round: u64,
    pub score: u64,
    pub used_targets: HashSet<usize>,
    pub current_target: Option<usize>,
    pub pending_guess: Option<LatLng>,
    pub time_remaining_secs: u64,
    pub round_active: bool,
    pub history: Vec<RoundRecord>,
}

impl SessionState {
    pub fn initial() -> Self {
        Self {
            current_round: 1,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundStart {
    pub round: u64,
    pub max_rounds: u64,
    pub target_name: String,
    pub time_left_secs: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundResolution {
    pub record: RoundRecord,
    pub score: u64,
    pub result_text: String,
    pub game_over: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<GameSummary>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
    Running { time_left_secs: u64 },
    Resolved(RoundResolution),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    pub round: u64,
    pub location: String,
    pub distance: String,
    pub points: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    pub rows: Vec<SummaryRow>,
    pub total_distance_km: f64,
    pub total_points: u64,
    pub text: String,
}

impl GameSummary {
    pub fn from_history(history: &[RoundRecord]) -> Self {
        let rows = history
            .iter()
            .map(|record| SummaryRow {
                round: record.round_index,
                location: record.target_name.clone(),
                distance: labels::distance_cell(record.distance_km),
                points: record.points,
            })
            .collect();
        let total_distance_km = history
            .iter()
            .map(|record| record.distance_km.unwrap_or(0.0))
            .sum();
        let total_points = history.iter().map(|record| record.points).sum();
        Self {
            rows,
            total_distance_km,
            total_points,
            text: labels::final_score(total_points),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: GamePhase,
    pub config: SessionConfig,
    pub current_round: u64,
    pub score: u64,
    pub time_left_secs: u64,
    pub pending_guess: Option<LatLng>,
    pub can_submit_guess: bool,
    pub can_start_round: bool,
    pub round_label: String,
    pub target_label: String,
    pub timer_label: String,
    pub result_label: String,
    pub score_label: String,
    pub history: Vec<RoundRecord>,
}
