use crate::map::catalog::{Catalog, EmptyCatalogError};
use crate::map::consts::REVEAL_ZOOM;
use crate::map::display::MapDisplay;
use crate::map::models::{LatLng, MapView};
use crate::map::scoring::points_for_distance;
use crate::map::DistanceOracle;
use crate::sessions::consts::ROUND_DURATION_SECS;
use crate::sessions::labels;
use crate::sessions::models::{
    GamePhase, GameSummary, RoundRecord, RoundResolution, RoundStart, SessionConfig,
    SessionSnapshot, SessionState, TickOutcome,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::fmt;

/// Reasons an operation was refused. A refused operation leaves the session
/// untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EngineError {
    NotInitialized,
    AlreadyInitialized,
    RoundNotActive,
    NoGuessPlaced,
    RoundInProgress,
    GameOver,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::NotInitialized => "the session has not been initialized",
            Self::AlreadyInitialized => "the session is already initialized",
            Self::RoundNotActive => "no round is active",
            Self::NoGuessPlaced => "no guess has been placed",
            Self::RoundInProgress => "the current round is still in progress",
            Self::GameOver => "the game is over",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for EngineError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitializationError {
    EmptyCatalog(EmptyCatalogError),
    Engine(EngineError),
}

impl fmt::Display for InitializationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCatalog(err) => err.fmt(f),
            Self::Engine(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for InitializationError {}

/// Game state machine of a single play-through:
/// `Loading -> RoundActive -> RoundResolved -> (RoundActive | GameOver)`,
/// and `GameOver -> RoundActive` on restart.
///
/// The engine never waits on anything. Callers feed it clicks, button
/// presses and one `tick` per second, and it reports map commands through
/// the `MapDisplay` passed to each operation.
pub struct RoundEngine {
    config: SessionConfig,
    catalog: Catalog,
    state: SessionState,
    phase: GamePhase,
    last_result: Option<String>,
    rng: StdRng,
}

impl RoundEngine {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_rng(config: SessionConfig, rng: StdRng) -> Self {
        Self {
            config,
            catalog: Catalog::default(),
            state: SessionState::initial(),
            phase: GamePhase::Loading,
            last_result: None,
            rng,
        }
    }

    #[cfg(test)]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[cfg(test)]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[cfg(test)]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Narrows `catalog` down to the configured region and starts round 1.
    pub fn initialize(
        &mut self,
        catalog: &Catalog,
        display: &mut impl MapDisplay,
    ) -> Result<RoundStart, InitializationError> {
        if self.phase != GamePhase::Loading {
            return Err(InitializationError::Engine(EngineError::AlreadyInitialized));
        }
        self.catalog = catalog
            .for_region(self.config.region)
            .map_err(InitializationError::EmptyCatalog)?;
        Ok(self.begin_round(display))
    }

    pub fn start_round(&mut self, display: &mut impl MapDisplay) -> Result<RoundStart, EngineError> {
        match self.phase {
            GamePhase::Loading => Err(EngineError::NotInitialized),
            GamePhase::RoundActive => Err(EngineError::RoundInProgress),
            GamePhase::GameOver => Err(EngineError::GameOver),
            GamePhase::RoundResolved => Ok(self.begin_round(display)),
        }
    }

    pub fn on_map_clicked(
        &mut self,
        position: LatLng,
        display: &mut impl MapDisplay,
    ) -> Result<(), EngineError> {
        if !self.accepts_guesses() {
            return Err(EngineError::RoundNotActive);
        }
        self.state.pending_guess = Some(position);
        display.clear_guess_marker();
        display.place_guess_marker(position);
        Ok(())
    }

    /// Advances the round clock by one second, resolving the round once it
    /// runs out.
    pub fn tick(
        &mut self,
        oracle: &dyn DistanceOracle,
        display: &mut impl MapDisplay,
    ) -> Result<TickOutcome, EngineError> {
        if !self.accepts_guesses() {
            return Err(EngineError::RoundNotActive);
        }
        self.state.time_remaining_secs -= 1;
        if self.state.time_remaining_secs > 0 {
            return Ok(TickOutcome::Running {
                time_left_secs: self.state.time_remaining_secs,
            });
        }
        self.resolve_round(oracle, display).map(TickOutcome::Resolved)
    }

    pub fn submit_guess(
        &mut self,
        oracle: &dyn DistanceOracle,
        display: &mut impl MapDisplay,
    ) -> Result<RoundResolution, EngineError> {
        if !self.accepts_guesses() {
            return Err(EngineError::RoundNotActive);
        }
        if self.state.pending_guess.is_none() {
            return Err(EngineError::NoGuessPlaced);
        }
        self.resolve_round(oracle, display)
    }

    pub fn restart(&mut self, display: &mut impl MapDisplay) -> Result<RoundStart, EngineError> {
        if self.phase == GamePhase::Loading {
            return Err(EngineError::NotInitialized);
        }
        self.state = SessionState::initial();
        display.clear_all_target_markers();
        Ok(self.begin_round(display))
    }

    pub fn summary(&self) -> Option<GameSummary> {
        match self.phase {
            GamePhase::GameOver => Some(GameSummary::from_history(&self.state.history)),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let game_over = self.phase == GamePhase::GameOver;
        let displayed_round = match self.phase {
            GamePhase::RoundResolved | GamePhase::GameOver => self.state.current_round - 1,
            GamePhase::Loading | GamePhase::RoundActive => self.state.current_round,
        };
        let target_label = match self.current_target_name() {
            Some(name) if !game_over => labels::target(name),
            _ => String::new(),
        };
        let timer_label = match self.phase {
            GamePhase::RoundActive | GamePhase::RoundResolved => {
                labels::timer(self.state.time_remaining_secs)
            }
            GamePhase::Loading | GamePhase::GameOver => String::new(),
        };
        let result_label = match (&self.last_result, game_over) {
            (_, true) => labels::final_score(self.state.score),
            (Some(result), false) => result.clone(),
            (None, false) => String::new(),
        };
        SessionSnapshot {
            phase: self.phase,
            config: self.config,
            current_round: self.state.current_round,
            score: self.state.score,
            time_left_secs: self.state.time_remaining_secs,
            pending_guess: self.state.pending_guess,
            can_submit_guess: self.accepts_guesses() && self.state.pending_guess.is_some(),
            can_start_round: self.phase == GamePhase::RoundResolved,
            round_label: labels::round(displayed_round, self.config.max_rounds),
            target_label,
            timer_label,
            result_label,
            score_label: labels::score(self.state.score),
            history: self.state.history.clone(),
        }
    }

    fn accepts_guesses(&self) -> bool {
        self.phase == GamePhase::RoundActive
            && self.state.round_active
            && self.state.time_remaining_secs > 0
    }

    fn current_target_name(&self) -> Option<&str> {
        self.state
            .current_target
            .and_then(|index| self.catalog.get(index))
            .map(|entry| entry.name.as_str())
    }

    fn begin_round(&mut self, display: &mut impl MapDisplay) -> RoundStart {
        if self.state.used_targets.len() >= self.catalog.len() {
            self.state.used_targets.clear();
        }
        let available: Vec<usize> = (0..self.catalog.len())
            .filter(|index| !self.state.used_targets.contains(index))
            .collect();
        // `available` is never empty: the catalog isn't, and the used set was
        // just cleared if it covered every entry.
        let target = available[self.rng.gen_range(0..available.len())];
        self.state.used_targets.insert(target);
        self.state.current_target = Some(target);
        self.state.pending_guess = None;
        self.state.time_remaining_secs = ROUND_DURATION_SECS;
        self.state.round_active = true;
        self.phase = GamePhase::RoundActive;
        self.last_result = None;

        display.clear_guess_marker();
        display.set_view(self.config.region.default_view());

        let target_name = self.catalog.entries()[target].name.clone();
        tracing::debug!(
            round = self.state.current_round,
            target = %target_name,
            "Round started."
        );
        RoundStart {
            round: self.state.current_round,
            max_rounds: self.config.max_rounds,
            target_name,
            time_left_secs: ROUND_DURATION_SECS,
        }
    }

    /// Scores the pending guess (if any) and closes the round. Everything is
    /// computed before the first mutation, so a failure leaves no trace.
    fn resolve_round(
        &mut self,
        oracle: &dyn DistanceOracle,
        display: &mut impl MapDisplay,
    ) -> Result<RoundResolution, EngineError> {
        let target = self
            .state
            .current_target
            .and_then(|index| self.catalog.get(index))
            .ok_or(EngineError::RoundNotActive)?;
        let target_position = target.position();
        let (distance_km, result_text) = match self.state.pending_guess {
            None => (None, labels::TIMEOUT_RESULT.to_string()),
            Some(guess) => match oracle.distance_km(guess, target_position) {
                Ok(distance_km) => {
                    let points = points_for_distance(distance_km);
                    (
                        Some(distance_km),
                        labels::scored_result(distance_km, points),
                    )
                }
                Err(err) => {
                    tracing::warn!(
                        round = self.state.current_round,
                        error = %err,
                        "Resolving the round as unscored."
                    );
                    (None, labels::DISTANCE_UNAVAILABLE_RESULT.to_string())
                }
            },
        };
        let points = distance_km.map(points_for_distance).unwrap_or(0);
        let record = RoundRecord {
            round_index: self.state.current_round,
            target_name: target.name.clone(),
            distance_km,
            points,
        };

        self.state.history.push(record.clone());
        self.state.score += points;
        self.state.round_active = false;
        self.state.current_round += 1;
        self.last_result = Some(result_text.clone());
        display.place_target_marker(target_position);
        display.set_view(MapView {
            center: target_position,
            zoom: REVEAL_ZOOM,
        });

        let game_over = self.state.current_round > self.config.max_rounds;
        let summary = if game_over {
            self.phase = GamePhase::GameOver;
            Some(GameSummary::from_history(&self.state.history))
        } else {
            self.phase = GamePhase::RoundResolved;
            None
        };
        Ok(RoundResolution {
            record,
            score: self.state.score,
            result_text,
            game_over,
            summary,
        })
    }
}
