//! Daily Stella Game Engine
//!
//! Platform-agnostic core logic for Daily Stella, a one-session-per-day
//! virtual pet game. This crate provides all game mechanics without UI or
//! platform-specific dependencies.

pub mod actions;
pub mod constants;
pub mod numbers;
pub mod outcome;
pub mod persist;
pub mod result;
pub mod seed;
pub mod session;
pub mod share;
pub mod timer;

// Re-export commonly used types
pub use actions::ActionId;
pub use outcome::{ConfigError, OutcomeTable, OutcomeTier, TierBand, TierEffect};
pub use persist::{HistoryEntry, KvStore, MemoryStore, PersistedStats, StatsStore};
pub use result::{ResultSummary, result_summary};
pub use seed::{action_seed, canonical_day_string, char_sum, daily_seed, day_string_seed, today};
pub use session::{ActionEvent, Ending, GamePhase, GameState, mood_label};
pub use share::{format_share, share_text, tier_glyph};
pub use timer::CountdownDriver;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{
    ACTION_WINDOW_SECONDS, LOG_LOCKED_OUT, LOG_STATS_RECORDED, MOOD_START, PATIENCE_START,
    STAT_MAX, STAT_MIN, TIMER_STEP_SECONDS,
};

/// Tunable session configuration: stat baselines, the action window, and the
/// outcome table. Everything balance can adjust without touching the state
/// machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default = "GameConfig::default_patience_start")]
    pub patience_start: i32,
    #[serde(default = "GameConfig::default_mood_start")]
    pub mood_start: i32,
    #[serde(default = "GameConfig::default_action_window_seconds")]
    pub action_window_seconds: f64,
    #[serde(default = "GameConfig::default_timer_step_seconds")]
    pub timer_step_seconds: f64,
    #[serde(default)]
    pub outcomes: OutcomeTable,
}

impl Eq for GameConfig {}

impl GameConfig {
    const fn default_patience_start() -> i32 {
        PATIENCE_START
    }

    const fn default_mood_start() -> i32 {
        MOOD_START
    }

    const fn default_action_window_seconds() -> f64 {
        ACTION_WINDOW_SECONDS
    }

    const fn default_timer_step_seconds() -> f64 {
        TIMER_STEP_SECONDS
    }

    /// Get embedded default configuration
    #[must_use]
    pub fn default_config() -> Self {
        Self {
            patience_start: Self::default_patience_start(),
            mood_start: Self::default_mood_start(),
            action_window_seconds: Self::default_action_window_seconds(),
            timer_step_seconds: Self::default_timer_step_seconds(),
            outcomes: OutcomeTable::default_config(),
        }
    }

    /// Parse configuration from a JSON string. Absent fields keep their
    /// defaults; the merged result is validated before it is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON string cannot be parsed or if validation fails.
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        let cfg: Self =
            serde_json::from_str(json_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate tuning invariants.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a window or step is not a positive finite
    /// number, a stat baseline leaves the clamp range, or the outcome table
    /// is inconsistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.action_window_seconds.is_finite() || self.action_window_seconds <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "action_window_seconds",
                value: self.action_window_seconds,
            });
        }
        if !self.timer_step_seconds.is_finite() || self.timer_step_seconds <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "timer_step_seconds",
                value: self.timer_step_seconds,
            });
        }
        if !(STAT_MIN..=STAT_MAX).contains(&self.patience_start) {
            return Err(ConfigError::StatRange {
                field: "patience_start",
                min: STAT_MIN,
                max: STAT_MAX,
                value: self.patience_start,
            });
        }
        if !(STAT_MIN..=STAT_MAX).contains(&self.mood_start) {
            return Err(ConfigError::StatRange {
                field: "mood_start",
                min: STAT_MIN,
                max: STAT_MAX,
                value: self.mood_start,
            });
        }
        self.outcomes.validate()
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

/// Main engine for one calendar day.
///
/// Wires the session state machine to the persistence layer: enforces the
/// daily lock at start, and records stats plus the result summary exactly
/// once when the session reaches game over.
pub struct DailyGame<S: KvStore> {
    config: GameConfig,
    stats: StatsStore<S>,
    snapshot: PersistedStats,
    state: GameState,
    driver: CountdownDriver,
    summary: Option<ResultSummary>,
    recorded: bool,
}

impl<S: KvStore> DailyGame<S> {
    /// Create the engine for `date`, reading the persisted snapshot once.
    pub fn new(store: S, config: GameConfig, date: NaiveDate) -> Self {
        let mut stats = StatsStore::new(store);
        let snapshot = stats.load();
        let mut state = GameState::new_for_date(date);
        state.logs.extend(stats.take_logs());
        let driver = CountdownDriver::from_config(&config);
        Self {
            config,
            stats,
            snapshot,
            state,
            driver,
            summary: None,
            recorded: false,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Stats as read at session start, replaced by the updated stats once
    /// the finished game has been recorded.
    #[must_use]
    pub const fn stats(&self) -> &PersistedStats {
        &self.snapshot
    }

    /// Result summary of the finished game, `None` while the day is open.
    #[must_use]
    pub fn result(&self) -> Option<&ResultSummary> {
        self.summary.as_ref()
    }

    /// Share card for the finished game, `None` while the day is open.
    #[must_use]
    pub fn share_card(&self) -> Option<String> {
        self.summary.as_ref().map(share_text)
    }

    /// Recover the underlying store, e.g. to open the next day's session.
    pub fn into_store(self) -> S {
        self.stats.into_inner()
    }

    /// Begin today's session. Refused when the daily lock is held or the
    /// session already started.
    pub fn start_game(&mut self) -> bool {
        if self.state.phase != GamePhase::Start {
            return false;
        }
        if self.stats.has_played_today(self.state.date) {
            self.state.logs.push(String::from(LOG_LOCKED_OUT));
            self.state.logs.extend(self.stats.take_logs());
            return false;
        }
        self.state.logs.extend(self.stats.take_logs());
        self.state.begin(&self.config);
        self.state.is_playing()
    }

    /// Resolve one action by id.
    pub fn perform_action(&mut self, action: ActionId) -> Option<&ActionEvent> {
        self.perform_named_action(action.as_str())
    }

    /// Resolve one action by name. The name is hashed as-is, so names
    /// outside the built-in roster still draw deterministically.
    pub fn perform_named_action(&mut self, action: &str) -> Option<&ActionEvent> {
        let resolved = self.state.perform_action(action, &self.config).is_some();
        self.finalize_if_over();
        if resolved { self.state.history.last() } else { None }
    }

    /// Advance the countdown; expiry ends the game through the timeout path.
    pub fn tick(&mut self, delta: f64) {
        self.state.tick(delta, &self.config);
        self.finalize_if_over();
    }

    /// Feed wall-clock time through the fixed-step driver instead of `tick`.
    /// Cadence-independent: only whole steps reach the session, the rest
    /// carries over to the next call.
    pub fn advance(&mut self, delta: f64) {
        self.driver.advance(&mut self.state, &self.config, delta);
        self.finalize_if_over();
    }

    // Record stats and build the result at most once per session, no matter
    // how often the game-over phase is observed.
    fn finalize_if_over(&mut self) {
        if self.recorded || !self.state.is_over() {
            return;
        }
        self.recorded = true;
        self.snapshot = self.stats.record_game_end(
            self.state.date,
            self.state.elapsed,
            self.state.action_count(),
            &self.state.history,
        );
        self.state.logs.push(String::from(LOG_STATS_RECORDED));
        self.state.logs.extend(self.stats.take_logs());
        self.summary = Some(result_summary(&self.state, &self.snapshot));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn engine_runs_a_full_day_and_records_stats() {
        let store = MemoryStore::default();
        let mut game = DailyGame::new(
            store.clone(),
            GameConfig::default_config(),
            day(2025, 11, 19),
        );
        assert!(game.start_game());

        // Seed 998: groom and treat open Terrible, pet opens Bad, which
        // drains patience 100 -> 60 -> 20 -> 0.
        game.tick(2.0);
        assert_eq!(
            game.perform_action(ActionId::Groom).map(|e| e.tier),
            Some(OutcomeTier::Terrible)
        );
        game.tick(2.0);
        assert_eq!(
            game.perform_action(ActionId::Treat).map(|e| e.tier),
            Some(OutcomeTier::Terrible)
        );
        game.tick(2.0);
        assert_eq!(
            game.perform_action(ActionId::Pet).map(|e| e.tier),
            Some(OutcomeTier::Bad)
        );

        assert!(game.state().is_over());
        assert_eq!(game.state().ending, Some(Ending::PatienceExhausted));
        assert_eq!(game.stats().streak, 1);
        assert_eq!(game.stats().best_time, Some(6.0));
        assert_eq!(game.stats().last_game_action_count, 3);
        assert_eq!(game.stats().last_game_history.len(), 3);
        assert_eq!(
            store.get("stella.last-play-date").unwrap().as_deref(),
            Some("Wed Nov 19 2025")
        );

        let summary = game.result().expect("finished game has a result");
        assert_eq!(summary.action_count, 3);
        assert_eq!(summary.streak, 1);
        let card = game.share_card().expect("finished game has a card");
        assert_eq!(card.lines().count(), 5);
        assert_eq!(card.lines().nth(3), Some("🟥🟥🟥💀"));
    }

    #[test]
    fn daily_lock_rejects_a_second_session() {
        let store = MemoryStore::default();
        let date = day(2025, 11, 19);
        let mut first = DailyGame::new(store.clone(), GameConfig::default_config(), date);
        assert!(first.start_game());
        first.tick(first.config().action_window_seconds);
        assert!(first.state().is_over());

        let mut second = DailyGame::new(store, GameConfig::default_config(), date);
        assert!(!second.start_game());
        assert_eq!(second.state().phase, GamePhase::Start);
        assert!(second.state().logs.iter().any(|l| l == "log.locked-out"));
    }

    #[test]
    fn a_timeout_day_extends_the_streak() {
        let store = MemoryStore::default();
        let mut first_day = DailyGame::new(
            store.clone(),
            GameConfig::default_config(),
            day(2025, 11, 19),
        );
        assert!(first_day.start_game());
        first_day.tick(10.0);
        assert_eq!(first_day.state().ending, Some(Ending::TimedOut));
        assert_eq!(first_day.stats().streak, 1);

        let mut next_day = DailyGame::new(
            first_day.into_store(),
            GameConfig::default_config(),
            day(2025, 11, 20),
        );
        assert!(next_day.start_game());
        next_day.tick(10.0);
        assert_eq!(next_day.stats().streak, 2);
        assert_eq!(store.get("stella.streak").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn game_over_is_recorded_exactly_once() {
        let store = MemoryStore::default();
        let mut game = DailyGame::new(
            store.clone(),
            GameConfig::default_config(),
            day(2025, 11, 19),
        );
        assert!(game.start_game());
        game.tick(10.0);
        assert!(game.state().is_over());

        // Stray calls after game over must not re-open or re-record.
        game.tick(5.0);
        assert!(game.perform_action(ActionId::Feed).is_none());
        assert_eq!(game.stats().streak, 1);
        assert_eq!(store.get("stella.streak").unwrap().as_deref(), Some("1"));
        let recorded = game
            .state()
            .logs
            .iter()
            .filter(|l| *l == "log.stats.recorded")
            .count();
        assert_eq!(recorded, 1);
    }

    #[test]
    fn config_overrides_merge_with_defaults() {
        let cfg = GameConfig::from_json(r#"{"action_window_seconds":5.0}"#).unwrap();
        assert!((cfg.action_window_seconds - 5.0).abs() < f64::EPSILON);
        assert_eq!(cfg.patience_start, 100);
        assert_eq!(cfg.mood_start, 50);
        assert_eq!(cfg.outcomes, OutcomeTable::default_config());

        assert_eq!(GameConfig::from_json("{}").unwrap(), GameConfig::default_config());
    }

    #[test]
    fn config_validation_rejects_bad_tuning() {
        assert_eq!(
            GameConfig::from_json(r#"{"action_window_seconds":-1.0}"#),
            Err(ConfigError::NonPositive {
                field: "action_window_seconds",
                value: -1.0,
            })
        );
        assert_eq!(
            GameConfig::from_json(r#"{"timer_step_seconds":0.0}"#),
            Err(ConfigError::NonPositive {
                field: "timer_step_seconds",
                value: 0.0,
            })
        );
        assert_eq!(
            GameConfig::from_json(r#"{"patience_start":150}"#),
            Err(ConfigError::StatRange {
                field: "patience_start",
                min: 0,
                max: 100,
                value: 150,
            })
        );
        assert!(GameConfig::from_json("not json").is_err());
    }
}
