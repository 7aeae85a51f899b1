//! Session state machine: Start -> Playing -> GameOver.
//!
//! The session is explicitly owned by the host and mutated only through its
//! own transition methods. Stat changes are applied as relative deltas and
//! clamped here, so a stray out-of-range delta can never corrupt the state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::GameConfig;
use crate::constants::{
    ACTION_WINDOW_SECONDS, DEBUG_ENV_VAR, LOG_ACTION_PREFIX, LOG_GAME_OVER, LOG_GAME_START,
    LOG_PATIENCE_COLLAPSE, LOG_TIMEOUT, MOOD_START, PATIENCE_START, STAT_MAX, STAT_MIN,
    TIME_EPSILON, TIMEOUT_ACTION,
};
use crate::numbers::clamp_usize_to_u32;
use crate::outcome::{OutcomeTier, TierEffect};
use crate::seed::{action_seed, daily_seed};

#[cfg(debug_assertions)]
fn debug_log_enabled() -> bool {
    matches!(std::env::var(DEBUG_ENV_VAR), Ok(val) if val != "0")
}

#[cfg(not(debug_assertions))]
const fn debug_log_enabled() -> bool {
    false
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GamePhase {
    #[default]
    Start,
    Playing,
    GameOver,
}

/// Why the session ended. Patience exhaustion and window expiry are the only
/// two paths out of `Playing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ending {
    PatienceExhausted,
    TimedOut,
}

impl Ending {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::PatienceExhausted => "patience_exhausted",
            Self::TimedOut => "timed_out",
        }
    }
}

/// Immutable record of one resolved action (or the synthetic timeout).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEvent {
    pub action: String,
    pub occurrence: u32,
    pub tier: OutcomeTier,
    pub patience_delta: i32,
    pub mood_delta: i32,
    #[serde(default)]
    pub timed_out: bool,
}

/// A single day's play session.
///
/// The presentation layer reads fields to render and calls `begin`,
/// `perform_action`, and `tick` in response to input and the countdown
/// driver. Calls that are invalid for the current phase are silent no-ops,
/// so a racing caller cannot corrupt the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub date: NaiveDate,
    pub seed: u32,
    pub phase: GamePhase,
    pub patience: i32,
    pub mood: i32,
    pub time_left: f64,
    #[serde(default)]
    pub elapsed: f64,
    #[serde(default)]
    pub action_counts: HashMap<String, u32>,
    #[serde(default)]
    pub history: Vec<ActionEvent>,
    #[serde(default)]
    pub ending: Option<Ending>,
    #[serde(default)]
    pub logs: Vec<String>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new_for_date(NaiveDate::default())
    }
}

impl GameState {
    /// Fresh idle session for a calendar date, seed precomputed.
    #[must_use]
    pub fn new_for_date(date: NaiveDate) -> Self {
        Self {
            date,
            seed: daily_seed(date),
            phase: GamePhase::Start,
            patience: PATIENCE_START,
            mood: MOOD_START,
            time_left: ACTION_WINDOW_SECONDS,
            elapsed: 0.0,
            action_counts: HashMap::new(),
            history: Vec::new(),
            ending: None,
            logs: Vec::new(),
        }
    }

    /// Override the daily seed, for replaying a specific day's draws.
    #[must_use]
    pub const fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub const fn is_playing(&self) -> bool {
        matches!(self.phase, GamePhase::Playing)
    }

    #[must_use]
    pub const fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver)
    }

    /// Player actions taken so far, excluding the synthetic timeout event.
    #[must_use]
    pub fn action_count(&self) -> u32 {
        clamp_usize_to_u32(self.history.iter().filter(|e| !e.timed_out).count())
    }

    /// Tier of every history event in order, timeout included.
    #[must_use]
    pub fn tier_sequence(&self) -> Vec<OutcomeTier> {
        self.history.iter().map(|e| e.tier).collect()
    }

    /// Transition from `Start` to `Playing` with baseline stats.
    ///
    /// The daily lock is enforced by the facade before delegating here; the
    /// state machine itself only guards the phase.
    pub fn begin(&mut self, cfg: &GameConfig) {
        if self.phase != GamePhase::Start {
            return;
        }
        self.patience = cfg.patience_start;
        self.mood = cfg.mood_start;
        self.time_left = cfg.action_window_seconds;
        self.elapsed = 0.0;
        self.action_counts.clear();
        self.history.clear();
        self.ending = None;
        self.phase = GamePhase::Playing;
        self.push_log(LOG_GAME_START);
    }

    /// Resolve one player action: draw, tier, clamped deltas, history append,
    /// window reset. Returns the appended event, or `None` outside `Playing`.
    pub fn perform_action(&mut self, action: &str, cfg: &GameConfig) -> Option<&ActionEvent> {
        if self.phase != GamePhase::Playing {
            return None;
        }
        let occurrence = self.action_counts.get(action).copied().unwrap_or(0);
        let draw = action_seed(action, occurrence, self.seed);
        let (tier, effect) = cfg.outcomes.resolve(draw);
        let patience_before = self.patience;
        self.apply_effect(effect);
        if debug_log_enabled() {
            println!(
                "Action '{action}' #{occurrence} | draw {draw:.4} -> {tier} | patience {patience_before} -> {}",
                self.patience
            );
        }
        self.history.push(ActionEvent {
            action: action.to_string(),
            occurrence,
            tier,
            patience_delta: effect.patience,
            mood_delta: effect.mood,
            timed_out: false,
        });
        self.action_counts
            .insert(action.to_string(), occurrence.saturating_add(1));
        self.time_left = cfg.action_window_seconds;
        self.push_log(&format!("{}{}", LOG_ACTION_PREFIX, tier.as_str()));
        if self.patience <= STAT_MIN {
            self.push_log(LOG_PATIENCE_COLLAPSE);
            self.finish(Ending::PatienceExhausted);
        }
        self.history.last()
    }

    /// Advance the countdown by `delta` seconds.
    ///
    /// Elapsed time accrues only while the window is open, so a late or
    /// oversized delta cannot inflate the recorded time. On expiry exactly
    /// one synthetic timeout event is appended and the session ends; repeat
    /// calls after that are no-ops via the phase guard.
    pub fn tick(&mut self, delta: f64, cfg: &GameConfig) {
        if self.phase != GamePhase::Playing {
            return;
        }
        if !delta.is_finite() || delta <= 0.0 {
            return;
        }
        let consumed = delta.min(self.time_left);
        self.elapsed += consumed;
        self.time_left -= consumed;
        // Snap float residue so the timeout decision is cadence-independent.
        if self.time_left <= TIME_EPSILON {
            self.time_left = 0.0;
            self.apply_timeout(cfg);
        }
    }

    fn apply_timeout(&mut self, cfg: &GameConfig) {
        let (tier, effect) = cfg.outcomes.timeout_effect();
        self.apply_effect(effect);
        if debug_log_enabled() {
            println!(
                "Timeout after {:.1}s -> {tier} | patience {}",
                self.elapsed, self.patience
            );
        }
        self.history.push(ActionEvent {
            action: TIMEOUT_ACTION.to_string(),
            occurrence: 0,
            tier,
            patience_delta: effect.patience,
            mood_delta: effect.mood,
            timed_out: true,
        });
        self.push_log(LOG_TIMEOUT);
        self.finish(Ending::TimedOut);
    }

    fn apply_effect(&mut self, effect: TierEffect) {
        self.patience = (self.patience + effect.patience).clamp(STAT_MIN, STAT_MAX);
        self.mood = (self.mood + effect.mood).clamp(STAT_MIN, STAT_MAX);
    }

    fn finish(&mut self, ending: Ending) {
        self.set_ending(ending);
        self.phase = GamePhase::GameOver;
        self.push_log(LOG_GAME_OVER);
    }

    fn set_ending(&mut self, ending: Ending) {
        if self.ending.is_none() {
            self.ending = Some(ending);
        }
    }

    fn push_log(&mut self, key: &str) {
        self.logs.push(String::from(key));
    }
}

/// Presentation label for a mood value.
#[must_use]
pub const fn mood_label(mood: i32) -> &'static str {
    match mood {
        i32::MIN..=19 => "miserable",
        20..=39 => "grumpy",
        40..=59 => "content",
        60..=79 => "happy",
        _ => "delighted",
    }
}
