//! Centralized balance and tuning constants for Daily Stella game logic.
//!
//! These values define the deterministic math for the core simulation and
//! the embedded defaults behind `GameConfig`. Tunables can be overridden
//! through config JSON; the seed derivation and storage/log keys are fixed
//! compatibility contracts and have no override path.

// Logging keys -------------------------------------------------------------
pub(crate) const DEBUG_ENV_VAR: &str = "STELLA_DEBUG_LOGS";
pub(crate) const LOG_GAME_START: &str = "log.game-start";
pub(crate) const LOG_ACTION_PREFIX: &str = "log.action.";
pub(crate) const LOG_TIMEOUT: &str = "log.timeout";
pub(crate) const LOG_PATIENCE_COLLAPSE: &str = "log.patience-collapse";
pub(crate) const LOG_GAME_OVER: &str = "log.game-over";
pub(crate) const LOG_LOCKED_OUT: &str = "log.locked-out";
pub(crate) const LOG_STATS_RECORDED: &str = "log.stats.recorded";
pub(crate) const LOG_STORE_READ_FAILED: &str = "log.store.read-failed";
pub(crate) const LOG_STORE_WRITE_FAILED: &str = "log.store.write-failed";
pub(crate) const LOG_STORE_PARSE_FAILED: &str = "log.store.parse-failed";

// Session baselines --------------------------------------------------------
pub(crate) const PATIENCE_START: i32 = 100;
pub(crate) const MOOD_START: i32 = 50;
pub(crate) const STAT_MIN: i32 = 0;
pub(crate) const STAT_MAX: i32 = 100;

// Timer tuning -------------------------------------------------------------
pub(crate) const ACTION_WINDOW_SECONDS: f64 = 10.0;
pub(crate) const TIMER_STEP_SECONDS: f64 = 0.25;
pub(crate) const TIME_EPSILON: f64 = 1e-9;
// Action name recorded for the synthetic window-expiry event.
pub(crate) const TIMEOUT_ACTION: &str = "timeout";

// Seed derivation ----------------------------------------------------------
pub(crate) const DAY_STRING_FORMAT: &str = "%a %b %d %Y";
pub(crate) const SINE_HASH_SCALE: f64 = 10_000.0;

// Storage keys -------------------------------------------------------------
pub(crate) const KEY_LAST_PLAY_DATE: &str = "stella.last-play-date";
pub(crate) const KEY_BEST_TIME: &str = "stella.best-time";
pub(crate) const KEY_STREAK: &str = "stella.streak";
pub(crate) const KEY_LAST_GAME_TIME: &str = "stella.last-game-time";
pub(crate) const KEY_LAST_GAME_ACTIONS: &str = "stella.last-game-actions";
pub(crate) const KEY_LAST_GAME_HISTORY: &str = "stella.last-game-history";

// Share template -----------------------------------------------------------
pub(crate) const SHARE_TITLE: &str = "🐾 Daily Stella";
pub(crate) const SHARE_FOOTER: &str = "dailystella.com";
pub(crate) const GLYPH_GREEN: &str = "🟩";
pub(crate) const GLYPH_YELLOW: &str = "🟨";
pub(crate) const GLYPH_ORANGE: &str = "🟧";
pub(crate) const GLYPH_RED: &str = "🟥";
pub(crate) const GLYPH_GAME_OVER: &str = "💀";

#[cfg(test)]
pub(crate) const FLOAT_EPSILON: f64 = 1e-9;
