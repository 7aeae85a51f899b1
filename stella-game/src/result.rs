//! End game result calculation
use serde::{Deserialize, Serialize};

use crate::outcome::OutcomeTier;
use crate::persist::PersistedStats;
use crate::seed::canonical_day_string;
use crate::session::{Ending, GameState, mood_label};

/// Complete summary of a finished day for display on the result screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub date_line: String,
    pub ending: Option<Ending>,
    pub mood: i32,
    pub mood_line: String,
    pub elapsed_seconds: f64,
    pub action_count: u32,
    pub streak: u32,
    pub best_time: Option<f64>,
    pub tiers: Vec<OutcomeTier>,
}

/// Generate a result summary from a finished session and the stats that were
/// recorded for it. `tiers` keeps the synthetic timeout entry so the share
/// grid mirrors the full event history.
#[must_use]
pub fn result_summary(state: &GameState, stats: &PersistedStats) -> ResultSummary {
    ResultSummary {
        date_line: canonical_day_string(state.date),
        ending: state.ending,
        mood: state.mood,
        mood_line: String::from(mood_label(state.mood)),
        elapsed_seconds: state.elapsed,
        action_count: state.action_count(),
        streak: stats.streak,
        best_time: stats.best_time,
        tiers: state.tier_sequence(),
    }
}
