//! Share-card text generation.
//!
//! Pure functions of the finished session; given identical inputs the output
//! is byte-identical, so clipboard and share-sheet paths can rely on it.

use crate::constants::{
    GLYPH_GAME_OVER, GLYPH_GREEN, GLYPH_ORANGE, GLYPH_RED, GLYPH_YELLOW, SHARE_FOOTER, SHARE_TITLE,
};
use crate::outcome::OutcomeTier;
use crate::persist::PersistedStats;
use crate::result::{ResultSummary, result_summary};
use crate::session::GameState;

/// Colored-square glyph for one outcome tier.
#[must_use]
pub const fn tier_glyph(tier: OutcomeTier) -> &'static str {
    match tier {
        OutcomeTier::Excellent | OutcomeTier::Great => GLYPH_GREEN,
        OutcomeTier::Good | OutcomeTier::Neutral => GLYPH_YELLOW,
        OutcomeTier::Okay => GLYPH_ORANGE,
        OutcomeTier::Bad | OutcomeTier::Terrible => GLYPH_RED,
    }
}

/// Compose the fixed multi-line share card from a result summary.
#[must_use]
pub fn share_text(summary: &ResultSummary) -> String {
    let mut row = String::new();
    for tier in &summary.tiers {
        row.push_str(tier_glyph(*tier));
    }
    row.push_str(GLYPH_GAME_OVER);

    let lines = [
        String::from(SHARE_TITLE),
        summary.date_line.clone(),
        format!(
            "⏱ {:.1}s | 🎯 {} actions | 🔥 {} day streak",
            summary.elapsed_seconds, summary.action_count, summary.streak
        ),
        row,
        String::from(SHARE_FOOTER),
    ];
    lines.join("\n")
}

/// Render the share card straight from a finished session and its stats.
#[must_use]
pub fn format_share(state: &GameState, stats: &PersistedStats) -> String {
    share_text(&result_summary(state, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Ending;

    #[test]
    fn glyphs_band_the_tiers() {
        assert_eq!(tier_glyph(OutcomeTier::Excellent), "🟩");
        assert_eq!(tier_glyph(OutcomeTier::Great), "🟩");
        assert_eq!(tier_glyph(OutcomeTier::Good), "🟨");
        assert_eq!(tier_glyph(OutcomeTier::Neutral), "🟨");
        assert_eq!(tier_glyph(OutcomeTier::Okay), "🟧");
        assert_eq!(tier_glyph(OutcomeTier::Bad), "🟥");
        assert_eq!(tier_glyph(OutcomeTier::Terrible), "🟥");
    }

    #[test]
    fn card_matches_the_fixed_template() {
        let summary = ResultSummary {
            date_line: String::from("Wed Nov 19 2025"),
            ending: Some(Ending::PatienceExhausted),
            mood: 0,
            mood_line: String::from("miserable"),
            elapsed_seconds: 32.5,
            action_count: 3,
            streak: 2,
            best_time: Some(32.5),
            tiers: vec![
                OutcomeTier::Terrible,
                OutcomeTier::Good,
                OutcomeTier::Okay,
                OutcomeTier::Neutral,
                OutcomeTier::Excellent,
            ],
        };

        assert_eq!(
            share_text(&summary),
            "🐾 Daily Stella\n\
             Wed Nov 19 2025\n\
             ⏱ 32.5s | 🎯 3 actions | 🔥 2 day streak\n\
             🟥🟨🟧🟨🟩💀\n\
             dailystella.com"
        );
    }

    #[test]
    fn timed_out_sessions_close_with_a_red_square() {
        let cfg = crate::GameConfig::default_config();
        let date = chrono::NaiveDate::from_ymd_opt(2025, 11, 19).unwrap();
        let mut state = GameState::new_for_date(date).with_seed(1012);
        state.begin(&cfg);
        state.tick(cfg.action_window_seconds, &cfg);
        assert_eq!(state.ending, Some(Ending::TimedOut));

        let card = format_share(&state, &PersistedStats::default());
        let grid = card.lines().nth(3).unwrap_or_default();
        assert_eq!(grid, "🟥💀");
        assert_eq!(card.lines().count(), 5);
    }
}
