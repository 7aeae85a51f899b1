//! Deterministic multi-day simulation harness.
//!
//! One run plays a chain of consecutive calendar dates against a single
//! shared store, the way a real player returns day after day, and validates
//! the engine's invariants after every finished day.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use stella_game::{ActionId, DailyGame, Ending, GameConfig, MemoryStore, OutcomeTier};

use crate::policy::{ActionPolicy, PolicyKind};

/// Configuration for one simulated run over a chain of dates.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub dates: Vec<NaiveDate>,
    pub think_seconds: f64,
    pub max_actions: u32,
    pub favorite: ActionId,
    pub seed: u64,
    pub game: GameConfig,
}

impl SimulationConfig {
    #[must_use]
    pub fn for_dates(dates: Vec<NaiveDate>) -> Self {
        Self {
            dates,
            think_seconds: 1.5,
            max_actions: 40,
            favorite: ActionId::Pet,
            seed: 1337,
            game: GameConfig::default_config(),
        }
    }

    /// Chain of `days` consecutive dates starting at `start`.
    #[must_use]
    pub fn consecutive(start: NaiveDate, days: u32) -> Self {
        let dates = (0..days)
            .filter_map(|offset| start.checked_add_days(Days::new(u64::from(offset))))
            .collect();
        Self::for_dates(dates)
    }
}

/// Snapshot of one finished day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub seed: u32,
    pub ending: Option<Ending>,
    pub actions: u32,
    pub elapsed_seconds: f64,
    pub patience: i32,
    pub mood: i32,
    pub streak: u32,
    pub best_time: Option<f64>,
    pub tiers: Vec<OutcomeTier>,
    pub share_card: String,
}

/// Full outcome of one policy's run across the date chain.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub policy: String,
    pub days: Vec<DayRecord>,
    pub violations: Vec<String>,
}

impl RunSummary {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    /// Best recorded clear time across the chain. The engine keeps the
    /// minimum, so the last finished day carries it.
    #[must_use]
    pub fn best_clear(&self) -> Option<f64> {
        self.days.last().and_then(|day| day.best_time)
    }
}

/// Play the configured chain of dates and collect invariant violations.
#[must_use]
pub fn run_chain(cfg: &SimulationConfig, kind: PolicyKind) -> RunSummary {
    let mut policy = kind.create_policy(cfg.favorite, cfg.seed);
    let store = MemoryStore::default();
    let mut days: Vec<DayRecord> = Vec::new();
    let mut violations = Vec::new();
    let mut expected_streak = 0u32;

    for date in cfg.dates.iter().copied() {
        let mut game = DailyGame::new(store.clone(), cfg.game.clone(), date);
        if !game.start_game() {
            if days.iter().any(|d| d.date == date) {
                violations.push(format!("{date}: repeated in the chain, daily lock held"));
            } else {
                violations.push(format!("{date}: daily lock refused an unplayed date"));
            }
            break;
        }
        play_day(&mut game, policy.as_mut(), cfg);

        // A day directly after the previous one extends the streak,
        // anything else restarts it.
        expected_streak = match days.last() {
            Some(prev) if prev.date.succ_opt() == Some(date) => expected_streak.saturating_add(1),
            _ => 1,
        };
        let record = snapshot_day(&game, date);
        check_day(&record, expected_streak, days.last(), &mut violations);
        days.push(record);
    }

    RunSummary {
        policy: kind.label().to_string(),
        days,
        violations,
    }
}

/// Run the same chain twice from scratch and require identical records.
#[must_use]
pub fn verify_determinism(cfg: &SimulationConfig, kind: PolicyKind) -> Vec<String> {
    let first = run_chain(cfg, kind);
    let second = run_chain(cfg, kind);
    let mut diffs = Vec::new();

    if first.days.len() != second.days.len() {
        diffs.push(format!(
            "replay produced {} days instead of {}",
            second.days.len(),
            first.days.len()
        ));
        return diffs;
    }
    for (a, b) in first.days.iter().zip(&second.days) {
        if a != b {
            diffs.push(format!(
                "{}: replay diverged (tiers {:?} vs {:?})",
                a.date, a.tiers, b.tiers
            ));
        }
    }
    diffs
}

fn play_day(
    game: &mut DailyGame<MemoryStore>,
    policy: &mut dyn ActionPolicy,
    cfg: &SimulationConfig,
) {
    let mut actions_taken = 0u32;
    while game.state().is_playing() {
        game.advance(cfg.think_seconds);
        if !game.state().is_playing() {
            break;
        }
        if actions_taken >= cfg.max_actions {
            // Cap reached: go quiet and let the window expire.
            game.advance(cfg.game.action_window_seconds + cfg.game.timer_step_seconds);
            continue;
        }
        let action = policy.next_action(game.state());
        log::debug!("{} ({}) plays {action}", game.state().date, policy.name());
        if game.perform_action(action).is_some() {
            actions_taken += 1;
        }
    }
}

fn snapshot_day(game: &DailyGame<MemoryStore>, date: NaiveDate) -> DayRecord {
    let state = game.state();
    DayRecord {
        date,
        seed: state.seed,
        ending: state.ending,
        actions: state.action_count(),
        elapsed_seconds: state.elapsed,
        patience: state.patience,
        mood: state.mood,
        streak: game.stats().streak,
        best_time: game.stats().best_time,
        tiers: state.tier_sequence(),
        share_card: game.share_card().unwrap_or_default(),
    }
}

fn check_day(
    record: &DayRecord,
    expected_streak: u32,
    previous: Option<&DayRecord>,
    violations: &mut Vec<String>,
) {
    let date = record.date;

    if !(0..=100).contains(&record.patience) || !(0..=100).contains(&record.mood) {
        violations.push(format!(
            "{date}: stats out of bounds (patience {}, mood {})",
            record.patience, record.mood
        ));
    }

    let Some(ending) = record.ending else {
        violations.push(format!("{date}: day finished without an ending"));
        return;
    };
    if ending == Ending::PatienceExhausted && record.patience != 0 {
        violations.push(format!(
            "{date}: patience ending with patience {}",
            record.patience
        ));
    }

    let expected_tiers = match ending {
        Ending::TimedOut => record.actions.saturating_add(1),
        Ending::PatienceExhausted => record.actions,
    };
    if u32::try_from(record.tiers.len()).unwrap_or(u32::MAX) != expected_tiers {
        violations.push(format!(
            "{date}: {} history tiers for {} actions ending {ending:?}",
            record.tiers.len(),
            record.actions
        ));
    }

    if record.streak != expected_streak {
        violations.push(format!(
            "{date}: streak {} where the chain predicts {expected_streak}",
            record.streak
        ));
    }

    match record.best_time {
        Some(best) => {
            if best > record.elapsed_seconds + 1e-9 {
                violations.push(format!(
                    "{date}: best time {best:.3}s exceeds elapsed {:.3}s",
                    record.elapsed_seconds
                ));
            }
            if let Some(prev_best) = previous.and_then(|p| p.best_time)
                && best > prev_best + 1e-9
            {
                violations.push(format!(
                    "{date}: best time {best:.3}s regressed from {prev_best:.3}s"
                ));
            }
        }
        None => violations.push(format!("{date}: best time missing after a recorded game")),
    }

    let lines: Vec<&str> = record.share_card.lines().collect();
    if lines.len() == 5 {
        let glyphs = lines[3].chars().count();
        if glyphs != record.tiers.len() + 1 {
            violations.push(format!(
                "{date}: {glyphs} glyphs in the grid for {} tiers",
                record.tiers.len()
            ));
        }
    } else {
        violations.push(format!(
            "{date}: share card has {} lines instead of 5",
            lines.len()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
    }

    fn base_config() -> SimulationConfig {
        SimulationConfig::consecutive(day(19), 3)
    }

    #[test]
    fn rotate_chain_passes_all_invariants() {
        let summary = run_chain(&base_config(), PolicyKind::Rotate);
        assert!(summary.passed(), "violations: {:?}", summary.violations);
        assert_eq!(summary.days.len(), 3);
        let streaks: Vec<u32> = summary.days.iter().map(|d| d.streak).collect();
        assert_eq!(streaks, vec![1, 2, 3]);
    }

    #[test]
    fn a_gap_in_the_chain_resets_the_streak() {
        let cfg = SimulationConfig::for_dates(vec![day(19), day(20), day(24)]);
        let summary = run_chain(&cfg, PolicyKind::Caretaker);
        assert!(summary.passed(), "violations: {:?}", summary.violations);
        let streaks: Vec<u32> = summary.days.iter().map(|d| d.streak).collect();
        assert_eq!(streaks, vec![1, 2, 1]);
    }

    #[test]
    fn every_policy_replays_identically() {
        let cfg = base_config();
        for kind in PolicyKind::ALL {
            let diffs = verify_determinism(&cfg, *kind);
            assert!(diffs.is_empty(), "{kind}: {diffs:?}");
        }
    }

    #[test]
    fn zero_action_cap_forces_the_timeout_path() {
        let mut cfg = SimulationConfig::consecutive(day(19), 1);
        cfg.max_actions = 0;
        let summary = run_chain(&cfg, PolicyKind::Single);
        assert!(summary.passed(), "violations: {:?}", summary.violations);

        let day = &summary.days[0];
        assert_eq!(day.ending, Some(Ending::TimedOut));
        assert_eq!(day.actions, 0);
        assert_eq!(day.tiers.len(), 1);
    }
}
