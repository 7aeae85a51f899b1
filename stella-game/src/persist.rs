//! Streak, best-time, and daily-lock persistence over a key-value store.
//!
//! Every read fails soft: store errors, missing keys, and parse failures all
//! degrade to the "never played" defaults. Write failures are journaled and
//! swallowed; persistence can never fail the game flow.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;
use std::str::FromStr;

use crate::constants::{
    DAY_STRING_FORMAT, KEY_BEST_TIME, KEY_LAST_GAME_ACTIONS, KEY_LAST_GAME_HISTORY,
    KEY_LAST_GAME_TIME, KEY_LAST_PLAY_DATE, KEY_STREAK, LOG_STORE_PARSE_FAILED,
    LOG_STORE_READ_FAILED, LOG_STORE_WRITE_FAILED,
};
use crate::outcome::OutcomeTier;
use crate::seed::canonical_day_string;
use crate::session::ActionEvent;

/// Trait for abstracting the durable key-value persistence medium.
/// Platform-specific implementations should provide this
pub trait KvStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the value stored under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Store `value` under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;
}

/// In-memory store, the default medium for headless runs and tests. Clones
/// share the same underlying map, like tabs sharing one local storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Rc<RefCell<HashMap<String, String>>>,
}

impl KvStore for MemoryStore {
    type Error = Infallible;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Compact {action, tier} pair stored for the most recent game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub action: String,
    #[serde(default)]
    pub tier: OutcomeTier,
}

impl From<&ActionEvent> for HistoryEntry {
    fn from(event: &ActionEvent) -> Self {
        Self {
            action: event.action.clone(),
            tier: event.tier,
        }
    }
}

/// Durable cross-session stats. Read once at session start, written once at
/// game over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PersistedStats {
    pub last_play_date: Option<NaiveDate>,
    pub best_time: Option<f64>,
    pub streak: u32,
    pub last_game_time: f64,
    pub last_game_action_count: u32,
    pub last_game_history: Vec<HistoryEntry>,
}

impl Eq for PersistedStats {}

/// Owns every persisted key and the read-before-write streak contract.
pub struct StatsStore<S: KvStore> {
    store: S,
    logs: Vec<String>,
}

impl<S: KvStore> StatsStore<S> {
    pub const fn new(store: S) -> Self {
        Self {
            store,
            logs: Vec::new(),
        }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Drain journal entries accumulated by failed reads/writes.
    pub fn take_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.logs)
    }

    /// Read the full persisted snapshot, degrading field-by-field to the
    /// "never played" defaults.
    pub fn load(&mut self) -> PersistedStats {
        PersistedStats {
            last_play_date: self.read_play_date(),
            best_time: self.parse(KEY_BEST_TIME),
            streak: self.parse(KEY_STREAK).unwrap_or(0),
            last_game_time: self.parse(KEY_LAST_GAME_TIME).unwrap_or(0.0),
            last_game_action_count: self.parse(KEY_LAST_GAME_ACTIONS).unwrap_or(0),
            last_game_history: self.read_history(),
        }
    }

    /// Daily lock: true when the stored day string matches `today`.
    pub fn has_played_today(&mut self, today: NaiveDate) -> bool {
        self.read(KEY_LAST_PLAY_DATE)
            .is_some_and(|stored| stored == canonical_day_string(today))
    }

    /// Record a finished game and return the updated stats.
    ///
    /// The previously stored stats are read BEFORE anything is overwritten;
    /// the streak decision depends on the old play date, so the ordering
    /// here is load-bearing. Do not reorder the load below the writes.
    pub fn record_game_end(
        &mut self,
        today: NaiveDate,
        elapsed_seconds: f64,
        action_count: u32,
        history: &[ActionEvent],
    ) -> PersistedStats {
        let previous = self.load();

        let streak = match previous.last_play_date {
            Some(last) if Some(last) == today.pred_opt() => previous.streak.saturating_add(1),
            _ => 1,
        };
        let best_time = match previous.best_time {
            Some(best) if best <= elapsed_seconds => Some(best),
            _ => Some(elapsed_seconds),
        };

        let stats = PersistedStats {
            last_play_date: Some(today),
            best_time,
            streak,
            last_game_time: elapsed_seconds,
            last_game_action_count: action_count,
            last_game_history: history.iter().map(HistoryEntry::from).collect(),
        };
        self.write_all(today, &stats);
        stats
    }

    fn write_all(&mut self, today: NaiveDate, stats: &PersistedStats) {
        self.write(KEY_LAST_PLAY_DATE, &canonical_day_string(today));
        if let Some(best) = stats.best_time {
            self.write(KEY_BEST_TIME, &best.to_string());
        }
        self.write(KEY_STREAK, &stats.streak.to_string());
        self.write(KEY_LAST_GAME_TIME, &stats.last_game_time.to_string());
        self.write(
            KEY_LAST_GAME_ACTIONS,
            &stats.last_game_action_count.to_string(),
        );
        if let Ok(json) = serde_json::to_string(&stats.last_game_history) {
            self.write(KEY_LAST_GAME_HISTORY, &json);
        }
    }

    fn write(&mut self, key: &str, value: &str) {
        if self.store.set(key, value).is_err() {
            self.logs.push(String::from(LOG_STORE_WRITE_FAILED));
        }
    }

    fn read(&mut self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(_) => {
                self.logs.push(String::from(LOG_STORE_READ_FAILED));
                None
            }
        }
    }

    fn parse<T: FromStr>(&mut self, key: &str) -> Option<T> {
        let raw = self.read(key)?;
        match raw.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                self.logs.push(String::from(LOG_STORE_PARSE_FAILED));
                None
            }
        }
    }

    fn read_play_date(&mut self) -> Option<NaiveDate> {
        let raw = self.read(KEY_LAST_PLAY_DATE)?;
        match NaiveDate::parse_from_str(&raw, DAY_STRING_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                self.logs.push(String::from(LOG_STORE_PARSE_FAILED));
                None
            }
        }
    }

    fn read_history(&mut self) -> Vec<HistoryEntry> {
        let Some(raw) = self.read(KEY_LAST_GAME_HISTORY) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(history) => history,
            Err(_) => {
                self.logs.push(String::from(LOG_STORE_PARSE_FAILED));
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(action: &str, tier: OutcomeTier) -> ActionEvent {
        ActionEvent {
            action: action.to_string(),
            occurrence: 0,
            tier,
            patience_delta: 0,
            mood_delta: 0,
            timed_out: false,
        }
    }

    #[test]
    fn empty_store_loads_never_played_defaults() {
        let mut stats = StatsStore::new(MemoryStore::default());
        let loaded = stats.load();
        assert_eq!(loaded, PersistedStats::default());
        assert!(!stats.has_played_today(day(2025, 11, 19)));
    }

    #[test]
    fn first_game_starts_a_streak_of_one() {
        let mut stats = StatsStore::new(MemoryStore::default());
        let recorded = stats.record_game_end(day(2025, 11, 19), 42.5, 6, &[]);
        assert_eq!(recorded.streak, 1);
        assert_eq!(recorded.best_time, Some(42.5));
        assert_eq!(recorded.last_play_date, Some(day(2025, 11, 19)));
    }

    #[test]
    fn consecutive_days_extend_the_streak() {
        let store = MemoryStore::default();
        let mut stats = StatsStore::new(store.clone());
        stats.record_game_end(day(2025, 11, 19), 30.0, 4, &[]);
        let second = stats.record_game_end(day(2025, 11, 20), 35.0, 5, &[]);
        assert_eq!(second.streak, 2);
        let third = stats.record_game_end(day(2025, 11, 21), 28.0, 3, &[]);
        assert_eq!(third.streak, 3);
        assert_eq!(store.get("stella.streak").unwrap().as_deref(), Some("3"));
    }

    #[test]
    fn a_gap_resets_the_streak() {
        let mut stats = StatsStore::new(MemoryStore::default());
        stats.record_game_end(day(2025, 11, 19), 30.0, 4, &[]);
        let after_gap = stats.record_game_end(day(2025, 11, 22), 30.0, 4, &[]);
        assert_eq!(after_gap.streak, 1);
    }

    #[test]
    fn streak_spans_month_and_leap_boundaries() {
        let mut stats = StatsStore::new(MemoryStore::default());
        stats.record_game_end(day(2024, 2, 28), 20.0, 2, &[]);
        assert_eq!(stats.record_game_end(day(2024, 2, 29), 20.0, 2, &[]).streak, 2);
        assert_eq!(stats.record_game_end(day(2024, 3, 1), 20.0, 2, &[]).streak, 3);
    }

    #[test]
    fn best_time_keeps_the_minimum() {
        let mut stats = StatsStore::new(MemoryStore::default());
        stats.record_game_end(day(2025, 11, 19), 40.0, 4, &[]);
        let faster = stats.record_game_end(day(2025, 11, 20), 25.5, 4, &[]);
        assert_eq!(faster.best_time, Some(25.5));
        let slower = stats.record_game_end(day(2025, 11, 21), 90.0, 4, &[]);
        assert_eq!(slower.best_time, Some(25.5));
        assert!((slower.last_game_time - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn daily_lock_matches_the_stored_day_string() {
        let store = MemoryStore::default();
        let mut stats = StatsStore::new(store);
        stats.record_game_end(day(2025, 11, 19), 12.0, 1, &[]);
        assert!(stats.has_played_today(day(2025, 11, 19)));
        assert!(!stats.has_played_today(day(2025, 11, 20)));
    }

    #[test]
    fn history_round_trips_as_json() {
        let store = MemoryStore::default();
        let mut stats = StatsStore::new(store.clone());
        let history = [
            event("pet", OutcomeTier::Terrible),
            event("feed", OutcomeTier::Good),
        ];
        stats.record_game_end(day(2025, 11, 19), 12.0, 2, &history);

        let raw = store.get("stella.last-game-history").unwrap().unwrap();
        assert!(raw.contains("\"terrible\""));
        let loaded = stats.load();
        assert_eq!(loaded.last_game_history.len(), 2);
        assert_eq!(loaded.last_game_history[0].tier, OutcomeTier::Terrible);
        assert_eq!(loaded.last_game_history[1].action, "feed");
    }

    #[test]
    fn malformed_values_degrade_to_defaults() {
        let store = MemoryStore::default();
        store.set("stella.last-play-date", "not a date").unwrap();
        store.set("stella.streak", "eleven").unwrap();
        store.set("stella.best-time", "fast").unwrap();
        store.set("stella.last-game-history", "{broken").unwrap();

        let mut stats = StatsStore::new(store);
        let loaded = stats.load();
        assert_eq!(loaded.last_play_date, None);
        assert_eq!(loaded.streak, 0);
        assert_eq!(loaded.best_time, None);
        assert!(loaded.last_game_history.is_empty());
        let logs = stats.take_logs();
        assert!(logs.iter().any(|l| l == "log.store.parse-failed"));

        // Malformed previous state behaves like a first game.
        assert_eq!(
            stats.record_game_end(day(2025, 11, 19), 10.0, 1, &[]).streak,
            1
        );
    }

    #[test]
    fn write_failures_are_journaled_not_fatal() {
        #[derive(Debug, Default)]
        struct ReadOnlyStore;

        impl KvStore for ReadOnlyStore {
            type Error = std::io::Error;

            fn get(&self, _key: &str) -> Result<Option<String>, Self::Error> {
                Ok(None)
            }

            fn set(&self, _key: &str, _value: &str) -> Result<(), Self::Error> {
                Err(std::io::Error::other("quota exceeded"))
            }
        }

        let mut stats = StatsStore::new(ReadOnlyStore);
        let recorded = stats.record_game_end(day(2025, 11, 19), 15.0, 2, &[]);
        assert_eq!(recorded.streak, 1);
        assert!(
            stats
                .take_logs()
                .iter()
                .any(|l| l == "log.store.write-failed")
        );
    }
}
