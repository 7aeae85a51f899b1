//! Fixed-step countdown driver.

use crate::GameConfig;
use crate::constants::TIMER_STEP_SECONDS;
use crate::session::GameState;

/// Folds wall-clock deltas into fixed-size `tick` steps plus a carried
/// remainder, so hosts with uneven frame pacing advance the countdown
/// smoothly. Step size is presentation smoothness only; the timeout decision
/// is made by the session and does not depend on the cadence.
///
/// The driver deactivates itself the moment the session leaves `Playing` and
/// never mutates it afterwards. `stop` covers abandonment (e.g. the player
/// leaving the page) so no late tick can arrive once the host tears down.
#[derive(Debug, Clone, PartialEq)]
pub struct CountdownDriver {
    step: f64,
    accumulator: f64,
    active: bool,
}

impl CountdownDriver {
    /// Driver with the given step in seconds. Non-finite or non-positive
    /// steps fall back to the default step.
    #[must_use]
    pub fn new(step: f64) -> Self {
        let step = if step.is_finite() && step > 0.0 {
            step
        } else {
            TIMER_STEP_SECONDS
        };
        Self {
            step,
            accumulator: 0.0,
            active: true,
        }
    }

    #[must_use]
    pub fn from_config(cfg: &GameConfig) -> Self {
        Self::new(cfg.timer_step_seconds)
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Feed wall-clock seconds into the session as zero or more fixed steps.
    /// Inactive drivers and garbage deltas leave the session untouched.
    pub fn advance(&mut self, state: &mut GameState, cfg: &GameConfig, delta: f64) {
        if !self.active {
            return;
        }
        if !state.is_playing() {
            // Only a playing session consumes time. A finished one parks
            // the driver for good.
            if state.is_over() {
                self.stop();
            }
            return;
        }
        if !delta.is_finite() || delta <= 0.0 {
            return;
        }
        self.accumulator += delta;
        while self.accumulator >= self.step && state.is_playing() {
            state.tick(self.step, cfg);
            self.accumulator -= self.step;
        }
        if state.is_over() {
            self.stop();
        }
    }

    /// Deactivate the driver. Idempotent.
    pub fn stop(&mut self) {
        self.active = false;
        self.accumulator = 0.0;
    }
}

impl Default for CountdownDriver {
    fn default() -> Self {
        Self::new(TIMER_STEP_SECONDS)
    }
}
