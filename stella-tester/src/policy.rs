//! Automated play strategies for headless runs.

use clap::ValueEnum;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::fmt;

use stella_game::{ActionId, GameState};

/// Policy interface for automated play strategies.
pub trait ActionPolicy {
    /// Name used for logging/report output.
    fn name(&self) -> &'static str;

    /// Select the next action for the current session.
    fn next_action(&mut self, state: &GameState) -> ActionId;
}

/// Built-in strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum PolicyKind {
    /// Cycle the whole roster in order
    Rotate,
    /// Repeat one favorite action to walk its occurrence ladder
    Single,
    /// React to the pet's stats: comfort when grumpy, rest when patience is low
    Caretaker,
    /// Seeded uniform pick from the roster
    Random,
}

impl PolicyKind {
    pub const ALL: &'static [Self] = &[Self::Rotate, Self::Single, Self::Caretaker, Self::Random];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Rotate => "Rotate",
            Self::Single => "Single",
            Self::Caretaker => "Caretaker",
            Self::Random => "Random",
        }
    }

    #[must_use]
    pub fn create_policy(self, favorite: ActionId, seed: u64) -> Box<dyn ActionPolicy + Send> {
        match self {
            Self::Rotate => Box::new(RotatePolicy::default()),
            Self::Single => Box::new(SinglePolicy { favorite }),
            Self::Caretaker => Box::new(CaretakerPolicy::default()),
            Self::Random => Box::new(RandomPolicy::new(seed)),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Default)]
struct RotatePolicy {
    cursor: usize,
}

impl ActionPolicy for RotatePolicy {
    fn name(&self) -> &'static str {
        "Rotate"
    }

    fn next_action(&mut self, _state: &GameState) -> ActionId {
        let action = ActionId::ALL[self.cursor % ActionId::ALL.len()];
        self.cursor = self.cursor.wrapping_add(1);
        action
    }
}

struct SinglePolicy {
    favorite: ActionId,
}

impl ActionPolicy for SinglePolicy {
    fn name(&self) -> &'static str {
        "Single"
    }

    fn next_action(&mut self, _state: &GameState) -> ActionId {
        self.favorite
    }
}

#[derive(Default)]
struct CaretakerPolicy {
    upkeep_cursor: usize,
}

impl ActionPolicy for CaretakerPolicy {
    fn name(&self) -> &'static str {
        "Caretaker"
    }

    fn next_action(&mut self, state: &GameState) -> ActionId {
        if state.mood < 40 {
            return ActionId::Treat;
        }
        if state.patience < 40 {
            return ActionId::Nap;
        }
        const UPKEEP: [ActionId; 3] = [ActionId::Feed, ActionId::Play, ActionId::Pet];
        let action = UPKEEP[self.upkeep_cursor % UPKEEP.len()];
        self.upkeep_cursor = self.upkeep_cursor.wrapping_add(1);
        action
    }
}

struct RandomPolicy {
    rng: SmallRng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl ActionPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn next_action(&mut self, _state: &GameState) -> ActionId {
        ActionId::ALL[self.rng.gen_range(0..ActionId::ALL.len())]
    }
}
