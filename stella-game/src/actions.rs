//! Canonical care-action roster.
//!
//! The lowercase action name is the seeding identity: the per-action draw is
//! derived from its character codes, so renaming an action changes every
//! player's outcomes. The engine itself works on plain `&str` names; this
//! roster is the canonical set hosts present to the player.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActionId {
    #[default]
    Feed,
    Play,
    Pet,
    Groom,
    Treat,
    Nap,
}

impl ActionId {
    pub const ALL: &'static [Self] = &[
        Self::Feed,
        Self::Play,
        Self::Pet,
        Self::Groom,
        Self::Treat,
        Self::Nap,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Feed => "feed",
            Self::Play => "play",
            Self::Pet => "pet",
            Self::Groom => "groom",
            Self::Treat => "treat",
            Self::Nap => "nap",
        }
    }

    /// Label shown on the action button.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Feed => "🍖 Feed",
            Self::Play => "🎾 Play",
            Self::Pet => "🖐 Pet",
            Self::Groom => "🪮 Groom",
            Self::Treat => "🍪 Treat",
            Self::Nap => "💤 Nap",
        }
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "feed" => Ok(Self::Feed),
            "play" => Ok(Self::Play),
            "pet" => Ok(Self::Pet),
            "groom" => Ok(Self::Groom),
            "treat" => Ok(Self::Treat),
            "nap" => Ok(Self::Nap),
            _ => Err(()),
        }
    }
}

impl From<ActionId> for String {
    fn from(value: ActionId) -> Self {
        value.as_str().to_string()
    }
}
