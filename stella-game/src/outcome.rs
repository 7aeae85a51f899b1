//! Outcome tiers and the draw-to-tier resolver.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Seven-tier outcome ladder, worst to best.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeTier {
    Terrible,
    Bad,
    Okay,
    #[default]
    Neutral,
    Good,
    Great,
    Excellent,
}

impl OutcomeTier {
    pub const ALL: &'static [Self] = &[
        Self::Terrible,
        Self::Bad,
        Self::Okay,
        Self::Neutral,
        Self::Good,
        Self::Great,
        Self::Excellent,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Terrible => "terrible",
            Self::Bad => "bad",
            Self::Okay => "okay",
            Self::Neutral => "neutral",
            Self::Good => "good",
            Self::Great => "great",
            Self::Excellent => "excellent",
        }
    }
}

impl fmt::Display for OutcomeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutcomeTier {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "terrible" => Ok(Self::Terrible),
            "bad" => Ok(Self::Bad),
            "okay" => Ok(Self::Okay),
            "neutral" => Ok(Self::Neutral),
            "good" => Ok(Self::Good),
            "great" => Ok(Self::Great),
            "excellent" => Ok(Self::Excellent),
            _ => Err(()),
        }
    }
}

impl From<OutcomeTier> for String {
    fn from(value: OutcomeTier) -> Self {
        value.as_str().to_string()
    }
}

/// Patience/mood deltas carried by a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TierEffect {
    pub patience: i32,
    pub mood: i32,
}

impl TierEffect {
    pub const NONE: Self = Self {
        patience: 0,
        mood: 0,
    };
}

/// One cumulative band: a draw below `upper` (and at or above the previous
/// band's upper) resolves to `tier`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierBand {
    pub tier: OutcomeTier,
    pub upper: f64,
    pub effect: TierEffect,
}

impl Eq for TierBand {}

/// Errors raised when outcome or game configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("JSON parse error: {0}")]
    Parse(String),
    #[error("band table is empty")]
    EmptyBands,
    #[error("band {index} upper bound {upper:.3} does not increase past {previous:.3}")]
    BandOrder {
        index: usize,
        upper: f64,
        previous: f64,
    },
    #[error("band upper bound {upper:.3} outside (0, 1]")]
    BandRange { upper: f64 },
    #[error("final band must reach 1.0 (got {upper:.3})")]
    BandCoverage { upper: f64 },
    #[error("timeout tier {tier} has no band")]
    MissingTimeoutTier { tier: OutcomeTier },
    #[error("{field} must be positive (got {value:.3})")]
    NonPositive { field: &'static str, value: f64 },
    #[error("{field} must be between {min:.0} and {max:.0} (got {value})")]
    StatRange {
        field: &'static str,
        min: i32,
        max: i32,
        value: i32,
    },
}

/// Complete outcome resolution configuration.
///
/// Bands are cumulative and checked in order; the first band whose upper
/// bound exceeds the draw wins. Deltas are data so difficulty can be tuned
/// without touching resolver code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeTable {
    #[serde(default = "OutcomeTable::default_bands")]
    pub bands: SmallVec<[TierBand; 7]>,
    #[serde(default = "OutcomeTable::default_timeout_tier")]
    pub timeout_tier: OutcomeTier,
}

impl Eq for OutcomeTable {}

impl OutcomeTable {
    fn default_bands() -> SmallVec<[TierBand; 7]> {
        SmallVec::from_slice(&[
            band(OutcomeTier::Terrible, 0.10, -40, -25),
            band(OutcomeTier::Bad, 0.25, -25, -15),
            band(OutcomeTier::Okay, 0.45, -12, -8),
            band(OutcomeTier::Neutral, 0.65, -5, 0),
            band(OutcomeTier::Good, 0.82, 10, 8),
            band(OutcomeTier::Great, 0.95, 20, 15),
            band(OutcomeTier::Excellent, 1.0, 35, 25),
        ])
    }

    const fn default_timeout_tier() -> OutcomeTier {
        OutcomeTier::Terrible
    }

    /// Get embedded default configuration
    #[must_use]
    pub fn default_config() -> Self {
        Self {
            bands: Self::default_bands(),
            timeout_tier: Self::default_timeout_tier(),
        }
    }

    /// Load outcome configuration from JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON string cannot be parsed or if validation fails.
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        let table: Self =
            serde_json::from_str(json_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        table.validate()?;
        Ok(table)
    }

    /// Validate band ordering and coverage of the unit interval
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when bands are empty, out of order, leave a gap
    /// below 1.0, or the timeout tier has no band.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Some(last) = self.bands.last() else {
            return Err(ConfigError::EmptyBands);
        };
        let mut previous = 0.0;
        for (index, band) in self.bands.iter().enumerate() {
            if !(band.upper > 0.0 && band.upper <= 1.0) {
                return Err(ConfigError::BandRange { upper: band.upper });
            }
            if band.upper <= previous {
                return Err(ConfigError::BandOrder {
                    index,
                    upper: band.upper,
                    previous,
                });
            }
            previous = band.upper;
        }
        if (last.upper - 1.0).abs() > f64::EPSILON {
            return Err(ConfigError::BandCoverage { upper: last.upper });
        }
        if !self.bands.iter().any(|b| b.tier == self.timeout_tier) {
            return Err(ConfigError::MissingTimeoutTier {
                tier: self.timeout_tier,
            });
        }
        Ok(())
    }

    /// Resolve a draw in `[0, 1)` to its tier and deltas. Stateless; clamping
    /// of the applied deltas is the caller's job.
    #[must_use]
    pub fn resolve(&self, r: f64) -> (OutcomeTier, TierEffect) {
        for band in &self.bands {
            if r < band.upper {
                return (band.tier, band.effect);
            }
        }
        // Draws are < 1.0 by construction; a stray out-of-range value
        // resolves to the top band rather than panicking.
        self.bands
            .last()
            .map_or((OutcomeTier::Neutral, TierEffect::NONE), |b| {
                (b.tier, b.effect)
            })
    }

    /// Tier and deltas applied when the action window expires.
    #[must_use]
    pub fn timeout_effect(&self) -> (OutcomeTier, TierEffect) {
        self.bands
            .iter()
            .find(|b| b.tier == self.timeout_tier)
            .or_else(|| self.bands.first())
            .map_or((OutcomeTier::Neutral, TierEffect::NONE), |b| {
                (b.tier, b.effect)
            })
    }
}

impl Default for OutcomeTable {
    fn default() -> Self {
        Self::default_config()
    }
}

const fn band(tier: OutcomeTier, upper: f64, patience: i32, mood: i32) -> TierBand {
    TierBand {
        tier,
        upper,
        effect: TierEffect { patience, mood },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bands_cover_unit_interval() {
        let table = OutcomeTable::default_config();
        assert!(table.validate().is_ok());
        for i in 0..10_000 {
            let r = f64::from(i) / 10_000.0;
            let (tier, _) = table.resolve(r);
            assert!(OutcomeTier::ALL.contains(&tier));
        }
    }

    #[test]
    fn band_edges_belong_to_the_next_tier() {
        let table = OutcomeTable::default_config();
        assert_eq!(table.resolve(0.0).0, OutcomeTier::Terrible);
        assert_eq!(table.resolve(0.099_999).0, OutcomeTier::Terrible);
        assert_eq!(table.resolve(0.10).0, OutcomeTier::Bad);
        assert_eq!(table.resolve(0.45).0, OutcomeTier::Neutral);
        assert_eq!(table.resolve(0.65).0, OutcomeTier::Good);
        assert_eq!(table.resolve(0.95).0, OutcomeTier::Excellent);
        assert_eq!(table.resolve(0.999_999).0, OutcomeTier::Excellent);
    }

    #[test]
    fn deltas_match_tier_ladder() {
        let table = OutcomeTable::default_config();
        let (tier, effect) = table.resolve(0.05);
        assert_eq!(tier, OutcomeTier::Terrible);
        assert_eq!(effect, TierEffect { patience: -40, mood: -25 });
        let (tier, effect) = table.resolve(0.83);
        assert_eq!(tier, OutcomeTier::Great);
        assert_eq!(effect, TierEffect { patience: 20, mood: 15 });
    }

    #[test]
    fn validate_rejects_gapped_or_unordered_tables() {
        let mut table = OutcomeTable::default_config();
        table.bands[3].upper = 0.30;
        assert!(matches!(
            table.validate(),
            Err(ConfigError::BandOrder { index: 3, .. })
        ));

        let mut short = OutcomeTable::default_config();
        short.bands.truncate(3);
        assert!(matches!(
            short.validate(),
            Err(ConfigError::BandCoverage { .. })
        ));

        let empty = OutcomeTable {
            bands: SmallVec::new(),
            timeout_tier: OutcomeTier::Terrible,
        };
        assert_eq!(empty.validate(), Err(ConfigError::EmptyBands));
    }

    #[test]
    fn validate_requires_a_band_for_the_timeout_tier() {
        let table = OutcomeTable {
            bands: SmallVec::from_slice(&[band(OutcomeTier::Neutral, 1.0, 0, 0)]),
            timeout_tier: OutcomeTier::Terrible,
        };
        assert_eq!(
            table.validate(),
            Err(ConfigError::MissingTimeoutTier {
                tier: OutcomeTier::Terrible
            })
        );
    }

    #[test]
    fn timeout_effect_follows_configuration() {
        let table = OutcomeTable::default_config();
        let (tier, effect) = table.timeout_effect();
        assert_eq!(tier, OutcomeTier::Terrible);
        assert_eq!(effect.patience, -40);

        let mut harsh = OutcomeTable::default_config();
        harsh.timeout_tier = OutcomeTier::Bad;
        assert_eq!(harsh.timeout_effect().0, OutcomeTier::Bad);
    }

    #[test]
    fn from_json_fills_missing_fields_with_defaults() {
        let table = OutcomeTable::from_json("{}").unwrap();
        assert_eq!(table, OutcomeTable::default_config());

        let custom = OutcomeTable::from_json(r#"{"timeout_tier":"bad"}"#).unwrap();
        assert_eq!(custom.timeout_tier, OutcomeTier::Bad);
        assert_eq!(custom.bands, OutcomeTable::default_bands());
    }

    #[test]
    fn from_json_rejects_malformed_input() {
        assert!(matches!(
            OutcomeTable::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn tier_strings_round_trip() {
        for tier in OutcomeTier::ALL {
            assert_eq!(OutcomeTier::from_str(tier.as_str()), Ok(*tier));
        }
        assert_eq!(OutcomeTier::from_str("amazing"), Err(()));
    }
}
