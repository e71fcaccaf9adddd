use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::TerrainKind;

/// Weight used for a kind missing from a `TerrainWeights` mapping.
pub const FALLBACK_WEIGHT: f64 = 0.1;

/// Largest row or column count a realm may have.
pub const MAX_DIMENSION: u32 = 1024;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("realm dimensions must be between 1 and {max}, got {rows}x{cols}", max = MAX_DIMENSION)]
    InvalidDimensions { rows: u32, cols: u32 },

    #[error("weight for {kind} must be a number between 0 and 1, got {weight}")]
    InvalidWeight { kind: TerrainKind, weight: f64 },
}

/// How terrain is distributed over the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum TerrainStrategy {
    /// Independent uniform draw per cell.
    Random,
    /// Every generated kind at least once, the rest uniform.
    #[default]
    Balanced,
    /// Draws follow `TerrainWeights`.
    Weighted,
    /// Breadth-first regions grown from random seeds.
    Clustered,
}

token_enum!(TerrainStrategy {
    Random => "random",
    Balanced => "balanced",
    Weighted => "weighted",
    Clustered => "clustered",
});

impl TerrainStrategy {
    pub const ALL: [TerrainStrategy; 4] = [
        TerrainStrategy::Random,
        TerrainStrategy::Balanced,
        TerrainStrategy::Weighted,
        TerrainStrategy::Clustered,
    ];
}

/// Relative terrain frequencies for the weighted strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TerrainWeights(pub BTreeMap<TerrainKind, f64>);

impl TerrainWeights {
    pub fn weight(&self, kind: TerrainKind) -> f64 {
        self.0.get(&kind).copied().unwrap_or(FALLBACK_WEIGHT)
    }
}

impl Default for TerrainWeights {
    fn default() -> Self {
        Self(BTreeMap::from([
            (TerrainKind::Plains, 0.35),
            (TerrainKind::Forest, 0.25),
            (TerrainKind::Mountain, 0.18),
            (TerrainKind::Water, 0.15),
            (TerrainKind::Desert, 0.04),
            (TerrainKind::Swamp, 0.03),
        ]))
    }
}

/// Configuration for realm generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RealmGenConfig {
    /// Name given to the generated realm.
    pub name: String,
    /// RNG seed for deterministic generation.
    pub seed: u64,
    pub rows: u32,
    pub cols: u32,
    pub strategy: TerrainStrategy,
    /// Only consulted by `TerrainStrategy::Weighted`.
    pub weights: TerrainWeights,
    /// Holdings to place; the first placed is the seat of power.
    pub holdings: u32,
    /// Landmarks to place for each landmark kind.
    pub landmarks_per_kind: u32,
    pub myths: u32,
    /// Random positions tried per feature before it is skipped.
    pub max_attempts: u32,
}

impl Default for RealmGenConfig {
    fn default() -> Self {
        Self {
            name: "New Realm".to_string(),
            seed: 42,
            rows: 12,
            cols: 12,
            strategy: TerrainStrategy::Balanced,
            weights: TerrainWeights::default(),
            holdings: 4,
            landmarks_per_kind: 4,
            myths: 6,
            max_attempts: 100,
        }
    }
}

impl RealmGenConfig {
    /// Check the settings that come from user input: grid dimensions within
    /// 1..=`MAX_DIMENSION` and every terrain weight a finite value in 0..=1.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dims = 1..=MAX_DIMENSION;
        if !dims.contains(&self.rows) || !dims.contains(&self.cols) {
            return Err(ConfigError::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if let Some((&kind, &weight)) = self
            .weights
            .0
            .iter()
            .find(|&(_, &w)| !(0.0..=1.0).contains(&w))
        {
            return Err(ConfigError::InvalidWeight { kind, weight });
        }
        Ok(())
    }
}
