use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TerrainKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum TerrainKind {
    #[default]
    Empty,
    Plains,
    Forest,
    Mountain,
    Water,
    Desert,
    Swamp,
    City,
}

token_enum!(TerrainKind {
    Empty => "empty",
    Plains => "plains",
    Forest => "forest",
    Mountain => "mountain",
    Water => "water",
    Desert => "desert",
    Swamp => "swamp",
    City => "city",
});

impl TerrainKind {
    /// The full catalog, in display order.
    pub const ALL: [TerrainKind; 8] = [
        TerrainKind::Empty,
        TerrainKind::Plains,
        TerrainKind::Forest,
        TerrainKind::Mountain,
        TerrainKind::Water,
        TerrainKind::Desert,
        TerrainKind::Swamp,
        TerrainKind::City,
    ];

    /// Kinds the generators draw from. `Empty` and `City` are only ever placed by hand.
    pub const GENERATED: [TerrainKind; 6] = [
        TerrainKind::Plains,
        TerrainKind::Forest,
        TerrainKind::Mountain,
        TerrainKind::Water,
        TerrainKind::Desert,
        TerrainKind::Swamp,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            TerrainKind::Empty => "Empty",
            TerrainKind::Plains => "Plains",
            TerrainKind::Forest => "Forest",
            TerrainKind::Mountain => "Mountain",
            TerrainKind::Water => "Water",
            TerrainKind::Desert => "Desert",
            TerrainKind::Swamp => "Swamp",
            TerrainKind::City => "City",
        }
    }

    /// Legend color token for the kind.
    pub fn color(self) -> &'static str {
        match self {
            TerrainKind::Empty => "#f0f0f0",
            TerrainKind::Plains => "#90EE90",
            TerrainKind::Forest => "#228B22",
            TerrainKind::Mountain => "#8B4513",
            TerrainKind::Water => "#4682B4",
            TerrainKind::Desert => "#F4A460",
            TerrainKind::Swamp => "#556B2F",
            TerrainKind::City => "#696969",
        }
    }

    pub fn is_reserved(self) -> bool {
        matches!(self, TerrainKind::Empty | TerrainKind::City)
    }

    /// The next kind in catalog order, wrapping back to `Empty` after `City`.
    pub fn next(self) -> TerrainKind {
        let idx = TerrainKind::ALL
            .iter()
            .position(|&k| k == self)
            .unwrap_or(0);
        TerrainKind::ALL[(idx + 1) % TerrainKind::ALL.len()]
    }
}
