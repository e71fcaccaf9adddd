use serde::{Deserialize, Serialize};

use crate::hex::{HexPos, HexSide};

// ---------------------------------------------------------------------------
// LandmarkKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum LandmarkKind {
    Dwelling,
    Sanctum,
    Monument,
    Hazard,
    Curse,
    Ruin,
}

token_enum!(LandmarkKind {
    Dwelling => "Dwelling",
    Sanctum => "Sanctum",
    Monument => "Monument",
    Hazard => "Hazard",
    Curse => "Curse",
    Ruin => "Ruin",
});

impl LandmarkKind {
    pub const ALL: [LandmarkKind; 6] = [
        LandmarkKind::Dwelling,
        LandmarkKind::Sanctum,
        LandmarkKind::Monument,
        LandmarkKind::Hazard,
        LandmarkKind::Curse,
        LandmarkKind::Ruin,
    ];

    /// Only sanctums are tended by a seer.
    pub fn has_seer(self) -> bool {
        matches!(self, LandmarkKind::Sanctum)
    }
}

// ---------------------------------------------------------------------------
// Features
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    #[serde(flatten)]
    pub pos: HexPos,
    #[serde(default)]
    pub is_seat_of_power: bool,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Landmark {
    #[serde(flatten)]
    pub pos: HexPos,
    #[serde(rename = "type")]
    pub kind: LandmarkKind,
    pub name: String,
    pub seer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Myth {
    #[serde(flatten)]
    pub pos: HexPos,
    pub name: String,
}

/// An impassable edge of one hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Barrier {
    #[serde(flatten)]
    pub pos: HexPos,
    pub side: HexSide,
}

impl Holding {
    pub fn new(pos: HexPos, is_seat_of_power: bool, name: impl Into<String>) -> Self {
        Self {
            pos,
            is_seat_of_power,
            name: name.into(),
        }
    }
}

impl Landmark {
    pub fn new(pos: HexPos, kind: LandmarkKind, name: impl Into<String>) -> Self {
        Self {
            pos,
            kind,
            name: name.into(),
            seer: None,
        }
    }

    pub fn with_seer(mut self, seer: impl Into<String>) -> Self {
        self.seer = Some(seer.into());
        self
    }
}

impl Myth {
    pub fn new(pos: HexPos, name: impl Into<String>) -> Self {
        Self {
            pos,
            name: name.into(),
        }
    }
}

impl Barrier {
    pub fn new(pos: HexPos, side: HexSide) -> Self {
        Self { pos, side }
    }
}

/// Borrowed view of whichever feature occupies a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureRef<'a> {
    Holding(&'a Holding),
    Landmark(&'a Landmark),
    Myth(&'a Myth),
}

impl FeatureRef<'_> {
    pub fn pos(&self) -> HexPos {
        match self {
            FeatureRef::Holding(h) => h.pos,
            FeatureRef::Landmark(l) => l.pos,
            FeatureRef::Myth(m) => m.pos,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FeatureRef::Holding(h) => &h.name,
            FeatureRef::Landmark(l) => &l.name,
            FeatureRef::Myth(m) => &m.name,
        }
    }
}
