use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use rand::RngCore;

use crate::model::LandmarkKind;

const HOLDING_NAMES: &[&str] = &["Castle", "Fortress", "Tower", "Town"];

const SEER_NAMES: &[&str] = &[
    "The Hermit", "The Oracle", "The Anchorite", "The Augur", "The Witness", "The Mourner",
];

const MYTH_NAMES: &[&str] = &[
    "The Plague", "The Wall", "The Shadow", "The River", "The Beast",
    "The Goblin", "The Forest", "The Child", "The Order", "The Dead",
];

fn landmark_names(kind: LandmarkKind) -> &'static [&'static str] {
    match kind {
        LandmarkKind::Dwelling => &[
            "Shepherd fields", "Verant treehouse", "Traveller's inn", "Fertile farm", "Pigeon breeder",
        ],
        LandmarkKind::Sanctum => &[
            "Whispering brook", "Tranquil vista", "Mirrored grotto", "Hilltop hermitage", "Sun shrine",
        ],
        LandmarkKind::Monument => &[
            "Royal statue", "Ancient obelisk", "Runic cairn", "Knight mausoleum", "Voyage mosaic",
        ],
        LandmarkKind::Hazard => &[
            "Choking woodland", "Stinging leaves", "Forgotten traps", "Razor rocks", "Carrion birds",
        ],
        LandmarkKind::Curse => &[
            "Icy mist", "Shifting pit", "Illusory paths", "Heralds of doom", "Dark woods",
        ],
        LandmarkKind::Ruin => &[
            "Burned village", "Defiled totem", "Skull heap", "Hanging skeletons", "Gory painting",
        ],
    }
}

/// A fixed list of labels drawn without repetition until every label has been
/// used, after which the pool starts over.
#[derive(Debug, Clone)]
pub struct LabelPool {
    labels: &'static [&'static str],
    used: BTreeSet<usize>,
}

impl LabelPool {
    pub fn new(labels: &'static [&'static str]) -> Self {
        Self {
            labels,
            used: BTreeSet::new(),
        }
    }

    /// Draw a label not handed out since the last reset. Returns `None` only
    /// for a pool with no labels at all.
    pub fn draw(&mut self, rng: &mut dyn RngCore) -> Option<&'static str> {
        if self.labels.is_empty() {
            return None;
        }
        if self.used.len() >= self.labels.len() {
            self.used.clear();
        }
        let available: Vec<usize> = (0..self.labels.len())
            .filter(|i| !self.used.contains(i))
            .collect();
        let idx = available[rng.random_range(0..available.len())];
        self.used.insert(idx);
        Some(self.labels[idx])
    }

    pub fn reset(&mut self) {
        self.used.clear();
    }

    pub fn remaining(&self) -> usize {
        self.labels.len() - self.used.len()
    }
}

/// All label pools for one generation run.
#[derive(Debug, Clone)]
pub struct NameBook {
    holdings: LabelPool,
    landmarks: BTreeMap<LandmarkKind, LabelPool>,
    seers: LabelPool,
    myths: LabelPool,
}

impl NameBook {
    pub fn new() -> Self {
        Self {
            holdings: LabelPool::new(HOLDING_NAMES),
            landmarks: LandmarkKind::ALL
                .iter()
                .map(|&k| (k, LabelPool::new(landmark_names(k))))
                .collect(),
            seers: LabelPool::new(SEER_NAMES),
            myths: LabelPool::new(MYTH_NAMES),
        }
    }

    pub fn holding(&mut self, rng: &mut dyn RngCore) -> String {
        draw_or(&mut self.holdings, rng, "Holding")
    }

    pub fn landmark(&mut self, kind: LandmarkKind, rng: &mut dyn RngCore) -> String {
        match self.landmarks.get_mut(&kind) {
            Some(pool) => draw_or(pool, rng, kind.as_str()),
            None => kind.as_str().to_string(),
        }
    }

    pub fn seer(&mut self, rng: &mut dyn RngCore) -> String {
        draw_or(&mut self.seers, rng, "Seer")
    }

    pub fn myth(&mut self, rng: &mut dyn RngCore) -> String {
        draw_or(&mut self.myths, rng, "Myth")
    }
}

impl Default for NameBook {
    fn default() -> Self {
        Self::new()
    }
}

fn draw_or(pool: &mut LabelPool, rng: &mut dyn RngCore, fallback: &str) -> String {
    pool.draw(rng).unwrap_or(fallback).to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn no_repeats_until_exhausted() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut pool = LabelPool::new(MYTH_NAMES);
        let first: HashSet<&str> = (0..MYTH_NAMES.len())
            .map(|_| pool.draw(&mut rng).unwrap())
            .collect();
        assert_eq!(first.len(), MYTH_NAMES.len());
        assert_eq!(pool.remaining(), 0);

        // Exhausted: the next draw starts a fresh cycle.
        assert!(pool.draw(&mut rng).is_some());
        assert_eq!(pool.remaining(), MYTH_NAMES.len() - 1);
    }

    #[test]
    fn empty_pool_draws_nothing() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut pool = LabelPool::new(&[]);
        assert_eq!(pool.draw(&mut rng), None);
    }

    #[test]
    fn landmark_names_come_from_their_kind() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut book = NameBook::new();
        for kind in LandmarkKind::ALL {
            let name = book.landmark(kind, &mut rng);
            assert!(landmark_names(kind).contains(&name.as_str()), "{kind}: {name}");
        }
    }

    #[test]
    fn separate_books_do_not_share_state() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut a = NameBook::new();
        for _ in 0..HOLDING_NAMES.len() {
            a.holding(&mut rng);
        }
        let b = NameBook::new();
        assert_eq!(a.holdings.remaining(), 0);
        assert_eq!(b.holdings.remaining(), HOLDING_NAMES.len());
    }

    #[test]
    fn every_kind_has_labels() {
        for kind in LandmarkKind::ALL {
            assert!(!landmark_names(kind).is_empty(), "{kind} has no labels");
        }
    }
}
