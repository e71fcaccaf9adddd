use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::feature::{Barrier, FeatureRef, Holding, Landmark, Myth};
use super::terrain::TerrainKind;
use crate::hex::{self, HexPos, HexSide};

/// Current document/model version.
pub const REALM_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealmMetadata {
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    pub version: String,
}

impl RealmMetadata {
    fn now() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            last_modified: now,
            version: REALM_VERSION.to_string(),
        }
    }
}

/// A rows x cols hex grid of terrain plus the features placed on it.
///
/// Cells are stored row-major and owned by value; callers refer to a cell by
/// `HexPos` or by grid index, never by reference. Every feature and barrier
/// lies inside the grid: the `add_*` methods reject anything else.
#[derive(Debug, Clone, PartialEq)]
pub struct RealmMap {
    pub name: String,
    rows: u32,
    cols: u32,
    cells: Vec<TerrainKind>,
    holdings: Vec<Holding>,
    landmarks: Vec<Landmark>,
    myths: Vec<Myth>,
    barriers: Vec<Barrier>,
    pub metadata: RealmMetadata,
}

impl RealmMap {
    /// An all-`Empty` realm with no features.
    pub fn new(name: impl Into<String>, rows: u32, cols: u32) -> Self {
        Self {
            name: name.into(),
            rows,
            cols,
            cells: vec![TerrainKind::Empty; rows as usize * cols as usize],
            holdings: Vec::new(),
            landmarks: Vec::new(),
            myths: Vec::new(),
            barriers: Vec::new(),
            metadata: RealmMetadata::now(),
        }
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: HexPos) -> bool {
        pos.in_bounds(self.rows, self.cols)
    }

    /// Row-major grid index of `pos`, or `None` outside the grid.
    pub fn index_of(&self, pos: HexPos) -> Option<usize> {
        self.contains(pos)
            .then(|| pos.row as usize * self.cols as usize + pos.col as usize)
    }

    pub fn pos_of(&self, index: usize) -> Option<HexPos> {
        (index < self.cells.len()).then(|| {
            let cols = self.cols as usize;
            HexPos::new((index / cols) as i32, (index % cols) as i32)
        })
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = HexPos> + use<> {
        let (rows, cols) = (self.rows as i32, self.cols as i32);
        (0..rows).flat_map(move |r| (0..cols).map(move |c| HexPos::new(r, c)))
    }

    fn touch(&mut self) {
        self.metadata.last_modified = Utc::now();
    }

    // -----------------------------------------------------------------------
    // Terrain
    // -----------------------------------------------------------------------

    pub fn cell(&self, pos: HexPos) -> Option<TerrainKind> {
        self.index_of(pos).map(|i| self.cells[i])
    }

    /// Replace the terrain of one cell. Out-of-bounds positions are ignored.
    /// Returns whether a cell was written.
    pub fn set_cell(&mut self, pos: HexPos, kind: TerrainKind) -> bool {
        let Some(i) = self.index_of(pos) else {
            return false;
        };
        self.cells[i] = kind;
        self.touch();
        true
    }

    /// Advance a cell to the next terrain kind in catalog order.
    pub fn cycle_cell(&mut self, pos: HexPos) -> Option<TerrainKind> {
        let next = self.cell(pos)?.next();
        self.set_cell(pos, next);
        Some(next)
    }

    pub fn cells_of_kind(&self, kind: TerrainKind) -> Vec<HexPos> {
        self.positions()
            .zip(self.cells.iter())
            .filter(|(_, k)| **k == kind)
            .map(|(p, _)| p)
            .collect()
    }

    /// Cell counts per terrain kind. Every catalog kind is present.
    pub fn terrain_stats(&self) -> BTreeMap<TerrainKind, usize> {
        let mut stats: BTreeMap<TerrainKind, usize> =
            TerrainKind::ALL.iter().map(|&k| (k, 0)).collect();
        for kind in &self.cells {
            *stats.entry(*kind).or_insert(0) += 1;
        }
        stats
    }

    // -----------------------------------------------------------------------
    // Features
    // -----------------------------------------------------------------------

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    pub fn myths(&self) -> &[Myth] {
        &self.myths
    }

    pub fn barriers(&self) -> &[Barrier] {
        &self.barriers
    }

    /// Append a holding. Placement rules are the caller's concern; only the
    /// grid bound is checked.
    pub fn add_holding(&mut self, holding: Holding) -> bool {
        if !self.contains(holding.pos) {
            return false;
        }
        self.holdings.push(holding);
        self.touch();
        true
    }

    pub fn add_landmark(&mut self, landmark: Landmark) -> bool {
        if !self.contains(landmark.pos) {
            return false;
        }
        self.landmarks.push(landmark);
        self.touch();
        true
    }

    pub fn add_myth(&mut self, myth: Myth) -> bool {
        if !self.contains(myth.pos) {
            return false;
        }
        self.myths.push(myth);
        self.touch();
        true
    }

    /// Add a barrier. A second barrier on the same `(row, col, side)` is
    /// rejected and leaves the realm unchanged.
    pub fn add_barrier(&mut self, barrier: Barrier) -> bool {
        if !self.contains(barrier.pos) || self.barriers.contains(&barrier) {
            return false;
        }
        self.barriers.push(barrier);
        self.touch();
        true
    }

    pub fn holding_at(&self, pos: HexPos) -> Option<&Holding> {
        self.holdings.iter().find(|h| h.pos == pos)
    }

    pub fn landmark_at(&self, pos: HexPos) -> Option<&Landmark> {
        self.landmarks.iter().find(|l| l.pos == pos)
    }

    pub fn myth_at(&self, pos: HexPos) -> Option<&Myth> {
        self.myths.iter().find(|m| m.pos == pos)
    }

    pub fn holding_at_mut(&mut self, pos: HexPos) -> Option<&mut Holding> {
        self.holdings.iter_mut().find(|h| h.pos == pos)
    }

    pub fn landmark_at_mut(&mut self, pos: HexPos) -> Option<&mut Landmark> {
        self.landmarks.iter_mut().find(|l| l.pos == pos)
    }

    pub fn myth_at_mut(&mut self, pos: HexPos) -> Option<&mut Myth> {
        self.myths.iter_mut().find(|m| m.pos == pos)
    }

    /// The first feature at `pos`, checking holdings, then landmarks, then myths.
    pub fn feature_at(&self, pos: HexPos) -> Option<FeatureRef<'_>> {
        self.holding_at(pos)
            .map(FeatureRef::Holding)
            .or_else(|| self.landmark_at(pos).map(FeatureRef::Landmark))
            .or_else(|| self.myth_at(pos).map(FeatureRef::Myth))
    }

    pub fn has_feature_at(&self, pos: HexPos) -> bool {
        self.feature_at(pos).is_some()
    }

    /// Every holding, landmark and myth.
    pub fn features(&self) -> impl Iterator<Item = FeatureRef<'_>> {
        self.holdings
            .iter()
            .map(FeatureRef::Holding)
            .chain(self.landmarks.iter().map(FeatureRef::Landmark))
            .chain(self.myths.iter().map(FeatureRef::Myth))
    }

    /// Remove every holding at `pos`. Returns how many were removed.
    pub fn remove_holding(&mut self, pos: HexPos) -> usize {
        let before = self.holdings.len();
        self.holdings.retain(|h| h.pos != pos);
        self.removed(before - self.holdings.len())
    }

    pub fn remove_landmark(&mut self, pos: HexPos) -> usize {
        let before = self.landmarks.len();
        self.landmarks.retain(|l| l.pos != pos);
        self.removed(before - self.landmarks.len())
    }

    pub fn remove_myth(&mut self, pos: HexPos) -> usize {
        let before = self.myths.len();
        self.myths.retain(|m| m.pos != pos);
        self.removed(before - self.myths.len())
    }

    pub fn remove_barrier(&mut self, pos: HexPos, side: HexSide) -> usize {
        let before = self.barriers.len();
        self.barriers.retain(|b| !(b.pos == pos && b.side == side));
        self.removed(before - self.barriers.len())
    }

    fn removed(&mut self, count: usize) -> usize {
        if count > 0 {
            self.touch();
        }
        count
    }

    // -----------------------------------------------------------------------
    // Barriers
    // -----------------------------------------------------------------------

    pub fn barriers_at(&self, pos: HexPos) -> Vec<HexSide> {
        self.barriers
            .iter()
            .filter(|b| b.pos == pos)
            .map(|b| b.side)
            .collect()
    }

    /// Whether a barrier sits on the edge shared by two adjacent hexes,
    /// recorded from either side. Non-adjacent hexes are never blocked.
    pub fn is_blocked(&self, from: HexPos, to: HexPos) -> bool {
        let Some(side) = hex::side_between(from, to) else {
            return false;
        };
        self.barriers.contains(&Barrier::new(from, side))
            || self.barriers.contains(&Barrier::new(to, side.opposite()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LandmarkKind;

    #[test]
    fn new_realm_is_all_empty() {
        let realm = RealmMap::new("Test", 3, 4);
        assert_eq!(realm.len(), 12);
        assert!(realm.positions().all(|p| realm.cell(p) == Some(TerrainKind::Empty)));
    }

    #[test]
    fn out_of_bounds_access_is_harmless() {
        let mut realm = RealmMap::new("Test", 3, 3);
        assert_eq!(realm.cell(HexPos::new(-1, 0)), None);
        assert_eq!(realm.cell(HexPos::new(0, 3)), None);
        assert!(!realm.set_cell(HexPos::new(3, 0), TerrainKind::Forest));
        assert_eq!(realm.cycle_cell(HexPos::new(5, 5)), None);
        assert_eq!(realm.terrain_stats()[&TerrainKind::Empty], 9);
    }

    #[test]
    fn index_and_pos_agree() {
        let realm = RealmMap::new("Test", 4, 5);
        for (i, p) in realm.positions().enumerate() {
            assert_eq!(realm.index_of(p), Some(i));
            assert_eq!(realm.pos_of(i), Some(p));
        }
        assert_eq!(realm.pos_of(20), None);
    }

    #[test]
    fn set_cell_touches_last_modified() {
        let mut realm = RealmMap::new("Test", 2, 2);
        let before = realm.metadata.last_modified;
        assert!(realm.set_cell(HexPos::new(1, 1), TerrainKind::Water));
        assert!(realm.metadata.last_modified >= before);
        assert_eq!(realm.cell(HexPos::new(1, 1)), Some(TerrainKind::Water));
    }

    #[test]
    fn stats_cover_catalog_and_sum_to_cells() {
        let mut realm = RealmMap::new("Test", 3, 3);
        realm.set_cell(HexPos::new(0, 0), TerrainKind::Mountain);
        let stats = realm.terrain_stats();
        assert_eq!(stats.len(), TerrainKind::ALL.len());
        assert_eq!(stats.values().sum::<usize>(), 9);
        assert_eq!(stats[&TerrainKind::City], 0);
    }

    #[test]
    fn cycle_cell_walks_catalog() {
        let mut realm = RealmMap::new("Test", 1, 1);
        let pos = HexPos::new(0, 0);
        assert_eq!(realm.cycle_cell(pos), Some(TerrainKind::Plains));
        assert_eq!(realm.cycle_cell(pos), Some(TerrainKind::Forest));
        assert_eq!(realm.cells_of_kind(TerrainKind::Forest), vec![pos]);
    }

    #[test]
    fn add_rejects_out_of_bounds_features() {
        let mut realm = RealmMap::new("Test", 2, 2);
        assert!(!realm.add_holding(Holding::new(HexPos::new(2, 0), false, "Tower")));
        assert!(!realm.add_myth(Myth::new(HexPos::new(0, -1), "The Wall")));
        assert!(realm.holdings().is_empty());
        assert!(realm.myths().is_empty());
    }

    #[test]
    fn feature_lookup_and_removal() {
        let mut realm = RealmMap::new("Test", 5, 5);
        let pos = HexPos::new(2, 2);
        realm.add_landmark(Landmark::new(pos, LandmarkKind::Hazard, "Razor rocks"));
        assert!(realm.has_feature_at(pos));
        assert!(matches!(realm.feature_at(pos), Some(FeatureRef::Landmark(_))));

        realm.landmark_at_mut(pos).unwrap().name = "Carrion birds".into();
        assert_eq!(realm.landmark_at(pos).unwrap().name, "Carrion birds");

        assert_eq!(realm.remove_landmark(pos), 1);
        assert_eq!(realm.remove_landmark(pos), 0);
        assert!(!realm.has_feature_at(pos));
    }

    #[test]
    fn clone_is_independent() {
        let mut realm = RealmMap::new("Test", 2, 2);
        realm.add_myth(Myth::new(HexPos::new(0, 0), "The Beast"));
        let mut copy = realm.clone();
        copy.set_cell(HexPos::new(0, 0), TerrainKind::Swamp);
        copy.myth_at_mut(HexPos::new(0, 0)).unwrap().name = "The Child".into();
        assert_eq!(realm.cell(HexPos::new(0, 0)), Some(TerrainKind::Empty));
        assert_eq!(realm.myths()[0].name, "The Beast");
    }

    #[test]
    fn barriers_block_shared_edge_from_either_side() {
        let mut realm = RealmMap::new("Test", 4, 4);
        let a = HexPos::new(1, 1);
        let b = hex::neighbor(a, HexSide::Right).unwrap();
        assert!(realm.add_barrier(Barrier::new(a, HexSide::Right)));
        assert!(realm.is_blocked(a, b));
        assert!(realm.is_blocked(b, a));
        assert!(!realm.is_blocked(a, HexPos::new(1, 0)));
        assert_eq!(realm.barriers_at(a), vec![HexSide::Right]);
        assert_eq!(realm.remove_barrier(a, HexSide::Right), 1);
        assert!(!realm.is_blocked(a, b));
    }

    #[test]
    fn is_blocked_tolerates_positions_far_off_the_grid() {
        let mut realm = RealmMap::new("Test", 3, 3);
        realm.add_barrier(Barrier::new(HexPos::new(0, 0), HexSide::Right));
        assert!(!realm.is_blocked(HexPos::new(i32::MAX, i32::MAX), HexPos::new(0, 0)));
        assert!(!realm.is_blocked(HexPos::new(0, 0), HexPos::new(i32::MIN, i32::MIN)));
        assert!(!realm.is_blocked(
            HexPos::new(i32::MAX, i32::MAX),
            HexPos::new(i32::MAX, i32::MAX - 1)
        ));
    }
}
