#![allow(dead_code)]

use std::collections::BTreeSet;

use realm_gen::hex::{HexPos, HexSide};
use realm_gen::model::*;
use realm_gen::worldgen::{RealmGenConfig, TerrainStrategy};

pub fn config(strategy: TerrainStrategy, seed: u64) -> RealmGenConfig {
    RealmGenConfig {
        strategy,
        seed,
        ..RealmGenConfig::default()
    }
}

/// Small hand-built realm with one of everything.
pub fn build_test_realm() -> RealmMap {
    let mut realm = RealmMap::new("Greyhaven Marches", 6, 8);
    realm.set_cell(HexPos::new(0, 0), TerrainKind::Mountain);
    realm.set_cell(HexPos::new(2, 3), TerrainKind::Forest);
    realm.set_cell(HexPos::new(5, 7), TerrainKind::Water);
    realm.set_cell(HexPos::new(3, 3), TerrainKind::City);

    realm.add_holding(Holding::new(HexPos::new(1, 1), true, "Castle"));
    realm.add_holding(Holding::new(HexPos::new(4, 6), false, "Tower"));
    realm.add_landmark(
        Landmark::new(HexPos::new(4, 1), LandmarkKind::Sanctum, "Chapel of bones")
            .with_seer("Old Maren"),
    );
    realm.add_landmark(Landmark::new(HexPos::new(0, 5), LandmarkKind::Ruin, "Skull heap"));
    realm.add_myth(Myth::new(HexPos::new(2, 4), "The Wall"));
    realm.add_barrier(Barrier::new(HexPos::new(1, 1), HexSide::UpperRight));
    realm
}

/// Per-cell terrain in row-major order.
pub fn terrain_grid(realm: &RealmMap) -> Vec<Option<TerrainKind>> {
    realm.positions().map(|p| realm.cell(p)).collect()
}

/// Every occupied cell, with its feature name.
pub fn feature_set(realm: &RealmMap) -> BTreeSet<(HexPos, String)> {
    realm
        .features()
        .map(|f| (f.pos(), f.name().to_string()))
        .collect()
}
