use std::collections::VecDeque;

use rand::Rng;
use rand::RngCore;
use rand::seq::SliceRandom;

use crate::hex::HexPos;
use crate::model::{RealmMap, TerrainKind};

use super::config::{TerrainStrategy, TerrainWeights};

/// Kinds every strategy draws from.
const POOL: [TerrainKind; 6] = TerrainKind::GENERATED;

/// Chance that a growing region spreads into each rectilinear neighbor.
const SPREAD_CHANCE: f64 = 0.6;

/// Inclusive bounds on the size of one clustered region.
const MIN_REGION: usize = 3;
const MAX_REGION: usize = 10;

/// One clustered seed per this many cells (capped at the pool size).
const CELLS_PER_SEED: usize = 8;

/// Overwrite every cell of `realm` using the given strategy.
pub fn synthesize_terrain(
    realm: &mut RealmMap,
    strategy: TerrainStrategy,
    weights: &TerrainWeights,
    rng: &mut dyn RngCore,
) {
    tracing::debug!(
        %strategy,
        rows = realm.rows(),
        cols = realm.cols(),
        "synthesizing terrain"
    );
    match strategy {
        TerrainStrategy::Random => fill_random(realm, rng),
        TerrainStrategy::Balanced => fill_balanced(realm, rng),
        TerrainStrategy::Weighted => fill_weighted(realm, weights, rng),
        TerrainStrategy::Clustered => fill_clustered(realm, rng),
    }
}

fn pick(pool: &[TerrainKind], rng: &mut dyn RngCore) -> TerrainKind {
    pool[rng.random_range(0..pool.len())]
}

/// Independent uniform draw per cell.
pub fn fill_random(realm: &mut RealmMap, rng: &mut dyn RngCore) {
    let positions: Vec<HexPos> = realm.positions().collect();
    for pos in positions {
        realm.set_cell(pos, pick(&POOL, rng));
    }
}

/// Shuffle the cells, give the first ones each pool kind once, then fill the
/// rest uniformly. Every kind is present whenever the grid has room for it.
pub fn fill_balanced(realm: &mut RealmMap, rng: &mut dyn RngCore) {
    let mut positions: Vec<HexPos> = realm.positions().collect();
    positions.shuffle(rng);

    let mut remaining = positions.into_iter();
    for (kind, pos) in POOL.iter().zip(remaining.by_ref()) {
        realm.set_cell(pos, *kind);
    }
    for pos in remaining {
        realm.set_cell(pos, pick(&POOL, rng));
    }
}

/// Upper bound on copies of one kind in the weighted multiset (a weight of 1.0).
const MAX_COPIES: usize = 100;

/// The draw multiset for the weighted strategy: `floor(weight * 100)` copies
/// of each pool kind, at most `MAX_COPIES`.
///
/// This approximates the weights rather than sampling them exactly; weights
/// that are not whole percentages lose their fractional part. Weights above
/// 1.0 count as 1.0; negative or non-finite weights count as 0.
pub fn weighted_pool(weights: &TerrainWeights) -> Vec<TerrainKind> {
    POOL.iter()
        .flat_map(|&kind| std::iter::repeat_n(kind, copies_for(weights.weight(kind))))
        .collect()
}

fn copies_for(weight: f64) -> usize {
    if !weight.is_finite() || weight <= 0.0 {
        return 0;
    }
    ((weight * 100.0).floor() as usize).min(MAX_COPIES)
}

/// Uniform draws from `weighted_pool`. Falls back to the plain pool when no
/// kind weighs at least one percent.
pub fn fill_weighted(realm: &mut RealmMap, weights: &TerrainWeights, rng: &mut dyn RngCore) {
    let pool = weighted_pool(weights);
    if pool.is_empty() {
        tracing::warn!("all terrain weights are below 0.01, falling back to uniform terrain");
        fill_random(realm, rng);
        return;
    }
    let positions: Vec<HexPos> = realm.positions().collect();
    for pos in positions {
        realm.set_cell(pos, pick(&pool, rng));
    }
}

/// Grow regions of one kind from random seeds, then fill whatever no region
/// reached with uniform draws.
///
/// Regions spread over the four rectilinear neighbors (row +/- 1, col +/- 1),
/// not the hex neighbors.
pub fn fill_clustered(realm: &mut RealmMap, rng: &mut dyn RngCore) {
    if realm.is_empty() {
        return;
    }
    let (rows, cols) = (realm.rows(), realm.cols());
    let mut visited = vec![false; realm.len()];

    let seed_count = POOL.len().min(realm.len() / CELLS_PER_SEED);
    let seeds: Vec<(HexPos, TerrainKind)> = (0..seed_count)
        .map(|i| {
            let pos = HexPos::new(
                rng.random_range(0..rows) as i32,
                rng.random_range(0..cols) as i32,
            );
            (pos, POOL[i % POOL.len()])
        })
        .collect();

    for (seed, kind) in seeds {
        let target = rng.random_range(MIN_REGION..=MAX_REGION);
        let mut grown = 0;
        let mut queue = VecDeque::from([seed]);

        while grown < target {
            let Some(current) = queue.pop_front() else {
                break;
            };
            let Some(idx) = realm.index_of(current) else {
                continue;
            };
            if visited[idx] {
                continue;
            }
            visited[idx] = true;
            realm.set_cell(current, kind);
            grown += 1;

            for (dr, dc) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
                if rng.random_bool(SPREAD_CHANCE) {
                    queue.push_back(HexPos::new(current.row + dr, current.col + dc));
                }
            }
        }
    }

    let unvisited: Vec<HexPos> = visited
        .iter()
        .enumerate()
        .filter(|(_, seen)| !**seen)
        .filter_map(|(idx, _)| realm.pos_of(idx))
        .collect();
    for pos in unvisited {
        realm.set_cell(pos, pick(&POOL, rng));
    }
}
