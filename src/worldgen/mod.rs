pub mod config;
pub mod names;
pub mod placement;
pub mod terrain;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::model::RealmMap;

pub use config::{ConfigError, RealmGenConfig, TerrainStrategy, TerrainWeights};
pub use names::{LabelPool, NameBook};
pub use placement::{FeaturePlacer, PlacementReport, PlacementViolation, placement_violations};

/// How many features of each category a generation run asked for and got.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub holdings: PlacementReport,
    pub landmarks: PlacementReport,
    pub myths: PlacementReport,
}

impl GenerationReport {
    pub fn is_complete(&self) -> bool {
        self.holdings.is_complete() && self.landmarks.is_complete() && self.myths.is_complete()
    }
}

/// Generate a complete realm: terrain, then holdings, landmarks and myths.
pub fn generate_realm(config: &RealmGenConfig) -> RealmMap {
    generate_realm_with_report(config).0
}

/// Like `generate_realm`, also reporting any features that could not be placed.
///
/// Features are placed strictly in the order holdings, landmarks, myths:
/// landmark and myth rules are checked against the holdings already on the
/// map, and myths against earlier myths.
pub fn generate_realm_with_report(config: &RealmGenConfig) -> (RealmMap, GenerationReport) {
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let mut realm = RealmMap::new(config.name.clone(), config.rows, config.cols);

    terrain::synthesize_terrain(&mut realm, config.strategy, &config.weights, &mut rng);

    let mut placer = FeaturePlacer::new(NameBook::new(), config.max_attempts);
    let report = GenerationReport {
        holdings: placer.place_holdings(&mut realm, config.holdings, &mut rng),
        landmarks: placer.place_landmarks(&mut realm, config.landmarks_per_kind, &mut rng),
        myths: placer.place_myths(&mut realm, config.myths, &mut rng),
    };

    tracing::debug!(
        seed = config.seed,
        holdings = report.holdings.placed,
        landmarks = report.landmarks.placed,
        myths = report.myths.placed,
        "realm generated"
    );
    (realm, report)
}
