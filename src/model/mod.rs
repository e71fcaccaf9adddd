#[macro_use]
mod macros;

pub mod feature;
pub mod realm;
pub mod terrain;

pub use feature::{Barrier, FeatureRef, Holding, Landmark, LandmarkKind, Myth};
pub use realm::{REALM_VERSION, RealmMap, RealmMetadata};
pub use terrain::TerrainKind;
