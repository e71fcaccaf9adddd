pub mod hex;
#[macro_use]
pub mod model;
pub mod export;
pub mod worldgen;

pub use hex::{HexPos, HexSide, hex_distance};
pub use model::{
    Barrier, FeatureRef, Holding, Landmark, LandmarkKind, Myth, RealmMap, TerrainKind,
};
pub use worldgen::{RealmGenConfig, TerrainStrategy, generate_realm, generate_realm_with_report};
