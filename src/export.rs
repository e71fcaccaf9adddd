//! The JSON realm document used for import and export.
//!
//! Export writes every cell's terrain and every feature. Import validates the
//! document shape up front and fails as a whole on structural problems, but
//! skips individual entries it cannot use (unknown terrain or landmark types,
//! positions outside the grid, barrier sides outside 1..=6).

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::hex::{HexPos, HexSide};
use crate::model::{Barrier, Holding, Landmark, LandmarkKind, Myth, RealmMap, TerrainKind};
use crate::worldgen::config;

/// Largest accepted row or column count on import.
pub const MAX_DIMENSION: u64 = config::MAX_DIMENSION as u64;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("realm document must be a JSON object")]
    NotAnObject,

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("field `{0}` must be an array")]
    NotAnArray(&'static str),

    #[error("realm dimensions must be between 1 and {max}, got {rows}x{cols}", max = MAX_DIMENSION)]
    InvalidDimensions { rows: u64, cols: u64 },

    #[error("malformed entry {index} in `{collection}`: {source}")]
    MalformedEntry {
        collection: &'static str,
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("could not encode realm: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Import(#[from] ImportError),
}

/// One grid cell in the `terrain` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainEntry {
    pub row: i32,
    pub col: i32,
    #[serde(rename = "type")]
    pub kind: TerrainKind,
}

/// The exported shape of a realm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealmDocument {
    pub name: String,
    pub rows: u32,
    pub cols: u32,
    pub terrain: Vec<TerrainEntry>,
    pub holdings: Vec<Holding>,
    pub landmarks: Vec<Landmark>,
    pub myths: Vec<Myth>,
    #[serde(default)]
    pub barriers: Vec<Barrier>,
}

pub fn to_document(realm: &RealmMap) -> RealmDocument {
    RealmDocument {
        name: realm.name.clone(),
        rows: realm.rows(),
        cols: realm.cols(),
        terrain: realm
            .positions()
            .filter_map(|pos| {
                realm.cell(pos).map(|kind| TerrainEntry {
                    row: pos.row,
                    col: pos.col,
                    kind,
                })
            })
            .collect(),
        holdings: realm.holdings().to_vec(),
        landmarks: realm.landmarks().to_vec(),
        myths: realm.myths().to_vec(),
        barriers: realm.barriers().to_vec(),
    }
}

/// Pretty-printed JSON for a realm.
pub fn to_json(realm: &RealmMap) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&to_document(realm))
}

/// File name for an exported realm: every character that is not an ASCII
/// letter or digit becomes `_`, the rest is lowercased.
pub fn export_filename(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "realm.json".to_string()
    } else {
        format!("{stem}.json")
    }
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct RawTerrainEntry {
    row: i64,
    col: i64,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct RawLandmark {
    row: i64,
    col: i64,
    #[serde(rename = "type")]
    kind: String,
    name: String,
    #[serde(default)]
    seer: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHolding {
    row: i64,
    col: i64,
    #[serde(default)]
    is_seat_of_power: bool,
    name: String,
}

#[derive(Deserialize)]
struct RawMyth {
    row: i64,
    col: i64,
    name: String,
}

#[derive(Deserialize)]
struct RawBarrier {
    row: i64,
    col: i64,
    side: i64,
}

pub fn from_json(text: &str) -> Result<RealmMap, ImportError> {
    from_value(serde_json::from_str(text)?)
}

/// Build a realm from a parsed document. Nothing is returned unless the whole
/// document passes validation.
pub fn from_value(value: Value) -> Result<RealmMap, ImportError> {
    let Value::Object(doc) = value else {
        return Err(ImportError::NotAnObject);
    };

    let name = doc
        .get("name")
        .ok_or(ImportError::MissingField("name"))?
        .as_str()
        .ok_or(ImportError::WrongType {
            field: "name",
            expected: "a string",
        })?
        .to_string();
    let rows = dimension(&doc, "rows")?;
    let cols = dimension(&doc, "cols")?;
    if !(1..=MAX_DIMENSION).contains(&rows) || !(1..=MAX_DIMENSION).contains(&cols) {
        return Err(ImportError::InvalidDimensions { rows, cols });
    }

    let terrain = array(&doc, "terrain")?.ok_or(ImportError::MissingField("terrain"))?;
    let holdings = array(&doc, "holdings")?.unwrap_or_default();
    let landmarks = array(&doc, "landmarks")?.unwrap_or_default();
    let myths = array(&doc, "myths")?.unwrap_or_default();
    let barriers = array(&doc, "barriers")?.unwrap_or_default();

    let mut realm = RealmMap::new(name, rows as u32, cols as u32);

    for (index, entry) in terrain.iter().enumerate() {
        let raw: RawTerrainEntry = entry_from(entry, "terrain", index)?;
        let Some(kind) = TerrainKind::parse(&raw.kind) else {
            tracing::warn!(index, token = %raw.kind, "skipping terrain entry with unknown type");
            continue;
        };
        let placed = pos_from(raw.row, raw.col).is_some_and(|pos| realm.set_cell(pos, kind));
        if !placed {
            tracing::warn!(index, row = raw.row, col = raw.col, "skipping terrain entry outside the grid");
        }
    }

    for (index, entry) in holdings.iter().enumerate() {
        let raw: RawHolding = entry_from(entry, "holdings", index)?;
        let added = pos_from(raw.row, raw.col).is_some_and(|pos| {
            realm.add_holding(Holding::new(pos, raw.is_seat_of_power, raw.name))
        });
        if !added {
            tracing::warn!(index, "skipping holding outside the grid");
        }
    }

    for (index, entry) in landmarks.iter().enumerate() {
        let raw: RawLandmark = entry_from(entry, "landmarks", index)?;
        let Some(kind) = LandmarkKind::parse(&raw.kind) else {
            tracing::warn!(index, token = %raw.kind, "skipping landmark with unknown type");
            continue;
        };
        let added = pos_from(raw.row, raw.col).is_some_and(|pos| {
            realm.add_landmark(Landmark {
                pos,
                kind,
                name: raw.name,
                seer: raw.seer,
            })
        });
        if !added {
            tracing::warn!(index, "skipping landmark outside the grid");
        }
    }

    for (index, entry) in myths.iter().enumerate() {
        let raw: RawMyth = entry_from(entry, "myths", index)?;
        let added = pos_from(raw.row, raw.col).is_some_and(|pos| realm.add_myth(Myth::new(pos, raw.name)));
        if !added {
            tracing::warn!(index, "skipping myth outside the grid");
        }
    }

    for (index, entry) in barriers.iter().enumerate() {
        let raw: RawBarrier = entry_from(entry, "barriers", index)?;
        let side = u8::try_from(raw.side).ok().and_then(HexSide::from_number);
        let (Some(pos), Some(side)) = (pos_from(raw.row, raw.col), side) else {
            tracing::warn!(index, side = raw.side, "skipping barrier with invalid position or side");
            continue;
        };
        realm.add_barrier(Barrier::new(pos, side));
    }

    Ok(realm)
}

fn dimension(doc: &Map<String, Value>, field: &'static str) -> Result<u64, ImportError> {
    doc.get(field)
        .ok_or(ImportError::MissingField(field))?
        .as_u64()
        .ok_or(ImportError::WrongType {
            field,
            expected: "a non-negative integer",
        })
}

/// `Ok(None)` when the field is absent, an error when it is not an array.
fn array<'a>(
    doc: &'a Map<String, Value>,
    field: &'static str,
) -> Result<Option<&'a [Value]>, ImportError> {
    match doc.get(field) {
        None => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items.as_slice())),
        Some(_) => Err(ImportError::NotAnArray(field)),
    }
}

fn entry_from<T: for<'de> Deserialize<'de>>(
    entry: &Value,
    collection: &'static str,
    index: usize,
) -> Result<T, ImportError> {
    T::deserialize(entry).map_err(|source| ImportError::MalformedEntry {
        collection,
        index,
        source,
    })
}

fn pos_from(row: i64, col: i64) -> Option<HexPos> {
    Some(HexPos::new(i32::try_from(row).ok()?, i32::try_from(col).ok()?))
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// Write `realm` into `dir` under its `export_filename`, creating the
/// directory if needed. Returns the written path.
pub fn save_realm(realm: &RealmMap, dir: &Path) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(export_filename(&realm.name));
    let mut writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(&mut writer, &to_document(realm))?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(path)
}

pub fn load_realm(path: &Path) -> Result<RealmMap, ExportError> {
    let text = fs::read_to_string(path)?;
    Ok(from_json(&text)?)
}
