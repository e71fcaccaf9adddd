//! Geometry of the offset ("odd-row") hex layout.
//!
//! Hexes are pointy-topped; odd rows are shifted right by half a hex. All
//! functions here are pure and never touch a realm.

use serde::{Deserialize, Serialize};

/// Default hex radius in pixels.
pub const DEFAULT_HEX_SIZE: f64 = 30.0;

/// Horizontal center spacing as a multiple of the hex size.
const X_SPACING: f64 = 1.732_050_807_568_877_2; // sqrt(3)

/// Vertical center spacing as a multiple of the hex size.
const Y_SPACING: f64 = 1.5;

const EVEN_ROW_OFFSETS: [(i32, i32); 6] = [(-1, -1), (-1, 0), (0, -1), (0, 1), (1, -1), (1, 0)];
const ODD_ROW_OFFSETS: [(i32, i32); 6] = [(-1, 0), (-1, 1), (0, -1), (0, 1), (1, 0), (1, 1)];

/// Offset grid coordinate. Signed so that positions outside a grid can be
/// expressed and rejected by bounds checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HexPos {
    pub row: i32,
    pub col: i32,
}

impl HexPos {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn is_odd_row(self) -> bool {
        self.row.rem_euclid(2) == 1
    }

    /// Whether the position lies inside a `rows x cols` grid.
    pub fn in_bounds(self, rows: u32, cols: u32) -> bool {
        self.row >= 0 && self.col >= 0 && (self.row as u32) < rows && (self.col as u32) < cols
    }

    /// `None` when the step would leave the `i32` coordinate range.
    fn offset(self, (dr, dc): (i32, i32)) -> Option<HexPos> {
        Some(HexPos::new(
            self.row.checked_add(dr)?,
            self.col.checked_add(dc)?,
        ))
    }

    /// Cube coordinates `(x, y, z)` for this offset position. Widened to
    /// `i64` so every `i32` position converts without overflow.
    pub fn to_cube(self) -> (i64, i64, i64) {
        let (row, col) = (i64::from(self.row), i64::from(self.col));
        let x = col - (row - row.rem_euclid(2)).div_euclid(2);
        let z = row;
        let y = -x - z;
        (x, y, z)
    }
}

impl std::fmt::Display for HexPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

// ---------------------------------------------------------------------------
// HexSide
// ---------------------------------------------------------------------------

/// One of the six edges of a hex, numbered 1..=6 clockwise from the left edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum HexSide {
    Left = 1,
    UpperLeft = 2,
    UpperRight = 3,
    Right = 4,
    LowerRight = 5,
    LowerLeft = 6,
}

impl HexSide {
    pub const ALL: [HexSide; 6] = [
        HexSide::Left,
        HexSide::UpperLeft,
        HexSide::UpperRight,
        HexSide::Right,
        HexSide::LowerRight,
        HexSide::LowerLeft,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<HexSide> {
        match n {
            1..=6 => Some(HexSide::ALL[(n - 1) as usize]),
            _ => None,
        }
    }

    /// The same edge seen from the neighboring hex.
    pub fn opposite(self) -> HexSide {
        HexSide::ALL[(self.number() as usize + 2) % 6]
    }

    fn offset(self, odd_row: bool) -> (i32, i32) {
        match (self, odd_row) {
            (HexSide::Left, _) => (0, -1),
            (HexSide::Right, _) => (0, 1),
            (HexSide::UpperLeft, false) => (-1, -1),
            (HexSide::UpperLeft, true) => (-1, 0),
            (HexSide::UpperRight, false) => (-1, 0),
            (HexSide::UpperRight, true) => (-1, 1),
            (HexSide::LowerRight, false) => (1, 0),
            (HexSide::LowerRight, true) => (1, 1),
            (HexSide::LowerLeft, false) => (1, -1),
            (HexSide::LowerLeft, true) => (1, 0),
        }
    }
}

impl From<HexSide> for u8 {
    fn from(side: HexSide) -> Self {
        side.number()
    }
}

impl TryFrom<u8> for HexSide {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        HexSide::from_number(n).ok_or_else(|| format!("hex side must be 1..=6, got {n}"))
    }
}

// ---------------------------------------------------------------------------
// Pixel space
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Pixel-space center of a hex, leaving a margin of one `size` on both axes.
pub fn center_of(pos: HexPos, size: f64) -> Point {
    let x_spacing = size * X_SPACING;
    let y_spacing = size * Y_SPACING;
    let shift = if pos.is_odd_row() { x_spacing / 2.0 } else { 0.0 };
    Point {
        x: pos.col as f64 * x_spacing + shift + size,
        y: pos.row as f64 * y_spacing + size,
    }
}

/// Width and height of a surface that fits a `rows x cols` grid.
pub fn canvas_size(rows: u32, cols: u32, size: f64) -> (f64, f64) {
    (
        cols as f64 * size * X_SPACING + size * 2.0,
        rows as f64 * size * Y_SPACING + size * 2.0,
    )
}

/// Hexagon vertices, starting at the top and proceeding clockwise.
pub fn boundary_path(center: Point, size: f64) -> [Point; 6] {
    std::array::from_fn(|i| {
        let angle = (i as f64 * 60.0 - 90.0).to_radians();
        Point {
            x: center.x + size * angle.cos(),
            y: center.y + size * angle.sin(),
        }
    })
}

/// Closed SVG path for a polygon: `M x,y L x,y ... Z`.
pub fn svg_path(points: &[Point]) -> String {
    let coords: Vec<String> = points.iter().map(|p| format!("{},{}", p.x, p.y)).collect();
    format!("M {} Z", coords.join(" L "))
}

// ---------------------------------------------------------------------------
// Adjacency and distance
// ---------------------------------------------------------------------------

/// In-bounds neighbors of `pos` on a `rows x cols` grid.
pub fn neighbors(pos: HexPos, rows: u32, cols: u32) -> Vec<HexPos> {
    let offsets = if pos.is_odd_row() {
        &ODD_ROW_OFFSETS
    } else {
        &EVEN_ROW_OFFSETS
    };
    offsets
        .iter()
        .filter_map(|&d| pos.offset(d))
        .filter(|p| p.in_bounds(rows, cols))
        .collect()
}

/// The hex across `side` of `pos`. May lie outside any particular grid;
/// `None` only past the edge of the `i32` coordinate space.
pub fn neighbor(pos: HexPos, side: HexSide) -> Option<HexPos> {
    pos.offset(side.offset(pos.is_odd_row()))
}

/// The side of `from` shared with `to`, if the two hexes are adjacent.
pub fn side_between(from: HexPos, to: HexPos) -> Option<HexSide> {
    HexSide::ALL.into_iter().find(|&s| neighbor(from, s) == Some(to))
}

/// Exact hex-grid distance (Chebyshev distance on cube coordinates),
/// saturating at `u32::MAX` for positions far outside any grid.
pub fn hex_distance(a: HexPos, b: HexPos) -> u32 {
    let (ax, ay, az) = a.to_cube();
    let (bx, by, bz) = b.to_cube();
    let d = (ax - bx)
        .unsigned_abs()
        .max((ay - by).unsigned_abs())
        .max((az - bz).unsigned_abs());
    u32::try_from(d).unwrap_or(u32::MAX)
}
