//! Farm grid coordinates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A slot on the farm grid. Plants and devices are keyed by this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const ORIGIN: GridPos = GridPos { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to an arbitrary point in grid units.
    pub fn distance_to(self, point: (f64, f64)) -> f64 {
        let dx = self.x as f64 - point.0;
        let dy = self.y as f64 - point.1;
        (dx * dx + dy * dy).sqrt()
    }

    /// Centre of the slot as a query point.
    pub fn as_point(self) -> (f64, f64) {
        (self.x as f64, self.y as f64)
    }

    /// Whether the slot lies inside a `width` × `height` farm anchored at the origin.
    pub fn in_bounds(self, width: u32, height: u32) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as u32) < width && (self.y as u32) < height
    }
}

impl From<(i32, i32)> for GridPos {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
