//! Terrain queries combat is allowed to ask.
//!
//! Level generation lives outside this crate; movement actions and hazard
//! placement only ever need these two predicates.

use serde::{Deserialize, Serialize};

/// Walkability view of the current level.
pub trait Dungeon {
    fn in_bounds(&self, x: i32, y: i32) -> bool;
    fn is_walkable(&self, x: i32, y: i32) -> bool;
}

/// A rectangular chamber with optional blocked tiles.
///
/// The smallest useful `Dungeon`; encounters staged without a generated
/// level (arena fights, tests) run on one of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquareChamber {
    width: i32,
    height: i32,
    blocked: Vec<(i32, i32)>,
}

impl SquareChamber {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            blocked: Vec::new(),
        }
    }

    /// Mark a tile as unwalkable (rubble, pillar, chasm).
    pub fn block(&mut self, x: i32, y: i32) {
        if !self.blocked.contains(&(x, y)) {
            self.blocked.push((x, y));
        }
    }

    pub const fn width(&self) -> i32 {
        self.width
    }

    pub const fn height(&self) -> i32 {
        self.height
    }
}

impl Dungeon for SquareChamber {
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && !self.blocked.contains(&(x, y))
    }
}
