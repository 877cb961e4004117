//! Positions, the weighted distance metric, and range bands.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::consts::{
    CLOSE_RANGE_MAX, DEPTH_WEIGHT_DEN, DEPTH_WEIGHT_NUM, FAR_RANGE_MAX, MEDIUM_RANGE_MAX,
    MELEE_RANGE_MAX,
};

/// A combat-grid position. `depth` counts rift layers, which weigh
/// more than lateral steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position3D {
    pub x: i32,
    pub y: i32,
    pub depth: i32,
}

impl Position3D {
    pub const ORIGIN: Position3D = Position3D::new(0, 0, 0);

    pub const fn new(x: i32, y: i32, depth: i32) -> Self {
        Self { x, y, depth }
    }
}

/// Weighted Manhattan distance: lateral steps count one each, depth
/// steps one and a half, truncated.
pub const fn raw_distance(a: Position3D, b: Position3D) -> i32 {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    let ddepth = (a.depth - b.depth).abs();
    dx + dy + (ddepth * DEPTH_WEIGHT_NUM) / DEPTH_WEIGHT_DEN
}

/// Range band, ordered nearest first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
pub enum DistanceBand {
    Melee,
    Close,
    Medium,
    Far,
    Extreme,
}

impl DistanceBand {
    pub const fn from_raw(distance: i32) -> Self {
        if distance <= MELEE_RANGE_MAX {
            DistanceBand::Melee
        } else if distance <= CLOSE_RANGE_MAX {
            DistanceBand::Close
        } else if distance <= MEDIUM_RANGE_MAX {
            DistanceBand::Medium
        } else if distance <= FAR_RANGE_MAX {
            DistanceBand::Far
        } else {
            DistanceBand::Extreme
        }
    }

    /// Index into per-band tables such as the accuracy row.
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Band damage modifier. Flattened to 1.0 everywhere; range now
    /// expresses itself through accuracy alone.
    pub const fn damage_modifier(&self) -> f32 {
        1.0
    }
}

/// Band separating two positions.
pub const fn band_between(a: Position3D, b: Position3D) -> DistanceBand {
    DistanceBand::from_raw(raw_distance(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_weighs_three_halves_truncating() {
        let origin = Position3D::ORIGIN;
        assert_eq!(raw_distance(origin, Position3D::new(0, 0, 1)), 1);
        assert_eq!(raw_distance(origin, Position3D::new(0, 0, 2)), 3);
        assert_eq!(raw_distance(origin, Position3D::new(0, 0, 3)), 4);
        assert_eq!(raw_distance(origin, Position3D::new(2, 3, 2)), 8);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Position3D::new(-2, 5, 1);
        let b = Position3D::new(3, -1, -2);
        assert_eq!(raw_distance(a, b), raw_distance(b, a));
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(DistanceBand::from_raw(0), DistanceBand::Melee);
        assert_eq!(DistanceBand::from_raw(1), DistanceBand::Melee);
        assert_eq!(DistanceBand::from_raw(2), DistanceBand::Close);
        assert_eq!(DistanceBand::from_raw(3), DistanceBand::Close);
        assert_eq!(DistanceBand::from_raw(4), DistanceBand::Medium);
        assert_eq!(DistanceBand::from_raw(6), DistanceBand::Medium);
        assert_eq!(DistanceBand::from_raw(7), DistanceBand::Far);
        assert_eq!(DistanceBand::from_raw(10), DistanceBand::Far);
        assert_eq!(DistanceBand::from_raw(11), DistanceBand::Extreme);
        assert_eq!(DistanceBand::from_raw(40), DistanceBand::Extreme);
    }

    #[test]
    fn test_bands_order_nearest_first() {
        assert!(DistanceBand::Melee < DistanceBand::Close);
        assert!(DistanceBand::Close < DistanceBand::Medium);
        assert!(DistanceBand::Medium < DistanceBand::Far);
        assert!(DistanceBand::Far < DistanceBand::Extreme);
    }

    #[test]
    fn test_band_index_matches_table_layout() {
        assert_eq!(DistanceBand::Melee.index(), 0);
        assert_eq!(DistanceBand::Extreme.index(), 4);
    }
}
