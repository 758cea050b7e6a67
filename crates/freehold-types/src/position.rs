//! Integer 3D block positions.
//!
//! Claim volumes are axis-aligned boxes described by two corner positions.
//! The only ordering that matters for corners is the componentwise partial
//! order, so [`Position3D`] deliberately does not derive `Ord`; use
//! [`Position3D::componentwise_le`] and the min/max helpers instead.

use serde::{Deserialize, Serialize};

/// An integer block position in a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position3D {
    /// East-west coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
    /// North-south coordinate.
    pub z: i32,
}

impl Position3D {
    /// Create a position from its three coordinates.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Componentwise minimum of two positions.
    ///
    /// Together with [`component_max`], this normalizes an arbitrary corner
    /// pair into a lesser/greater pair satisfying the claim volume
    /// invariant.
    ///
    /// [`component_max`]: Position3D::component_max
    pub fn component_min(self, other: Self) -> Self {
        Self {
            x: self.x.min(other.x),
            y: self.y.min(other.y),
            z: self.z.min(other.z),
        }
    }

    /// Componentwise maximum of two positions.
    pub fn component_max(self, other: Self) -> Self {
        Self {
            x: self.x.max(other.x),
            y: self.y.max(other.y),
            z: self.z.max(other.z),
        }
    }

    /// Whether `self <= other` holds in every component.
    ///
    /// This is a partial order: two positions can be incomparable.
    pub const fn componentwise_le(self, other: Self) -> bool {
        self.x <= other.x && self.y <= other.y && self.z <= other.z
    }
}

impl From<(i32, i32, i32)> for Position3D {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self { x, y, z }
    }
}

impl core::fmt::Display for Position3D {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_max_normalize_any_corner_pair() {
        let a = Position3D::new(10, -3, 7);
        let b = Position3D::new(-2, 5, 7);
        let lesser = a.component_min(b);
        let greater = a.component_max(b);
        assert_eq!(lesser, Position3D::new(-2, -3, 7));
        assert_eq!(greater, Position3D::new(10, 5, 7));
        assert!(lesser.componentwise_le(greater));
    }

    #[test]
    fn componentwise_le_is_partial() {
        let a = Position3D::new(0, 10, 0);
        let b = Position3D::new(10, 0, 10);
        // Neither dominates the other.
        assert!(!a.componentwise_le(b));
        assert!(!b.componentwise_le(a));
        assert!(a.componentwise_le(a));
    }

    #[test]
    fn from_tuple() {
        let pos: Position3D = (1, 64, -9).into();
        assert_eq!(pos, Position3D::new(1, 64, -9));
    }

    #[test]
    fn display_format() {
        assert_eq!(Position3D::new(1, -2, 3).to_string(), "(1, -2, 3)");
    }

    #[test]
    fn serde_roundtrip() {
        let pos = Position3D::new(-40, 70, 255);
        let json = serde_json::to_string(&pos).ok();
        let restored: Result<Position3D, _> =
            serde_json::from_str(json.as_deref().unwrap_or(""));
        assert_eq!(restored.ok(), Some(pos));
    }
}
