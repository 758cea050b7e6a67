//! The closed [`ClaimType`] enumeration.
//!
//! A claim's type decides who may own it and whether size restrictions
//! apply. The set is closed: adding a type is a schema change, not a
//! runtime extension point.

use serde::{Deserialize, Serialize};

/// The category of a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClaimType {
    /// Server-managed claim with no owner and no size restrictions.
    Admin,
    /// A standard player claim.
    Basic,
    /// A claim nested inside another claim, delegating an interior region.
    Subdivision,
    /// A larger communal claim that can parent player claims.
    Town,
    /// The unclaimed remainder of a world; server-managed, never owned.
    Wilderness,
}

impl ClaimType {
    /// Whether claims of this type are owned by a player.
    pub const fn is_ownable(self) -> bool {
        matches!(self, Self::Basic | Self::Subdivision | Self::Town)
    }

    /// Whether claims of this type are server-managed.
    ///
    /// Administrative claims never have an owner and never carry size
    /// restrictions, regardless of how they were configured before a type
    /// change.
    pub const fn is_administrative(self) -> bool {
        matches!(self, Self::Admin | Self::Wilderness)
    }
}
