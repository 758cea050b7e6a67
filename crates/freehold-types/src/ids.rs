//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Claims, worlds, and players each get a strongly-typed ID so the compiler
//! rejects accidental mixing (a `ClaimId` can never be passed where a
//! `PlayerId` is expected). All IDs use UUID v7 (time-ordered), which keeps
//! storage indexes append-friendly.
//!
//! The `new()` constructors exist for app-side generation (claim creation,
//! tests, seed data); IDs restored from storage come in via `From<Uuid>`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a claim.
    ClaimId
}

define_id! {
    /// Unique identifier for a world hosting claims.
    WorldId
}

define_id! {
    /// Unique identifier for a player (claim owner).
    PlayerId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_types() {
        let claim = ClaimId::new();
        let player = PlayerId::new();
        // Different types -- the compiler enforces no mixing.
        assert_ne!(claim.into_inner(), Uuid::nil());
        assert_ne!(player.into_inner(), Uuid::nil());
    }

    #[test]
    fn id_roundtrip_serde() {
        let original = WorldId::new();
        let json = serde_json::to_string(&original).ok();
        assert!(json.is_some());
        let restored: Result<WorldId, _> =
            serde_json::from_str(json.as_deref().unwrap_or(""));
        assert!(restored.is_ok());
    }

    #[test]
    fn id_display_matches_uuid() {
        let id = ClaimId::new();
        assert_eq!(id.to_string(), id.into_inner().to_string());
    }

    #[test]
    fn id_uuid_roundtrip() {
        let id = ClaimId::new();
        let raw: Uuid = id.into();
        assert_eq!(ClaimId::from(raw), id);
    }
}
