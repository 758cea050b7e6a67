//! Land-claim management core for shared worlds.
//!
//! A claim is an axis-aligned 3D region of a world with an owner, settings,
//! an optional parent claim, and an optional economy record. This crate is
//! the mutable heart of the system: the persisted claim record, the claim
//! hierarchy, and the cancellable change protocol that guards type and
//! boundary mutations. Storage engines, permission evaluation, expiration
//! policy, and economy transactions are external collaborators reached
//! through the contracts defined here.
//!
//! # Modules
//!
//! - [`claim`] -- The [`ClaimData`] record and its [`ClaimBuilder`]
//! - [`economy`] -- The optional [`EconomyData`] record a claim can carry
//! - [`error`] -- The crate-wide [`ClaimError`] enum
//! - [`event`] -- The cancellable pre-mutation change protocol
//! - [`registry`] -- In-memory claim registry and hierarchy operations
//! - [`store`] -- The persistence seam ([`ClaimStore`]) and an in-memory
//!   implementation
//!
//! # Usage
//!
//! ```
//! use freehold_claim::{ChangeDispatcher, ClaimBuilder, MemoryStore};
//! use freehold_types::{ClaimType, PlayerId, Position3D, WorldId};
//!
//! let mut claim = ClaimBuilder::new(
//!     WorldId::new(),
//!     ClaimType::Basic,
//!     Position3D::new(10, 10, 10),
//!     Position3D::new(0, 0, 0),
//! )
//! .owner(PlayerId::new())
//! .build()?;
//!
//! // Corners are normalized componentwise at construction.
//! assert_eq!(claim.lesser_corner(), Position3D::new(0, 0, 0));
//!
//! // With no observers registered, a proposed change is never cancelled.
//! let dispatcher = ChangeDispatcher::new();
//! dispatcher.propose_type(&mut claim, ClaimType::Admin)?;
//! assert_eq!(claim.claim_type(), ClaimType::Admin);
//! assert!(claim.owner_id().is_none());
//!
//! // Writes are batched by the caller and flushed explicitly.
//! let mut store = MemoryStore::new();
//! claim.save(&mut store)?;
//! # Ok::<(), freehold_claim::ClaimError>(())
//! ```

pub mod claim;
pub mod economy;
pub mod error;
pub mod event;
pub mod registry;
pub mod store;

// Re-export primary types at crate root.
pub use claim::{ClaimBuilder, ClaimData};
pub use economy::EconomyData;
pub use error::ClaimError;
pub use event::{
    ChangeClaimEvent, ChangeDispatcher, ChangeKind, ChangeObserver, ClaimChange, ObserverId,
};
pub use registry::ClaimRegistry;
pub use store::{ClaimStore, MemoryStore, StoreError};
