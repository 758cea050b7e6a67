//! Error types for the `freehold-claim` crate.
//!
//! All fallible operations return [`ClaimError`] through the standard
//! [`Result`] type alias. One variant is special: [`ChangeCancelled`] is an
//! expected, frequently-exercised control path (an observer vetoed a
//! proposed change), not a fault. Callers that need to tell the veto path
//! apart from genuine failures use [`ClaimError::is_cancellation`].
//!
//! [`ChangeCancelled`]: ClaimError::ChangeCancelled

use freehold_types::{ClaimId, ClaimType};

use crate::event::ChangeKind;
use crate::store::StoreError;

/// Errors that can occur during claim operations.
#[derive(Debug, thiserror::Error)]
pub enum ClaimError {
    /// Size restrictions were toggled on a server-managed claim.
    #[error("size restrictions do not apply to {claim_type:?} claims")]
    SizeRestrictionsNotApplicable {
        /// The administrative claim type.
        claim_type: ClaimType,
    },

    /// An ownable claim was constructed without an owner.
    #[error("claims of type {claim_type:?} require an owner")]
    OwnerRequired {
        /// The ownable claim type.
        claim_type: ClaimType,
    },

    /// A server-managed claim was constructed with an owner.
    #[error("claims of type {claim_type:?} cannot have an owner")]
    OwnerNotAllowed {
        /// The administrative claim type.
        claim_type: ClaimType,
    },

    /// A claim was parented to itself.
    #[error("claim {0} cannot be its own parent")]
    SelfParent(ClaimId),

    /// Assigning the parent would make the parent chain cyclic.
    #[error("parenting claim {claim} to {parent} would create a cycle")]
    ParentCycle {
        /// The claim being re-parented.
        claim: ClaimId,
        /// The rejected parent.
        parent: ClaimId,
    },

    /// A traversal found an already-cyclic parent chain.
    ///
    /// This indicates corrupted registry state: [`assign_parent`] rejects
    /// cycles before they form, so a chain that loops was mutated outside
    /// the registry's guards.
    ///
    /// [`assign_parent`]: crate::registry::ClaimRegistry::assign_parent
    #[error("cycle detected in the parent chain starting at claim {0}")]
    CycleDetected(ClaimId),

    /// A claim was not found in the registry.
    #[error("claim not found: {0}")]
    ClaimNotFound(ClaimId),

    /// A claim with the same ID is already registered.
    #[error("duplicate claim id: {0}")]
    DuplicateClaim(ClaimId),

    /// A mutation was proposed against an expired claim.
    #[error("claim {0} is expired; mutations are denied")]
    Expired(ClaimId),

    /// An observer vetoed a proposed change. Expected control flow, not a
    /// fault.
    #[error("{change} change to claim {claim} was cancelled by an observer")]
    ChangeCancelled {
        /// The claim the change targeted.
        claim: ClaimId,
        /// Which mutation was proposed.
        change: ChangeKind,
    },

    /// The persistence collaborator failed to commit the claim.
    #[error("failed to persist claim {claim}")]
    Persistence {
        /// The claim that could not be persisted.
        claim: ClaimId,
        /// The underlying storage failure.
        #[source]
        source: StoreError,
    },
}

impl ClaimError {
    /// Whether this error is the observer-veto control path rather than a
    /// genuine fault.
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::ChangeCancelled { .. })
    }
}
