//! The cancellable pre-mutation change protocol.
//!
//! A claim's type and boundary corners never change directly: the mutation
//! is first described by a [`ChangeClaimEvent`] and dispatched synchronously
//! to every registered [`ChangeObserver`], any of which may cancel it. Only
//! an uncancelled round commits; a cancelled round leaves the claim
//! untouched and surfaces [`ChangeCancelled`] to the proposing caller.
//! Each attempt is terminal -- `PROPOSED` becomes `REJECTED` or `APPLIED`,
//! and a rejected attempt requires a fresh proposal.
//!
//! Dispatch is one cooperative round, not a race: cancellation does not
//! short-circuit the observer list. Later observers still run against the
//! same event instance and may inspect the cancellation flag. Observers run
//! on the proposing caller's thread and may block; the exclusive `&mut`
//! borrow of the claim guarantees no other mutation (and no `save`) can
//! interleave with an in-flight dispatch.
//!
//! The change payload is a closed union ([`ClaimChange`]) rather than an
//! open class hierarchy; dispatch and application switch on the variant.
//!
//! [`ChangeCancelled`]: ClaimError::ChangeCancelled

use freehold_types::{ClaimId, ClaimType, Position3D};
use serde::{Deserialize, Serialize};

use crate::claim::ClaimData;
use crate::error::ClaimError;

// ---------------------------------------------------------------------------
// Change payloads
// ---------------------------------------------------------------------------

/// Which mutation a change event proposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    /// The claim's type is changing.
    Type,
    /// The claim's boundary corners are changing.
    Resize,
}

impl core::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Type => write!(f, "type"),
            Self::Resize => write!(f, "resize"),
        }
    }
}

/// The proposed mutation carried by a change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimChange {
    /// Change the claim's type.
    Type {
        /// The type before the change.
        original: ClaimType,
        /// The proposed new type.
        proposed: ClaimType,
    },
    /// Move the claim's boundary corners.
    ///
    /// The corners are the caller's raw proposal, in whatever order the
    /// caller produced them; observers see caller intent. Normalization to
    /// a lesser/greater pair happens only when an uncancelled round is
    /// applied.
    Resize {
        /// The first proposed corner.
        start_corner: Position3D,
        /// The second proposed corner.
        end_corner: Position3D,
    },
}

impl ClaimChange {
    /// The discriminant of this change.
    pub const fn kind(&self) -> ChangeKind {
        match self {
            Self::Type { .. } => ChangeKind::Type,
            Self::Resize { .. } => ChangeKind::Resize,
        }
    }
}

// ---------------------------------------------------------------------------
// The event
// ---------------------------------------------------------------------------

/// A cancellable notification fired before a claim mutation commits.
///
/// All observers of one dispatch round share this instance: a later
/// observer can see that an earlier one cancelled, and cancellation is
/// sticky -- there is no way to un-cancel.
#[derive(Debug)]
pub struct ChangeClaimEvent {
    claim_id: ClaimId,
    change: ClaimChange,
    cancelled: bool,
}

impl ChangeClaimEvent {
    pub(crate) const fn new(claim_id: ClaimId, change: ClaimChange) -> Self {
        Self {
            claim_id,
            change,
            cancelled: false,
        }
    }

    /// The claim this change targets.
    pub const fn claim_id(&self) -> ClaimId {
        self.claim_id
    }

    /// The proposed mutation.
    pub const fn change(&self) -> ClaimChange {
        self.change
    }

    /// Whether any observer has cancelled the change.
    pub const fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Veto the change. The mutation will not be applied.
    pub const fn cancel(&mut self) {
        self.cancelled = true;
    }
}

// ---------------------------------------------------------------------------
// Observers
// ---------------------------------------------------------------------------

/// A callback invoked before a claim mutation commits.
///
/// Observers may perform blocking checks (permission lookups, region
/// queries); the proposing caller stalls until the round completes.
pub trait ChangeObserver {
    /// Inspect a proposed change and optionally [`cancel`] it.
    ///
    /// [`cancel`]: ChangeClaimEvent::cancel
    fn on_change(&self, claim: &ClaimData, event: &mut ChangeClaimEvent);
}

impl<F> ChangeObserver for F
where
    F: Fn(&ClaimData, &mut ChangeClaimEvent),
{
    fn on_change(&self, claim: &ClaimData, event: &mut ChangeClaimEvent) {
        self(claim, event);
    }
}

/// Handle identifying a registered observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u32);

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Ordered observer list and the entry points for proposing changes.
///
/// Observers are invoked in registration order. Registration returns an
/// [`ObserverId`] that can later be passed to
/// [`unregister`](ChangeDispatcher::unregister).
#[derive(Default)]
pub struct ChangeDispatcher {
    observers: Vec<(ObserverId, Box<dyn ChangeObserver>)>,
    next_id: u32,
}

impl core::fmt::Debug for ChangeDispatcher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ChangeDispatcher")
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl ChangeDispatcher {
    /// Create a dispatcher with no observers.
    pub const fn new() -> Self {
        Self {
            observers: Vec::new(),
            next_id: 0,
        }
    }

    /// Register an observer at the end of the dispatch order.
    pub fn register(&mut self, observer: impl ChangeObserver + 'static) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove a registered observer. Returns whether one was removed.
    pub fn unregister(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    /// The number of registered observers.
    pub const fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Propose changing a claim's type.
    ///
    /// If no observer cancels, the type is updated and the ownership
    /// invariants are reconciled: an administrative target clears the owner
    /// and forces size restrictions off.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::Expired`] if the claim is expired, or
    /// [`ClaimError::ChangeCancelled`] if an observer vetoed the change.
    pub fn propose_type(
        &self,
        claim: &mut ClaimData,
        proposed: ClaimType,
    ) -> Result<(), ClaimError> {
        let change = ClaimChange::Type {
            original: claim.claim_type(),
            proposed,
        };
        self.propose(claim, change)
    }

    /// Propose moving a claim's boundary corners.
    ///
    /// The corners are passed through to observers raw; if no observer
    /// cancels, the claim's lesser/greater corners become their
    /// componentwise min/max.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::Expired`] if the claim is expired, or
    /// [`ClaimError::ChangeCancelled`] if an observer vetoed the change.
    pub fn propose_resize(
        &self,
        claim: &mut ClaimData,
        start_corner: Position3D,
        end_corner: Position3D,
    ) -> Result<(), ClaimError> {
        let change = ClaimChange::Resize {
            start_corner,
            end_corner,
        };
        self.propose(claim, change)
    }

    /// Run one dispatch round and, if uncancelled, apply the mutation.
    fn propose(&self, claim: &mut ClaimData, change: ClaimChange) -> Result<(), ClaimError> {
        if claim.is_expired() {
            return Err(ClaimError::Expired(claim.id()));
        }

        let mut event = ChangeClaimEvent::new(claim.id(), change);
        // One full round: every observer sees the same event instance, in
        // registration order, even after a cancellation.
        for (_, observer) in &self.observers {
            observer.on_change(claim, &mut event);
        }

        if event.is_cancelled() {
            tracing::debug!(
                claim = %claim.id(),
                change = %change.kind(),
                "Change cancelled by observer"
            );
            return Err(ClaimError::ChangeCancelled {
                claim: claim.id(),
                change: change.kind(),
            });
        }

        match change {
            ClaimChange::Type { proposed, .. } => claim.apply_type_change(proposed),
            ClaimChange::Resize {
                start_corner,
                end_corner,
            } => claim.apply_resize(start_corner, end_corner),
        }
        tracing::debug!(
            claim = %claim.id(),
            change = %change.kind(),
            "Change applied"
        );
        Ok(())
    }
}
