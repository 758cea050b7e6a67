//! The persistence seam.
//!
//! Storage is an external collaborator; this module defines the contract it
//! implements ([`ClaimStore`]) plus an in-memory implementation for tests
//! and embedders that do not need durability. Backends are expected to be
//! all-or-nothing per claim: a failed persist must leave the previously
//! stored state intact.

use std::collections::BTreeMap;

use freehold_types::ClaimId;

use crate::claim::ClaimData;

/// Errors reported by a persistence backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing storage failed an I/O operation.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A claim record could not be serialized for storage.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A backend-specific failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// The persistence collaborator a claim flushes to.
///
/// `persist` either durably commits every current field value of the claim
/// or returns an error leaving the stored state unchanged; a partial commit
/// must never become visible. Implementations may block on I/O, which is
/// why [`ClaimData::save`] must not be called while a change-protocol
/// dispatch is in flight (the exclusive claim borrow enforces this).
pub trait ClaimStore {
    /// Durably persist the full current state of a claim.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on storage failure.
    fn persist(&mut self, claim: &ClaimData) -> Result<(), StoreError>;
}

/// An in-memory store keeping the latest snapshot of each claim.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Latest persisted snapshot per claim.
    saved: BTreeMap<ClaimId, ClaimData>,
    /// Total number of persist calls, for write-batching assertions.
    writes: u64,
}

impl MemoryStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            saved: BTreeMap::new(),
            writes: 0,
        }
    }

    /// The latest persisted snapshot of a claim, if any.
    pub fn get(&self, id: ClaimId) -> Option<&ClaimData> {
        self.saved.get(&id)
    }

    /// The number of claims with a stored snapshot.
    pub fn len(&self) -> usize {
        self.saved.len()
    }

    /// Whether no claim has been persisted yet.
    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }

    /// Total number of persist calls accepted.
    pub const fn write_count(&self) -> u64 {
        self.writes
    }
}

impl ClaimStore for MemoryStore {
    fn persist(&mut self, claim: &ClaimData) -> Result<(), StoreError> {
        self.saved.insert(claim.id(), claim.clone());
        self.writes = self.writes.saturating_add(1);
        tracing::debug!(claim = %claim.id(), "Stored claim snapshot");
        Ok(())
    }
}
