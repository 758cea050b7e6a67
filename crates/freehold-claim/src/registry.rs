//! In-memory claim registry and hierarchy operations.
//!
//! Claims reference their parent by identifier only -- never by owning
//! pointer -- and the [`ClaimRegistry`] resolves those identifiers. It also
//! guards the hierarchy invariants: a parent must exist, a claim cannot
//! parent itself, and the parent chain must stay acyclic. Every traversal
//! carries a visited set, so a chain corrupted outside the registry's
//! guards fails fast with [`ClaimError::CycleDetected`] instead of looping.
//!
//! Inheritance resolution ([`resolve_setting`]) walks the chain built by
//! [`inheritance_chain`]: the claim itself, then each ancestor for as long
//! as the link below it honors `inherit_parent`. The per-claim settings
//! being resolved live with the external permission evaluator and are
//! passed in as a lookup closure; this module only owns the traversal
//! order.
//!
//! No cross-claim lock ordering is needed: every multi-claim operation goes
//! through one `&mut self`.
//!
//! [`resolve_setting`]: ClaimRegistry::resolve_setting
//! [`inheritance_chain`]: ClaimRegistry::inheritance_chain

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use freehold_types::ClaimId;

use crate::claim::ClaimData;
use crate::error::ClaimError;

/// The claim registry holding every claim of a logical claim service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaimRegistry {
    /// All claims indexed by their identifier.
    claims: BTreeMap<ClaimId, ClaimData>,
}

impl ClaimRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            claims: BTreeMap::new(),
        }
    }

    // -------------------------------------------------------------------
    // Claim operations
    // -------------------------------------------------------------------

    /// Add a claim to the registry.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::DuplicateClaim`] if a claim with the same ID
    /// is already registered.
    pub fn insert(&mut self, claim: ClaimData) -> Result<(), ClaimError> {
        let id = claim.id();
        if self.claims.contains_key(&id) {
            return Err(ClaimError::DuplicateClaim(id));
        }
        self.claims.insert(id, claim);
        Ok(())
    }

    /// Get an immutable reference to a claim.
    pub fn get(&self, id: ClaimId) -> Option<&ClaimData> {
        self.claims.get(&id)
    }

    /// Get a mutable reference to a claim.
    pub fn get_mut(&mut self, id: ClaimId) -> Option<&mut ClaimData> {
        self.claims.get_mut(&id)
    }

    /// Remove a claim and return it.
    ///
    /// Children of the removed claim are detached (their `parent_id` is
    /// cleared); re-parenting them is the deletion workflow's decision.
    pub fn remove(&mut self, id: ClaimId) -> Option<ClaimData> {
        let removed = self.claims.remove(&id)?;
        for claim in self.claims.values_mut() {
            if claim.parent_id() == Some(id) {
                claim.clear_parent();
            }
        }
        Some(removed)
    }

    /// Return the number of registered claims.
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Return whether the registry holds no claims.
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Return all claim IDs.
    pub fn claim_ids(&self) -> Vec<ClaimId> {
        self.claims.keys().copied().collect()
    }

    /// Iterate over all claims immutably.
    pub fn claims(&self) -> impl Iterator<Item = (&ClaimId, &ClaimData)> {
        self.claims.iter()
    }

    /// Return the IDs of all direct children of a claim.
    pub fn children_of(&self, id: ClaimId) -> Vec<ClaimId> {
        self.claims
            .values()
            .filter(|claim| claim.parent_id() == Some(id))
            .map(ClaimData::id)
            .collect()
    }

    // -------------------------------------------------------------------
    // Hierarchy operations
    // -------------------------------------------------------------------

    /// Re-wire a claim under a new parent.
    ///
    /// This is the hierarchy-aware `set parent`: both claims must be
    /// registered, a claim cannot be its own parent, and the assignment is
    /// rejected if the prospective ancestor chain would loop back to the
    /// child.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::SelfParent`], [`ClaimError::ClaimNotFound`],
    /// [`ClaimError::ParentCycle`], or [`ClaimError::CycleDetected`] (the
    /// last only if the existing chain is already corrupted).
    pub fn assign_parent(&mut self, child: ClaimId, parent: ClaimId) -> Result<(), ClaimError> {
        if child == parent {
            return Err(ClaimError::SelfParent(child));
        }
        if !self.claims.contains_key(&child) {
            return Err(ClaimError::ClaimNotFound(child));
        }
        if !self.claims.contains_key(&parent) {
            return Err(ClaimError::ClaimNotFound(parent));
        }

        // Walk the prospective ancestor chain; reaching the child means the
        // assignment would close a loop.
        let mut visited = BTreeSet::new();
        let mut cursor = Some(parent);
        while let Some(current) = cursor {
            if current == child {
                return Err(ClaimError::ParentCycle { claim: child, parent });
            }
            if !visited.insert(current) {
                return Err(ClaimError::CycleDetected(parent));
            }
            cursor = self.claims.get(&current).and_then(ClaimData::parent_id);
        }

        let claim = self
            .claims
            .get_mut(&child)
            .ok_or(ClaimError::ClaimNotFound(child))?;
        claim.set_parent(parent)
    }

    /// Return the ancestor chain of a claim, nearest first.
    ///
    /// Follows `parent_id` links unconditionally (ignoring
    /// `inherit_parent`); use [`inheritance_chain`] for settings
    /// resolution.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::ClaimNotFound`] if the claim or a referenced
    /// ancestor is missing, or [`ClaimError::CycleDetected`] on a corrupted
    /// chain.
    ///
    /// [`inheritance_chain`]: ClaimRegistry::inheritance_chain
    pub fn ancestors(&self, id: ClaimId) -> Result<Vec<ClaimId>, ClaimError> {
        let start = self.claims.get(&id).ok_or(ClaimError::ClaimNotFound(id))?;
        let mut chain = Vec::new();
        let mut visited = BTreeSet::from([id]);
        let mut cursor = start.parent_id();
        while let Some(current) = cursor {
            if !visited.insert(current) {
                return Err(ClaimError::CycleDetected(id));
            }
            chain.push(current);
            cursor = self
                .claims
                .get(&current)
                .ok_or(ClaimError::ClaimNotFound(current))?
                .parent_id();
        }
        Ok(chain)
    }

    /// Return the settings-resolution chain of a claim: itself, then each
    /// ancestor for as long as the claim below it honors `inherit_parent`.
    ///
    /// A claim with `inherit_parent == false` still appears in its own
    /// chain (its explicit settings always apply to itself) but contributes
    /// no ancestors.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::ClaimNotFound`] if the claim or a referenced
    /// ancestor is missing, or [`ClaimError::CycleDetected`] on a corrupted
    /// chain.
    pub fn inheritance_chain(&self, id: ClaimId) -> Result<Vec<ClaimId>, ClaimError> {
        let mut current = self.claims.get(&id).ok_or(ClaimError::ClaimNotFound(id))?;
        let mut chain = vec![id];
        let mut visited = BTreeSet::from([id]);
        while current.inherits_parent() {
            let Some(parent) = current.parent_id() else {
                break;
            };
            if !visited.insert(parent) {
                return Err(ClaimError::CycleDetected(id));
            }
            chain.push(parent);
            current = self
                .claims
                .get(&parent)
                .ok_or(ClaimError::ClaimNotFound(parent))?;
        }
        Ok(chain)
    }

    /// Resolve an inheritable setting for a claim.
    ///
    /// `get` projects the setting out of a claim's external configuration
    /// (returning `None` where the claim has no explicit value). Resolution
    /// order: the claim's own explicit setting, else the nearest ancestor's
    /// along the [`inheritance_chain`], else `default` -- except that an
    /// ancestor with `allow_flag_overrides == false` pins its explicit
    /// setting over every descendant's, with the highest such ancestor
    /// winning.
    ///
    /// # Errors
    ///
    /// Propagates chain-traversal errors ([`ClaimError::ClaimNotFound`],
    /// [`ClaimError::CycleDetected`]).
    ///
    /// [`inheritance_chain`]: ClaimRegistry::inheritance_chain
    pub fn resolve_setting<T, F>(
        &self,
        id: ClaimId,
        get: F,
        default: T,
    ) -> Result<T, ClaimError>
    where
        F: Fn(&ClaimData) -> Option<T>,
    {
        let chain = self.inheritance_chain(id)?;
        let mut nearest: Option<T> = None;
        let mut pinned: Option<T> = None;
        for current in &chain {
            let claim = self
                .claims
                .get(current)
                .ok_or(ClaimError::ClaimNotFound(*current))?;
            if let Some(value) = get(claim) {
                if *current != id && !claim.allow_flag_overrides() {
                    // Keep overwriting so the highest pinning ancestor wins.
                    pinned = Some(value);
                } else if nearest.is_none() {
                    nearest = Some(value);
                }
            }
        }
        Ok(pinned.or(nearest).unwrap_or(default))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use freehold_types::{ClaimType, PlayerId, Position3D, WorldId};

    use super::*;
    use crate::claim::ClaimBuilder;

    fn basic_claim(world: WorldId) -> ClaimData {
        ClaimBuilder::new(
            world,
            ClaimType::Basic,
            Position3D::new(0, 0, 0),
            Position3D::new(16, 16, 16),
        )
        .owner(PlayerId::new())
        .build()
        .unwrap()
    }

    /// A registry seeded with a parent and two children of it.
    fn family() -> (ClaimRegistry, ClaimId, ClaimId, ClaimId) {
        let world = WorldId::new();
        let mut registry = ClaimRegistry::new();
        let parent = basic_claim(world);
        let child_a = basic_claim(world);
        let child_b = basic_claim(world);
        let (p, a, b) = (parent.id(), child_a.id(), child_b.id());
        registry.insert(parent).unwrap();
        registry.insert(child_a).unwrap();
        registry.insert(child_b).unwrap();
        registry.assign_parent(a, p).unwrap();
        registry.assign_parent(b, p).unwrap();
        (registry, p, a, b)
    }

    // -----------------------------------------------------------------------
    // Registry basics
    // -----------------------------------------------------------------------

    #[test]
    fn insert_rejects_duplicates() {
        let mut registry = ClaimRegistry::new();
        let claim = basic_claim(WorldId::new());
        let duplicate = claim.clone();
        registry.insert(claim).unwrap();
        assert!(matches!(
            registry.insert(duplicate),
            Err(ClaimError::DuplicateClaim(_))
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_detaches_children() {
        let (mut registry, parent, child_a, child_b) = family();
        let removed = registry.remove(parent);
        assert!(removed.is_some());
        assert!(registry.get(child_a).unwrap().parent_id().is_none());
        assert!(registry.get(child_b).unwrap().parent_id().is_none());
    }

    #[test]
    fn children_of_lists_direct_children() {
        let (registry, parent, child_a, child_b) = family();
        let mut children = registry.children_of(parent);
        children.sort();
        let mut expected = vec![child_a, child_b];
        expected.sort();
        assert_eq!(children, expected);
        assert!(registry.children_of(child_a).is_empty());
    }

    // -----------------------------------------------------------------------
    // Parent assignment
    // -----------------------------------------------------------------------

    #[test]
    fn assign_parent_rejects_self_reference() {
        let (mut registry, parent, ..) = family();
        assert!(matches!(
            registry.assign_parent(parent, parent),
            Err(ClaimError::SelfParent(id)) if id == parent
        ));
    }

    #[test]
    fn assign_parent_requires_both_claims() {
        let (mut registry, parent, ..) = family();
        let ghost = ClaimId::new();
        assert!(matches!(
            registry.assign_parent(ghost, parent),
            Err(ClaimError::ClaimNotFound(id)) if id == ghost
        ));
        assert!(matches!(
            registry.assign_parent(parent, ghost),
            Err(ClaimError::ClaimNotFound(id)) if id == ghost
        ));
    }

    #[test]
    fn assign_parent_rejects_two_claim_cycle() {
        let (mut registry, parent, child_a, _) = family();
        // parent -> child_a would loop: child_a is already under parent.
        assert!(matches!(
            registry.assign_parent(parent, child_a),
            Err(ClaimError::ParentCycle { .. })
        ));
        // The original link is untouched.
        assert_eq!(registry.get(child_a).unwrap().parent_id(), Some(parent));
        assert!(registry.get(parent).unwrap().parent_id().is_none());
    }

    #[test]
    fn assign_parent_rejects_three_claim_cycle() {
        let world = WorldId::new();
        let mut registry = ClaimRegistry::new();
        let (a, b, c) = (
            basic_claim(world),
            basic_claim(world),
            basic_claim(world),
        );
        let (ida, idb, idc) = (a.id(), b.id(), c.id());
        registry.insert(a).unwrap();
        registry.insert(b).unwrap();
        registry.insert(c).unwrap();
        registry.assign_parent(idb, ida).unwrap();
        registry.assign_parent(idc, idb).unwrap();
        // a -> c would close the loop a -> c -> b -> a.
        assert!(matches!(
            registry.assign_parent(ida, idc),
            Err(ClaimError::ParentCycle { .. })
        ));
    }

    // -----------------------------------------------------------------------
    // Traversals
    // -----------------------------------------------------------------------

    #[test]
    fn ancestors_nearest_first() {
        let world = WorldId::new();
        let mut registry = ClaimRegistry::new();
        let (grand, mid, leaf) = (
            basic_claim(world),
            basic_claim(world),
            basic_claim(world),
        );
        let (idg, idm, idl) = (grand.id(), mid.id(), leaf.id());
        registry.insert(grand).unwrap();
        registry.insert(mid).unwrap();
        registry.insert(leaf).unwrap();
        registry.assign_parent(idm, idg).unwrap();
        registry.assign_parent(idl, idm).unwrap();

        assert_eq!(registry.ancestors(idl).unwrap(), vec![idm, idg]);
        assert_eq!(registry.ancestors(idg).unwrap(), Vec::new());
    }

    #[test]
    fn inheritance_chain_severed_by_inherit_flag() {
        let world = WorldId::new();
        let mut registry = ClaimRegistry::new();
        let (grand, mid, leaf) = (
            basic_claim(world),
            basic_claim(world),
            basic_claim(world),
        );
        let (idg, idm, idl) = (grand.id(), mid.id(), leaf.id());
        registry.insert(grand).unwrap();
        registry.insert(mid).unwrap();
        registry.insert(leaf).unwrap();
        registry.assign_parent(idm, idg).unwrap();
        registry.assign_parent(idl, idm).unwrap();

        assert_eq!(registry.inheritance_chain(idl).unwrap(), vec![idl, idm, idg]);

        // The middle claim stops inheriting: the leaf still sees it, but
        // nothing beyond.
        registry.get_mut(idm).unwrap().set_inherit_parent(false);
        assert_eq!(registry.inheritance_chain(idl).unwrap(), vec![idl, idm]);

        // The leaf stops inheriting entirely.
        registry.get_mut(idl).unwrap().set_inherit_parent(false);
        assert_eq!(registry.inheritance_chain(idl).unwrap(), vec![idl]);
    }

    // -----------------------------------------------------------------------
    // Settings resolution
    // -----------------------------------------------------------------------

    #[test]
    fn resolve_setting_child_explicit_wins() {
        let (registry, parent, child_a, _) = family();
        let settings = BTreeMap::from([(child_a, false), (parent, true)]);
        let resolved = registry
            .resolve_setting(child_a, |claim| settings.get(&claim.id()).copied(), true)
            .unwrap();
        assert!(!resolved);
    }

    #[test]
    fn resolve_setting_falls_back_to_nearest_ancestor() {
        let (registry, parent, child_a, _) = family();
        let settings = BTreeMap::from([(parent, false)]);
        let resolved = registry
            .resolve_setting(child_a, |claim| settings.get(&claim.id()).copied(), true)
            .unwrap();
        assert!(!resolved);
    }

    #[test]
    fn resolve_setting_defaults_when_nobody_provides() {
        let (registry, _, child_a, _) = family();
        let resolved = registry
            .resolve_setting(child_a, |_| None::<bool>, true)
            .unwrap();
        assert!(resolved);
    }

    #[test]
    fn resolve_setting_ignores_ancestors_past_severed_link() {
        let (mut registry, parent, child_a, _) = family();
        registry.get_mut(child_a).unwrap().set_inherit_parent(false);
        let settings = BTreeMap::from([(parent, false)]);
        let resolved = registry
            .resolve_setting(child_a, |claim| settings.get(&claim.id()).copied(), true)
            .unwrap();
        // The parent's value is out of reach; the default applies.
        assert!(resolved);
    }

    #[test]
    fn resolve_setting_non_overridable_ancestor_pins_value() {
        let (mut registry, parent, child_a, _) = family();
        registry.get_mut(parent).unwrap().set_flag_overrides(false);
        let settings = BTreeMap::from([(child_a, true), (parent, false)]);
        let resolved = registry
            .resolve_setting(child_a, |claim| settings.get(&claim.id()).copied(), true)
            .unwrap();
        // The child's local override is ignored.
        assert!(!resolved);
    }
}
