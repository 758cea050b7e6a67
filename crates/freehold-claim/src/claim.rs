//! The persisted claim record.
//!
//! [`ClaimData`] is a plain owned struct: read accessors are pure
//! projections of current state, each mutator touches exactly one field,
//! and nothing autosaves. Callers batch their writes and flush explicitly
//! with [`ClaimData::save`]; the persistence collaborator either commits
//! every field or reports failure with stored state unchanged.
//!
//! Two mutations never go through plain setters: the claim type and the
//! boundary corners change only through the cancellable protocol in
//! [`crate::event`], which is the sole caller of the crate-private apply
//! hooks on this type. That keeps "type is mutable only via the change
//! protocol" a property the compiler enforces rather than a convention.
//!
//! An expired claim (`is_expired`) must not be mutated; the change protocol
//! rejects proposals against one, and callers of the plain setters carry
//! the same obligation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use freehold_types::{ClaimId, ClaimType, PlayerId, Position3D, Text, WorldId};

use crate::economy::EconomyData;
use crate::error::ClaimError;
use crate::store::ClaimStore;

// ---------------------------------------------------------------------------
// Construction defaults
// ---------------------------------------------------------------------------

/// New claims consume claim blocks unless explicitly exempted.
const DEFAULT_REQUIRES_CLAIM_BLOCKS: bool = true;
/// New claims deliver deny messages to players.
const DEFAULT_ALLOW_DENY_MESSAGES: bool = true;
/// New claims permit child claims to override inherited flags.
const DEFAULT_ALLOW_FLAG_OVERRIDES: bool = true;
/// New claims are eligible for activity-based expiration.
const DEFAULT_ALLOW_EXPIRATION: bool = true;
/// New child claims inherit settings from their parent.
const DEFAULT_INHERIT_PARENT: bool = true;
/// New claims may be resized.
const DEFAULT_IS_RESIZABLE: bool = true;

// ---------------------------------------------------------------------------
// ClaimData
// ---------------------------------------------------------------------------

/// The persisted data of one claim.
///
/// The record holds an axis-aligned bounding volume (`lesser_corner` ≤
/// `greater_corner` componentwise, established at construction and
/// preserved by every resize), ownership, hierarchy linkage, activity
/// timestamps, behavior flags, and an optional attached economy record.
///
/// Mutators are not atomic across the whole record; a caller that needs
/// multi-field atomicity coordinates externally and flushes once with
/// [`save`](ClaimData::save).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)] // The persisted flag set is fixed by the storage schema.
pub struct ClaimData {
    /// The claim's own identifier; immutable.
    id: ClaimId,
    /// Optional rich-text label.
    name: Option<Text>,
    /// Claim category; changes only through the change protocol.
    claim_type: ClaimType,
    /// Componentwise-lesser boundary corner.
    lesser_corner: Position3D,
    /// Componentwise-greater boundary corner.
    greater_corner: Position3D,
    /// Optional spawn point. Containment is the caller's responsibility.
    spawn_pos: Option<Position3D>,
    /// Non-owning back-reference to an enclosing claim.
    parent_id: Option<ClaimId>,
    /// The world this claim belongs to; immutable.
    world_id: WorldId,
    /// The owner; always absent for administrative claim types.
    owner_id: Option<PlayerId>,
    /// Message shown on claim entry.
    greeting: Option<Text>,
    /// Message shown on claim exit.
    farewell: Option<Text>,
    /// Creation timestamp; immutable.
    date_created: DateTime<Utc>,
    /// Activity clock read by the expiration policy engine.
    date_last_active: DateTime<Utc>,
    allow_deny_messages: bool,
    allow_flag_overrides: bool,
    allow_expiration: bool,
    is_cuboid: bool,
    inherit_parent: bool,
    is_resizable: bool,
    is_expired: bool,
    requires_claim_blocks: bool,
    has_size_restrictions: bool,
    /// Optional attached economy record; never interpreted by the claim.
    economy_data: Option<EconomyData>,
}

impl ClaimData {
    // -------------------------------------------------------------------
    // Read accessors
    // -------------------------------------------------------------------

    /// The claim's identifier.
    pub const fn id(&self) -> ClaimId {
        self.id
    }

    /// The claim's name, if set.
    pub const fn name(&self) -> Option<&Text> {
        self.name.as_ref()
    }

    /// The claim's type.
    pub const fn claim_type(&self) -> ClaimType {
        self.claim_type
    }

    /// The componentwise-lesser boundary corner.
    pub const fn lesser_corner(&self) -> Position3D {
        self.lesser_corner
    }

    /// The componentwise-greater boundary corner.
    pub const fn greater_corner(&self) -> Position3D {
        self.greater_corner
    }

    /// The spawn position, if set.
    pub const fn spawn_pos(&self) -> Option<Position3D> {
        self.spawn_pos
    }

    /// The parent claim's identifier, if this claim has a parent.
    pub const fn parent_id(&self) -> Option<ClaimId> {
        self.parent_id
    }

    /// The world this claim belongs to.
    pub const fn world_id(&self) -> WorldId {
        self.world_id
    }

    /// The owner's identifier. Administrative claims never report one.
    pub const fn owner_id(&self) -> Option<PlayerId> {
        self.owner_id
    }

    /// The greeting message, if set.
    pub const fn greeting(&self) -> Option<&Text> {
        self.greeting.as_ref()
    }

    /// The farewell message, if set.
    pub const fn farewell(&self) -> Option<&Text> {
        self.farewell.as_ref()
    }

    /// When the claim was created.
    pub const fn date_created(&self) -> DateTime<Utc> {
        self.date_created
    }

    /// When the claim was last active.
    pub const fn date_last_active(&self) -> DateTime<Utc> {
        self.date_last_active
    }

    /// Whether deny messages are delivered to players.
    pub const fn allow_deny_messages(&self) -> bool {
        self.allow_deny_messages
    }

    /// Whether child claims may override inherited flags.
    pub const fn allow_flag_overrides(&self) -> bool {
        self.allow_flag_overrides
    }

    /// Whether the claim is eligible for activity-based expiration.
    pub const fn allow_expiration(&self) -> bool {
        self.allow_expiration
    }

    /// Whether the claim is a full 3D cuboid (fixed at construction).
    pub const fn is_cuboid(&self) -> bool {
        self.is_cuboid
    }

    /// Whether the claim inherits settings from its parent.
    pub const fn inherits_parent(&self) -> bool {
        self.inherit_parent
    }

    /// Whether the claim may be resized.
    pub const fn is_resizable(&self) -> bool {
        self.is_resizable
    }

    /// Whether the claim has expired. All mutations must be rejected while
    /// this is set.
    pub const fn is_expired(&self) -> bool {
        self.is_expired
    }

    /// Whether the claim consumes claim blocks from its owner.
    pub const fn requires_claim_blocks(&self) -> bool {
        self.requires_claim_blocks
    }

    /// Whether min/max size restrictions are checked for this claim.
    /// Always false for administrative claim types.
    pub const fn has_size_restrictions(&self) -> bool {
        self.has_size_restrictions
    }

    /// The attached economy record, if economy support is enabled.
    pub const fn economy_data(&self) -> Option<&EconomyData> {
        self.economy_data.as_ref()
    }

    /// Mutable access to the attached economy record.
    pub const fn economy_data_mut(&mut self) -> Option<&mut EconomyData> {
        self.economy_data.as_mut()
    }

    /// Whether a position lies inside the claim volume (inclusive).
    pub const fn contains(&self, pos: Position3D) -> bool {
        self.lesser_corner.componentwise_le(pos) && pos.componentwise_le(self.greater_corner)
    }

    // -------------------------------------------------------------------
    // Mutators
    // -------------------------------------------------------------------

    /// Set or clear the claim's name.
    pub fn set_name(&mut self, name: Option<Text>) {
        self.name = name;
    }

    /// Set or clear the greeting shown on claim entry.
    pub fn set_greeting(&mut self, greeting: Option<Text>) {
        self.greeting = greeting;
    }

    /// Set or clear the farewell shown on claim exit.
    pub fn set_farewell(&mut self, farewell: Option<Text>) {
        self.farewell = farewell;
    }

    /// Update the activity clock. The expiration policy engine reads this
    /// together with [`allow_expiration`](ClaimData::allow_expiration).
    pub const fn set_date_last_active(&mut self, instant: DateTime<Utc>) {
        self.date_last_active = instant;
    }

    /// Toggle whether the claim inherits settings from its parent.
    pub const fn set_inherit_parent(&mut self, inherit: bool) {
        self.inherit_parent = inherit;
    }

    /// Toggle whether the claim may be resized.
    pub const fn set_resizable(&mut self, resizable: bool) {
        self.is_resizable = resizable;
    }

    /// Toggle whether deny messages are delivered to players.
    pub const fn set_deny_messages(&mut self, allow: bool) {
        self.allow_deny_messages = allow;
    }

    /// Toggle whether the claim is eligible for expiration.
    pub const fn set_expiration(&mut self, allow: bool) {
        self.allow_expiration = allow;
    }

    /// Toggle whether child claims may override inherited flags.
    pub const fn set_flag_overrides(&mut self, allow: bool) {
        self.allow_flag_overrides = allow;
    }

    /// Toggle whether the claim consumes claim blocks.
    pub const fn set_requires_claim_blocks(&mut self, requires: bool) {
        self.requires_claim_blocks = requires;
    }

    /// Mark the claim expired or active again. Driven by the external
    /// expiration policy engine.
    pub const fn set_expired(&mut self, expired: bool) {
        self.is_expired = expired;
    }

    /// Link this claim under a parent claim.
    ///
    /// Only the self-reference is rejected here; existence and cycle checks
    /// need the full claim set and live in
    /// [`ClaimRegistry::assign_parent`](crate::registry::ClaimRegistry::assign_parent),
    /// which is the hierarchy-aware path callers should prefer.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::SelfParent`] if `parent` is this claim's own
    /// identifier.
    pub fn set_parent(&mut self, parent: ClaimId) -> Result<(), ClaimError> {
        if parent == self.id {
            return Err(ClaimError::SelfParent(self.id));
        }
        self.parent_id = Some(parent);
        Ok(())
    }

    /// Detach this claim from its parent.
    pub const fn clear_parent(&mut self) {
        self.parent_id = None;
    }

    /// Toggle whether min/max size restrictions are checked.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::SizeRestrictionsNotApplicable`] for
    /// administrative claim types, which never carry size restrictions.
    pub fn set_size_restrictions(&mut self, restrictions: bool) -> Result<(), ClaimError> {
        if self.claim_type.is_administrative() {
            return Err(ClaimError::SizeRestrictionsNotApplicable {
                claim_type: self.claim_type,
            });
        }
        self.has_size_restrictions = restrictions;
        Ok(())
    }

    /// Set the spawn position. Accepts a [`Position3D`] or an
    /// `(x, y, z)` tuple. Containment within the claim volume is not
    /// checked here; callers validate with [`contains`](ClaimData::contains).
    pub fn set_spawn_pos(&mut self, pos: impl Into<Position3D>) {
        self.spawn_pos = Some(pos.into());
    }

    /// Clear the spawn position.
    pub const fn clear_spawn_pos(&mut self) {
        self.spawn_pos = None;
    }

    /// Attach an economy record, replacing any existing one.
    pub fn attach_economy_data(&mut self, economy: EconomyData) {
        self.economy_data = Some(economy);
    }

    /// Detach and return the economy record, if one was attached.
    pub const fn take_economy_data(&mut self) -> Option<EconomyData> {
        self.economy_data.take()
    }

    /// Flush the current in-memory state to the persistence collaborator.
    ///
    /// There is no autosave and no dirty tracking: every call hands the
    /// full current field set to the store, so repeated saves with no
    /// intervening mutation leave the stored snapshot unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::Persistence`] if the store reports a failure;
    /// in-memory state is unaffected either way.
    pub fn save(&self, store: &mut dyn ClaimStore) -> Result<(), ClaimError> {
        store.persist(self).map_err(|source| ClaimError::Persistence {
            claim: self.id,
            source,
        })?;
        tracing::debug!(claim = %self.id, "Persisted claim");
        Ok(())
    }

    // -------------------------------------------------------------------
    // Change-protocol apply hooks
    // -------------------------------------------------------------------

    /// Commit an uncancelled type change.
    ///
    /// Converting to an administrative type clears the owner and forces
    /// size restrictions off. Converting to an ownable type leaves the
    /// owner unset; assigning one is the claim-transfer workflow's concern.
    pub(crate) const fn apply_type_change(&mut self, proposed: ClaimType) {
        self.claim_type = proposed;
        if proposed.is_administrative() {
            self.owner_id = None;
            self.has_size_restrictions = false;
        }
    }

    /// Commit an uncancelled resize: the new corners are the componentwise
    /// min/max of the proposed pair.
    pub(crate) fn apply_resize(&mut self, start_corner: Position3D, end_corner: Position3D) {
        self.lesser_corner = start_corner.component_min(end_corner);
        self.greater_corner = start_corner.component_max(end_corner);
    }
}

// ---------------------------------------------------------------------------
// ClaimBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing validated [`ClaimData`] records.
///
/// The claim-creation workflow supplies the world, type, and two raw
/// corners; everything else has a default. `build()` normalizes the corner
/// pair componentwise and validates the ownership invariants.
///
/// # Examples
///
/// ```
/// use freehold_claim::ClaimBuilder;
/// use freehold_types::{ClaimType, PlayerId, Position3D, WorldId};
///
/// let claim = ClaimBuilder::new(
///     WorldId::new(),
///     ClaimType::Basic,
///     Position3D::new(10, 64, 10),
///     Position3D::new(-10, 0, -10),
/// )
/// .owner(PlayerId::new())
/// .build();
///
/// assert!(claim.is_ok());
/// ```
#[derive(Debug)]
#[allow(clippy::struct_excessive_bools)] // Mirrors the persisted flag set of ClaimData.
pub struct ClaimBuilder {
    id: Option<ClaimId>,
    world_id: WorldId,
    claim_type: ClaimType,
    corner_a: Position3D,
    corner_b: Position3D,
    owner: Option<PlayerId>,
    name: Option<Text>,
    greeting: Option<Text>,
    farewell: Option<Text>,
    spawn_pos: Option<Position3D>,
    parent: Option<ClaimId>,
    cuboid: bool,
    resizable: bool,
    inherit_parent: bool,
    deny_messages: bool,
    expiration: bool,
    flag_overrides: bool,
    requires_claim_blocks: bool,
    size_restrictions: Option<bool>,
    expired: bool,
    created_at: Option<DateTime<Utc>>,
    last_active: Option<DateTime<Utc>>,
    economy: Option<EconomyData>,
}

impl ClaimBuilder {
    /// Start building a claim in the given world with the given type and
    /// raw corner pair. The corners may arrive in any order; `build()`
    /// normalizes them.
    pub const fn new(
        world_id: WorldId,
        claim_type: ClaimType,
        corner_a: Position3D,
        corner_b: Position3D,
    ) -> Self {
        Self {
            id: None,
            world_id,
            claim_type,
            corner_a,
            corner_b,
            owner: None,
            name: None,
            greeting: None,
            farewell: None,
            spawn_pos: None,
            parent: None,
            cuboid: false,
            resizable: DEFAULT_IS_RESIZABLE,
            inherit_parent: DEFAULT_INHERIT_PARENT,
            deny_messages: DEFAULT_ALLOW_DENY_MESSAGES,
            expiration: DEFAULT_ALLOW_EXPIRATION,
            flag_overrides: DEFAULT_ALLOW_FLAG_OVERRIDES,
            requires_claim_blocks: DEFAULT_REQUIRES_CLAIM_BLOCKS,
            size_restrictions: None,
            expired: false,
            created_at: None,
            last_active: None,
            economy: None,
        }
    }

    /// Use an explicit claim identifier (restoration from storage).
    #[must_use]
    pub const fn id(mut self, id: ClaimId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the owner. Required for ownable types, rejected for
    /// administrative ones.
    #[must_use]
    pub const fn owner(mut self, owner: PlayerId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Set the claim's name.
    #[must_use]
    pub fn name(mut self, name: Text) -> Self {
        self.name = Some(name);
        self
    }

    /// Set the greeting shown on claim entry.
    #[must_use]
    pub fn greeting(mut self, greeting: Text) -> Self {
        self.greeting = Some(greeting);
        self
    }

    /// Set the farewell shown on claim exit.
    #[must_use]
    pub fn farewell(mut self, farewell: Text) -> Self {
        self.farewell = Some(farewell);
        self
    }

    /// Set the spawn position.
    #[must_use]
    pub fn spawn_pos(mut self, pos: impl Into<Position3D>) -> Self {
        self.spawn_pos = Some(pos.into());
        self
    }

    /// Link the claim under a parent at construction time. The
    /// self-reference is rejected by `build()`; existence and cycle checks
    /// belong to [`ClaimRegistry::assign_parent`].
    ///
    /// [`ClaimRegistry::assign_parent`]: crate::registry::ClaimRegistry::assign_parent
    #[must_use]
    pub const fn parent(mut self, parent: ClaimId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Mark the claim as a full 3D cuboid. Fixed after construction.
    #[must_use]
    pub const fn cuboid(mut self, cuboid: bool) -> Self {
        self.cuboid = cuboid;
        self
    }

    /// Override whether the claim may be resized.
    #[must_use]
    pub const fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Override whether the claim inherits settings from its parent.
    #[must_use]
    pub const fn inherit_parent(mut self, inherit: bool) -> Self {
        self.inherit_parent = inherit;
        self
    }

    /// Override whether deny messages are delivered.
    #[must_use]
    pub const fn deny_messages(mut self, allow: bool) -> Self {
        self.deny_messages = allow;
        self
    }

    /// Override whether the claim is eligible for expiration.
    #[must_use]
    pub const fn expiration(mut self, allow: bool) -> Self {
        self.expiration = allow;
        self
    }

    /// Override whether child claims may override inherited flags.
    #[must_use]
    pub const fn flag_overrides(mut self, allow: bool) -> Self {
        self.flag_overrides = allow;
        self
    }

    /// Override whether the claim consumes claim blocks.
    #[must_use]
    pub const fn requires_claim_blocks(mut self, requires: bool) -> Self {
        self.requires_claim_blocks = requires;
        self
    }

    /// Override size-restriction checking. Silently forced off for
    /// administrative types, which never carry restrictions.
    #[must_use]
    pub const fn size_restrictions(mut self, restrictions: bool) -> Self {
        self.size_restrictions = Some(restrictions);
        self
    }

    /// Restore the expired marker (restoration from storage).
    #[must_use]
    pub const fn expired(mut self, expired: bool) -> Self {
        self.expired = expired;
        self
    }

    /// Use an explicit creation timestamp instead of now (restoration from
    /// storage).
    #[must_use]
    pub const fn created_at(mut self, created: DateTime<Utc>) -> Self {
        self.created_at = Some(created);
        self
    }

    /// Use an explicit last-active timestamp; defaults to the creation
    /// timestamp.
    #[must_use]
    pub const fn last_active(mut self, last_active: DateTime<Utc>) -> Self {
        self.last_active = Some(last_active);
        self
    }

    /// Attach an economy record at construction time.
    #[must_use]
    pub fn economy_data(mut self, economy: EconomyData) -> Self {
        self.economy = Some(economy);
        self
    }

    /// Validate inputs and produce a [`ClaimData`].
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::OwnerRequired`] if an ownable type has no
    /// owner, [`ClaimError::OwnerNotAllowed`] if an administrative type has
    /// one, and [`ClaimError::SelfParent`] if the claim was parented to its
    /// own identifier.
    pub fn build(self) -> Result<ClaimData, ClaimError> {
        if self.claim_type.is_administrative() {
            if self.owner.is_some() {
                return Err(ClaimError::OwnerNotAllowed {
                    claim_type: self.claim_type,
                });
            }
        } else if self.owner.is_none() {
            return Err(ClaimError::OwnerRequired {
                claim_type: self.claim_type,
            });
        }

        let id = self.id.unwrap_or_default();
        if self.parent == Some(id) {
            return Err(ClaimError::SelfParent(id));
        }

        let date_created = self.created_at.unwrap_or_else(Utc::now);
        let has_size_restrictions = if self.claim_type.is_administrative() {
            false
        } else {
            self.size_restrictions.unwrap_or(true)
        };

        Ok(ClaimData {
            id,
            name: self.name,
            claim_type: self.claim_type,
            lesser_corner: self.corner_a.component_min(self.corner_b),
            greater_corner: self.corner_a.component_max(self.corner_b),
            spawn_pos: self.spawn_pos,
            parent_id: self.parent,
            world_id: self.world_id,
            owner_id: self.owner,
            greeting: self.greeting,
            farewell: self.farewell,
            date_created,
            date_last_active: self.last_active.unwrap_or(date_created),
            allow_deny_messages: self.deny_messages,
            allow_flag_overrides: self.flag_overrides,
            allow_expiration: self.expiration,
            is_cuboid: self.cuboid,
            inherit_parent: self.inherit_parent,
            is_resizable: self.resizable,
            is_expired: self.expired,
            requires_claim_blocks: self.requires_claim_blocks,
            has_size_restrictions,
            economy_data: self.economy,
        })
    }
}
