//! Routes artifacts of unknown static category into the right registry.
//!
//! [`AnyAsset`] is the closed sum of every artifact kind the router accepts.
//! Plain definitions land in exactly one registry. Structural artifacts are
//! decomposed first:
//!
//! - [`Prefab`] is checked trait by trait. Replicated-by-default traits
//!   ([`Components::REPLICATED_BY_DEFAULT`]) are checked first, then the effect
//!   trait. A replicated prefab that matched none of the replicated-by-default
//!   traits is registered as a generic networked object.
//! - [`StateTypeCollection`] contributes each of its state types.
//!
//! Prefabs without any trait are dropped without a diagnostic so extensions can
//! submit heterogeneous batches without pre-filtering.

use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::Asset;
use crate::defs::*;
use crate::handle::Handle;
use crate::pack::{ContentPack, PackAsset};

macro_rules! any_asset {
	($($variant:ident($ty:ty) => $field:ident),* $(,)?) => {
		/// Any artifact the router accepts.
		#[derive(Debug, Clone)]
		pub enum AnyAsset {
			$($variant(Handle<$ty>),)*
			Prefab(Handle<Prefab>),
			StateTypes(Handle<StateTypeCollection>),
		}

		$(
			impl From<Handle<$ty>> for AnyAsset {
				fn from(asset: Handle<$ty>) -> Self {
					Self::$variant(asset)
				}
			}
		)*

		impl AnyAsset {
			/// Display name of the wrapped artifact.
			pub fn name(&self) -> &str {
				match self {
					$(Self::$variant(asset) => asset.name(),)*
					Self::Prefab(asset) => &asset.name,
					Self::StateTypes(asset) => &asset.name,
				}
			}
		}

		/// Routes `asset` into its registry. Returns true if any registry changed.
		pub fn route(asset: &AnyAsset, pack: &mut ContentPack) -> bool {
			match asset {
				$(AnyAsset::$variant(asset) => pack.$field.add(asset.clone()).is_inserted(),)*
				AnyAsset::Prefab(prefab) => route_prefab(prefab, pack),
				AnyAsset::StateTypes(collection) => route_state_types(collection, pack),
			}
		}
	};
}

any_asset! {
	Skill(SkillDef) => skill_defs,
	SkillFamily(SkillFamily) => skill_families,
	Scene(SceneDef) => scene_defs,
	Item(ItemDef) => item_defs,
	ItemTier(ItemTierDef) => item_tier_defs,
	RelationshipProvider(RelationshipProvider) => relationship_providers,
	RelationshipType(RelationshipType) => relationship_types,
	Equipment(EquipmentDef) => equipment_defs,
	Status(StatusDef) => status_defs,
	Elite(EliteDef) => elite_defs,
	Unlockable(UnlockableDef) => unlockable_defs,
	Survivor(SurvivorDef) => survivor_defs,
	Modifier(ModifierDef) => modifier_defs,
	Surface(SurfaceDef) => surface_defs,
	SoundEvent(SoundEventDef) => sound_event_defs,
	MusicTrack(MusicTrackDef) => music_track_defs,
	GameEnding(GameEndingDef) => game_ending_defs,
	StateConfiguration(StateConfiguration) => state_configurations,
	Expansion(ExpansionDef) => expansion_defs,
	Entitlement(EntitlementDef) => entitlement_defs,
	Pickup(PickupDef) => pickup_defs,
	StateType(StateType) => state_types,
	Effect(EffectDef) => effect_defs,
}

impl From<Handle<Prefab>> for AnyAsset {
	fn from(prefab: Handle<Prefab>) -> Self {
		Self::Prefab(prefab)
	}
}

impl From<Handle<StateTypeCollection>> for AnyAsset {
	fn from(collection: Handle<StateTypeCollection>) -> Self {
		Self::StateTypes(collection)
	}
}

impl PackAsset for Prefab {
	fn commit(asset: Handle<Self>, pack: &mut ContentPack) -> bool {
		route_prefab(&asset, pack)
	}
}

impl PackAsset for StateTypeCollection {
	fn commit(asset: Handle<Self>, pack: &mut ContentPack) -> bool {
		route_state_types(&asset, pack)
	}
}

fn route_prefab(prefab: &Handle<Prefab>, pack: &mut ContentPack) -> bool {
	let mut changed = false;

	if prefab.has(Components::BODY) {
		changed |= pack.body_prefabs.add(prefab.clone()).is_inserted();
	}
	if prefab.has(Components::MASTER) {
		changed |= pack.master_prefabs.add(prefab.clone()).is_inserted();
	}
	if prefab.has(Components::PROJECTILE) {
		changed |= pack.projectile_prefabs.add(prefab.clone()).is_inserted();
	}
	if prefab.has(Components::GAME_MODE) {
		changed |= pack.game_mode_prefabs.add(prefab.clone()).is_inserted();
	}
	if prefab.has(Components::EFFECT) {
		// Reuse the derived effect so routing the same prefab twice stays idempotent.
		let existing = pack.effect_defs.assets().find(|effect| effect.prefab == *prefab).cloned();
		let effect = existing.unwrap_or_else(|| Handle::new(EffectDef::new(prefab.clone())));
		changed |= pack.effect_defs.add(effect).is_inserted();
	}

	if prefab.has(Components::REPLICATED) && !prefab.components.intersects(Components::REPLICATED_BY_DEFAULT) {
		changed |= pack.networked_object_prefabs.add(prefab.clone()).is_inserted();
	}

	if prefab.components.is_empty() {
		tracing::trace!(name = %prefab.name, "router.prefab.unmatched");
	}
	changed
}

fn route_state_types(collection: &Handle<StateTypeCollection>, pack: &mut ContentPack) -> bool {
	let mut changed = false;
	for state_type in collection.state_types.iter().flatten() {
		changed |= pack.state_types.add(state_type.clone()).is_inserted();
	}
	changed
}

/// A named batch of heterogeneous artifacts. Empty slots are skipped.
#[derive(Debug, Clone, Default)]
pub struct AssetCollection {
	pub name: String,
	pub assets: Vec<Option<AnyAsset>>,
}

impl AssetCollection {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			assets: Vec::new(),
		}
	}

	/// Appends an artifact.
	pub fn with(mut self, asset: impl Into<AnyAsset>) -> Self {
		self.assets.push(Some(asset.into()));
		self
	}

	/// Appends an empty slot.
	pub fn with_empty(mut self) -> Self {
		self.assets.push(None);
		self
	}
}

/// Outcome counts of a collection routing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteSummary {
	/// Artifacts that changed at least one registry.
	pub routed: usize,
	/// Empty slots, filtered out artifacts and artifacts that changed nothing.
	pub skipped: usize,
	/// Artifacts whose routing panicked.
	pub failed: usize,
}

impl std::ops::AddAssign for RouteSummary {
	fn add_assign(&mut self, other: Self) {
		self.routed += other.routed;
		self.skipped += other.skipped;
		self.failed += other.failed;
	}
}

/// Routes every artifact of `collection` into `pack`.
pub fn add_from_collection(pack: &mut ContentPack, collection: &AssetCollection) -> RouteSummary {
	add_from_collection_filtered(pack, collection, |_| true)
}

/// Routes the artifacts of `collection` accepted by `predicate` into `pack`.
///
/// A step (filter or route) that panics is logged and the pass continues with
/// the next artifact.
pub fn add_from_collection_filtered(pack: &mut ContentPack, collection: &AssetCollection, mut predicate: impl FnMut(&AnyAsset) -> bool) -> RouteSummary {
	let mut summary = RouteSummary::default();

	for asset in &collection.assets {
		let Some(asset) = asset else {
			summary.skipped += 1;
			continue;
		};

		let step = catch_unwind(AssertUnwindSafe(|| predicate(asset).then(|| route(asset, pack))));
		match step {
			Ok(Some(true)) => summary.routed += 1,
			Ok(Some(false) | None) => summary.skipped += 1,
			Err(payload) => {
				summary.failed += 1;
				tracing::error!(
					collection = %collection.name,
					asset = asset.name(),
					error = %panic_message(payload.as_ref()),
					"failed to route asset"
				);
			}
		}
	}

	tracing::debug!(
		collection = %collection.name,
		pack = pack.identifier(),
		routed = summary.routed,
		skipped = summary.skipped,
		failed = summary.failed,
		"router.collection"
	);
	summary
}

/// Extracts a printable message from a panic payload.
pub fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
	if let Some(message) = payload.downcast_ref::<&'static str>() {
		(*message).to_owned()
	} else if let Some(message) = payload.downcast_ref::<String>() {
		message.clone()
	} else {
		"non-string panic payload".to_owned()
	}
}

#[cfg(test)]
mod tests;
