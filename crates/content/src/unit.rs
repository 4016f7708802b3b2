//! Content unit capabilities.
//!
//! A unit produces exactly one primary artifact through [`ContentUnit::load`].
//! Optional capabilities are exposed through `as_*` accessors returning
//! trait objects, so the pipeline can query them on any unit object type.

use async_trait::async_trait;
use cairn_registry::defs::{Components, EliteDef, EquipmentDef, Prefab};
use cairn_registry::{Asset, ContentPack, Handle, PackAsset};

use crate::error::UnitError;
use crate::gates::FeatureGates;

/// A loadable, committable piece of content producing one `T`.
#[async_trait]
pub trait ContentUnit<T: Asset>: Send + Sync + 'static {
	/// Name used in diagnostics.
	fn name(&self) -> &str {
		std::any::type_name::<Self>()
	}

	/// Units returning `false` are skipped without error.
	fn is_available(&self, _gates: &FeatureGates) -> bool {
		true
	}

	/// Produces the primary artifact.
	async fn load(&self) -> Result<T, UnitError>;

	/// Runs after [`load`](Self::load), before the artifact is visible to any registry.
	fn initialize(&self, _asset: &mut T) -> Result<(), UnitError> {
		Ok(())
	}

	fn as_pack_modifier(&self) -> Option<&dyn PackModifier<T>> {
		None
	}
}

/// Secondary contributor: invoked right after the primary artifact is committed.
pub trait PackModifier<T: Asset>: Send + Sync {
	fn modify_pack(&self, asset: &Handle<T>, pack: &mut ContentPack) -> Result<(), UnitError>;
}

/// Activation context handed to [`EquipmentUnit::execute`].
#[derive(Debug, Clone, Default)]
pub struct EquipmentSlot {
	pub owner: String,
	pub charges: u32,
	pub activations: u32,
}

impl EquipmentSlot {
	pub fn new(owner: impl Into<String>) -> Self {
		Self {
			owner: owner.into(),
			charges: 1,
			activations: 0,
		}
	}
}

/// Equipment-flavored unit.
pub trait EquipmentUnit: ContentUnit<EquipmentDef> {
	/// Returns whether the activation succeeded.
	fn execute(&self, slot: &mut EquipmentSlot) -> bool;

	fn as_elite(&self) -> Option<&dyn EliteUnit> {
		None
	}
}

/// Elite-flavored equipment.
///
/// On commit, every definition returned here and the equipment's passive
/// status are added to the extension pack.
pub trait EliteUnit: Send + Sync {
	/// Must return the same handles on every call.
	fn elite_defs(&self) -> Vec<Handle<EliteDef>>;
}

/// Prefab unit carrying a static component marker, used by
/// [`discover_prefabs`](crate::discover_prefabs).
pub trait MarkedUnit: ContentUnit<Prefab> {
	const MARKER: Components;
}

/// Converts a concrete unit into a boxed unit object.
pub trait IntoUnit<U: ?Sized> {
	fn into_unit(self) -> Box<U>;
}

impl<T: Asset, C: ContentUnit<T>> IntoUnit<dyn ContentUnit<T>> for C {
	fn into_unit(self) -> Box<dyn ContentUnit<T>> {
		Box::new(self)
	}
}

impl<C: EquipmentUnit> IntoUnit<dyn EquipmentUnit> for C {
	fn into_unit(self) -> Box<dyn EquipmentUnit> {
		Box::new(self)
	}
}

/// Unit object types the engine knows how to run.
///
/// Implemented for `dyn ContentUnit<T>` and `dyn EquipmentUnit`.
pub trait UnitKind: Send + Sync + 'static {
	type Asset: PackAsset;

	/// Called right after commit, before the unit's [`PackModifier`].
	fn on_commit(&self, _asset: &Handle<Self::Asset>, _pack: &mut ContentPack) {}

	/// Hands the committed units of one run to their consumer.
	fn collect(_committed: Vec<crate::pipeline::Committed<Self, Self::Asset>>, _sink: &mut crate::engine::LoadReport) {}
}

impl<T: PackAsset> UnitKind for dyn ContentUnit<T> {
	type Asset = T;
}

impl UnitKind for dyn EquipmentUnit {
	type Asset = EquipmentDef;

	fn on_commit(&self, asset: &Handle<EquipmentDef>, pack: &mut ContentPack) {
		let Some(elite) = self.as_elite() else {
			return;
		};
		for def in elite.elite_defs() {
			pack.elite_defs.add(def);
		}
		if let Some(status) = &asset.passive_status {
			pack.status_defs.add(status.clone());
		}
	}

	fn collect(committed: Vec<crate::pipeline::Committed<Self, EquipmentDef>>, sink: &mut crate::engine::LoadReport) {
		sink.equipment.extend(committed);
	}
}
