//! The closed set of category registries.
//!
//! A [`ContentPack`] is the merge target for content: each extension fills its
//! own pack while loading, and the engine merges finished packs into the host
//! pack. Adding a category means adding a line to the table below plus a match
//! arm in [`crate::router::route`].

use std::fmt;

use crate::Asset;
use crate::defs::*;
use crate::handle::Handle;
use crate::named::NamedRegistry;

/// An artifact type that knows how to commit itself into a [`ContentPack`].
///
/// Flat definitions go into their single registry. Structural artifacts
/// decompose through the router instead.
pub trait PackAsset: Asset + Sized {
	/// Commits `asset` into `pack`. Returns true if any registry changed.
	fn commit(asset: Handle<Self>, pack: &mut ContentPack) -> bool;
}

macro_rules! content_pack {
	(
		owned { $($(#[$ometa:meta])* $ocat:ident => $ofield:ident : $oty:ty),* $(,)? }
		shared { $($(#[$smeta:meta])* $scat:ident => $sfield:ident : $sty:ty),* $(,)? }
	) => {
		/// Registry category.
		#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
		pub enum Category {
			$($(#[$smeta])* $scat,)*
			$($(#[$ometa])* $ocat,)*
		}

		impl Category {
			/// Every category, in declaration order.
			pub const ALL: &'static [Category] = &[$(Category::$scat,)* $(Category::$ocat,)*];

			/// Field name of the category's registry in [`ContentPack`].
			pub const fn as_str(self) -> &'static str {
				match self {
					$(Category::$scat => stringify!($sfield),)*
					$(Category::$ocat => stringify!($ofield),)*
				}
			}
		}

		/// One [`NamedRegistry`] per [`Category`].
		pub struct ContentPack {
			identifier: String,
			$(pub $sfield: NamedRegistry<$sty>,)*
			$(pub $ofield: NamedRegistry<$oty>,)*
		}

		impl ContentPack {
			/// Creates an empty pack. `identifier` is usually the owning extension's id.
			pub fn new(identifier: impl Into<String>) -> Self {
				Self {
					identifier: identifier.into(),
					$($sfield: NamedRegistry::new(stringify!($sfield)),)*
					$($ofield: NamedRegistry::new(stringify!($ofield)),)*
				}
			}

			/// Number of entries in the registry for `category`.
			pub fn len_of(&self, category: Category) -> usize {
				match category {
					$(Category::$scat => self.$sfield.len(),)*
					$(Category::$ocat => self.$ofield.len(),)*
				}
			}

			/// Registered names for `category`, in registry order.
			pub fn names_of(&self, category: Category) -> Vec<&str> {
				match category {
					$(Category::$scat => self.$sfield.names().collect(),)*
					$(Category::$ocat => self.$ofield.names().collect(),)*
				}
			}

			/// Copies every entry of `other` into this pack, keeping the names
			/// `other` assigned. Entries already present are skipped; colliding
			/// names fall back to generated ones. Returns the number of new entries.
			pub fn merge_from(&mut self, other: &ContentPack) -> usize {
				let mut merged = 0;
				$(
					for info in other.$sfield.iter() {
						merged += usize::from(self.$sfield.insert(info.asset.clone(), Some(&*info.name)).is_inserted());
					}
				)*
				$(
					for info in other.$ofield.iter() {
						merged += usize::from(self.$ofield.insert(info.asset.clone(), Some(&*info.name)).is_inserted());
					}
				)*
				tracing::debug!(from = other.identifier(), into = self.identifier(), merged, "content_pack.merge");
				merged
			}
		}

		$(
			impl PackAsset for $oty {
				fn commit(asset: Handle<Self>, pack: &mut ContentPack) -> bool {
					pack.$ofield.add(asset).is_inserted()
				}
			}
		)*
	};
}

content_pack! {
	owned {
		Effect => effect_defs: EffectDef,
		Skill => skill_defs: SkillDef,
		SkillFamily => skill_families: SkillFamily,
		Scene => scene_defs: SceneDef,
		Item => item_defs: ItemDef,
		ItemTier => item_tier_defs: ItemTierDef,
		RelationshipProvider => relationship_providers: RelationshipProvider,
		RelationshipType => relationship_types: RelationshipType,
		Equipment => equipment_defs: EquipmentDef,
		/// Status effects.
		Status => status_defs: StatusDef,
		Elite => elite_defs: EliteDef,
		Unlockable => unlockable_defs: UnlockableDef,
		Survivor => survivor_defs: SurvivorDef,
		/// Run modifiers.
		Modifier => modifier_defs: ModifierDef,
		Surface => surface_defs: SurfaceDef,
		SoundEvent => sound_event_defs: SoundEventDef,
		MusicTrack => music_track_defs: MusicTrackDef,
		/// End conditions.
		GameEnding => game_ending_defs: GameEndingDef,
		StateConfiguration => state_configurations: StateConfiguration,
		Expansion => expansion_defs: ExpansionDef,
		Entitlement => entitlement_defs: EntitlementDef,
		Pickup => pickup_defs: PickupDef,
		/// Behavior-state types.
		StateType => state_types: StateType,
	}
	shared {
		BodyPrefab => body_prefabs: Prefab,
		MasterPrefab => master_prefabs: Prefab,
		ProjectilePrefab => projectile_prefabs: Prefab,
		GameModePrefab => game_mode_prefabs: Prefab,
		/// Replicated prefabs with no other replicated-by-default trait.
		NetworkedObjectPrefab => networked_object_prefabs: Prefab,
	}
}

impl ContentPack {
	pub fn identifier(&self) -> &str {
		&self.identifier
	}

	/// Total number of entries across every registry.
	pub fn total_len(&self) -> usize {
		Category::ALL.iter().map(|&category| self.len_of(category)).sum()
	}

	/// `(category, len)` for every non-empty registry.
	pub fn summary(&self) -> Vec<(Category, usize)> {
		Category::ALL
			.iter()
			.map(|&category| (category, self.len_of(category)))
			.filter(|&(_, len)| len > 0)
			.collect()
	}
}

impl fmt::Display for Category {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl fmt::Debug for ContentPack {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ContentPack")
			.field("identifier", &self.identifier)
			.field("summary", &self.summary())
			.finish()
	}
}
