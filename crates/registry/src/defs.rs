//! Concrete artifact definitions.
//!
//! Most definitions are flat descriptors generated by [`asset_defs!`]. The
//! structural artifacts ([`Prefab`], [`StateTypeCollection`]) and the derived
//! [`EffectDef`] are written out by hand because they bundle or wrap other
//! artifacts.

use std::sync::LazyLock;

use bitflags::bitflags;

use crate::Asset;
use crate::handle::Handle;

/// Declares flat artifact definitions with a `name` field and an [`Asset`] impl.
macro_rules! asset_defs {
	($(
		$(#[$meta:meta])*
		$ty:ident { $($(#[$fmeta:meta])* $field:ident : $fty:ty),* $(,)? }
	)*) => {
		$(
			$(#[$meta])*
			#[derive(Debug, Clone, Default)]
			pub struct $ty {
				/// Display name used as the registry key.
				pub name: String,
				$($(#[$fmeta])* pub $field: $fty,)*
			}

			impl $ty {
				/// Creates a definition with the given name and default fields.
				pub fn new(name: impl Into<String>) -> Self {
					Self { name: name.into(), ..Default::default() }
				}
			}

			impl Asset for $ty {
				const TYPE_NAME: &'static str = stringify!($ty);

				fn name(&self) -> &str {
					&self.name
				}
			}
		)*
	};
}

asset_defs! {
	/// A skill behavior definition.
	SkillDef {
		/// Name of the behavior state entered on activation.
		activation_state: String,
		base_cooldown: f32,
		stock: u32,
	}

	/// A selectable group of skill variants.
	SkillFamily {
		variants: Vec<Handle<SkillDef>>,
	}

	SceneDef {
		stage_order: u32,
	}

	/// A passive item.
	ItemDef {
		tier: Option<Handle<ItemTierDef>>,
		required_expansion: Option<Handle<ExpansionDef>>,
		hidden: bool,
	}

	/// An item tier definition.
	ItemTierDef {
		can_scrap: bool,
	}

	/// Provides relationships between items (e.g. corrupted variants).
	RelationshipProvider {
		relationship: Option<Handle<RelationshipType>>,
		pairs: Vec<(String, String)>,
	}

	RelationshipType {}

	/// An activatable equipment.
	EquipmentDef {
		cooldown: f32,
		/// Status applied while the equipment is held. Elite equipment always has one.
		passive_status: Option<Handle<StatusDef>>,
		required_expansion: Option<Handle<ExpansionDef>>,
	}

	/// A status effect (buff or debuff).
	StatusDef {
		stackable: bool,
		is_debuff: bool,
	}

	/// An elite definition granted by an elite equipment.
	EliteDef {
		modifier_token: String,
		/// Name of the equipment that confers this elite.
		equipment: String,
		health_boost: f32,
	}

	UnlockableDef {
		hidden: bool,
	}

	/// A playable survivor.
	SurvivorDef {
		body: Option<Handle<Prefab>>,
		display_order: f32,
		hidden: bool,
	}

	/// A run modifier toggled in the lobby.
	ModifierDef {
		required_expansion: Option<Handle<ExpansionDef>>,
	}

	SurfaceDef {}

	/// A replicated sound event.
	SoundEventDef {
		event_name: String,
	}

	MusicTrackDef {
		cue: String,
	}

	/// How a run ends.
	GameEndingDef {
		is_win: bool,
	}

	/// Field overrides applied to a behavior state type when it is instantiated.
	StateConfiguration {
		target_type: String,
		overrides: Vec<(String, String)>,
	}

	/// Content expansion gate.
	ExpansionDef {
		required_entitlement: Option<Handle<EntitlementDef>>,
	}

	/// Ownership entitlement gate.
	EntitlementDef {}

	/// A pickup that is neither an item nor an equipment.
	PickupDef {}

	/// A behavior state type.
	StateType {}
}

bitflags! {
	/// Traits carried by a [`Prefab`].
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct Components: u8 {
		/// Has a network identity and needs replication.
		const REPLICATED = 1 << 0;
		/// Drives a character body.
		const BODY = 1 << 1;
		/// Drives a character master (AI or player controller).
		const MASTER = 1 << 2;
		const PROJECTILE = 1 << 3;
		/// Defines a game mode.
		const GAME_MODE = 1 << 4;
		/// Source of a visual effect.
		const EFFECT = 1 << 5;
	}
}

impl Components {
	/// Traits whose registries replicate the object by default.
	pub const REPLICATED_BY_DEFAULT: Self = Self::BODY.union(Self::MASTER).union(Self::PROJECTILE).union(Self::GAME_MODE);
}

/// A structural object that can contribute to several registries at once.
#[derive(Debug, Clone, Default)]
pub struct Prefab {
	pub name: String,
	pub components: Components,
}

impl Prefab {
	pub fn new(name: impl Into<String>, components: Components) -> Self {
		Self {
			name: name.into(),
			components,
		}
	}

	#[inline]
	pub fn has(&self, components: Components) -> bool {
		self.components.contains(components)
	}
}

impl Asset for Prefab {
	const TYPE_NAME: &'static str = "Prefab";

	fn name(&self) -> &str {
		&self.name
	}
}

/// Effect registration derived from a prefab with [`Components::EFFECT`].
#[derive(Debug, Clone)]
pub struct EffectDef {
	pub prefab: Handle<Prefab>,
}

impl EffectDef {
	pub fn new(prefab: Handle<Prefab>) -> Self {
		Self { prefab }
	}
}

impl Asset for EffectDef {
	const TYPE_NAME: &'static str = "EffectDef";

	fn name(&self) -> &str {
		&self.prefab.name
	}
}

/// Composite bundling several behavior-state types. Empty slots are skipped
/// when routed.
#[derive(Debug, Clone, Default)]
pub struct StateTypeCollection {
	pub name: String,
	pub state_types: Vec<Option<Handle<StateType>>>,
}

impl StateTypeCollection {
	pub fn new(name: impl Into<String>, state_types: impl IntoIterator<Item = Option<Handle<StateType>>>) -> Self {
		Self {
			name: name.into(),
			state_types: state_types.into_iter().collect(),
		}
	}
}

impl Asset for StateTypeCollection {
	const TYPE_NAME: &'static str = "StateTypeCollection";

	fn name(&self) -> &str {
		&self.name
	}
}

/// Expansion that is never registered. Content requiring it can never be
/// enabled in a run.
static DISABLED_EXPANSION: LazyLock<Handle<ExpansionDef>> = LazyLock::new(|| Handle::new(ExpansionDef::new("DisabledExpansion")));

/// Returns true if `expansion` is the sentinel used by the `disable_*` helpers.
pub fn is_disabled_expansion(expansion: &Handle<ExpansionDef>) -> bool {
	*expansion == *DISABLED_EXPANSION
}

/// Disables an item before it is committed.
pub fn disable_item(item: &mut ItemDef) {
	item.required_expansion = Some(DISABLED_EXPANSION.clone());
}

/// Disables an equipment before it is committed.
pub fn disable_equipment(equipment: &mut EquipmentDef) {
	equipment.required_expansion = Some(DISABLED_EXPANSION.clone());
}

/// Disables a run modifier so it never appears in the lobby.
pub fn disable_modifier(modifier: &mut ModifierDef) {
	modifier.required_expansion = Some(DISABLED_EXPANSION.clone());
}

/// Hides a survivor from selection.
pub fn disable_survivor(survivor: &mut SurvivorDef) {
	survivor.hidden = true;
}
