//! Built-in sample extensions.
//!
//! `cairn.core` is declared with the builder and exercises every unit object
//! type. `cairn.void` is assembled from link-time submissions.

use cairn_content::{
	ContentUnit, EliteUnit, EquipmentSlot, EquipmentUnit, Extension, FeatureGates, MarkedUnit, Material, PackModifier, UnitError, async_trait,
};
use cairn_registry::defs::{
	Components, EliteDef, EquipmentDef, ItemDef, ItemTierDef, Prefab, SceneDef, SkillDef, SoundEventDef, StateType, StateTypeCollection, StatusDef,
	SurvivorDef, disable_item,
};
use cairn_registry::{AssetCollection, ContentPack, Handle};

/// Gate required by the void expansion content.
pub const VOID_GATE: &str = "expansion.void";

cairn_registry::asset_slots! {
	/// Statuses the host refers to by name.
	pub struct DemoStatuses: StatusDef { Chill, Frostbite, AffixGlacialStatus }
}

pub static STATUSES: DemoStatuses = DemoStatuses::new();

/// Extensions plus the overlays the host registers before loading.
pub struct Demo {
	pub extensions: Vec<Extension>,
	pub overlays: Vec<(Handle<StatusDef>, Material)>,
}

/// Builds the sample extensions.
pub fn build() -> Demo {
	let frostbite = Handle::new(StatusDef {
		is_debuff: true,
		..StatusDef::new("Frostbite")
	});

	let mut void_crystal = ItemDef::new("VoidCrystal");
	disable_item(&mut void_crystal);

	let tier = Handle::new(ItemTierDef {
		can_scrap: true,
		..ItemTierDef::new("Tier1")
	});
	let whetstone = ItemDef {
		tier: Some(tier.clone()),
		..ItemDef::new("Whetstone")
	};

	let states = StateTypeCollection::new(
		"WardenStates",
		[Some(Handle::new(StateType::new("ChargeBeam"))), None, Some(Handle::new(StateType::new("FireBeam")))],
	);

	let core = Extension::builder("cairn.core")
		.unit::<dyn ContentUnit<SkillDef>, Overcharge>()
		.unit::<dyn ContentUnit<SkillDef>, PhaseBlink>()
		.unit::<dyn ContentUnit<SurvivorDef>, Warden>()
		.unit::<dyn ContentUnit<StatusDef>, Chill>()
		.unit::<dyn EquipmentUnit, GravityWell>()
		.unit::<dyn EquipmentUnit, AffixGlacial>()
		.prefab_unit::<WardenBody>()
		.prefab_unit::<WardenMaster>()
		.prefab_unit::<FrostNova>()
		.collection(
			AssetCollection::new("core.assets")
				.with(tier)
				.with(Handle::new(whetstone))
				.with(Handle::new(void_crystal))
				.with(frostbite.clone())
				.with(Handle::new(states))
				.with_empty(),
		)
		.build();

	let void = Extension::builder("cairn.void")
		.submitted()
		.unit_with::<dyn ContentUnit<SkillDef>>("VoidRelic", || Err(UnitError::Missing("void.relics".into())))
		.build();

	Demo {
		extensions: vec![core, void],
		overlays: vec![(frostbite, Material::new("matFrostbite"))],
	}
}

#[derive(Default)]
struct Overcharge;

#[async_trait]
impl ContentUnit<SkillDef> for Overcharge {
	fn name(&self) -> &str {
		"Overcharge"
	}

	async fn load(&self) -> Result<SkillDef, UnitError> {
		Ok(SkillDef {
			activation_state: "ChargeBeam".into(),
			base_cooldown: 6.0,
			..SkillDef::new("Overcharge")
		})
	}

	fn initialize(&self, skill: &mut SkillDef) -> Result<(), UnitError> {
		skill.stock = 2;
		Ok(())
	}
}

#[derive(Default)]
struct PhaseBlink;

#[async_trait]
impl ContentUnit<SkillDef> for PhaseBlink {
	fn name(&self) -> &str {
		"PhaseBlink"
	}

	fn is_available(&self, gates: &FeatureGates) -> bool {
		gates.is_enabled(VOID_GATE)
	}

	async fn load(&self) -> Result<SkillDef, UnitError> {
		Ok(SkillDef::new("PhaseBlink"))
	}
}

#[derive(Default)]
struct Warden;

#[async_trait]
impl ContentUnit<SurvivorDef> for Warden {
	fn name(&self) -> &str {
		"Warden"
	}

	async fn load(&self) -> Result<SurvivorDef, UnitError> {
		Ok(SurvivorDef {
			body: Some(Handle::new(Prefab::new("WardenBody", Components::BODY | Components::REPLICATED))),
			display_order: 20.0,
			..SurvivorDef::new("Warden")
		})
	}
}

/// Status with a sound cue contributed alongside it.
#[derive(Default)]
struct Chill;

#[async_trait]
impl ContentUnit<StatusDef> for Chill {
	fn name(&self) -> &str {
		"Chill"
	}

	async fn load(&self) -> Result<StatusDef, UnitError> {
		Ok(StatusDef {
			stackable: true,
			is_debuff: true,
			..StatusDef::new("Chill")
		})
	}

	fn as_pack_modifier(&self) -> Option<&dyn PackModifier<StatusDef>> {
		Some(self)
	}
}

impl PackModifier<StatusDef> for Chill {
	fn modify_pack(&self, status: &Handle<StatusDef>, pack: &mut ContentPack) -> Result<(), UnitError> {
		let cue = SoundEventDef {
			event_name: format!("Play_{}_apply", status.name.to_lowercase()),
			..SoundEventDef::new("ChillApply")
		};
		pack.sound_event_defs.add(Handle::new(cue));
		Ok(())
	}
}

#[derive(Default)]
struct GravityWell;

#[async_trait]
impl ContentUnit<EquipmentDef> for GravityWell {
	fn name(&self) -> &str {
		"GravityWell"
	}

	async fn load(&self) -> Result<EquipmentDef, UnitError> {
		Ok(EquipmentDef {
			cooldown: 60.0,
			..EquipmentDef::new("GravityWell")
		})
	}
}

impl EquipmentUnit for GravityWell {
	fn execute(&self, slot: &mut EquipmentSlot) -> bool {
		if slot.charges == 0 {
			return false;
		}
		slot.charges -= 1;
		slot.activations += 1;
		true
	}
}

/// Elite equipment granting the glacial elite.
struct AffixGlacial {
	elite: Handle<EliteDef>,
	status: Handle<StatusDef>,
}

impl Default for AffixGlacial {
	fn default() -> Self {
		Self {
			elite: Handle::new(EliteDef {
				modifier_token: "ELITE_MODIFIER_GLACIAL".into(),
				equipment: "AffixGlacial".into(),
				health_boost: 4.0,
				..EliteDef::new("Glacial")
			}),
			status: Handle::new(StatusDef::new("AffixGlacialStatus")),
		}
	}
}

#[async_trait]
impl ContentUnit<EquipmentDef> for AffixGlacial {
	fn name(&self) -> &str {
		"AffixGlacial"
	}

	async fn load(&self) -> Result<EquipmentDef, UnitError> {
		Ok(EquipmentDef {
			passive_status: Some(self.status.clone()),
			..EquipmentDef::new("AffixGlacial")
		})
	}
}

impl EquipmentUnit for AffixGlacial {
	fn execute(&self, _slot: &mut EquipmentSlot) -> bool {
		false
	}

	fn as_elite(&self) -> Option<&dyn EliteUnit> {
		Some(self)
	}
}

impl EliteUnit for AffixGlacial {
	fn elite_defs(&self) -> Vec<Handle<EliteDef>> {
		vec![self.elite.clone()]
	}
}

macro_rules! prefab_units {
	($($name:ident => $marker:expr),* $(,)?) => {
		$(
			#[derive(Default)]
			struct $name;

			#[async_trait]
			impl ContentUnit<Prefab> for $name {
				fn name(&self) -> &str {
					stringify!($name)
				}

				async fn load(&self) -> Result<Prefab, UnitError> {
					Ok(Prefab::new(stringify!($name), $marker))
				}
			}

			impl MarkedUnit for $name {
				const MARKER: Components = $marker;
			}
		)*
	};
}

prefab_units! {
	WardenBody => Components::BODY.union(Components::REPLICATED),
	WardenMaster => Components::MASTER,
	FrostNova => Components::EFFECT,
}

#[derive(Default)]
struct VoidRift;

#[async_trait]
impl ContentUnit<SceneDef> for VoidRift {
	fn name(&self) -> &str {
		"VoidRift"
	}

	async fn load(&self) -> Result<SceneDef, UnitError> {
		Ok(SceneDef {
			stage_order: 5,
			..SceneDef::new("VoidRift")
		})
	}
}

cairn_content::submit_unit!("cairn.void", dyn ContentUnit<SceneDef> => VoidRift);
