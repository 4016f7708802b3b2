use pretty_assertions::assert_eq;

use super::*;
use crate::pack::Category;

fn only_in(pack: &ContentPack, expected: Category) {
	for &category in Category::ALL {
		let want = usize::from(category == expected);
		assert_eq!(pack.len_of(category), want, "category {category} while routing into {expected}");
	}
}

fn well_formed() -> Vec<(AnyAsset, Category)> {
	vec![
		(Handle::new(SkillDef::new("Slash")).into(), Category::Skill),
		(Handle::new(SkillFamily::new("Primary")).into(), Category::SkillFamily),
		(Handle::new(SceneDef::new("Plains")).into(), Category::Scene),
		(Handle::new(ItemDef::new("Syringe")).into(), Category::Item),
		(Handle::new(ItemTierDef::new("Tier1")).into(), Category::ItemTier),
		(Handle::new(RelationshipProvider::new("Contagion")).into(), Category::RelationshipProvider),
		(Handle::new(RelationshipType::new("Corrupts")).into(), Category::RelationshipType),
		(Handle::new(EquipmentDef::new("Lantern")).into(), Category::Equipment),
		(Handle::new(StatusDef::new("Burning")).into(), Category::Status),
		(Handle::new(EliteDef::new("Blazing")).into(), Category::Elite),
		(Handle::new(UnlockableDef::new("Logs.Plains")).into(), Category::Unlockable),
		(Handle::new(SurvivorDef::new("Commando")).into(), Category::Survivor),
		(Handle::new(ModifierDef::new("Glass")).into(), Category::Modifier),
		(Handle::new(SurfaceDef::new("Ice")).into(), Category::Surface),
		(Handle::new(SoundEventDef::new("Play_Bell")).into(), Category::SoundEvent),
		(Handle::new(MusicTrackDef::new("Boss")).into(), Category::MusicTrack),
		(Handle::new(GameEndingDef::new("Escape")).into(), Category::GameEnding),
		(Handle::new(StateConfiguration::new("FireBolt")).into(), Category::StateConfiguration),
		(Handle::new(ExpansionDef::new("Void")).into(), Category::Expansion),
		(Handle::new(EntitlementDef::new("Dlc1")).into(), Category::Entitlement),
		(Handle::new(PickupDef::new("Coin")).into(), Category::Pickup),
		(Handle::new(StateType::new("Idle")).into(), Category::StateType),
		(Handle::new(Prefab::new("Body", Components::BODY)).into(), Category::BodyPrefab),
		(Handle::new(Prefab::new("Master", Components::MASTER)).into(), Category::MasterPrefab),
		(Handle::new(Prefab::new("Bolt", Components::PROJECTILE)).into(), Category::ProjectilePrefab),
		(Handle::new(Prefab::new("Classic", Components::GAME_MODE)).into(), Category::GameModePrefab),
		(Handle::new(Prefab::new("Chest", Components::REPLICATED)).into(), Category::NetworkedObjectPrefab),
		(Handle::new(Prefab::new("Spark", Components::EFFECT)).into(), Category::Effect),
		(
			Handle::new(StateTypeCollection::new("States", [Some(Handle::new(StateType::new("Walk")))])).into(),
			Category::StateType,
		),
	]
}

#[test]
fn each_category_routes_into_exactly_one_registry() {
	let cases = well_formed();
	let covered: std::collections::BTreeSet<_> = cases.iter().map(|(_, category)| *category).collect();
	assert_eq!(covered.len(), Category::ALL.len(), "every category needs a case");

	for (asset, category) in cases {
		let mut pack = ContentPack::new("test");
		assert!(route(&asset, &mut pack), "{} should route", asset.name());
		only_in(&pack, category);
	}
}

#[test]
fn replicated_body_is_not_a_generic_networked_object() {
	let mut pack = ContentPack::new("test");
	let prefab = Handle::new(Prefab::new("Golem", Components::REPLICATED | Components::BODY | Components::EFFECT));

	route(&prefab.clone().into(), &mut pack);

	assert!(pack.body_prefabs.contains(&prefab));
	assert_eq!(pack.effect_defs.len(), 1);
	assert!(pack.networked_object_prefabs.is_empty());
	assert_eq!(pack.total_len(), 2);
}

#[test]
fn every_replicated_by_default_trait_suppresses_networked_object() {
	for component in Components::REPLICATED_BY_DEFAULT.iter() {
		let mut pack = ContentPack::new("test");
		let prefab = Handle::new(Prefab::new("Replicated", Components::REPLICATED | component));

		assert!(route(&prefab.clone().into(), &mut pack));
		assert_eq!(pack.total_len(), 1, "{component:?}");
		assert!(pack.networked_object_prefabs.is_empty(), "{component:?}");
	}

	let mut pack = ContentPack::new("test");
	let effect = Handle::new(Prefab::new("Flare", Components::REPLICATED | Components::EFFECT));
	route(&effect.clone().into(), &mut pack);
	assert!(pack.networked_object_prefabs.contains(&effect));
}

#[test]
fn composite_prefab_contributes_to_each_trait_registry() {
	let mut pack = ContentPack::new("test");
	let prefab = Handle::new(Prefab::new("Drone", Components::REPLICATED | Components::BODY | Components::MASTER));

	route(&prefab.clone().into(), &mut pack);

	assert_eq!(pack.body_prefabs.name_of(&prefab), Some("Drone"));
	assert_eq!(pack.master_prefabs.name_of(&prefab), Some("Drone"));
	assert!(pack.networked_object_prefabs.is_empty());
}

#[test]
fn routing_same_effect_prefab_twice_is_idempotent() {
	let mut pack = ContentPack::new("test");
	let asset: AnyAsset = Handle::new(Prefab::new("Spark", Components::EFFECT)).into();

	assert!(route(&asset, &mut pack));
	assert!(!route(&asset, &mut pack));
	assert_eq!(pack.effect_defs.names().collect::<Vec<_>>(), vec!["Spark"]);
}

#[test]
fn traitless_prefab_is_dropped() {
	let mut pack = ContentPack::new("test");
	assert!(!route(&Handle::new(Prefab::new("Rock", Components::empty())).into(), &mut pack));
	assert_eq!(pack.total_len(), 0);
}

#[test]
fn state_type_collection_skips_empty_slots() {
	let mut pack = ContentPack::new("test");
	let walk = Handle::new(StateType::new("Walk"));
	let collection = Handle::new(StateTypeCollection::new("States", [Some(walk.clone()), None, Some(Handle::new(StateType::new("Run")))]));

	route(&collection.into(), &mut pack);
	assert_eq!(pack.names_of(Category::StateType), vec!["Run", "Walk"]);
	assert!(pack.state_types.contains(&walk));
}

#[test]
fn collection_failure_is_isolated_per_asset() {
	let mut pack = ContentPack::new("test");
	let collection = AssetCollection::new("mixed")
		.with(Handle::new(ItemDef::new("Syringe")))
		.with_empty()
		.with(Handle::new(ItemDef::new("Cursed")))
		.with(Handle::new(StatusDef::new("Burning")));

	let summary = add_from_collection_filtered(&mut pack, &collection, |asset| {
		assert_ne!(asset.name(), "Cursed", "cursed asset");
		true
	});

	assert_eq!(summary, RouteSummary { routed: 2, skipped: 1, failed: 1 });
	assert_eq!(pack.names_of(Category::Item), vec!["Syringe"]);
	assert_eq!(pack.len_of(Category::Status), 1);
}

#[test]
fn filtered_collection_leaves_rejected_assets_out() {
	let mut pack = ContentPack::new("test");
	let collection = AssetCollection::new("survivor")
		.with(Handle::new(SkillDef::new("Slash")))
		.with(Handle::new(UnlockableDef::new("Skins.Red")));

	let summary = add_from_collection_filtered(&mut pack, &collection, |asset| !matches!(asset, AnyAsset::Unlockable(_)));

	assert_eq!(summary.routed, 1);
	assert_eq!(summary.skipped, 1);
	assert!(pack.unlockable_defs.is_empty());

	let again = add_from_collection(&mut pack, &collection);
	assert_eq!(again, RouteSummary { routed: 1, skipped: 1, failed: 0 });
	assert_eq!(pack.unlockable_defs.len(), 1);
}

#[test]
fn panic_message_reads_string_payloads() {
	let payload = std::panic::catch_unwind(|| panic!("{}", String::from("boom"))).unwrap_err();
	assert_eq!(panic_message(payload.as_ref()), "boom");
}
