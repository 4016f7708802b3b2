use async_trait::async_trait;
use cairn_registry::defs::{Components, ItemDef, Prefab, SkillDef, StatusDef};
use cairn_registry::{AssetCollection, Category, Handle};
use pretty_assertions::assert_eq;

use super::*;
use crate::config::PipelineConfig;
use crate::error::{DriverError, UnitError};
use crate::overlays::{Material, OverlayRegistration};

/// Pending once, then ready. Works with or without a runtime.
struct YieldOnce(bool);

impl std::future::Future for YieldOnce {
	type Output = ();

	fn poll(mut self: std::pin::Pin<&mut Self>, cx: &mut std::task::Context<'_>) -> std::task::Poll<()> {
		if self.0 {
			return std::task::Poll::Ready(());
		}
		self.0 = true;
		cx.waker().wake_by_ref();
		std::task::Poll::Pending
	}
}

#[derive(Default)]
struct Slash;

#[async_trait]
impl ContentUnit<SkillDef> for Slash {
	async fn load(&self) -> Result<SkillDef, UnitError> {
		YieldOnce(false).await;
		Ok(SkillDef::new("Slash"))
	}
}

#[derive(Default)]
struct Pierce;

#[async_trait]
impl ContentUnit<SkillDef> for Pierce {
	async fn load(&self) -> Result<SkillDef, UnitError> {
		Ok(SkillDef::new("Pierce"))
	}
}

#[derive(Default)]
struct Drone;

#[async_trait]
impl ContentUnit<Prefab> for Drone {
	async fn load(&self) -> Result<Prefab, UnitError> {
		Ok(Prefab::new("Drone", Components::BODY | Components::MASTER))
	}
}

fn config(concurrent: bool) -> EngineConfig {
	EngineConfig {
		pipeline: PipelineConfig {
			concurrent_extensions: concurrent,
			max_ticks: None,
		},
		..EngineConfig::default()
	}
}

fn extensions() -> Vec<Extension> {
	vec![
		Extension::builder("ext.blades")
			.unit::<dyn ContentUnit<SkillDef>, Slash>()
			.unit::<dyn ContentUnit<Prefab>, Drone>()
			.collection(AssetCollection::new("blades.items").with(Handle::new(ItemDef::new("Whetstone"))).with_empty())
			.build(),
		// same skill name in a second extension
		Extension::builder("ext.spears")
			.unit::<dyn ContentUnit<SkillDef>, Pierce>()
			.unit::<dyn ContentUnit<SkillDef>, Slash>()
			.build(),
	]
}

fn engine(concurrent: bool) -> Engine {
	let mut engine = Engine::new(config(concurrent));
	for extension in extensions() {
		engine.add_extension(extension).unwrap();
	}
	engine
}

fn assert_merged(engine: &Engine, summary: &LoadSummary) {
	let ids: Vec<_> = summary.extensions.iter().map(|ext| ext.extension.as_str()).collect();
	assert_eq!(ids, vec!["ext.blades", "ext.spears"]);
	assert_eq!(engine.pack().names_of(Category::Skill), vec!["Pierce", "SkillDef_2", "Slash"]);
	assert_eq!(engine.pack().names_of(Category::Item), vec!["Whetstone"]);
	assert_eq!(engine.pack().names_of(Category::BodyPrefab), vec!["Drone"]);
	assert_eq!(engine.pack().names_of(Category::MasterPrefab), vec!["Drone"]);

	let blades = &summary.extensions[0];
	assert_eq!((blades.committed, blades.failed), (2, 0));
	assert_eq!((blades.routed.routed, blades.routed.skipped), (1, 1));
	assert!(engine.is_loaded());
	assert!(engine.equipment().is_initialized());
	assert!(engine.overlays().is_frozen());
}

#[tokio::test]
async fn sequential_load_merges_in_registration_order() {
	let mut engine = engine(false);
	let summary = engine.load_all().await.unwrap();
	assert_merged(&engine, &summary);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_load_merges_in_registration_order() {
	let mut engine = engine(true);
	let summary = engine.load_all().await.unwrap();
	assert_eq!(summary.lost_extensions, 0);
	assert_merged(&engine, &summary);
}

#[test]
fn ticked_load_respects_budget() {
	let mut engine = engine(false);
	let err = engine.load_ticked(1).unwrap_err();
	assert!(matches!(err, EngineError::Driver(DriverError::OutOfTicks { ticks: 1 })));
	assert!(!engine.is_loaded());
	assert_eq!(engine.pack().total_len(), 0);

	let summary = engine.load_ticked(100).unwrap();
	assert_merged(&engine, &summary);
}

#[tokio::test]
async fn extensions_are_rejected_after_load() {
	let mut engine = Engine::new(config(false));
	engine.add_extension(Extension::builder("ext.a").build()).unwrap();
	assert!(matches!(
		engine.add_extension(Extension::builder("ext.a").build()),
		Err(EngineError::DuplicateExtension(id)) if id == "ext.a"
	));

	engine.load_all().await.unwrap();
	assert!(matches!(engine.add_extension(Extension::builder("ext.b").build()), Err(EngineError::AlreadyLoaded)));
	assert!(matches!(engine.load_all().await, Err(EngineError::AlreadyLoaded)));
}

#[tokio::test]
async fn overlays_freeze_at_steady_state() {
	let mut engine = Engine::new(config(false));
	let burning = Handle::new(StatusDef::new("Burning"));
	assert_eq!(engine.overlays().register(&burning, Material::new("matBurning")), OverlayRegistration::Registered);

	engine.load_all().await.unwrap();

	let frozen = Handle::new(StatusDef::new("Frozen"));
	assert_eq!(engine.overlays().register(&frozen, Material::new("matFrozen")), OverlayRegistration::Frozen);
	assert_eq!(engine.overlays().overlays().map(<[_]>::len), Some(1));
}

#[test]
fn gates_come_from_config() {
	let mut config = config(false);
	config.gates.enabled = vec!["a".into()];
	let engine = Engine::new(config);
	assert!(engine.gates().is_enabled("a"));
}

#[derive(Default)]
struct Gateless;

#[async_trait]
impl ContentUnit<SkillDef> for Gateless {
	fn is_available(&self, _gates: &FeatureGates) -> bool {
		panic!("no gate table")
	}

	async fn load(&self) -> Result<SkillDef, UnitError> {
		Ok(SkillDef::new("Gateless"))
	}
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn panicking_availability_keeps_the_extension() {
	let mut engine = Engine::new(config(true));
	engine
		.add_extension(
			Extension::builder("ext.mixed")
				.unit::<dyn ContentUnit<SkillDef>, Pierce>()
				.unit::<dyn ContentUnit<SkillDef>, Gateless>()
				.build(),
		)
		.unwrap();

	let summary = engine.load_all().await.unwrap();
	assert_eq!(summary.lost_extensions, 0);
	assert_eq!((summary.extensions[0].committed, summary.extensions[0].failed), (1, 1));
	assert_eq!(engine.pack().names_of(Category::Skill), vec!["Pierce"]);
}
