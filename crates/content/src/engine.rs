//! Engine: the context object owning every extension and the merged content.
//!
//! Each extension loads into its own [`ContentPack`]. Loading runs either one
//! extension after another or with one task per extension; finished packs are
//! merged on the calling task, in registration order. Post-processing (the
//! equipment view, overlay freeze) happens once, after every extension reached
//! steady state.

use std::marker::PhantomData;
use std::sync::Arc;

use cairn_registry::{ContentPack, RouteSummary, add_from_collection, panic_message};
use futures::future::BoxFuture;
use tokio::task::JoinSet;

use crate::config::EngineConfig;
use crate::discovery::{Extension, discover};
use crate::driver::TickDriver;
use crate::equipment::{EquipmentEntry, EquipmentModule};
use crate::error::{DiscoveryError, EngineError};
use crate::gates::FeatureGates;
use crate::overlays::StatusOverlays;
use crate::pipeline::{ExtensionPipeline, UnitOutcome, UnitState};
use crate::unit::{ContentUnit, UnitKind};

/// Loads every unit of one unit object type for an extension.
pub(crate) trait UnitStage: Send + Sync {
	fn run<'a>(&'a self, extension: &'a Extension, pipeline: &'a mut ExtensionPipeline<'_>, report: &'a mut LoadReport) -> BoxFuture<'a, ()>;
}

struct StageOf<U: ?Sized>(PhantomData<fn() -> Box<U>>);

impl<U> UnitStage for StageOf<U>
where
	U: ?Sized + UnitKind + ContentUnit<U::Asset>,
{
	fn run<'a>(&'a self, extension: &'a Extension, pipeline: &'a mut ExtensionPipeline<'_>, report: &'a mut LoadReport) -> BoxFuture<'a, ()> {
		Box::pin(async move {
			let discovered = discover::<U>(extension);
			report.discovery_failures.extend(discovered.failures);

			let run = pipeline.run_with::<U, U::Asset>(discovered.units, |unit, asset, pack| unit.on_commit(asset, pack)).await;
			report.outcomes.extend(run.outcomes);
			U::collect(run.committed, report);
		})
	}
}

pub(crate) fn stage_for<U>() -> Box<dyn UnitStage>
where
	U: ?Sized + UnitKind + ContentUnit<U::Asset>,
{
	Box::new(StageOf::<U>(PhantomData))
}

/// What loading one extension produced, besides its pack.
#[derive(Debug, Default)]
pub struct LoadReport {
	pub routed: RouteSummary,
	pub outcomes: Vec<UnitOutcome>,
	pub discovery_failures: Vec<DiscoveryError>,
	pub equipment: Vec<EquipmentEntry>,
}

impl LoadReport {
	pub fn committed(&self) -> usize {
		self.outcomes.iter().filter(|outcome| outcome.state.is_committed()).count()
	}

	pub fn skipped(&self) -> usize {
		self.outcomes.iter().filter(|outcome| matches!(outcome.state, UnitState::Skipped)).count()
	}

	pub fn failed(&self) -> usize {
		self.outcomes.iter().filter(|outcome| matches!(outcome.state, UnitState::Failed { .. })).count()
	}
}

/// A fully loaded extension, not yet merged.
#[derive(Debug)]
pub struct ExtensionLoad {
	pub extension: String,
	pub pack: ContentPack,
	pub report: LoadReport,
}

/// Loads one extension into a fresh pack: collections first, then every unit stage.
pub async fn load_extension(extension: &Extension, gates: &FeatureGates) -> ExtensionLoad {
	let mut pack = ContentPack::new(extension.id());
	let mut report = LoadReport::default();

	for collection in extension.collections() {
		report.routed += add_from_collection(&mut pack, collection);
	}

	let mut pipeline = ExtensionPipeline::new(&mut pack, gates);
	for stage in &extension.stages {
		stage.run(extension, &mut pipeline, &mut report).await;
	}

	ExtensionLoad {
		extension: extension.id().to_owned(),
		pack,
		report,
	}
}

/// Per-extension result of [`Engine::load_all`].
#[derive(Debug)]
pub struct ExtensionSummary {
	pub extension: String,
	/// Entries new to the engine pack.
	pub merged: usize,
	pub committed: usize,
	pub skipped: usize,
	pub failed: usize,
	pub routed: RouteSummary,
	pub discovery_failures: Vec<DiscoveryError>,
	pub outcomes: Vec<UnitOutcome>,
}

#[derive(Debug, Default)]
pub struct LoadSummary {
	pub extensions: Vec<ExtensionSummary>,
	/// Extension tasks that panicked; their content was discarded.
	pub lost_extensions: usize,
}

impl LoadSummary {
	pub fn failed_units(&self) -> usize {
		self.extensions.iter().map(|summary| summary.failed).sum()
	}
}

pub struct Engine {
	config: EngineConfig,
	gates: Arc<FeatureGates>,
	extensions: Vec<Arc<Extension>>,
	pack: ContentPack,
	equipment: EquipmentModule,
	overlays: StatusOverlays,
	loaded: bool,
}

impl Engine {
	pub fn new(config: EngineConfig) -> Self {
		let gates = FeatureGates::from_config(&config.gates);
		Self::with_gates(config, gates)
	}

	pub fn with_gates(config: EngineConfig, gates: FeatureGates) -> Self {
		Self {
			config,
			gates: Arc::new(gates),
			extensions: Vec::new(),
			pack: ContentPack::new("engine"),
			equipment: EquipmentModule::new(),
			overlays: StatusOverlays::new(),
			loaded: false,
		}
	}

	pub fn add_extension(&mut self, extension: Extension) -> Result<(), EngineError> {
		if self.loaded {
			return Err(EngineError::AlreadyLoaded);
		}
		if self.extensions.iter().any(|existing| existing.id() == extension.id()) {
			return Err(EngineError::DuplicateExtension(extension.id().to_owned()));
		}
		tracing::debug!(extension = extension.id(), "engine.add_extension");
		self.extensions.push(Arc::new(extension));
		Ok(())
	}

	/// Loads every extension, concurrently if configured.
	///
	/// Concurrent loading spawns onto the current tokio runtime.
	pub async fn load_all(&mut self) -> Result<LoadSummary, EngineError> {
		if self.config.pipeline.concurrent_extensions {
			self.load_concurrent().await
		} else {
			self.load_sequential().await
		}
	}

	/// Loads extensions one after another on the calling task. Needs no runtime.
	pub async fn load_sequential(&mut self) -> Result<LoadSummary, EngineError> {
		self.ensure_not_loaded()?;
		tracing::info!(extensions = self.extensions.len(), mode = "sequential", "engine.load");

		let mut loads = Vec::with_capacity(self.extensions.len());
		for extension in &self.extensions {
			loads.push(load_extension(extension, &self.gates).await);
		}
		Ok(self.finish(loads, 0))
	}

	/// Loads each extension in its own task and merges in registration order.
	pub async fn load_concurrent(&mut self) -> Result<LoadSummary, EngineError> {
		self.ensure_not_loaded()?;
		tracing::info!(extensions = self.extensions.len(), mode = "concurrent", "engine.load");

		let mut tasks = JoinSet::new();
		for (index, extension) in self.extensions.iter().enumerate() {
			let extension = Arc::clone(extension);
			let gates = Arc::clone(&self.gates);
			tasks.spawn(async move { (index, load_extension(&extension, &gates).await) });
		}

		let mut loads = Vec::with_capacity(self.extensions.len());
		let mut lost = 0;
		while let Some(joined) = tasks.join_next().await {
			match joined {
				Ok(load) => loads.push(load),
				Err(error) => {
					lost += 1;
					let reason = if error.is_panic() { panic_message(&*error.into_panic()) } else { error.to_string() };
					tracing::error!(%reason, "engine.extension_task_failed");
				}
			}
		}
		loads.sort_by_key(|(index, _)| *index);

		Ok(self.finish(loads.into_iter().map(|(_, load)| load).collect(), lost))
	}

	/// Drives [`load_sequential`](Self::load_sequential) with a [`TickDriver`],
	/// failing once `max_ticks` polls were spent. The engine is unchanged on failure.
	pub fn load_ticked(&mut self, max_ticks: u64) -> Result<LoadSummary, EngineError> {
		TickDriver::new(self.load_sequential()).run_for(max_ticks)?
	}

	fn ensure_not_loaded(&self) -> Result<(), EngineError> {
		if self.loaded { Err(EngineError::AlreadyLoaded) } else { Ok(()) }
	}

	fn finish(&mut self, loads: Vec<ExtensionLoad>, lost_extensions: usize) -> LoadSummary {
		let mut summary = LoadSummary {
			extensions: Vec::with_capacity(loads.len()),
			lost_extensions,
		};

		for load in loads {
			let merged = self.pack.merge_from(&load.pack);
			let (committed, skipped, failed) = (load.report.committed(), load.report.skipped(), load.report.failed());
			let LoadReport {
				routed,
				outcomes,
				discovery_failures,
				equipment,
			} = load.report;
			self.equipment.record(&load.extension, equipment);

			summary.extensions.push(ExtensionSummary {
				extension: load.extension,
				merged,
				committed,
				skipped,
				failed,
				routed,
				discovery_failures,
				outcomes,
			});
		}

		self.loaded = true;
		self.equipment.initialize();
		let overlays = self.overlays.freeze().unwrap_or_default();

		tracing::info!(
			extensions = summary.extensions.len(),
			lost = summary.lost_extensions,
			entries = self.pack.total_len(),
			overlays,
			"engine.steady_state"
		);
		summary
	}

	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	pub fn gates(&self) -> &FeatureGates {
		&self.gates
	}

	pub fn extensions(&self) -> impl Iterator<Item = &Extension> + '_ {
		self.extensions.iter().map(|extension| &**extension)
	}

	/// The merged content of every loaded extension.
	pub fn pack(&self) -> &ContentPack {
		&self.pack
	}

	pub fn equipment(&self) -> &EquipmentModule {
		&self.equipment
	}

	/// Overlay table; register before [`load_all`](Self::load_all), read after.
	pub fn overlays(&self) -> &StatusOverlays {
		&self.overlays
	}

	pub fn is_loaded(&self) -> bool {
		self.loaded
	}
}

impl std::fmt::Debug for Engine {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Engine")
			.field("extensions", &self.extensions.len())
			.field("entries", &self.pack.total_len())
			.field("loaded", &self.loaded)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests;
