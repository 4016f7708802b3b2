//! Per-extension load-and-commit pipeline.
//!
//! Units run strictly one at a time: availability check, async load,
//! initialize, commit, secondary contribution. A failing unit is recorded and
//! the run moves on; nothing escapes [`ExtensionPipeline::run`].

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use cairn_registry::{ContentPack, Handle, PackAsset, panic_message};
use futures::FutureExt;

use crate::error::UnitError;
use crate::gates::FeatureGates;
use crate::unit::ContentUnit;

/// Pipeline step a unit failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
	/// The availability check itself panicked.
	Availability,
	Load,
	Initialize,
	Commit,
	/// Secondary contribution after the primary artifact was committed.
	Contribute,
}

impl fmt::Display for Stage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Stage::Availability => "availability",
			Stage::Load => "load",
			Stage::Initialize => "initialize",
			Stage::Commit => "commit",
			Stage::Contribute => "contribute",
		})
	}
}

#[derive(Debug, Clone)]
pub enum UnitState {
	Pending,
	/// Availability check returned false.
	Skipped,
	Loading,
	Initializing,
	Committed,
	Failed { stage: Stage, error: UnitError },
}

impl UnitState {
	pub fn is_committed(&self) -> bool {
		matches!(self, UnitState::Committed)
	}
}

/// Final state of one unit.
#[derive(Debug, Clone)]
pub struct UnitOutcome {
	pub unit: String,
	pub state: UnitState,
}

/// A committed unit and its primary artifact.
pub struct Committed<U: ?Sized, T> {
	pub unit: Arc<U>,
	pub asset: Handle<T>,
}

impl<U: ?Sized, T> Clone for Committed<U, T> {
	fn clone(&self) -> Self {
		Self {
			unit: Arc::clone(&self.unit),
			asset: self.asset.clone(),
		}
	}
}

impl<U: ?Sized, T: fmt::Debug> fmt::Debug for Committed<U, T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Committed").field("asset", &self.asset).finish_non_exhaustive()
	}
}

pub struct PipelineReport<U: ?Sized, T> {
	pub outcomes: Vec<UnitOutcome>,
	pub committed: Vec<Committed<U, T>>,
}

impl<U: ?Sized, T> PipelineReport<U, T> {
	fn new() -> Self {
		Self {
			outcomes: Vec::new(),
			committed: Vec::new(),
		}
	}

	pub fn committed_count(&self) -> usize {
		self.count(|state| state.is_committed())
	}

	pub fn skipped_count(&self) -> usize {
		self.count(|state| matches!(state, UnitState::Skipped))
	}

	pub fn failed_count(&self) -> usize {
		self.count(|state| matches!(state, UnitState::Failed { .. }))
	}

	fn count(&self, pred: impl Fn(&UnitState) -> bool) -> usize {
		self.outcomes.iter().filter(|outcome| pred(&outcome.state)).count()
	}
}

impl<U: ?Sized, T> fmt::Debug for PipelineReport<U, T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PipelineReport")
			.field("outcomes", &self.outcomes)
			.field("committed", &self.committed.len())
			.finish()
	}
}

/// Drives one extension's units into that extension's own pack.
pub struct ExtensionPipeline<'a> {
	pack: &'a mut ContentPack,
	gates: &'a FeatureGates,
}

impl<'a> ExtensionPipeline<'a> {
	pub fn new(pack: &'a mut ContentPack, gates: &'a FeatureGates) -> Self {
		Self { pack, gates }
	}

	/// Runs every unit through the pipeline, in order.
	pub async fn run<U, T>(&mut self, units: Vec<Box<U>>) -> PipelineReport<U, T>
	where
		U: ?Sized + ContentUnit<T>,
		T: PackAsset,
	{
		self.run_with(units, |_, _, _| {}).await
	}

	/// Like [`run`](Self::run), calling `on_commit` right after each primary
	/// commit and before the unit's pack modifier.
	pub async fn run_with<U, T>(&mut self, units: Vec<Box<U>>, on_commit: impl Fn(&U, &Handle<T>, &mut ContentPack)) -> PipelineReport<U, T>
	where
		U: ?Sized + ContentUnit<T>,
		T: PackAsset,
	{
		let pack_id = self.pack.identifier().to_owned();
		let mut report = PipelineReport::new();

		for unit in units {
			let name = catch_unwind(AssertUnwindSafe(|| unit.name().to_owned())).unwrap_or_else(|_| std::any::type_name::<U>().to_owned());
			let state = match self.process(&*unit, &name, &on_commit).await {
				Ok(Some(asset)) => {
					tracing::trace!(pack = %pack_id, unit = %name, "pipeline.committed");
					report.committed.push(Committed {
						unit: Arc::from(unit),
						asset,
					});
					UnitState::Committed
				}
				Ok(None) => {
					tracing::debug!(pack = %pack_id, unit = %name, "pipeline.unavailable");
					UnitState::Skipped
				}
				Err((stage, error)) => {
					tracing::error!(pack = %pack_id, unit = %name, %stage, %error, "pipeline.unit_failed");
					UnitState::Failed { stage, error }
				}
			};
			report.outcomes.push(UnitOutcome { unit: name, state });
		}

		tracing::info!(
			pack = %pack_id,
			committed = report.committed_count(),
			skipped = report.skipped_count(),
			failed = report.failed_count(),
			"pipeline.run"
		);
		report
	}

	/// `Ok(None)` means the unit was unavailable.
	async fn process<U, T>(&mut self, unit: &U, name: &str, on_commit: &impl Fn(&U, &Handle<T>, &mut ContentPack)) -> Result<Option<Handle<T>>, (Stage, UnitError)>
	where
		U: ?Sized + ContentUnit<T>,
		T: PackAsset,
	{
		let gates = self.gates;
		let available = catch_unwind(AssertUnwindSafe(|| unit.is_available(gates)))
			.map_err(|payload| (Stage::Availability, UnitError::Panicked(panic_message(&*payload))))?;
		if !available {
			return Ok(None);
		}

		tracing::trace!(unit = name, state = ?UnitState::Loading, "pipeline.transition");
		let loaded = AssertUnwindSafe(unit.load()).catch_unwind().await;
		let mut asset = match loaded {
			Ok(Ok(asset)) => asset,
			Ok(Err(error)) => return Err((Stage::Load, error)),
			Err(payload) => return Err((Stage::Load, UnitError::Panicked(panic_message(&*payload)))),
		};

		tracing::trace!(unit = name, state = ?UnitState::Initializing, "pipeline.transition");
		guarded(Stage::Initialize, || unit.initialize(&mut asset))?;

		let handle = Handle::new(asset);
		guarded(Stage::Commit, || {
			T::commit(handle.clone(), self.pack);
			on_commit(unit, &handle, self.pack);
			Ok(())
		})?;

		guarded(Stage::Contribute, || match unit.as_pack_modifier() {
			Some(modifier) => modifier.modify_pack(&handle, self.pack),
			None => Ok(()),
		})?;

		Ok(Some(handle))
	}
}

/// Runs a synchronous step, turning an error or panic into a stage failure.
fn guarded(stage: Stage, f: impl FnOnce() -> Result<(), UnitError>) -> Result<(), (Stage, UnitError)> {
	match catch_unwind(AssertUnwindSafe(f)) {
		Ok(result) => result.map_err(|error| (stage, error)),
		Err(payload) => Err((stage, UnitError::Panicked(panic_message(&*payload)))),
	}
}
