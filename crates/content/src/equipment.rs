//! Equipment partition view.
//!
//! Committed equipment units are recorded per extension while loading. Once
//! every extension reached steady state, [`EquipmentModule::initialize`]
//! builds the [`EquipmentView`] exactly once; activations are routed through it
//! from then on.

use std::sync::{Arc, OnceLock};

use cairn_registry::Handle;
use cairn_registry::defs::{EliteDef, EquipmentDef};
use rustc_hash::FxHashMap;

use crate::pipeline::Committed;
use crate::unit::{EquipmentSlot, EquipmentUnit};

/// A committed equipment definition and the unit that produced it.
pub type EquipmentEntry = Committed<dyn EquipmentUnit, EquipmentDef>;

/// Read-only partition of committed equipment by elite flavor.
pub struct EquipmentView {
	all: Vec<EquipmentEntry>,
	elite: Vec<EquipmentEntry>,
	non_elite: Vec<EquipmentEntry>,
	elite_defs: Vec<Handle<EliteDef>>,
	by_def: FxHashMap<Handle<EquipmentDef>, Arc<dyn EquipmentUnit>>,
}

impl EquipmentView {
	pub fn build(committed: impl IntoIterator<Item = EquipmentEntry>) -> Self {
		let mut view = Self {
			all: Vec::new(),
			elite: Vec::new(),
			non_elite: Vec::new(),
			elite_defs: Vec::new(),
			by_def: FxHashMap::default(),
		};

		for entry in committed {
			if view.by_def.contains_key(&entry.asset) {
				tracing::warn!(equipment = %entry.asset.name, "equipment.duplicate_entry");
				continue;
			}
			view.by_def.insert(entry.asset.clone(), Arc::clone(&entry.unit));

			match entry.unit.as_elite() {
				Some(elite) => {
					view.elite_defs.extend(elite.elite_defs());
					view.elite.push(entry.clone());
				}
				None => view.non_elite.push(entry.clone()),
			}
			view.all.push(entry);
		}

		view
	}

	pub fn all(&self) -> &[EquipmentEntry] {
		&self.all
	}

	pub fn elite(&self) -> &[EquipmentEntry] {
		&self.elite
	}

	pub fn non_elite(&self) -> &[EquipmentEntry] {
		&self.non_elite
	}

	/// Elite definitions contributed by every elite equipment, in commit order.
	pub fn elite_defs(&self) -> &[Handle<EliteDef>] {
		&self.elite_defs
	}

	pub fn unit_of(&self, def: &Handle<EquipmentDef>) -> Option<&Arc<dyn EquipmentUnit>> {
		self.by_def.get(def)
	}

	pub fn is_elite(&self, def: &Handle<EquipmentDef>) -> bool {
		self.elite.iter().any(|entry| entry.asset == *def)
	}
}

impl std::fmt::Debug for EquipmentView {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EquipmentView")
			.field("all", &self.all.len())
			.field("elite", &self.elite.len())
			.field("non_elite", &self.non_elite.len())
			.field("elite_defs", &self.elite_defs.len())
			.finish()
	}
}

/// Per-extension equipment bookkeeping plus the once-built view.
#[derive(Default)]
pub struct EquipmentModule {
	by_extension: Vec<(String, Vec<EquipmentEntry>)>,
	view: OnceLock<EquipmentView>,
}

impl EquipmentModule {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records the equipment committed by `extension`. Ignored after [`initialize`](Self::initialize).
	pub fn record(&mut self, extension: &str, committed: Vec<EquipmentEntry>) -> bool {
		if self.view.get().is_some() {
			tracing::warn!(extension, "equipment.record_after_initialize");
			return false;
		}
		match self.by_extension.iter_mut().find(|(id, _)| id == extension) {
			Some((_, entries)) => entries.extend(committed),
			None => self.by_extension.push((extension.to_owned(), committed)),
		}
		true
	}

	/// Builds the view. Only the first call builds; later calls warn and
	/// return the existing view.
	pub fn initialize(&self) -> &EquipmentView {
		if let Some(view) = self.view.get() {
			tracing::warn!("equipment.already_initialized");
			return view;
		}

		let view = self.view.get_or_init(|| EquipmentView::build(self.by_extension.iter().flat_map(|(_, entries)| entries.iter().cloned())));
		tracing::info!(
			all = view.all.len(),
			elite = view.elite.len(),
			non_elite = view.non_elite.len(),
			"equipment.initialized"
		);
		view
	}

	pub fn view(&self) -> Option<&EquipmentView> {
		self.view.get()
	}

	pub fn is_initialized(&self) -> bool {
		self.view.get().is_some()
	}

	/// Equipment committed by `extension`, or `None` if it recorded nothing.
	pub fn equipments_of(&self, extension: &str) -> Option<&[EquipmentEntry]> {
		self.by_extension
			.iter()
			.find(|(id, _)| id == extension)
			.map(|(_, entries)| entries.as_slice())
	}

	/// Routes an activation to the unit that produced `def`, else to `fallback`.
	///
	/// Always falls back before [`initialize`](Self::initialize).
	pub fn perform_action(&self, slot: &mut EquipmentSlot, def: &Handle<EquipmentDef>, fallback: impl FnOnce(&mut EquipmentSlot, &Handle<EquipmentDef>) -> bool) -> bool {
		match self.view().and_then(|view| view.unit_of(def)) {
			Some(unit) => {
				tracing::trace!(equipment = %def.name, owner = %slot.owner, "equipment.execute");
				unit.execute(slot)
			}
			None => fallback(slot, def),
		}
	}
}
