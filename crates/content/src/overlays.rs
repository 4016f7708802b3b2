//! Status overlay registrations.
//!
//! Overlays are registered while content loads and frozen once the status
//! registry reaches steady state. After freezing the table is immutable.

use std::sync::OnceLock;

use cairn_registry::Handle;
use cairn_registry::defs::StatusDef;
use parking_lot::Mutex;

/// A visual material, identified by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Material {
	pub name: String,
}

impl Material {
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into() }
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayRegistration {
	Registered,
	/// The table was already frozen.
	Frozen,
	BlankMaterial,
	/// The status already has a material; the first registration wins.
	AlreadyAssigned,
}

type OverlayTable = Vec<(Handle<StatusDef>, Material)>;

#[derive(Debug)]
pub struct StatusOverlays {
	/// `None` once frozen.
	pending: Mutex<Option<OverlayTable>>,
	frozen: OnceLock<OverlayTable>,
}

impl Default for StatusOverlays {
	fn default() -> Self {
		Self {
			pending: Mutex::new(Some(Vec::new())),
			frozen: OnceLock::new(),
		}
	}
}

impl StatusOverlays {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&self, status: &Handle<StatusDef>, material: Material) -> OverlayRegistration {
		let mut pending = self.pending.lock();
		let Some(table) = pending.as_mut() else {
			tracing::info!(status = %status.name, "overlays.frozen");
			return OverlayRegistration::Frozen;
		};

		if material.name.trim().is_empty() {
			tracing::warn!(status = %status.name, "overlays.blank_material");
			return OverlayRegistration::BlankMaterial;
		}

		if let Some((_, existing)) = table.iter().find(|(assigned, _)| assigned == status) {
			tracing::info!(status = %status.name, material = %existing.name, "overlays.already_assigned");
			return OverlayRegistration::AlreadyAssigned;
		}

		table.push((status.clone(), material));
		OverlayRegistration::Registered
	}

	/// Freezes the table. Returns the number of overlays, or `None` if already frozen.
	pub fn freeze(&self) -> Option<usize> {
		let table = self.pending.lock().take()?;
		let count = table.len();
		tracing::info!(count, "overlays.freeze");
		self.frozen.get_or_init(|| table);
		Some(count)
	}

	pub fn is_frozen(&self) -> bool {
		self.frozen.get().is_some()
	}

	/// The frozen table, in registration order.
	pub fn overlays(&self) -> Option<&[(Handle<StatusDef>, Material)]> {
		self.frozen.get().map(Vec::as_slice)
	}

	pub fn material_for(&self, status: &Handle<StatusDef>) -> Option<&Material> {
		self.overlays()?.iter().find(|(assigned, _)| assigned == status).map(|(_, material)| material)
	}

	/// Materials for the statuses in `active`, in registration order, at most `max`.
	pub fn active_overlays<'a>(&'a self, active: &[Handle<StatusDef>], max: usize) -> Vec<&'a Material> {
		self.overlays()
			.unwrap_or_default()
			.iter()
			.filter(|(status, _)| active.contains(status))
			.map(|(_, material)| material)
			.take(max)
			.collect()
	}
}
