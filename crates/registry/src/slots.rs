//! Typed access points wired from registry contents.
//!
//! A consumer declares a struct of [`Slot`]s with [`asset_slots!`] and fills it
//! with [`populate_slots`] once the registry has reached steady state. Every
//! slot is looked up by its field name.

use std::sync::OnceLock;

use rustc_hash::FxHashSet;

use crate::Asset;
use crate::handle::Handle;
use crate::named::NamedRegistry;

/// Write-once holder for a registered artifact.
pub struct Slot<T>(OnceLock<Handle<T>>);

impl<T> Slot<T> {
	pub const fn new() -> Self {
		Self(OnceLock::new())
	}

	/// The assigned artifact, if population found one.
	pub fn get(&self) -> Option<&Handle<T>> {
		self.0.get()
	}

	/// Whether the slot has been filled.
	pub fn is_set(&self) -> bool {
		self.0.get().is_some()
	}

	fn fill(&self, asset: Handle<T>) {
		// First population wins.
		let _ = self.0.set(asset);
	}
}

impl<T> Default for Slot<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T: std::fmt::Debug> std::fmt::Debug for Slot<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("Slot").field(&self.0.get()).finish()
	}
}

/// A set of named slots for artifacts of type `T`.
pub trait SlotTarget<T> {
	/// Name of the owning type, for diagnostics.
	fn owner(&self) -> &'static str;

	/// `(slot name, slot)` pairs.
	fn slots(&self) -> Vec<(&'static str, &Slot<T>)>;
}

/// Outcome of one [`populate_slots`] pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotReport {
	/// Slots that hold an artifact after the pass.
	pub assigned: usize,
	/// Slot names with no matching artifact.
	pub missing: Vec<&'static str>,
	/// Registered names that no slot asked for.
	pub unassigned: Vec<String>,
}

impl SlotReport {
	pub fn is_complete(&self) -> bool {
		self.missing.is_empty() && self.unassigned.is_empty()
	}
}

/// Fills every slot of `target` from `registry`.
///
/// Missing slots and unassigned artifacts are reported once per pass, each as
/// a single warning listing every affected name.
pub fn populate_slots<T: Asset>(target: &dyn SlotTarget<T>, registry: &NamedRegistry<T>) -> SlotReport {
	let owner = target.owner();
	tracing::info!(owner, registry = registry.label(), assets = registry.len(), "populating slots");

	let mut report = SlotReport::default();
	let mut used: FxHashSet<&str> = FxHashSet::default();

	for (slot_name, slot) in target.slots() {
		match registry.find(slot_name) {
			Some(asset) => {
				slot.fill(asset.clone());
				used.insert(slot_name);
				report.assigned += 1;
			}
			None => report.missing.push(slot_name),
		}
	}

	report.unassigned = registry.names().filter(|name| !used.contains(name)).map(str::to_owned).collect();

	if !report.missing.is_empty() {
		let lines: Vec<String> = report.missing.iter().map(|slot| format!("{owner}.{slot}: asset not found")).collect();
		tracing::warn!(owner, count = report.missing.len(), "failed to assign {} slot(s):\n{}", report.missing.len(), lines.join("\n"));
	}
	if !report.unassigned.is_empty() {
		tracing::warn!(
			owner,
			count = report.unassigned.len(),
			"{} asset(s) have no slot in {owner}:\n{}",
			report.unassigned.len(),
			report.unassigned.join("\n")
		);
	}

	report
}

/// Declares a struct of [`Slot`]s and its [`SlotTarget`] impl.
///
/// ```ignore
/// asset_slots! {
/// 	pub struct Statuses: StatusDef { Burning, Frozen }
/// }
/// static STATUSES: Statuses = Statuses::new();
/// populate_slots(&STATUSES, &pack.status_defs);
/// ```
#[macro_export]
macro_rules! asset_slots {
	($(#[$meta:meta])* $vis:vis struct $name:ident : $ty:ty { $($slot:ident),* $(,)? }) => {
		$(#[$meta])*
		#[allow(non_snake_case)]
		$vis struct $name {
			$(pub $slot: $crate::Slot<$ty>,)*
		}

		impl $name {
			#[allow(clippy::new_without_default)]
			pub const fn new() -> Self {
				Self { $($slot: $crate::Slot::new(),)* }
			}
		}

		impl $crate::SlotTarget<$ty> for $name {
			fn owner(&self) -> &'static str {
				stringify!($name)
			}

			fn slots(&self) -> Vec<(&'static str, &$crate::Slot<$ty>)> {
				vec![$((stringify!($slot), &self.$slot),)*]
			}
		}
	};
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::defs::StatusDef;

	crate::asset_slots! {
		struct Statuses: StatusDef { Burning, Frozen, Bleeding }
	}

	#[test]
	fn fills_matching_slots_and_reports_the_rest_in_one_batch() {
		let mut registry = NamedRegistry::new("status_defs");
		let burning = Handle::new(StatusDef::new("Burning"));
		registry.add(burning.clone());
		registry.add(Handle::new(StatusDef::new("Frozen")));
		registry.add(Handle::new(StatusDef::new("Shocked")));

		let statuses = Statuses::new();
		let report = populate_slots(&statuses, &registry);

		assert_eq!(report.assigned, 2);
		assert_eq!(report.missing, vec!["Bleeding"]);
		assert_eq!(report.unassigned, vec!["Shocked".to_owned()]);
		assert!(!report.is_complete());
		assert!(Handle::ptr_eq(statuses.Burning.get().unwrap(), &burning));
		assert!(!statuses.Bleeding.is_set());
	}

	#[test]
	fn static_slots_keep_first_population() {
		static STATUSES: Statuses = Statuses::new();

		let mut first = NamedRegistry::new("status_defs");
		let original = Handle::new(StatusDef::new("Burning"));
		first.add(original.clone());
		populate_slots(&STATUSES, &first);

		let mut second = NamedRegistry::new("status_defs");
		second.add(Handle::new(StatusDef::new("Burning")));
		let report = populate_slots(&STATUSES, &second);

		assert_eq!(report.assigned, 1);
		assert!(Handle::ptr_eq(STATUSES.Burning.get().unwrap(), &original));
	}
}
