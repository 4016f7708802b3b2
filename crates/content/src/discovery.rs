//! Explicit unit registration and discovery.
//!
//! An [`Extension`] is a manifest of unit types, declared through
//! [`ExtensionBuilder`] or submitted at link time with [`submit_unit!`](crate::submit_unit).
//! [`discover`] instantiates every registered type of one unit object type.

use std::any::{Any, TypeId};
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use cairn_registry::defs::{Components, Prefab};
use cairn_registry::{AssetCollection, panic_message};

use crate::engine::UnitStage;
use crate::error::{DiscoveryError, UnitError};
use crate::unit::{ContentUnit, IntoUnit, MarkedUnit, UnitKind};

/// Type-erased factory; always a `Factory<U>` for the entry's unit object type.
type Factory<U> = Box<dyn Fn() -> Result<Box<U>, UnitError> + Send + Sync>;

/// Link-time unit registration, collected with `inventory`.
///
/// Use [`submit_unit!`](crate::submit_unit) rather than constructing this directly.
pub struct UnitRegistration {
	pub extension: &'static str,
	pub name: &'static str,
	pub register: fn(&mut ExtensionBuilder),
}

inventory::collect!(UnitRegistration);

/// Submits a unit type for every extension built with
/// [`ExtensionBuilder::submitted`] under the same id.
///
/// ```ignore
/// cairn_content::submit_unit!("ext.void", dyn ContentUnit<SkillDef> => VoidBlast);
/// ```
#[macro_export]
macro_rules! submit_unit {
	($extension:literal, $unit:ty => $ty:ty) => {
		$crate::inventory::submit! {
			$crate::discovery::UnitRegistration {
				extension: $extension,
				name: stringify!($ty),
				register: {
					fn register(builder: &mut $crate::discovery::ExtensionBuilder) {
						builder.register_unit::<$unit, $ty>();
					}
					register
				},
			}
		}
	};
}

struct UnitEntry {
	name: &'static str,
	/// `TypeId` of the unit object type (`dyn ContentUnit<T>`, `dyn EquipmentUnit`).
	unit_type: TypeId,
	marker: Option<Components>,
	factory: Box<dyn Any + Send + Sync>,
}

/// A content provider: its registered unit types plus plain asset collections.
pub struct Extension {
	id: String,
	entries: Vec<UnitEntry>,
	collections: Vec<AssetCollection>,
	pub(crate) stages: Vec<Box<dyn UnitStage>>,
}

impl Extension {
	pub fn builder(id: impl Into<String>) -> ExtensionBuilder {
		ExtensionBuilder {
			id: id.into(),
			entries: Vec::new(),
			collections: Vec::new(),
			stages: Vec::new(),
		}
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	/// Registered unit type names, in declaration order.
	pub fn unit_names(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.entries.iter().map(|entry| entry.name)
	}

	pub fn collections(&self) -> &[AssetCollection] {
		&self.collections
	}
}

impl fmt::Debug for Extension {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Extension")
			.field("id", &self.id)
			.field("units", &self.entries.iter().map(|entry| entry.name).collect::<Vec<_>>())
			.field("collections", &self.collections.len())
			.finish()
	}
}

pub struct ExtensionBuilder {
	id: String,
	entries: Vec<UnitEntry>,
	collections: Vec<AssetCollection>,
	stages: Vec<Box<dyn UnitStage>>,
}

impl ExtensionBuilder {
	/// Registers unit type `C` under unit object type `U`.
	pub fn unit<U, C>(mut self) -> Self
	where
		U: ?Sized + UnitKind + ContentUnit<U::Asset>,
		C: Default + IntoUnit<U> + 'static,
	{
		self.register_unit::<U, C>();
		self
	}

	/// Registers a fallible factory under unit object type `U`.
	pub fn unit_with<U>(mut self, name: &'static str, factory: impl Fn() -> Result<Box<U>, UnitError> + Send + Sync + 'static) -> Self
	where
		U: ?Sized + UnitKind + ContentUnit<U::Asset>,
	{
		self.push::<U>(name, None, Box::new(factory));
		self
	}

	/// Registers a prefab unit, recording its component marker for [`discover_prefabs`].
	pub fn prefab_unit<C>(mut self) -> Self
	where
		C: MarkedUnit + Default,
	{
		let factory: Factory<dyn ContentUnit<Prefab>> = Box::new(|| Ok(Box::new(C::default()) as Box<dyn ContentUnit<Prefab>>));
		self.push::<dyn ContentUnit<Prefab>>(std::any::type_name::<C>(), Some(C::MARKER), factory);
		self
	}

	/// Adds a collection of ready-made artifacts, routed before any unit loads.
	pub fn collection(mut self, collection: AssetCollection) -> Self {
		self.collections.push(collection);
		self
	}

	/// Pulls in every unit submitted with [`submit_unit!`](crate::submit_unit) for this extension id.
	pub fn submitted(mut self) -> Self {
		for registration in inventory::iter::<UnitRegistration> {
			if registration.extension == self.id {
				tracing::trace!(extension = %self.id, unit = registration.name, "discovery.submitted");
				(registration.register)(&mut self);
			}
		}
		self
	}

	#[doc(hidden)]
	pub fn register_unit<U, C>(&mut self)
	where
		U: ?Sized + UnitKind + ContentUnit<U::Asset>,
		C: Default + IntoUnit<U> + 'static,
	{
		let factory: Factory<U> = Box::new(|| Ok(<C as IntoUnit<U>>::into_unit(C::default())));
		self.push::<U>(std::any::type_name::<C>(), None, factory);
	}

	fn push<U>(&mut self, name: &'static str, marker: Option<Components>, factory: Factory<U>)
	where
		U: ?Sized + UnitKind + ContentUnit<U::Asset>,
	{
		let unit_type = TypeId::of::<U>();
		if !self.entries.iter().any(|entry| entry.unit_type == unit_type) {
			self.stages.push(crate::engine::stage_for::<U>());
		}
		self.entries.push(UnitEntry {
			name,
			unit_type,
			marker,
			factory: Box::new(factory),
		});
	}

	pub fn build(self) -> Extension {
		tracing::debug!(extension = %self.id, units = self.entries.len(), collections = self.collections.len(), "extension.build");
		Extension {
			id: self.id,
			entries: self.entries,
			collections: self.collections,
			stages: self.stages,
		}
	}
}

/// Result of a discovery pass.
pub struct Discovered<U: ?Sized> {
	pub units: Vec<Box<U>>,
	pub failures: Vec<DiscoveryError>,
}

impl<U: ?Sized> Discovered<U> {
	pub fn into_units(self) -> Vec<Box<U>> {
		self.units
	}
}

impl<U: ?Sized> fmt::Debug for Discovered<U> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Discovered")
			.field("units", &self.units.len())
			.field("failures", &self.failures)
			.finish()
	}
}

/// Instantiates every unit registered under unit object type `U`, in declaration order.
///
/// A factory that fails or panics is recorded in [`Discovered::failures`]; the
/// scan continues with the next type.
pub fn discover<U: ?Sized + 'static>(extension: &Extension) -> Discovered<U> {
	discover_where(extension, |_| true)
}

/// Instantiates the prefab units whose marker contains `marker`.
pub fn discover_prefabs(extension: &Extension, marker: Components) -> Discovered<dyn ContentUnit<Prefab>> {
	discover_where(extension, |entry| entry.marker.is_some_and(|m| m.contains(marker)))
}

fn discover_where<U: ?Sized + 'static>(extension: &Extension, filter: impl Fn(&UnitEntry) -> bool) -> Discovered<U> {
	let mut discovered = Discovered {
		units: Vec::new(),
		failures: Vec::new(),
	};

	for entry in extension.entries.iter().filter(|entry| entry.unit_type == TypeId::of::<U>() && filter(entry)) {
		let Some(factory) = entry.factory.downcast_ref::<Factory<U>>() else {
			continue;
		};
		let result = catch_unwind(AssertUnwindSafe(|| factory())).unwrap_or_else(|payload| Err(UnitError::Panicked(panic_message(&*payload))));
		match result {
			Ok(unit) => discovered.units.push(unit),
			Err(source) => {
				tracing::error!(extension = extension.id(), unit = entry.name, error = %source, "discovery.instantiate_failed");
				discovered.failures.push(DiscoveryError { unit: entry.name, source });
			}
		}
	}

	tracing::debug!(
		extension = extension.id(),
		found = discovered.units.len(),
		failed = discovered.failures.len(),
		"discovery.scan"
	);
	discovered
}
