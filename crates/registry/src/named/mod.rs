//! Name-indexed artifact registries.
//!
//! # Invariants
//!
//! - Names are unique within one registry. A name collision never overwrites
//!   the existing entry; the incoming artifact gets a generated name instead.
//! - A [`Handle`] appears at most once (identity dedup).
//! - The backing sequence is sorted by name after every insertion.
//!
//! None of these conditions are errors. Duplicate and colliding insertions
//! degrade to a warning so cooperating extensions can never abort aggregation.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::Asset;
use crate::asset::{fallback_name, is_blank};
use crate::handle::Handle;

/// Derives a registry name from an artifact.
pub type NameProvider<T> = fn(&T) -> String;

/// One `(artifact, name)` pair in registry order.
pub struct AssetInfo<T: Asset> {
	pub asset: Handle<T>,
	pub name: Box<str>,
}

impl<T: Asset> Clone for AssetInfo<T> {
	fn clone(&self) -> Self {
		Self {
			asset: self.asset.clone(),
			name: self.name.clone(),
		}
	}
}

impl<T: Asset> fmt::Debug for AssetInfo<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AssetInfo")
			.field("name", &self.name)
			.field("addr", &format_args!("{:#x}", self.asset.addr()))
			.finish()
	}
}

/// Result of [`NamedRegistry::insert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
	/// The artifact was appended under `name`.
	Inserted { name: Box<str> },
	/// The artifact was already registered under `name`; nothing changed.
	AlreadyPresent { name: Box<str> },
}

impl InsertOutcome {
	/// Whether the call mutated the registry.
	#[inline]
	pub fn is_inserted(&self) -> bool {
		matches!(self, Self::Inserted { .. })
	}

	/// The name the artifact is registered under.
	pub fn name(&self) -> &str {
		match self {
			Self::Inserted { name } | Self::AlreadyPresent { name } => name,
		}
	}
}

/// Ordered, name-indexed container for artifacts of one category.
pub struct NamedRegistry<T: Asset> {
	label: &'static str,
	entries: Vec<AssetInfo<T>>,
	by_name: FxHashMap<Box<str>, Handle<T>>,
	by_asset: FxHashMap<Handle<T>, Box<str>>,
	name_provider: Option<NameProvider<T>>,
}

impl<T: Asset> NamedRegistry<T> {
	/// Creates an empty registry. `label` identifies it in diagnostics.
	pub fn new(label: &'static str) -> Self {
		Self {
			label,
			entries: Vec::new(),
			by_name: FxHashMap::default(),
			by_asset: FxHashMap::default(),
			name_provider: None,
		}
	}

	/// Creates an empty registry that derives names with `provider` instead of
	/// [`Asset::name`].
	pub fn with_name_provider(label: &'static str, provider: NameProvider<T>) -> Self {
		Self {
			name_provider: Some(provider),
			..Self::new(label)
		}
	}

	/// Registers `asset` using its derived name.
	pub fn add(&mut self, asset: Handle<T>) -> InsertOutcome {
		self.insert(asset, None)
	}

	/// Registers `asset`, preferring `explicit` as its name.
	///
	/// Resolution order: `explicit`, then the configured name provider, then
	/// [`Asset::name`]. A blank candidate, or one already owned by a different
	/// artifact, is replaced with `"<TYPE_NAME>_<count>"` where `count` is the
	/// registry size before insertion.
	pub fn insert(&mut self, asset: Handle<T>, explicit: Option<&str>) -> InsertOutcome {
		if let Some(existing) = self.by_asset.get(&asset) {
			tracing::warn!(registry = self.label, name = &**existing, "artifact already registered");
			return InsertOutcome::AlreadyPresent { name: existing.clone() };
		}

		let candidate = match explicit {
			Some(name) => name.to_owned(),
			None => match self.name_provider {
				Some(provider) => provider(&*asset),
				None => asset.name().to_owned(),
			},
		};

		let name = if is_blank(&candidate) {
			let generated = self.next_fallback_name();
			tracing::warn!(registry = self.label, name = %generated, "artifact has no valid name, assigning a generated one");
			generated
		} else if self.by_name.contains_key(candidate.as_str()) {
			let generated = self.next_fallback_name();
			tracing::warn!(
				registry = self.label,
				taken = %candidate,
				name = %generated,
				"name already registered, assigning a generated one"
			);
			generated
		} else {
			candidate
		};

		let name: Box<str> = name.into_boxed_str();
		self.entries.push(AssetInfo {
			asset: asset.clone(),
			name: name.clone(),
		});
		self.by_name.insert(name.clone(), asset.clone());
		self.by_asset.insert(asset, name.clone());
		self.entries.sort_by(|a, b| a.name.cmp(&b.name));

		tracing::trace!(registry = self.label, name = &*name, len = self.entries.len(), "registry.insert");
		InsertOutcome::Inserted { name }
	}

	/// First `"<TYPE_NAME>_<n>"` with `n >= len` that is not taken.
	fn next_fallback_name(&self) -> String {
		let mut count = self.entries.len();
		loop {
			let name = fallback_name(T::TYPE_NAME, count);
			if !self.by_name.contains_key(name.as_str()) {
				return name;
			}
			count += 1;
		}
	}

	/// Looks up an artifact by registered name.
	pub fn find(&self, name: &str) -> Option<&Handle<T>> {
		self.by_name.get(name)
	}

	/// Returns the name `asset` is registered under.
	pub fn name_of(&self, asset: &Handle<T>) -> Option<&str> {
		self.by_asset.get(asset).map(|name| &**name)
	}

	pub fn contains(&self, asset: &Handle<T>) -> bool {
		self.by_asset.contains_key(asset)
	}

	pub fn contains_name(&self, name: &str) -> bool {
		self.by_name.contains_key(name)
	}

	/// Entry at `index` in sorted order.
	pub fn get(&self, index: usize) -> Option<&AssetInfo<T>> {
		self.entries.get(index)
	}

	/// Entries in sorted order.
	pub fn iter(&self) -> std::slice::Iter<'_, AssetInfo<T>> {
		self.entries.iter()
	}

	/// Registered names in sorted order.
	pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
		self.entries.iter().map(|info| &*info.name)
	}

	/// Artifacts in sorted order.
	pub fn assets(&self) -> impl Iterator<Item = &Handle<T>> + '_ {
		self.entries.iter().map(|info| &info.asset)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn label(&self) -> &'static str {
		self.label
	}
}

impl<'a, T: Asset> IntoIterator for &'a NamedRegistry<T> {
	type Item = &'a AssetInfo<T>;
	type IntoIter = std::slice::Iter<'a, AssetInfo<T>>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl<T: Asset> fmt::Debug for NamedRegistry<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NamedRegistry")
			.field("label", &self.label)
			.field("names", &self.names().collect::<Vec<_>>())
			.finish()
	}
}

#[cfg(test)]
mod tests;
