/// A typed unit of registered content.
///
/// Artifacts are plain values until they are committed. Once wrapped in a
/// [`Handle`](crate::Handle) they are shared and never mutated again.
pub trait Asset: Send + Sync + 'static {
	/// Type name used to build fallback registry names (`"<TYPE_NAME>_<count>"`).
	const TYPE_NAME: &'static str;

	/// Display name used for registry indexing. May be blank.
	fn name(&self) -> &str;
}

/// Builds the generated name used when an artifact has no usable name or its
/// name is already taken.
pub(crate) fn fallback_name(type_name: &str, count: usize) -> String {
	format!("{type_name}_{count}")
}

/// Returns true if a candidate name cannot be used as a registry key.
#[inline]
pub(crate) fn is_blank(name: &str) -> bool {
	name.trim().is_empty()
}
