use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Shared reference to a committed artifact.
///
/// Equality and hashing use reference identity: two handles are equal only when
/// they point at the same allocation, regardless of the artifact's contents.
/// This is what registries deduplicate on.
pub struct Handle<T: ?Sized>(Arc<T>);

impl<T> Handle<T> {
	/// Wraps a freshly loaded artifact. The value is immutable from here on.
	pub fn new(value: T) -> Self {
		Self(Arc::new(value))
	}
}

impl<T: ?Sized> Handle<T> {
	/// Returns true if both handles refer to the same artifact.
	#[inline]
	pub fn ptr_eq(a: &Self, b: &Self) -> bool {
		Arc::ptr_eq(&a.0, &b.0)
	}

	/// Address used for identity hashing.
	#[inline]
	pub fn addr(&self) -> usize {
		Arc::as_ptr(&self.0) as *const () as usize
	}
}

impl<T: ?Sized> Clone for Handle<T> {
	fn clone(&self) -> Self {
		Self(Arc::clone(&self.0))
	}
}

impl<T: ?Sized> Deref for Handle<T> {
	type Target = T;

	fn deref(&self) -> &T {
		&self.0
	}
}

impl<T: ?Sized> PartialEq for Handle<T> {
	fn eq(&self, other: &Self) -> bool {
		Self::ptr_eq(self, other)
	}
}

impl<T: ?Sized> Eq for Handle<T> {}

impl<T: ?Sized> Hash for Handle<T> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.addr().hash(state);
	}
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Handle<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(&*self.0, f)
	}
}

impl<T> From<T> for Handle<T> {
	fn from(value: T) -> Self {
		Self::new(value)
	}
}
