//! Runtime type tags.
//!
//! A `TypeKey` is the unit of assignability: constructor parameters are
//! declared as keys, and objects advertise the keys they can be used as.

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifies a (possibly unsized) `'static` type at runtime.
///
/// Equality and hashing use only the `TypeId`; the name is carried along for
/// diagnostics.
#[derive(Copy, Clone)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key for `T`. Works for trait objects: `TypeKey::of::<dyn Clock>()`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    #[inline]
    pub fn id(self) -> TypeId {
        self.id
    }

    /// Fully qualified type name, as reported by `std::any::type_name`.
    #[inline]
    pub fn name(self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn is<T: ?Sized + 'static>(self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeKey {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests;
