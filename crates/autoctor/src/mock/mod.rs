//! Mock factory collaborator.
//!
//! The instantiator never fabricates stand-ins itself; it asks a
//! [`MockFactory`] for one whenever no candidate fits a parameter.
//! [`MockRegistry`] is a table-driven factory that works well with generated
//! mocks (`mockall`) or plain `Default` stubs.

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{Object, TypeKey};

/// Produces stand-in objects for constructor parameters.
///
/// The returned object must be assignable to `ty`. Each call should return a
/// fresh instance; the instantiator relies on mocks not being shared with
/// anything the caller holds.
pub trait MockFactory {
    fn create_mock(&self, ty: TypeKey) -> Result<Object, MockError>;
}

/// Why a mock could not be produced.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MockError {
    /// The factory does not know how to mock `ty`.
    #[error("no mock registered for `{ty}`")]
    Unregistered { ty: TypeKey },

    /// The factory returned an object that is not assignable to the requested
    /// type.
    #[error("mock produced for `{expected}` is a `{found}`")]
    WrongType { expected: TypeKey, found: TypeKey },
}

impl<F: MockFactory + ?Sized> MockFactory for &F {
    fn create_mock(&self, ty: TypeKey) -> Result<Object, MockError> {
        (**self).create_mock(ty)
    }
}

impl<F: MockFactory + ?Sized> MockFactory for Box<F> {
    fn create_mock(&self, ty: TypeKey) -> Result<Object, MockError> {
        (**self).create_mock(ty)
    }
}

impl<F: MockFactory + ?Sized> MockFactory for Rc<F> {
    fn create_mock(&self, ty: TypeKey) -> Result<Object, MockError> {
        (**self).create_mock(ty)
    }
}

/// A factory backed by a closure. See [`from_fn`].
#[derive(Clone)]
pub struct FromFn<F>(F);

/// Build a [`MockFactory`] from a closure.
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: Fn(TypeKey) -> Result<Object, MockError>,
{
    FromFn(f)
}

impl<F> MockFactory for FromFn<F>
where
    F: Fn(TypeKey) -> Result<Object, MockError>,
{
    fn create_mock(&self, ty: TypeKey) -> Result<Object, MockError> {
        (self.0)(ty)
    }
}

impl<F> fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromFn").finish_non_exhaustive()
    }
}

type MakeMock = Box<dyn Fn() -> Object>;

/// Table of mock constructors keyed by the type they stand in for.
#[derive(Default)]
pub struct MockRegistry {
    makers: FxHashMap<TypeKey, MakeMock>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock `U` with whatever `make` returns.
    ///
    /// `U` is typically a trait object:
    /// `registry.register(|| Rc::new(MockClock::new()) as Rc<dyn Clock>)`.
    pub fn register<U: ?Sized + 'static>(
        &mut self,
        make: impl Fn() -> Rc<U> + 'static,
    ) -> &mut Self {
        self.register_object(TypeKey::of::<U>(), move || Object::from_rc(make()))
    }

    /// Mock `U` with a fresh `U::default()`.
    pub fn register_default<U: Default + 'static>(&mut self) -> &mut Self {
        self.register::<U>(|| Rc::new(U::default()))
    }

    /// Mock `ty` with a pre-erased object. Replaces any earlier entry.
    pub fn register_object(
        &mut self,
        ty: TypeKey,
        make: impl Fn() -> Object + 'static,
    ) -> &mut Self {
        if self.makers.insert(ty, Box::new(make)).is_some() {
            tracing::trace!(%ty, "replaced mock registration");
        }
        self
    }

    pub fn contains(&self, ty: TypeKey) -> bool {
        self.makers.contains_key(&ty)
    }

    pub fn len(&self) -> usize {
        self.makers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.makers.is_empty()
    }
}

impl MockFactory for MockRegistry {
    fn create_mock(&self, ty: TypeKey) -> Result<Object, MockError> {
        let make = self.makers.get(&ty).ok_or(MockError::Unregistered { ty })?;
        Ok(make())
    }
}

impl fmt::Debug for MockRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<&'static str> = self.makers.keys().map(|key| key.name()).collect();
        types.sort_unstable();
        f.debug_struct("MockRegistry").field("types", &types).finish()
    }
}
