//! Constructor registration tables.
//!
//! Rust has no runtime reflection over constructors, so a type under test
//! describes its constructors once, either ad hoc with [`TypeDescriptor`] or
//! through the [`Constructible`] trait:
//!
//! ```text
//! impl Constructible for Billing {
//!     fn descriptor() -> TypeDescriptor<Self> {
//!         TypeDescriptor::new()
//!             .with(vec![], |_| Ok(Billing::offline()))
//!             .with(
//!                 vec![TypeKey::of::<dyn Ledger>(), TypeKey::of::<dyn Clock>()],
//!                 |args| Ok(Billing::new(args.take()?, args.take()?)),
//!             )
//!     }
//! }
//! ```
//!
//! Every declared constructor is a selection candidate. [`Visibility`] is
//! recorded for diagnostics only; instantiation never refuses a constructor
//! because it is private.

use std::fmt;
use std::rc::Rc;

use crate::{ConstructError, Object, TypeKey};

/// Declared visibility of a constructor.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    #[default]
    Public,
    /// Visible inside the defining crate only.
    Crate,
    Private,
}

type Invoke<T> = Box<dyn Fn(&mut Arguments) -> Result<T, ConstructError>>;

/// One declared constructor of `T`.
pub struct ConstructorDescriptor<T> {
    params: Vec<TypeKey>,
    visibility: Visibility,
    invoke: Invoke<T>,
}

impl<T> ConstructorDescriptor<T> {
    /// A public constructor taking `params`, in order.
    pub fn new(
        params: impl IntoIterator<Item = TypeKey>,
        invoke: impl Fn(&mut Arguments) -> Result<T, ConstructError> + 'static,
    ) -> Self {
        Self {
            params: params.into_iter().collect(),
            visibility: Visibility::Public,
            invoke: Box::new(invoke),
        }
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Formal parameter types, in declaration order.
    #[inline]
    pub fn params(&self) -> &[TypeKey] {
        &self.params
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Run the constructor body with `args`.
    ///
    /// The argument count must equal [`arity`](Self::arity); argument types
    /// are checked lazily as the body reads them.
    pub fn invoke(&self, mut args: Arguments) -> Result<T, ConstructError> {
        if args.len() != self.arity() {
            return Err(ConstructError::ArityMismatch {
                expected: self.arity(),
                found: args.len(),
            });
        }
        (self.invoke)(&mut args)
    }
}

impl<T> fmt::Debug for ConstructorDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("params", &self.params)
            .field("visibility", &self.visibility)
            .finish_non_exhaustive()
    }
}

/// The constructors of a type, as seen by the instantiator.
pub struct TypeDescriptor<T> {
    name: &'static str,
    constructors: Vec<ConstructorDescriptor<T>>,
}

impl<T: 'static> TypeDescriptor<T> {
    /// An empty descriptor named after `T`.
    pub fn new() -> Self {
        Self::named(std::any::type_name::<T>())
    }
}

impl<T: 'static> Default for TypeDescriptor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TypeDescriptor<T> {
    /// An empty descriptor with an explicit display name.
    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            constructors: Vec::new(),
        }
    }

    /// Add a constructor.
    #[must_use]
    pub fn constructor(mut self, constructor: ConstructorDescriptor<T>) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Add a public constructor; shorthand for
    /// `constructor(ConstructorDescriptor::new(params, invoke))`.
    #[must_use]
    pub fn with(
        self,
        params: impl IntoIterator<Item = TypeKey>,
        invoke: impl Fn(&mut Arguments) -> Result<T, ConstructError> + 'static,
    ) -> Self {
        self.constructor(ConstructorDescriptor::new(params, invoke))
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn constructors(&self) -> &[ConstructorDescriptor<T>] {
        &self.constructors
    }

    /// `true` when no constructor is declared.
    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl<T> fmt::Debug for TypeDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("constructors", &self.constructors)
            .finish()
    }
}

/// Types that publish their own constructor table.
pub trait Constructible: Sized + 'static {
    fn descriptor() -> TypeDescriptor<Self>;
}

/// Resolved constructor arguments, one per formal parameter, in order.
#[derive(Clone, Debug, Default)]
pub struct Arguments {
    values: Vec<Object>,
    cursor: usize,
}

impl Arguments {
    pub fn new(values: Vec<Object>) -> Self {
        Self { values, cursor: 0 }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The raw argument at `index`.
    pub fn object(&self, index: usize) -> Option<&Object> {
        self.values.get(index)
    }

    /// The argument at `index`, as `Rc<U>`.
    pub fn get<U: ?Sized + 'static>(&self, index: usize) -> Result<Rc<U>, ConstructError> {
        let object = self
            .values
            .get(index)
            .ok_or(ConstructError::MissingArgument { index })?;
        object
            .downcast::<U>()
            .ok_or_else(|| ConstructError::ArgumentMismatch {
                index,
                expected: TypeKey::of::<U>(),
                found: object.runtime_type(),
            })
    }

    /// The next unread argument, as `Rc<U>`.
    ///
    /// Reads arguments front to back, so a constructor body can mirror its
    /// parameter list: `Service::new(args.take()?, args.take()?)`.
    pub fn take<U: ?Sized + 'static>(&mut self) -> Result<Rc<U>, ConstructError> {
        let value = self.get::<U>(self.cursor)?;
        self.cursor += 1;
        Ok(value)
    }
}

#[cfg(test)]
mod tests;
