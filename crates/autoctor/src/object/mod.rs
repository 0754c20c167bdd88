//! Type-erased, shared handles to candidate and mock objects.
//!
//! An [`Object`] remembers the concrete type it was built from plus any number
//! of *views*: other types the same allocation may be handed out as. A view is
//! usually a trait object (`Rc<dyn Clock>` for an `Rc<SystemClock>`), which is
//! how "assignable to a supertype" is expressed without runtime reflection.
//!
//! # Identity
//!
//! Cloning an `Object` never clones the value. Every view points at the same
//! allocation, so [`Object::ptr_eq`] and [`Object::refers_to`] answer
//! "is this the very instance I supplied".

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::TypeKey;

/// View table: `TypeKey::of::<U>()` → boxed `Rc<U>`.
type ViewMap = FxHashMap<TypeKey, Box<dyn Any>>;

/// A reference-counted handle to a value of some `'static` type.
#[derive(Clone)]
pub struct Object {
    runtime: TypeKey,
    /// Address of the shared allocation, for identity checks only.
    addr: *const (),
    views: Rc<ViewMap>,
}

impl Object {
    /// Wrap `value` with no views beyond its own type.
    pub fn new<T: 'static>(value: T) -> Self {
        ObjectBuilder::new(value).build()
    }

    /// Wrap an existing `Rc`, keeping its identity.
    ///
    /// `T` may be unsized; `Object::from_rc(mock as Rc<dyn Clock>)` yields an
    /// object whose runtime type is `dyn Clock`.
    pub fn from_rc<T: ?Sized + 'static>(rc: Rc<T>) -> Self {
        ObjectBuilder::from_rc(rc).build()
    }

    /// Start building an object that can be used as additional types.
    pub fn builder<T: 'static>(value: T) -> ObjectBuilder<T> {
        ObjectBuilder::new(value)
    }

    /// The type the object was built from.
    #[inline]
    pub fn runtime_type(&self) -> TypeKey {
        self.runtime
    }

    /// Whether the object can be passed where `ty` is expected.
    #[inline]
    pub fn is_assignable_to(&self, ty: TypeKey) -> bool {
        self.views.contains_key(&ty)
    }

    /// Retrieve the object as `Rc<U>` if `U` is its runtime type or a view.
    pub fn downcast<U: ?Sized + 'static>(&self) -> Option<Rc<U>> {
        let view: &dyn Any = &**self.views.get(&TypeKey::of::<U>())?;
        view.downcast_ref::<Rc<U>>().cloned()
    }

    /// All types this object is assignable to, runtime type included.
    pub fn views(&self) -> impl Iterator<Item = TypeKey> + '_ {
        self.views.keys().copied()
    }

    /// Whether both handles point at the same instance.
    #[inline]
    pub fn ptr_eq(&self, other: &Object) -> bool {
        std::ptr::addr_eq(self.addr, other.addr)
    }

    /// Whether `rc` points at this object's instance, through any view.
    #[inline]
    pub fn refers_to<U: ?Sized>(&self, rc: &Rc<U>) -> bool {
        std::ptr::addr_eq(self.addr, Rc::as_ptr(rc))
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut views: Vec<&'static str> = self
            .views
            .keys()
            .filter(|key| **key != self.runtime)
            .map(|key| key.name())
            .collect();
        views.sort_unstable();
        f.debug_struct("Object")
            .field("runtime", &self.runtime.name())
            .field("views", &views)
            .finish()
    }
}

/// Builder for an [`Object`] with extra views.
///
/// ```text
/// let clock = Object::builder(SystemClock::default())
///     .view(|rc| rc as Rc<dyn Clock>)
///     .build();
/// ```
pub struct ObjectBuilder<T: ?Sized + 'static> {
    rc: Rc<T>,
    views: ViewMap,
}

impl<T: 'static> ObjectBuilder<T> {
    pub fn new(value: T) -> Self {
        Self::from_rc(Rc::new(value))
    }
}

impl<T: ?Sized + 'static> ObjectBuilder<T> {
    pub fn from_rc(rc: Rc<T>) -> Self {
        let mut views = ViewMap::default();
        views.insert(TypeKey::of::<T>(), Box::new(Rc::clone(&rc)));
        Self { rc, views }
    }

    /// Make the object assignable to `U`.
    ///
    /// `upcast` must return the same allocation it was given (an unsizing
    /// coercion such as `|rc| rc as Rc<dyn Trait>`), otherwise identity checks
    /// against the built object will not match values taken through this view.
    #[must_use]
    pub fn view<U: ?Sized + 'static>(mut self, upcast: impl FnOnce(Rc<T>) -> Rc<U>) -> Self {
        let view = upcast(Rc::clone(&self.rc));
        debug_assert!(
            std::ptr::addr_eq(Rc::as_ptr(&view), Rc::as_ptr(&self.rc)),
            "view `{}` of `{}` points at a different allocation",
            std::any::type_name::<U>(),
            std::any::type_name::<T>(),
        );
        self.views.insert(TypeKey::of::<U>(), Box::new(view));
        self
    }

    pub fn build(self) -> Object {
        Object {
            runtime: TypeKey::of::<T>(),
            addr: Rc::as_ptr(&self.rc).cast::<()>(),
            views: Rc::new(self.views),
        }
    }
}
