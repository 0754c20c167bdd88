//! Construct types under test with mocked constructor dependencies.
//!
//! Given a [`TypeDescriptor`] and a few hand-made collaborators, [`construct`]
//! builds the type through its constructor with the most parameters. Every
//! parameter takes the first supplied object assignable to it; parameters
//! nobody supplied are filled by a [`MockFactory`].
//!
//! ```text
//! let mut mocks = MockRegistry::new();
//! mocks.register(|| Rc::new(MockLedger::new()) as Rc<dyn Ledger>);
//!
//! let clock = Object::builder(FixedClock::at(0)).view(|rc| rc as Rc<dyn Clock>).build();
//! let billing: Billing = instantiate(&mocks, [clock])?;
//! ```
//!
//! Supplying an object that no parameter needs is an error
//! ([`InstantiateError::UnusedCandidate`]): it usually means the constructor
//! changed and the test kept wiring a dependency that is gone.
//!
//! # Modules
//!
//! - [`TypeKey`] / [`Object`]: runtime type tags and type-erased handles
//! - [`TypeDescriptor`] / [`ConstructorDescriptor`]: constructor tables
//! - [`MockFactory`] / [`MockRegistry`]: the mock collaborator
//! - [`Instantiator`]: constructor selection and parameter resolution

mod descriptor;
mod error;
mod instantiate;
mod mock;
mod object;
mod tracing_setup;
mod type_key;

pub use descriptor::{
    Arguments, Constructible, ConstructorDescriptor, TypeDescriptor, Visibility,
};
pub use error::{BoxError, ConstructError, InstantiateError};
pub use instantiate::{construct, instantiate, Instantiator};
pub use mock::{from_fn, FromFn, MockError, MockFactory, MockRegistry};
pub use object::{Object, ObjectBuilder};
pub use tracing_setup::init_tracing;
pub use type_key::TypeKey;
