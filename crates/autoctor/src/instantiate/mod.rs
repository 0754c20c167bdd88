//! Instance construction with mocked dependencies.
//!
//! # Algorithm
//!
//! 1. Pick the constructor with the most parameters. Constructors tied for
//!    the largest arity are chosen between at random, so tests cannot start
//!    depending on declaration order.
//! 2. For each parameter, in order, use the first candidate assignable to it.
//!    One candidate may fill several parameters.
//! 3. Fail if any candidate filled no parameter at all.
//! 4. Ask the mock factory for every parameter still open.
//! 5. Invoke the constructor, whatever its visibility. Errors and panics
//!    raised by the body are reported as `ConstructionFailed`.
//!
//! No state survives a call.

use std::any::Any;
use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;
use std::panic::{self, AssertUnwindSafe};

use crate::{
    Arguments, ConstructError, Constructible, ConstructorDescriptor, InstantiateError,
    MockError, MockFactory, Object, TypeDescriptor, TypeKey,
};

/// Builds instances, filling unmatched parameters from a [`MockFactory`].
#[derive(Debug)]
pub struct Instantiator<'f, F: MockFactory + ?Sized> {
    mocks: &'f F,
}

impl<'f, F: MockFactory + ?Sized> Instantiator<'f, F> {
    pub fn new(mocks: &'f F) -> Self {
        Self { mocks }
    }

    /// Build a `T` through its biggest constructor.
    ///
    /// Each parameter receives the first of `candidates` assignable to it, or
    /// a mock when none is. Every candidate must end up used.
    #[tracing::instrument(level = "debug", skip_all, fields(ty = ty.name()))]
    pub fn construct<T>(
        &self,
        ty: &TypeDescriptor<T>,
        candidates: impl IntoIterator<Item = Object>,
    ) -> Result<T, InstantiateError> {
        let candidates: Vec<Object> = candidates.into_iter().collect();
        let ctor = select_constructor(ty)?;
        tracing::trace!(
            arity = ctor.arity(),
            visibility = ?ctor.visibility(),
            "selected constructor"
        );

        let matched = match_candidates(ctor.params(), &candidates);
        check_all_used(&matched, &candidates)?;

        let failed = |source: ConstructError| {
            tracing::debug!(error = %source, "construction failed");
            InstantiateError::ConstructionFailed {
                ty: ty.name(),
                source,
            }
        };

        let mut args = Vec::with_capacity(ctor.arity());
        for (&param, found) in ctor.params().iter().zip(matched) {
            let arg = match found {
                Some(pos) => candidates[pos].clone(),
                None => self.mock(param).map_err(|err| failed(err.into()))?,
            };
            args.push(arg);
        }

        invoke(ctor, Arguments::new(args)).map_err(failed)
    }

    fn mock(&self, param: TypeKey) -> Result<Object, MockError> {
        let mock = self.mocks.create_mock(param)?;
        if !mock.is_assignable_to(param) {
            return Err(MockError::WrongType {
                expected: param,
                found: mock.runtime_type(),
            });
        }
        tracing::trace!(%param, "mocked");
        Ok(mock)
    }
}

/// Build a `T` from `ty`, mocking whatever `candidates` do not cover.
///
/// Shorthand for `Instantiator::new(mocks).construct(ty, candidates)`.
pub fn construct<T, F: MockFactory + ?Sized>(
    mocks: &F,
    ty: &TypeDescriptor<T>,
    candidates: impl IntoIterator<Item = Object>,
) -> Result<T, InstantiateError> {
    Instantiator::new(mocks).construct(ty, candidates)
}

/// Build a [`Constructible`] type.
pub fn instantiate<T: Constructible, F: MockFactory + ?Sized>(
    mocks: &F,
    candidates: impl IntoIterator<Item = Object>,
) -> Result<T, InstantiateError> {
    construct(mocks, &T::descriptor(), candidates)
}

fn select_constructor<T>(
    ty: &TypeDescriptor<T>,
) -> Result<&ConstructorDescriptor<T>, InstantiateError> {
    let ctors = ty.constructors();
    let Some(max) = ctors.iter().map(ConstructorDescriptor::arity).max() else {
        tracing::debug!("no constructor declared");
        return Err(InstantiateError::NoAccessibleConstructor { ty: ty.name() });
    };

    let mut tied: Vec<&ConstructorDescriptor<T>> =
        ctors.iter().filter(|ctor| ctor.arity() == max).collect();
    let pick = tie_break(tied.len());
    Ok(tied.swap_remove(pick))
}

/// Random index below `len`. Fresh hasher keys every call.
fn tie_break(len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let roll = RandomState::new().hash_one(len);
    let len64 = u64::try_from(len).unwrap_or(u64::MAX);
    usize::try_from(roll % len64).unwrap_or(0)
}

/// For each parameter, the position of the first assignable candidate.
fn match_candidates(params: &[TypeKey], candidates: &[Object]) -> Vec<Option<usize>> {
    params
        .iter()
        .enumerate()
        .map(|(index, &param)| {
            let pos = candidates
                .iter()
                .position(|candidate| candidate.is_assignable_to(param));
            if let Some(pos) = pos {
                tracing::trace!(index, %param, candidate = pos, "matched candidate");
            }
            pos
        })
        .collect()
}

fn check_all_used(
    matched: &[Option<usize>],
    candidates: &[Object],
) -> Result<(), InstantiateError> {
    let mut used = vec![false; candidates.len()];
    for &pos in matched.iter().flatten() {
        used[pos] = true;
    }

    let mut unused = candidates
        .iter()
        .zip(&used)
        .filter_map(|(candidate, &is_used)| (!is_used).then_some(candidate));
    let Some(first) = unused.next() else {
        return Ok(());
    };
    let count = 1 + unused.count();
    tracing::debug!(ty = %first.runtime_type(), count, "unused candidates");
    Err(InstantiateError::UnusedCandidate {
        ty: first.runtime_type(),
        unused: count,
    })
}

fn invoke<T>(ctor: &ConstructorDescriptor<T>, args: Arguments) -> Result<T, ConstructError> {
    match panic::catch_unwind(AssertUnwindSafe(|| ctor.invoke(args))) {
        Ok(result) => result,
        Err(payload) => Err(ConstructError::Panicked {
            message: panic_message(&*payload),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
