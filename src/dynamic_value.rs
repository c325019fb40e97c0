//! Type-erased single-slot container for a task's return value.
//!
//! A [`Pool`](crate::Pool) is type-unaware end to end: it never knows what a
//! [`Task`](crate::Task) returns, only that it returns *something*. That
//! something is carried from the worker thread back to the submitter as a
//! [`DynamicValue`] — a move-only box holding exactly one value of an
//! erased concrete type, whose type is checked at retrieval rather than at
//! insertion.

use std::any::Any;
use std::fmt;

/// Error returned by [`DynamicValue::extract`] when the requested type does
/// not match the type of the value actually stored.
#[derive(Debug, thiserror::Error)]
#[error("type mismatch: value holds `{stored}`, extraction requested `{requested}`")]
pub struct TypeMismatch {
    stored: &'static str,
    requested: &'static str,
}

/// A move-only box holding a single value of an erased type.
///
/// Construct one with [`DynamicValue::new`], and consume it exactly once
/// with [`extract`](Self::extract). There is no way to inspect or clone a
/// `DynamicValue` without consuming it, matching the single-use lifecycle
/// described for task results: created on task completion, consumed once by
/// the submitter.
pub struct DynamicValue {
    inner: Box<dyn Any + Send>,
    type_name: &'static str,
}

impl DynamicValue {
    /// Erases `value`'s concrete type and takes ownership of it.
    pub fn new<T: Send + 'static>(value: T) -> Self {
        Self {
            inner: Box::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Returns an empty sentinel value.
    ///
    /// Used for rejected submissions and for tasks whose `run` panicked —
    /// in both cases there is no real result to hand back, so this holds
    /// unit, which fails [`extract`](Self::extract) for every `T` other than
    /// `()` and is therefore observably empty rather than silently wrong.
    pub fn empty() -> Self {
        Self::new(())
    }

    /// Consumes the container, returning the held value if its dynamic type
    /// matches `T`.
    ///
    /// # Errors
    ///
    /// Returns [`TypeMismatch`] if the stored value's type is not `T`. The
    /// container is consumed either way; there is no way to retry extraction
    /// with a different type after a failed attempt.
    pub fn extract<T: Send + 'static>(self) -> Result<T, TypeMismatch> {
        let stored = self.type_name;
        match self.inner.downcast::<T>() {
            Ok(boxed) => Ok(*boxed),
            Err(_) => Err(TypeMismatch {
                stored,
                requested: std::any::type_name::<T>(),
            }),
        }
    }
}

impl fmt::Debug for DynamicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicValue")
            .field("type_name", &self.type_name)
            .finish()
    }
}
