use std::any::{Any, type_name};
use std::fmt;

use crate::Kind;

/// An object that can be recycled through a [`PoolRegistry`][crate::PoolRegistry].
///
/// Recycling an object means handing it back to the registry after use instead of dropping it.
/// The registry calls [`reset()`][Self::reset] before the object becomes available to the next
/// borrower, so the next borrower observes an object indistinguishable from a new one.
///
/// The kind of a poolable object is its concrete type. Each kind is pooled separately.
///
/// # Example
///
/// ```rust
/// use reuse_pool::Poolable;
///
/// #[derive(Default)]
/// struct Bullet {
///     x: f32,
///     y: f32,
///     hits: Vec<u32>,
/// }
///
/// impl Poolable for Bullet {
///     fn reset(&mut self) {
///         self.x = 0.0;
///         self.y = 0.0;
///         // Keeps the allocation of the vector for the next user.
///         self.hits.clear();
///     }
/// }
/// ```
pub trait Poolable: Any + Send + sealed::ConcreteTypeName {
    /// Restores the object to a blank state, as if it had just been constructed.
    ///
    /// Must be idempotent. The registry calls this exactly once every time the object is
    /// returned to it.
    fn reset(&mut self);
}

pub(crate) mod sealed {
    use super::{Any, type_name};

    /// Reports the name of the concrete type behind a trait object.
    ///
    /// Implemented for every sized type, so no poolable type can substitute its own answer.
    pub trait ConcreteTypeName {
        /// The [`type_name`] of the implementing type.
        fn concrete_type_name(&self) -> &'static str;
    }

    impl<T: Any> ConcreteTypeName for T {
        fn concrete_type_name(&self) -> &'static str {
            type_name::<T>()
        }
    }
}

impl fmt::Debug for dyn Poolable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("dyn Poolable")
            .field("kind", &Kind::of_val(self))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        value: u64,
    }

    impl Poolable for Counter {
        fn reset(&mut self) {
            self.value = 0;
        }
    }

    #[test]
    fn reset_is_idempotent() {
        let mut counter = Counter { value: 5 };

        counter.reset();
        counter.reset();

        assert_eq!(counter.value, 0);
    }

    #[test]
    fn kind_of_erased_object_is_concrete_type() {
        let boxed: Box<dyn Poolable> = Box::new(Counter::default());

        assert_eq!(Kind::of_val(&*boxed), Kind::of::<Counter>());
    }

    #[test]
    fn debug_names_concrete_type() {
        let boxed: Box<dyn Poolable> = Box::new(Counter::default());

        let output = format!("{boxed:?}");
        assert!(output.contains("Counter"), "unexpected output: {output}");
    }
}
