use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::Poolable;
use crate::poolable::sealed::ConcreteTypeName as _;

/// Identifies which queue of a registry an object belongs to.
///
/// A kind is the concrete type of a pooled object. Two kinds are equal if and only if they
/// describe the same type. The type name is carried along only for diagnostics and does not
/// participate in equality or hashing.
///
/// # Example
///
/// ```rust
/// use reuse_pool::{Kind, Poolable};
///
/// #[derive(Default)]
/// struct Particle {
///     age: u32,
/// }
///
/// impl Poolable for Particle {
///     fn reset(&mut self) {
///         self.age = 0;
///     }
/// }
///
/// let particle = Particle::default();
/// let erased: &dyn Poolable = &particle;
///
/// // The runtime kind of an erased reference matches the static kind of its type.
/// assert_eq!(Kind::of_val(erased), Kind::of::<Particle>());
/// assert_ne!(Kind::of::<Particle>(), Kind::of::<String>());
/// ```
#[derive(Clone, Copy)]
pub struct Kind {
    type_id: TypeId,
    name: &'static str,
}

impl Kind {
    /// Returns the kind of the type `T`.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Returns the kind of the concrete type behind an erased poolable reference.
    #[must_use]
    pub fn of_val(value: &dyn Poolable) -> Self {
        let name = value.concrete_type_name();
        let value: &dyn Any = value;

        Self {
            type_id: <dyn Any>::type_id(value),
            name,
        }
    }

    /// The name of the type, for display purposes only.
    ///
    /// The exact contents are not stable across compiler versions, see [`type_name`].
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn type_id(&self) -> TypeId {
        self.type_id
    }
}

impl PartialEq for Kind {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for Kind {}

impl Hash for Kind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Kind").field(&self.name).finish()
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
