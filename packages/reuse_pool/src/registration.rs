use std::any::type_name;
use std::fmt;

use crate::Limit;

/// Options for registering a kind with a [`PoolRegistry`][crate::PoolRegistry] or
/// [`SyncPoolRegistry`][crate::SyncPoolRegistry].
///
/// By default, nothing is preallocated, the queue is unbounded and new objects are created
/// via [`Default`].
///
/// # Examples
///
/// ```
/// use reuse_pool::{PoolRegistry, Poolable, Registration};
///
/// #[derive(Default)]
/// struct Spark {
///     brightness: f32,
/// }
///
/// impl Poolable for Spark {
///     fn reset(&mut self) {
///         self.brightness = 0.0;
///     }
/// }
///
/// let mut registry = PoolRegistry::new();
///
/// registry.register_with(Registration::<Spark>::new().preallocate(64).limit(256));
///
/// assert_eq!(registry.pooled_count::<Spark>().unwrap(), 64);
/// ```
///
/// Kinds without a [`Default`] implementation supply their own factory:
///
/// ```
/// use reuse_pool::{PoolRegistry, Poolable, Registration};
///
/// struct Frame {
///     pixels: Vec<u8>,
/// }
///
/// impl Poolable for Frame {
///     fn reset(&mut self) {
///         self.pixels.fill(0);
///     }
/// }
///
/// let mut registry = PoolRegistry::new();
///
/// registry.register_with(
///     Registration::with_factory(|| Frame {
///         pixels: vec![0; 640 * 480],
///     })
///     .preallocate(2),
/// );
///
/// let frame = registry.get::<Frame>().unwrap();
/// assert_eq!(frame.pixels.len(), 640 * 480);
/// ```
#[must_use]
pub struct Registration<T> {
    preallocate: usize,
    limit: Limit,
    factory: Box<dyn Fn() -> T + Send>,
}

impl<T: Default + 'static> Registration<T> {
    /// Creates registration options that construct new objects via [`Default`].
    pub fn new() -> Self {
        Self::with_factory(T::default)
    }
}

impl<T> Registration<T> {
    /// Creates registration options that construct new objects via the given factory.
    pub fn with_factory(factory: impl Fn() -> T + Send + 'static) -> Self {
        Self {
            preallocate: 0,
            limit: Limit::Unbounded,
            factory: Box::new(factory),
        }
    }

    /// Sets how many objects to construct up front when registering.
    ///
    /// If the queue has a limit lower than this, only as many objects as fit are constructed.
    pub fn preallocate(mut self, amount: usize) -> Self {
        self.preallocate = amount;
        self
    }

    /// Caps the queue at `max` idle objects. Objects returned while the queue is full are
    /// dropped instead of being retained.
    pub fn limit(mut self, max: usize) -> Self {
        self.limit = Limit::Bounded(max);
        self
    }

    /// Removes any cap on the number of idle objects in the queue. This is the default.
    pub fn unbounded(mut self) -> Self {
        self.limit = Limit::Unbounded;
        self
    }

    pub(crate) fn into_parts(self) -> (usize, Limit, Box<dyn Fn() -> T + Send>) {
        (self.preallocate, self.limit, self.factory)
    }
}

impl<T: Default + 'static> Default for Registration<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Registration<T> {
    #[cfg_attr(test, mutants::skip)] // No API contract.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("preallocate", &self.preallocate)
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}
