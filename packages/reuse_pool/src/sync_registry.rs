use std::sync::Arc;

use parking_lot::Mutex;

use crate::{Kind, Limit, PoolRegistry, Poolable, Registration, Result};

/// A thread-safe wrapper around [`PoolRegistry`].
///
/// Every operation takes one lock that guards the entire registry (the lookup of the kind as
/// well as the queue of every kind) and holds it until the operation completes. Operations
/// never observe each other half-done. The critical sections are short: a queue push or pop,
/// plus a bounded loop of constructions when registering or allocating.
///
/// This type acts as a cloneable handle to a shared registry. Multiple handles can exist
/// simultaneously and the registry remains alive as long as at least one handle exists.
///
/// Since a [`PoolRegistry`] is moved into the wrapper when converting, the unsynchronized and
/// synchronized operations can never be mixed on the same registry.
///
/// # Example
///
/// ```rust
/// use std::thread;
///
/// use reuse_pool::{Poolable, Registration, SyncPoolRegistry};
///
/// #[derive(Default)]
/// struct Packet {
///     payload: Vec<u8>,
/// }
///
/// impl Poolable for Packet {
///     fn reset(&mut self) {
///         self.payload.clear();
///     }
/// }
///
/// let registry = SyncPoolRegistry::new();
/// registry.register_with(Registration::<Packet>::new().preallocate(4).limit(16));
///
/// let registry_clone = registry.clone();
///
/// let handle = thread::spawn(move || {
///     let mut packet = registry_clone.get::<Packet>().unwrap();
///     packet.payload.extend_from_slice(b"hello");
///     registry_clone.recycle(packet).unwrap();
/// });
///
/// handle.join().unwrap();
///
/// assert_eq!(registry.pooled_count::<Packet>().unwrap(), 4);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SyncPoolRegistry {
    inner: Arc<Mutex<PoolRegistry>>,
}

impl From<PoolRegistry> for SyncPoolRegistry {
    /// Wraps an existing registry, including every kind already registered with it.
    ///
    /// # Example
    ///
    /// ```rust
    /// use reuse_pool::{PoolRegistry, Poolable, SyncPoolRegistry};
    ///
    /// #[derive(Default)]
    /// struct Chunk {
    ///     bytes: Vec<u8>,
    /// }
    ///
    /// impl Poolable for Chunk {
    ///     fn reset(&mut self) {
    ///         self.bytes.clear();
    ///     }
    /// }
    ///
    /// let mut registry = PoolRegistry::new();
    /// registry.register::<Chunk>();
    ///
    /// let registry = SyncPoolRegistry::from(registry);
    /// assert!(registry.is_registered::<Chunk>());
    /// ```
    fn from(registry: PoolRegistry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }
}

impl SyncPoolRegistry {
    /// Creates a registry with no registered kinds.
    #[must_use]
    pub fn new() -> Self {
        Self::from(PoolRegistry::new())
    }

    /// Registers `T` with default options. See [`PoolRegistry::register()`].
    pub fn register<T: Poolable + Default>(&self) {
        self.inner.lock().register::<T>();
    }

    /// Registers `T` with the given options. See [`PoolRegistry::register_with()`].
    ///
    /// Preallocation happens while the lock is held.
    pub fn register_with<T: Poolable>(&self, registration: Registration<T>) {
        self.inner.lock().register_with(registration);
    }

    /// Adds up to `amount` new objects to the queue of `T`. See [`PoolRegistry::allocate()`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnregisteredKind`][crate::Error::UnregisteredKind] if `T` has not been
    /// registered.
    pub fn allocate<T: Poolable>(&self, amount: usize) -> Result<usize> {
        self.inner.lock().allocate::<T>(amount)
    }

    /// Borrows an object of kind `T`. See [`PoolRegistry::get()`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnregisteredKind`][crate::Error::UnregisteredKind] if `T` has not been
    /// registered.
    pub fn get<T: Poolable>(&self) -> Result<T> {
        self.inner.lock().get::<T>()
    }

    /// Borrows an object of the same concrete kind as `sample`.
    /// See [`PoolRegistry::get_of_same_type()`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnregisteredKind`][crate::Error::UnregisteredKind] if the concrete kind
    /// of `sample` has not been registered.
    pub fn get_of_same_type(&self, sample: &dyn Poolable) -> Result<Box<dyn Poolable>> {
        self.inner.lock().get_of_same_type(sample)
    }

    /// Resets `item` and returns it to the queue of its kind. See [`PoolRegistry::recycle()`].
    ///
    /// The reset happens while the lock is held.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnregisteredKind`][crate::Error::UnregisteredKind] if `T` has not been
    /// registered.
    pub fn recycle<T: Poolable>(&self, item: T) -> Result<()> {
        self.inner.lock().recycle(item)
    }

    /// Resets an erased `item` and returns it to the queue of its concrete kind.
    /// See [`PoolRegistry::recycle_boxed()`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnregisteredKind`][crate::Error::UnregisteredKind] if the concrete kind
    /// of `item` has not been registered.
    pub fn recycle_boxed(&self, item: Box<dyn Poolable>) -> Result<()> {
        self.inner.lock().recycle_boxed(item)
    }

    /// Whether `T` has been registered.
    #[must_use]
    pub fn is_registered<T: Poolable>(&self) -> bool {
        self.inner.lock().is_registered::<T>()
    }

    /// Whether a kind has been registered.
    #[must_use]
    pub fn is_kind_registered(&self, kind: Kind) -> bool {
        self.inner.lock().is_kind_registered(kind)
    }

    /// The number of idle objects of kind `T` waiting in the registry.
    ///
    /// The value may be outdated by the time it is returned if other threads are using the
    /// registry concurrently.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnregisteredKind`][crate::Error::UnregisteredKind] if `T` has not been
    /// registered.
    pub fn pooled_count<T: Poolable>(&self) -> Result<usize> {
        self.inner.lock().pooled_count::<T>()
    }

    /// The limit that `T` was registered with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnregisteredKind`][crate::Error::UnregisteredKind] if `T` has not been
    /// registered.
    pub fn limit<T: Poolable>(&self) -> Result<Limit> {
        self.inner.lock().limit::<T>()
    }

    /// The number of registered kinds.
    #[must_use]
    pub fn kind_count(&self) -> usize {
        self.inner.lock().kind_count()
    }
}
