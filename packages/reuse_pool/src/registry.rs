use std::any::{Any, TypeId};
use std::fmt;

use hash_hasher::HashedMap;
use tracing::{debug, trace};

use crate::{BoundedQueue, Error, Kind, Limit, Poolable, Registration, Result};

/// Recycles objects of any number of registered kinds, one bounded queue per kind.
///
/// A kind is registered once, after which objects of that kind can be borrowed with
/// [`get()`][Self::get] and handed back with [`recycle()`][Self::recycle]. Borrowing from an
/// empty queue constructs a new object with the factory given at registration. Recycling
/// resets the object and retains it for the next borrower, unless the queue is at its limit,
/// in which case the object is dropped.
///
/// Operating on a kind that was never registered fails with [`Error::UnregisteredKind`] and
/// leaves the registry untouched.
///
/// # Example
///
/// ```rust
/// use reuse_pool::{PoolRegistry, Poolable, Registration};
///
/// #[derive(Default)]
/// struct Enemy {
///     health: u32,
///     path: Vec<(i32, i32)>,
/// }
///
/// impl Poolable for Enemy {
///     fn reset(&mut self) {
///         self.health = 0;
///         self.path.clear();
///     }
/// }
///
/// let mut registry = PoolRegistry::new();
/// registry.register_with(Registration::<Enemy>::new().preallocate(8).limit(32));
///
/// let mut enemy = registry.get::<Enemy>().unwrap();
/// enemy.health = 100;
/// enemy.path.push((1, 2));
///
/// registry.recycle(enemy).unwrap();
///
/// // The next borrower receives a blank object.
/// let enemy = registry.get::<Enemy>().unwrap();
/// assert_eq!(enemy.health, 0);
/// assert!(enemy.path.is_empty());
/// ```
///
/// # Thread safety
///
/// This type is thread-mobile ([`Send`]) and all operations that modify it require exclusive
/// access. To share one registry between threads, convert it into a
/// [`SyncPoolRegistry`][crate::SyncPoolRegistry], which guards every operation with a lock.
#[derive(Debug, Default)]
pub struct PoolRegistry {
    // TypeId is already a hash, so the pass-through hasher avoids hashing it a second time.
    queues: HashedMap<TypeId, Box<dyn ErasedQueue>>,
}

impl PoolRegistry {
    /// Creates a registry with no registered kinds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` with default options: nothing preallocated, no limit, new objects
    /// constructed via [`Default`].
    ///
    /// Registering a kind that is already registered replaces its queue. Objects held by the
    /// previous queue are dropped.
    pub fn register<T: Poolable + Default>(&mut self) {
        self.register_with(Registration::<T>::new());
    }

    /// Registers `T` with the given options.
    ///
    /// The new queue is immediately filled with as many new objects as requested via
    /// [`Registration::preallocate()`], up to its limit.
    ///
    /// Registering a kind that is already registered replaces its queue. Objects held by the
    /// previous queue are dropped.
    pub fn register_with<T: Poolable>(&mut self, registration: Registration<T>) {
        let (preallocate, limit, factory) = registration.into_parts();

        let mut queue = BoundedQueue::from_boxed_factory(limit, factory);
        let preallocated = top_up(&mut queue, preallocate);

        let replaced = self
            .queues
            .insert(TypeId::of::<T>(), Box::new(queue))
            .is_some();

        debug!(
            kind = %Kind::of::<T>(),
            preallocated,
            ?limit,
            replaced,
            "registered poolable kind"
        );
    }

    /// Adds up to `amount` new objects to the queue of `T`, stopping early if the queue reaches
    /// its limit.
    ///
    /// Returns the number of objects that were added.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnregisteredKind`] if `T` has not been registered.
    pub fn allocate<T: Poolable>(&mut self, amount: usize) -> Result<usize> {
        let queue = self.queue_mut::<T>()?;
        Ok(top_up(queue, amount))
    }

    /// Borrows an object of kind `T`.
    ///
    /// This is the earliest recycled object still in the queue or, if the queue is empty,
    /// a new object from the factory given at registration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnregisteredKind`] if `T` has not been registered.
    pub fn get<T: Poolable>(&mut self) -> Result<T> {
        let queue = self.queue_mut::<T>()?;
        Ok(take_or_create(queue))
    }

    /// Borrows an object of the same concrete kind as `sample`.
    ///
    /// This is for callers that only hold an erased `dyn Poolable` and need another object like
    /// it. The queue is drained first, same as [`get()`][Self::get], and the factory is only
    /// used when the queue is empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnregisteredKind`] if the concrete kind of `sample` has not been
    /// registered.
    ///
    /// # Example
    ///
    /// ```rust
    /// use reuse_pool::{Kind, PoolRegistry, Poolable};
    ///
    /// #[derive(Default)]
    /// struct Smoke;
    ///
    /// impl Poolable for Smoke {
    ///     fn reset(&mut self) {}
    /// }
    ///
    /// let mut registry = PoolRegistry::new();
    /// registry.register::<Smoke>();
    ///
    /// let sample: Box<dyn Poolable> = Box::new(Smoke);
    /// let another = registry.get_of_same_type(&*sample).unwrap();
    ///
    /// assert_eq!(Kind::of_val(&*another), Kind::of::<Smoke>());
    /// ```
    pub fn get_of_same_type(&mut self, sample: &dyn Poolable) -> Result<Box<dyn Poolable>> {
        let queue = self.erased_queue_mut(Kind::of_val(sample))?;
        Ok(queue.take_or_create_boxed())
    }

    /// Resets `item` and returns it to the queue of its kind.
    ///
    /// If the queue is at its limit, the item is dropped after being reset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnregisteredKind`] if `T` has not been registered. The item is dropped
    /// without being reset.
    pub fn recycle<T: Poolable>(&mut self, mut item: T) -> Result<()> {
        let queue = self.queue_mut::<T>()?;

        item.reset();
        retain(queue, item);

        Ok(())
    }

    /// Resets an erased `item` and returns it to the queue of its concrete kind.
    ///
    /// This is the counterpart of [`get_of_same_type()`][Self::get_of_same_type].
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnregisteredKind`] if the concrete kind of `item` has not been
    /// registered. The item is dropped without being reset.
    pub fn recycle_boxed(&mut self, item: Box<dyn Poolable>) -> Result<()> {
        let queue = self.erased_queue_mut(Kind::of_val(&*item))?;
        queue.recycle_boxed(item);
        Ok(())
    }

    /// Whether `T` has been registered.
    #[must_use]
    pub fn is_registered<T: Poolable>(&self) -> bool {
        self.is_kind_registered(Kind::of::<T>())
    }

    /// Whether a kind has been registered.
    #[must_use]
    pub fn is_kind_registered(&self, kind: Kind) -> bool {
        self.queues.contains_key(&kind.type_id())
    }

    /// The number of idle objects of kind `T` waiting in the registry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnregisteredKind`] if `T` has not been registered.
    pub fn pooled_count<T: Poolable>(&self) -> Result<usize> {
        Ok(self.erased_queue(Kind::of::<T>())?.len())
    }

    /// The limit that `T` was registered with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnregisteredKind`] if `T` has not been registered.
    pub fn limit<T: Poolable>(&self) -> Result<Limit> {
        Ok(self.erased_queue(Kind::of::<T>())?.limit())
    }

    /// The number of registered kinds.
    #[must_use]
    pub fn kind_count(&self) -> usize {
        self.queues.len()
    }

    fn queue_mut<T: Poolable>(&mut self) -> Result<&mut BoundedQueue<T>> {
        let queue: &mut (dyn Any + 'static) = self.erased_queue_mut(Kind::of::<T>())?;

        Ok(queue
            .downcast_mut::<BoundedQueue<T>>()
            .expect("guarded by TypeId"))
    }

    fn erased_queue_mut(&mut self, kind: Kind) -> Result<&mut (dyn ErasedQueue + 'static)> {
        self.queues
            .get_mut(&kind.type_id())
            .map(|queue| &mut **queue)
            .ok_or_else(|| Error::unregistered(kind))
    }

    fn erased_queue(&self, kind: Kind) -> Result<&(dyn ErasedQueue + 'static)> {
        self.queues
            .get(&kind.type_id())
            .map(|queue| &**queue)
            .ok_or_else(|| Error::unregistered(kind))
    }
}

/// Fills the queue with up to `amount` new objects without exceeding its limit.
fn top_up<T>(queue: &mut BoundedQueue<T>, amount: usize) -> usize {
    let count = queue
        .headroom()
        .map_or(amount, |headroom| headroom.min(amount));

    for _ in 0..count {
        let item = queue.create();
        queue.enqueue(item);
    }

    count
}

fn take_or_create<T: Poolable>(queue: &mut BoundedQueue<T>) -> T {
    queue.dequeue().unwrap_or_else(|| {
        trace!(kind = %Kind::of::<T>(), "queue empty, constructing new object");
        queue.create()
    })
}

fn retain<T: Poolable>(queue: &mut BoundedQueue<T>, item: T) {
    if !queue.enqueue(item) {
        trace!(kind = %Kind::of::<T>(), "queue full, dropping recycled object");
    }
}

/// A bounded queue for which we no longer know the item type.
///
/// We downcast from this to a specific `BoundedQueue<T>` when the caller names the type and
/// otherwise go through the boxed operations, which are selected by the runtime kind.
trait ErasedQueue: Any + fmt::Debug + Send {
    fn len(&self) -> usize;

    fn limit(&self) -> Limit;

    fn take_or_create_boxed(&mut self) -> Box<dyn Poolable>;

    fn recycle_boxed(&mut self, item: Box<dyn Poolable>);
}

impl<T: Poolable> ErasedQueue for BoundedQueue<T> {
    fn len(&self) -> usize {
        Self::len(self)
    }

    fn limit(&self) -> Limit {
        Self::limit(self)
    }

    fn take_or_create_boxed(&mut self) -> Box<dyn Poolable> {
        Box::new(take_or_create(self))
    }

    fn recycle_boxed(&mut self, mut item: Box<dyn Poolable>) {
        item.reset();

        let item: Box<dyn Any> = item;
        let item = item.downcast::<T>().expect("guarded by TypeId");

        retain(self, *item);
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::cell::Cell;

    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::*;

    assert_impl_all!(PoolRegistry: Send, Default);
    assert_not_impl_any!(PoolRegistry: Sync);

    #[derive(Debug, Default)]
    struct Token {
        id: u32,
        resets: u32,
    }

    impl Poolable for Token {
        fn reset(&mut self) {
            self.resets = self.resets.wrapping_add(1);
        }
    }

    #[derive(Default)]
    struct Other;

    impl Poolable for Other {
        fn reset(&mut self) {}
    }

    #[test]
    fn register_preallocates() {
        let mut registry = PoolRegistry::new();

        registry.register_with(Registration::<Token>::new().preallocate(5));

        assert_eq!(registry.pooled_count::<Token>().unwrap(), 5);
        assert_eq!(registry.limit::<Token>().unwrap(), Limit::Unbounded);
    }

    #[test]
    fn register_preallocation_is_capped_by_limit() {
        let mut registry = PoolRegistry::new();

        registry.register_with(Registration::<Token>::new().preallocate(10).limit(3));

        assert_eq!(registry.pooled_count::<Token>().unwrap(), 3);
    }

    #[test]
    fn register_defaults_to_empty_unbounded() {
        let mut registry = PoolRegistry::new();

        registry.register::<Token>();

        assert_eq!(registry.pooled_count::<Token>().unwrap(), 0);
        assert_eq!(registry.limit::<Token>().unwrap(), Limit::Unbounded);
        assert_eq!(registry.kind_count(), 1);
    }

    #[test]
    fn reregister_replaces_queue() {
        let mut registry = PoolRegistry::new();

        registry.register_with(Registration::<Token>::new().preallocate(4));
        registry.register_with(Registration::<Token>::new().preallocate(1).limit(2));

        assert_eq!(registry.pooled_count::<Token>().unwrap(), 1);
        assert_eq!(registry.limit::<Token>().unwrap(), Limit::Bounded(2));
        assert_eq!(registry.kind_count(), 1);
    }

    #[test]
    fn allocate_tops_up_to_limit() {
        let mut registry = PoolRegistry::new();
        registry.register_with(Registration::<Token>::new().preallocate(2).limit(5));

        assert_eq!(registry.allocate::<Token>(2).unwrap(), 2);
        assert_eq!(registry.pooled_count::<Token>().unwrap(), 4);

        assert_eq!(registry.allocate::<Token>(10).unwrap(), 1);
        assert_eq!(registry.pooled_count::<Token>().unwrap(), 5);

        assert_eq!(registry.allocate::<Token>(1).unwrap(), 0);
    }

    #[test]
    fn allocate_unbounded_adds_everything() {
        let mut registry = PoolRegistry::new();
        registry.register::<Token>();

        assert_eq!(registry.allocate::<Token>(100).unwrap(), 100);
        assert_eq!(registry.pooled_count::<Token>().unwrap(), 100);
    }

    #[test]
    fn get_on_empty_queue_constructs_via_factory() {
        let mut registry = PoolRegistry::new();
        registry.register_with(Registration::with_factory(|| Token { id: 42, resets: 0 }));

        let token = registry.get::<Token>().unwrap();

        assert_eq!(token.id, 42);
        assert_eq!(token.resets, 0);
        assert_eq!(registry.pooled_count::<Token>().unwrap(), 0);
    }

    #[test]
    fn get_is_fifo() {
        let mut registry = PoolRegistry::new();
        registry.register::<Token>();

        for id in 1..=3 {
            registry.recycle(Token { id, resets: 0 }).unwrap();
        }

        assert_eq!(registry.get::<Token>().unwrap().id, 1);
        assert_eq!(registry.get::<Token>().unwrap().id, 2);
        assert_eq!(registry.get::<Token>().unwrap().id, 3);
        assert_eq!(registry.pooled_count::<Token>().unwrap(), 0);
    }

    #[test]
    fn recycle_then_get_returns_same_object_reset_once() {
        let mut registry = PoolRegistry::new();
        registry.register::<Token>();

        registry.recycle(Token { id: 9, resets: 0 }).unwrap();
        let token = registry.get::<Token>().unwrap();

        assert_eq!(token.id, 9);
        assert_eq!(token.resets, 1);
    }

    #[test]
    fn recycle_into_full_queue_drops() {
        let mut registry = PoolRegistry::new();
        registry.register_with(Registration::<Token>::new().limit(1));

        registry.recycle(Token { id: 1, resets: 0 }).unwrap();
        registry.recycle(Token { id: 2, resets: 0 }).unwrap();

        assert_eq!(registry.pooled_count::<Token>().unwrap(), 1);
        assert_eq!(registry.get::<Token>().unwrap().id, 1);
    }

    #[test]
    fn unregistered_kind_is_error() {
        let mut registry = PoolRegistry::new();
        registry.register::<Other>();

        let expected = Error::unregistered(Kind::of::<Token>());

        assert_eq!(registry.get::<Token>().unwrap_err(), expected);
        assert_eq!(registry.allocate::<Token>(3).unwrap_err(), expected);
        assert_eq!(registry.recycle(Token::default()).unwrap_err(), expected);
        assert_eq!(registry.pooled_count::<Token>().unwrap_err(), expected);
        assert_eq!(registry.limit::<Token>().unwrap_err(), expected);

        let sample: Box<dyn Poolable> = Box::new(Token::default());
        assert_eq!(registry.get_of_same_type(&*sample).unwrap_err(), expected);
        assert_eq!(registry.recycle_boxed(sample).unwrap_err(), expected);

        // Nothing was registered as a side effect.
        assert!(!registry.is_registered::<Token>());
        assert_eq!(registry.kind_count(), 1);
        assert_eq!(registry.pooled_count::<Other>().unwrap(), 0);
    }

    #[test]
    fn get_of_same_type_drains_queue_first() {
        let mut registry = PoolRegistry::new();
        registry.register_with(Registration::with_factory(|| Token { id: 100, resets: 0 }));
        registry.recycle(Token { id: 7, resets: 0 }).unwrap();

        let sample: Box<dyn Poolable> = Box::new(Token::default());

        let first = registry.get_of_same_type(&*sample).unwrap();
        let first: Box<dyn Any> = first;
        assert_eq!(first.downcast_ref::<Token>().unwrap().id, 7);

        let second = registry.get_of_same_type(&*sample).unwrap();
        let second: Box<dyn Any> = second;
        assert_eq!(second.downcast_ref::<Token>().unwrap().id, 100);
    }

    #[test]
    fn recycle_boxed_resets_and_retains_by_runtime_kind() {
        let mut registry = PoolRegistry::new();
        registry.register::<Token>();
        registry.register::<Other>();

        registry
            .recycle_boxed(Box::new(Token { id: 3, resets: 0 }))
            .unwrap();
        registry.recycle_boxed(Box::new(Other)).unwrap();

        assert_eq!(registry.pooled_count::<Token>().unwrap(), 1);
        assert_eq!(registry.pooled_count::<Other>().unwrap(), 1);

        let token = registry.get::<Token>().unwrap();
        assert_eq!(token.id, 3);
        assert_eq!(token.resets, 1);
    }

    #[test]
    fn erased_kind_comes_from_concrete_type() {
        #[derive(Default)]
        struct Mislabeled;

        impl Mislabeled {
            // Claims to be a `Token`, which must not affect where it is pooled.
            #[expect(dead_code, reason = "never called, only shadows a name")]
            fn kind(&self) -> Kind {
                Kind::of::<Token>()
            }
        }

        impl Poolable for Mislabeled {
            fn reset(&mut self) {}
        }

        let mut registry = PoolRegistry::new();
        registry.register_with(Registration::<Token>::new().preallocate(1));

        let expected = Error::UnregisteredKind {
            kind: Kind::of::<Mislabeled>(),
        };

        assert_eq!(
            registry.get_of_same_type(&Mislabeled).unwrap_err(),
            expected
        );
        assert_eq!(
            registry.recycle_boxed(Box::new(Mislabeled)).unwrap_err(),
            expected
        );
        assert_eq!(registry.pooled_count::<Token>().unwrap(), 1);

        registry.register::<Mislabeled>();
        registry.recycle_boxed(Box::new(Mislabeled)).unwrap();

        assert_eq!(registry.pooled_count::<Mislabeled>().unwrap(), 1);
        assert_eq!(registry.pooled_count::<Token>().unwrap(), 1);
    }

    #[test]
    fn kinds_are_isolated() {
        let mut registry = PoolRegistry::new();
        registry.register_with(Registration::<Token>::new().preallocate(2));
        registry.register_with(Registration::<Other>::new().preallocate(5));

        drop(registry.get::<Token>().unwrap());

        assert_eq!(registry.pooled_count::<Token>().unwrap(), 1);
        assert_eq!(registry.pooled_count::<Other>().unwrap(), 5);
    }

    #[test]
    fn reset_happens_before_object_is_visible() {
        thread_local! {
            static RESET_OBSERVED: Cell<bool> = const { Cell::new(false) };
        }

        #[derive(Default)]
        struct Observer {
            dirty: bool,
        }

        impl Poolable for Observer {
            fn reset(&mut self) {
                RESET_OBSERVED.with(|observed| observed.set(true));
                self.dirty = false;
            }
        }

        let mut registry = PoolRegistry::new();
        registry.register::<Observer>();

        registry.recycle(Observer { dirty: true }).unwrap();
        assert!(RESET_OBSERVED.with(Cell::get));

        let observer = registry.get::<Observer>().unwrap();
        assert!(!observer.dirty);
    }
}
