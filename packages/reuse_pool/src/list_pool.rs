use std::any::{Any, TypeId, type_name};
use std::fmt;

use hash_hasher::HashedMap;
use tracing::trace;

use crate::{BoundedQueue, Error, Kind, Limit, PoolRegistry, Poolable, Result};

/// Recycles `Vec<T>` containers so their allocations can be reused, keyed by element type.
///
/// There is no registration step. The queue for an element type is created the first time a
/// list of that element type is returned, and holds at most
/// [`DEFAULT_LIMIT`][Self::DEFAULT_LIMIT] idle lists. Borrowing a list of an element type that
/// has no queue yet is not an error: you simply get a new empty list.
///
/// When a list of [`Poolable`] elements is returned, every element is first recycled into a
/// [`PoolRegistry`], then the emptied list is retained for reuse.
///
/// # Example
///
/// ```rust
/// use reuse_pool::{ListPool, PoolRegistry, Poolable};
///
/// #[derive(Default)]
/// struct Hit {
///     damage: u32,
/// }
///
/// impl Poolable for Hit {
///     fn reset(&mut self) {
///         self.damage = 0;
///     }
/// }
///
/// let mut registry = PoolRegistry::new();
/// registry.register::<Hit>();
///
/// let mut lists = ListPool::new();
///
/// let mut hits = lists.get::<Hit>();
/// hits.push(registry.get::<Hit>().unwrap());
/// hits.push(registry.get::<Hit>().unwrap());
///
/// // The hits go back to the registry, the emptied list goes back to the list pool.
/// lists.recycle(hits, &mut registry).unwrap();
///
/// assert_eq!(registry.pooled_count::<Hit>().unwrap(), 2);
/// assert_eq!(lists.pooled_count::<Hit>(), 1);
///
/// let hits = lists.get::<Hit>();
/// assert!(hits.is_empty());
/// ```
///
/// # Thread safety
///
/// This type is single-threaded. It is neither [`Send`] nor [`Sync`].
pub struct ListPool {
    // TypeId is already a hash, so the pass-through hasher avoids hashing it a second time.
    // Values are `BoundedQueue<Vec<T>>`, with T matching the key.
    queues: HashedMap<TypeId, Box<dyn Any>>,
}

impl ListPool {
    /// The maximum number of idle lists retained per element type.
    pub const DEFAULT_LIMIT: usize = 100;

    /// Creates a list pool that holds no lists.
    #[must_use]
    pub fn new() -> Self {
        Self {
            queues: HashedMap::default(),
        }
    }

    /// Borrows an empty list for elements of type `T`.
    ///
    /// Returns a previously recycled list if one is available, retaining its allocated
    /// capacity, or a new list otherwise. This never fails.
    #[must_use]
    pub fn get<T: 'static>(&mut self) -> Vec<T> {
        match self.queue_mut::<T>() {
            Some(queue) => queue.dequeue().unwrap_or_else(|| queue.create()),
            None => Vec::new(),
        }
    }

    /// Recycles every element of `list` into `registry`, then retains the emptied list.
    ///
    /// Elements are reset and returned to their queue in list order. If the list queue for `T`
    /// is at its limit, the emptied list is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnregisteredKind`] if `list` is not empty and `T` has not been
    /// registered with `registry`. This is checked before anything is recycled, so on failure
    /// neither the registry nor the list pool has been modified.
    pub fn recycle<T: Poolable>(
        &mut self,
        mut list: Vec<T>,
        registry: &mut PoolRegistry,
    ) -> Result<()> {
        if !list.is_empty() && !registry.is_registered::<T>() {
            return Err(Error::unregistered(Kind::of::<T>()));
        }

        for item in list.drain(..) {
            registry.recycle(item)?;
        }

        self.retain(list);
        Ok(())
    }

    /// Recycles every element of a list of erased poolable objects into `registry`, each into
    /// the queue of its own concrete kind, then retains the emptied list.
    ///
    /// The list is retained under the element type `Box<dyn Poolable>`, so borrow it again via
    /// `get::<Box<dyn Poolable>>()`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnregisteredKind`] naming the first element whose kind has not been
    /// registered with `registry`. This is checked for every element before anything is
    /// recycled, so on failure neither the registry nor the list pool has been modified.
    pub fn recycle_boxed(
        &mut self,
        mut list: Vec<Box<dyn Poolable>>,
        registry: &mut PoolRegistry,
    ) -> Result<()> {
        if let Some(unregistered) = list
            .iter()
            .map(|item| Kind::of_val(&**item))
            .find(|kind| !registry.is_kind_registered(*kind))
        {
            return Err(Error::unregistered(unregistered));
        }

        for item in list.drain(..) {
            registry.recycle_boxed(item)?;
        }

        self.retain(list);
        Ok(())
    }

    /// Drops every element of `list`, then retains the emptied list.
    ///
    /// Use this for element types that are not [`Poolable`]. If the list queue for `T` is at
    /// its limit, the list is dropped.
    pub fn recycle_plain<T: 'static>(&mut self, mut list: Vec<T>) {
        list.clear();
        self.retain(list);
    }

    /// The number of idle lists for elements of type `T`. Zero if no list of that element type
    /// has ever been returned.
    #[must_use]
    pub fn pooled_count<T: 'static>(&self) -> usize {
        self.queues
            .get(&TypeId::of::<T>())
            .map_or(0, |queue| downcast::<T>(&**queue).len())
    }

    fn retain<T: 'static>(&mut self, list: Vec<T>) {
        debug_assert!(list.is_empty());

        let queue = self
            .queues
            .entry(TypeId::of::<T>())
            .or_insert_with(|| {
                trace!(element = %Kind::of::<T>(), "creating list queue");
                Box::new(BoundedQueue::<Vec<T>>::new(
                    Limit::Bounded(Self::DEFAULT_LIMIT),
                    Vec::new,
                ))
            });

        let queue = queue
            .downcast_mut::<BoundedQueue<Vec<T>>>()
            .expect("guarded by TypeId");

        if !queue.enqueue(list) {
            trace!(element = %Kind::of::<T>(), "list queue full, dropping list");
        }
    }

    fn queue_mut<T: 'static>(&mut self) -> Option<&mut BoundedQueue<Vec<T>>> {
        self.queues.get_mut(&TypeId::of::<T>()).map(|queue| {
            queue
                .downcast_mut::<BoundedQueue<Vec<T>>>()
                .expect("guarded by TypeId")
        })
    }
}

fn downcast<T: 'static>(queue: &dyn Any) -> &BoundedQueue<Vec<T>> {
    queue
        .downcast_ref::<BoundedQueue<Vec<T>>>()
        .expect("guarded by TypeId")
}

impl Default for ListPool {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ListPool {
    #[cfg_attr(test, mutants::skip)] // No API contract.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("element_kinds", &self.queues.len())
            .finish()
    }
}
