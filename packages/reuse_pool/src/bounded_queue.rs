use std::any::type_name;
use std::collections::VecDeque;
use std::fmt;

/// The maximum number of idle objects a queue will retain.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[allow(
    clippy::exhaustive_enums,
    reason = "a capacity is either limited or it is not, there is nothing else to add"
)]
pub enum Limit {
    /// The queue retains every object given to it.
    #[default]
    Unbounded,

    /// The queue retains at most this many objects. Zero is valid and means that the
    /// queue never retains anything.
    Bounded(usize),
}

impl Limit {
    /// Whether a queue currently holding `len` objects may accept one more.
    #[must_use]
    pub fn admits(self, len: usize) -> bool {
        match self {
            Self::Unbounded => true,
            Self::Bounded(max) => len < max,
        }
    }

    /// How many more objects a queue currently holding `len` objects may accept,
    /// or `None` if there is no limit.
    #[must_use]
    pub fn headroom(self, len: usize) -> Option<usize> {
        match self {
            Self::Unbounded => None,
            Self::Bounded(max) => Some(max.saturating_sub(len)),
        }
    }
}

/// A first-in-first-out buffer of idle objects of one type, with an optional capacity limit.
///
/// The queue also carries a factory that produces brand new objects. The queue itself never
/// calls the factory; it is there for the owner of the queue to materialize objects when the
/// queue runs dry (see [`create()`][Self::create]).
///
/// Enqueueing into a full queue is not an error: the object is simply not retained.
///
/// # Example
///
/// ```rust
/// use reuse_pool::{BoundedQueue, Limit};
///
/// let mut queue = BoundedQueue::new(Limit::Bounded(2), String::new);
///
/// assert!(queue.enqueue("first".to_string()));
/// assert!(queue.enqueue("second".to_string()));
///
/// // At capacity, further items are dropped.
/// assert!(!queue.enqueue("third".to_string()));
/// assert_eq!(queue.len(), 2);
///
/// assert_eq!(queue.dequeue().as_deref(), Some("first"));
/// assert_eq!(queue.dequeue().as_deref(), Some("second"));
/// assert_eq!(queue.dequeue(), None);
///
/// // The owner falls back to the factory when the queue is empty.
/// assert_eq!(queue.create(), "");
/// ```
pub struct BoundedQueue<T> {
    items: VecDeque<T>,
    limit: Limit,
    factory: Box<dyn Fn() -> T + Send>,
}

impl<T> BoundedQueue<T> {
    /// Creates an empty queue with the given limit and factory.
    #[must_use]
    pub fn new(limit: Limit, factory: impl Fn() -> T + Send + 'static) -> Self {
        Self::from_boxed_factory(limit, Box::new(factory))
    }

    pub(crate) fn from_boxed_factory(limit: Limit, factory: Box<dyn Fn() -> T + Send>) -> Self {
        Self {
            items: VecDeque::new(),
            limit,
            factory,
        }
    }

    /// Appends an item to the back of the queue if the limit permits.
    ///
    /// Returns `true` if the item was retained. If the queue is full, the item is dropped and
    /// the contents of the queue are unaffected.
    pub fn enqueue(&mut self, item: T) -> bool {
        if !self.limit.admits(self.items.len()) {
            return false;
        }

        self.items.push_back(item);
        true
    }

    /// Removes the earliest enqueued item, or returns `None` if the queue is empty.
    pub fn dequeue(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// Produces a brand new item using the factory of the queue.
    ///
    /// The new item is not added to the queue.
    #[must_use]
    pub fn create(&self) -> T {
        (self.factory)()
    }

    /// The number of items in the queue.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the queue holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the next [`enqueue()`][Self::enqueue] would drop its item.
    #[must_use]
    pub fn is_full(&self) -> bool {
        !self.limit.admits(self.items.len())
    }

    /// The limit the queue was created with.
    #[must_use]
    pub fn limit(&self) -> Limit {
        self.limit
    }

    /// How many more items the queue will retain, or `None` if it is unbounded.
    #[must_use]
    pub fn headroom(&self) -> Option<usize> {
        self.limit.headroom(self.items.len())
    }
}

impl<T> fmt::Debug for BoundedQueue<T> {
    #[cfg_attr(test, mutants::skip)] // No API contract.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("len", &self.items.len())
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}
