use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use super::options::SubscribeOptions;
use super::subscription::{SubscriberId, Subscriber, Unsubscribe};
use crate::equality::{same_value, EqualsFn, SameValue};

struct StoreInner<T> {
    value: Rc<T>,
    version: u64,
    equals: EqualsFn<T>,
    // Registration order is notification order.
    subscribers: Vec<Rc<Subscriber<T>>>,
    next_id: u64,
}

impl<T> StoreInner<T> {
    fn remove(&mut self, id: SubscriberId) -> Option<Rc<Subscriber<T>>> {
        let index = self.subscribers.iter().position(|s| s.id == id)?;
        Some(self.subscribers.remove(index))
    }
}

/// A single observable value.
///
/// `set` replaces the value and synchronously notifies every subscriber,
/// unless the new value is the same as the current one under the store's
/// comparator (strict equality by default, see [`crate::equality`]).
///
/// Cloning a `Store` creates another handle to the **same** value and
/// subscribers. The store is single-threaded.
///
/// No interior borrow is held while subscriber callbacks run, so a callback
/// may read, set, subscribe or unsubscribe on the same store. A panicking
/// callback unwinds out of `set` after the value has been committed; later
/// subscribers of that pass are not called and the store stays usable.
///
/// A callback that captures a `Store` clone forms a reference cycle
/// (store → subscriber → store) and the store is never freed. Capture a
/// [`WeakStore`] from [`downgrade`](Self::downgrade) instead, or scope the
/// subscription with [`Unsubscribe::into_guard`].
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use vibra::Store;
///
/// let counter = Store::new(0);
/// let seen = Rc::new(Cell::new(0));
///
/// let unsubscribe = counter.subscribe({
///     let seen = Rc::clone(&seen);
///     move |value| seen.set(*value)
/// });
///
/// counter.set(1);
/// assert_eq!(seen.get(), 1);
/// assert_eq!(counter.get(), 1);
///
/// unsubscribe.unsubscribe();
/// counter.set(2);
/// assert_eq!(seen.get(), 1);
/// ```
pub struct Store<T> {
    inner: Rc<RefCell<StoreInner<T>>>,
}

impl<T: SameValue> Store<T> {
    /// Create a new store with the given initial value.
    pub fn new(initial: T) -> Self {
        Self::with_equals(initial, same_value::<T>)
    }
}

impl<T> Store<T> {
    /// Create a store that uses `equals` to decide whether a `set` is a
    /// no-op.
    ///
    /// ```
    /// use vibra::{equality, Store};
    ///
    /// let tags = Store::with_equals(vec!["a"], equality::structural_equals);
    /// tags.set(vec!["a"]); // equal by structure, ignored
    /// assert_eq!(tags.version(), 0);
    /// ```
    pub fn with_equals(initial: T, equals: EqualsFn<T>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                value: Rc::new(initial),
                version: 0,
                equals,
                subscribers: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        T::clone(&*self.inner.borrow().value)
    }

    /// Read the current value without cloning it.
    ///
    /// The closure may use the store freely, including calling `set`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let current = Rc::clone(&self.inner.borrow().value);
        f(&*current)
    }

    /// Set a new value.
    ///
    /// If the value is the same as the current one nothing happens.
    /// Otherwise the value is replaced, the version is bumped, and every
    /// subscriber registered when the pass starts is called in registration
    /// order before `set` returns. Subscribers added during the pass wait for
    /// the next change; subscribers removed during the pass are skipped.
    ///
    /// A `set` issued from inside a callback runs its own pass to completion
    /// and supersedes the outer one: the outer pass stops instead of handing
    /// its older value to the subscribers it has not reached yet.
    pub fn set(&self, value: T) {
        let (current, snapshot, previous, pass_version) = {
            let mut inner = self.inner.borrow_mut();
            if (inner.equals)(&*inner.value, &value) {
                trace!(version = inner.version, "set ignored, value unchanged");
                return;
            }
            let current = Rc::new(value);
            let previous = std::mem::replace(&mut inner.value, Rc::clone(&current));
            inner.version += 1;
            debug!(
                version = inner.version,
                subscribers = inner.subscribers.len(),
                "store value changed"
            );
            (current, inner.subscribers.clone(), previous, inner.version)
        };
        drop(previous);

        for subscriber in &snapshot {
            let version = self.inner.borrow().version;
            if version != pass_version {
                trace!(
                    pass_version,
                    version,
                    "notification pass superseded by a nested set"
                );
                break;
            }
            subscriber.notify(&*current);
        }
    }

    /// Compute a new value from the current one and [`set`](Self::set) it.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let next = self.with(f);
        self.set(next);
    }

    /// Subscribe to future changes.
    ///
    /// The callback is not called during registration. Returns the handle
    /// that removes this subscription.
    pub fn subscribe<F>(&self, callback: F) -> Unsubscribe
    where
        F: Fn(&T) + 'static,
        T: 'static,
    {
        self.subscribe_with(callback, SubscribeOptions::default())
    }

    /// Subscribe with explicit [`SubscribeOptions`].
    ///
    /// With `call_on_subscribe(true)` the callback is invoked once with the
    /// current value before this returns. That call is not a change. If it
    /// panics, the subscription is removed before the panic leaves
    /// `subscribe_with`.
    pub fn subscribe_with<F>(&self, callback: F, options: SubscribeOptions) -> Unsubscribe
    where
        F: Fn(&T) + 'static,
        T: 'static,
    {
        let subscriber = {
            let mut inner = self.inner.borrow_mut();
            let id = SubscriberId::new(inner.next_id);
            inner.next_id += 1;
            let subscriber = Rc::new(Subscriber::new(id, Box::new(callback)));
            inner.subscribers.push(Rc::clone(&subscriber));
            trace!(
                subscriber = %id,
                subscribers = inner.subscribers.len(),
                call_on_subscribe = options.calls_on_subscribe(),
                "subscriber registered"
            );
            subscriber
        };
        let handle = self.unsubscribe_handle(&subscriber);

        if options.calls_on_subscribe() {
            let current = Rc::clone(&self.inner.borrow().value);
            let rollback = RemoveOnUnwind(&handle);
            subscriber.notify(&*current);
            std::mem::forget(rollback);
        }
        handle
    }

    /// Create a handle that does not keep the store alive.
    ///
    /// ```
    /// use vibra::Store;
    ///
    /// let store = Store::new(0);
    /// let weak = store.downgrade();
    /// store.subscribe(move |value: &i32| {
    ///     if let Some(store) = weak.upgrade() {
    ///         if *value < 3 {
    ///             store.set(value + 1);
    ///         }
    ///     }
    /// });
    ///
    /// store.set(1);
    /// assert_eq!(store.get(), 3);
    /// ```
    pub fn downgrade(&self) -> WeakStore<T> {
        WeakStore {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Number of registered subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Number of value-changing `set` calls so far.
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    fn unsubscribe_handle(&self, subscriber: &Subscriber<T>) -> Unsubscribe
    where
        T: 'static,
    {
        let id = subscriber.id;
        let active = subscriber.active_flag();
        let registry = Rc::downgrade(&self.inner);

        Unsubscribe::new(
            id,
            subscriber.active_flag(),
            Box::new(move || {
                active.set(false);
                let Some(inner) = registry.upgrade() else {
                    return;
                };
                // Drop the callback only after the borrow is released.
                let removed = inner.borrow_mut().remove(id);
                if removed.is_some() {
                    trace!(
                        subscriber = %id,
                        subscribers = inner.borrow().subscribers.len(),
                        "subscriber removed"
                    );
                }
                drop(removed);
            }),
        )
    }
}

/// Non-owning handle to a [`Store`].
///
/// Obtained from [`Store::downgrade`]; [`upgrade`](Self::upgrade) returns
/// `None` once every `Store` handle has been dropped.
pub struct WeakStore<T> {
    inner: Weak<RefCell<StoreInner<T>>>,
}

impl<T> WeakStore<T> {
    /// The store, if it is still alive.
    pub fn upgrade(&self) -> Option<Store<T>> {
        self.inner.upgrade().map(|inner| Store { inner })
    }
}

impl<T> Clone for WeakStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for WeakStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakStore")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

/// Removes a subscription whose initial call unwinds. Forgotten on success.
struct RemoveOnUnwind<'a>(&'a Unsubscribe);

impl Drop for RemoveOnUnwind<'_> {
    fn drop(&mut self) {
        self.0.unsubscribe();
    }
}

// Manual Clone: shares the same Rc, no `T: Clone` bound.
impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: SameValue + Default> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Store")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}
