use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Opaque key of one subscription.
///
/// Ids are handed out in increasing order per store, so the same callback
/// subscribed twice gets two ids and two independent subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value of the id.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// A registered callback together with its liveness flag.
///
/// The flag is shared with the matching [`Unsubscribe`] handle so that an
/// in-flight notification pass can skip subscriptions removed mid-pass.
pub(crate) struct Subscriber<T> {
    pub(crate) id: SubscriberId,
    active: Rc<Cell<bool>>,
    callback: Box<dyn Fn(&T)>,
}

impl<T> Subscriber<T> {
    pub(crate) fn new(id: SubscriberId, callback: Box<dyn Fn(&T)>) -> Self {
        Self {
            id,
            active: Rc::new(Cell::new(true)),
            callback,
        }
    }

    pub(crate) fn active_flag(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.active)
    }

    /// Invoke the callback unless the subscription has been removed.
    pub(crate) fn notify(&self, value: &T) {
        if self.active.get() {
            (self.callback)(value);
        }
    }
}

/// Handle returned by [`Store::subscribe`](crate::Store::subscribe).
///
/// Calling [`unsubscribe`](Self::unsubscribe) removes exactly the
/// subscription that produced this handle. Further calls do nothing.
///
/// Dropping the handle does **not** unsubscribe; use
/// [`into_guard`](Self::into_guard) for scoped subscriptions. The handle only
/// holds a weak reference to its store and never keeps it alive.
pub struct Unsubscribe {
    id: SubscriberId,
    active: Rc<Cell<bool>>,
    release: Cell<Option<Box<dyn FnOnce()>>>,
}

impl Unsubscribe {
    pub(crate) fn new(
        id: SubscriberId,
        active: Rc<Cell<bool>>,
        release: Box<dyn FnOnce()>,
    ) -> Self {
        Self {
            id,
            active,
            release: Cell::new(Some(release)),
        }
    }

    /// Remove the subscription. Idempotent.
    pub fn unsubscribe(&self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }

    /// `true` until [`unsubscribe`](Self::unsubscribe) has been called.
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Id of the subscription this handle controls.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Convert into a guard that unsubscribes when dropped.
    pub fn into_guard(self) -> SubscriptionGuard {
        SubscriptionGuard { handle: self }
    }
}

impl fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unsubscribe")
            .field("id", &self.id)
            .field("active", &self.active.get())
            .finish_non_exhaustive()
    }
}

/// RAII guard for a subscription.
///
/// Unsubscribes on drop.
#[must_use = "dropping the guard unsubscribes immediately"]
#[derive(Debug)]
pub struct SubscriptionGuard {
    handle: Unsubscribe,
}

impl SubscriptionGuard {
    /// Id of the guarded subscription.
    pub fn id(&self) -> SubscriberId {
        self.handle.id()
    }

    /// `true` while the subscription is registered.
    pub fn is_active(&self) -> bool {
        self.handle.is_active()
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.handle.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting_handle() -> (Unsubscribe, Rc<Cell<u32>>) {
        let releases = Rc::new(Cell::new(0));
        let active = Rc::new(Cell::new(true));
        let handle = Unsubscribe::new(SubscriberId::new(3), Rc::clone(&active), {
            let releases = Rc::clone(&releases);
            Box::new(move || {
                active.set(false);
                releases.set(releases.get() + 1);
            })
        });
        (handle, releases)
    }

    #[test]
    fn release_runs_once() {
        let (handle, releases) = counting_handle();
        assert!(handle.is_active());

        handle.unsubscribe();
        handle.unsubscribe();
        handle.unsubscribe();

        assert_eq!(releases.get(), 1);
        assert!(!handle.is_active());
    }

    #[test]
    fn dropping_handle_keeps_subscription() {
        let (handle, releases) = counting_handle();
        drop(handle);
        assert_eq!(releases.get(), 0);
    }

    #[test]
    fn guard_releases_on_drop() {
        let (handle, releases) = counting_handle();
        let guard = handle.into_guard();
        assert!(guard.is_active());
        assert_eq!(guard.id(), SubscriberId::new(3));

        drop(guard);
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn inactive_subscriber_is_skipped() {
        let seen = Rc::new(Cell::new(0));
        let subscriber = Subscriber::new(SubscriberId::new(0), {
            let seen = Rc::clone(&seen);
            Box::new(move |value: &i32| seen.set(*value))
        });

        subscriber.notify(&5);
        assert_eq!(seen.get(), 5);

        subscriber.active_flag().set(false);
        subscriber.notify(&9);
        assert_eq!(seen.get(), 5);
    }

    #[test]
    fn id_display() {
        let id = SubscriberId::new(12);
        assert_eq!(id.to_string(), "sub#12");
        assert_eq!(id.as_u64(), 12);
    }
}
