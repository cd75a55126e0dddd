//! # Vibra
//!
//! A minimal observable value store for Rust.
//!
//! A [`Store<T>`] holds a single value and notifies subscribers whenever that
//! value changes:
//!
//! - [`Store::get`] reads the current value.
//! - [`Store::set`] replaces it and notifies subscribers synchronously, but
//!   only when the new value is not the same as the old one under strict
//!   equality (see [`equality`]).
//! - [`Store::subscribe`] registers a callback and returns an idempotent
//!   [`Unsubscribe`] handle.
//!
//! Stores are single-threaded and fully synchronous: once `set` returns,
//! every subscriber has seen the new value.
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use vibra::{Store, SubscribeOptions};
//!
//! let store = Store::new(0);
//! let seen = Rc::new(RefCell::new(Vec::new()));
//!
//! let handle = store.subscribe_with(
//!     {
//!         let seen = Rc::clone(&seen);
//!         move |value: &i32| seen.borrow_mut().push(*value)
//!     },
//!     SubscribeOptions::new().call_on_subscribe(true),
//! );
//!
//! store.set(1);
//! store.set(1); // unchanged, no notification
//! handle.unsubscribe();
//! store.set(2);
//!
//! assert_eq!(*seen.borrow(), vec![0, 1]);
//! ```

pub mod equality;
pub mod error;
pub mod store;

// Re-export main types for convenience
pub use equality::{EqualsFn, SameValue};
pub use error::{Result, StoreError};
pub use store::{
    Store, SubscribeOptions, SubscriberId, SubscriptionGuard, Unsubscribe, WeakStore,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        // Basic smoke test
        let store = Store::new(0);
        assert_eq!(store.get(), 0);
        store.set(42);
        assert_eq!(store.get(), 42);
    }
}
