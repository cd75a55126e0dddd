//! The observable store.
//!
//! A [`Store`] holds one value and a registry of subscribers. Subscribing
//! returns an [`Unsubscribe`] handle; [`SubscribeOptions`] controls whether
//! the callback also receives the current value at registration time.

mod options;
mod store;
mod subscription;

pub use options::SubscribeOptions;
pub use store::{Store, WeakStore};
pub use subscription::{SubscriberId, SubscriptionGuard, Unsubscribe};
