/// Options accepted by [`Store::subscribe_with`](crate::Store::subscribe_with).
///
/// # Examples
///
/// ```
/// use vibra::{Store, SubscribeOptions};
///
/// let store = Store::new(1);
/// let _handle = store.subscribe_with(
///     |value| println!("value: {value}"),
///     SubscribeOptions::new().call_on_subscribe(true),
/// );
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubscribeOptions {
    call_on_subscribe: bool,
}

impl SubscribeOptions {
    /// Default options: the callback only sees future changes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Invoke the callback once with the current value before `subscribe`
    /// returns.
    ///
    /// The initial call is not a change: it bumps no version and notifies
    /// nobody else.
    #[must_use]
    pub fn call_on_subscribe(mut self, enabled: bool) -> Self {
        self.call_on_subscribe = enabled;
        self
    }

    /// Whether the initial call is requested.
    pub fn calls_on_subscribe(&self) -> bool {
        self.call_on_subscribe
    }
}
