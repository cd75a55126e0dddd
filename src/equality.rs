//! Change detection for stores.
//!
//! A store only replaces its value and notifies subscribers when the new
//! value is *not the same* as the current one. "Same" is strict equality,
//! never structural:
//!
//! - Scalars, `char`, `String` and `&'static str` compare by value.
//! - Floats use IEEE `==`: `NaN` is never the same as `NaN`, and `0.0` is the
//!   same as `-0.0`.
//! - `Rc<T>` and `Arc<T>` compare by pointer identity. Two distinct
//!   allocations holding structurally equal data are different values.
//! - `Option<T>` and `()` compose over the rules above.
//!
//! Owned composites (`Vec<T>`, plain structs) have no identity of their own.
//! Wrap them in `Rc` to get identity semantics, or build the store with
//! [`Store::with_equals`](crate::Store::with_equals) and one of the
//! comparators below.

use std::rc::Rc;
use std::sync::Arc;

/// Comparator deciding whether a `set` is a no-op.
///
/// Returns `true` when the two values are the same, in which case the store
/// is left untouched.
pub type EqualsFn<T> = fn(&T, &T) -> bool;

/// Strict-equality rule used by [`Store::new`](crate::Store::new).
pub trait SameValue {
    /// Returns `true` if `self` and `other` are the same value.
    fn same_value(&self, other: &Self) -> bool;
}

macro_rules! same_value_by_eq {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SameValue for $ty {
                #[inline]
                fn same_value(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

same_value_by_eq!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    String, &'static str,
);

impl SameValue for () {
    #[inline]
    fn same_value(&self, _other: &Self) -> bool {
        true
    }
}

impl<T: SameValue> SameValue for Option<T> {
    fn same_value(&self, other: &Self) -> bool {
        match (self, other) {
            (None, None) => true,
            (Some(a), Some(b)) => a.same_value(b),
            _ => false,
        }
    }
}

impl<T: ?Sized> SameValue for Rc<T> {
    #[inline]
    fn same_value(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<T: ?Sized> SameValue for Arc<T> {
    #[inline]
    fn same_value(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

/// The default comparator, as a plain function.
pub fn same_value<T: SameValue>(a: &T, b: &T) -> bool {
    a.same_value(b)
}

/// Structural comparison through `PartialEq`.
///
/// Opt-in only: with this comparator, setting a freshly built but equal
/// value does not notify.
pub fn structural_equals<T: PartialEq>(a: &T, b: &T) -> bool {
    a == b
}

/// Every `set` counts as a change.
///
/// This is the strict rule applied to owned composites: each value passed to
/// `set` is a new object.
pub fn never_equals<T>(_a: &T, _b: &T) -> bool {
    false
}
