//! Caller-owned mutable cell for thunk grammars
//!
//! A [`BoxedValue`] lets one parse step leave a value behind for a later
//! [`thunk`](super::parser_dsl::thunk) to read. The engine never touches
//! it; the grammar author decides when it is updated.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A shared, updatable value
#[derive(Debug, Default)]
pub struct BoxedValue<T> {
    inner: Arc<Mutex<T>>,
}

impl<T> Clone for BoxedValue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> BoxedValue<T> {
    /// Create a box holding `value`
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(value)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, T> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the contents
    pub fn update(&self, value: T) {
        *self.lock() = value;
    }

    /// Replace the contents, returning the previous value
    pub fn get_and_update(&self, value: T) -> T {
        std::mem::replace(&mut *self.lock(), value)
    }

    /// Apply `f` to the contents in place
    pub fn modify<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.lock())
    }
}

impl<T: Clone> BoxedValue<T> {
    /// A copy of the contents
    pub fn get(&self) -> T {
        self.lock().clone()
    }

    /// Replace the contents, returning the new value
    pub fn update_and_get(&self, value: T) -> T {
        let mut guard = self.lock();
        *guard = value;
        guard.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_variants() {
        let b = BoxedValue::new(1);
        assert_eq!(b.get(), 1);
        assert_eq!(b.get_and_update(2), 1);
        assert_eq!(b.update_and_get(3), 3);
        b.update(4);
        assert_eq!(b.get(), 4);
        assert_eq!(b.modify(|v| {
            *v += 1;
            *v * 10
        }), 50);
    }

    #[test]
    fn test_clones_share_contents() {
        let a = BoxedValue::new(String::from("x"));
        let b = a.clone();
        b.update("y".to_string());
        assert_eq!(a.get(), "y");
    }
}
