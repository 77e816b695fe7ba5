// Lock primitive guarding pool queues, selected at build time.

#[cfg(not(feature = "std-mutex"))]
pub type QueueLock<T> = parking_lot::Mutex<T>;

#[cfg(not(feature = "std-mutex"))]
pub type QueueGuard<'a, T> = parking_lot::MutexGuard<'a, T>;

#[cfg(feature = "std-mutex")]
pub type QueueGuard<'a, T> = std::sync::MutexGuard<'a, T>;

/// `std::sync::Mutex` with the same non-poisoning `lock()` shape as parking_lot.
#[cfg(feature = "std-mutex")]
#[derive(Debug, Default)]
pub struct QueueLock<T>(std::sync::Mutex<T>);

#[cfg(feature = "std-mutex")]
impl<T> QueueLock<T> {
    pub const fn new(value: T) -> Self {
        Self(std::sync::Mutex::new(value))
    }

    pub fn lock(&self) -> QueueGuard<'_, T> {
        // A panic while holding the lock leaves the queue structurally valid.
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
