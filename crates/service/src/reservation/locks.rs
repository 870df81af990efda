use std::sync::Arc;

use configs::LockScope;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

type Registry = DashMap<i32, Arc<Mutex<()>>>;

/// Booking lock owned by one engine instance.
///
/// With `LockScope::Global` every booking in the process shares one mutex.
/// With `LockScope::Restaurant` each restaurant gets its own mutex, created on
/// first use and dropped from the registry once nobody holds or waits on it;
/// tables never move between restaurants, so bookings for different
/// restaurants cannot violate each other's slot windows.
pub struct BookingLocks {
    scope: LockScope,
    global: Arc<Mutex<()>>,
    per_restaurant: Registry,
}

/// Held booking lock; released on drop.
pub struct BookingGuard<'a> {
    guard: Option<OwnedMutexGuard<()>>,
    registry: Option<(&'a Registry, i32)>,
}

impl Drop for BookingGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        if let Some((registry, restaurant_id)) = self.registry {
            // Waiters clone the Arc under the same shard lock, so a count of one
            // means the registry holds the only reference.
            registry.remove_if(&restaurant_id, |_, lock| Arc::strong_count(lock) == 1);
        }
    }
}

impl BookingLocks {
    pub fn new(scope: LockScope) -> Self {
        Self { scope, global: Arc::new(Mutex::new(())), per_restaurant: DashMap::new() }
    }

    pub fn scope(&self) -> LockScope { self.scope }

    /// Wait for the lock covering `restaurant_id`.
    pub async fn acquire(&self, restaurant_id: i32) -> BookingGuard<'_> {
        let (lock, registry) = match self.scope {
            LockScope::Global => (Arc::clone(&self.global), None),
            // shard guard must not live across the await below
            LockScope::Restaurant => (
                Arc::clone(self.per_restaurant.entry(restaurant_id).or_default().value()),
                Some((&self.per_restaurant, restaurant_id)),
            ),
        };
        // built before waiting so a cancelled wait still cleans up
        let mut held = BookingGuard { guard: None, registry };
        held.guard = Some(lock.lock_owned().await);
        held
    }
}
