//! Story-wide admission control for concurrent asset requests.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::trace;

/// Bounds the number of asset requests in flight across a whole story.
///
/// Cloning shares the same permits.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl AdmissionGate {
    /// Creates a gate admitting at most `capacity` holders (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Waits for a slot. Returns `None` once the gate has been closed.
    pub async fn acquire(&self) -> Option<AdmissionPermit> {
        let permit = self.semaphore.clone().acquire_owned().await.ok()?;
        trace!(available = self.semaphore.available_permits(), "Admitted");
        Some(AdmissionPermit { _permit: permit })
    }

    /// Takes a slot without waiting.
    pub fn try_acquire(&self) -> Option<AdmissionPermit> {
        let permit = self.semaphore.clone().try_acquire_owned().ok()?;
        Some(AdmissionPermit { _permit: permit })
    }

    /// Refuses all future admissions; waiters are released with `None`.
    pub fn close(&self) {
        self.semaphore.close();
    }

    /// Maximum concurrent holders.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots currently free.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

/// RAII admission slot, released on drop.
#[derive(Debug)]
pub struct AdmissionPermit {
    _permit: OwnedSemaphorePermit,
}
