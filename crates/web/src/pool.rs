//! Bounded worker capacity for connection tasks.
//!
//! The pool is a counting semaphore sized to the worker limit. A slot must
//! be reserved before a connection is accepted; it travels into the spawned
//! task, and dropping it is the completion signal that wakes exactly one
//! suspended reservation. Panics inside a task are contained by the runtime
//! and still release the slot.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;

/// Bounded pool of worker slots for connection tasks.
#[derive(Debug)]
pub struct WorkerPool {
    slots: Arc<Semaphore>,
    capacity: usize,
}

/// One unit of worker capacity, held for the lifetime of a connection task.
#[derive(Debug)]
pub struct WorkerSlot {
    _permit: OwnedSemaphorePermit,
}

impl WorkerPool {
    /// Creates a pool with `capacity` slots; a zero capacity is raised to
    /// one, a pool that can serve nothing is useless.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { slots: Arc::new(Semaphore::new(capacity)), capacity }
    }

    /// Reserves a slot, suspending while the pool is at capacity.
    ///
    /// This is the backpressure point of the accept loop. Each released
    /// slot wakes exactly one suspended reservation.
    pub async fn reserve(&self) -> WorkerSlot {
        // the pool never closes its semaphore
        let permit = Arc::clone(&self.slots).acquire_owned().await.expect("worker semaphore closed");
        WorkerSlot { _permit: permit }
    }

    /// Reserves a slot without suspending, `None` while at capacity.
    pub fn try_reserve(&self) -> Option<WorkerSlot> {
        Arc::clone(&self.slots).try_acquire_owned().ok().map(|permit| WorkerSlot { _permit: permit })
    }

    /// Spawns `task` onto the runtime, moving `slot` into it.
    ///
    /// Never blocks. The slot is released exactly once when the task
    /// finishes, whether it returns or panics.
    pub fn submit<F>(&self, slot: WorkerSlot, task: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(async move {
            let _slot = slot;
            task.await;
        })
    }

    /// Number of slots currently held.
    pub fn in_flight(&self) -> usize {
        self.capacity - self.slots.available_permits()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::oneshot;
    use tokio::time::timeout;

    use super::*;

    #[test]
    fn capacity_has_floor_of_one() {
        assert_eq!(WorkerPool::new(0).capacity(), 1);
        assert_eq!(WorkerPool::new(250).capacity(), 250);
    }

    #[tokio::test]
    async fn slots_exhaust_at_capacity() {
        let pool = WorkerPool::new(2);

        let first = pool.try_reserve().unwrap();
        let _second = pool.try_reserve().unwrap();

        assert_eq!(pool.in_flight(), 2);
        assert!(pool.try_reserve().is_none());

        drop(first);

        assert_eq!(pool.in_flight(), 1);
        assert!(pool.try_reserve().is_some());
    }

    #[tokio::test]
    async fn reserve_suspends_until_a_slot_frees() {
        let pool = WorkerPool::new(1);
        let held = pool.reserve().await;

        assert!(timeout(Duration::from_millis(50), pool.reserve()).await.is_err());

        drop(held);

        let _slot = timeout(Duration::from_millis(50), pool.reserve()).await.expect("slot should free up");
    }

    #[tokio::test]
    async fn submit_runs_the_task_and_releases_the_slot() {
        let pool = WorkerPool::new(1);
        let (tx, rx) = oneshot::channel();

        let slot = pool.reserve().await;
        let handle = pool.submit(slot, async move {
            tx.send(()).unwrap();
        });

        rx.await.unwrap();
        handle.await.unwrap();

        assert_eq!(pool.in_flight(), 0);
    }

    #[tokio::test]
    async fn panicking_task_still_releases_the_slot() {
        let pool = WorkerPool::new(1);

        let slot = pool.reserve().await;
        let handle = pool.submit(slot, async {
            panic!("task blew up");
        });

        assert!(handle.await.is_err());
        assert_eq!(pool.in_flight(), 0);
        assert!(pool.try_reserve().is_some());
    }
}
