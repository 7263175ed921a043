//! FIFO queue of ready pre-parameter sets.
//!
//! The queue does not enforce a capacity; the pool's pump decides how many
//! entries to insert. Readers block on an empty queue and are woken by
//! inserts.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;

/// Ordered buffer with blocking removal.
pub struct ParamsQueue<T> {
    /// Entries in insertion order. Never locked across an `.await`.
    entries: Mutex<VecDeque<T>>,
    /// Signalled once per insert.
    inserted: Notify,
}

impl<T> ParamsQueue<T> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            inserted: Notify::new(),
        }
    }

    fn entries(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an entry to the tail and wake one blocked reader.
    ///
    /// Returns the queue length after the insert.
    pub fn insert(&self, item: T) -> usize {
        let len = {
            let mut entries = self.entries();
            entries.push_back(item);
            entries.len()
        };
        // With no waiter registered the permit is stored, so a reader that
        // saw the queue empty but has not started waiting yet still wakes.
        self.inserted.notify_one();
        len
    }

    /// Remove the head if there is one.
    pub fn try_remove_head(&self) -> Option<T> {
        self.entries().pop_front()
    }

    /// Remove the head, waiting for an insert while the queue is empty.
    ///
    /// Cancel safe: dropping the future never loses an entry, and a wakeup
    /// received by a dropped waiter is passed on to the next one.
    pub async fn remove_head(&self) -> T {
        loop {
            // Register as a waiter before looking at the queue, so an insert
            // landing between the check and the await wakes this reader.
            let notified = self.inserted.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(item) = self.try_remove_head() {
                return item;
            }
            notified.await;
        }
    }

    pub fn size(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl<T> Default for ParamsQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_fifo_order() {
        let queue = ParamsQueue::new();
        assert_eq!(queue.insert(1), 1);
        assert_eq!(queue.insert(2), 2);
        assert_eq!(queue.insert(3), 3);

        assert_eq!(queue.try_remove_head(), Some(1));
        assert_eq!(queue.try_remove_head(), Some(2));
        assert_eq!(queue.size(), 1);
        assert_eq!(queue.try_remove_head(), Some(3));
        assert_eq!(queue.try_remove_head(), None);
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_remove_head_returns_immediately_when_not_empty() {
        let queue = ParamsQueue::new();
        queue.insert("ready");

        let item = tokio::time::timeout(Duration::from_secs(1), queue.remove_head())
            .await
            .expect("remove_head should not block on a non-empty queue");
        assert_eq!(item, "ready");
    }

    #[tokio::test]
    async fn test_remove_head_waits_for_insert() {
        let queue = Arc::new(ParamsQueue::new());

        let reader = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.remove_head().await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!reader.is_finished());

        queue.insert(42u32);
        let item = tokio::time::timeout(Duration::from_secs(1), reader)
            .await
            .expect("reader should wake after insert")
            .unwrap();
        assert_eq!(item, 42);
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_insert_before_wait_is_not_missed() {
        let queue = ParamsQueue::new();

        // The permit stored by this insert must be observed by the reader.
        queue.insert(7u32);
        assert_eq!(queue.remove_head().await, 7);

        queue.insert(8u32);
        let item = tokio::time::timeout(Duration::from_secs(1), queue.remove_head())
            .await
            .unwrap();
        assert_eq!(item, 8);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_each_insert_serves_one_waiter() {
        let queue = Arc::new(ParamsQueue::new());

        let mut readers = Vec::new();
        for _ in 0..4 {
            let queue = Arc::clone(&queue);
            readers.push(tokio::spawn(async move { queue.remove_head().await }));
        }

        tokio::time::sleep(Duration::from_millis(50)).await;
        for i in 0..4u32 {
            queue.insert(i);
        }

        let mut received = Vec::new();
        for reader in readers {
            let item = tokio::time::timeout(Duration::from_secs(1), reader)
                .await
                .expect("every waiter should be served")
                .unwrap();
            received.push(item);
        }
        received.sort_unstable();
        assert_eq!(received, vec![0, 1, 2, 3]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_wake_every_reader() {
        const READERS: usize = 4;

        for round in 0..500 {
            let queue = Arc::new(ParamsQueue::new());
            let start = Arc::new(tokio::sync::Barrier::new(2 * READERS));

            let readers: Vec<_> = (0..READERS)
                .map(|_| {
                    let queue = Arc::clone(&queue);
                    let start = Arc::clone(&start);
                    tokio::spawn(async move {
                        start.wait().await;
                        queue.remove_head().await
                    })
                })
                .collect();
            let inserters: Vec<_> = (0..READERS)
                .map(|i| {
                    let queue = Arc::clone(&queue);
                    let start = Arc::clone(&start);
                    tokio::spawn(async move {
                        start.wait().await;
                        queue.insert(i);
                    })
                })
                .collect();

            for inserter in inserters {
                inserter.await.unwrap();
            }
            let mut received = Vec::new();
            for reader in readers {
                let item = tokio::time::timeout(Duration::from_secs(2), reader)
                    .await
                    .unwrap_or_else(|_| panic!("reader left blocked in round {}", round))
                    .unwrap();
                received.push(item);
            }
            received.sort_unstable();
            assert_eq!(received, (0..READERS).collect::<Vec<_>>());
            assert!(queue.is_empty());
        }
    }

    #[tokio::test]
    async fn test_cancelled_reader_does_not_consume_entry() {
        let queue = ParamsQueue::new();

        let timed_out = tokio::time::timeout(Duration::from_millis(20), queue.remove_head()).await;
        assert!(timed_out.is_err());

        queue.insert(5u32);
        assert_eq!(queue.size(), 1);
        assert_eq!(queue.remove_head().await, 5);
    }
}
