//! # Mailboxes
//!
//! An unbounded FIFO queue with non-blocking `push` and blocking `pop`.
//!
//! Every queue an actor owns (inbox, staging buffer, persisted output) is a
//! [`Mailbox`]. Pushing never waits, so a producer can never be blocked by a
//! slow consumer; there is no backpressure.
//!
//! Popping is cancel-safe: an item is only removed from the queue inside a
//! synchronous critical section, so dropping a pending `pop()` future (for
//! example when a timeout fires or the run is cancelled) never loses a message.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;
use tokio::sync::Notify;

pub struct Mailbox<T> {
    queue: Mutex<VecDeque<T>>,
    ready: Notify,
}

impl<T> Mailbox<T> {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            ready: Notify::new(),
        }
    }

    /// Appends an item and wakes one waiting consumer.
    pub fn push(&self, item: T) {
        self.queue.lock().push_back(item);
        self.ready.notify_one();
    }

    pub fn try_pop(&self) -> Option<T> {
        self.queue.lock().pop_front()
    }

    /// Waits until an item is available and removes it.
    pub async fn pop(&self) -> T {
        loop {
            // Register interest before checking, so a push that lands between
            // the check and the await still leaves a permit behind.
            let notified = self.ready.notified();
            if let Some(item) = self.try_pop() {
                return item;
            }
            notified.await;
        }
    }

    /// Like [`Mailbox::pop`] but gives up after `timeout`.
    pub async fn pop_timeout(&self, timeout: Duration) -> Option<T> {
        tokio::time::timeout(timeout, self.pop()).await.ok()
    }

    /// Removes and returns everything currently queued.
    pub fn drain(&self) -> Vec<T> {
        self.queue.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Mailbox<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mailbox").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_fifo_order() {
        let mailbox = Mailbox::new();
        for i in 0..5 {
            mailbox.push(i);
        }
        assert_eq!(mailbox.len(), 5);
        for i in 0..5 {
            assert_eq!(mailbox.pop().await, i);
        }
        assert!(mailbox.is_empty());
    }

    #[tokio::test]
    async fn test_pop_waits_for_push() {
        let mailbox = Arc::new(Mailbox::new());
        let consumer = {
            let mailbox = mailbox.clone();
            tokio::spawn(async move { mailbox.pop().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!consumer.is_finished());

        mailbox.push("late");
        assert_eq!(consumer.await.unwrap(), "late");
    }

    #[tokio::test]
    async fn test_pop_timeout_elapses_on_empty_queue() {
        let mailbox: Mailbox<u8> = Mailbox::new();
        assert_eq!(mailbox.pop_timeout(Duration::from_millis(10)).await, None);

        mailbox.push(1);
        assert_eq!(mailbox.pop_timeout(Duration::from_millis(10)).await, Some(1));
    }

    #[tokio::test]
    async fn test_cancelled_pop_loses_nothing() {
        let mailbox = Mailbox::new();
        // Time out a waiting consumer, then push: the item must still be there.
        assert_eq!(mailbox.pop_timeout(Duration::from_millis(5)).await, None);
        mailbox.push(9);
        assert_eq!(mailbox.try_pop(), Some(9));
        assert_eq!(mailbox.try_pop(), None);
    }

    #[test]
    fn test_drain_empties_queue() {
        let mailbox = Mailbox::new();
        mailbox.push('a');
        mailbox.push('b');
        assert_eq!(mailbox.drain(), vec!['a', 'b']);
        assert!(mailbox.is_empty());
    }
}
