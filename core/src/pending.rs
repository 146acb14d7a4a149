//! Outstanding-job counter gating `Dispatcher::wait`

use std::sync::Arc;
use tokio::sync::watch;

/// Number of jobs submitted but not yet completed
///
/// Incremented once per submit, decremented once per completion. Cloning
/// shares the same counter.
#[derive(Debug, Clone)]
pub struct PendingCount {
    tx: Arc<watch::Sender<usize>>,
}

impl Default for PendingCount {
    fn default() -> Self {
        Self::new()
    }
}

impl PendingCount {
    /// Create a counter at zero
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    /// Add `n` outstanding jobs
    pub fn add(&self, n: usize) {
        self.tx.send_modify(|count| *count += n);
    }

    /// Mark one job complete
    pub fn done(&self) {
        self.tx.send_modify(|count| *count = count.saturating_sub(1));
    }

    /// Current count
    pub fn get(&self) -> usize {
        *self.tx.borrow()
    }

    /// Guard that calls [`done`](Self::done) when dropped
    pub fn guard(&self) -> CompletionGuard {
        CompletionGuard {
            pending: self.clone(),
        }
    }

    /// Resolve once the count reaches zero
    pub async fn wait_zero(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in self, so the channel cannot close here.
        let _ = rx.wait_for(|count| *count == 0).await;
    }
}

/// Releases one pending entry on drop, including during unwinding
#[derive(Debug)]
pub struct CompletionGuard {
    pending: PendingCount,
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        self.pending.done();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_add_and_done() {
        let pending = PendingCount::new();
        pending.add(3);
        pending.done();
        assert_eq!(pending.get(), 2);
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let pending = PendingCount::new();
        pending.add(1);
        {
            let _guard = pending.guard();
            assert_eq!(pending.get(), 1);
        }
        assert_eq!(pending.get(), 0);
    }

    #[tokio::test]
    async fn test_wait_zero_returns_immediately_when_empty() {
        let pending = PendingCount::new();
        tokio::time::timeout(Duration::from_millis(100), pending.wait_zero())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_wait_zero_blocks_until_released() {
        let pending = PendingCount::new();
        pending.add(2);

        let waiter = {
            let pending = pending.clone();
            tokio::spawn(async move { pending.wait_zero().await })
        };

        pending.done();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        pending.done();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }
}
