use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use futures::future::{AbortHandle, Abortable};

use crate::error::{ConsoleError, Result};

/// Lifetime of one page.
///
/// Requests issued through [`run`](Self::run) are aborted as soon as the scope
/// is closed (or dropped), so a page that went away never sees a late answer.
/// Share it behind an `Arc` to close it from another task.
#[derive(Debug, Default)]
pub struct PageScope {
    closed: AtomicBool,
    next_id: AtomicU64,
    handles: Mutex<HashMap<u64, AbortHandle>>,
}

impl PageScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn run<F, T>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let (handle, registration) = AbortHandle::new_pair();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        {
            let mut handles = self.lock_handles();
            // checked under the lock so close() cannot slip in between
            if self.is_closed() {
                return Err(ConsoleError::Cancelled);
            }
            handles.insert(id, handle);
        }
        // finished, aborted or dropped mid-flight: the handle goes either way
        let _registered = Registered { scope: self, id };

        match Abortable::new(fut, registration).await {
            Ok(result) => result,
            Err(_aborted) => {
                tracing::debug!("request aborted: page closed");
                Err(ConsoleError::Cancelled)
            }
        }
    }

    pub fn close(&self) {
        let mut handles = self.lock_handles();
        self.closed.store(true, Ordering::SeqCst);
        for (_, handle) in handles.drain() {
            handle.abort();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Requests currently running through this scope.
    pub fn in_flight(&self) -> usize {
        self.lock_handles().len()
    }

    fn lock_handles(&self) -> std::sync::MutexGuard<'_, HashMap<u64, AbortHandle>> {
        self.handles.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for PageScope {
    fn drop(&mut self) {
        self.close();
    }
}

struct Registered<'a> {
    scope: &'a PageScope,
    id: u64,
}

impl Drop for Registered<'_> {
    fn drop(&mut self) {
        self.scope.lock_handles().remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn completed_requests_pass_through() {
        let scope = PageScope::new();
        let value = scope.run(async { Ok::<_, ConsoleError>(7) }).await.unwrap();
        assert_eq!(value, 7);
        assert_eq!(scope.in_flight(), 0);
    }

    #[tokio::test]
    async fn settled_requests_release_their_handles() {
        let scope = PageScope::new();
        for i in 0..50 {
            let _ = scope.run(async move { Ok::<_, ConsoleError>(i) }).await;
            let _ = scope
                .run(async { Err::<(), _>(ConsoleError::validation("x")) })
                .await;
        }
        assert_eq!(scope.in_flight(), 0);

        // a request whose caller gives up is released too
        let slow = scope.run(async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok::<_, ConsoleError>(())
        });
        let timed_out = tokio::time::timeout(Duration::from_millis(20), slow).await;
        assert!(timed_out.is_err());
        assert_eq!(scope.in_flight(), 0);
    }

    #[tokio::test]
    async fn closing_aborts_in_flight_requests() {
        let scope = Arc::new(PageScope::new());

        let pending = {
            let scope = scope.clone();
            tokio::spawn(async move {
                scope
                    .run(async {
                        tokio::time::sleep(Duration::from_secs(30)).await;
                        Ok::<_, ConsoleError>(())
                    })
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        scope.close();

        let result = pending.await.unwrap();
        assert!(matches!(result, Err(ConsoleError::Cancelled)));
        assert_eq!(scope.in_flight(), 0);
    }

    #[tokio::test]
    async fn closed_scope_refuses_new_requests() {
        let scope = PageScope::new();
        scope.close();
        let result = scope.run(async { Ok::<_, ConsoleError>(()) }).await;
        assert!(matches!(result, Err(ConsoleError::Cancelled)));
    }
}
