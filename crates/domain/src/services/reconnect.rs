//! Reconnect-once policy for persist operations.
//!
//! A connection inherited across a fork fails on first use. The policy is:
//! on a stale-connection error, reconnect and run the operation exactly once
//! more. Whatever the second attempt returns is final.

use std::future::Future;

use tracing::warn;

use super::store::{HiveStore, StoreResult};
use crate::error::StoreError;

/// Run `op`, retrying it once on a fresh connection if the first attempt
/// hit a stale connection.
///
/// Errors other than [`StoreError::StaleConnection`] are returned without a
/// retry. A failing `reconnect` is returned as-is.
pub async fn persist_with_reconnect<S, T, F, Fut>(
    store: &S,
    operation: &str,
    mut op: F,
) -> StoreResult<T>
where
    S: HiveStore + ?Sized,
    F: FnMut() -> Fut,
    Fut: Future<Output = StoreResult<T>>,
{
    match op().await {
        Err(StoreError::StaleConnection(err)) => {
            warn!(
                operation = %operation,
                error = %err,
                "Stale database connection, reconnecting and retrying once"
            );
            store.reconnect().await?;
            op().await
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::InMemoryHiveStore;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_success_runs_once() {
        let store = InMemoryHiveStore::new();
        let counter = AtomicU32::new(0);
        let calls = &counter;

        let result = persist_with_reconnect(&store, "test", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, StoreError>(42)
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(store.reconnect_count(), 0);
    }

    #[tokio::test]
    async fn test_stale_then_success_retries_once() {
        let store = InMemoryHiveStore::new();
        let counter = AtomicU32::new(0);
        let calls = &counter;

        let result = persist_with_reconnect(&store, "test", move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(StoreError::from(sqlx::Error::PoolClosed))
            } else {
                Ok(7)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(store.reconnect_count(), 1);
    }

    #[tokio::test]
    async fn test_second_stale_failure_propagates() {
        let store = InMemoryHiveStore::new();
        let counter = AtomicU32::new(0);
        let calls = &counter;

        let result: StoreResult<()> = persist_with_reconnect(&store, "test", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::from(sqlx::Error::PoolClosed))
        })
        .await;

        assert!(result.unwrap_err().is_stale_connection());
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(store.reconnect_count(), 1);
    }

    #[tokio::test]
    async fn test_other_errors_are_not_retried() {
        let store = InMemoryHiveStore::new();
        let counter = AtomicU32::new(0);
        let calls = &counter;

        let result: StoreResult<()> = persist_with_reconnect(&store, "test", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Conflict("duplicate".to_string()))
        })
        .await;

        assert!(matches!(result, Err(StoreError::Conflict(_))));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(store.reconnect_count(), 0);
    }
}
