use super::*;
use mealshare_core::Error;
use mealshare_core::Result;
use std::time::Duration;

/// Runs units of work against a [`Store`].
///
/// Each run begins a transaction, hands the closure a reference to it, and
/// commits on `Ok` or rolls back on `Err`. The whole run is bounded by the
/// configured deadline. If the run's future is dropped (deadline, client
/// disconnect, panic), the handle is dropped with it and the backend
/// discards the staged writes.
#[derive(Debug, Clone)]
pub struct Coordinator<S> {
    store: S,
    deadline: Duration,
}

impl<S> Coordinator<S>
where
    S: Store,
{
    pub fn new(store: S, deadline: Duration) -> Self {
        Self { store, deadline }
    }
    /// Autocommit access for reads outside any unit.
    pub fn store(&self) -> &S {
        &self.store
    }
    pub async fn run<T, F>(&self, work: F) -> Result<T>
    where
        F: AsyncFnOnce(&S::Tx) -> Result<T>,
    {
        match tokio::time::timeout(self.deadline, self.unit(work)).await {
            Ok(result) => result,
            Err(_) => {
                log::warn!("[coordinator] unit abandoned after {:?}", self.deadline);
                Err(Error::infra("transaction deadline elapsed"))
            }
        }
    }
    async fn unit<T, F>(&self, work: F) -> Result<T>
    where
        F: AsyncFnOnce(&S::Tx) -> Result<T>,
    {
        let tx = self.store.begin().await?;
        match work(&tx).await {
            Ok(value) => tx.commit().await.map(|_| value),
            Err(e) => {
                log::debug!("[coordinator] rolling back: {}", e);
                if let Err(r) = tx.rollback().await {
                    log::error!("[coordinator] rollback failed: {}", r);
                }
                Err(e)
            }
        }
    }
}
