use mealshare_core::Error;
use mealshare_core::Result;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Duration;
use std::time::Instant;

/// String key/value store with per-key expiry.
#[allow(async_fn_in_trait)]
pub trait Cache {
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn del(&self, key: &str) -> Result<()>;
}

/// Redis-backed cache. The connection manager reconnects on its own and is
/// cheap to clone per command.
#[derive(Clone)]
pub struct Redis(redis::aio::ConnectionManager);

impl Redis {
    pub async fn connect(url: &str) -> Result<Self> {
        log::info!("[redis] connecting to session cache");
        let config = redis::aio::ConnectionManagerConfig::new().set_number_of_retries(1);
        redis::Client::open(url)
            .map_err(Error::infra)?
            .get_connection_manager_with_config(config)
            .await
            .map(Self)
            .map_err(Error::infra)
    }
}

impl Cache for Redis {
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        use redis::AsyncCommands;
        self.0
            .clone()
            .set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1))
            .await
            .map_err(Error::infra)
    }
    async fn get(&self, key: &str) -> Result<Option<String>> {
        use redis::AsyncCommands;
        self.0
            .clone()
            .get::<_, Option<String>>(key)
            .await
            .map_err(Error::infra)
    }
    async fn del(&self, key: &str) -> Result<()> {
        use redis::AsyncCommands;
        self.0
            .clone()
            .del::<_, ()>(key)
            .await
            .map_err(Error::infra)
    }
}

/// In-process cache for tests and local runs.
#[derive(Debug, Clone, Default)]
pub struct Volatile {
    entries: Arc<Mutex<HashMap<String, (String, Instant)>>>,
    broken: Arc<AtomicBool>,
}

impl Volatile {
    /// Fail every operation until [`Volatile::restore`].
    pub fn sabotage(&self) {
        self.broken.store(true, Ordering::SeqCst);
    }
    pub fn restore(&self) {
        self.broken.store(false, Ordering::SeqCst);
    }
    fn check(&self) -> Result<()> {
        match self.broken.load(Ordering::SeqCst) {
            true => Err(Error::infra("session cache unavailable")),
            false => Ok(()),
        }
    }
    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, (String, Instant)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Cache for Volatile {
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        self.check()?;
        self.entries()
            .insert(key.to_string(), (value.to_string(), Instant::now() + ttl));
        Ok(())
    }
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.check()?;
        let mut entries = self.entries();
        let found = entries
            .get(key)
            .map(|(value, expiry)| (value.clone(), *expiry <= Instant::now()));
        match found {
            Some((_, true)) => {
                entries.remove(key);
                Ok(None)
            }
            Some((value, false)) => Ok(Some(value)),
            None => Ok(None),
        }
    }
    async fn del(&self, key: &str) -> Result<()> {
        self.check()?;
        self.entries().remove(key);
        Ok(())
    }
}
