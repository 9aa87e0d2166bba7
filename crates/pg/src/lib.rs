//! PostgreSQL implementation of the mealshare store.
//!
//! Autocommit calls borrow a pooled connection per statement. A unit of work
//! pins one connection for its lifetime and brackets it with `BEGIN` and
//! `COMMIT`/`ROLLBACK`. Dropping an open unit removes its connection from
//! the pool, which closes it and lets the server abort the transaction.
//!
//! ## Connectivity
//!
//! - [`connect()`] — Builds the pool from [`Config`]
//! - [`Postgres::migrate`] — Creates tables and indices
//!
//! ## Serialization
//!
//! - [`Schema`] — Table DDL
//! - [`Hydrate`] — Row decoding
mod hydrate;
mod repository;
mod schema;

pub use hydrate::*;
pub use schema::*;

use deadpool_postgres::Manager;
use deadpool_postgres::ManagerConfig;
use deadpool_postgres::Object;
use deadpool_postgres::Pool;
use deadpool_postgres::RecyclingMethod;
use mealshare_core::Config;
use mealshare_core::Error;
use mealshare_core::Result;
use mealshare_store::Store;
use mealshare_store::Unit;
use tokio_postgres::Client;
use tokio_postgres::error::SqlState;

/// PostgreSQL error type alias.
pub type PgErr = tokio_postgres::Error;

#[rustfmt::skip]
pub const USERS:        &str = "users";
#[rustfmt::skip]
pub const RESTAURANTS:  &str = "restaurants";
#[rustfmt::skip]
pub const VOLUNTEERS:   &str = "volunteers";
#[rustfmt::skip]
pub const EVENTS:       &str = "events";
#[rustfmt::skip]
pub const APPLICATIONS: &str = "applications";
#[rustfmt::skip]
pub const ASSIGNMENTS:  &str = "assignments";

/// Builds a connection pool. No connection is opened until first use.
pub async fn connect(config: &Config) -> Result<Postgres> {
    log::info!("[pg] connecting to database");
    let pg = config
        .database
        .parse::<tokio_postgres::Config>()
        .map_err(Error::infra)?;
    let manager = Manager::from_config(
        pg,
        tokio_postgres::NoTls,
        ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        },
    );
    let pool = Pool::builder(manager)
        .max_size(config.pool)
        .build()
        .map_err(Error::infra)?;
    Ok(Pg {
        source: Pooled(pool),
    })
}

/// Maps driver errors onto the shared taxonomy.
pub fn fault(e: PgErr) -> Error {
    match e.code() {
        Some(code) if *code == SqlState::UNIQUE_VIOLATION => Error::Conflict(
            e.as_db_error()
                .map(|db| db.message().to_string())
                .unwrap_or_else(|| String::from("duplicate record")),
        ),
        Some(code) if *code == SqlState::FOREIGN_KEY_VIOLATION => {
            Error::NotFound("referenced record")
        }
        _ => Error::infra(e),
    }
}

/// Where a [`Pg`] handle gets its connection from.
#[allow(async_fn_in_trait)]
pub trait Source {
    async fn lease(&self) -> Result<Lease<'_>>;
}

/// A connection for the duration of one statement.
pub enum Lease<'a> {
    Owned(Object),
    Borrowed(&'a Object),
}

impl std::ops::Deref for Lease<'_> {
    type Target = Client;
    fn deref(&self) -> &Client {
        match self {
            Self::Owned(object) => object,
            Self::Borrowed(object) => object,
        }
    }
}

/// Autocommit: one pooled connection per statement.
#[derive(Clone)]
pub struct Pooled(Pool);

/// A pinned connection inside `BEGIN`. Emptied on commit or rollback.
pub struct Held(Option<Object>);

impl Source for Pooled {
    async fn lease(&self) -> Result<Lease<'_>> {
        self.0.get().await.map(Lease::Owned).map_err(Error::infra)
    }
}

impl Source for Held {
    async fn lease(&self) -> Result<Lease<'_>> {
        self.0
            .as_ref()
            .map(Lease::Borrowed)
            .ok_or_else(|| Error::infra("transaction already finished"))
    }
}

impl Held {
    async fn finish(&mut self, statement: &str) -> Result<()> {
        let object = self
            .0
            .take()
            .ok_or_else(|| Error::infra("transaction already finished"))?;
        match object.batch_execute(statement).await {
            Ok(()) => Ok(()),
            Err(e) => {
                drop(Object::take(object));
                Err(fault(e))
            }
        }
    }
}

impl Drop for Held {
    fn drop(&mut self) {
        if let Some(object) = self.0.take() {
            log::warn!("[pg] unit dropped while open, discarding its connection");
            drop(Object::take(object));
        }
    }
}

#[derive(Clone)]
pub struct Pg<S> {
    source: S,
}

pub type Postgres = Pg<Pooled>;
pub type PgTx = Pg<Held>;

impl<S> Pg<S>
where
    S: Source,
{
    async fn lease(&self) -> Result<Lease<'_>> {
        self.source.lease().await
    }
}

impl Postgres {
    /// Creates every table and index that does not exist yet.
    pub async fn migrate(&self) -> Result<()> {
        let client = self.lease().await?;
        client
            .batch_execute("SET client_min_messages TO WARNING")
            .await
            .map_err(fault)?;
        for (name, creates, indices) in tables() {
            log::info!("[pg] migrating {}", name);
            client.batch_execute(creates).await.map_err(fault)?;
            client.batch_execute(indices).await.map_err(fault)?;
        }
        Ok(())
    }
}

impl Store for Postgres {
    type Tx = PgTx;
    async fn begin(&self) -> Result<PgTx> {
        let object = self.source.0.get().await.map_err(Error::infra)?;
        object.batch_execute("BEGIN").await.map_err(fault)?;
        Ok(Pg {
            source: Held(Some(object)),
        })
    }
    async fn ping(&self) -> Result<()> {
        self.lease()
            .await?
            .batch_execute("SELECT 1")
            .await
            .map_err(fault)
    }
}

impl Unit for PgTx {
    async fn commit(mut self) -> Result<()> {
        self.source.finish("COMMIT").await
    }
    async fn rollback(mut self) -> Result<()> {
        self.source.finish("ROLLBACK").await
    }
}
