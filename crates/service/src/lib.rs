//! Workflows that keep aggregates consistent.
//!
//! Every multi-entity write runs as one unit of work through the
//! [`Coordinator`], so profiles, events, applications, and assignments
//! change together or not at all. Sessions are issued only after the
//! durable write has committed.
//!
//! ## Accounts
//!
//! - [`Service::register_restaurant`] / [`Service::register_volunteer`]
//! - [`Service::login`], [`Service::whoami`], [`Service::refresh`], [`Service::logout`]
//!
//! ## Events
//!
//! - [`Service::create_event`], [`Service::delete_event`]
//! - [`Service::update_meals_served`], [`Service::update_guest_count`]
//! - [`Service::update_status`], [`Service::complete_event`]
//!
//! ## Staffing
//!
//! - [`Service::apply`], [`Service::approve`], [`Service::decline`], [`Service::check_in`]
//!
//! ## Read models
//!
//! - [`Stats`], [`Dashboard`], [`Task`], [`Opportunity`], [`Crew`]
mod applications;
mod events;
mod registry;
mod restaurants;
mod volunteers;

pub use applications::*;
pub use registry::*;
pub use restaurants::*;
pub use volunteers::*;

use mealshare_auth::Cache;
use mealshare_auth::Crypto;
use mealshare_auth::Sessions;
use mealshare_core::Config;
use mealshare_core::Result;
use mealshare_store::Coordinator;
use mealshare_store::Store;

/// Entry point for every workflow.
pub struct Service<S, C> {
    tx: Coordinator<S>,
    sessions: Sessions<C>,
}

impl<S, C> Service<S, C>
where
    S: Store,
    C: Cache,
{
    pub fn new(store: S, cache: C, config: &Config) -> Self {
        Self {
            tx: Coordinator::new(store, config.deadline),
            sessions: Sessions::new(
                Crypto::new(config.secret.as_bytes()),
                cache,
                config.session_ttl,
            ),
        }
    }
    pub fn store(&self) -> &S {
        self.tx.store()
    }
    pub fn sessions(&self) -> &Sessions<C> {
        &self.sessions
    }
    /// Durable store reachability.
    pub async fn health(&self) -> Result<()> {
        self.store().ping().await
    }
}
