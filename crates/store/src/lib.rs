//! Persistence seams and the unit-of-work coordinator.
//!
//! Repositories are implemented twice per backend: once by the store itself
//! (each call commits on its own) and once by the backend's transaction
//! handle (calls are staged until [`Unit::commit`]). Workflows only ever see
//! the traits, so the same code runs against PostgreSQL and [`Memory`].
//!
//! ## Repositories
//!
//! - [`IdentityRepository`] — Credentials and uniqueness checks
//! - [`RestaurantRepository`] / [`VolunteerRepository`] — Profiles and counters
//! - [`EventRepository`] — Events, row locks, and status writes
//! - [`ApplicationRepository`] / [`AssignmentRepository`] — Staffing
//!
//! ## Transactions
//!
//! - [`Store`] — Autocommit access plus [`Store::begin`]
//! - [`Unit`] — An open transaction handle
//! - [`Coordinator`] — Runs a closure inside a unit with commit/rollback and a deadline
mod coordinator;
mod memory;
mod repository;

pub use coordinator::*;
pub use memory::*;
pub use repository::*;
