//! Domain records and lifecycle state machines.
//!
//! Plain data for everything the durable store persists, plus the status
//! transitions that govern events and volunteer applications.
//!
//! ## Accounts
//!
//! - [`Identity`] — Durable credential record with its [`Kind`]
//! - [`Profile`] — Tagged [`Restaurant`] or [`Volunteer`] profile
//!
//! ## Events
//!
//! - [`Event`] — Donation event owned by a restaurant
//! - [`EventStatus`] — upcoming → active → past, or → canceled
//! - [`Draft`] — Caller-supplied fields for a new event
//!
//! ## Staffing
//!
//! - [`Application`] — Volunteer request to staff an event
//! - [`ApplicationStatus`] — pending → approved | declined
//! - [`Assignment`] — Created when an application is approved
//! - [`Credit`] — Volunteer counters earned by a completed assignment
//! - [`Badge`] — Threshold achievements
mod application;
mod assignment;
mod badge;
mod event;
mod identity;
mod profile;

pub use application::*;
pub use assignment::*;
pub use badge::*;
pub use event::*;
pub use identity::*;
pub use profile::*;
