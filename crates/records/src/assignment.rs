use super::*;
use mealshare_core::ID;
use mealshare_core::Unique;

/// A volunteer's confirmed slot on an event.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Assignment {
    pub id: ID<Self>,
    pub event: ID<Event>,
    pub volunteer: ID<Volunteer>,
    pub role: String,
    pub checked_in: bool,
}

impl Assignment {
    /// The assignment an approved application turns into.
    pub fn enlist(application: &Application) -> Self {
        Self {
            id: ID::default(),
            event: application.event,
            volunteer: application.volunteer,
            role: application.role.clone(),
            checked_in: false,
        }
    }
}

impl Unique for Assignment {
    fn id(&self) -> ID<Self> {
        self.id
    }
}
