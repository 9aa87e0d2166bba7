use super::*;
use mealshare_core::Count;
use mealshare_core::Hours;
use mealshare_core::ID;
use mealshare_core::REPUTATION_PER_HOUR;
use mealshare_core::Unique;

/// Role-specific data attached one-to-one to an [`Identity`].
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Profile {
    Restaurant(Restaurant),
    Volunteer(Volunteer),
}

impl Profile {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Restaurant(_) => Kind::Restaurant,
            Self::Volunteer(_) => Kind::Volunteer,
        }
    }
    pub fn user(&self) -> ID<Identity> {
        match self {
            Self::Restaurant(r) => r.user,
            Self::Volunteer(v) => v.user,
        }
    }
}

impl From<Restaurant> for Profile {
    fn from(restaurant: Restaurant) -> Self {
        Self::Restaurant(restaurant)
    }
}

impl From<Volunteer> for Profile {
    fn from(volunteer: Volunteer) -> Self {
        Self::Volunteer(volunteer)
    }
}

/// Restaurant profile. `total_events` and `meals_served` always equal the
/// facts derived from the restaurant's events.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Restaurant {
    pub id: ID<Self>,
    pub user: ID<Identity>,
    pub name: String,
    pub address: String,
    pub contact_number: String,
    pub total_events: Count,
    pub meals_served: Count,
    pub rating: f64,
}

impl Restaurant {
    pub fn new(user: ID<Identity>, name: String, address: String, contact_number: String) -> Self {
        Self {
            id: ID::default(),
            user,
            name,
            address,
            contact_number,
            total_events: 0,
            meals_served: 0,
            rating: 0.0,
        }
    }
    /// Apply counter deltas.
    pub fn tally(&mut self, events: Count, meals: Count) {
        self.total_events += events;
        self.meals_served += meals;
    }
}

impl Unique for Restaurant {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

/// Volunteer profile. Counters are credited when an event they checked in
/// to completes.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Volunteer {
    pub id: ID<Self>,
    pub user: ID<Identity>,
    pub full_name: String,
    pub phone_number: String,
    pub address: String,
    pub tasks_completed: Count,
    pub hours_volunteered: Hours,
    pub meals_served: Count,
    pub reputation_points: Count,
}

impl Volunteer {
    pub fn new(user: ID<Identity>, full_name: String, phone_number: String, address: String) -> Self {
        Self {
            id: ID::default(),
            user,
            full_name,
            phone_number,
            address,
            tasks_completed: 0,
            hours_volunteered: 0,
            meals_served: 0,
            reputation_points: 0,
        }
    }
    pub fn credit(&mut self, credit: &Credit) {
        self.tasks_completed += credit.tasks;
        self.hours_volunteered += credit.hours;
        self.meals_served += credit.meals;
        self.reputation_points += credit.reputation;
    }
}

impl Unique for Volunteer {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

/// Counter deltas earned by one checked-in assignment of a completed event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct Credit {
    pub tasks: Count,
    pub hours: Hours,
    pub meals: Count,
    pub reputation: Count,
}

impl Credit {
    /// One shift of `event`, with meals split evenly across a crew of `crew` volunteers.
    pub fn shift(event: &Event, crew: usize) -> Self {
        let hours = event.hours();
        Self {
            tasks: 1,
            hours,
            meals: event.meals_served / crew.max(1) as Count,
            reputation: hours * REPUTATION_PER_HOUR,
        }
    }
}
