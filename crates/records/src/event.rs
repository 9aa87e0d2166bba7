use super::*;
use mealshare_core::Count;
use mealshare_core::Error;
use mealshare_core::Hours;
use mealshare_core::ID;
use mealshare_core::Result;
use mealshare_core::Unique;
use std::time::SystemTime;

/// Lifecycle of a donation event.
///
/// Upcoming events accept applications, active events accept check-ins,
/// and past or canceled events are frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Upcoming,
    Active,
    Past,
    Canceled,
}

impl EventStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Active => "active",
            Self::Past => "past",
            Self::Canceled => "canceled",
        }
    }
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Past | Self::Canceled)
    }
    /// Validate a transition, returning the new status.
    pub fn advance(self, to: Self) -> Result<Self> {
        match (self, to) {
            (Self::Upcoming, Self::Active)
            | (Self::Upcoming, Self::Canceled)
            | (Self::Active, Self::Past)
            | (Self::Active, Self::Canceled) => Ok(to),
            (from, to) => Err(Error::InvalidState(format!(
                "event cannot move from {} to {}",
                from, to
            ))),
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventStatus {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "upcoming" => Ok(Self::Upcoming),
            "active" => Ok(Self::Active),
            "past" => Ok(Self::Past),
            "canceled" => Ok(Self::Canceled),
            other => Err(Error::Invalid(format!("unknown event status {:?}", other))),
        }
    }
}

/// Caller-supplied fields for a new event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub description: String,
    pub location: String,
    pub starts: SystemTime,
    pub ends: SystemTime,
    pub max_guests: Count,
    pub max_volunteers: Count,
}

impl Draft {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Invalid("title is required".into()));
        }
        if self.ends <= self.starts {
            return Err(Error::Invalid("event must end after it starts".into()));
        }
        if self.max_guests < 0 || self.max_volunteers < 0 {
            return Err(Error::Invalid("limits must not be negative".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Event {
    pub id: ID<Self>,
    pub restaurant: ID<Restaurant>,
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(with = "mealshare_core::epoch")]
    pub starts: SystemTime,
    #[serde(with = "mealshare_core::epoch")]
    pub ends: SystemTime,
    pub max_guests: Count,
    pub current_guests: Count,
    pub max_volunteers: Count,
    pub meals_served: Count,
    pub status: EventStatus,
}

impl Event {
    /// A fresh upcoming event with zeroed tallies.
    pub fn draft(restaurant: ID<Restaurant>, draft: Draft) -> Self {
        Self {
            id: ID::default(),
            restaurant,
            title: draft.title,
            description: draft.description,
            location: draft.location,
            starts: draft.starts,
            ends: draft.ends,
            max_guests: draft.max_guests,
            current_guests: 0,
            max_volunteers: draft.max_volunteers,
            meals_served: 0,
            status: EventStatus::Upcoming,
        }
    }
    /// Whole hours between start and end.
    pub fn hours(&self) -> Hours {
        self.ends
            .duration_since(self.starts)
            .map(|d| (d.as_secs() / 3600) as Hours)
            .unwrap_or_default()
    }
    /// Whether `crew` assignments leave room for another volunteer.
    pub fn has_room(&self, crew: usize) -> bool {
        (crew as i64) < self.max_volunteers as i64
    }
}

impl Unique for Event {
    fn id(&self) -> ID<Self> {
        self.id
    }
}
