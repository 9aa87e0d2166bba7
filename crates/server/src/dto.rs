use mealshare_core::Count;
use mealshare_core::Error;
use mealshare_records::Draft;
use mealshare_records::EventStatus;
use mealshare_service::RestaurantDetails;
use mealshare_service::Signup;
use mealshare_service::VolunteerDetails;
use serde::Deserialize;
use std::time::SystemTime;

#[derive(Deserialize)]
pub struct RegisterRestaurant {
    #[serde(flatten)]
    pub signup: Signup,
    #[serde(flatten)]
    pub details: RestaurantDetails,
}

#[derive(Deserialize)]
pub struct RegisterVolunteer {
    #[serde(flatten)]
    pub signup: Signup,
    #[serde(flatten)]
    pub details: VolunteerDetails,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Event times travel as unix seconds.
#[derive(Deserialize)]
pub struct CreateEvent {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub location: String,
    #[serde(with = "mealshare_core::epoch")]
    pub starts: SystemTime,
    #[serde(with = "mealshare_core::epoch")]
    pub ends: SystemTime,
    pub max_guests: Count,
    pub max_volunteers: Count,
}

impl From<CreateEvent> for Draft {
    fn from(req: CreateEvent) -> Self {
        Self {
            title: req.title,
            description: req.description,
            location: req.location,
            starts: req.starts,
            ends: req.ends,
            max_guests: req.max_guests,
            max_volunteers: req.max_volunteers,
        }
    }
}

#[derive(Deserialize)]
pub struct SetStatus {
    pub status: String,
}

impl SetStatus {
    pub fn status(&self) -> Result<EventStatus, Error> {
        self.status.parse()
    }
}

#[derive(Deserialize)]
pub struct SetCount {
    pub count: Count,
}

#[derive(Deserialize)]
pub struct ApplyRequest {
    pub role: String,
}

#[derive(Deserialize)]
pub struct EventFilter {
    pub status: Option<String>,
}

impl EventFilter {
    pub fn status(&self) -> Result<Option<EventStatus>, Error> {
        self.status.as_deref().map(str::parse).transpose()
    }
}
