use super::*;
use mealshare_core::Error;
use mealshare_core::ID;
use mealshare_core::Result;
use mealshare_core::Unique;
use std::time::SystemTime;

/// Status of a volunteer application. Only pending applications move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Declined,
}

impl ApplicationStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Declined => "declined",
        }
    }
    /// Pending and approved applications block a second one for the same event.
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }
    pub fn approve(self) -> Result<Self> {
        self.settle(Self::Approved)
    }
    pub fn decline(self) -> Result<Self> {
        self.settle(Self::Declined)
    }
    fn settle(self, to: Self) -> Result<Self> {
        match self {
            Self::Pending => Ok(to),
            from => Err(Error::InvalidState(format!(
                "application already {}",
                from
            ))),
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "declined" => Ok(Self::Declined),
            other => Err(Error::Invalid(format!("unknown application status {:?}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Application {
    pub id: ID<Self>,
    pub event: ID<Event>,
    pub volunteer: ID<Volunteer>,
    pub role: String,
    pub status: ApplicationStatus,
    #[serde(with = "mealshare_core::epoch")]
    pub applied: SystemTime,
}

impl Application {
    pub fn new(event: ID<Event>, volunteer: ID<Volunteer>, role: String) -> Self {
        Self {
            id: ID::default(),
            event,
            volunteer,
            role,
            status: ApplicationStatus::Pending,
            applied: SystemTime::now(),
        }
    }
}

impl Unique for Application {
    fn id(&self) -> ID<Self> {
        self.id
    }
}
