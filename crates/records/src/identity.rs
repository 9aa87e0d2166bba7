use mealshare_core::Error;
use mealshare_core::ID;
use mealshare_core::Unique;
use std::time::SystemTime;

/// Which profile, if any, hangs off an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Plain,
    Restaurant,
    Volunteer,
}

impl Kind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Restaurant => "restaurant",
            Self::Volunteer => "volunteer",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Kind {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(Self::Plain),
            "restaurant" => Ok(Self::Restaurant),
            "volunteer" => Ok(Self::Volunteer),
            other => Err(Error::infra(format!("unknown identity kind {:?}", other))),
        }
    }
}

/// Durable account record. The password hash is stored alongside it but is
/// never part of the domain value.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Identity {
    pub id: ID<Self>,
    pub username: String,
    pub email: String,
    pub kind: Kind,
    #[serde(with = "mealshare_core::epoch")]
    pub created: SystemTime,
}

impl Identity {
    pub fn new(username: String, email: String, kind: Kind) -> Self {
        Self {
            id: ID::default(),
            username,
            email,
            kind,
            created: SystemTime::now(),
        }
    }
}

impl Unique for Identity {
    fn id(&self) -> ID<Self> {
        self.id
    }
}
