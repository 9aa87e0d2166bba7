use mealshare_core::ID;
use mealshare_records::Identity;
use std::time::Duration;
use std::time::SystemTime;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    pub sub: uuid::Uuid,
    /// Unique per token, so two tokens for one user never collide.
    pub sid: uuid::Uuid,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user: ID<Identity>, ttl: Duration) -> Self {
        let now = mealshare_core::epoch::seconds(&SystemTime::now()) as i64;
        Self {
            sub: user.inner(),
            sid: uuid::Uuid::now_v7(),
            iat: now,
            exp: now + ttl.as_secs() as i64,
        }
    }
    pub fn user(&self) -> ID<Identity> {
        ID::from(self.sub)
    }
    pub fn expires(&self) -> SystemTime {
        mealshare_core::epoch::time(self.exp.max(0) as u64)
    }
}
