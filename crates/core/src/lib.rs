//! Core identifiers, errors, configuration, and constants for mealshare.
//!
//! Every other crate in the workspace depends on this one for the typed
//! [`ID`] wrapper, the shared [`Error`] taxonomy, and the startup [`Config`].
mod config;
mod error;

pub use config::*;
pub use error::*;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Running tallies kept on profiles and events (meals, guests, tasks).
pub type Count = i32;
/// Whole hours of volunteered time.
pub type Hours = i32;

// ============================================================================
// TRAITS
// ============================================================================
/// Unique identifier trait for domain entities.
pub trait Unique<T = Self> {
    fn id(&self) -> ID<T>;
}

// ============================================================================
// IDENTITY TYPES
// ============================================================================
use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

/// Generic ID wrapper providing compile-time type safety over uuid::Uuid.
pub struct ID<T> {
    inner: uuid::Uuid,
    marker: PhantomData<T>,
}

impl<T> ID<T> {
    pub fn inner(&self) -> uuid::Uuid {
        self.inner
    }
    /// Cast ID<T> to ID<U> while preserving the underlying UUID.
    pub fn cast<U>(self) -> ID<U> {
        ID {
            inner: self.inner,
            marker: PhantomData,
        }
    }
}

impl<T> From<ID<T>> for uuid::Uuid {
    fn from(id: ID<T>) -> Self {
        id.inner()
    }
}
impl<T> From<uuid::Uuid> for ID<T> {
    fn from(inner: uuid::Uuid) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}

impl<T> Default for ID<T> {
    fn default() -> Self {
        Self::from(uuid::Uuid::now_v7())
    }
}

impl<T> Copy for ID<T> {}
impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Hash for ID<T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.hash(state);
    }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

/// IDs travel over the wire as bare UUID strings.
impl<T> serde::Serialize for ID<T> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.inner.serialize(serializer)
    }
}
impl<'de, T> serde::Deserialize<'de> for ID<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        uuid::Uuid::deserialize(deserializer).map(Self::from)
    }
}

// ============================================================================
// TIMESTAMPS
// ============================================================================
/// Serde adapter writing `SystemTime` as whole seconds since the Unix epoch.
pub mod epoch {
    use std::time::Duration;
    use std::time::SystemTime;
    use std::time::UNIX_EPOCH;

    pub fn seconds(time: &SystemTime) -> u64 {
        time.duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
    }
    pub fn time(seconds: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(seconds)
    }
    pub fn serialize<S>(time: &SystemTime, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u64(seconds(time))
    }
    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<SystemTime, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        <u64 as serde::Deserialize>::deserialize(deserializer).map(time)
    }
}

// ============================================================================
// SESSIONS
// ============================================================================
/// Default lifetime of a signed session token and its cache entries.
pub const SESSION_TTL: std::time::Duration = std::time::Duration::from_secs(24 * 60 * 60);
/// Default upper bound on a single unit of work against the durable store.
pub const TX_DEADLINE: std::time::Duration = std::time::Duration::from_secs(10);

// ============================================================================
// ACCOUNT RULES
// ============================================================================
/// Shortest accepted username.
pub const USERNAME_MIN: usize = 3;
/// Longest accepted username (matches the VARCHAR(32) column).
pub const USERNAME_MAX: usize = 32;
/// Shortest accepted password.
pub const PASSWORD_MIN: usize = 8;

// ============================================================================
// VOLUNTEER CREDIT
// Applied once per checked-in assignment when an event completes.
// ============================================================================
/// Reputation earned per whole hour volunteered.
pub const REPUTATION_PER_HOUR: Count = 10;
/// Completed tasks for the "First Timer" badge.
pub const BADGE_FIRST_TIMER: Count = 1;
/// Completed tasks for the "Helping Hand" badge.
pub const BADGE_HELPING_HAND: Count = 5;
/// Completed tasks for the "Community Leader" badge.
pub const BADGE_COMMUNITY_LEADER: Count = 10;
/// Role whose completion earns the "Food Server" badge.
pub const BADGE_SERVING_ROLE: &str = "Serving";
/// Roles advertised on open opportunities.
pub const ROLES: [&str; 3] = ["Food Preparation", "Serving", "Cleanup"];

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "server")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
