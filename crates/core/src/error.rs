/// Failure taxonomy shared by every layer of the workspace.
///
/// Precondition failures are detected before any write and carry a short
/// human-readable reason. Store and cache faults arrive as [`Error::Infrastructure`]
/// and are surfaced unchanged after rollback.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Entity id unknown. Carries the entity name.
    #[error("{0} not found")]
    NotFound(&'static str),
    /// Uniqueness violation (duplicate handle, contact address, or active application).
    #[error("conflict: {0}")]
    Conflict(String),
    /// Operation is not legal for the entity's current status.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Assignment or guest limits reached.
    #[error("capacity exceeded: {0}")]
    CapacityExceeded(String),
    /// Malformed caller input.
    #[error("invalid input: {0}")]
    Invalid(String),
    /// Session missing, malformed, expired, or revoked.
    #[error("unauthenticated")]
    Unauthenticated,
    /// Actor does not own the resource.
    #[error("unauthorized")]
    Unauthorized,
    /// Account was committed but no session could be issued; login may be retried.
    #[error("account {0} created but no session could be issued")]
    SessionUnavailable(uuid::Uuid),
    /// Underlying store or cache unavailable.
    #[error("infrastructure failure: {0}")]
    Infrastructure(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub fn infra<E>(source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Infrastructure(source.into())
    }
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::Infrastructure(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
