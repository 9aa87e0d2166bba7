use super::*;
use mealshare_core::Error;
use mealshare_core::ID;
use mealshare_core::Result;
use mealshare_records::Identity;
use std::time::Duration;
use std::time::SystemTime;

/// A freshly issued session token.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Ticket {
    pub token: String,
    #[serde(with = "mealshare_core::epoch")]
    pub expires: SystemTime,
}

fn user_key(user: ID<Identity>) -> String {
    format!("user:{}:token", user)
}
fn token_key(token: &str) -> String {
    format!("token:{}", token)
}

/// Session lifecycle over a signer and a cache.
///
/// Each identity holds at most one live token: issuing displaces whatever
/// the cache currently maps the user to. Writes go user-key first, so a
/// token that resolves to a user is always that user's current token.
pub struct Sessions<C> {
    crypto: Crypto,
    cache: C,
    ttl: Duration,
}

impl<C> Sessions<C>
where
    C: Cache,
{
    pub fn new(crypto: Crypto, cache: C, ttl: Duration) -> Self {
        Self { crypto, cache, ttl }
    }
    pub fn cache(&self) -> &C {
        &self.cache
    }
    /// Sign a token and mirror it into both indexes. Cache failures fail
    /// issuance and surface as infrastructure errors.
    pub async fn issue(&self, user: ID<Identity>) -> Result<Ticket> {
        let (token, claims) = self.crypto.sign(user, self.ttl)?;
        self.evict(user).await?;
        self.cache.put(&user_key(user), &token, self.ttl).await?;
        self.cache
            .put(&token_key(&token), &user.to_string(), self.ttl)
            .await?;
        log::debug!("[sessions] issued session for {}", user);
        Ok(Ticket {
            token,
            expires: claims.expires(),
        })
    }
    /// Signature, expiry, then cache liveness. Both indexes must point at
    /// each other.
    pub async fn validate(&self, token: &str) -> Result<ID<Identity>> {
        let claims = self.crypto.verify(token)?;
        match self.linked(claims.user(), token).await {
            Ok(true) => Ok(claims.user()),
            Ok(false) => Err(Error::Unauthenticated),
            Err(e) => {
                log::warn!("[sessions] liveness check failed: {}", e);
                Err(Error::Unauthenticated)
            }
        }
    }
    /// Exchange a live token for a new one. The old token stops working.
    pub async fn refresh(&self, token: &str) -> Result<Ticket> {
        let user = self.validate(token).await?;
        self.revoke(token).await?;
        self.issue(user).await.map_err(|e| {
            log::warn!("[sessions] reissue for {} failed: {}", user, e);
            Error::Unauthenticated
        })
    }
    /// Remove the token from both indexes. Expired tokens are accepted and
    /// revoking twice is harmless.
    pub async fn revoke(&self, token: &str) -> Result<()> {
        let claims = self.crypto.inspect(token)?;
        self.unlink(claims.user(), token).await.map_err(|e| {
            log::warn!("[sessions] revoke for {} failed: {}", claims.user(), e);
            Error::Unauthenticated
        })
    }
    /// Drop whatever session the user currently holds.
    pub async fn evict(&self, user: ID<Identity>) -> Result<()> {
        match self.cache.get(&user_key(user)).await? {
            Some(token) => self.unlink(user, &token).await,
            None => Ok(()),
        }
    }
    async fn linked(&self, user: ID<Identity>, token: &str) -> Result<bool> {
        let owner = self.cache.get(&token_key(token)).await?;
        if owner != Some(user.to_string()) {
            return Ok(false);
        }
        let current = self.cache.get(&user_key(user)).await?;
        Ok(current.as_deref() == Some(token))
    }
    async fn unlink(&self, user: ID<Identity>, token: &str) -> Result<()> {
        self.cache.del(&token_key(token)).await?;
        if self.cache.get(&user_key(user)).await?.as_deref() == Some(token) {
            self.cache.del(&user_key(user)).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sessions() -> Sessions<Volatile> {
        Sessions::new(
            Crypto::new(b"secret"),
            Volatile::default(),
            Duration::from_secs(60),
        )
    }

    #[tokio::test]
    async fn issued_tokens_validate() {
        let sessions = sessions();
        let user = ID::default();
        let ticket = sessions.issue(user).await.unwrap();
        assert_eq!(sessions.validate(&ticket.token).await.unwrap(), user);
        assert!(ticket.expires > SystemTime::now());
    }
    #[tokio::test]
    async fn issuing_displaces_the_previous_token() {
        let sessions = sessions();
        let user = ID::default();
        let first = sessions.issue(user).await.unwrap();
        let second = sessions.issue(user).await.unwrap();
        assert!(matches!(sessions.validate(&first.token).await, Err(Error::Unauthenticated)));
        assert_eq!(sessions.validate(&second.token).await.unwrap(), user);
    }
    #[tokio::test]
    async fn orphaned_token_entries_do_not_validate() {
        let sessions = sessions();
        let user = ID::default();
        let first = sessions.issue(user).await.unwrap();
        let second = sessions.issue(user).await.unwrap();
        sessions
            .cache()
            .put(&format!("token:{}", first.token), &user.to_string(), Duration::from_secs(60))
            .await
            .unwrap();
        assert!(matches!(sessions.validate(&first.token).await, Err(Error::Unauthenticated)));
        assert_eq!(sessions.validate(&second.token).await.unwrap(), user);
    }
    #[tokio::test]
    async fn refresh_locks_out_the_old_token() {
        let sessions = sessions();
        let user = ID::default();
        let old = sessions.issue(user).await.unwrap();
        let new = sessions.refresh(&old.token).await.unwrap();
        assert!(!new.token.is_empty());
        assert_ne!(new.token, old.token);
        assert!(matches!(sessions.validate(&old.token).await, Err(Error::Unauthenticated)));
        assert_eq!(sessions.validate(&new.token).await.unwrap(), user);
        assert!(matches!(sessions.refresh(&old.token).await, Err(Error::Unauthenticated)));
    }
    #[tokio::test]
    async fn revoke_is_idempotent() {
        let sessions = sessions();
        let ticket = sessions.issue(ID::default()).await.unwrap();
        sessions.revoke(&ticket.token).await.unwrap();
        sessions.revoke(&ticket.token).await.unwrap();
        assert!(matches!(sessions.validate(&ticket.token).await, Err(Error::Unauthenticated)));
    }
    #[tokio::test]
    async fn revoking_a_stale_token_keeps_the_current_one() {
        let sessions = sessions();
        let user = ID::default();
        let stale = sessions.issue(user).await.unwrap();
        let current = sessions.issue(user).await.unwrap();
        sessions.revoke(&stale.token).await.unwrap();
        assert_eq!(sessions.validate(&current.token).await.unwrap(), user);
    }
    #[tokio::test]
    async fn evict_ends_the_session() {
        let sessions = sessions();
        let user = ID::default();
        let ticket = sessions.issue(user).await.unwrap();
        sessions.evict(user).await.unwrap();
        sessions.evict(user).await.unwrap();
        assert!(matches!(sessions.validate(&ticket.token).await, Err(Error::Unauthenticated)));
    }
    #[tokio::test]
    async fn forged_tokens_are_rejected() {
        let sessions = sessions();
        let (forged, _) = Crypto::new(b"other")
            .sign(ID::default(), Duration::from_secs(60))
            .unwrap();
        assert!(matches!(sessions.validate(&forged).await, Err(Error::Unauthenticated)));
        assert!(matches!(sessions.revoke(&forged).await, Err(Error::Unauthenticated)));
    }
    #[tokio::test]
    async fn cache_outages_collapse_to_unauthenticated() {
        let sessions = sessions();
        let user = ID::default();
        let ticket = sessions.issue(user).await.unwrap();
        sessions.cache().sabotage();
        assert!(matches!(sessions.validate(&ticket.token).await, Err(Error::Unauthenticated)));
        assert!(matches!(sessions.revoke(&ticket.token).await, Err(Error::Unauthenticated)));
        assert!(sessions.issue(user).await.unwrap_err().is_infrastructure());
        sessions.cache().restore();
        assert_eq!(sessions.validate(&ticket.token).await.unwrap(), user);
    }
}
