use super::*;
use mealshare_core::Error;
use mealshare_core::ID;
use mealshare_core::Result;
use mealshare_records::Identity;
use std::time::Duration;

/// HS256 signer and verifier.
pub struct Crypto {
    encoding: jsonwebtoken::EncodingKey,
    decoding: jsonwebtoken::DecodingKey,
}

impl Crypto {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: jsonwebtoken::EncodingKey::from_secret(secret),
            decoding: jsonwebtoken::DecodingKey::from_secret(secret),
        }
    }
    pub fn sign(&self, user: ID<Identity>, ttl: Duration) -> Result<(String, Claims)> {
        let claims = Claims::new(user, ttl);
        jsonwebtoken::encode(&jsonwebtoken::Header::default(), &claims, &self.encoding)
            .map(|token| (token, claims))
            .map_err(Error::infra)
    }
    /// Signature and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = jsonwebtoken::Validation::default();
        validation.leeway = 0;
        self.decode(token, &validation)
    }
    /// Signature only. Used to find the owner of an expired token.
    pub fn inspect(&self, token: &str) -> Result<Claims> {
        let mut validation = jsonwebtoken::Validation::default();
        validation.validate_exp = false;
        self.decode(token, &validation)
    }
    fn decode(&self, token: &str, validation: &jsonwebtoken::Validation) -> Result<Claims> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("[crypto] rejected token: {}", e);
                Error::Unauthenticated
            })
    }
}
