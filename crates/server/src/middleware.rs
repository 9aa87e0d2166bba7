use super::*;
use actix_web::FromRequest;
use actix_web::HttpRequest;
use actix_web::dev::Payload;
use mealshare_records::Restaurant;
use mealshare_records::Volunteer;
use mealshare_service::Principal;
use std::future::Future;
use std::future::Ready;
use std::marker::PhantomData;
use std::pin::Pin;

fn token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

/// Raw bearer token, unchecked. For routes that act on the token itself.
pub struct Bearer(pub String);

impl FromRequest for Bearer {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        std::future::ready(
            token(req)
                .map(Bearer)
                .ok_or_else(|| Failure(Error::Unauthenticated).into()),
        )
    }
}

/// Extractor for authenticated requests.
/// Validates the bearer token against the live session and loads the
/// caller's identity and profile.
pub struct Auth<S, C> {
    principal: Principal,
    marker: PhantomData<fn() -> (S, C)>,
}

impl<S, C> Auth<S, C> {
    pub fn principal(&self) -> &Principal {
        &self.principal
    }
    pub fn restaurant(&self) -> Result<&Restaurant, Error> {
        self.principal.restaurant()
    }
    pub fn volunteer(&self) -> Result<&Volunteer, Error> {
        self.principal.volunteer()
    }
}

impl<S, C> FromRequest for Auth<S, C>
where
    S: Store + 'static,
    C: Cache + 'static,
{
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;
    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let service = req.app_data::<web::Data<Service<S, C>>>().cloned();
        let token = token(req);
        Box::pin(async move {
            let token = token.ok_or(Failure(Error::Unauthenticated))?;
            let service = service.ok_or_else(|| {
                actix_web::error::ErrorInternalServerError("service not configured")
            })?;
            let principal = service.whoami(&token).await.map_err(Failure)?;
            Ok::<_, actix_web::Error>(Auth {
                principal,
                marker: PhantomData,
            })
        })
    }
}
