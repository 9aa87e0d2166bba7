use super::*;
use mealshare_auth::Ticket;
use mealshare_auth::password;
use mealshare_core::Error;
use mealshare_core::PASSWORD_MIN;
use mealshare_core::USERNAME_MAX;
use mealshare_core::USERNAME_MIN;
use mealshare_records::*;
use mealshare_store::*;

/// Credentials common to every registration.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Signup {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Signup {
    pub fn validate(&self) -> Result<()> {
        let length = self.username.chars().count();
        if !(USERNAME_MIN..=USERNAME_MAX).contains(&length) {
            return Err(Error::Invalid(format!(
                "username must be {}-{} characters",
                USERNAME_MIN, USERNAME_MAX
            )));
        }
        if !self.email.contains('@') {
            return Err(Error::Invalid(String::from("email address is malformed")));
        }
        if self.password.chars().count() < PASSWORD_MIN {
            return Err(Error::Invalid(format!(
                "password must be at least {} characters",
                PASSWORD_MIN
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct RestaurantDetails {
    pub name: String,
    pub address: String,
    pub contact_number: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct VolunteerDetails {
    pub full_name: String,
    pub phone_number: String,
    pub address: String,
}

fn required(field: &str, value: &str) -> Result<()> {
    match value.trim().is_empty() {
        true => Err(Error::Invalid(format!("{} is required", field))),
        false => Ok(()),
    }
}

/// A signed-in account: who, which profile, and the session to use.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Account {
    pub identity: Identity,
    pub profile: Option<Profile>,
    pub ticket: Ticket,
}

/// The identity behind a validated token.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Principal {
    pub identity: Identity,
    pub profile: Option<Profile>,
}

impl Principal {
    pub fn restaurant(&self) -> Result<&Restaurant> {
        match &self.profile {
            Some(Profile::Restaurant(restaurant)) => Ok(restaurant),
            _ => Err(Error::Unauthorized),
        }
    }
    pub fn volunteer(&self) -> Result<&Volunteer> {
        match &self.profile {
            Some(Profile::Volunteer(volunteer)) => Ok(volunteer),
            _ => Err(Error::Unauthorized),
        }
    }
}

impl<S, C> Service<S, C>
where
    S: Store,
    C: Cache,
{
    pub async fn register_restaurant(&self, signup: Signup, details: RestaurantDetails) -> Result<Account> {
        signup.validate()?;
        required("name", &details.name)?;
        let identity = Identity::new(signup.username, signup.email, Kind::Restaurant);
        let profile = Profile::from(Restaurant::new(
            identity.id,
            details.name,
            details.address,
            details.contact_number,
        ));
        self.enroll(&identity, &signup.password, &profile).await?;
        self.admit(identity, Some(profile)).await
    }
    pub async fn register_volunteer(&self, signup: Signup, details: VolunteerDetails) -> Result<Account> {
        signup.validate()?;
        required("full name", &details.full_name)?;
        let identity = Identity::new(signup.username, signup.email, Kind::Volunteer);
        let profile = Profile::from(Volunteer::new(
            identity.id,
            details.full_name,
            details.phone_number,
            details.address,
        ));
        self.enroll(&identity, &signup.password, &profile).await?;
        self.admit(identity, Some(profile)).await
    }
    /// Identity and profile in one unit.
    async fn enroll(&self, identity: &Identity, secret: &str, profile: &Profile) -> Result<()> {
        self.tx
            .run(async |tx: &S::Tx| {
                if tx.exists(&identity.username, &identity.email).await? {
                    return Err(Error::Conflict(String::from(
                        "username or email already registered",
                    )));
                }
                let hashword = password::hash(secret)?;
                tx.enroll(identity, &hashword).await?;
                match profile {
                    Profile::Restaurant(restaurant) => tx.insert_restaurant(restaurant).await,
                    Profile::Volunteer(volunteer) => tx.insert_volunteer(volunteer).await,
                }
            })
            .await?;
        log::info!("[registry] enrolled {} {}", identity.kind, identity.username);
        Ok(())
    }
    /// The account is already durable here; a failed issue is reported
    /// distinctly so the caller knows to log in instead of re-registering.
    async fn admit(&self, identity: Identity, profile: Option<Profile>) -> Result<Account> {
        match self.sessions.issue(identity.id).await {
            Ok(ticket) => Ok(Account {
                identity,
                profile,
                ticket,
            }),
            Err(e) => {
                log::error!("[registry] no session for new account {}: {}", identity.id, e);
                Err(Error::SessionUnavailable(identity.id.inner()))
            }
        }
    }
    pub async fn login(&self, email: &str, secret: &str) -> Result<Account> {
        let (identity, hashword) = self
            .store()
            .by_email(email)
            .await?
            .ok_or(Error::Unauthenticated)?;
        if !password::verify(secret, &hashword) {
            log::debug!("[registry] bad password for {}", identity.username);
            return Err(Error::Unauthenticated);
        }
        let profile = self.profile(&identity).await?;
        let ticket = self.sessions.issue(identity.id).await?;
        Ok(Account {
            identity,
            profile,
            ticket,
        })
    }
    pub async fn whoami(&self, token: &str) -> Result<Principal> {
        let user = self.sessions.validate(token).await?;
        let identity = self
            .store()
            .identity(user)
            .await?
            .ok_or(Error::Unauthenticated)?;
        let profile = self.profile(&identity).await?;
        Ok(Principal { identity, profile })
    }
    pub async fn refresh(&self, token: &str) -> Result<Ticket> {
        self.sessions.refresh(token).await
    }
    pub async fn logout(&self, token: &str) -> Result<()> {
        self.sessions.revoke(token).await
    }
    /// Rewrites a restaurant's descriptive fields.
    pub async fn update_restaurant(&self, restaurant: &Restaurant, details: RestaurantDetails) -> Result<Restaurant> {
        required("name", &details.name)?;
        let revised = Restaurant {
            name: details.name,
            address: details.address,
            contact_number: details.contact_number,
            ..restaurant.clone()
        };
        self.tx
            .run(async |tx: &S::Tx| tx.update_restaurant(&revised).await)
            .await?;
        Ok(revised)
    }
    async fn profile(&self, identity: &Identity) -> Result<Option<Profile>> {
        match identity.kind {
            Kind::Restaurant => Ok(self
                .store()
                .restaurant_of(identity.id)
                .await?
                .map(Profile::from)),
            Kind::Volunteer => Ok(self
                .store()
                .volunteer_of(identity.id)
                .await?
                .map(Profile::from)),
            Kind::Plain => Ok(None),
        }
    }
}
