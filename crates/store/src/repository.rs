use mealshare_core::Count;
use mealshare_core::ID;
use mealshare_core::Result;
use mealshare_records::*;

/// Credential records. The password hash never leaves this seam except
/// through the lookups that need it for verification.
#[allow(async_fn_in_trait)]
pub trait IdentityRepository {
    async fn exists(&self, username: &str, email: &str) -> Result<bool>;
    /// Fails with `Conflict` when the username or email is taken.
    async fn enroll(&self, identity: &Identity, hashword: &str) -> Result<()>;
    async fn identity(&self, id: ID<Identity>) -> Result<Option<Identity>>;
    async fn by_email(&self, email: &str) -> Result<Option<(Identity, String)>>;
    async fn by_username(&self, username: &str) -> Result<Option<(Identity, String)>>;
}

#[allow(async_fn_in_trait)]
pub trait RestaurantRepository {
    async fn insert_restaurant(&self, restaurant: &Restaurant) -> Result<()>;
    async fn restaurant(&self, id: ID<Restaurant>) -> Result<Option<Restaurant>>;
    async fn restaurant_of(&self, user: ID<Identity>) -> Result<Option<Restaurant>>;
    /// Rewrites descriptive fields only. Counters are untouched.
    async fn update_restaurant(&self, restaurant: &Restaurant) -> Result<()>;
    /// Adds deltas to `total_events` and `meals_served`.
    async fn tally_restaurant(&self, id: ID<Restaurant>, events: Count, meals: Count) -> Result<()>;
}

#[allow(async_fn_in_trait)]
pub trait VolunteerRepository {
    async fn insert_volunteer(&self, volunteer: &Volunteer) -> Result<()>;
    async fn volunteer(&self, id: ID<Volunteer>) -> Result<Option<Volunteer>>;
    async fn volunteer_of(&self, user: ID<Identity>) -> Result<Option<Volunteer>>;
    async fn credit_volunteer(&self, id: ID<Volunteer>, credit: &Credit) -> Result<()>;
}

#[allow(async_fn_in_trait)]
pub trait EventRepository {
    async fn insert_event(&self, event: &Event) -> Result<()>;
    async fn event(&self, id: ID<Event>) -> Result<Option<Event>>;
    /// Reads the event and holds its row until the unit ends.
    async fn lock_event(&self, id: ID<Event>) -> Result<Option<Event>>;
    /// Events of a restaurant, earliest start first.
    async fn events_of(&self, restaurant: ID<Restaurant>, status: Option<EventStatus>) -> Result<Vec<Event>>;
    /// Every upcoming event, earliest start first.
    async fn upcoming_events(&self) -> Result<Vec<Event>>;
    async fn set_event_status(&self, id: ID<Event>, status: EventStatus) -> Result<()>;
    async fn set_guests(&self, id: ID<Event>, guests: Count) -> Result<()>;
    async fn set_meals(&self, id: ID<Event>, meals: Count) -> Result<()>;
    async fn delete_event(&self, id: ID<Event>) -> Result<()>;
}

#[allow(async_fn_in_trait)]
pub trait ApplicationRepository {
    /// Fails with `Conflict` when the pair already has an active application.
    async fn insert_application(&self, application: &Application) -> Result<()>;
    async fn application(&self, id: ID<Application>) -> Result<Option<Application>>;
    /// Reads the application and holds it until the unit ends.
    async fn lock_application(&self, id: ID<Application>) -> Result<Option<Application>>;
    async fn applications_of(&self, volunteer: ID<Volunteer>) -> Result<Vec<Application>>;
    /// Applications to any event of the restaurant, oldest first.
    async fn applications_for(&self, restaurant: ID<Restaurant>, status: Option<ApplicationStatus>) -> Result<Vec<Application>>;
    async fn active_application(&self, volunteer: ID<Volunteer>, event: ID<Event>) -> Result<Option<Application>>;
    /// Moves a pending application on. Fails with `InvalidState` once it has been decided.
    async fn set_application_status(&self, id: ID<Application>, status: ApplicationStatus) -> Result<()>;
    async fn purge_applications(&self, event: ID<Event>) -> Result<()>;
}

#[allow(async_fn_in_trait)]
pub trait AssignmentRepository {
    /// Fails with `Conflict` when the volunteer already holds a slot on the event.
    async fn insert_assignment(&self, assignment: &Assignment) -> Result<()>;
    async fn assignment(&self, id: ID<Assignment>) -> Result<Option<Assignment>>;
    async fn assignments_for(&self, event: ID<Event>) -> Result<Vec<Assignment>>;
    async fn assignments_of(&self, volunteer: ID<Volunteer>) -> Result<Vec<Assignment>>;
    async fn crew_size(&self, event: ID<Event>) -> Result<usize>;
    async fn check_in(&self, id: ID<Assignment>) -> Result<()>;
    async fn purge_assignments(&self, event: ID<Event>) -> Result<()>;
}

/// Everything a workflow may touch.
pub trait Repositories:
    IdentityRepository
    + RestaurantRepository
    + VolunteerRepository
    + EventRepository
    + ApplicationRepository
    + AssignmentRepository
{
}

impl<T> Repositories for T where
    T: IdentityRepository
        + RestaurantRepository
        + VolunteerRepository
        + EventRepository
        + ApplicationRepository
        + AssignmentRepository
{
}

/// An open transaction. Dropping a unit without committing rolls it back.
#[allow(async_fn_in_trait)]
pub trait Unit: Repositories {
    async fn commit(self) -> Result<()>;
    async fn rollback(self) -> Result<()>;
}

/// A durable store. Repository calls made on the store directly see and
/// write committed state only.
#[allow(async_fn_in_trait)]
pub trait Store: Repositories {
    type Tx: Unit;
    async fn begin(&self) -> Result<Self::Tx>;
    async fn ping(&self) -> Result<()>;
}
