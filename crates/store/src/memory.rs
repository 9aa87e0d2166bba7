use super::*;
use mealshare_core::Count;
use mealshare_core::Error;
use mealshare_core::ID;
use mealshare_core::Result;
use mealshare_records::*;
use std::collections::BTreeMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::RwLock;
use tokio::sync::OwnedMutexGuard;

/// Persisted collections, named the way the relational schema names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Users,
    Restaurants,
    Volunteers,
    Events,
    Applications,
    Assignments,
}

impl Table {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Restaurants => "restaurants",
            Self::Volunteers => "volunteers",
            Self::Events => "events",
            Self::Applications => "applications",
            Self::Assignments => "assignments",
        }
    }
}

/// One full copy of the data. Transactions stage a private copy and swap it
/// in on commit.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    users: BTreeMap<ID<Identity>, (Identity, String)>,
    restaurants: BTreeMap<ID<Restaurant>, Restaurant>,
    volunteers: BTreeMap<ID<Volunteer>, Volunteer>,
    events: BTreeMap<ID<Event>, Event>,
    applications: BTreeMap<ID<Application>, Application>,
    assignments: BTreeMap<ID<Assignment>, Assignment>,
}

#[derive(Debug, Default)]
struct Shared {
    committed: RwLock<Tables>,
    writer: Arc<tokio::sync::Mutex<()>>,
    sabotaged: Mutex<HashSet<Table>>,
}

impl Shared {
    fn trip(&self, table: Table) -> Result<()> {
        match self
            .sabotaged
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&table)
        {
            true => Err(Error::infra(format!("write to {} failed", table.name()))),
            false => Ok(()),
        }
    }
}

/// Whether a [`Mem`] handle writes through or stages.
pub trait Mode {
    fn staged(&self) -> Option<&Mutex<Tables>>;
}

/// Autocommit access.
#[derive(Debug, Clone, Copy, Default)]
pub struct Committed;

/// An open unit of work. Holds the writer lock, so units run one at a time.
#[derive(Debug)]
pub struct Staged {
    tables: Mutex<Tables>,
    writer: OwnedMutexGuard<()>,
}

impl Mode for Committed {
    fn staged(&self) -> Option<&Mutex<Tables>> {
        None
    }
}

impl Mode for Staged {
    fn staged(&self) -> Option<&Mutex<Tables>> {
        Some(&self.tables)
    }
}

/// In-process store used by tests and local runs.
#[derive(Debug)]
pub struct Mem<M> {
    shared: Arc<Shared>,
    mode: M,
}

pub type Memory = Mem<Committed>;
pub type MemoryTx = Mem<Staged>;

impl Default for Memory {
    fn default() -> Self {
        Self {
            shared: Arc::new(Shared::default()),
            mode: Committed,
        }
    }
}

impl Clone for Memory {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            mode: Committed,
        }
    }
}

impl Memory {
    /// Make the next write to `table` fail with an infrastructure error.
    pub fn sabotage(&self, table: Table) {
        log::debug!("[memory] sabotaging next write to {}", table.name());
        self.shared
            .sabotaged
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(table);
    }
}

impl<M> Mem<M>
where
    M: Mode,
{
    fn read<R>(&self, f: impl FnOnce(&Tables) -> R) -> R {
        match self.mode.staged() {
            Some(staged) => f(&staged.lock().unwrap_or_else(PoisonError::into_inner)),
            None => f(&self
                .shared
                .committed
                .read()
                .unwrap_or_else(PoisonError::into_inner)),
        }
    }
    /// Closures check their preconditions before mutating, so a failed
    /// autocommit write leaves nothing behind.
    async fn write<R>(&self, table: Table, f: impl FnOnce(&mut Tables) -> Result<R>) -> Result<R> {
        self.shared.trip(table)?;
        match self.mode.staged() {
            Some(staged) => f(&mut staged.lock().unwrap_or_else(PoisonError::into_inner)),
            None => {
                let _writer = self.shared.writer.lock().await;
                f(&mut self
                    .shared
                    .committed
                    .write()
                    .unwrap_or_else(PoisonError::into_inner))
            }
        }
    }
}

impl Store for Memory {
    type Tx = MemoryTx;
    async fn begin(&self) -> Result<MemoryTx> {
        let writer = Arc::clone(&self.shared.writer).lock_owned().await;
        let tables = self.read(Tables::clone);
        Ok(Mem {
            shared: Arc::clone(&self.shared),
            mode: Staged {
                tables: Mutex::new(tables),
                writer,
            },
        })
    }
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

impl Unit for MemoryTx {
    async fn commit(self) -> Result<()> {
        let Mem { shared, mode } = self;
        let Staged { tables, writer } = mode;
        *shared
            .committed
            .write()
            .unwrap_or_else(PoisonError::into_inner) =
            tables.into_inner().unwrap_or_else(PoisonError::into_inner);
        drop(writer);
        Ok(())
    }
    async fn rollback(self) -> Result<()> {
        Ok(())
    }
}

impl<M> IdentityRepository for Mem<M>
where
    M: Mode,
{
    async fn exists(&self, username: &str, email: &str) -> Result<bool> {
        Ok(self.read(|t| {
            t.users
                .values()
                .any(|(u, _)| u.username == username || u.email == email)
        }))
    }
    async fn enroll(&self, identity: &Identity, hashword: &str) -> Result<()> {
        self.write(Table::Users, |t| {
            if t.users.values().any(|(u, _)| u.username == identity.username) {
                return Err(Error::Conflict(format!("username {} is taken", identity.username)));
            }
            if t.users.values().any(|(u, _)| u.email == identity.email) {
                return Err(Error::Conflict(format!("email {} is taken", identity.email)));
            }
            t.users
                .insert(identity.id, (identity.clone(), hashword.to_string()));
            Ok(())
        })
        .await
    }
    async fn identity(&self, id: ID<Identity>) -> Result<Option<Identity>> {
        Ok(self.read(|t| t.users.get(&id).map(|(u, _)| u.clone())))
    }
    async fn by_email(&self, email: &str) -> Result<Option<(Identity, String)>> {
        Ok(self.read(|t| t.users.values().find(|(u, _)| u.email == email).cloned()))
    }
    async fn by_username(&self, username: &str) -> Result<Option<(Identity, String)>> {
        Ok(self.read(|t| {
            t.users
                .values()
                .find(|(u, _)| u.username == username)
                .cloned()
        }))
    }
}

impl<M> RestaurantRepository for Mem<M>
where
    M: Mode,
{
    async fn insert_restaurant(&self, restaurant: &Restaurant) -> Result<()> {
        self.write(Table::Restaurants, |t| {
            if !t.users.contains_key(&restaurant.user) {
                return Err(Error::NotFound("user"));
            }
            t.restaurants.insert(restaurant.id, restaurant.clone());
            Ok(())
        })
        .await
    }
    async fn restaurant(&self, id: ID<Restaurant>) -> Result<Option<Restaurant>> {
        Ok(self.read(|t| t.restaurants.get(&id).cloned()))
    }
    async fn restaurant_of(&self, user: ID<Identity>) -> Result<Option<Restaurant>> {
        Ok(self.read(|t| t.restaurants.values().find(|r| r.user == user).cloned()))
    }
    async fn update_restaurant(&self, restaurant: &Restaurant) -> Result<()> {
        self.write(Table::Restaurants, |t| match t.restaurants.get_mut(&restaurant.id) {
            Some(stored) => {
                stored.name = restaurant.name.clone();
                stored.address = restaurant.address.clone();
                stored.contact_number = restaurant.contact_number.clone();
                Ok(())
            }
            None => Err(Error::NotFound("restaurant")),
        })
        .await
    }
    async fn tally_restaurant(&self, id: ID<Restaurant>, events: Count, meals: Count) -> Result<()> {
        self.write(Table::Restaurants, |t| match t.restaurants.get_mut(&id) {
            Some(stored) => {
                stored.tally(events, meals);
                Ok(())
            }
            None => Err(Error::NotFound("restaurant")),
        })
        .await
    }
}

impl<M> VolunteerRepository for Mem<M>
where
    M: Mode,
{
    async fn insert_volunteer(&self, volunteer: &Volunteer) -> Result<()> {
        self.write(Table::Volunteers, |t| {
            if !t.users.contains_key(&volunteer.user) {
                return Err(Error::NotFound("user"));
            }
            t.volunteers.insert(volunteer.id, volunteer.clone());
            Ok(())
        })
        .await
    }
    async fn volunteer(&self, id: ID<Volunteer>) -> Result<Option<Volunteer>> {
        Ok(self.read(|t| t.volunteers.get(&id).cloned()))
    }
    async fn volunteer_of(&self, user: ID<Identity>) -> Result<Option<Volunteer>> {
        Ok(self.read(|t| t.volunteers.values().find(|v| v.user == user).cloned()))
    }
    async fn credit_volunteer(&self, id: ID<Volunteer>, credit: &Credit) -> Result<()> {
        self.write(Table::Volunteers, |t| match t.volunteers.get_mut(&id) {
            Some(stored) => {
                stored.credit(credit);
                Ok(())
            }
            None => Err(Error::NotFound("volunteer")),
        })
        .await
    }
}

impl<M> EventRepository for Mem<M>
where
    M: Mode,
{
    async fn insert_event(&self, event: &Event) -> Result<()> {
        self.write(Table::Events, |t| {
            if !t.restaurants.contains_key(&event.restaurant) {
                return Err(Error::NotFound("restaurant"));
            }
            t.events.insert(event.id, event.clone());
            Ok(())
        })
        .await
    }
    async fn event(&self, id: ID<Event>) -> Result<Option<Event>> {
        Ok(self.read(|t| t.events.get(&id).cloned()))
    }
    async fn lock_event(&self, id: ID<Event>) -> Result<Option<Event>> {
        self.event(id).await
    }
    async fn events_of(&self, restaurant: ID<Restaurant>, status: Option<EventStatus>) -> Result<Vec<Event>> {
        let mut events = self.read(|t| {
            t.events
                .values()
                .filter(|e| e.restaurant == restaurant)
                .filter(|e| status.is_none_or(|s| s == e.status))
                .cloned()
                .collect::<Vec<_>>()
        });
        events.sort_by_key(|e| e.starts);
        Ok(events)
    }
    async fn upcoming_events(&self) -> Result<Vec<Event>> {
        let mut events = self.read(|t| {
            t.events
                .values()
                .filter(|e| e.status == EventStatus::Upcoming)
                .cloned()
                .collect::<Vec<_>>()
        });
        events.sort_by_key(|e| e.starts);
        Ok(events)
    }
    async fn set_event_status(&self, id: ID<Event>, status: EventStatus) -> Result<()> {
        self.write(Table::Events, |t| match t.events.get_mut(&id) {
            Some(stored) => {
                stored.status = status;
                Ok(())
            }
            None => Err(Error::NotFound("event")),
        })
        .await
    }
    async fn set_guests(&self, id: ID<Event>, guests: Count) -> Result<()> {
        self.write(Table::Events, |t| match t.events.get_mut(&id) {
            Some(stored) => {
                stored.current_guests = guests;
                Ok(())
            }
            None => Err(Error::NotFound("event")),
        })
        .await
    }
    async fn set_meals(&self, id: ID<Event>, meals: Count) -> Result<()> {
        self.write(Table::Events, |t| match t.events.get_mut(&id) {
            Some(stored) => {
                stored.meals_served = meals;
                Ok(())
            }
            None => Err(Error::NotFound("event")),
        })
        .await
    }
    async fn delete_event(&self, id: ID<Event>) -> Result<()> {
        self.write(Table::Events, |t| {
            if t.applications.values().any(|a| a.event == id)
                || t.assignments.values().any(|a| a.event == id)
            {
                return Err(Error::Conflict(String::from("event still has staffing records")));
            }
            match t.events.remove(&id) {
                Some(_) => Ok(()),
                None => Err(Error::NotFound("event")),
            }
        })
        .await
    }
}

impl<M> ApplicationRepository for Mem<M>
where
    M: Mode,
{
    async fn insert_application(&self, application: &Application) -> Result<()> {
        self.write(Table::Applications, |t| {
            if !t.events.contains_key(&application.event) {
                return Err(Error::NotFound("event"));
            }
            if !t.volunteers.contains_key(&application.volunteer) {
                return Err(Error::NotFound("volunteer"));
            }
            if t.applications.values().any(|a| {
                a.volunteer == application.volunteer
                    && a.event == application.event
                    && a.status.is_active()
            }) {
                return Err(Error::Conflict(String::from("already applied to this event")));
            }
            t.applications.insert(application.id, application.clone());
            Ok(())
        })
        .await
    }
    async fn application(&self, id: ID<Application>) -> Result<Option<Application>> {
        Ok(self.read(|t| t.applications.get(&id).cloned()))
    }
    async fn lock_application(&self, id: ID<Application>) -> Result<Option<Application>> {
        self.application(id).await
    }
    async fn applications_of(&self, volunteer: ID<Volunteer>) -> Result<Vec<Application>> {
        let mut applications = self.read(|t| {
            t.applications
                .values()
                .filter(|a| a.volunteer == volunteer)
                .cloned()
                .collect::<Vec<_>>()
        });
        applications.sort_by_key(|a| a.applied);
        Ok(applications)
    }
    async fn applications_for(&self, restaurant: ID<Restaurant>, status: Option<ApplicationStatus>) -> Result<Vec<Application>> {
        let mut applications = self.read(|t| {
            t.applications
                .values()
                .filter(|a| {
                    t.events
                        .get(&a.event)
                        .is_some_and(|e| e.restaurant == restaurant)
                })
                .filter(|a| status.is_none_or(|s| s == a.status))
                .cloned()
                .collect::<Vec<_>>()
        });
        applications.sort_by_key(|a| a.applied);
        Ok(applications)
    }
    async fn active_application(&self, volunteer: ID<Volunteer>, event: ID<Event>) -> Result<Option<Application>> {
        Ok(self.read(|t| {
            t.applications
                .values()
                .find(|a| a.volunteer == volunteer && a.event == event && a.status.is_active())
                .cloned()
        }))
    }
    async fn set_application_status(&self, id: ID<Application>, status: ApplicationStatus) -> Result<()> {
        self.write(Table::Applications, |t| match t.applications.get_mut(&id) {
            Some(stored) if stored.status == ApplicationStatus::Pending => {
                stored.status = status;
                Ok(())
            }
            Some(stored) => Err(Error::InvalidState(format!("application already {}", stored.status))),
            None => Err(Error::NotFound("application")),
        })
        .await
    }
    async fn purge_applications(&self, event: ID<Event>) -> Result<()> {
        self.write(Table::Applications, |t| {
            t.applications.retain(|_, a| a.event != event);
            Ok(())
        })
        .await
    }
}

impl<M> AssignmentRepository for Mem<M>
where
    M: Mode,
{
    async fn insert_assignment(&self, assignment: &Assignment) -> Result<()> {
        self.write(Table::Assignments, |t| {
            if !t.events.contains_key(&assignment.event) {
                return Err(Error::NotFound("event"));
            }
            if !t.volunteers.contains_key(&assignment.volunteer) {
                return Err(Error::NotFound("volunteer"));
            }
            if t.assignments.values().any(|a| {
                a.event == assignment.event && a.volunteer == assignment.volunteer
            }) {
                return Err(Error::Conflict(String::from("already assigned to this event")));
            }
            t.assignments.insert(assignment.id, assignment.clone());
            Ok(())
        })
        .await
    }
    async fn assignment(&self, id: ID<Assignment>) -> Result<Option<Assignment>> {
        Ok(self.read(|t| t.assignments.get(&id).cloned()))
    }
    async fn assignments_for(&self, event: ID<Event>) -> Result<Vec<Assignment>> {
        Ok(self.read(|t| {
            t.assignments
                .values()
                .filter(|a| a.event == event)
                .cloned()
                .collect()
        }))
    }
    async fn assignments_of(&self, volunteer: ID<Volunteer>) -> Result<Vec<Assignment>> {
        Ok(self.read(|t| {
            t.assignments
                .values()
                .filter(|a| a.volunteer == volunteer)
                .cloned()
                .collect()
        }))
    }
    async fn crew_size(&self, event: ID<Event>) -> Result<usize> {
        Ok(self.read(|t| t.assignments.values().filter(|a| a.event == event).count()))
    }
    async fn check_in(&self, id: ID<Assignment>) -> Result<()> {
        self.write(Table::Assignments, |t| match t.assignments.get_mut(&id) {
            Some(stored) => {
                stored.checked_in = true;
                Ok(())
            }
            None => Err(Error::NotFound("assignment")),
        })
        .await
    }
    async fn purge_assignments(&self, event: ID<Event>) -> Result<()> {
        self.write(Table::Assignments, |t| {
            t.assignments.retain(|_, a| a.event != event);
            Ok(())
        })
        .await
    }
}
