use super::*;
use mealshare_core::Count;
use mealshare_core::Error;
use mealshare_core::ID;
use mealshare_core::ROLES;
use mealshare_records::*;
use mealshare_store::*;
use std::collections::HashSet;
use std::time::SystemTime;

/// Something on a volunteer's calendar: a confirmed assignment or a
/// pending application to an event that has not finished.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Task {
    /// Assignment id when confirmed, application id when pending.
    pub id: uuid::Uuid,
    pub event: ID<Event>,
    pub title: String,
    pub role: String,
    pub location: String,
    pub restaurant: String,
    #[serde(with = "mealshare_core::epoch")]
    pub starts: SystemTime,
    #[serde(with = "mealshare_core::epoch")]
    pub ends: SystemTime,
    pub status: EventStatus,
    pub checked_in: bool,
    pub confirmed: bool,
}

/// An upcoming event that still needs hands.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Opportunity {
    pub event: ID<Event>,
    pub title: String,
    pub restaurant: String,
    pub location: String,
    #[serde(with = "mealshare_core::epoch")]
    pub starts: SystemTime,
    #[serde(with = "mealshare_core::epoch")]
    pub ends: SystemTime,
    pub volunteers_needed: Count,
    pub roles: [&'static str; 3],
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct Dashboard {
    pub volunteer: Volunteer,
    pub upcoming_tasks: Vec<Task>,
    pub opportunities: Vec<Opportunity>,
    pub badges: Vec<Badge>,
}

impl<S, C> Service<S, C>
where
    S: Store,
    C: Cache,
{
    pub async fn dashboard(&self, id: ID<Volunteer>) -> Result<Dashboard> {
        let volunteer = self
            .store()
            .volunteer(id)
            .await?
            .ok_or(Error::NotFound("volunteer"))?;
        Ok(Dashboard {
            volunteer,
            upcoming_tasks: self.upcoming_tasks(id).await?,
            opportunities: self.opportunities(id).await?,
            badges: self.badges(id).await?,
        })
    }
    /// Assignments first, then pending applications, each for events that
    /// are upcoming or active.
    pub async fn upcoming_tasks(&self, id: ID<Volunteer>) -> Result<Vec<Task>> {
        let store = self.store();
        let mut tasks = Vec::new();
        for assignment in store.assignments_of(id).await? {
            if let Some((event, restaurant)) = self.venue(assignment.event).await? {
                tasks.push(Task {
                    id: assignment.id.inner(),
                    event: event.id,
                    title: event.title,
                    role: assignment.role,
                    location: event.location,
                    restaurant,
                    starts: event.starts,
                    ends: event.ends,
                    status: event.status,
                    checked_in: assignment.checked_in,
                    confirmed: true,
                });
            }
        }
        for application in store.applications_of(id).await? {
            if application.status != ApplicationStatus::Pending {
                continue;
            }
            if let Some((event, restaurant)) = self.venue(application.event).await? {
                tasks.push(Task {
                    id: application.id.inner(),
                    event: event.id,
                    title: event.title,
                    role: application.role,
                    location: event.location,
                    restaurant,
                    starts: event.starts,
                    ends: event.ends,
                    status: event.status,
                    checked_in: false,
                    confirmed: false,
                });
            }
        }
        Ok(tasks)
    }
    /// Open events ranked by start time. Events the volunteer has a pending
    /// or approved application for, or already works, are skipped, as are
    /// fully staffed ones.
    pub async fn opportunities(&self, id: ID<Volunteer>) -> Result<Vec<Opportunity>> {
        let store = self.store();
        let involved = store
            .applications_of(id)
            .await?
            .into_iter()
            .filter(|a| a.status.is_active())
            .map(|a| a.event)
            .chain(store.assignments_of(id).await?.into_iter().map(|a| a.event))
            .collect::<HashSet<_>>();
        let mut opportunities = Vec::new();
        for event in store.upcoming_events().await? {
            if involved.contains(&event.id) {
                continue;
            }
            let crew = store.crew_size(event.id).await?;
            if !event.has_room(crew) {
                continue;
            }
            let Some(restaurant) = store.restaurant(event.restaurant).await? else {
                continue;
            };
            opportunities.push(Opportunity {
                event: event.id,
                volunteers_needed: event.max_volunteers - crew as Count,
                title: event.title,
                restaurant: restaurant.name,
                location: event.location,
                starts: event.starts,
                ends: event.ends,
                roles: ROLES,
            });
        }
        Ok(opportunities)
    }
    /// Derived from checked-in assignments of completed events.
    pub async fn badges(&self, id: ID<Volunteer>) -> Result<Vec<Badge>> {
        let mut roles = Vec::new();
        for assignment in self.store().assignments_of(id).await? {
            if !assignment.checked_in {
                continue;
            }
            if let Some(event) = self.store().event(assignment.event).await? {
                if event.status == EventStatus::Past {
                    roles.push(assignment.role);
                }
            }
        }
        Ok(Badge::earned(
            roles.len() as Count,
            roles.iter().map(String::as_str),
        ))
    }
    /// An unfinished event with its restaurant's name.
    async fn venue(&self, id: ID<Event>) -> Result<Option<(Event, String)>> {
        let Some(event) = self.store().event(id).await? else {
            return Ok(None);
        };
        if event.status.is_terminal() {
            return Ok(None);
        }
        Ok(self
            .store()
            .restaurant(event.restaurant)
            .await?
            .map(|restaurant| (event, restaurant.name)))
    }
}
