use super::*;
use mealshare_core::Count;
use mealshare_core::Error;
use mealshare_core::ID;
use mealshare_records::*;
use mealshare_store::*;
use std::collections::HashSet;

/// Restaurant dashboard figures.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Stats {
    pub total_events: Count,
    pub meals_served: Count,
    pub rating: f64,
    pub upcoming_events: usize,
    /// Assignments on upcoming events.
    pub volunteers_engaged: usize,
    /// Distinct volunteers ever assigned to any of the restaurant's events.
    pub volunteer_count: usize,
    pub pending_applications: usize,
}

impl<S, C> Service<S, C>
where
    S: Store,
    C: Cache,
{
    pub async fn stats(&self, id: ID<Restaurant>) -> Result<Stats> {
        let store = self.store();
        let restaurant = store
            .restaurant(id)
            .await?
            .ok_or(Error::NotFound("restaurant"))?;
        let upcoming = store.events_of(id, Some(EventStatus::Upcoming)).await?;
        let mut volunteers_engaged = 0;
        for event in upcoming.iter() {
            volunteers_engaged += store.crew_size(event.id).await?;
        }
        Ok(Stats {
            total_events: restaurant.total_events,
            meals_served: restaurant.meals_served,
            rating: restaurant.rating,
            upcoming_events: upcoming.len(),
            volunteers_engaged,
            volunteer_count: self.volunteer_count(id).await?,
            pending_applications: self.pending_applications(id).await?.len(),
        })
    }
    pub async fn volunteer_count(&self, id: ID<Restaurant>) -> Result<usize> {
        let mut volunteers = HashSet::new();
        for event in self.store().events_of(id, None).await? {
            for assignment in self.store().assignments_for(event.id).await? {
                volunteers.insert(assignment.volunteer);
            }
        }
        Ok(volunteers.len())
    }
    pub async fn events(&self, id: ID<Restaurant>, status: Option<EventStatus>) -> Result<Vec<Event>> {
        self.store().events_of(id, status).await
    }
}
