use super::*;
use mealshare_core::Error;
use mealshare_core::ID;
use mealshare_records::*;
use mealshare_store::*;

/// An assignment with the volunteer filling it.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Crew {
    pub assignment: Assignment,
    pub volunteer: Volunteer,
}

impl<S, C> Service<S, C>
where
    S: Store,
    C: Cache,
{
    /// Files a pending application. The capacity check here is advisory;
    /// approval re-checks under the event lock.
    pub async fn apply(&self, volunteer: ID<Volunteer>, event: ID<Event>, role: &str) -> Result<Application> {
        let role = role.trim();
        if role.is_empty() {
            return Err(Error::Invalid(String::from("role is required")));
        }
        let store = self.store();
        let target = store.event(event).await?.ok_or(Error::NotFound("event"))?;
        if store.active_application(volunteer, event).await?.is_some() {
            return Err(Error::Conflict(String::from("already applied to this event")));
        }
        if store
            .assignments_of(volunteer)
            .await?
            .iter()
            .any(|a| a.event == event)
        {
            return Err(Error::Conflict(String::from("already assigned to this event")));
        }
        if target.status != EventStatus::Upcoming {
            return Err(Error::InvalidState(format!(
                "event is {}, not accepting applications",
                target.status
            )));
        }
        if !target.has_room(store.crew_size(event).await?) {
            return Err(Error::CapacityExceeded(String::from("event is fully staffed")));
        }
        let application = Application::new(event, volunteer, role.to_string());
        self.tx
            .run(async |tx: &S::Tx| tx.insert_application(&application).await)
            .await?;
        log::info!("[staffing] {} applied to {}", volunteer, event);
        Ok(application)
    }
    /// Approves a pending application and creates its assignment. The event
    /// row and then the application row stay locked until commit, so
    /// concurrent approvals cannot both take the last slot and a decided
    /// application cannot be decided again.
    pub async fn approve(&self, id: ID<Application>) -> Result<Assignment> {
        let assignment = self
            .tx
            .run(async |tx: &S::Tx| {
                let event = tx
                    .application(id)
                    .await?
                    .ok_or(Error::NotFound("application"))?
                    .event;
                let event = tx
                    .lock_event(event)
                    .await?
                    .ok_or(Error::NotFound("event"))?;
                let application = tx
                    .lock_application(id)
                    .await?
                    .ok_or(Error::NotFound("application"))?;
                let status = application.status.approve()?;
                if event.status.is_terminal() {
                    return Err(Error::InvalidState(format!("event is {}", event.status)));
                }
                if !event.has_room(tx.crew_size(event.id).await?) {
                    return Err(Error::CapacityExceeded(String::from(
                        "event is fully staffed",
                    )));
                }
                tx.set_application_status(id, status).await?;
                let assignment = Assignment::enlist(&application);
                tx.insert_assignment(&assignment).await?;
                Ok(assignment)
            })
            .await?;
        log::info!("[staffing] approved {}", id);
        Ok(assignment)
    }
    pub async fn decline(&self, id: ID<Application>) -> Result<Application> {
        self.tx
            .run(async |tx: &S::Tx| {
                let mut application = tx
                    .lock_application(id)
                    .await?
                    .ok_or(Error::NotFound("application"))?;
                application.status = application.status.decline()?;
                tx.set_application_status(id, application.status).await?;
                Ok(application)
            })
            .await
    }
    /// Marks a volunteer present at an active event.
    pub async fn check_in(&self, volunteer: ID<Volunteer>, id: ID<Assignment>) -> Result<Assignment> {
        self.tx
            .run(async |tx: &S::Tx| {
                let mut assignment = tx
                    .assignment(id)
                    .await?
                    .ok_or(Error::NotFound("assignment"))?;
                if assignment.volunteer != volunteer {
                    return Err(Error::Unauthorized);
                }
                let event = tx
                    .event(assignment.event)
                    .await?
                    .ok_or(Error::NotFound("event"))?;
                if event.status != EventStatus::Active {
                    return Err(Error::InvalidState(format!(
                        "check-in opens when the event is active, it is {}",
                        event.status
                    )));
                }
                tx.check_in(id).await?;
                assignment.checked_in = true;
                Ok(assignment)
            })
            .await
    }
    pub async fn pending_applications(&self, restaurant: ID<Restaurant>) -> Result<Vec<Application>> {
        self.store()
            .applications_for(restaurant, Some(ApplicationStatus::Pending))
            .await
    }
    pub async fn event_volunteers(&self, event: ID<Event>) -> Result<Vec<Crew>> {
        let mut crew = Vec::new();
        for assignment in self.store().assignments_for(event).await? {
            match self.store().volunteer(assignment.volunteer).await? {
                Some(volunteer) => crew.push(Crew {
                    assignment,
                    volunteer,
                }),
                None => log::warn!("[staffing] assignment {} has no volunteer", assignment.id),
            }
        }
        Ok(crew)
    }
    /// Restaurant-side ownership check for application routes.
    pub async fn owned_application(&self, restaurant: &Restaurant, id: ID<Application>) -> Result<Application> {
        let application = self
            .store()
            .application(id)
            .await?
            .ok_or(Error::NotFound("application"))?;
        self.owned_event(restaurant, application.event).await?;
        Ok(application)
    }
}
