use super::*;
use mealshare_core::Count;
use mealshare_core::Error;
use mealshare_core::ID;
use mealshare_records::*;
use mealshare_store::*;

async fn locked<T>(tx: &T, id: ID<Event>) -> Result<Event>
where
    T: EventRepository,
{
    tx.lock_event(id).await?.ok_or(Error::NotFound("event"))
}

impl<S, C> Service<S, C>
where
    S: Store,
    C: Cache,
{
    /// Inserts an upcoming event and bumps the owner's event count.
    pub async fn create_event(&self, restaurant: ID<Restaurant>, draft: Draft) -> Result<Event> {
        draft.validate()?;
        let event = Event::draft(restaurant, draft);
        self.tx
            .run(async |tx: &S::Tx| {
                tx.insert_event(&event).await?;
                tx.tally_restaurant(restaurant, 1, 0).await
            })
            .await?;
        log::info!("[events] created {} for {}", event.id, restaurant);
        Ok(event)
    }
    /// Sets the event's meal count and moves the restaurant's total by the
    /// difference. Completed and canceled events are frozen.
    pub async fn update_meals_served(&self, id: ID<Event>, count: Count) -> Result<Event> {
        if count < 0 {
            return Err(Error::Invalid(String::from("meal count must not be negative")));
        }
        self.tx
            .run(async |tx: &S::Tx| {
                let mut event = locked(tx, id).await?;
                if event.status.is_terminal() {
                    return Err(Error::InvalidState(format!("event is {}", event.status)));
                }
                let delta = count - event.meals_served;
                tx.set_meals(id, count).await?;
                tx.tally_restaurant(event.restaurant, 0, delta).await?;
                event.meals_served = count;
                Ok(event)
            })
            .await
    }
    /// Removes the event with its staffing records and backs its
    /// contribution out of the restaurant's totals. Completed events stay,
    /// since volunteers have been credited for them.
    pub async fn delete_event(&self, id: ID<Event>) -> Result<()> {
        self.tx
            .run(async |tx: &S::Tx| {
                let event = locked(tx, id).await?;
                if event.status == EventStatus::Past {
                    return Err(Error::InvalidState(String::from(
                        "completed events cannot be deleted",
                    )));
                }
                tx.purge_assignments(id).await?;
                tx.purge_applications(id).await?;
                tx.delete_event(id).await?;
                tx.tally_restaurant(event.restaurant, -1, -event.meals_served)
                    .await
            })
            .await?;
        log::info!("[events] deleted {}", id);
        Ok(())
    }
    /// Moving to `past` runs [`Service::complete_event`].
    pub async fn update_status(&self, id: ID<Event>, status: EventStatus) -> Result<Event> {
        if status == EventStatus::Past {
            return self.complete_event(id).await;
        }
        self.tx
            .run(async |tx: &S::Tx| {
                let mut event = locked(tx, id).await?;
                event.status = event.status.advance(status)?;
                tx.set_event_status(id, event.status).await?;
                Ok(event)
            })
            .await
    }
    pub async fn update_guest_count(&self, id: ID<Event>, count: Count) -> Result<Event> {
        if count < 0 {
            return Err(Error::Invalid(String::from("guest count must not be negative")));
        }
        self.tx
            .run(async |tx: &S::Tx| {
                let mut event = locked(tx, id).await?;
                if event.status.is_terminal() {
                    return Err(Error::InvalidState(format!("event is {}", event.status)));
                }
                if count > event.max_guests {
                    return Err(Error::CapacityExceeded(format!(
                        "event seats {} guests",
                        event.max_guests
                    )));
                }
                tx.set_guests(id, count).await?;
                event.current_guests = count;
                Ok(event)
            })
            .await
    }
    /// Closes an active event and credits every checked-in volunteer with
    /// their share of it.
    pub async fn complete_event(&self, id: ID<Event>) -> Result<Event> {
        let event = self
            .tx
            .run(async |tx: &S::Tx| {
                let mut event = locked(tx, id).await?;
                event.status = event.status.advance(EventStatus::Past)?;
                tx.set_event_status(id, event.status).await?;
                let crew = tx.assignments_for(id).await?;
                let credit = Credit::shift(&event, crew.len());
                for assignment in crew.iter().filter(|a| a.checked_in) {
                    tx.credit_volunteer(assignment.volunteer, &credit).await?;
                }
                Ok(event)
            })
            .await?;
        log::info!("[events] completed {}", id);
        Ok(event)
    }
    /// Restaurant-side ownership check for event routes.
    pub async fn owned_event(&self, restaurant: &Restaurant, id: ID<Event>) -> Result<Event> {
        let event = self
            .store()
            .event(id)
            .await?
            .ok_or(Error::NotFound("event"))?;
        match event.restaurant == restaurant.id {
            true => Ok(event),
            false => Err(Error::Unauthorized),
        }
    }
}
