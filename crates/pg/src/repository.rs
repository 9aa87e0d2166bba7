use super::*;
use const_format::concatcp;
use mealshare_core::Count;
use mealshare_core::ID;
use mealshare_records::*;
use mealshare_store::*;

/// Zero affected rows means the target does not exist.
fn touched(rows: u64, entity: &'static str) -> Result<()> {
    match rows {
        0 => Err(Error::NotFound(entity)),
        _ => Ok(()),
    }
}

impl<S> IdentityRepository for Pg<S>
where
    S: Source,
{
    async fn exists(&self, username: &str, email: &str) -> Result<bool> {
        self.lease()
            .await?
            .query_opt(
                concatcp!("SELECT 1 FROM ", USERS, " WHERE username = $1 OR email = $2"),
                &[&username, &email],
            )
            .await
            .map(|opt| opt.is_some())
            .map_err(fault)
    }
    async fn enroll(&self, identity: &Identity, hashword: &str) -> Result<()> {
        self.lease()
            .await?
            .execute(
                concatcp!(
                    "INSERT INTO ",
                    USERS,
                    " (id, username, email, hashword, kind, created) VALUES ($1, $2, $3, $4, $5, $6)"
                ),
                &[
                    &identity.id.inner(),
                    &identity.username,
                    &identity.email,
                    &hashword,
                    &identity.kind.as_str(),
                    &identity.created,
                ],
            )
            .await
            .map(|_| ())
            .map_err(fault)
    }
    async fn identity(&self, id: ID<Identity>) -> Result<Option<Identity>> {
        self.lease()
            .await?
            .query_opt(
                concatcp!("SELECT ", <Identity as Hydrate>::COLUMNS, " FROM ", USERS, " WHERE id = $1"),
                &[&id.inner()],
            )
            .await
            .map_err(fault)?
            .as_ref()
            .map(Identity::hydrate)
            .transpose()
    }
    async fn by_email(&self, email: &str) -> Result<Option<(Identity, String)>> {
        self.lease()
            .await?
            .query_opt(
                concatcp!("SELECT ", <Identity as Hydrate>::COLUMNS, ", hashword FROM ", USERS, " WHERE email = $1"),
                &[&email],
            )
            .await
            .map_err(fault)?
            .map(|row| Identity::hydrate(&row).map(|identity| (identity, row.get::<_, String>(5))))
            .transpose()
    }
    async fn by_username(&self, username: &str) -> Result<Option<(Identity, String)>> {
        self.lease()
            .await?
            .query_opt(
                concatcp!("SELECT ", <Identity as Hydrate>::COLUMNS, ", hashword FROM ", USERS, " WHERE username = $1"),
                &[&username],
            )
            .await
            .map_err(fault)?
            .map(|row| Identity::hydrate(&row).map(|identity| (identity, row.get::<_, String>(5))))
            .transpose()
    }
}

impl<S> RestaurantRepository for Pg<S>
where
    S: Source,
{
    async fn insert_restaurant(&self, restaurant: &Restaurant) -> Result<()> {
        self.lease()
            .await?
            .execute(
                concatcp!(
                    "INSERT INTO ",
                    RESTAURANTS,
                    " (", <Restaurant as Hydrate>::COLUMNS, ") VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
                ),
                &[
                    &restaurant.id.inner(),
                    &restaurant.user.inner(),
                    &restaurant.name,
                    &restaurant.address,
                    &restaurant.contact_number,
                    &restaurant.total_events,
                    &restaurant.meals_served,
                    &restaurant.rating,
                ],
            )
            .await
            .map(|_| ())
            .map_err(fault)
    }
    async fn restaurant(&self, id: ID<Restaurant>) -> Result<Option<Restaurant>> {
        self.lease()
            .await?
            .query_opt(
                concatcp!("SELECT ", <Restaurant as Hydrate>::COLUMNS, " FROM ", RESTAURANTS, " WHERE id = $1"),
                &[&id.inner()],
            )
            .await
            .map_err(fault)?
            .as_ref()
            .map(Restaurant::hydrate)
            .transpose()
    }
    async fn restaurant_of(&self, user: ID<Identity>) -> Result<Option<Restaurant>> {
        self.lease()
            .await?
            .query_opt(
                concatcp!("SELECT ", <Restaurant as Hydrate>::COLUMNS, " FROM ", RESTAURANTS, " WHERE user_id = $1"),
                &[&user.inner()],
            )
            .await
            .map_err(fault)?
            .as_ref()
            .map(Restaurant::hydrate)
            .transpose()
    }
    async fn update_restaurant(&self, restaurant: &Restaurant) -> Result<()> {
        let rows = self
            .lease()
            .await?
            .execute(
                concatcp!(
                    "UPDATE ",
                    RESTAURANTS,
                    " SET name = $2, address = $3, contact_number = $4 WHERE id = $1"
                ),
                &[
                    &restaurant.id.inner(),
                    &restaurant.name,
                    &restaurant.address,
                    &restaurant.contact_number,
                ],
            )
            .await
            .map_err(fault)?;
        touched(rows, "restaurant")
    }
    async fn tally_restaurant(&self, id: ID<Restaurant>, events: Count, meals: Count) -> Result<()> {
        let rows = self
            .lease()
            .await?
            .execute(
                concatcp!(
                    "UPDATE ",
                    RESTAURANTS,
                    " SET total_events = total_events + $2, meals_served = meals_served + $3 WHERE id = $1"
                ),
                &[&id.inner(), &events, &meals],
            )
            .await
            .map_err(fault)?;
        touched(rows, "restaurant")
    }
}

impl<S> VolunteerRepository for Pg<S>
where
    S: Source,
{
    async fn insert_volunteer(&self, volunteer: &Volunteer) -> Result<()> {
        self.lease()
            .await?
            .execute(
                concatcp!(
                    "INSERT INTO ",
                    VOLUNTEERS,
                    " (", <Volunteer as Hydrate>::COLUMNS, ") VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)"
                ),
                &[
                    &volunteer.id.inner(),
                    &volunteer.user.inner(),
                    &volunteer.full_name,
                    &volunteer.phone_number,
                    &volunteer.address,
                    &volunteer.tasks_completed,
                    &volunteer.hours_volunteered,
                    &volunteer.meals_served,
                    &volunteer.reputation_points,
                ],
            )
            .await
            .map(|_| ())
            .map_err(fault)
    }
    async fn volunteer(&self, id: ID<Volunteer>) -> Result<Option<Volunteer>> {
        self.lease()
            .await?
            .query_opt(
                concatcp!("SELECT ", <Volunteer as Hydrate>::COLUMNS, " FROM ", VOLUNTEERS, " WHERE id = $1"),
                &[&id.inner()],
            )
            .await
            .map_err(fault)?
            .as_ref()
            .map(Volunteer::hydrate)
            .transpose()
    }
    async fn volunteer_of(&self, user: ID<Identity>) -> Result<Option<Volunteer>> {
        self.lease()
            .await?
            .query_opt(
                concatcp!("SELECT ", <Volunteer as Hydrate>::COLUMNS, " FROM ", VOLUNTEERS, " WHERE user_id = $1"),
                &[&user.inner()],
            )
            .await
            .map_err(fault)?
            .as_ref()
            .map(Volunteer::hydrate)
            .transpose()
    }
    async fn credit_volunteer(&self, id: ID<Volunteer>, credit: &Credit) -> Result<()> {
        let rows = self
            .lease()
            .await?
            .execute(
                concatcp!(
                    "UPDATE ",
                    VOLUNTEERS,
                    " SET tasks_completed = tasks_completed + $2,
                          hours_volunteered = hours_volunteered + $3,
                          meals_served = meals_served + $4,
                          reputation_points = reputation_points + $5
                      WHERE id = $1"
                ),
                &[
                    &id.inner(),
                    &credit.tasks,
                    &credit.hours,
                    &credit.meals,
                    &credit.reputation,
                ],
            )
            .await
            .map_err(fault)?;
        touched(rows, "volunteer")
    }
}

impl<S> EventRepository for Pg<S>
where
    S: Source,
{
    async fn insert_event(&self, event: &Event) -> Result<()> {
        self.lease()
            .await?
            .execute(
                concatcp!(
                    "INSERT INTO ",
                    EVENTS,
                    " (", <Event as Hydrate>::COLUMNS, ") VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)"
                ),
                &[
                    &event.id.inner(),
                    &event.restaurant.inner(),
                    &event.title,
                    &event.description,
                    &event.location,
                    &event.starts,
                    &event.ends,
                    &event.max_guests,
                    &event.current_guests,
                    &event.max_volunteers,
                    &event.meals_served,
                    &event.status.as_str(),
                ],
            )
            .await
            .map(|_| ())
            .map_err(fault)
    }
    async fn event(&self, id: ID<Event>) -> Result<Option<Event>> {
        self.lease()
            .await?
            .query_opt(
                concatcp!("SELECT ", <Event as Hydrate>::COLUMNS, " FROM ", EVENTS, " WHERE id = $1"),
                &[&id.inner()],
            )
            .await
            .map_err(fault)?
            .as_ref()
            .map(Event::hydrate)
            .transpose()
    }
    async fn lock_event(&self, id: ID<Event>) -> Result<Option<Event>> {
        self.lease()
            .await?
            .query_opt(
                concatcp!("SELECT ", <Event as Hydrate>::COLUMNS, " FROM ", EVENTS, " WHERE id = $1 FOR UPDATE"),
                &[&id.inner()],
            )
            .await
            .map_err(fault)?
            .as_ref()
            .map(Event::hydrate)
            .transpose()
    }
    async fn events_of(&self, restaurant: ID<Restaurant>, status: Option<EventStatus>) -> Result<Vec<Event>> {
        let status = status.as_ref().map(EventStatus::as_str);
        self.lease()
            .await?
            .query(
                concatcp!(
                    "SELECT ", <Event as Hydrate>::COLUMNS, " FROM ", EVENTS,
                    " WHERE restaurant_id = $1 AND ($2::VARCHAR IS NULL OR status = $2) ORDER BY starts"
                ),
                &[&restaurant.inner(), &status],
            )
            .await
            .map_err(fault)
            .and_then(|rows| hydrate_all(&rows))
    }
    async fn upcoming_events(&self) -> Result<Vec<Event>> {
        self.lease()
            .await?
            .query(
                concatcp!(
                    "SELECT ", <Event as Hydrate>::COLUMNS, " FROM ", EVENTS,
                    " WHERE status = 'upcoming' ORDER BY starts"
                ),
                &[],
            )
            .await
            .map_err(fault)
            .and_then(|rows| hydrate_all(&rows))
    }
    async fn set_event_status(&self, id: ID<Event>, status: EventStatus) -> Result<()> {
        let rows = self
            .lease()
            .await?
            .execute(
                concatcp!("UPDATE ", EVENTS, " SET status = $2 WHERE id = $1"),
                &[&id.inner(), &status.as_str()],
            )
            .await
            .map_err(fault)?;
        touched(rows, "event")
    }
    async fn set_guests(&self, id: ID<Event>, guests: Count) -> Result<()> {
        let rows = self
            .lease()
            .await?
            .execute(
                concatcp!("UPDATE ", EVENTS, " SET current_guests = $2 WHERE id = $1"),
                &[&id.inner(), &guests],
            )
            .await
            .map_err(fault)?;
        touched(rows, "event")
    }
    async fn set_meals(&self, id: ID<Event>, meals: Count) -> Result<()> {
        let rows = self
            .lease()
            .await?
            .execute(
                concatcp!("UPDATE ", EVENTS, " SET meals_served = $2 WHERE id = $1"),
                &[&id.inner(), &meals],
            )
            .await
            .map_err(fault)?;
        touched(rows, "event")
    }
    async fn delete_event(&self, id: ID<Event>) -> Result<()> {
        let rows = self
            .lease()
            .await?
            .execute(
                concatcp!("DELETE FROM ", EVENTS, " WHERE id = $1"),
                &[&id.inner()],
            )
            .await
            .map_err(fault)?;
        touched(rows, "event")
    }
}

impl<S> ApplicationRepository for Pg<S>
where
    S: Source,
{
    async fn insert_application(&self, application: &Application) -> Result<()> {
        self.lease()
            .await?
            .execute(
                concatcp!(
                    "INSERT INTO ",
                    APPLICATIONS,
                    " (", <Application as Hydrate>::COLUMNS, ") VALUES ($1, $2, $3, $4, $5, $6)"
                ),
                &[
                    &application.id.inner(),
                    &application.event.inner(),
                    &application.volunteer.inner(),
                    &application.role,
                    &application.status.as_str(),
                    &application.applied,
                ],
            )
            .await
            .map(|_| ())
            .map_err(fault)
    }
    async fn application(&self, id: ID<Application>) -> Result<Option<Application>> {
        self.lease()
            .await?
            .query_opt(
                concatcp!("SELECT ", <Application as Hydrate>::COLUMNS, " FROM ", APPLICATIONS, " WHERE id = $1"),
                &[&id.inner()],
            )
            .await
            .map_err(fault)?
            .as_ref()
            .map(Application::hydrate)
            .transpose()
    }
    async fn lock_application(&self, id: ID<Application>) -> Result<Option<Application>> {
        self.lease()
            .await?
            .query_opt(
                concatcp!("SELECT ", <Application as Hydrate>::COLUMNS, " FROM ", APPLICATIONS, " WHERE id = $1 FOR UPDATE"),
                &[&id.inner()],
            )
            .await
            .map_err(fault)?
            .as_ref()
            .map(Application::hydrate)
            .transpose()
    }
    async fn applications_of(&self, volunteer: ID<Volunteer>) -> Result<Vec<Application>> {
        self.lease()
            .await?
            .query(
                concatcp!(
                    "SELECT ", <Application as Hydrate>::COLUMNS, " FROM ", APPLICATIONS,
                    " WHERE volunteer_id = $1 ORDER BY applied"
                ),
                &[&volunteer.inner()],
            )
            .await
            .map_err(fault)
            .and_then(|rows| hydrate_all(&rows))
    }
    async fn applications_for(&self, restaurant: ID<Restaurant>, status: Option<ApplicationStatus>) -> Result<Vec<Application>> {
        let status = status.as_ref().map(ApplicationStatus::as_str);
        self.lease()
            .await?
            .query(
                concatcp!(
                    "SELECT ", <Application as Hydrate>::COLUMNS, " FROM ", APPLICATIONS,
                    " WHERE event_id IN (SELECT id FROM ", EVENTS, " WHERE restaurant_id = $1)",
                    " AND ($2::VARCHAR IS NULL OR status = $2) ORDER BY applied"
                ),
                &[&restaurant.inner(), &status],
            )
            .await
            .map_err(fault)
            .and_then(|rows| hydrate_all(&rows))
    }
    async fn active_application(&self, volunteer: ID<Volunteer>, event: ID<Event>) -> Result<Option<Application>> {
        self.lease()
            .await?
            .query_opt(
                concatcp!(
                    "SELECT ", <Application as Hydrate>::COLUMNS, " FROM ", APPLICATIONS,
                    " WHERE volunteer_id = $1 AND event_id = $2 AND status IN ('pending', 'approved')"
                ),
                &[&volunteer.inner(), &event.inner()],
            )
            .await
            .map_err(fault)?
            .as_ref()
            .map(Application::hydrate)
            .transpose()
    }
    async fn set_application_status(&self, id: ID<Application>, status: ApplicationStatus) -> Result<()> {
        let rows = self
            .lease()
            .await?
            .execute(
                concatcp!("UPDATE ", APPLICATIONS, " SET status = $2 WHERE id = $1 AND status = 'pending'"),
                &[&id.inner(), &status.as_str()],
            )
            .await
            .map_err(fault)?;
        match rows {
            0 => match self.application(id).await? {
                Some(stored) => Err(Error::InvalidState(format!("application already {}", stored.status))),
                None => Err(Error::NotFound("application")),
            },
            _ => Ok(()),
        }
    }
    async fn purge_applications(&self, event: ID<Event>) -> Result<()> {
        self.lease()
            .await?
            .execute(
                concatcp!("DELETE FROM ", APPLICATIONS, " WHERE event_id = $1"),
                &[&event.inner()],
            )
            .await
            .map(|_| ())
            .map_err(fault)
    }
}

impl<S> AssignmentRepository for Pg<S>
where
    S: Source,
{
    async fn insert_assignment(&self, assignment: &Assignment) -> Result<()> {
        self.lease()
            .await?
            .execute(
                concatcp!(
                    "INSERT INTO ",
                    ASSIGNMENTS,
                    " (", <Assignment as Hydrate>::COLUMNS, ") VALUES ($1, $2, $3, $4, $5)"
                ),
                &[
                    &assignment.id.inner(),
                    &assignment.event.inner(),
                    &assignment.volunteer.inner(),
                    &assignment.role,
                    &assignment.checked_in,
                ],
            )
            .await
            .map(|_| ())
            .map_err(fault)
    }
    async fn assignment(&self, id: ID<Assignment>) -> Result<Option<Assignment>> {
        self.lease()
            .await?
            .query_opt(
                concatcp!("SELECT ", <Assignment as Hydrate>::COLUMNS, " FROM ", ASSIGNMENTS, " WHERE id = $1"),
                &[&id.inner()],
            )
            .await
            .map_err(fault)?
            .as_ref()
            .map(Assignment::hydrate)
            .transpose()
    }
    async fn assignments_for(&self, event: ID<Event>) -> Result<Vec<Assignment>> {
        self.lease()
            .await?
            .query(
                concatcp!("SELECT ", <Assignment as Hydrate>::COLUMNS, " FROM ", ASSIGNMENTS, " WHERE event_id = $1"),
                &[&event.inner()],
            )
            .await
            .map_err(fault)
            .and_then(|rows| hydrate_all(&rows))
    }
    async fn assignments_of(&self, volunteer: ID<Volunteer>) -> Result<Vec<Assignment>> {
        self.lease()
            .await?
            .query(
                concatcp!("SELECT ", <Assignment as Hydrate>::COLUMNS, " FROM ", ASSIGNMENTS, " WHERE volunteer_id = $1"),
                &[&volunteer.inner()],
            )
            .await
            .map_err(fault)
            .and_then(|rows| hydrate_all(&rows))
    }
    async fn crew_size(&self, event: ID<Event>) -> Result<usize> {
        self.lease()
            .await?
            .query_one(
                concatcp!("SELECT COUNT(*) FROM ", ASSIGNMENTS, " WHERE event_id = $1"),
                &[&event.inner()],
            )
            .await
            .map(|row| row.get::<_, i64>(0) as usize)
            .map_err(fault)
    }
    async fn check_in(&self, id: ID<Assignment>) -> Result<()> {
        let rows = self
            .lease()
            .await?
            .execute(
                concatcp!("UPDATE ", ASSIGNMENTS, " SET checked_in = TRUE WHERE id = $1"),
                &[&id.inner()],
            )
            .await
            .map_err(fault)?;
        touched(rows, "assignment")
    }
    async fn purge_assignments(&self, event: ID<Event>) -> Result<()> {
        self.lease()
            .await?
            .execute(
                concatcp!("DELETE FROM ", ASSIGNMENTS, " WHERE event_id = $1"),
                &[&event.inner()],
            )
            .await
            .map(|_| ())
            .map_err(fault)
    }
}
