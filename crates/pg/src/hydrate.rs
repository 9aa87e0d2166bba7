use mealshare_core::Error;
use mealshare_core::ID;
use mealshare_core::Result;
use mealshare_records::*;
use tokio_postgres::Row;

/// Decoding one domain record from a row selected with [`Hydrate::COLUMNS`].
pub trait Hydrate: Sized {
    /// Column list, in the order `hydrate` reads them.
    const COLUMNS: &'static str;
    fn hydrate(row: &Row) -> Result<Self>;
}

fn status<T>(row: &Row, idx: usize) -> Result<T>
where
    T: std::str::FromStr<Err = Error>,
{
    row.get::<_, String>(idx).parse().map_err(Error::infra)
}

impl Hydrate for Identity {
    const COLUMNS: &'static str = "id, username, email, kind, created";
    fn hydrate(row: &Row) -> Result<Self> {
        Ok(Self {
            id: ID::from(row.get::<_, uuid::Uuid>(0)),
            username: row.get(1),
            email: row.get(2),
            kind: status(row, 3)?,
            created: row.get(4),
        })
    }
}

impl Hydrate for Restaurant {
    const COLUMNS: &'static str =
        "id, user_id, name, address, contact_number, total_events, meals_served, rating";
    fn hydrate(row: &Row) -> Result<Self> {
        Ok(Self {
            id: ID::from(row.get::<_, uuid::Uuid>(0)),
            user: ID::from(row.get::<_, uuid::Uuid>(1)),
            name: row.get(2),
            address: row.get(3),
            contact_number: row.get(4),
            total_events: row.get(5),
            meals_served: row.get(6),
            rating: row.get(7),
        })
    }
}

impl Hydrate for Volunteer {
    const COLUMNS: &'static str = "id, user_id, full_name, phone_number, address, tasks_completed, hours_volunteered, meals_served, reputation_points";
    fn hydrate(row: &Row) -> Result<Self> {
        Ok(Self {
            id: ID::from(row.get::<_, uuid::Uuid>(0)),
            user: ID::from(row.get::<_, uuid::Uuid>(1)),
            full_name: row.get(2),
            phone_number: row.get(3),
            address: row.get(4),
            tasks_completed: row.get(5),
            hours_volunteered: row.get(6),
            meals_served: row.get(7),
            reputation_points: row.get(8),
        })
    }
}

impl Hydrate for Event {
    const COLUMNS: &'static str = "id, restaurant_id, title, description, location, starts, ends, max_guests, current_guests, max_volunteers, meals_served, status";
    fn hydrate(row: &Row) -> Result<Self> {
        Ok(Self {
            id: ID::from(row.get::<_, uuid::Uuid>(0)),
            restaurant: ID::from(row.get::<_, uuid::Uuid>(1)),
            title: row.get(2),
            description: row.get(3),
            location: row.get(4),
            starts: row.get(5),
            ends: row.get(6),
            max_guests: row.get(7),
            current_guests: row.get(8),
            max_volunteers: row.get(9),
            meals_served: row.get(10),
            status: status(row, 11)?,
        })
    }
}

impl Hydrate for Application {
    const COLUMNS: &'static str = "id, event_id, volunteer_id, role, status, applied";
    fn hydrate(row: &Row) -> Result<Self> {
        Ok(Self {
            id: ID::from(row.get::<_, uuid::Uuid>(0)),
            event: ID::from(row.get::<_, uuid::Uuid>(1)),
            volunteer: ID::from(row.get::<_, uuid::Uuid>(2)),
            role: row.get(3),
            status: status(row, 4)?,
            applied: row.get(5),
        })
    }
}

impl Hydrate for Assignment {
    const COLUMNS: &'static str = "id, event_id, volunteer_id, role, checked_in";
    fn hydrate(row: &Row) -> Result<Self> {
        Ok(Self {
            id: ID::from(row.get::<_, uuid::Uuid>(0)),
            event: ID::from(row.get::<_, uuid::Uuid>(1)),
            volunteer: ID::from(row.get::<_, uuid::Uuid>(2)),
            role: row.get(3),
            checked_in: row.get(4),
        })
    }
}

/// Decodes every row, stopping at the first malformed one.
pub fn hydrate_all<T>(rows: &[Row]) -> Result<Vec<T>>
where
    T: Hydrate,
{
    rows.iter().map(T::hydrate).collect()
}
