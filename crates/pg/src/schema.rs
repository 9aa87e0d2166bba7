use super::*;
use mealshare_records::*;

/// Schema metadata for PostgreSQL tables.
///
/// Pure description: statements are built at compile time with
/// [`const_format::concatcp!`] and executed by [`Postgres::migrate`].
pub trait Schema {
    /// Returns the table name in the database.
    fn name() -> &'static str;
    /// Returns `CREATE TABLE IF NOT EXISTS` DDL statement.
    fn creates() -> &'static str;
    /// Returns `CREATE INDEX IF NOT EXISTS` statements for all indices.
    fn indices() -> &'static str;
}

/// Every table in dependency order.
pub fn tables() -> [(&'static str, &'static str, &'static str); 6] {
    fn entry<T: Schema>() -> (&'static str, &'static str, &'static str) {
        (T::name(), T::creates(), T::indices())
    }
    [
        entry::<Identity>(),
        entry::<Restaurant>(),
        entry::<Volunteer>(),
        entry::<Event>(),
        entry::<Application>(),
        entry::<Assignment>(),
    ]
}

/// Note: hashword is a database-only field, not part of the Identity type.
impl Schema for Identity {
    fn name() -> &'static str {
        USERS
    }
    fn creates() -> &'static str {
        const_format::concatcp!(
            "CREATE TABLE IF NOT EXISTS ",
            USERS,
            " (
                id          UUID PRIMARY KEY,
                username    VARCHAR(32) UNIQUE NOT NULL,
                email       VARCHAR(255) UNIQUE NOT NULL,
                hashword    TEXT NOT NULL,
                kind        VARCHAR(16) NOT NULL,
                created     TIMESTAMPTZ NOT NULL DEFAULT now()
            );"
        )
    }
    fn indices() -> &'static str {
        const_format::concatcp!(
            "CREATE INDEX IF NOT EXISTS idx_users_username ON ",
            USERS,
            " (username);
             CREATE INDEX IF NOT EXISTS idx_users_email ON ",
            USERS,
            " (email);"
        )
    }
}

impl Schema for Restaurant {
    fn name() -> &'static str {
        RESTAURANTS
    }
    fn creates() -> &'static str {
        const_format::concatcp!(
            "CREATE TABLE IF NOT EXISTS ",
            RESTAURANTS,
            " (
                id              UUID PRIMARY KEY,
                user_id         UUID UNIQUE NOT NULL REFERENCES ",
            USERS,
            "(id),
                name            TEXT NOT NULL,
                address         TEXT NOT NULL,
                contact_number  TEXT NOT NULL,
                total_events    INTEGER NOT NULL DEFAULT 0,
                meals_served    INTEGER NOT NULL DEFAULT 0,
                rating          DOUBLE PRECISION NOT NULL DEFAULT 0
            );"
        )
    }
    fn indices() -> &'static str {
        const_format::concatcp!(
            "CREATE INDEX IF NOT EXISTS idx_restaurants_user ON ",
            RESTAURANTS,
            " (user_id);"
        )
    }
}

impl Schema for Volunteer {
    fn name() -> &'static str {
        VOLUNTEERS
    }
    fn creates() -> &'static str {
        const_format::concatcp!(
            "CREATE TABLE IF NOT EXISTS ",
            VOLUNTEERS,
            " (
                id                  UUID PRIMARY KEY,
                user_id             UUID UNIQUE NOT NULL REFERENCES ",
            USERS,
            "(id),
                full_name           TEXT NOT NULL,
                phone_number        TEXT NOT NULL,
                address             TEXT NOT NULL,
                tasks_completed     INTEGER NOT NULL DEFAULT 0,
                hours_volunteered   INTEGER NOT NULL DEFAULT 0,
                meals_served        INTEGER NOT NULL DEFAULT 0,
                reputation_points   INTEGER NOT NULL DEFAULT 0
            );"
        )
    }
    fn indices() -> &'static str {
        const_format::concatcp!(
            "CREATE INDEX IF NOT EXISTS idx_volunteers_user ON ",
            VOLUNTEERS,
            " (user_id);"
        )
    }
}

impl Schema for Event {
    fn name() -> &'static str {
        EVENTS
    }
    fn creates() -> &'static str {
        const_format::concatcp!(
            "CREATE TABLE IF NOT EXISTS ",
            EVENTS,
            " (
                id              UUID PRIMARY KEY,
                restaurant_id   UUID NOT NULL REFERENCES ",
            RESTAURANTS,
            "(id),
                title           TEXT NOT NULL,
                description     TEXT NOT NULL,
                location        TEXT NOT NULL,
                starts          TIMESTAMPTZ NOT NULL,
                ends            TIMESTAMPTZ NOT NULL,
                max_guests      INTEGER NOT NULL,
                current_guests  INTEGER NOT NULL DEFAULT 0,
                max_volunteers  INTEGER NOT NULL,
                meals_served    INTEGER NOT NULL DEFAULT 0,
                status          VARCHAR(16) NOT NULL
            );"
        )
    }
    fn indices() -> &'static str {
        const_format::concatcp!(
            "CREATE INDEX IF NOT EXISTS idx_events_restaurant ON ",
            EVENTS,
            " (restaurant_id);
             CREATE INDEX IF NOT EXISTS idx_events_status_starts ON ",
            EVENTS,
            " (status, starts);"
        )
    }
}

impl Schema for Application {
    fn name() -> &'static str {
        APPLICATIONS
    }
    fn creates() -> &'static str {
        const_format::concatcp!(
            "CREATE TABLE IF NOT EXISTS ",
            APPLICATIONS,
            " (
                id              UUID PRIMARY KEY,
                event_id        UUID NOT NULL REFERENCES ",
            EVENTS,
            "(id),
                volunteer_id    UUID NOT NULL REFERENCES ",
            VOLUNTEERS,
            "(id),
                role            TEXT NOT NULL,
                status          VARCHAR(16) NOT NULL,
                applied         TIMESTAMPTZ NOT NULL
            );"
        )
    }
    /// At most one pending-or-approved application per volunteer and event.
    fn indices() -> &'static str {
        const_format::concatcp!(
            "CREATE INDEX IF NOT EXISTS idx_applications_event ON ",
            APPLICATIONS,
            " (event_id);
             CREATE UNIQUE INDEX IF NOT EXISTS idx_applications_active ON ",
            APPLICATIONS,
            " (volunteer_id, event_id) WHERE status IN ('pending', 'approved');"
        )
    }
}

impl Schema for Assignment {
    fn name() -> &'static str {
        ASSIGNMENTS
    }
    fn creates() -> &'static str {
        const_format::concatcp!(
            "CREATE TABLE IF NOT EXISTS ",
            ASSIGNMENTS,
            " (
                id              UUID PRIMARY KEY,
                event_id        UUID NOT NULL REFERENCES ",
            EVENTS,
            "(id),
                volunteer_id    UUID NOT NULL REFERENCES ",
            VOLUNTEERS,
            "(id),
                role            TEXT NOT NULL,
                checked_in      BOOLEAN NOT NULL DEFAULT FALSE,
                UNIQUE (event_id, volunteer_id)
            );"
        )
    }
    fn indices() -> &'static str {
        const_format::concatcp!(
            "CREATE INDEX IF NOT EXISTS idx_assignments_event ON ",
            ASSIGNMENTS,
            " (event_id);
             CREATE INDEX IF NOT EXISTS idx_assignments_volunteer ON ",
            ASSIGNMENTS,
            " (volunteer_id);"
        )
    }
}
