use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

const SCHEMA_V1: &str = "
    CREATE TABLE users (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name        TEXT NOT NULL,
        email       TEXT NOT NULL UNIQUE,
        password    TEXT NOT NULL,
        role        TEXT NOT NULL DEFAULT 'student',
        school_id   TEXT,
        created_at  TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE gigs (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        client_id   INTEGER NOT NULL,
        title       TEXT NOT NULL,
        description TEXT NOT NULL,
        budget      REAL NOT NULL,
        category    TEXT,
        status      TEXT NOT NULL DEFAULT 'open',
        created_at  TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE INDEX idx_gigs_client ON gigs(client_id);

    CREATE TABLE applications (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        gig_id        INTEGER NOT NULL,
        student_id    INTEGER NOT NULL,
        cover_letter  TEXT,
        status        TEXT NOT NULL DEFAULT 'pending',
        created_at    TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE INDEX idx_applications_gig ON applications(gig_id);
    CREATE INDEX idx_applications_student ON applications(student_id);

    CREATE TABLE messages (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        sender_id    INTEGER NOT NULL,
        receiver_id  INTEGER NOT NULL,
        content      TEXT NOT NULL,
        created_at   TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE INDEX idx_messages_pair
        ON messages(sender_id, receiver_id, created_at);

    CREATE TABLE notifications (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id     INTEGER NOT NULL,
        message     TEXT NOT NULL,
        link        TEXT,
        is_read     INTEGER NOT NULL DEFAULT 0,
        created_at  TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE INDEX idx_notifications_user ON notifications(user_id, created_at);

    CREATE TABLE ratings (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        gig_id          INTEGER NOT NULL,
        rater_id        INTEGER NOT NULL,
        target_user_id  INTEGER NOT NULL,
        stars           INTEGER NOT NULL,
        review          TEXT,
        created_at      TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE INDEX idx_ratings_target ON ratings(target_user_id);

    CREATE TABLE transactions (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        gig_id      INTEGER NOT NULL,
        from_user   INTEGER NOT NULL,
        to_user     INTEGER NOT NULL,
        amount      REAL NOT NULL,
        created_at  TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE INDEX idx_transactions_gig ON transactions(gig_id);
";

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(&format!(
            "BEGIN; {} INSERT INTO schema_version (version) VALUES (1); COMMIT;",
            SCHEMA_V1
        ))?;
    }

    info!("Database migrations complete");
    Ok(())
}
