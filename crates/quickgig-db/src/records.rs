use anyhow::{Result, bail};
use rusqlite::Row;

use quickgig_types::models::{Application, Gig, Message, Notification, Rating, Transaction};

use crate::models::{UserRow, role_at, timestamp_at};

/// Static description of an entity table: its name, the columns selected
/// (in `from_row` order, `id` first) and the default ordering for lists.
#[derive(Debug, Clone, Copy)]
pub struct Table {
    pub name: &'static str,
    pub columns: &'static [&'static str],
    pub order_by: &'static str,
}

impl Table {
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains(&column)
    }

    /// Column names are spliced into SQL text, so only declared ones pass.
    pub fn check_column(&self, column: &str) -> Result<()> {
        if !self.has_column(column) {
            bail!("Unknown column '{}' on table '{}'", column, self.name);
        }
        Ok(())
    }

    pub fn select_sql(&self, where_clause: Option<&str>, order_by: Option<&str>) -> String {
        let mut sql = format!("SELECT {} FROM {}", self.columns.join(", "), self.name);
        if let Some(clause) = where_clause {
            sql.push_str(" WHERE ");
            sql.push_str(clause);
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(order_by.unwrap_or(self.order_by));
        sql
    }
}

/// An entity stored in one table and readable from one row.
pub trait Record: Sized + Send + 'static {
    const TABLE: Table;
    /// Singular name used in API messages ("Gig updated").
    const NAME: &'static str;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

impl Record for UserRow {
    const TABLE: Table = Table {
        name: "users",
        columns: &["id", "name", "email", "password", "role", "school_id", "created_at"],
        order_by: "id ASC",
    };
    const NAME: &'static str = "User";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            password: row.get(3)?,
            role: role_at(row, 4)?,
            school_id: row.get(5)?,
            created_at: timestamp_at(row, 6)?,
        })
    }
}

impl Record for Gig {
    const TABLE: Table = Table {
        name: "gigs",
        columns: &["id", "client_id", "title", "description", "budget", "category", "status", "created_at"],
        order_by: "id ASC",
    };
    const NAME: &'static str = "Gig";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            client_id: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            budget: row.get(4)?,
            category: row.get(5)?,
            status: row.get(6)?,
            created_at: timestamp_at(row, 7)?,
        })
    }
}

impl Record for Application {
    const TABLE: Table = Table {
        name: "applications",
        columns: &["id", "gig_id", "student_id", "cover_letter", "status", "created_at"],
        order_by: "id ASC",
    };
    const NAME: &'static str = "Application";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            gig_id: row.get(1)?,
            student_id: row.get(2)?,
            cover_letter: row.get(3)?,
            status: row.get(4)?,
            created_at: timestamp_at(row, 5)?,
        })
    }
}

impl Record for Message {
    const TABLE: Table = Table {
        name: "messages",
        columns: &["id", "sender_id", "receiver_id", "content", "created_at"],
        // Same-second inserts fall back to insertion order
        order_by: "created_at ASC, id ASC",
    };
    const NAME: &'static str = "Message";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            sender_id: row.get(1)?,
            receiver_id: row.get(2)?,
            content: row.get(3)?,
            created_at: timestamp_at(row, 4)?,
        })
    }
}

impl Record for Notification {
    const TABLE: Table = Table {
        name: "notifications",
        columns: &["id", "user_id", "message", "link", "is_read", "created_at"],
        order_by: "created_at DESC, id DESC",
    };
    const NAME: &'static str = "Notification";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            message: row.get(2)?,
            link: row.get(3)?,
            is_read: row.get(4)?,
            created_at: timestamp_at(row, 5)?,
        })
    }
}

impl Record for Rating {
    const TABLE: Table = Table {
        name: "ratings",
        columns: &["id", "gig_id", "rater_id", "target_user_id", "stars", "review", "created_at"],
        order_by: "id ASC",
    };
    const NAME: &'static str = "Rating";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            gig_id: row.get(1)?,
            rater_id: row.get(2)?,
            target_user_id: row.get(3)?,
            stars: row.get(4)?,
            review: row.get(5)?,
            created_at: timestamp_at(row, 6)?,
        })
    }
}

impl Record for Transaction {
    const TABLE: Table = Table {
        name: "transactions",
        columns: &["id", "gig_id", "from_user", "to_user", "amount", "created_at"],
        order_by: "id ASC",
    };
    const NAME: &'static str = "Transaction";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            gig_id: row.get(1)?,
            from_user: row.get(2)?,
            to_user: row.get(3)?,
            amount: row.get(4)?,
            created_at: timestamp_at(row, 5)?,
        })
    }
}
