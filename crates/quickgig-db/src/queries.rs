use anyhow::{Result, bail};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params_from_iter};

use quickgig_types::models::{Message, Notification, Transaction};

use crate::Database;
use crate::models::UserRow;
use crate::records::Record;

impl Database {
    // -- Generic CRUD --

    pub fn list<R: Record>(&self) -> Result<Vec<R>> {
        self.list_where::<R>(&[])
    }

    /// Rows matching every `column = value` filter, in the table's default order.
    pub fn list_where<R: Record>(&self, filters: &[(&str, Value)]) -> Result<Vec<R>> {
        let table = R::TABLE;
        for (column, _) in filters {
            table.check_column(column)?;
        }

        let clause = (!filters.is_empty()).then(|| {
            filters
                .iter()
                .enumerate()
                .map(|(i, (column, _))| format!("{} = ?{}", column, i + 1))
                .collect::<Vec<_>>()
                .join(" AND ")
        });
        let sql = table.select_sql(clause.as_deref(), None);

        self.with_conn(|conn| query_records(conn, &sql, filters.iter().map(|(_, v)| v)))
    }

    pub fn find<R: Record>(&self, id: i64) -> Result<Option<R>> {
        let sql = R::TABLE.select_sql(Some("id = ?1"), None);
        self.with_conn(|conn| {
            let row = conn.query_row(&sql, [id], |row| R::from_row(row)).optional()?;
            Ok(row)
        })
    }

    /// Insert one row and return its generated id. Columns left out take the
    /// schema defaults.
    pub fn insert<R: Record>(&self, fields: &[(&str, Value)]) -> Result<i64> {
        let table = R::TABLE;
        if fields.is_empty() {
            bail!("Insert into '{}' without any fields", table.name);
        }
        for (column, _) in fields {
            table.check_column(column)?;
        }

        let columns: Vec<&str> = fields.iter().map(|(c, _)| *c).collect();
        let placeholders: Vec<String> = (1..=fields.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table.name,
            columns.join(", "),
            placeholders.join(", ")
        );

        self.with_conn_mut(|conn| {
            conn.execute(&sql, params_from_iter(fields.iter().map(|(_, v)| v)))?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Partial update. A missing id is not an error: the result is simply
    /// zero rows affected.
    pub fn update<R: Record>(&self, id: i64, fields: &[(&str, Value)]) -> Result<usize> {
        let table = R::TABLE;
        if fields.is_empty() {
            bail!("Update of '{}' without any fields", table.name);
        }
        for (column, _) in fields {
            table.check_column(column)?;
            if *column == "id" {
                bail!("Refusing to update primary key of '{}'", table.name);
            }
        }

        let assignments: Vec<String> = fields
            .iter()
            .enumerate()
            .map(|(i, (column, _))| format!("{} = ?{}", column, i + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            table.name,
            assignments.join(", "),
            fields.len() + 1
        );

        let params = fields
            .iter()
            .map(|(_, v)| v.clone())
            .chain(std::iter::once(Value::Integer(id)));

        self.with_conn_mut(|conn| Ok(conn.execute(&sql, params_from_iter(params))?))
    }

    pub fn delete<R: Record>(&self, id: i64) -> Result<usize> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", R::TABLE.name);
        self.with_conn_mut(|conn| Ok(conn.execute(&sql, [id])?))
    }

    // -- Users --

    pub fn find_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        let mut rows = self.list_where::<UserRow>(&[("email", Value::Text(email.to_string()))])?;
        Ok(rows.pop())
    }

    pub fn find_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.find::<UserRow>(id)
    }

    // -- Messages --

    /// Messages exchanged between exactly `a` and `b`, in either direction,
    /// oldest first.
    pub fn conversation(&self, a: i64, b: i64) -> Result<Vec<Message>> {
        let sql = Message::TABLE.select_sql(
            Some("(sender_id = ?1 AND receiver_id = ?2) OR (sender_id = ?2 AND receiver_id = ?1)"),
            None,
        );
        self.with_conn(|conn| query_records(conn, &sql, [a, b]))
    }

    // -- Notifications --

    /// Setting the flag on an already-read notification is a no-op success.
    pub fn mark_notification_read(&self, id: i64) -> Result<usize> {
        self.update::<Notification>(id, &[("is_read", Value::Integer(1))])
    }

    // -- Transactions --

    /// Payments where the user is either payer or payee.
    pub fn transactions_for_user(&self, user_id: i64) -> Result<Vec<Transaction>> {
        let sql = Transaction::TABLE.select_sql(Some("from_user = ?1 OR to_user = ?1"), None);
        self.with_conn(|conn| query_records(conn, &sql, [user_id]))
    }
}

fn query_records<R, P>(conn: &Connection, sql: &str, params: P) -> Result<Vec<R>>
where
    R: Record,
    P: IntoIterator,
    P::Item: rusqlite::ToSql,
{
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params_from_iter(params), |row| R::from_row(row))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickgig_types::models::{Application, Gig, Rating, Role};

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    fn add_user(db: &Database, email: &str) -> i64 {
        db.insert::<UserRow>(&[
            ("name", text("Test User")),
            ("email", text(email)),
            ("password", text("$argon2id$placeholder")),
        ])
        .unwrap()
    }

    fn add_gig(db: &Database, client_id: i64, title: &str) -> i64 {
        db.insert::<Gig>(&[
            ("client_id", Value::Integer(client_id)),
            ("title", text(title)),
            ("description", text("details")),
            ("budget", Value::Real(50.0)),
        ])
        .unwrap()
    }

    fn send(db: &Database, from: i64, to: i64, content: &str) -> i64 {
        db.insert::<Message>(&[
            ("sender_id", Value::Integer(from)),
            ("receiver_id", Value::Integer(to)),
            ("content", text(content)),
        ])
        .unwrap()
    }

    #[test]
    fn insert_applies_schema_defaults() {
        let db = db();
        let user_id = add_user(&db, "ana@example.com");
        let user = db.find_user_by_id(user_id).unwrap().unwrap();
        assert_eq!(user.role, Role::Student);
        assert_eq!(user.school_id, None);

        let gig_id = add_gig(&db, user_id, "Flyer");
        let gig = db.find::<Gig>(gig_id).unwrap().unwrap();
        assert_eq!(gig.status, "open");

        let app_id = db
            .insert::<Application>(&[
                ("gig_id", Value::Integer(gig_id)),
                ("student_id", Value::Integer(2)),
            ])
            .unwrap();
        let app = db.find::<Application>(app_id).unwrap().unwrap();
        assert_eq!(app.status, "pending");

        let n_id = db
            .insert::<Notification>(&[("user_id", Value::Integer(user_id)), ("message", text("hi"))])
            .unwrap();
        let n = db.find::<Notification>(n_id).unwrap().unwrap();
        assert!(!n.is_read);
    }

    #[test]
    fn duplicate_email_is_a_database_error() {
        let db = db();
        add_user(&db, "dup@example.com");
        let second = db.insert::<UserRow>(&[
            ("name", text("Other")),
            ("email", text("dup@example.com")),
            ("password", text("x")),
        ]);
        assert!(second.is_err());
        assert_eq!(db.list::<UserRow>().unwrap().len(), 1);
    }

    #[test]
    fn missing_required_column_is_a_database_error() {
        let db = db();
        let result = db.insert::<Gig>(&[("client_id", Value::Integer(1)), ("title", text("No budget"))]);
        assert!(result.is_err());
    }

    #[test]
    fn find_missing_id_is_none() {
        let db = db();
        assert!(db.find::<Gig>(42).unwrap().is_none());
        assert!(db.find_user_by_email("nobody@example.com").unwrap().is_none());
    }

    #[test]
    fn update_and_delete_of_missing_id_affect_nothing() {
        let db = db();
        assert_eq!(db.update::<Gig>(99, &[("status", text("closed"))]).unwrap(), 0);
        assert_eq!(db.delete::<Rating>(99).unwrap(), 0);
    }

    #[test]
    fn update_changes_only_given_fields() {
        let db = db();
        let gig_id = add_gig(&db, 1, "Website");
        let affected = db.update::<Gig>(gig_id, &[("status", text("closed"))]).unwrap();
        assert_eq!(affected, 1);

        let gig = db.find::<Gig>(gig_id).unwrap().unwrap();
        assert_eq!(gig.status, "closed");
        assert_eq!(gig.title, "Website");
    }

    #[test]
    fn update_rejects_empty_and_primary_key_changes() {
        let db = db();
        let gig_id = add_gig(&db, 1, "Website");
        assert!(db.update::<Gig>(gig_id, &[]).is_err());
        assert!(db.update::<Gig>(gig_id, &[("id", Value::Integer(5))]).is_err());
    }

    #[test]
    fn list_where_filters_by_declared_columns() {
        let db = db();
        add_gig(&db, 1, "A");
        add_gig(&db, 2, "B");
        add_gig(&db, 1, "C");

        let mine = db.list_where::<Gig>(&[("client_id", Value::Integer(1))]).unwrap();
        let titles: Vec<&str> = mine.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "C"]);

        assert!(db.list_where::<Gig>(&[("nope", Value::Integer(1))]).is_err());
        assert!(db.list_where::<Gig>(&[("client_id", Value::Integer(9))]).unwrap().is_empty());
    }

    #[test]
    fn applications_attach_to_gig_and_student() {
        let db = db();
        let gig_a = add_gig(&db, 1, "A");
        let gig_b = add_gig(&db, 1, "B");
        for (gig, student) in [(gig_a, 10), (gig_a, 11), (gig_b, 10)] {
            db.insert::<Application>(&[
                ("gig_id", Value::Integer(gig)),
                ("student_id", Value::Integer(student)),
            ])
            .unwrap();
        }

        let for_gig = db.list_where::<Application>(&[("gig_id", Value::Integer(gig_a))]).unwrap();
        assert_eq!(for_gig.len(), 2);
        assert!(for_gig.iter().all(|a| a.gig_id == gig_a));

        let for_student = db.list_where::<Application>(&[("student_id", Value::Integer(10))]).unwrap();
        assert_eq!(for_student.len(), 2);
        assert!(for_student.iter().all(|a| a.student_id == 10));
    }

    #[test]
    fn conversation_is_two_way_and_oldest_first() {
        let db = db();
        send(&db, 1, 2, "hello");
        send(&db, 2, 1, "hi back");
        send(&db, 1, 3, "not for 2");
        send(&db, 3, 2, "also not");
        send(&db, 1, 2, "how are you");

        let convo = db.conversation(2, 1).unwrap();
        let contents: Vec<&str> = convo.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["hello", "hi back", "how are you"]);
        assert!(convo.iter().all(|m| {
            (m.sender_id == 1 && m.receiver_id == 2) || (m.sender_id == 2 && m.receiver_id == 1)
        }));
    }

    #[test]
    fn mark_read_is_idempotent() {
        let db = db();
        let id = db
            .insert::<Notification>(&[("user_id", Value::Integer(1)), ("message", text("ping"))])
            .unwrap();

        assert_eq!(db.mark_notification_read(id).unwrap(), 1);
        assert_eq!(db.mark_notification_read(id).unwrap(), 1);
        assert!(db.find::<Notification>(id).unwrap().unwrap().is_read);
    }

    #[test]
    fn notifications_list_newest_first() {
        let db = db();
        for msg in ["first", "second", "third"] {
            db.insert::<Notification>(&[("user_id", Value::Integer(4)), ("message", text(msg))])
                .unwrap();
        }
        let list = db.list_where::<Notification>(&[("user_id", Value::Integer(4))]).unwrap();
        let messages: Vec<&str> = list.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["third", "second", "first"]);
    }

    #[test]
    fn transactions_for_user_covers_both_sides() {
        let db = db();
        for (from, to) in [(1, 2), (2, 3), (3, 4)] {
            db.insert::<Transaction>(&[
                ("gig_id", Value::Integer(1)),
                ("from_user", Value::Integer(from)),
                ("to_user", Value::Integer(to)),
                ("amount", Value::Real(10.0)),
            ])
            .unwrap();
        }
        let for_two = db.transactions_for_user(2).unwrap();
        assert_eq!(for_two.len(), 2);
        assert!(for_two.iter().all(|t| t.from_user == 2 || t.to_user == 2));
    }
}
