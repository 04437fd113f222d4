//! Handlers shared by every entity. Entity modules only add what differs:
//! which fields a create/update accepts and which columns can be filtered.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::{debug, error};

use quickgig_db::{Database, Record, Value};
use quickgig_types::api::MutationResponse;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::extract::PathParam;

/// Column/value pairs for one insert or update.
#[derive(Debug, Default)]
pub struct Fields(Vec<(&'static str, Value)>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.0.push((column, value.into()));
        self
    }

    /// Absent values are left out so the column keeps its default (insert)
    /// or its current value (update).
    pub fn set_opt<V: Into<Value>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[(&'static str, Value)] {
        &self.0
    }
}

/// Run a blocking database call off the async runtime.
pub async fn run_db<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(e.to_string())
        })?
        .map_err(ApiError::Database)
}

pub async fn list_records<R: Record + Serialize>(
    State(state): State<AppState>,
) -> Result<Json<Vec<R>>, ApiError> {
    let rows = run_db(&state, |db| db.list::<R>()).await?;
    Ok(Json(rows))
}

pub async fn get_record<R: Record + Serialize>(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<R>, ApiError> {
    run_db(&state, move |db| db.find::<R>(id))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(R::NAME))
}

pub async fn delete_record<R: Record>(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<MutationResponse>, ApiError> {
    let affected = run_db(&state, move |db| db.delete::<R>(id)).await?;
    debug!("Deleted {} {} ({} rows)", R::NAME, id, affected);

    Ok(Json(MutationResponse {
        message: format!("{} deleted", R::NAME),
        affected,
    }))
}

/// Rows whose `column` equals `value`.
pub async fn list_by<R: Record + Serialize>(
    state: &AppState,
    column: &'static str,
    value: i64,
) -> Result<Json<Vec<R>>, ApiError> {
    let rows = run_db(state, move |db| {
        db.list_where::<R>(&[(column, Value::Integer(value))])
    })
    .await?;
    Ok(Json(rows))
}

/// Insert and read the stored row back, so defaults show up in the response.
pub async fn create_record<R: Record + Serialize>(
    state: &AppState,
    fields: Fields,
) -> Result<(StatusCode, Json<R>), ApiError> {
    let row = run_db(state, move |db| {
        let id = db.insert::<R>(fields.as_slice())?;
        db.find::<R>(id)?
            .ok_or_else(|| anyhow::anyhow!("{} {} missing right after insert", R::NAME, id))
    })
    .await?;

    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_record<R: Record>(
    state: &AppState,
    id: i64,
    fields: Fields,
) -> Result<Json<MutationResponse>, ApiError> {
    if fields.is_empty() {
        return Err(ApiError::NothingToUpdate);
    }

    let affected = run_db(state, move |db| db.update::<R>(id, fields.as_slice())).await?;

    Ok(Json(MutationResponse {
        message: format!("{} updated", R::NAME),
        affected,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_opt_skips_absent_values() {
        let fields = Fields::new()
            .set("title", "Poster".to_string())
            .set_opt("budget", Some(20.5))
            .set_opt::<String>("category", None);

        let columns: Vec<&str> = fields.as_slice().iter().map(|(c, _)| *c).collect();
        assert_eq!(columns, vec!["title", "budget"]);
        assert_eq!(fields.as_slice()[1].1, Value::Real(20.5));
    }
}
