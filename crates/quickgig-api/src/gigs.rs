use axum::{Json, extract::State, response::IntoResponse};

use quickgig_db::Value;
use quickgig_types::api::{CreateGigRequest, GigQuery, UpdateGigRequest};
use quickgig_types::models::Gig;

use crate::auth::AppState;
use crate::crud::{self, Fields, run_db};
use crate::error::{ApiError, optional_text, required, required_text, trimmed};
use crate::extract::{JsonBody, PathParam, QueryParams};

/// GET /api/gigs — optional `clientId`, `status` and `category` filters,
/// combined with AND.
pub async fn list_gigs(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<GigQuery>,
) -> Result<Json<Vec<Gig>>, ApiError> {
    let mut filters: Vec<(&'static str, Value)> = Vec::new();
    if let Some(client_id) = query.client_id {
        filters.push(("client_id", Value::Integer(client_id)));
    }
    if let Some(status) = trimmed(query.status) {
        filters.push(("status", Value::Text(status)));
    }
    if let Some(category) = trimmed(query.category) {
        filters.push(("category", Value::Text(category)));
    }

    let gigs = run_db(&state, move |db| db.list_where::<Gig>(&filters)).await?;
    Ok(Json(gigs))
}

pub async fn create_gig(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateGigRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let fields = Fields::new()
        .set("client_id", required(req.client_id, "clientId")?)
        .set("title", required_text(req.title, "title")?)
        .set("description", required_text(req.description, "description")?)
        .set("budget", required(req.budget, "budget")?)
        .set_opt("category", trimmed(req.category))
        .set_opt("status", trimmed(req.status));

    crud::create_record::<Gig>(&state, fields).await
}

pub async fn update_gig(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
    JsonBody(req): JsonBody<UpdateGigRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let fields = Fields::new()
        .set_opt("title", optional_text(req.title, "title")?)
        .set_opt("description", optional_text(req.description, "description")?)
        .set_opt("budget", req.budget)
        .set_opt("category", optional_text(req.category, "category")?)
        .set_opt("status", optional_text(req.status, "status")?);

    crud::update_record::<Gig>(&state, id, fields).await
}
