use axum::{
    Json,
    extract::State,
    response::IntoResponse,
};

use quickgig_types::api::CreateTransactionRequest;
use quickgig_types::models::Transaction;

use crate::auth::AppState;
use crate::crud::{self, Fields, run_db};
use crate::error::{ApiError, required};
use crate::extract::{JsonBody, PathParam};

/// Payments the user sent or received.
pub async fn transactions_for_user(
    State(state): State<AppState>,
    PathParam(user_id): PathParam<i64>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let rows = run_db(&state, move |db| db.transactions_for_user(user_id)).await?;
    Ok(Json(rows))
}

pub async fn transactions_for_gig(
    State(state): State<AppState>,
    PathParam(gig_id): PathParam<i64>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    crud::list_by::<Transaction>(&state, "gig_id", gig_id).await
}

pub async fn create_transaction(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateTransactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let fields = Fields::new()
        .set("gig_id", required(req.gig_id, "gigId")?)
        .set("from_user", required(req.from_user, "fromUser")?)
        .set("to_user", required(req.to_user, "toUser")?)
        .set("amount", required(req.amount, "amount")?);

    crud::create_record::<Transaction>(&state, fields).await
}
