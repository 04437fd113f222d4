use axum::{
    Json,
    extract::State,
    response::IntoResponse,
};

use quickgig_types::api::CreateRatingRequest;
use quickgig_types::models::Rating;

use crate::auth::AppState;
use crate::crud::{self, Fields};
use crate::error::{ApiError, required};
use crate::extract::{JsonBody, PathParam};

/// Ratings received by a user.
pub async fn ratings_for_user(
    State(state): State<AppState>,
    PathParam(user_id): PathParam<i64>,
) -> Result<Json<Vec<Rating>>, ApiError> {
    crud::list_by::<Rating>(&state, "target_user_id", user_id).await
}

pub async fn create_rating(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateRatingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let fields = Fields::new()
        .set("gig_id", required(req.gig_id, "gigId")?)
        .set("rater_id", required(req.rater_id, "raterId")?)
        .set("target_user_id", required(req.target_user_id, "targetUserId")?)
        .set("stars", required(req.stars, "stars")?)
        .set_opt("review", req.review);

    crud::create_record::<Rating>(&state, fields).await
}
