use axum::{
    Json,
    extract::State,
    response::IntoResponse,
};

use quickgig_types::api::{CreateNotificationRequest, MutationResponse};
use quickgig_types::models::Notification;

use crate::auth::AppState;
use crate::crud::{self, Fields, run_db};
use crate::error::{ApiError, required, required_text};
use crate::extract::{JsonBody, PathParam};

/// Newest first.
pub async fn notifications_for_user(
    State(state): State<AppState>,
    PathParam(user_id): PathParam<i64>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    crud::list_by::<Notification>(&state, "user_id", user_id).await
}

pub async fn create_notification(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateNotificationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let fields = Fields::new()
        .set("user_id", required(req.user_id, "userId")?)
        .set("message", required_text(req.message, "message")?)
        .set_opt("link", req.link);

    crud::create_record::<Notification>(&state, fields).await
}

pub async fn mark_read(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<MutationResponse>, ApiError> {
    let affected = run_db(&state, move |db| db.mark_notification_read(id)).await?;

    Ok(Json(MutationResponse {
        message: "Notification marked as read".to_string(),
        affected,
    }))
}
