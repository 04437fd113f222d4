use axum::{
    Json,
    extract::State,
    response::IntoResponse,
};
use tracing::debug;

use quickgig_types::api::SendMessageRequest;
use quickgig_types::models::Message;

use crate::auth::AppState;
use crate::crud::{self, Fields, run_db};
use crate::error::{ApiError, required, required_text};
use crate::extract::{JsonBody, PathParam};

pub async fn send_message(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let sender_id = required(req.sender_id, "senderId")?;
    let receiver_id = required(req.receiver_id, "receiverId")?;
    let fields = Fields::new()
        .set("sender_id", sender_id)
        .set("receiver_id", receiver_id)
        .set("content", required_text(req.content, "content")?);

    debug!("Message {} -> {}", sender_id, receiver_id);
    crud::create_record::<Message>(&state, fields).await
}

/// Both directions between exactly these two users, oldest first.
pub async fn get_conversation(
    State(state): State<AppState>,
    PathParam((user1, user2)): PathParam<(i64, i64)>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let messages = run_db(&state, move |db| db.conversation(user1, user2)).await?;
    Ok(Json(messages))
}
