use serde::{Deserialize, Serialize};

use crate::models::{Role, User};

// -- JWT Claims --

/// Claims carried by every session token. Issued at register/login and
/// checked by the auth middleware on protected routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub email: String,
    pub role: Role,
    pub exp: usize,
}

// -- Users --

/// Required fields are optional here so handlers can answer 400 with the
/// name of the missing field instead of a generic body rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub school_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// -- Gigs --

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGigRequest {
    pub client_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub budget: Option<f64>,
    pub category: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGigRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub budget: Option<f64>,
    pub category: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GigQuery {
    pub client_id: Option<i64>,
    pub status: Option<String>,
    pub category: Option<String>,
}

// -- Applications --

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationRequest {
    pub gig_id: Option<i64>,
    pub student_id: Option<i64>,
    pub cover_letter: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationRequest {
    pub cover_letter: Option<String>,
    pub status: Option<String>,
}

// -- Messages --

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub sender_id: Option<i64>,
    pub receiver_id: Option<i64>,
    pub content: Option<String>,
}

// -- Notifications --

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    pub user_id: Option<i64>,
    pub message: Option<String>,
    pub link: Option<String>,
}

// -- Ratings --

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRatingRequest {
    pub gig_id: Option<i64>,
    pub rater_id: Option<i64>,
    pub target_user_id: Option<i64>,
    pub stars: Option<i64>,
    pub review: Option<String>,
}

// -- Transactions --

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub gig_id: Option<i64>,
    pub from_user: Option<i64>,
    pub to_user: Option<i64>,
    pub amount: Option<f64>,
}

// -- Generic --

/// Body returned by update and delete. `affected` is zero when the id did
/// not exist.
#[derive(Debug, Serialize, Deserialize)]
pub struct MutationResponse {
    pub message: String,
    pub affected: usize,
}
