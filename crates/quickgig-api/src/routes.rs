use axum::{
    Json, Router, middleware,
    routing::{delete, get, post, put},
};
use serde_json::{Value, json};

use quickgig_types::models::{Application, Gig, Notification, Rating, Transaction};

use crate::auth::{self, AppState};
use crate::crud;
use crate::middleware::require_auth;
use crate::{applications, gigs, messages, notifications, ratings, transactions};

/// Build the full REST surface. Registration, login, gig browsing and the
/// health check are public; every other route needs a bearer token.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/api/users/register", post(auth::register))
        .route("/api/users/login", post(auth::login))
        .route("/api/gigs", get(gigs::list_gigs))
        .route("/api/gigs/{id}", get(crud::get_record::<Gig>));

    let protected_routes = Router::new()
        // Users
        .route("/api/users/profile", get(auth::profile))
        // Gigs
        .route("/api/gigs", post(gigs::create_gig))
        .route("/api/gigs/{id}", put(gigs::update_gig).delete(crud::delete_record::<Gig>))
        // Applications
        .route(
            "/api/applications",
            get(crud::list_records::<Application>).post(applications::create_application),
        )
        .route("/api/applications/gig/{gig_id}", get(applications::applications_for_gig))
        .route("/api/applications/student/{student_id}", get(applications::applications_for_student))
        .route(
            "/api/applications/{id}",
            put(applications::update_application).delete(crud::delete_record::<Application>),
        )
        // Messages
        .route("/api/messages/send", post(messages::send_message))
        .route("/api/messages/conversation/{user1}/{user2}", get(messages::get_conversation))
        // Notifications
        .route("/api/notifications", post(notifications::create_notification))
        .route("/api/notifications/user/{user_id}", get(notifications::notifications_for_user))
        .route("/api/notifications/{id}/read", put(notifications::mark_read))
        .route("/api/notifications/{id}", delete(crud::delete_record::<Notification>))
        // Ratings
        .route("/api/ratings", get(crud::list_records::<Rating>).post(ratings::create_rating))
        .route("/api/ratings/user/{user_id}", get(ratings::ratings_for_user))
        .route("/api/ratings/{id}", delete(crud::delete_record::<Rating>))
        // Transactions
        .route(
            "/api/transactions",
            get(crud::list_records::<Transaction>).post(transactions::create_transaction),
        )
        .route("/api/transactions/user/{user_id}", get(transactions::transactions_for_user))
        .route("/api/transactions/gig/{gig_id}", get(transactions::transactions_for_gig))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
