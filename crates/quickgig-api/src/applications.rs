use axum::{Json, extract::State, response::IntoResponse};

use quickgig_types::api::{CreateApplicationRequest, UpdateApplicationRequest};
use quickgig_types::models::Application;

use crate::auth::AppState;
use crate::crud::{self, Fields};
use crate::error::{ApiError, optional_text, required, trimmed};
use crate::extract::{JsonBody, PathParam};

pub async fn create_application(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateApplicationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let fields = Fields::new()
        .set("gig_id", required(req.gig_id, "gigId")?)
        .set("student_id", required(req.student_id, "studentId")?)
        .set_opt("cover_letter", req.cover_letter)
        .set_opt("status", trimmed(req.status));

    crud::create_record::<Application>(&state, fields).await
}

pub async fn applications_for_gig(
    State(state): State<AppState>,
    PathParam(gig_id): PathParam<i64>,
) -> Result<Json<Vec<Application>>, ApiError> {
    crud::list_by::<Application>(&state, "gig_id", gig_id).await
}

pub async fn applications_for_student(
    State(state): State<AppState>,
    PathParam(student_id): PathParam<i64>,
) -> Result<Json<Vec<Application>>, ApiError> {
    crud::list_by::<Application>(&state, "student_id", student_id).await
}

pub async fn update_application(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
    JsonBody(req): JsonBody<UpdateApplicationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let fields = Fields::new()
        .set_opt("cover_letter", req.cover_letter)
        .set_opt("status", optional_text(req.status, "status")?);

    crud::update_record::<Application>(&state, id, fields).await
}
