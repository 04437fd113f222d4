use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::info;

use quickgig_db::models::UserRow;
use quickgig_db::{Database, is_unique_violation};
use quickgig_types::api::{AuthResponse, Claims, LoginRequest, RegisterRequest};
use quickgig_types::models::{Role, User};

use crate::crud::{Fields, run_db};
use crate::error::{ApiError, required, required_text};
use crate::extract::JsonBody;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = required_text(req.name, "name")?;
    let email = normalize_email(required_text(req.email, "email")?);
    let password = required(req.password.filter(|p| !p.is_empty()), "password")?;
    let role = match req.role.as_deref().map(str::trim) {
        None | Some("") => Role::default(),
        Some(raw) => raw
            .parse::<Role>()
            .map_err(|_| ApiError::InvalidRole(raw.to_string()))?,
    };

    // Check if email is taken
    let lookup = email.clone();
    if run_db(&state, move |db| db.find_user_by_email(&lookup))
        .await?
        .is_some()
    {
        return Err(ApiError::DuplicateEmail);
    }

    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {}", e)))?
        .to_string();

    let fields = Fields::new()
        .set("name", name)
        .set("email", email)
        .set("password", password_hash)
        .set("role", role.as_str().to_string())
        .set_opt("school_id", req.school_id.filter(|s| !s.trim().is_empty()));

    // A concurrent registration can still win the race; the UNIQUE index
    // catches it.
    let user = run_db(&state, move |db| {
        let id = db.insert::<UserRow>(fields.as_slice())?;
        db.find_user_by_id(id)?
            .ok_or_else(|| anyhow::anyhow!("user {} missing right after insert", id))
    })
    .await
    .map_err(|e| match e {
        ApiError::Database(err) if is_unique_violation(&err) => ApiError::DuplicateEmail,
        other => other,
    })?;

    let token = create_token(&state, &user)?;
    info!("Registered user {} ({})", user.id, user.role);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = normalize_email(required_text(req.email, "email")?);
    let password = required(req.password.filter(|p| !p.is_empty()), "password")?;

    let user = run_db(&state, move |db| db.find_user_by_email(&email))
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    // Verify password
    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|e| ApiError::Internal(format!("stored hash for user {} is invalid: {}", user.id, e)))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::InvalidCredentials)?;

    let token = create_token(&state, &user)?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

pub async fn profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<User>, ApiError> {
    let user = run_db(&state, move |db| db.find_user_by_id(claims.sub))
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(user.into()))
}

fn normalize_email(email: String) -> String {
    email.trim().to_lowercase()
}

fn create_token(state: &AppState, user: &UserRow) -> Result<String, ApiError> {
    let expires_at = chrono::TimeDelta::try_hours(state.token_ttl_hours)
        .and_then(|ttl| chrono::Utc::now().checked_add_signed(ttl))
        .ok_or_else(|| {
            ApiError::Internal(format!("token lifetime of {} hours is out of range", state.token_ttl_hours))
        })?;

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role,
        exp: expires_at.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("token signing failed: {}", e)))
}
