use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument};

use crate::{
    auth::{
        cookie::{clear_session_cookie, session_cookie},
        credentials::{create_user, verify_user},
        dto::{required, LoginRequest, PublicUser, RegisterRequest},
        extractors::AuthUser,
        repo_types::User,
    },
    error::{AppError, AppResult},
    extract::ApiJson,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", get(logout))
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/me", get(get_me))
}

fn session_header(state: &AppState, user: &User) -> AppResult<HeaderValue> {
    let token = state.sessions.issue(user.id).map_err(|e| {
        error!(error = %e, "session token sign failed");
        AppError::Internal(e)
    })?;
    Ok(session_cookie(
        &token,
        state.sessions.ttl(),
        state.config.cookie.secure,
    )?)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let (Some(username), Some(password), Some(password_verify)) = (
        required(payload.username),
        required(payload.password),
        required(payload.password_verify),
    ) else {
        return Err(AppError::MissingField);
    };

    if password.chars().count() < crate::auth::credentials::MIN_PASSWORD_LEN {
        return Err(AppError::WeakPassword);
    }
    if password != password_verify {
        return Err(AppError::PasswordMismatch);
    }

    let user = create_user(&state, &username, &password).await?;
    let cookie = session_header(&state, &user)?;

    info!(user_id = %user.id, "user registered");
    Ok(([(header::SET_COOKIE, cookie)], Json(PublicUser::from(user))))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let (Some(username), Some(password)) = (required(payload.username), required(payload.password))
    else {
        return Err(AppError::MissingField);
    };

    let user = verify_user(&state, &username, &password).await?;
    let cookie = session_header(&state, &user)?;

    info!(user_id = %user.id, "user logged in");
    Ok(([(header::SET_COOKIE, cookie)], Json(PublicUser::from(user))))
}

/// Drops the cookie client-side. The token itself stays valid until it expires.
#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::SET_COOKIE, clear_session_cookie(state.config.cookie.secure))],
    )
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = state.users.list().await?;
    Ok(Json(users))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<PublicUser>> {
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::Invalid)?;
    Ok(Json(PublicUser::from(user)))
}
