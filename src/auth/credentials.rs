use anyhow::Context;
use tracing::{info, instrument, warn};

use crate::{
    auth::repo_types::User,
    error::{AppError, AppResult},
    state::AppState,
};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Create an account. The confirmation check happens before this is reached.
#[instrument(skip(state, password))]
pub async fn create_user(state: &AppState, username: &str, password: &str) -> AppResult<User> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AppError::MissingField);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::WeakPassword);
    }

    if state.users.find_by_username(username).await?.is_some() {
        warn!("username already registered");
        return Err(AppError::DuplicateUsername);
    }

    let passwords = state.passwords.clone();
    let plain = password.to_owned();
    let hash = tokio::task::spawn_blocking(move || passwords.hash(&plain))
        .await
        .context("join hash task")??;

    let user = state
        .users
        .insert(username, &hash)
        .await?
        .ok_or(AppError::DuplicateUsername)?;

    info!(user_id = %user.id, "user created");
    Ok(user)
}

/// Check a username/password pair. Unknown user and wrong password are indistinguishable.
#[instrument(skip(state, password))]
pub async fn verify_user(state: &AppState, username: &str, password: &str) -> AppResult<User> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AppError::MissingField);
    }

    let user = state.users.find_by_username(username).await?;

    let passwords = state.passwords.clone();
    let plain = password.to_owned();
    let stored = user.as_ref().map(|u| u.password_hash.clone());
    let ok = tokio::task::spawn_blocking(move || match stored {
        Some(hash) => passwords.verify(&plain, &hash),
        None => Ok(passwords.verify_dummy(&plain)),
    })
    .await
    .context("join verify task")??;

    match user {
        Some(user) if ok => Ok(user),
        Some(user) => {
            warn!(user_id = %user.id, "login invalid password");
            Err(AppError::WrongCredentials)
        }
        None => {
            warn!("login unknown username");
            Err(AppError::WrongCredentials)
        }
    }
}
