use tracing::{info, warn};

use crate::error::ApiError;
use crate::state::AppState;
use crate::users::repo::User;

/// Register a new user and return a signed token. The email lookup is the
/// uniqueness check: a retry after a partial failure finds the existing row
/// and fails instead of creating a duplicate.
pub async fn signup(
    state: &AppState,
    email: &str,
    firstname: &str,
    lastname: &str,
    password: &str,
) -> Result<String, ApiError> {
    if User::find_by_email(&state.db, email).await?.is_some() {
        warn!(email, "signup with already registered email");
        return Err(ApiError::DuplicateEmail);
    }

    let hash = state.hasher.hash(password)?;
    let user = User::create(&state.db, email, firstname, lastname, &hash).await?;
    let token = state.tokens.sign(user.id, &user.email)?;

    info!(user_id = user.id, "user signed up");
    Ok(token)
}

/// Authenticate an existing user and return a signed token.
pub async fn signin(state: &AppState, email: &str, password: &str) -> Result<String, ApiError> {
    let user = User::find_by_email(&state.db, email)
        .await?
        .ok_or_else(|| {
            warn!(email, "signin with unregistered email");
            ApiError::UnknownEmail
        })?;

    if !state.hasher.verify(password, &user.password_hash)? {
        warn!(user_id = user.id, "signin with wrong password");
        return Err(ApiError::WrongPassword);
    }

    let token = state.tokens.sign(user.id, &user.email)?;
    info!(user_id = user.id, "user signed in");
    Ok(token)
}
