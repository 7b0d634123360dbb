use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;
use crate::users::repo::User;

/// Extracts and verifies the bearer token of a protected route, then
/// re-resolves the user from the database so a token for a deleted account
/// never grants access. Handlers receive the full user record.
///
/// Every failure collapses into `ApiError::Unauthenticated`; the caller is
/// never told why access was denied.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthenticated)?;

        let token = bearer_token(header).ok_or(ApiError::Unauthenticated)?;

        let claims = state.tokens.verify(token).map_err(|_| {
            warn!("token verification failed");
            ApiError::Unauthenticated
        })?;

        let user = match User::find_by_id(&state.db, claims.sub).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!(user_id = claims.sub, "token for nonexistent user");
                return Err(ApiError::Unauthenticated);
            }
            Err(e) => {
                warn!(error = %e, "user lookup failed during authentication");
                return Err(ApiError::Unauthenticated);
            }
        };

        Ok(CurrentUser(user))
    }
}

/// Splits an Authorization header on whitespace and takes the token of a
/// two-token `Bearer <token>` value. Anything else is treated as no token.
fn bearer_token(header: &str) -> Option<&str> {
    let mut parts = header.split_whitespace();
    let scheme = parts.next()?;
    let token = parts.next()?;
    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_header() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
    }

    #[test]
    fn scheme_is_case_insensitive() {
        assert_eq!(bearer_token("bearer tok"), Some("tok"));
        assert_eq!(bearer_token("BEARER tok"), Some("tok"));
    }

    #[test]
    fn rejects_missing_token() {
        assert_eq!(bearer_token(""), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer   "), None);
    }

    #[test]
    fn rejects_wrong_scheme() {
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("Token abc"), None);
    }

    #[test]
    fn rejects_extra_tokens() {
        assert_eq!(bearer_token("Bearer one two"), None);
    }
}
