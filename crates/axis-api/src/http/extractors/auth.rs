//! Cookie authentication gate.
//!
//! Reads the `access_token` cookie, verifies it, and stores the caller's id
//! in request extensions for [`RequestScope`](super::context::RequestScope).

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use axis_types::error::HttpError;
use axis_types::user::AccessToken;
use uuid::Uuid;

use crate::http::error::AppError;
use crate::state::AppState;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Identity established by [`require_auth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub Uuid);

/// Middleware for gated routes. The handler is never reached without a
/// valid token.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = jar
        .get(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| HttpError::unauthorized("missing access token"))?;

    let user_id = state.auth_service.verify_token(token)?;
    request.extensions_mut().insert(AuthenticatedUser(user_id));
    Ok(next.run(request).await)
}

/// The cookie carrying a freshly issued token.
pub fn access_token_cookie(token: AccessToken, secure: bool) -> Cookie<'static> {
    Cookie::build((ACCESS_TOKEN_COOKIE, token.into_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_attributes() {
        let cookie = access_token_cookie(AccessToken("abc".into()), false);
        assert_eq!(cookie.name(), ACCESS_TOKEN_COOKIE);
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_ne!(cookie.secure(), Some(true));
    }

    #[test]
    fn test_secure_cookie() {
        let cookie = access_token_cookie(AccessToken("abc".into()), true);
        assert_eq!(cookie.secure(), Some(true));
    }
}
