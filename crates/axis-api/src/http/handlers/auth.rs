//! Registration and login. Both answer with no body and set the
//! `access_token` cookie.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;
use axis_types::user::{LoginRequest, RegisterRequest};

use crate::http::error::AppError;
use crate::http::extractors::auth::access_token_cookie;
use crate::http::pipeline;
use crate::state::AppState;

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
) -> Result<Response, AppError> {
    pipeline::handle_no_response("login", request, StatusCode::OK, |req: LoginRequest| async move {
        let token = state.auth_service.login(req).await?;
        Ok(jar.add(access_token_cookie(token, state.config.auth.secure_cookie)))
    })
    .await
}

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
) -> Result<Response, AppError> {
    pipeline::handle_no_response(
        "register",
        request,
        StatusCode::CREATED,
        |req: RegisterRequest| async move {
            let token = state.auth_service.register(req).await?;
            Ok(jar.add(access_token_cookie(token, state.config.auth.secure_cookie)))
        },
    )
    .await
}
