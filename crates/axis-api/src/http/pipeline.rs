//! Generic request pipeline.
//!
//! Every JSON endpoint runs through [`handle`] or [`handle_no_response`]:
//! bind the request (query string for GET/HEAD/DELETE, JSON body otherwise),
//! validate and default it, invoke the handler, then emit the response with
//! the chosen strategy. The whole run is wrapped in a `handler` span that
//! records per-phase status and timings.

use std::future::Future;
use std::time::Instant;

use axum::Json;
use axum::extract::{MatchedPath, Query, Request};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, IntoResponseParts, Response};
use axis_core::validation::Validatable;
use axis_observe::span_attrs;
use axis_types::error::{FieldError, HttpError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::field::Empty;
use tracing::{Instrument, Span, debug, error, info, info_span};

use crate::http::error::AppError;

/// Upper bound on a buffered JSON body.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// How a successful handler result becomes a response.
pub trait ResponseStrategy<T> {
    fn respond(self, result: T) -> Response;
}

/// Serialize the result as the JSON body.
#[derive(Debug, Clone, Copy)]
pub struct JsonResponse {
    pub status: StatusCode,
}

impl<T: Serialize> ResponseStrategy<T> for JsonResponse {
    fn respond(self, result: T) -> Response {
        (self.status, Json(result)).into_response()
    }
}

/// Empty body; the result only contributes response parts (headers,
/// cookies), or nothing when it is `()`.
#[derive(Debug, Clone, Copy)]
pub struct NoResponse {
    pub status: StatusCode,
}

impl<P: IntoResponseParts> ResponseStrategy<P> for NoResponse {
    fn respond(self, parts: P) -> Response {
        (self.status, parts, ()).into_response()
    }
}

/// Run `handler` and serialize its result as JSON with `status`.
pub async fn handle<Req, Res, F, Fut>(
    operation: &'static str,
    request: Request,
    status: StatusCode,
    handler: F,
) -> Result<Response, AppError>
where
    Req: DeserializeOwned + Default + Validatable,
    Res: Serialize,
    F: FnOnce(Req) -> Fut,
    Fut: Future<Output = Result<Res, AppError>>,
{
    run(operation, request, JsonResponse { status }, handler).await
}

/// Run `handler` and answer with `status` and no body.
pub async fn handle_no_response<Req, P, F, Fut>(
    operation: &'static str,
    request: Request,
    status: StatusCode,
    handler: F,
) -> Result<Response, AppError>
where
    Req: DeserializeOwned + Default + Validatable,
    P: IntoResponseParts,
    F: FnOnce(Req) -> Fut,
    Fut: Future<Output = Result<P, AppError>>,
{
    run(operation, request, NoResponse { status }, handler).await
}

async fn run<Req, Res, S, F, Fut>(
    operation: &'static str,
    request: Request,
    strategy: S,
    handler: F,
) -> Result<Response, AppError>
where
    Req: DeserializeOwned + Default + Validatable,
    S: ResponseStrategy<Res>,
    F: FnOnce(Req) -> Fut,
    Fut: Future<Output = Result<Res, AppError>>,
{
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());

    let span = info_span!(
        "handler",
        operation,
        http.method = %request.method(),
        http.route = %route,
        validation.status = Empty,
        validation.duration_ms = Empty,
        handler.status = Empty,
        handler.duration_ms = Empty,
        total.duration_ms = Empty,
        otel.status_code = Empty,
        error.message = Empty,
    );

    async move {
        let span = Span::current();
        let start = Instant::now();

        let validation_start = Instant::now();
        let bound = bind_and_validate::<Req>(request).await;
        let validation_ms = elapsed_ms(validation_start);
        span.record(span_attrs::VALIDATION_DURATION_MS, validation_ms);

        let req = match bound {
            Ok(req) => {
                span.record(span_attrs::VALIDATION_STATUS, span_attrs::STATUS_SUCCESS);
                debug!(validation_ms, "request validation successful");
                req
            }
            Err(err) => {
                span.record(span_attrs::VALIDATION_STATUS, span_attrs::STATUS_FAILED);
                span.record(span_attrs::TOTAL_DURATION_MS, elapsed_ms(start));
                return Err(fail(&span, err.into(), "request validation failed"));
            }
        };

        let handler_start = Instant::now();
        let result = handler(req).await;
        let handler_ms = elapsed_ms(handler_start);
        let total_ms = elapsed_ms(start);
        span.record(span_attrs::HANDLER_DURATION_MS, handler_ms);
        span.record(span_attrs::TOTAL_DURATION_MS, total_ms);

        match result {
            Ok(result) => {
                span.record(span_attrs::HANDLER_STATUS, span_attrs::STATUS_SUCCESS);
                info!(validation_ms, handler_ms, total_ms, "request completed");
                Ok(strategy.respond(result))
            }
            Err(err) => {
                span.record(span_attrs::HANDLER_STATUS, span_attrs::STATUS_FAILED);
                Err(fail(&span, err, "handler execution failed"))
            }
        }
    }
    .instrument(span)
    .await
}

fn fail(span: &Span, err: AppError, message: &'static str) -> AppError {
    span.record(span_attrs::OTEL_STATUS_CODE, span_attrs::STATUS_ERROR);
    span.record(span_attrs::ERROR_MESSAGE, tracing::field::display(&err));
    error!(error = %err, "{message}");
    err
}

fn elapsed_ms(since: Instant) -> u64 {
    u64::try_from(since.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Bind `Req` from the request, then validate and default it.
pub async fn bind_and_validate<Req>(request: Request) -> Result<Req, HttpError>
where
    Req: DeserializeOwned + Default + Validatable,
{
    let mut req = bind::<Req>(request).await?;
    req.validate_request()?;
    Ok(req)
}

async fn bind<Req>(request: Request) -> Result<Req, HttpError>
where
    Req: DeserializeOwned + Default,
{
    let (parts, body) = request.into_parts();

    if matches!(parts.method, Method::GET | Method::HEAD | Method::DELETE) {
        if parts.uri.query().is_none_or(str::is_empty) {
            return Ok(Req::default());
        }
        return Query::<Req>::try_from_uri(&parts.uri)
            .map(|Query(req)| req)
            .map_err(|rejection| {
                HttpError::validation(
                    "invalid query string",
                    vec![FieldError::new("query", rejection.body_text())],
                )
            });
    }

    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| {
            HttpError::validation(
                "unreadable request body",
                vec![FieldError::new("body", e.to_string())],
            )
        })?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Req::default());
    }
    serde_json::from_slice(&bytes).map_err(|e| {
        HttpError::validation(
            "invalid JSON body",
            vec![FieldError::new("body", e.to_string())],
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axis_types::chat::{ChatRequest, DEFAULT_MODEL_ALIAS};
    use axis_types::error::ErrorKind;
    use axis_types::pagination::HistoryQuery;
    use axum::body::Body;

    fn request(method: Method, uri: &str, body: &str) -> Request {
        axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_binds_query_and_defaults() {
        let query: HistoryQuery = bind_and_validate(request(Method::GET, "/h?page=3", ""))
            .await
            .unwrap();
        assert_eq!(query.page(), 3);
        assert_eq!(query.limit(), 10);
    }

    #[tokio::test]
    async fn test_get_without_query_is_default() {
        let query: HistoryQuery = bind_and_validate(request(Method::GET, "/h", ""))
            .await
            .unwrap();
        assert_eq!((query.page(), query.limit()), (1, 10));
    }

    #[tokio::test]
    async fn test_out_of_range_limit_rejected() {
        let err = bind_and_validate::<HistoryQuery>(request(Method::GET, "/h?limit=101", ""))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.errors()[0].field, "limit");
    }

    #[tokio::test]
    async fn test_malformed_query_rejected() {
        let err = bind_and_validate::<HistoryQuery>(request(Method::GET, "/h?page=abc", ""))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.errors()[0].field, "query");
    }

    #[tokio::test]
    async fn test_post_binds_json_and_defaults_model() {
        let req: ChatRequest =
            bind_and_validate(request(Method::POST, "/chat", r#"{"message":"hi"}"#))
                .await
                .unwrap();
        assert_eq!(req.model, DEFAULT_MODEL_ALIAS);
        assert_eq!(req.message, "hi");
    }

    #[tokio::test]
    async fn test_empty_body_binds_default_then_validates() {
        let err = bind_and_validate::<ChatRequest>(request(Method::POST, "/chat", ""))
            .await
            .unwrap_err();
        assert_eq!(err.errors()[0].field, "message");
    }

    #[tokio::test]
    async fn test_malformed_json_rejected() {
        let err = bind_and_validate::<ChatRequest>(request(Method::POST, "/chat", "{nope"))
            .await
            .unwrap_err();
        assert_eq!(err.errors()[0].field, "body");
    }

    #[tokio::test]
    async fn test_handler_not_invoked_on_validation_failure() {
        let mut invoked = false;
        let result = handle(
            "test",
            request(Method::POST, "/chat", "{}"),
            StatusCode::OK,
            |_: ChatRequest| {
                invoked = true;
                async { Ok::<_, AppError>(()) }
            },
        )
        .await;
        assert!(matches!(result, Err(AppError::Http(_))));
        assert!(!invoked);
    }

    #[tokio::test]
    async fn test_no_response_strategy_discards_body() {
        let response = handle_no_response(
            "test",
            request(Method::POST, "/x", ""),
            StatusCode::CREATED,
            |_: ()| async { Ok::<_, AppError>(()) },
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
    }
}
