//! GET /health - storage liveness.
//!
//! 200 with an empty body when the store answers a ping, 503 when it does
//! not, and an internal-error envelope when the store was never opened or
//! has been closed.

use std::fmt::Display;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::StatusCode;
use axis_core::storage::StorageProbe;
use tracing::{error, info};

use crate::http::error::AppError;
use crate::state::AppState;

const PING_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn check_health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    probe_storage(&state.database, state.database.kind(), PING_TIMEOUT).await
}

async fn probe_storage<S: StorageProbe>(
    store: &S,
    kind: impl Display,
    ping_timeout: Duration,
) -> Result<StatusCode, AppError> {
    let start = Instant::now();

    if !store.is_initialized() {
        return Err(AppError::Internal("database not initialized".to_string()));
    }

    let healthy = match tokio::time::timeout(ping_timeout, store.ping()).await {
        Ok(Ok(())) => true,
        Ok(Err(err)) => {
            error!(
                operation = "health_check",
                check_type = %kind,
                error = %err,
                response_time_ms = elapsed_ms(start),
                "storage ping failed"
            );
            false
        }
        Err(_) => {
            error!(
                operation = "health_check",
                check_type = %kind,
                timeout_secs = ping_timeout.as_secs(),
                "storage ping timed out"
            );
            false
        }
    };

    if healthy {
        info!(
            operation = "health_check",
            total_duration_ms = elapsed_ms(start),
            "health check passed"
        );
        Ok(StatusCode::OK)
    } else {
        Ok(StatusCode::SERVICE_UNAVAILABLE)
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
