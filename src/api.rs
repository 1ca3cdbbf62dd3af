//! HTTP API handlers for Marketpulse.
//!
//! The API is a stateless wrapper around the aggregation engine: the caller
//! posts a snapshot and receives the computed report. Nothing is stored and
//! nothing is fetched from elsewhere.
//!
//! Logging records collection sizes only, never record contents.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

use crate::config::AnalyticsConfig;
use crate::model::{AggregateResult, Snapshot};
use crate::snapshot::lenient;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: AnalyticsConfig,
}

/// Query parameters for POST /analytics.
#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    /// Reference instant to compute against (default: now). Any timestamp
    /// layout accepted in snapshot fields is accepted here too.
    pub now: Option<String>,
}

/// Error body returned for rejected snapshots.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: String) -> ApiError {
    (status, Json(ErrorResponse { error }))
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/analytics", post(post_analytics))
        .route("/health", get(health_check))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// POST /analytics - Compute the report for a snapshot.
///
/// # Request Body
///
/// ```json
/// {
///     "listings": [
///         {
///             "id": "l1",
///             "title": "Road bike",
///             "category": "Sports",
///             "price": 250,
///             "status": "sold",
///             "quantity": 1,
///             "views_count": 40,
///             "seller_id": "s1",
///             "created_at": "2024-03-01T10:00:00Z",
///             "sold_at": "2024-03-05T10:00:00Z"
///         }
///     ],
///     "logins": [{ "user_id": "u1", "logged_in_at": "2024-03-02T08:15:00Z" }]
/// }
/// ```
///
/// # Query Parameters
///
/// - `now` (optional): reference instant, for reproducible reports
///
/// # Response
///
/// `200 OK` with the aggregate, `400 Bad Request` when `now` does not parse,
/// or `422 Unprocessable Entity` when the body is not shaped like a snapshot.
/// Both errors carry an `{"error": ...}` body.
#[instrument(skip(state, body))]
pub async fn post_analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
    Json(body): Json<Value>,
) -> Result<Json<AggregateResult>, ApiError> {
    // Resolve the reference instant before touching the body
    let now = match query.now.as_deref() {
        None => Utc::now(),
        Some(raw) => lenient::parse_timestamp(raw).ok_or_else(|| {
            warn!(now = raw, "Rejected reference instant");
            api_error(
                StatusCode::BAD_REQUEST,
                format!("now is not a recognised timestamp: {raw}"),
            )
        })?,
    };

    let snapshot = Snapshot::from_value(body).map_err(|e| {
        warn!(error = %e, "Rejected snapshot");
        api_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
    })?;

    let report = snapshot.aggregate(&state.config, now);

    info!(
        listings = snapshot.listings.len(),
        logins = snapshot.logins.len(),
        revenue = %report.kpi.revenue,
        "Analytics computed"
    );

    Ok(Json(report))
}

/// GET /health - Simple health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}
