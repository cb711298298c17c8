use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::predict::{ObserverLocation, PassReport, PassSummary, PredictError};
use crate::web::api::error::{
    ApiError, ApiResult, ErrorResponse, INVALID_INPUT, INVALID_SATELLITE_NAME,
};
use crate::web::server::AppState;

/// `/brighest` reports bad input in lower case.
const INVALID_INPUT_OVERHEAD: &str = "invalid input";

pub const USAGE: &str = "Use /brighest to get the satellite overhead \n \
use /nextVisible to check when the satellite will be visible next \n \
use /satellitePasses to count the passes of every satellite in the next day \n \
use /satellites to list the tracked satellites\n";

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OverheadQuery {
    /// Observer longitude, degrees
    pub longitude: Option<String>,
    /// Observer latitude, degrees
    pub latitude: Option<String>,
    /// Instant to evaluate (RFC 3339, RFC 2822 or `YYYY-MM-DD[THH:MM:SS]` UTC)
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SatelliteQuery {
    /// Observer longitude, degrees
    pub longitude: Option<String>,
    /// Observer latitude, degrees
    pub latitude: Option<String>,
    /// Satellite name as it appears in the catalog
    pub name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SatelliteList {
    pub count: usize,
    pub satellites: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "visibility",
    responses((status = 200, description = "Usage text", body = String, content_type = "text/plain"))
)]
pub async fn usage() -> &'static str {
    USAGE
}

#[utoipa::path(
    get,
    path = "/brighest",
    tag = "visibility",
    params(OverheadQuery),
    responses(
        (status = 200, description = "Satellite closest to the zenith", body = String, content_type = "text/plain"),
        (status = 400, description = "Invalid coordinates or date", body = ErrorResponse),
        (status = 500, description = "Propagation failed", body = ErrorResponse)
    )
)]
pub async fn brighest(
    State(state): State<AppState>,
    query: Result<Query<OverheadQuery>, QueryRejection>,
) -> ApiResult<String> {
    let Query(query) = query.map_err(|_| ApiError::Validation(INVALID_INPUT_OVERHEAD))?;

    let observer = observer_from(&state, &query.longitude, &query.latitude)
        .ok_or(ApiError::Validation(INVALID_INPUT_OVERHEAD))?;
    let at = query
        .date
        .as_deref()
        .and_then(parse_date)
        .ok_or(ApiError::Validation(INVALID_INPUT_OVERHEAD))?;

    let engine = state.engine.clone();
    let best = run_scan(move || engine.overhead(&observer, at)).await?;

    Ok(match best {
        Some(candidate) => format!("Brighest satellite overhead is: {}", candidate.name),
        None => "Error no satellite found".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/nextVisible",
    tag = "visibility",
    params(SatelliteQuery),
    responses(
        (status = 200, description = "When the satellite next comes within range", body = String, content_type = "text/plain"),
        (status = 400, description = "Invalid coordinates or unknown satellite", body = ErrorResponse),
        (status = 503, description = "Scan exceeded its time budget", body = ErrorResponse)
    )
)]
pub async fn next_visible(
    State(state): State<AppState>,
    query: Result<Query<SatelliteQuery>, QueryRejection>,
) -> ApiResult<String> {
    let Query(query) = query.map_err(|_| ApiError::Validation(INVALID_INPUT))?;

    let observer = observer_from(&state, &query.longitude, &query.latitude)
        .ok_or(ApiError::Validation(INVALID_INPUT))?;
    let name = query
        .name
        .filter(|n| state.engine.catalog().get(n).is_some())
        .ok_or(ApiError::Validation(INVALID_SATELLITE_NAME))?;

    let engine = state.engine.clone();
    let outcome = run_scan(move || engine.next_visible(&observer, &name, Utc::now())).await?;

    Ok(outcome.summary())
}

#[utoipa::path(
    get,
    path = "/satellitePasses",
    tag = "visibility",
    params(SatelliteQuery),
    responses(
        (status = 200, description = "Visibility windows per satellite, keyed by name", body = std::collections::HashMap<String, PassReport>),
        (status = 400, description = "Invalid coordinates or unknown satellite", body = ErrorResponse),
        (status = 503, description = "Scan exceeded its time budget", body = ErrorResponse)
    )
)]
pub async fn satellite_passes(
    State(state): State<AppState>,
    query: Result<Query<SatelliteQuery>, QueryRejection>,
) -> ApiResult<Json<PassSummary>> {
    let Query(query) = query.map_err(|_| ApiError::Validation(INVALID_INPUT))?;

    let observer = observer_from(&state, &query.longitude, &query.latitude)
        .ok_or(ApiError::Validation(INVALID_INPUT))?;
    let only = query.name.filter(|n| !n.trim().is_empty());

    let engine = state.engine.clone();
    let summary = run_scan(move || engine.passes(&observer, Utc::now(), only.as_deref())).await?;

    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/satellites",
    tag = "visibility",
    responses((status = 200, description = "Tracked satellites in feed order", body = SatelliteList))
)]
pub async fn list_satellites(State(state): State<AppState>) -> Json<SatelliteList> {
    let catalog = state.engine.catalog();
    Json(SatelliteList {
        count: catalog.len(),
        satellites: catalog.names().map(String::from).collect(),
    })
}

fn observer_from(
    state: &AppState,
    longitude: &Option<String>,
    latitude: &Option<String>,
) -> Option<ObserverLocation> {
    ObserverLocation::from_query(
        longitude.as_deref(),
        latitude.as_deref(),
        state.engine.config().observer_height_km,
    )
}

/// Run a scan on the blocking pool; scans can issue thousands of oracle calls.
async fn run_scan<T, F>(scan: F) -> ApiResult<T>
where
    F: FnOnce() -> Result<T, PredictError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(scan)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(ApiError::from)
}

pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
