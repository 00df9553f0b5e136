//! Location HTTP handlers.
//!
//! This module implements the location endpoints (all require an API key):
//! - POST /pub - OwnTracks ingestion
//! - GET /api/v1/locations - Paged history, newest first
//! - GET /api/v1/locations/date/:date - Pings received on a UTC date
//! - GET /api/v1/locations/device/:device_id - Pings from one device

use crate::{
    db::DbPool,
    error::AppError,
    middleware::auth::AuthContext,
    models::location::{DateHistory, DeviceHistory, HistoryQuery, LocationHistory, NewLocation},
    services::location_service,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use chrono::{NaiveDate, Utc};

/// Receive a message from an OwnTracks client.
///
/// # Response (200 OK)
///
/// ```json
/// []
/// ```
///
/// OwnTracks treats the response body as a list of messages to deliver back
/// to the device; this service never has any.
pub async fn ingest_location(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<Vec<serde_json::Value>>, AppError> {
    let Some(location) = NewLocation::from_payload(payload, Utc::now())? else {
        tracing::debug!(owner = auth.owner_name(), "ignored non-location message");
        return Ok(Json(Vec::new()));
    };

    let stored = location_service::insert_location(&pool, &location).await?;
    tracing::debug!(
        owner = auth.owner_name(),
        location_id = stored.id,
        device_id = ?stored.device_id,
        "location stored"
    );

    Ok(Json(Vec::new()))
}

/// Paged location history.
///
/// # Query Parameters
///
/// - `limit` (optional): page size; everything when absent
/// - `offset` (optional): rows to skip, defaults to 0
///
/// # Response (200 OK)
///
/// ```json
/// { "total": 1250, "data": [ { "id": 1250, "latitude": 52.36, ... } ] }
/// ```
pub async fn list_locations(
    State(pool): State<DbPool>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<LocationHistory>, AppError> {
    let history = location_service::list_locations(&pool, query.limit, query.offset).await?;

    Ok(Json(history))
}

/// Locations received on a given date.
///
/// The date is `YYYY-MM-DD` and interpreted in UTC.
pub async fn locations_by_date(
    State(pool): State<DbPool>,
    Path(date): Path<String>,
) -> Result<Json<DateHistory>, AppError> {
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|_| {
        AppError::InvalidRequest("date must be formatted as YYYY-MM-DD".to_string())
    })?;

    let data = location_service::locations_on_date(&pool, date).await?;

    Ok(Json(DateHistory {
        date,
        count: data.len(),
        data,
    }))
}

pub async fn locations_by_device(
    State(pool): State<DbPool>,
    Path(device_id): Path<String>,
) -> Result<Json<DeviceHistory>, AppError> {
    let data = location_service::locations_for_device(&pool, &device_id).await?;

    Ok(Json(DeviceHistory {
        device_id,
        count: data.len(),
        data,
    }))
}
