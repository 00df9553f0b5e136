//! Location data models and API request/response types.
//!
//! This module defines:
//! - `OwnTracksMessage`: the JSON body an OwnTracks client posts to `/pub`
//! - `NewLocation`: a validated location ready to insert
//! - `Location`: database entity representing a stored ping
//! - History response bodies for the read-back endpoints

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

// Column widths in the `locations` table
const MAX_TRACKER_ID_LEN: usize = 10;
const MAX_CONNECTION_LEN: usize = 50;
const MAX_DEVICE_ID_LEN: usize = 255;
const MAX_USER_ID_LEN: usize = 255;

/// Message published by an OwnTracks client.
///
/// Only `_type = "location"` messages carry a position. Clients also publish
/// other message types (`transition`, `waypoint`, `status`, ...) to the same
/// endpoint; those are acknowledged and dropped.
///
/// # JSON Example
///
/// ```json
/// {
///   "_type": "location",
///   "lat": 52.3676,
///   "lon": 4.9041,
///   "alt": 3,
///   "acc": 12,
///   "tst": 1735689600,
///   "tid": "ph",
///   "batt": 87,
///   "conn": "w"
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct OwnTracksMessage {
    #[serde(rename = "_type")]
    pub message_type: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub alt: Option<f64>,
    pub acc: Option<f64>,
    /// Client-side fix time, seconds since the Unix epoch
    pub tst: Option<i64>,
    pub devid: Option<String>,
    #[serde(rename = "deviceId")]
    pub device_id: Option<String>,
    pub tid: Option<String>,
    pub batt: Option<i32>,
    pub conn: Option<String>,
    pub user: Option<String>,
}

/// A location ping ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
    pub accuracy: Option<f64>,
    pub timestamp: DateTime<Utc>,
    pub device_id: Option<String>,
    pub tracker_id: Option<String>,
    pub battery: Option<i32>,
    pub connection: Option<String>,
    pub user_id: Option<String>,
    /// Full original payload, extra fields included
    pub raw_data: serde_json::Value,
}

impl NewLocation {
    /// Build a location from a raw OwnTracks payload.
    ///
    /// Returns `Ok(None)` for messages that are not locations.
    ///
    /// # Rules
    ///
    /// - `lat` and `lon` are required and must be within WGS84 bounds
    /// - `tst` becomes the fix time; missing or out-of-range values fall back to `received_at`
    /// - `devid` wins over `deviceId` when both are present
    /// - `tid`, `conn`, `devid` and `user` must fit their columns (10, 50, 255, 255 characters)
    pub fn from_payload(
        payload: serde_json::Value,
        received_at: DateTime<Utc>,
    ) -> Result<Option<Self>, AppError> {
        let message: OwnTracksMessage = serde_json::from_value(payload.clone())
            .map_err(|e| AppError::InvalidRequest(format!("Malformed location payload: {e}")))?;

        if message
            .message_type
            .as_deref()
            .is_some_and(|t| t != "location")
        {
            return Ok(None);
        }

        let (Some(latitude), Some(longitude)) = (message.lat, message.lon) else {
            return Err(AppError::InvalidRequest(
                "lat and lon are required".to_string(),
            ));
        };

        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(AppError::InvalidRequest(
                "lat/lon out of range".to_string(),
            ));
        }

        let device_id = message.devid.or(message.device_id);

        check_length("tid", message.tid.as_deref(), MAX_TRACKER_ID_LEN)?;
        check_length("conn", message.conn.as_deref(), MAX_CONNECTION_LEN)?;
        check_length("devid", device_id.as_deref(), MAX_DEVICE_ID_LEN)?;
        check_length("user", message.user.as_deref(), MAX_USER_ID_LEN)?;

        let timestamp = message
            .tst
            .and_then(|tst| DateTime::from_timestamp(tst, 0))
            .unwrap_or(received_at);

        Ok(Some(Self {
            latitude,
            longitude,
            altitude: message.alt,
            accuracy: message.acc,
            timestamp,
            device_id,
            tracker_id: message.tid,
            battery: message.batt,
            connection: message.conn,
            user_id: message.user,
            raw_data: payload,
        }))
    }
}

fn check_length(field: &str, value: Option<&str>, max: usize) -> Result<(), AppError> {
    if value.is_some_and(|v| v.chars().count() > max) {
        return Err(AppError::InvalidRequest(format!(
            "{field} must be {max} characters or less"
        )));
    }
    Ok(())
}

/// Represents a location record from the database.
///
/// # Database Table
///
/// Maps to the `locations` table. Rows are append-only.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Location {
    pub id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
    pub accuracy: Option<f64>,

    /// Fix time reported by the client
    pub timestamp: DateTime<Utc>,

    pub device_id: Option<String>,
    pub tracker_id: Option<String>,
    pub battery: Option<i32>,
    pub connection: Option<String>,
    pub user_id: Option<String>,

    /// Time the server stored the ping
    pub server_received_at: DateTime<Utc>,

    /// Original payload; stored for reprocessing, not returned to clients
    #[serde(skip)]
    pub raw_data: Option<serde_json::Value>,
}

/// Query parameters for `GET /api/v1/locations`.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    /// Page size; all rows when absent
    pub limit: Option<i64>,

    #[serde(default)]
    pub offset: i64,
}

/// Response body for `GET /api/v1/locations`.
#[derive(Debug, Serialize)]
pub struct LocationHistory {
    /// Total number of stored locations, independent of paging
    pub total: i64,
    pub data: Vec<Location>,
}

/// Response body for `GET /api/v1/locations/date/{date}`.
#[derive(Debug, Serialize)]
pub struct DateHistory {
    pub date: NaiveDate,
    pub count: usize,
    pub data: Vec<Location>,
}

/// Response body for `GET /api/v1/locations/device/{device_id}`.
#[derive(Debug, Serialize)]
pub struct DeviceHistory {
    pub device_id: String,
    pub count: usize,
    pub data: Vec<Location>,
}
