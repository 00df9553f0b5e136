//! Location storage service.
//!
//! Append-and-filter access to the `locations` table:
//! - Insert a ping
//! - Page through all pings, newest first
//! - Filter by receive date or device

use chrono::{Duration, NaiveDate};

use crate::{
    db::DbPool,
    error::AppError,
    models::location::{Location, LocationHistory, NewLocation},
};

const LOCATION_COLUMNS: &str = "id, latitude, longitude, altitude, accuracy, timestamp, device_id, \
     tracker_id, battery, connection, user_id, server_received_at, raw_data";

/// Store a location ping.
///
/// `server_received_at` is set by the database.
pub async fn insert_location(pool: &DbPool, location: &NewLocation) -> Result<Location, AppError> {
    let stored = sqlx::query_as::<_, Location>(&format!(
        r#"
        INSERT INTO locations (
            latitude,
            longitude,
            altitude,
            accuracy,
            timestamp,
            device_id,
            tracker_id,
            battery,
            connection,
            user_id,
            raw_data
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING {LOCATION_COLUMNS}
        "#
    ))
    .bind(location.latitude)
    .bind(location.longitude)
    .bind(location.altitude)
    .bind(location.accuracy)
    .bind(location.timestamp)
    .bind(&location.device_id)
    .bind(&location.tracker_id)
    .bind(location.battery)
    .bind(&location.connection)
    .bind(&location.user_id)
    .bind(&location.raw_data)
    .fetch_one(pool)
    .await?;

    Ok(stored)
}

/// Page through all locations, newest first.
///
/// A `None` limit returns every row after `offset`.
///
/// # Errors
///
/// - `InvalidRequest`: negative limit or offset
pub async fn list_locations(
    pool: &DbPool,
    limit: Option<i64>,
    offset: i64,
) -> Result<LocationHistory, AppError> {
    if limit.is_some_and(|l| l < 0) || offset < 0 {
        return Err(AppError::InvalidRequest(
            "limit and offset must not be negative".to_string(),
        ));
    }

    // LIMIT NULL means no limit in PostgreSQL
    let data = sqlx::query_as::<_, Location>(&format!(
        r#"
        SELECT {LOCATION_COLUMNS}
        FROM locations
        ORDER BY server_received_at DESC
        LIMIT $1 OFFSET $2
        "#
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM locations")
        .fetch_one(pool)
        .await?;

    Ok(LocationHistory { total, data })
}

/// Locations received on `date` (UTC), oldest first.
pub async fn locations_on_date(pool: &DbPool, date: NaiveDate) -> Result<Vec<Location>, AppError> {
    let start = date.and_time(chrono::NaiveTime::MIN).and_utc();
    let end = start + Duration::days(1);

    let data = sqlx::query_as::<_, Location>(&format!(
        r#"
        SELECT {LOCATION_COLUMNS}
        FROM locations
        WHERE server_received_at >= $1 AND server_received_at < $2
        ORDER BY server_received_at
        "#
    ))
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(data)
}

/// All locations of one device, newest first.
pub async fn locations_for_device(
    pool: &DbPool,
    device_id: &str,
) -> Result<Vec<Location>, AppError> {
    let data = sqlx::query_as::<_, Location>(&format!(
        r#"
        SELECT {LOCATION_COLUMNS}
        FROM locations
        WHERE device_id = $1
        ORDER BY server_received_at DESC
        "#
    ))
    .bind(device_id)
    .fetch_all(pool)
    .await?;

    Ok(data)
}
