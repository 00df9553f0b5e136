//! Location storage against a real PostgreSQL database.
//!
//! Skipped unless `DATABASE_URL` is set.

use chrono::Utc;
use location_logger::db::{self, DbPool};
use location_logger::models::location::NewLocation;
use location_logger::services::location_service;
use serde_json::json;

async fn test_pool() -> Option<DbPool> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = db::create_pool(&url).await.unwrap();
    db::run_migrations(&pool).await.unwrap();
    Some(pool)
}

#[tokio::test]
async fn given_stored_ping_when_queried_should_appear_in_every_view() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let device = format!("device-{}", uuid::Uuid::new_v4().simple());
    let payload = json!({
        "_type": "location",
        "lat": 48.8566,
        "lon": 2.3522,
        "tst": 1735689600,
        "devid": device,
        "batt": 55,
        "vel": 12
    });
    let location = NewLocation::from_payload(payload.clone(), Utc::now())
        .unwrap()
        .unwrap();

    let stored = location_service::insert_location(&pool, &location).await.unwrap();
    assert_eq!(stored.device_id.as_deref(), Some(device.as_str()));
    assert_eq!(stored.raw_data, Some(payload));

    let by_device = location_service::locations_for_device(&pool, &device).await.unwrap();
    assert_eq!(by_device.len(), 1);
    assert_eq!(by_device[0].id, stored.id);

    let today = stored.server_received_at.date_naive();
    let by_date = location_service::locations_on_date(&pool, today).await.unwrap();
    assert!(by_date.iter().any(|l| l.id == stored.id));

    let page = location_service::list_locations(&pool, Some(1), 0).await.unwrap();
    assert_eq!(page.data.len(), 1);
    assert!(page.total >= 1);
}

#[tokio::test]
async fn given_negative_paging_when_listing_should_reject() {
    let Some(pool) = test_pool().await else {
        return;
    };

    assert!(location_service::list_locations(&pool, Some(-1), 0).await.is_err());
    assert!(location_service::list_locations(&pool, None, -5).await.is_err());
}
