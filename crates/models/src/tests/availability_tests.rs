use anyhow::Result;

use super::setup_test_db;
use crate::errors::ModelError;
use crate::reservation::{self, validate_start_time, window_bounds, MAX_START_TIME, SLOT_WINDOW_SECS};
use crate::restaurant_table;

const NOW: i64 = 1_700_000_000;

#[tokio::test]
async fn test_provisioned_tables_are_all_available() -> Result<()> {
    let db = setup_test_db().await?;

    let tables = restaurant_table::create_for_restaurant(&db, 7, 4).await?;
    assert_eq!(tables.len(), 4);
    assert!(tables.iter().all(|t| t.restaurant_id == 7));

    for start in [0, 1_000, NOW] {
        assert_eq!(restaurant_table::count_available(&db, 7, start).await?, 4);
    }
    // Unknown restaurant has nothing to offer
    assert_eq!(restaurant_table::count_available(&db, 8, NOW).await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_provisioning_rejects_bad_input() -> Result<()> {
    let db = setup_test_db().await?;

    let zero = restaurant_table::create_for_restaurant(&db, 1, 0).await;
    assert!(matches!(zero, Err(ModelError::Validation(_))));
    let negative = restaurant_table::create_for_restaurant(&db, -3, 2).await;
    assert!(matches!(negative, Err(ModelError::Validation(_))));
    assert!(restaurant_table::list_for_restaurant(&db, 1).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_window_boundary_is_strict() -> Result<()> {
    let db = setup_test_db().await?;
    let tables = restaurant_table::create_for_restaurant(&db, 1, 1).await?;
    reservation::create(&db, 1, tables[0].id, 10_000, "alice", NOW).await?;

    assert_eq!(restaurant_table::count_available(&db, 1, 10_000).await?, 0);
    assert_eq!(restaurant_table::count_available(&db, 1, 10_000 + 3_599).await?, 0);
    assert_eq!(restaurant_table::count_available(&db, 1, 10_000 - 3_599).await?, 0);
    assert_eq!(restaurant_table::count_available(&db, 1, 10_000 + SLOT_WINDOW_SECS).await?, 1);
    assert_eq!(restaurant_table::count_available(&db, 1, 10_000 - SLOT_WINDOW_SECS).await?, 1);
    Ok(())
}

#[tokio::test]
async fn test_first_available_picks_lowest_free_id() -> Result<()> {
    let db = setup_test_db().await?;
    let tables = restaurant_table::create_for_restaurant(&db, 3, 3).await?;

    let first = restaurant_table::first_available(&db, 3, 5_000).await?.expect("a free table");
    assert_eq!(first.id, tables[0].id);

    reservation::create(&db, 3, tables[0].id, 5_000, "alice", NOW).await?;
    let next = restaurant_table::first_available(&db, 3, 5_000).await?.expect("a free table");
    assert_eq!(next.id, tables[1].id);
    assert_eq!(restaurant_table::count_available(&db, 3, 5_000).await?, 2);
    Ok(())
}

#[tokio::test]
async fn test_other_restaurants_and_deleted_rows_do_not_block() -> Result<()> {
    let db = setup_test_db().await?;
    let mine = restaurant_table::create_for_restaurant(&db, 1, 1).await?;
    let theirs = restaurant_table::create_for_restaurant(&db, 2, 1).await?;

    reservation::create(&db, 2, theirs[0].id, 20_000, "bob", NOW).await?;
    assert_eq!(restaurant_table::count_available(&db, 1, 20_000).await?, 1);

    reservation::create(&db, 1, mine[0].id, 20_000, "carol", NOW).await?;
    assert_eq!(restaurant_table::count_available(&db, 1, 20_000).await?, 0);

    // Once swept, the slot frees up again
    reservation::expire_before(&db, 20_000 + SLOT_WINDOW_SECS).await?;
    assert_eq!(restaurant_table::count_available(&db, 1, 20_000).await?, 1);
    Ok(())
}

#[tokio::test]
async fn test_create_returns_assigned_id() -> Result<()> {
    let db = setup_test_db().await?;
    let tables = restaurant_table::create_for_restaurant(&db, 1, 2).await?;

    let a = reservation::create(&db, 1, tables[0].id, 1_000, "alice", NOW).await?;
    let b = reservation::create(&db, 1, tables[1].id, 1_000, "bob", NOW).await?;
    assert_ne!(a.id, b.id);

    let found = reservation::find(&db, a.id).await?.expect("stored");
    assert_eq!(found.user_id, "alice");
    assert_eq!(found.updated, NOW);
    assert!(!found.deleted);

    let empty_user = reservation::create(&db, 1, tables[0].id, 90_000, "  ", NOW).await;
    assert!(matches!(empty_user, Err(ModelError::Validation(_))));
    Ok(())
}

#[test]
fn test_window_bounds_saturate() {
    assert_eq!(window_bounds(10_000), (6_400, 13_600));
    assert_eq!(window_bounds(i64::MAX).1, i64::MAX);
    assert_eq!(window_bounds(i64::MIN).0, i64::MIN);
}

#[tokio::test]
async fn test_start_time_range_keeps_window_exact() -> Result<()> {
    let db = setup_test_db().await?;
    let tables = restaurant_table::create_for_restaurant(&db, 1, 1).await?;

    assert!(validate_start_time(0).is_ok());
    assert!(validate_start_time(MAX_START_TIME).is_ok());
    assert!(matches!(validate_start_time(-1), Err(ModelError::Validation(_))));
    assert!(matches!(validate_start_time(MAX_START_TIME + 1), Err(ModelError::Validation(_))));

    // rows near the ends of i64 cannot be stored at all
    let early = reservation::create(&db, 1, tables[0].id, i64::MIN, "alice", NOW).await;
    assert!(matches!(early, Err(ModelError::Validation(_))));

    // at the top of the range the upper bound is exact, not saturated
    reservation::create(&db, 1, tables[0].id, MAX_START_TIME, "alice", NOW).await?;
    assert_eq!(window_bounds(MAX_START_TIME).1, i64::MAX);
    assert_eq!(restaurant_table::count_available(&db, 1, MAX_START_TIME - 10).await?, 0);
    assert_eq!(restaurant_table::count_available(&db, 1, MAX_START_TIME - SLOT_WINDOW_SECS).await?, 1);
    Ok(())
}
