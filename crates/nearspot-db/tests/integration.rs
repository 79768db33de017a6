//! Integration tests against an in-memory SQLite database provisioned by
//! `#[sqlx::test]` with the workspace migrations applied.

use nearspot_core::PlaceKind;
use nearspot_db::{favorites, reviews, search_history, users, DbError, PoolConfig};
use sqlx::SqlitePool;

#[test]
fn pool_config_defaults_are_sane() {
    let config = PoolConfig::default();
    assert_eq!(config.max_connections, 10);
    assert_eq!(config.min_connections, 1);
    assert_eq!(config.acquire_timeout_secs, 10);
}

#[sqlx::test(migrations = "../../migrations")]
async fn create_and_find_user(pool: SqlitePool) {
    let id = users::create_user(&pool, "Ada", "ada@example.com", "hash-1")
        .await
        .expect("insert user");

    let by_email = users::find_by_email(&pool, "ada@example.com")
        .await
        .expect("query")
        .expect("user exists");
    assert_eq!(by_email.id, id);
    assert_eq!(by_email.name, "Ada");
    assert_eq!(by_email.password_hash, "hash-1");

    let by_id = users::find_by_id(&pool, id)
        .await
        .expect("query")
        .expect("user exists");
    assert_eq!(by_id.email, "ada@example.com");

    assert!(users::find_by_email(&pool, "nobody@example.com")
        .await
        .expect("query")
        .is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn duplicate_email_is_a_unique_violation(pool: SqlitePool) {
    users::create_user(&pool, "Ada", "ada@example.com", "hash-1")
        .await
        .expect("insert user");

    let err = users::create_user(&pool, "Imposter", "ada@example.com", "hash-2")
        .await
        .expect_err("duplicate email must fail");
    assert!(err.is_unique_violation(), "got: {err}");
}

#[sqlx::test(migrations = "../../migrations")]
async fn update_profile_rejects_missing_user(pool: SqlitePool) {
    let err = users::update_profile(&pool, 999, "Ghost", "ghost@example.com")
        .await
        .expect_err("no such user");
    assert!(matches!(err, DbError::NotFound));
}

#[sqlx::test(migrations = "../../migrations")]
async fn email_taken_by_other_ignores_self(pool: SqlitePool) {
    let ada = users::create_user(&pool, "Ada", "ada@example.com", "h")
        .await
        .expect("insert");
    let bob = users::create_user(&pool, "Bob", "bob@example.com", "h")
        .await
        .expect("insert");

    assert!(!users::email_taken_by_other(&pool, "ada@example.com", ada)
        .await
        .expect("query"));
    assert!(users::email_taken_by_other(&pool, "ada@example.com", bob)
        .await
        .expect("query"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn password_update_is_visible_on_next_read(pool: SqlitePool) {
    let id = users::create_user(&pool, "Ada", "ada@example.com", "old-hash")
        .await
        .expect("insert");

    users::update_password(&pool, id, "new-hash")
        .await
        .expect("update");

    let row = users::find_by_id(&pool, id)
        .await
        .expect("query")
        .expect("exists");
    assert_eq!(row.password_hash, "new-hash");
}

#[sqlx::test(migrations = "../../migrations")]
async fn favorites_are_idempotent_per_place(pool: SqlitePool) {
    let user = users::create_user(&pool, "Ada", "ada@example.com", "h")
        .await
        .expect("insert");

    let first = favorites::add_favorite(&pool, user, "place-1", "Taco Spot", PlaceKind::Restaurant)
        .await
        .expect("add");
    let second =
        favorites::add_favorite(&pool, user, "place-1", "Taco Spot", PlaceKind::Restaurant)
            .await
            .expect("re-add");
    assert!(first, "first save inserts");
    assert!(!second, "second save is a no-op");

    let listed = favorites::list_favorites(&pool, user, None)
        .await
        .expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].place_id, "place-1");
    assert_eq!(listed[0].place_type, "restaurant");
}

#[sqlx::test(migrations = "../../migrations")]
async fn favorites_filter_by_kind_and_remove(pool: SqlitePool) {
    let user = users::create_user(&pool, "Ada", "ada@example.com", "h")
        .await
        .expect("insert");

    favorites::add_favorite(&pool, user, "r-1", "Taco Spot", PlaceKind::Restaurant)
        .await
        .expect("add");
    favorites::add_favorite(&pool, user, "e-1", "Jazz Night", PlaceKind::Event)
        .await
        .expect("add");

    let only_events = favorites::list_favorites(&pool, user, Some(PlaceKind::Event))
        .await
        .expect("list");
    assert_eq!(only_events.len(), 1);
    assert_eq!(only_events[0].place_id, "e-1");

    assert!(
        favorites::remove_favorite(&pool, user, "r-1", PlaceKind::Restaurant)
            .await
            .expect("remove")
    );
    assert!(
        !favorites::remove_favorite(&pool, user, "r-1", PlaceKind::Restaurant)
            .await
            .expect("second remove finds nothing")
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn reviews_round_trip_and_filter(pool: SqlitePool) {
    let user = users::create_user(&pool, "Ada", "ada@example.com", "h")
        .await
        .expect("insert");

    reviews::insert_review(
        &pool,
        user,
        "r-1",
        "Taco Spot",
        PlaceKind::Restaurant,
        5,
        Some("Great al pastor"),
    )
    .await
    .expect("insert review");
    reviews::insert_review(&pool, user, "h-1", "Inn", PlaceKind::Hotel, 3, None)
        .await
        .expect("insert review");

    let all = reviews::list_reviews_for_user(&pool, user, None)
        .await
        .expect("list");
    assert_eq!(all.len(), 2);

    let hotels = reviews::list_reviews_for_user(&pool, user, Some(PlaceKind::Hotel))
        .await
        .expect("list");
    assert_eq!(hotels.len(), 1);
    assert_eq!(hotels[0].rating, 3);
    assert!(hotels[0].review_text.is_none());

    let for_place = reviews::list_reviews_for_place(&pool, "r-1")
        .await
        .expect("list");
    assert_eq!(for_place.len(), 1);
    assert_eq!(for_place[0].review_text.as_deref(), Some("Great al pastor"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn review_rating_check_constraint_holds(pool: SqlitePool) {
    let user = users::create_user(&pool, "Ada", "ada@example.com", "h")
        .await
        .expect("insert");

    let err = reviews::insert_review(&pool, user, "r-1", "Spot", PlaceKind::Restaurant, 6, None)
        .await
        .expect_err("rating 6 violates CHECK");
    assert!(matches!(err, DbError::Sqlx(_)));
}

#[sqlx::test(migrations = "../../migrations")]
async fn search_history_records_and_limits(pool: SqlitePool) {
    let user = users::create_user(&pool, "Ada", "ada@example.com", "h")
        .await
        .expect("insert");

    for i in 0..4 {
        search_history::record_search(
            &pool,
            Some(user),
            &format!("tacos {i}"),
            Some("30.2672,-97.7431"),
            Some("{\"open_now\":true}"),
        )
        .await
        .expect("record");
    }
    // Anonymous searches carry no user id.
    search_history::record_search(&pool, None, "coffee", None, None)
        .await
        .expect("record");

    let recent = search_history::recent_searches(&pool, user, 3)
        .await
        .expect("query");
    assert_eq!(recent.len(), 3);
    assert!(recent.iter().all(|r| r.user_id == Some(user)));
}
