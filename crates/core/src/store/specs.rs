//! Behavior every [`FeedStore`] implementation must satisfy.
//!
//! Each backing store's test module runs these against its own instance.

use chrono::{DateTime, Duration, TimeZone, Utc};
use url::Url;
use uuid::Uuid;

use super::FeedStore;
use crate::model::{CacheResult, FeedImage};

pub(crate) fn unique_image() -> FeedImage {
    let id = Uuid::new_v4();
    FeedImage::new(id, Url::parse(&format!("https://example.com/images/{id}.png")).unwrap())
        .with_description("any description")
        .with_location("any location")
}

pub(crate) fn unique_feed() -> Vec<FeedImage> {
    vec![
        unique_image(),
        FeedImage::new(Uuid::new_v4(), Url::parse("https://another.example.com/image.jpg").unwrap()),
        unique_image().with_location("second location"),
    ]
}

pub(crate) fn fixed_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 14, 9, 26, 53).unwrap() + Duration::nanoseconds(589_793_238)
}

fn found(feed: &[FeedImage], timestamp: DateTime<Utc>) -> CacheResult {
    CacheResult::Found { feed: feed.to_vec(), timestamp }
}

pub(crate) async fn assert_retrieve_delivers_empty_on_empty_cache<S: FeedStore>(sut: &S) {
    assert_eq!(sut.retrieve().await.unwrap(), CacheResult::Empty);
}

pub(crate) async fn assert_retrieve_has_no_side_effects_on_empty_cache<S: FeedStore>(sut: &S) {
    assert_eq!(sut.retrieve().await.unwrap(), CacheResult::Empty);
    assert_eq!(sut.retrieve().await.unwrap(), CacheResult::Empty);
}

pub(crate) async fn assert_retrieve_delivers_found_values_on_non_empty_cache<S: FeedStore>(sut: &S) {
    let feed = unique_feed();
    let timestamp = fixed_timestamp();

    sut.insert(feed.clone(), timestamp).await.unwrap();

    assert_eq!(sut.retrieve().await.unwrap(), found(&feed, timestamp));
}

pub(crate) async fn assert_retrieve_has_no_side_effects_on_non_empty_cache<S: FeedStore>(sut: &S) {
    let feed = unique_feed();
    let timestamp = fixed_timestamp();

    sut.insert(feed.clone(), timestamp).await.unwrap();

    assert_eq!(sut.retrieve().await.unwrap(), found(&feed, timestamp));
    assert_eq!(sut.retrieve().await.unwrap(), found(&feed, timestamp));
}

pub(crate) async fn assert_insert_delivers_no_error_on_empty_cache<S: FeedStore>(sut: &S) {
    assert!(sut.insert(unique_feed(), Utc::now()).await.is_ok());
}

pub(crate) async fn assert_insert_delivers_no_error_on_non_empty_cache<S: FeedStore>(sut: &S) {
    sut.insert(unique_feed(), Utc::now()).await.unwrap();

    assert!(sut.insert(unique_feed(), Utc::now()).await.is_ok());
}

pub(crate) async fn assert_insert_accepts_empty_feed<S: FeedStore>(sut: &S) {
    let timestamp = fixed_timestamp();

    sut.insert(Vec::new(), timestamp).await.unwrap();

    assert_eq!(sut.retrieve().await.unwrap(), found(&[], timestamp));
}

pub(crate) async fn assert_insert_overrides_previously_inserted_values<S: FeedStore>(sut: &S) {
    sut.insert(unique_feed(), fixed_timestamp()).await.unwrap();

    let latest_feed = vec![unique_image()];
    let latest_timestamp = Utc::now();
    sut.insert(latest_feed.clone(), latest_timestamp).await.unwrap();

    assert_eq!(sut.retrieve().await.unwrap(), found(&latest_feed, latest_timestamp));
}

pub(crate) async fn assert_delete_delivers_no_error_on_empty_cache<S: FeedStore>(sut: &S) {
    assert!(sut.delete().await.is_ok());
}

pub(crate) async fn assert_delete_has_no_side_effects_on_empty_cache<S: FeedStore>(sut: &S) {
    sut.delete().await.unwrap();

    assert_eq!(sut.retrieve().await.unwrap(), CacheResult::Empty);
}

pub(crate) async fn assert_delete_delivers_no_error_on_non_empty_cache<S: FeedStore>(sut: &S) {
    sut.insert(unique_feed(), Utc::now()).await.unwrap();

    assert!(sut.delete().await.is_ok());
}

pub(crate) async fn assert_delete_empties_previously_inserted_cache<S: FeedStore>(sut: &S) {
    sut.insert(unique_feed(), Utc::now()).await.unwrap();
    sut.delete().await.unwrap();

    assert_eq!(sut.retrieve().await.unwrap(), CacheResult::Empty);
}

/// Submission order decides the outcome, not the order completions are awaited.
pub(crate) async fn assert_side_effects_run_serially<S: FeedStore>(sut: &S) {
    let first = sut.insert(unique_feed(), Utc::now());
    let second = sut.delete();
    let latest_feed = unique_feed();
    let latest_timestamp = fixed_timestamp();
    let third = sut.insert(latest_feed.clone(), latest_timestamp);
    let observed = sut.retrieve();

    assert_eq!(observed.await.unwrap(), found(&latest_feed, latest_timestamp));
    third.await.unwrap();
    second.await.unwrap();
    first.await.unwrap();

    let a = vec![unique_image()];
    let b = vec![unique_image(), unique_image()];
    drop(sut.insert(a, Utc::now()));
    drop(sut.insert(b.clone(), latest_timestamp));

    assert_eq!(sut.retrieve().await.unwrap(), found(&b, latest_timestamp));
}
