//! Integration tests for catalog mutations
//!
//! Tests cover:
//! - Create/update/delete for every entity kind
//! - Cascade image release on venue, map and location delete
//! - Auto-numbering of locations
//! - Shallow-merge updates
//! - Category slug rules, including whole-document replace
//! - Images shared between records surviving a delete
//! - Failed mutations leaving the persisted document untouched

use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;
use wvm_common::catalog::{CatalogMutator, CatalogStore, Payload};
use wvm_common::files::RecordingReleaser;
use wvm_common::Error;

struct Fixture {
    _dir: TempDir,
    store: Arc<CatalogStore>,
    releaser: Arc<RecordingReleaser>,
    mutator: CatalogMutator,
}

fn setup() -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = Arc::new(CatalogStore::new(dir.path().join("data.json")));
    let releaser = Arc::new(RecordingReleaser::new());
    let mutator = CatalogMutator::new(store.clone(), releaser.clone());
    Fixture {
        _dir: dir,
        store,
        releaser,
        mutator,
    }
}

fn payload(value: Value) -> Payload {
    value.as_object().cloned().expect("object payload")
}

/// Venue with two maps, each carrying an image and imaged locations
async fn seed_venue(fx: &Fixture, tag: &str) -> (String, Vec<String>, Vec<String>) {
    let venue = fx
        .mutator
        .create_venue(&payload(json!({"name": "Arena", "categories": ["c1"]})))
        .await
        .unwrap();

    let mut map_ids = Vec::new();
    let mut images = Vec::new();
    for m in 0..2 {
        let map_image = format!("uploads/maps/map-{}{}.png", tag, m);
        let map = fx
            .mutator
            .create_map(
                &venue.id,
                &payload(json!({"label": format!("Level {}", m), "image": map_image})),
            )
            .await
            .unwrap();
        images.push(map_image);

        for l in 0..2 {
            let loc_image = format!("uploads/location-{}{}-{}.png", tag, m, l);
            fx.mutator
                .create_location(
                    &venue.id,
                    &map.id,
                    &payload(json!({"name": format!("Spot {}", l), "image": loc_image})),
                )
                .await
                .unwrap();
            images.push(loc_image);
        }
        map_ids.push(map.id);
    }

    (venue.id, map_ids, images)
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_assigns_ids_and_empty_children() {
    let fx = setup();

    let venue = fx
        .mutator
        .create_venue(&payload(json!({"name": "Arena", "maps": [{"id": "x"}]})))
        .await
        .unwrap();
    assert_eq!(venue.id.len(), 8);
    assert!(venue.maps.is_empty());

    let map = fx
        .mutator
        .create_map(&venue.id, &payload(json!({"label": "Floor", "locations": [{"id": "y"}]})))
        .await
        .unwrap();
    assert!(map.locations.is_empty());

    let doc = fx.store.load().await.unwrap();
    assert_eq!(doc.venues[0].maps[0].id, map.id);
}

#[tokio::test]
async fn test_create_under_missing_parent_is_not_found() {
    let fx = setup();

    let err = fx
        .mutator
        .create_map("nope", &payload(json!({"label": "Floor"})))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let venue = fx
        .mutator
        .create_venue(&payload(json!({"name": "Arena"})))
        .await
        .unwrap();
    let err = fx
        .mutator
        .create_location(&venue.id, "nope", &payload(json!({"name": "Booth"})))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_category_slug_derived_and_unique() {
    let fx = setup();

    let cat = fx
        .mutator
        .create_category(&payload(json!({"name": "Sports Arenas"})))
        .await
        .unwrap();
    assert_eq!(cat.slug, "sports-arenas");

    let err = fx
        .mutator
        .create_category(&payload(json!({"name": "Other", "slug": "sports-arenas"})))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
    assert_eq!(fx.store.load().await.unwrap().categories.len(), 1);
}

#[tokio::test]
async fn test_category_cannot_take_landing_page_slug() {
    let fx = setup();

    for body in [json!({"name": "Index"}), json!({"name": "Home", "slug": "index"})] {
        let err = fx
            .mutator
            .create_category(&payload(body))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    let cat = fx
        .mutator
        .create_category(&payload(json!({"name": "Home"})))
        .await
        .unwrap();
    let err = fx
        .mutator
        .update_category(&cat.id, &payload(json!({"slug": "index"})))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
    assert_eq!(fx.store.load().await.unwrap().categories[0].slug, "home");
}

// =============================================================================
// Auto-numbering
// =============================================================================

#[tokio::test]
async fn test_location_numbers_increase_by_one_from_one() {
    let fx = setup();
    let venue = fx
        .mutator
        .create_venue(&payload(json!({"name": "Arena"})))
        .await
        .unwrap();
    let map = fx
        .mutator
        .create_map(&venue.id, &payload(json!({"label": "Floor"})))
        .await
        .unwrap();

    let mut numbers = Vec::new();
    for i in 0..5 {
        let loc = fx
            .mutator
            .create_location(&venue.id, &map.id, &payload(json!({"name": format!("L{}", i)})))
            .await
            .unwrap();
        numbers.push(loc.number.unwrap());
    }
    assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_numbers_leave_gaps_after_delete() {
    let fx = setup();
    let venue = fx
        .mutator
        .create_venue(&payload(json!({"name": "Arena"})))
        .await
        .unwrap();
    let map = fx
        .mutator
        .create_map(&venue.id, &payload(json!({"label": "Floor"})))
        .await
        .unwrap();

    let first = fx
        .mutator
        .create_location(&venue.id, &map.id, &payload(json!({"name": "A"})))
        .await
        .unwrap();
    fx.mutator
        .create_location(&venue.id, &map.id, &payload(json!({"name": "B", "number": 10})))
        .await
        .unwrap();
    fx.mutator
        .delete_location(&venue.id, &map.id, &first.id)
        .await
        .unwrap();

    let next = fx
        .mutator
        .create_location(&venue.id, &map.id, &payload(json!({"name": "C"})))
        .await
        .unwrap();
    assert_eq!(next.number, Some(11));

    let doc = fx.store.load().await.unwrap();
    let numbers: Vec<_> = doc.venues[0].maps[0]
        .locations
        .iter()
        .map(|l| l.number)
        .collect();
    assert_eq!(numbers, vec![Some(10), Some(11)]);
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_update_location_merges_fields() {
    let fx = setup();
    let venue = fx
        .mutator
        .create_venue(&payload(json!({"name": "Arena"})))
        .await
        .unwrap();
    let map = fx
        .mutator
        .create_map(&venue.id, &payload(json!({"label": "Floor"})))
        .await
        .unwrap();
    let loc = fx
        .mutator
        .create_location(
            &venue.id,
            &map.id,
            &payload(json!({
                "name": "Booth",
                "description": "old",
                "position": {"top": "12%", "left": "34%"}
            })),
        )
        .await
        .unwrap();

    let updated = fx
        .mutator
        .update_location(&venue.id, &map.id, &loc.id, &payload(json!({"description": "new"})))
        .await
        .unwrap();

    assert_eq!(updated.description, "new");
    assert_eq!(updated.name, loc.name);
    assert_eq!(updated.number, loc.number);
    assert_eq!(updated.position, loc.position);

    let doc = fx.store.load().await.unwrap();
    assert_eq!(doc.venues[0].maps[0].locations[0], updated);
}

#[tokio::test]
async fn test_update_missing_record_leaves_document_unchanged() {
    let fx = setup();
    let (venue_id, map_ids, _) = seed_venue(&fx, "a").await;
    let before = std::fs::read(fx.store.path()).unwrap();

    let err = fx
        .mutator
        .update_location(&venue_id, &map_ids[0], "missing", &payload(json!({"name": "x"})))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let err = fx
        .mutator
        .update_map(&venue_id, &map_ids[0], &payload(json!({"label": 7})))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    assert_eq!(std::fs::read(fx.store.path()).unwrap(), before);
}

#[tokio::test]
async fn test_update_replacing_image_releases_old_one() {
    let fx = setup();
    let (venue_id, map_ids, _) = seed_venue(&fx, "a").await;

    fx.mutator
        .update_map(&venue_id, &map_ids[0], &payload(json!({"image": "uploads/maps/new.png"})))
        .await
        .unwrap();
    fx.mutator
        .update_map(&venue_id, &map_ids[0], &payload(json!({"label": "Renamed"})))
        .await
        .unwrap();

    assert_eq!(fx.releaser.released(), vec!["uploads/maps/map-a0.png"]);
}

// =============================================================================
// Delete & cascade
// =============================================================================

#[tokio::test]
async fn test_delete_venue_releases_every_descendant_image_once() {
    let fx = setup();
    let (venue_id, _, images) = seed_venue(&fx, "a").await;
    let (other_id, _, other_images) = seed_venue(&fx, "b").await;

    fx.mutator.delete_venue(&venue_id).await.unwrap();

    let mut released = fx.releaser.released();
    released.sort();
    let mut expected = images.clone();
    expected.sort();
    assert_eq!(released, expected);

    let doc = fx.store.load().await.unwrap();
    let text = serde_json::to_string(&doc).unwrap();
    assert_eq!(doc.venues.len(), 1);
    assert_eq!(doc.venues[0].id, other_id);
    assert_eq!(doc.image_paths(), other_images);
    assert!(!text.contains(&venue_id));
}

#[tokio::test]
async fn test_delete_map_releases_map_and_location_images() {
    let fx = setup();
    let (venue_id, map_ids, _) = seed_venue(&fx, "a").await;

    fx.mutator.delete_map(&venue_id, &map_ids[1]).await.unwrap();

    assert_eq!(
        fx.releaser.released(),
        vec![
            "uploads/maps/map-a1.png",
            "uploads/location-a1-0.png",
            "uploads/location-a1-1.png"
        ]
    );
    let doc = fx.store.load().await.unwrap();
    assert_eq!(doc.venues[0].maps.len(), 1);
    assert_eq!(doc.venues[0].maps[0].id, map_ids[0]);
}

#[tokio::test]
async fn test_delete_location_without_image_releases_nothing() {
    let fx = setup();
    let venue = fx
        .mutator
        .create_venue(&payload(json!({"name": "Arena"})))
        .await
        .unwrap();
    let map = fx
        .mutator
        .create_map(&venue.id, &payload(json!({"label": "Floor"})))
        .await
        .unwrap();
    let loc = fx
        .mutator
        .create_location(&venue.id, &map.id, &payload(json!({"name": "Booth"})))
        .await
        .unwrap();

    fx.mutator
        .delete_location(&venue.id, &map.id, &loc.id)
        .await
        .unwrap();
    assert!(fx.releaser.released().is_empty());

    let err = fx
        .mutator
        .delete_location(&venue.id, &map.id, &loc.id)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_delete_category_detaches_venues() {
    let fx = setup();
    let cat = fx
        .mutator
        .create_category(&payload(json!({"name": "Arenas"})))
        .await
        .unwrap();
    fx.mutator
        .create_venue(&payload(json!({"name": "A", "categories": [cat.id, "c9"]})))
        .await
        .unwrap();
    fx.mutator
        .create_venue(&payload(json!({"name": "B", "category": cat.id})))
        .await
        .unwrap();

    fx.mutator.delete_category(&cat.id).await.unwrap();

    let doc = fx.store.load().await.unwrap();
    assert!(doc.categories.is_empty());
    assert_eq!(doc.venues[0].categories, vec!["c9"]);
    assert_eq!(doc.venues[1].category, None);

    let err = fx.mutator.delete_category(&cat.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_replace_document_releases_dropped_images() {
    let fx = setup();
    let (venue_id, map_ids, _) = seed_venue(&fx, "a").await;

    let mut doc = fx.store.load().await.unwrap();
    doc.venues[0].maps.retain(|m| m.id == map_ids[0]);
    fx.mutator.replace_document(doc.clone()).await.unwrap();

    let mut released = fx.releaser.released();
    released.sort();
    assert_eq!(
        released,
        vec![
            "uploads/location-a1-0.png",
            "uploads/location-a1-1.png",
            "uploads/maps/map-a1.png"
        ]
    );
    assert_eq!(fx.store.load().await.unwrap(), doc);
    assert_eq!(doc.venues[0].id, venue_id);
}

#[tokio::test]
async fn test_replace_document_settles_category_slugs() {
    let fx = setup();
    seed_venue(&fx, "a").await;
    let before = std::fs::read(fx.store.path()).unwrap();

    let mut doc = fx.store.load().await.unwrap();
    doc.categories = serde_json::from_value(json!([
        {"id": "a", "name": "A", "slug": "same"},
        {"id": "b", "name": "B", "slug": "same"},
        {"id": "c", "name": "Concert Halls", "slug": ""}
    ]))
    .unwrap();
    let err = fx.mutator.replace_document(doc.clone()).await.unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
    assert_eq!(std::fs::read(fx.store.path()).unwrap(), before);

    doc.categories[1].slug = "other".to_string();
    let saved = fx.mutator.replace_document(doc).await.unwrap();
    let slugs: Vec<_> = saved.categories.iter().map(|c| c.slug.as_str()).collect();
    assert_eq!(slugs, vec!["same", "other", "concert-halls"]);
    assert_eq!(fx.store.load().await.unwrap(), saved);
    assert!(fx.releaser.released().is_empty());
}

#[tokio::test]
async fn test_replace_document_rejects_landing_page_slug() {
    let fx = setup();
    let before = std::fs::read(fx.store.path()).ok();

    let mut doc = fx.store.load().await.unwrap();
    doc.categories = serde_json::from_value(json!([{"id": "a", "name": "Index"}])).unwrap();
    let err = fx.mutator.replace_document(doc).await.unwrap_err();

    assert!(matches!(err, Error::Conflict(_)));
    assert_eq!(std::fs::read(fx.store.path()).ok(), before);
}

#[tokio::test]
async fn test_shared_image_released_only_when_last_user_goes() {
    let fx = setup();
    let venue = fx
        .mutator
        .create_venue(&payload(json!({"name": "Arena"})))
        .await
        .unwrap();
    let map = fx
        .mutator
        .create_map(&venue.id, &payload(json!({"label": "Floor"})))
        .await
        .unwrap();

    let shared = "uploads/location-shared.png";
    let first = fx
        .mutator
        .create_location(&venue.id, &map.id, &payload(json!({"name": "A", "image": shared})))
        .await
        .unwrap();
    let second = fx
        .mutator
        .create_location(&venue.id, &map.id, &payload(json!({"name": "B", "image": shared})))
        .await
        .unwrap();
    let third = fx
        .mutator
        .create_location(&venue.id, &map.id, &payload(json!({"name": "C", "image": shared})))
        .await
        .unwrap();

    fx.mutator
        .delete_location(&venue.id, &map.id, &first.id)
        .await
        .unwrap();
    fx.mutator
        .update_location(
            &venue.id,
            &map.id,
            &second.id,
            &payload(json!({"image": "uploads/location-own.png"})),
        )
        .await
        .unwrap();
    assert!(fx.releaser.released().is_empty());

    fx.mutator
        .delete_location(&venue.id, &map.id, &third.id)
        .await
        .unwrap();
    assert_eq!(fx.releaser.released(), vec![shared]);
}
