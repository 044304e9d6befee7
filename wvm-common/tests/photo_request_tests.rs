//! Integration tests for the photo-request review queue
//!
//! Runs against a real upload area in a temp root folder so approval's
//! file move is exercised end to end.

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;
use wvm_common::catalog::{CatalogMutator, CatalogStore, Location, Map, Venue};
use wvm_common::files::{RecordingReleaser, UploadArea, UploadKind};
use wvm_common::photo_requests::{PhotoRequestQueue, PhotoRequestSubmission};
use wvm_common::Error;

struct Fixture {
    dir: TempDir,
    store: Arc<CatalogStore>,
    uploads: UploadArea,
    releaser: Arc<RecordingReleaser>,
    queue: PhotoRequestQueue,
}

fn setup() -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = Arc::new(CatalogStore::new(dir.path().join("data.json")));
    let uploads = UploadArea::new(dir.path());
    let releaser = Arc::new(RecordingReleaser::new());
    let queue = PhotoRequestQueue::new(store.clone(), uploads.clone(), releaser.clone());
    Fixture {
        dir,
        store,
        uploads,
        releaser,
        queue,
    }
}

/// One venue `v1` / map `m1` / location `l1` with an existing image
async fn seed_location(fx: &Fixture) {
    let mut txn = fx.store.begin().await.unwrap();
    txn.venues.push(Venue {
        id: "v1".to_string(),
        name: "Arena".to_string(),
        maps: vec![Map {
            id: "m1".to_string(),
            label: "Level 1".to_string(),
            locations: vec![Location {
                id: "l1".to_string(),
                name: "Booth".to_string(),
                image: "uploads/location-old.png".to_string(),
                number: Some(1),
                ..Default::default()
            }],
            ..Default::default()
        }],
        ..Default::default()
    });
    txn.commit().await.unwrap();
}

fn submission(photo: Option<String>) -> PhotoRequestSubmission {
    PhotoRequestSubmission {
        venue_id: "v1".to_string(),
        map_id: "m1".to_string(),
        location_id: "l1".to_string(),
        location_name: "Booth".to_string(),
        venue_name: "Arena".to_string(),
        map_label: "Level 1".to_string(),
        uploaded_photo: photo,
    }
}

async fn stored_photo(fx: &Fixture) -> String {
    fx.uploads
        .store(UploadKind::PhotoRequest, "visitor.JPG", b"jpeg-bytes")
        .await
        .unwrap()
}

#[tokio::test]
async fn test_submit_queues_pending_request() {
    let fx = setup();
    let photo = stored_photo(&fx).await;

    let request = fx.queue.submit(submission(Some(photo.clone()))).await.unwrap();

    assert!(request.id.starts_with("req-"));
    assert_eq!(request.uploaded_photo.as_deref(), Some(photo.as_str()));
    assert!(chrono::DateTime::parse_from_rfc3339(&request.requested_at).is_ok());

    let pending = fx.queue.pending().await.unwrap();
    assert_eq!(pending, vec![request]);

    let text = std::fs::read_to_string(fx.store.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["photoRequests"][0]["status"], json!("pending"));
    assert_eq!(value["photoRequests"][0]["venueName"], json!("Arena"));
}

#[tokio::test]
async fn test_submit_does_not_validate_target() {
    let fx = setup();
    let mut sub = submission(None);
    sub.venue_id = "gone".to_string();

    let request = fx.queue.submit(sub).await.unwrap();
    assert_eq!(request.venue_id, "gone");
    assert_eq!(request.uploaded_photo, None);
}

#[tokio::test]
async fn test_approve_moves_photo_and_removes_request() {
    let fx = setup();
    seed_location(&fx).await;
    let photo = stored_photo(&fx).await;
    let request = fx.queue.submit(submission(Some(photo.clone()))).await.unwrap();

    let location = fx.queue.approve(&request.id).await.unwrap();

    assert!(location.image.starts_with("uploads/location-"));
    assert!(location.image.ends_with(".jpg"));
    assert_ne!(location.image, photo);
    assert!(fx.dir.path().join(&location.image).is_file());
    assert!(!fx.dir.path().join(&photo).exists());

    let doc = fx.store.load().await.unwrap();
    assert!(doc.photo_requests.is_empty());
    assert_eq!(doc.location("v1", "m1", "l1").unwrap().image, location.image);
    assert_eq!(fx.releaser.released(), vec!["uploads/location-old.png"]);

    let err = fx.queue.approve(&request.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_approve_without_photo_is_invalid_state() {
    let fx = setup();
    seed_location(&fx).await;
    let request = fx.queue.submit(submission(None)).await.unwrap();
    let before = std::fs::read(fx.store.path()).unwrap();

    let err = fx.queue.approve(&request.id).await.unwrap_err();
    assert!(matches!(err, Error::InvalidState(_)));

    assert_eq!(std::fs::read(fx.store.path()).unwrap(), before);
    assert_eq!(fx.queue.pending().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_approve_for_deleted_location_is_not_found() {
    let fx = setup();
    seed_location(&fx).await;
    let photo = stored_photo(&fx).await;
    let request = fx.queue.submit(submission(Some(photo.clone()))).await.unwrap();

    let mutator = CatalogMutator::new(fx.store.clone(), fx.releaser.clone());
    mutator.delete_location("v1", "m1", "l1").await.unwrap();

    let err = fx.queue.approve(&request.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    // request and upload are left for the admin to dismiss
    assert_eq!(fx.queue.pending().await.unwrap().len(), 1);
    assert!(fx.dir.path().join(&photo).is_file());
}

#[tokio::test]
async fn test_approve_attaches_original_path_when_move_fails() {
    let fx = setup();
    seed_location(&fx).await;
    let missing = "uploads/photo-requests/request-vanished.png".to_string();
    let request = fx.queue.submit(submission(Some(missing.clone()))).await.unwrap();

    let location = fx.queue.approve(&request.id).await.unwrap();

    assert_eq!(location.image, missing);
    assert!(fx.queue.pending().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_dismiss_twice_reports_not_found_and_changes_nothing() {
    let fx = setup();
    seed_location(&fx).await;
    let photo = stored_photo(&fx).await;
    let request = fx.queue.submit(submission(Some(photo.clone()))).await.unwrap();

    fx.queue.dismiss(&request.id).await.unwrap();
    assert_eq!(fx.releaser.released(), vec![photo]);
    let after_first = std::fs::read(fx.store.path()).unwrap();

    let err = fx.queue.dismiss(&request.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(std::fs::read(fx.store.path()).unwrap(), after_first);
    assert_eq!(fx.releaser.released().len(), 1);
}

#[tokio::test]
async fn test_approve_keeps_previous_image_still_used_elsewhere() {
    let fx = setup();
    seed_location(&fx).await;
    let mut txn = fx.store.begin().await.unwrap();
    txn.venues[0].maps[0].locations.push(Location {
        id: "l2".to_string(),
        name: "Stage".to_string(),
        image: "uploads/location-old.png".to_string(),
        number: Some(2),
        ..Default::default()
    });
    txn.commit().await.unwrap();

    let photo = stored_photo(&fx).await;
    let request = fx.queue.submit(submission(Some(photo))).await.unwrap();
    fx.queue.approve(&request.id).await.unwrap();

    assert!(fx.releaser.released().is_empty());
    let doc = fx.store.load().await.unwrap();
    assert_eq!(
        doc.location("v1", "m1", "l2").unwrap().image,
        "uploads/location-old.png"
    );
}
