//! Visitor photo requests: submit, then approve or dismiss
//!
//! Requests live in the catalog document's `photoRequests` queue while
//! pending. Approval and dismissal both remove the request; no history of
//! resolved requests is kept.
//!
//! Approval moves the uploaded file before saving the document. If the
//! save then fails the file has still moved, which leaves an unreferenced
//! permanent image rather than a catalog pointing at a vanished temp file.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use crate::catalog::model::{Location, PhotoRequest, RequestStatus};
use crate::catalog::store::CatalogStore;
use crate::files::{release_all, FileReleaser, UploadArea};
use crate::{ids, time, Error, Result};

/// Submission fields as sent by the public request form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRequestSubmission {
    #[serde(default)]
    pub venue_id: String,
    #[serde(default)]
    pub map_id: String,
    #[serde(default)]
    pub location_id: String,
    #[serde(default)]
    pub location_name: String,
    #[serde(default)]
    pub venue_name: String,
    #[serde(default)]
    pub map_label: String,
    /// Already-saved upload, relative to the root folder
    #[serde(default)]
    pub uploaded_photo: Option<String>,
}

pub struct PhotoRequestQueue {
    store: Arc<CatalogStore>,
    uploads: UploadArea,
    releaser: Arc<dyn FileReleaser>,
}

impl PhotoRequestQueue {
    pub fn new(store: Arc<CatalogStore>, uploads: UploadArea, releaser: Arc<dyn FileReleaser>) -> Self {
        Self {
            store,
            uploads,
            releaser,
        }
    }

    /// Pending requests in submission order
    pub async fn pending(&self) -> Result<Vec<PhotoRequest>> {
        Ok(self.store.load().await?.photo_requests)
    }

    /// Queue a request without checking the target still exists
    pub async fn submit(&self, submission: PhotoRequestSubmission) -> Result<PhotoRequest> {
        let mut txn = self.store.begin().await?;

        let request = PhotoRequest {
            id: ids::generate_photo_request(),
            venue_id: submission.venue_id,
            map_id: submission.map_id,
            location_id: submission.location_id,
            location_name: submission.location_name,
            venue_name: submission.venue_name,
            map_label: submission.map_label,
            requested_at: time::now().to_rfc3339(),
            status: RequestStatus::Pending,
            uploaded_photo: submission.uploaded_photo.filter(|p| !p.is_empty()),
            extra: Default::default(),
        };
        txn.photo_requests.push(request.clone());
        txn.commit().await?;

        info!(
            "Photo request {} submitted for {} / {} / {}",
            request.id, request.venue_name, request.map_label, request.location_name
        );
        Ok(request)
    }

    /// Drop a request, releasing its uploaded photo if it has one
    pub async fn dismiss(&self, request_id: &str) -> Result<()> {
        let mut txn = self.store.begin().await?;

        let index = find(&txn.photo_requests, request_id)?;
        let request = txn.photo_requests.remove(index);
        txn.commit().await?;

        info!("Photo request {} dismissed", request_id);
        if let Some(photo) = request.uploaded_photo {
            release_all(self.releaser.clone(), vec![photo]).await;
        }
        Ok(())
    }

    /// Attach the request's photo to its location and remove the request
    ///
    /// Returns the updated location.
    pub async fn approve(&self, request_id: &str) -> Result<Location> {
        let mut txn = self.store.begin().await?;

        let index = find(&txn.photo_requests, request_id)?;
        let request = txn.photo_requests[index].clone();
        let temporary = match request.uploaded_photo.as_deref() {
            Some(path) if !path.is_empty() => path.to_string(),
            _ => {
                return Err(Error::InvalidState(format!(
                    "Photo request {} has no uploaded photo",
                    request_id
                )))
            }
        };
        txn.location(&request.venue_id, &request.map_id, &request.location_id)?;

        let permanent = match self.uploads.promote(&temporary).await {
            Ok(path) => path,
            Err(e) => {
                warn!(
                    "Could not move {} into permanent storage ({}), attaching it as-is",
                    temporary, e
                );
                temporary.clone()
            }
        };

        let location = txn.location_mut(&request.venue_id, &request.map_id, &request.location_id)?;
        let previous = std::mem::replace(&mut location.image, permanent.clone());
        let approved = location.clone();
        txn.photo_requests.remove(index);
        let released = txn.unreferenced(vec![previous]);
        txn.commit().await?;

        info!(
            "Photo request {} approved, location {} image set to {}",
            request_id, approved.id, permanent
        );
        release_all(self.releaser.clone(), released).await;
        Ok(approved)
    }
}

fn find(requests: &[PhotoRequest], request_id: &str) -> Result<usize> {
    requests
        .iter()
        .position(|r| r.id == request_id)
        .ok_or_else(|| Error::NotFound(format!("Photo request {} not found", request_id)))
}
