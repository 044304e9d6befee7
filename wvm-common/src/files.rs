//! Upload area: stored images and their release
//!
//! Image paths in the catalog are relative strings such as
//! `uploads/maps/map-20240101120000-1a2b3c4d.png`. Nothing outside the
//! `uploads/` tree of the root folder is ever written, moved or deleted.

use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::config::{MAP_UPLOAD_DIR, PHOTO_REQUEST_UPLOAD_DIR, UPLOAD_DIR};
use crate::{ids, time, Error, Result};

/// Extensions accepted for uploaded images (lowercase)
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];

/// Largest accepted upload
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Best-effort removal of a stored image, injected wherever tree edits
/// drop image references
///
/// Implementations may block; [`release_all`] calls them off the async
/// runtime.
pub trait FileReleaser: Send + Sync {
    fn release(&self, path: &str) -> Result<()>;
}

/// Release each non-empty path once, logging (never returning) failures
pub async fn release_all(releaser: Arc<dyn FileReleaser>, paths: Vec<String>) {
    let mut unique: Vec<String> = Vec::new();
    for path in paths {
        if !path.is_empty() && !unique.contains(&path) {
            unique.push(path);
        }
    }
    if unique.is_empty() {
        return;
    }

    let outcome = tokio::task::spawn_blocking(move || {
        for path in &unique {
            match releaser.release(path) {
                Ok(()) => debug!("Released {}", path),
                Err(e) => warn!("Failed to release {}: {}", path, e),
            }
        }
    })
    .await;
    if let Err(e) = outcome {
        warn!("Image release task failed: {}", e);
    }
}

/// Releaser that only records what it was asked to release
#[derive(Debug, Default)]
pub struct RecordingReleaser {
    released: Mutex<Vec<String>>,
}

impl RecordingReleaser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn released(&self) -> Vec<String> {
        self.released
            .lock()
            .map(|paths| paths.clone())
            .unwrap_or_default()
    }
}

impl FileReleaser for RecordingReleaser {
    fn release(&self, path: &str) -> Result<()> {
        let mut paths = self
            .released
            .lock()
            .map_err(|_| Error::Internal("release log poisoned".to_string()))?;
        paths.push(path.to_string());
        Ok(())
    }
}

/// What an upload is for; decides its sub-area and filename prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Location,
    Map,
    PhotoRequest,
}

impl UploadKind {
    fn prefix(self) -> &'static str {
        match self {
            UploadKind::Location => "location",
            UploadKind::Map => "map",
            UploadKind::PhotoRequest => "request",
        }
    }

    /// Relative directory, always starting with `uploads`
    fn dir(self) -> String {
        match self {
            UploadKind::Location => UPLOAD_DIR.to_string(),
            UploadKind::Map => format!("{}/{}", UPLOAD_DIR, MAP_UPLOAD_DIR),
            UploadKind::PhotoRequest => format!("{}/{}", UPLOAD_DIR, PHOTO_REQUEST_UPLOAD_DIR),
        }
    }
}

/// Lowercased extension of `filename` if it is an accepted image type
pub fn allowed_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Stored filename: `<prefix>-<YYYYmmddHHMMSS>-<8 hex>.<ext>`
fn stored_name(kind: UploadKind, ext: &str) -> String {
    format!("{}-{}-{}.{}", kind.prefix(), time::upload_stamp(), ids::random_hex(4), ext)
}

/// The `uploads/` tree under one root folder
#[derive(Debug, Clone)]
pub struct UploadArea {
    root: PathBuf,
}

impl UploadArea {
    /// `root` is the root folder that contains `uploads/`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a stored relative path to disk, refusing anything outside `uploads/`
    pub fn resolve(&self, relative: &str) -> Result<PathBuf> {
        let path = Path::new(relative);
        let mut components = path.components();

        let rooted = matches!(components.next(), Some(Component::Normal(first)) if first == UPLOAD_DIR);
        let clean = components.clone().all(|c| matches!(c, Component::Normal(_)));
        if !rooted || !clean || components.next().is_none() {
            return Err(Error::InvalidInput(format!(
                "Path {} is outside the upload area",
                relative
            )));
        }

        Ok(self.root.join(path))
    }

    /// Whether `relative` lies in the photo-request sub-area
    pub fn is_photo_request_path(relative: &str) -> bool {
        relative.starts_with(&format!("{}/", UploadKind::PhotoRequest.dir()))
    }

    /// Persist received bytes and return the stored relative path
    pub async fn store(&self, kind: UploadKind, original_name: &str, bytes: &[u8]) -> Result<String> {
        if original_name.trim().is_empty() {
            return Err(Error::InvalidInput("No file selected".to_string()));
        }
        let ext = allowed_extension(original_name)
            .ok_or_else(|| Error::InvalidInput("File type not allowed".to_string()))?;
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(Error::InvalidInput(
                "File too large. Maximum size is 5MB.".to_string(),
            ));
        }

        let relative = format!("{}/{}", kind.dir(), stored_name(kind, &ext));
        let target = self.resolve(&relative)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, bytes).await?;

        debug!("Stored upload {} ({} bytes)", relative, bytes.len());
        Ok(relative)
    }

    /// Move a photo-request upload into permanent location-image storage
    ///
    /// Returns the fresh permanent relative path.
    pub async fn promote(&self, temporary: &str) -> Result<String> {
        let source = self.resolve(temporary)?;
        let is_file = tokio::fs::metadata(&source)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false);
        if !is_file {
            return Err(Error::NotFound(format!("Upload {} does not exist", temporary)));
        }

        let ext = allowed_extension(temporary).unwrap_or_else(|| "jpg".to_string());
        let relative = format!(
            "{}/{}",
            UploadKind::Location.dir(),
            stored_name(UploadKind::Location, &ext)
        );
        let target = self.resolve(&relative)?;
        tokio::fs::rename(&source, &target).await?;

        debug!("Promoted {} to {}", temporary, relative);
        Ok(relative)
    }
}

/// Blocking removal; run through [`release_all`]
impl FileReleaser for UploadArea {
    fn release(&self, path: &str) -> Result<()> {
        let target = self.resolve(path)?;
        std::fs::remove_file(target)?;
        Ok(())
    }
}
