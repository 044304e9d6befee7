//! Catalog store: whole-document load and save
//!
//! The document is the unit of durability. Every logical operation runs as
//! load → edit → save inside a [`CatalogTransaction`], which holds the
//! store's mutex so two operations never interleave their read-modify-write.
//! Dropping a transaction without committing leaves the file untouched.

use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use super::model::Catalog;
use crate::{time, Result};

pub struct CatalogStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current document, or the empty document if none exists or it is unparsable
    pub async fn load(&self) -> Result<Catalog> {
        let _guard = self.lock.lock().await;
        self.read_document().await
    }

    /// Overwrite the persisted document
    pub async fn save(&self, catalog: &Catalog) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.write_document(catalog).await
    }

    /// Lock the store and load the document for editing
    pub async fn begin(&self) -> Result<CatalogTransaction<'_>> {
        let guard = self.lock.lock().await;
        let catalog = self.read_document().await?;
        Ok(CatalogTransaction {
            _guard: guard,
            store: self,
            catalog,
        })
    }

    async fn read_document(&self) -> Result<Catalog> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No catalog at {}, starting empty", self.path.display());
                return Ok(Catalog::default());
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice::<Catalog>(&bytes) {
            Ok(catalog) => Ok(catalog),
            Err(e) => {
                warn!(
                    "Catalog {} is unreadable ({}), treating as empty",
                    self.path.display(),
                    e
                );
                self.preserve_corrupt(&bytes).await;
                Ok(Catalog::default())
            }
        }
    }

    /// Keep a copy of an unparsable document before the next save replaces it
    async fn preserve_corrupt(&self, bytes: &[u8]) {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".corrupt-{}", time::upload_stamp()));
        let backup = PathBuf::from(name);

        match tokio::fs::write(&backup, bytes).await {
            Ok(()) => warn!("Saved unreadable catalog to {}", backup.display()),
            Err(e) => warn!("Could not save unreadable catalog copy: {}", e),
        }
    }

    /// Write to a sibling temp file, then rename over the document
    async fn write_document(&self, catalog: &Catalog) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_vec_pretty(catalog)?;
        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!("Saved catalog ({} bytes)", json.len());
        Ok(())
    }
}

/// An exclusive, loaded copy of the document
///
/// Derefs to [`Catalog`]. Changes reach disk only through [`commit`](Self::commit).
pub struct CatalogTransaction<'a> {
    _guard: MutexGuard<'a, ()>,
    store: &'a CatalogStore,
    catalog: Catalog,
}

impl CatalogTransaction<'_> {
    /// Save the edited document and release the lock
    pub async fn commit(self) -> Result<Catalog> {
        self.store.write_document(&self.catalog).await?;
        Ok(self.catalog)
    }
}

impl Deref for CatalogTransaction<'_> {
    type Target = Catalog;

    fn deref(&self) -> &Catalog {
        &self.catalog
    }
}

impl DerefMut for CatalogTransaction<'_> {
    fn deref_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }
}
