//! Create, update and delete for categories, venues, maps and locations
//!
//! Each call is one transaction on the [`CatalogStore`]. Image files that
//! drop out of the tree are released through the injected [`FileReleaser`]
//! only after the document is committed; release failures are logged and
//! never undo the data change.

use std::sync::Arc;

use tracing::info;

use super::merge::{from_payload, merge_update};
use super::model::{Catalog, Category, Location, Map, Payload, Venue};
use super::numbering::assign_number;
use super::store::CatalogStore;
use crate::export::LANDING_SLUG;
use crate::files::{release_all, FileReleaser};
use crate::{ids, Error, Result};

/// Keys an update or create payload may never set directly
const VENUE_PROTECTED: &[&str] = &["maps"];
const MAP_PROTECTED: &[&str] = &["locations"];

/// Derive a slug from display text: lowercase, non-alphanumeric runs become `-`
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Fill an empty slug from the name, then check it is usable as a page name
fn prepare_slug(category: &mut Category) -> Result<()> {
    if category.slug.trim().is_empty() {
        category.slug = slugify(&category.name);
    }
    if !is_valid_slug(&category.slug) {
        return Err(Error::InvalidInput(format!(
            "Category slug '{}' must be non-empty and use only letters, digits, '-' or '_'",
            category.slug
        )));
    }
    // The landing page owns index.html
    if category.slug.eq_ignore_ascii_case(LANDING_SLUG) {
        return Err(Error::Conflict(format!(
            "Category slug '{}' is reserved for the landing page",
            category.slug
        )));
    }
    Ok(())
}

fn slug_taken(slug: &str) -> Error {
    Error::Conflict(format!("Category slug '{}' is already in use", slug))
}

/// Prepare one category's slug and check it against the other categories
fn settle_slug(category: &mut Category, others: &[Category]) -> Result<()> {
    prepare_slug(category)?;
    if others
        .iter()
        .any(|c| c.id != category.id && c.slug == category.slug)
    {
        return Err(slug_taken(&category.slug));
    }
    Ok(())
}

/// Prepare every slug of a whole category list and require them distinct
fn settle_all_slugs(categories: &mut [Category]) -> Result<()> {
    for i in 0..categories.len() {
        let (settled, rest) = categories.split_at_mut(i);
        let category = &mut rest[0];
        prepare_slug(category)?;
        if settled.iter().any(|c| c.slug == category.slug) {
            return Err(slug_taken(&category.slug));
        }
    }
    Ok(())
}

/// Old image to release when an update swapped it for a different one
fn replaced_image(before: &str, after: &str) -> Vec<String> {
    if !before.is_empty() && before != after {
        vec![before.to_string()]
    } else {
        Vec::new()
    }
}

pub struct CatalogMutator {
    store: Arc<CatalogStore>,
    releaser: Arc<dyn FileReleaser>,
}

impl CatalogMutator {
    pub fn new(store: Arc<CatalogStore>, releaser: Arc<dyn FileReleaser>) -> Self {
        Self { store, releaser }
    }

    pub fn store(&self) -> &Arc<CatalogStore> {
        &self.store
    }

    async fn release(&self, paths: Vec<String>) {
        release_all(self.releaser.clone(), paths).await;
    }

    // ------------------------------------------------------------------
    // Whole document
    // ------------------------------------------------------------------

    /// Persist a caller-supplied document wholesale
    ///
    /// Category slugs get the same checks as single-category edits. Images
    /// referenced by the old tree but not the new one are released.
    pub async fn replace_document(&self, mut catalog: Catalog) -> Result<Catalog> {
        settle_all_slugs(&mut catalog.categories)?;

        let mut txn = self.store.begin().await?;
        let dropped = catalog.unreferenced(txn.image_paths());

        *txn = catalog;
        let saved = txn.commit().await?;

        info!("Replaced catalog document ({} images dropped)", dropped.len());
        self.release(dropped).await;
        Ok(saved)
    }

    // ------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------

    pub async fn create_category(&self, payload: &Payload) -> Result<Category> {
        let mut txn = self.store.begin().await?;

        let mut category: Category = from_payload(payload, &ids::generate(), &[])?;
        settle_slug(&mut category, &txn.categories)?;
        txn.categories.push(category.clone());
        txn.commit().await?;

        info!("Created category {} ({})", category.id, category.slug);
        Ok(category)
    }

    pub async fn update_category(&self, category_id: &str, payload: &Payload) -> Result<Category> {
        let mut txn = self.store.begin().await?;

        let mut updated = merge_update(txn.category(category_id)?, payload, &[])?;
        settle_slug(&mut updated, &txn.categories)?;
        *txn.category_mut(category_id)? = updated.clone();
        txn.commit().await?;

        info!("Updated category {}", category_id);
        Ok(updated)
    }

    /// Remove a category and every venue's reference to it
    pub async fn delete_category(&self, category_id: &str) -> Result<()> {
        let mut txn = self.store.begin().await?;

        txn.category(category_id)?;
        txn.categories.retain(|c| c.id != category_id);
        for venue in txn.venues.iter_mut() {
            venue.categories.retain(|id| id != category_id);
            if venue.category.as_deref() == Some(category_id) {
                venue.category = None;
            }
        }
        txn.commit().await?;

        info!("Deleted category {}", category_id);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Venues
    // ------------------------------------------------------------------

    pub async fn create_venue(&self, payload: &Payload) -> Result<Venue> {
        let mut txn = self.store.begin().await?;

        let venue: Venue = from_payload(payload, &ids::generate(), VENUE_PROTECTED)?;
        txn.venues.push(venue.clone());
        txn.commit().await?;

        info!("Created venue {} ({})", venue.id, venue.name);
        Ok(venue)
    }

    pub async fn update_venue(&self, venue_id: &str, payload: &Payload) -> Result<Venue> {
        let mut txn = self.store.begin().await?;

        let updated = merge_update(txn.venue(venue_id)?, payload, VENUE_PROTECTED)?;
        *txn.venue_mut(venue_id)? = updated.clone();
        txn.commit().await?;

        info!("Updated venue {}", venue_id);
        Ok(updated)
    }

    /// Remove a venue with all its maps and locations, releasing their images
    pub async fn delete_venue(&self, venue_id: &str) -> Result<()> {
        let mut txn = self.store.begin().await?;

        let images = txn.venue(venue_id)?.image_paths();
        txn.venues.retain(|v| v.id != venue_id);
        let images = txn.unreferenced(images);
        txn.commit().await?;

        info!("Deleted venue {} ({} images)", venue_id, images.len());
        self.release(images).await;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Maps
    // ------------------------------------------------------------------

    pub async fn create_map(&self, venue_id: &str, payload: &Payload) -> Result<Map> {
        let mut txn = self.store.begin().await?;

        let map: Map = from_payload(payload, &ids::generate(), MAP_PROTECTED)?;
        txn.venue_mut(venue_id)?.maps.push(map.clone());
        txn.commit().await?;

        info!("Created map {} in venue {}", map.id, venue_id);
        Ok(map)
    }

    pub async fn update_map(&self, venue_id: &str, map_id: &str, payload: &Payload) -> Result<Map> {
        let mut txn = self.store.begin().await?;

        let current = txn.map_mut(venue_id, map_id)?;
        let updated: Map = merge_update(&*current, payload, MAP_PROTECTED)?;
        let replaced = replaced_image(&current.image, &updated.image);
        *current = updated.clone();
        let replaced = txn.unreferenced(replaced);
        txn.commit().await?;

        info!("Updated map {} in venue {}", map_id, venue_id);
        self.release(replaced).await;
        Ok(updated)
    }

    /// Remove a map with its locations, releasing their images
    pub async fn delete_map(&self, venue_id: &str, map_id: &str) -> Result<()> {
        let mut txn = self.store.begin().await?;

        let images = txn.map(venue_id, map_id)?.image_paths();
        txn.venue_mut(venue_id)?.maps.retain(|m| m.id != map_id);
        let images = txn.unreferenced(images);
        txn.commit().await?;

        info!("Deleted map {} from venue {} ({} images)", map_id, venue_id, images.len());
        self.release(images).await;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Locations
    // ------------------------------------------------------------------

    /// Add a location, numbering it after its siblings when no number is given
    pub async fn create_location(
        &self,
        venue_id: &str,
        map_id: &str,
        payload: &Payload,
    ) -> Result<Location> {
        let mut txn = self.store.begin().await?;

        let mut location: Location = from_payload(payload, &ids::generate(), &[])?;
        let map = txn.map_mut(venue_id, map_id)?;
        location.number = Some(assign_number(&map.locations, location.number)?);
        map.locations.push(location.clone());
        txn.commit().await?;

        info!(
            "Created location {} (#{}) in map {}",
            location.id,
            location.number.unwrap_or_default(),
            map_id
        );
        Ok(location)
    }

    pub async fn update_location(
        &self,
        venue_id: &str,
        map_id: &str,
        location_id: &str,
        payload: &Payload,
    ) -> Result<Location> {
        let mut txn = self.store.begin().await?;

        let current = txn.location_mut(venue_id, map_id, location_id)?;
        let updated: Location = merge_update(&*current, payload, &[])?;
        let replaced = replaced_image(&current.image, &updated.image);
        *current = updated.clone();
        let replaced = txn.unreferenced(replaced);
        txn.commit().await?;

        info!("Updated location {} in map {}", location_id, map_id);
        self.release(replaced).await;
        Ok(updated)
    }

    pub async fn delete_location(&self, venue_id: &str, map_id: &str, location_id: &str) -> Result<()> {
        let mut txn = self.store.begin().await?;

        let image = txn.location(venue_id, map_id, location_id)?.image.clone();
        txn.map_mut(venue_id, map_id)?
            .locations
            .retain(|l| l.id != location_id);
        let images = txn.unreferenced(vec![image]);
        txn.commit().await?;

        info!("Deleted location {} from map {}", location_id, map_id);
        self.release(images).await;
        Ok(())
    }
}
