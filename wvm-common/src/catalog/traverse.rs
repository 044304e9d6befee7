//! Owning-path lookups over the catalog tree
//!
//! Each lookup returns the record (or a mutable handle to replace it in
//! place) and reports a miss as `Error::NotFound` naming the scope that
//! failed to resolve.

use super::model::{Catalog, Category, Location, Map, Venue};
use crate::{Error, Result};

fn venue_not_found(venue_id: &str) -> Error {
    Error::NotFound(format!("Venue {} not found", venue_id))
}

fn map_not_found(venue_id: &str, map_id: &str) -> Error {
    Error::NotFound(format!("Map {} not found in venue {}", map_id, venue_id))
}

fn location_not_found(map_id: &str, location_id: &str) -> Error {
    Error::NotFound(format!("Location {} not found in map {}", location_id, map_id))
}

impl Catalog {
    pub fn category(&self, category_id: &str) -> Result<&Category> {
        self.categories
            .iter()
            .find(|c| c.id == category_id)
            .ok_or_else(|| Error::NotFound(format!("Category {} not found", category_id)))
    }

    pub fn category_mut(&mut self, category_id: &str) -> Result<&mut Category> {
        self.categories
            .iter_mut()
            .find(|c| c.id == category_id)
            .ok_or_else(|| Error::NotFound(format!("Category {} not found", category_id)))
    }

    pub fn venue(&self, venue_id: &str) -> Result<&Venue> {
        self.venues
            .iter()
            .find(|v| v.id == venue_id)
            .ok_or_else(|| venue_not_found(venue_id))
    }

    pub fn venue_mut(&mut self, venue_id: &str) -> Result<&mut Venue> {
        self.venues
            .iter_mut()
            .find(|v| v.id == venue_id)
            .ok_or_else(|| venue_not_found(venue_id))
    }

    pub fn map(&self, venue_id: &str, map_id: &str) -> Result<&Map> {
        self.venue(venue_id)?
            .maps
            .iter()
            .find(|m| m.id == map_id)
            .ok_or_else(|| map_not_found(venue_id, map_id))
    }

    pub fn map_mut(&mut self, venue_id: &str, map_id: &str) -> Result<&mut Map> {
        self.venue_mut(venue_id)?
            .maps
            .iter_mut()
            .find(|m| m.id == map_id)
            .ok_or_else(|| map_not_found(venue_id, map_id))
    }

    pub fn location(&self, venue_id: &str, map_id: &str, location_id: &str) -> Result<&Location> {
        self.map(venue_id, map_id)?
            .locations
            .iter()
            .find(|l| l.id == location_id)
            .ok_or_else(|| location_not_found(map_id, location_id))
    }

    pub fn location_mut(
        &mut self,
        venue_id: &str,
        map_id: &str,
        location_id: &str,
    ) -> Result<&mut Location> {
        self.map_mut(venue_id, map_id)?
            .locations
            .iter_mut()
            .find(|l| l.id == location_id)
            .ok_or_else(|| location_not_found(map_id, location_id))
    }

    /// Every non-empty image path referenced anywhere in the tree
    pub fn image_paths(&self) -> Vec<String> {
        self.venues.iter().flat_map(Venue::image_paths).collect()
    }

    /// The given paths that nothing in the tree still points at
    pub fn unreferenced(&self, paths: Vec<String>) -> Vec<String> {
        let in_use = self.image_paths();
        paths
            .into_iter()
            .filter(|path| !in_use.contains(path))
            .collect()
    }
}
