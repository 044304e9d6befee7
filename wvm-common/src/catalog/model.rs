//! Catalog document model
//!
//! The whole catalog is one JSON document. Every record keeps the keys it
//! does not recognise in an `extra` side-map so they survive a load/save
//! round trip untouched.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map as JsonMap, Number, Value};
use std::fmt;

/// Caller-supplied entity fields (a JSON object)
pub type Payload = JsonMap<String, Value>;

/// Treat an explicit `null` the same as an absent key
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The persisted catalog document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default, deserialize_with = "nullable")]
    pub categories: Vec<Category>,

    #[serde(default, deserialize_with = "nullable")]
    pub venues: Vec<Venue>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub photo_requests: Vec<PhotoRequest>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landing_page: Option<LandingPageConfig>,

    #[serde(flatten)]
    pub extra: Payload,
}

/// Top-level grouping; one exported page per category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,

    #[serde(default, deserialize_with = "nullable")]
    pub name: String,

    /// Export filename stem, unique across categories
    #[serde(default, deserialize_with = "nullable")]
    pub slug: String,

    #[serde(flatten)]
    pub extra: Payload,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: String,

    #[serde(default, deserialize_with = "nullable")]
    pub name: String,

    /// Category ids this venue belongs to
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,

    /// Legacy single-category field, consulted only when `categories` is empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub maps: Vec<Map>,

    #[serde(flatten)]
    pub extra: Payload,
}

impl Venue {
    /// Effective category ids, applying the legacy scalar fallback
    pub fn category_ids(&self) -> Vec<&str> {
        if !self.categories.is_empty() {
            return self.categories.iter().map(String::as_str).collect();
        }
        match self.category.as_deref() {
            Some(id) if !id.is_empty() => vec![id],
            _ => Vec::new(),
        }
    }

    pub fn belongs_to(&self, category_id: &str) -> bool {
        self.category_ids().contains(&category_id)
    }

    /// Every non-empty image path referenced by this venue's maps and locations
    pub fn image_paths(&self) -> Vec<String> {
        self.maps.iter().flat_map(Map::image_paths).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Map {
    pub id: String,

    #[serde(default, deserialize_with = "nullable")]
    pub label: String,

    /// Stored image path, or empty
    #[serde(default, deserialize_with = "nullable")]
    pub image: String,

    #[serde(default, deserialize_with = "nullable")]
    pub locations: Vec<Location>,

    #[serde(flatten)]
    pub extra: Payload,
}

impl Map {
    /// The map's own image followed by its locations' images (non-empty only)
    pub fn image_paths(&self) -> Vec<String> {
        std::iter::once(&self.image)
            .chain(self.locations.iter().map(|loc| &loc.image))
            .filter(|path| !path.is_empty())
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,

    #[serde(default, deserialize_with = "nullable")]
    pub name: String,

    #[serde(default, deserialize_with = "nullable")]
    pub description: String,

    /// Free-text fiber annotation
    #[serde(default, deserialize_with = "nullable")]
    pub fiber: String,

    #[serde(default, deserialize_with = "nullable")]
    pub image: String,

    /// Display index shown on the marker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<i64>,

    /// Marker placement on the map image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,

    #[serde(flatten)]
    pub extra: Payload,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(default, deserialize_with = "nullable")]
    pub top: Offset,

    #[serde(default, deserialize_with = "nullable")]
    pub left: Offset,
}

/// A percentage offset, stored either as a bare number or as CSS text ("12.5%")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Offset {
    Percent(Number),
    Css(String),
}

impl Default for Offset {
    fn default() -> Self {
        Offset::Css("0%".to_string())
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Offset::Percent(n) => write!(f, "{}%", n),
            Offset::Css(s) => f.write_str(s),
        }
    }
}

/// Queue state of a photo request. Resolved requests leave the queue, so
/// only pending ones are ever persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Pending,
}

/// A visitor-submitted photo for a location, awaiting admin review
///
/// The display strings are captured at submission time and never refreshed,
/// so the request still reads correctly after renames or deletes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRequest {
    pub id: String,

    #[serde(default, deserialize_with = "nullable")]
    pub venue_id: String,

    #[serde(default, deserialize_with = "nullable")]
    pub map_id: String,

    #[serde(default, deserialize_with = "nullable")]
    pub location_id: String,

    #[serde(default, deserialize_with = "nullable")]
    pub location_name: String,

    #[serde(default, deserialize_with = "nullable")]
    pub venue_name: String,

    #[serde(default, deserialize_with = "nullable")]
    pub map_label: String,

    /// RFC 3339 submission time
    #[serde(default, deserialize_with = "nullable")]
    pub requested_at: String,

    #[serde(default)]
    pub status: RequestStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_photo: Option<String>,

    #[serde(flatten)]
    pub extra: Payload,
}

/// Landing page block (`landingPage` in the document)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandingPageConfig {
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,

    #[serde(default, deserialize_with = "nullable")]
    pub cards: Vec<Card>,

    #[serde(flatten)]
    pub extra: Payload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardKind {
    #[serde(alias = "category")]
    CategoryLink,
    #[serde(alias = "custom")]
    CustomLink,
}

/// One tile on the landing page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(rename = "type")]
    pub kind: CardKind,

    /// Hidden only when explicitly `false`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,

    /// Sort key, ascending
    #[serde(default, deserialize_with = "nullable")]
    pub order: i64,

    #[serde(default, deserialize_with = "nullable")]
    pub title: String,

    #[serde(default, deserialize_with = "nullable")]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Target of a category-link card
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,

    /// Target of a custom-link card
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(flatten)]
    pub extra: Payload,
}

impl Card {
    pub fn is_visible(&self) -> bool {
        self.visible != Some(false)
    }
}
