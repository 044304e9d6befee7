//! Static export: the catalog rendered as standalone HTML documents
//!
//! Rendering is a pure function of (document, template). Categories and
//! venues are emitted in document order and landing cards in their sorted
//! order, so identical inputs always produce byte-identical output.

pub mod category;
pub mod html;
pub mod landing;

use std::path::{Component, Path};

use tracing::{info, warn};

use crate::catalog::model::Catalog;
use crate::catalog::store::CatalogStore;
use crate::{Error, Result};

/// Replaced with the category's display name
pub const CATEGORY_NAME_PLACEHOLDER: &str = "{{CATEGORY_NAME}}";

/// Replaced with the assembled venue markup
pub const VENUES_CONTENT_PLACEHOLDER: &str = "{{VENUES_CONTENT}}";

/// Page name of the landing document; no category may take it as a slug
pub const LANDING_SLUG: &str = "index";

/// Filename of the landing document
pub const LANDING_FILENAME: &str = "index.html";

/// One generated document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedPage {
    pub filename: String,
    pub html: String,
}

/// Render every category page (skipping categories with no venues) and,
/// when the landing config has cards, the landing page
pub fn render_site(catalog: &Catalog, template: &str) -> Vec<ExportedPage> {
    let mut pages = Vec::new();

    for cat in &catalog.categories {
        let venues = category::venues_in(cat, &catalog.venues);
        if venues.is_empty() {
            continue;
        }
        pages.push(ExportedPage {
            filename: format!("{}.html", cat.slug),
            html: category::render_category_page(template, cat, &venues),
        });
    }

    if let Some(config) = &catalog.landing_page {
        if let Some(html) = landing::render_landing(config, &catalog.categories) {
            pages.push(ExportedPage {
                filename: LANDING_FILENAME.to_string(),
                html,
            });
        }
    }

    pages
}

/// Read the page template, failing with `TemplateMissing` if absent or blank
pub async fn load_template(path: &Path) -> Result<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(template) if !template.trim().is_empty() => Ok(template),
        Ok(_) => Err(Error::TemplateMissing(format!(
            "Template {} is empty",
            path.display()
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::TemplateMissing(
            format!("Template {} not found", path.display()),
        )),
        Err(e) => Err(e.into()),
    }
}

/// A filename that stays inside the output directory
fn is_plain_filename(filename: &str) -> bool {
    let mut components = Path::new(filename).components();
    matches!(components.next(), Some(Component::Normal(_))) && components.next().is_none()
}

/// Write pages into `dir`, returning the filenames written
///
/// Two pages with the same filename fail the whole export before anything
/// is written.
pub async fn write_pages(dir: &Path, pages: &[ExportedPage]) -> Result<Vec<String>> {
    for (i, page) in pages.iter().enumerate() {
        if pages[..i].iter().any(|p| p.filename == page.filename) {
            return Err(Error::Conflict(format!(
                "Two exported pages are both named {}",
                page.filename
            )));
        }
    }
    tokio::fs::create_dir_all(dir).await?;

    let mut written = Vec::with_capacity(pages.len());
    for page in pages {
        if !is_plain_filename(&page.filename) || page.filename.starts_with('.') {
            warn!("Skipping export with unsafe filename {:?}", page.filename);
            continue;
        }
        tokio::fs::write(dir.join(&page.filename), &page.html).await?;
        written.push(page.filename.clone());
    }
    Ok(written)
}

/// Load the current document and template, render, and write into `out_dir`
pub async fn export_site(store: &CatalogStore, template_path: &Path, out_dir: &Path) -> Result<Vec<String>> {
    let template = load_template(template_path).await?;
    let catalog = store.load().await?;

    let pages = render_site(&catalog, &template);
    let written = write_pages(out_dir, &pages).await?;

    info!("Exported {} pages to {}", written.len(), out_dir.display());
    Ok(written)
}
