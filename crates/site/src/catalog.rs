//! Service catalog loaded from markdown files.
//!
//! Each offering (consultation, class, programme) is a file under
//! `content/services/` with YAML frontmatter:
//!
//! ```markdown
//! ---
//! name: Yoga Class
//! price: 800
//! summary: A 60-minute small-group hatha session.
//! duration: 60 minutes
//! order: 2
//! ---
//! Longer description in markdown.
//! ```
//!
//! The file stem is the offering's slug. Everything is loaded once at startup.

use std::num::NonZeroU32;
use std::path::Path;
use std::sync::Arc;

use comrak::{Options, markdown_to_html};
use gray_matter::{Matter, ParsedEntity, engine::YAML};
use serde::Deserialize;

use prana_core::{CartLine, Rupees};

/// Frontmatter of an offering.
#[derive(Debug, Clone, Deserialize)]
pub struct OfferingMeta {
    pub name: String,
    pub price: Rupees,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub duration: Option<String>,
    /// Position in listings, lowest first.
    #[serde(default)]
    pub order: i32,
}

/// A bookable offering with its rendered description.
#[derive(Debug, Clone)]
pub struct Offering {
    pub slug: String,
    pub meta: OfferingMeta,
    pub content_html: String,
}

impl Offering {
    /// Snapshot this offering as a cart line.
    #[must_use]
    pub fn to_cart_line(&self, quantity: NonZeroU32) -> CartLine {
        CartLine {
            id: self.slug.clone(),
            name: self.meta.name.clone(),
            unit_price: self.meta.price,
            quantity,
        }
    }
}

/// All offerings, in listing order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    offerings: Arc<Vec<Offering>>,
}

impl Catalog {
    /// Load every `*.md` file in `dir`.
    ///
    /// A missing directory yields an empty catalog. Files that fail to parse
    /// are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be read.
    pub fn load(dir: &Path) -> Result<Self, CatalogError> {
        let mut offerings = Vec::new();

        if !dir.exists() {
            tracing::warn!("Services directory does not exist: {:?}", dir);
            return Ok(Self::default());
        }

        let entries = std::fs::read_dir(dir).map_err(|e| CatalogError::Io(e.to_string()))?;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "md") {
                match load_offering(&path) {
                    Ok(offering) => {
                        tracing::info!("Loaded offering: {}", offering.slug);
                        offerings.push(offering);
                    }
                    Err(e) => {
                        tracing::error!("Failed to load offering {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self::from_offerings(offerings))
    }

    /// Build a catalog from already parsed offerings.
    #[must_use]
    pub fn from_offerings(mut offerings: Vec<Offering>) -> Self {
        offerings.sort_by(|a, b| {
            a.meta
                .order
                .cmp(&b.meta.order)
                .then_with(|| a.meta.name.cmp(&b.meta.name))
        });
        Self {
            offerings: Arc::new(offerings),
        }
    }

    /// Get an offering by slug.
    #[must_use]
    pub fn get(&self, slug: &str) -> Option<&Offering> {
        self.offerings.iter().find(|o| o.slug == slug)
    }

    /// All offerings in listing order.
    pub fn all(&self) -> impl Iterator<Item = &Offering> {
        self.offerings.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offerings.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.offerings.len()
    }
}

fn load_offering(path: &Path) -> Result<Offering, CatalogError> {
    let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Io(e.to_string()))?;

    let slug = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| CatalogError::Parse("Invalid filename".to_string()))?;

    parse_offering(slug, &content)
}

/// Parse one offering file.
fn parse_offering(slug: &str, content: &str) -> Result<Offering, CatalogError> {
    let matter = Matter::<YAML>::new();
    let parsed: ParsedEntity<OfferingMeta> = matter
        .parse(content)
        .map_err(|e| CatalogError::Parse(format!("Failed to parse frontmatter: {e}")))?;
    let meta = parsed
        .data
        .ok_or_else(|| CatalogError::Parse("Missing frontmatter".to_string()))?;

    Ok(Offering {
        slug: slug.to_string(),
        meta,
        content_html: render_markdown(&parsed.content),
    })
}

/// Render markdown to HTML with the GFM extensions the service pages use.
fn render_markdown(content: &str) -> String {
    let mut options = Options::default();

    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;

    markdown_to_html(content, &options)
}

/// Catalog loading errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const YOGA: &str = "---\nname: Yoga Class\nprice: 800\nsummary: Hatha basics\norder: 2\n---\nBring a **mat**.\n";

    #[test]
    fn test_parse_offering() {
        let offering = parse_offering("yoga-class", YOGA).unwrap();
        assert_eq!(offering.meta.name, "Yoga Class");
        assert_eq!(offering.meta.price, Rupees::new(800));
        assert_eq!(offering.meta.duration, None);
        assert!(offering.content_html.contains("<strong>mat</strong>"));
    }

    #[test]
    fn test_parse_offering_without_frontmatter_fails() {
        assert!(parse_offering("plain", "Just text").is_err());
    }

    #[test]
    fn test_catalog_sorted_by_order_then_name() {
        let consult = parse_offering(
            "consultation",
            "---\nname: Nutrition Consultation\nprice: 1500\norder: 1\n---\n",
        )
        .unwrap();
        let yoga = parse_offering("yoga-class", YOGA).unwrap();
        let catalog = Catalog::from_offerings(vec![yoga, consult]);
        let slugs: Vec<_> = catalog.all().map(|o| o.slug.as_str()).collect();
        assert_eq!(slugs, vec!["consultation", "yoga-class"]);
    }

    #[test]
    fn test_to_cart_line_snapshots_price() {
        let offering = parse_offering("yoga-class", YOGA).unwrap();
        let line = offering.to_cart_line(NonZeroU32::new(3).unwrap());
        assert_eq!(line.id, "yoga-class");
        assert_eq!(line.line_total(), Rupees::new(2400));
    }

    #[test]
    fn test_bundled_services_load() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("content/services");
        let catalog = Catalog::load(&dir).unwrap();
        assert!(!catalog.is_empty());
        assert!(catalog.all().all(|o| o.meta.price > Rupees::ZERO));
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let catalog = Catalog::load(Path::new("/nonexistent/services")).unwrap();
        assert!(catalog.is_empty());
    }
}
