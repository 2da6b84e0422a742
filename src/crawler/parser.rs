//! HTML parser for extracting page links and assets
//!
//! This module pulls raw `href`/`src` references out of a document:
//! - Navigable links from `<a>` tags
//! - Assets from stylesheet/icon `<link>` tags, `<script>` and `<img>` tags
//!
//! References are returned exactly as written in the markup; resolving them
//! is the URL module's job. The underlying HTML5 parser never fails, so
//! broken markup only ever yields fewer references.

use scraper::{ElementRef, Html, Selector};

/// `rel` values that make a `<link>` an asset
const ASSET_LINK_RELS: &[&str] = &["stylesheet", "icon", "shortcut icon", "apple-touch-icon"];

/// Which group of tags to extract references from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagClass {
    /// `<a href>`
    Anchor,
    /// `<link href>` (stylesheets and icons), `<script src>`, `<img src>`
    Asset,
}

/// What kind of asset a reference points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Stylesheet,
    Icon,
    Script,
    Image,
}

/// A raw asset reference tagged with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReference {
    pub kind: AssetKind,
    pub reference: String,
}

/// Extracted references from an HTML page, in document order
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// Asset references
    pub assets: Vec<AssetReference>,

    /// Anchor references
    pub links: Vec<String>,
}

/// The tags the extractor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Anchor,
    Link,
    Script,
    Image,
}

impl TagKind {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "a" => Some(Self::Anchor),
            "link" => Some(Self::Link),
            "script" => Some(Self::Script),
            "img" => Some(Self::Image),
            _ => None,
        }
    }
}

/// Parses HTML content and extracts both asset and anchor references
///
/// # Extraction Rules
///
/// - `<a>`: `href`, if present and non-empty
/// - `<link>`: `href`, only if `rel` is `stylesheet`, `icon`,
///   `shortcut icon` or `apple-touch-icon`, or `type` is `text/css`
/// - `<script>`: `src`, if present and non-empty
/// - `<img>`: `src`, if present and non-empty
///
/// Duplicates are preserved.
///
/// # Example
///
/// ```
/// use site_mirror::crawler::parse_html;
///
/// let html = r#"<link rel="stylesheet" href="s.css"><a href="/about">About</a>"#;
/// let parsed = parse_html(html);
/// assert_eq!(parsed.assets[0].reference, "s.css");
/// assert_eq!(parsed.links, vec!["/about".to_string()]);
/// ```
pub fn parse_html(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);
    let mut parsed = ParsedPage::default();

    let selector = match Selector::parse("a, link, script, img") {
        Ok(selector) => selector,
        Err(_) => return parsed,
    };

    for element in document.select(&selector) {
        let Some(kind) = TagKind::from_name(element.value().name()) else {
            continue;
        };

        match kind {
            TagKind::Anchor => {
                if let Some(href) = anchor_href(&element) {
                    parsed.links.push(href.to_string());
                }
            }
            TagKind::Link => {
                if let Some(asset) = link_asset(&element) {
                    parsed.assets.push(asset);
                }
            }
            TagKind::Script => {
                if let Some(src) = non_empty_attr(&element, "src") {
                    parsed.assets.push(AssetReference {
                        kind: AssetKind::Script,
                        reference: src.to_string(),
                    });
                }
            }
            TagKind::Image => {
                if let Some(src) = non_empty_attr(&element, "src") {
                    parsed.assets.push(AssetReference {
                        kind: AssetKind::Image,
                        reference: src.to_string(),
                    });
                }
            }
        }
    }

    tracing::trace!(
        "Extracted {} asset and {} anchor references",
        parsed.assets.len(),
        parsed.links.len()
    );

    parsed
}

/// Extracts the raw references for one tag class
pub fn extract_references(html: &str, class: TagClass) -> Vec<String> {
    let parsed = parse_html(html);
    match class {
        TagClass::Anchor => parsed.links,
        TagClass::Asset => parsed.assets.into_iter().map(|a| a.reference).collect(),
    }
}

fn non_empty_attr<'a>(element: &ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name).filter(|v| !v.trim().is_empty())
}

fn anchor_href<'a>(element: &ElementRef<'a>) -> Option<&'a str> {
    non_empty_attr(element, "href")
}

fn link_asset(element: &ElementRef<'_>) -> Option<AssetReference> {
    let href = non_empty_attr(element, "href")?;

    let rel = element
        .value()
        .attr("rel")
        .map(|r| r.trim().to_ascii_lowercase());
    let is_css_type = element
        .value()
        .attr("type")
        .is_some_and(|t| t.trim().eq_ignore_ascii_case("text/css"));

    let kind = match rel.as_deref() {
        Some("stylesheet") => AssetKind::Stylesheet,
        Some(r) if ASSET_LINK_RELS.contains(&r) => AssetKind::Icon,
        _ if is_css_type => AssetKind::Stylesheet,
        _ => return None,
    };

    Some(AssetReference {
        kind,
        reference: href.to_string(),
    })
}
