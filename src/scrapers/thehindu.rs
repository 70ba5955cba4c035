//! The Hindu editorial scraper.
//!
//! Editorials are listed at <https://www.thehindu.com/opinion/editorial/>.
//! Headline links on that page wrap their text in `<strong>`, while bylines
//! and tag links do not, which is what separates them from the rest of the
//! section's anchors.
//!
//! # URL Pattern
//!
//! Articles resolve to absolute URLs like
//! `https://www.thehindu.com/opinion/editorial/some-slug/article69999999.ece`.
//!
//! # Body Extraction
//!
//! The article body sits in a `div` whose id is `content-body-<digits>`.
//! Extraction is two-stage: whole related/topic/tag/category/meta blocks are
//! dropped first, then every remaining paragraph is scored on its own
//! (breadcrumb slashes, link density).

use super::SiteAdapter;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument, warn};
use url::Url;

pub const LISTING_URL: &str = "https://www.thehindu.com/opinion/editorial/";

/// Path segment every editorial URL contains.
const SECTION_SEGMENT: &str = "opinion/editorial/";
/// Separates a specific article from the section index.
const ARTICLE_MARKER: &str = "/article";

pub const TITLE_PLACEHOLDER: &str = "Title not found";
pub const CONTENT_PLACEHOLDER: &str = "Article content could not be extracted.";

/// Paragraphs with more slashes than this are breadcrumbs or tag lists.
const MAX_SLASHES: usize = 2;
/// The link-density rule only applies above this many anchors.
const MAX_LINKS: usize = 2;
const MAX_LINK_TEXT_RATIO: f64 = 0.7;

static ANCHOR_WITH_HREF: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("static selector"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("static selector"));
static STRONG: Lazy<Selector> = Lazy::new(|| Selector::parse("strong").expect("static selector"));
static HEADING: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("static selector"));
static OG_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:title"]"#).expect("static selector"));
static CONTENT_DIV: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"div[id^="content-body-"]"#).expect("static selector"));
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("static selector"));

static CONTENT_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^content-body-\d+").expect("static regex"));
static BOILERPLATE_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(related|topic|tag|category|meta)").expect("static regex"));

/// Site adapter for The Hindu's editorial section.
#[derive(Debug, Clone)]
pub struct TheHindu {
    listing_url: String,
    base: Url,
}

impl TheHindu {
    /// Adapter for a listing page other than the public one, e.g. a mirror.
    /// Root-relative hrefs are resolved against this URL's origin.
    pub fn with_listing_url(listing_url: &str) -> Result<Self, url::ParseError> {
        let base = Url::parse(listing_url)?;
        Ok(Self {
            listing_url: listing_url.to_string(),
            base,
        })
    }

    fn normalize(&self, href: &str) -> Option<String> {
        if href.starts_with("http") {
            return Some(href.to_string());
        }
        self.base.join(href).ok().map(String::from)
    }

    fn is_headline_link(&self, anchor: &ElementRef, href: &str) -> bool {
        href.contains(SECTION_SEGMENT)
            && href != self.listing_url
            && href.contains(ARTICLE_MARKER)
            && anchor.select(&STRONG).next().is_some()
    }
}

impl Default for TheHindu {
    fn default() -> Self {
        Self {
            listing_url: LISTING_URL.to_string(),
            base: Url::parse(LISTING_URL).expect("static listing URL"),
        }
    }
}

impl SiteAdapter for TheHindu {
    fn name(&self) -> &str {
        "thehindu"
    }

    fn listing_url(&self) -> &str {
        &self.listing_url
    }

    #[instrument(level = "debug", skip_all, fields(max_count))]
    fn discover_links(&self, listing_html: &str, max_count: usize) -> Vec<String> {
        let document = Html::parse_document(listing_html);

        let links = document
            .select(&ANCHOR_WITH_HREF)
            .filter_map(|anchor| {
                let href = anchor.value().attr("href")?;
                self.is_headline_link(&anchor, href)
                    .then(|| self.normalize(href))
                    .flatten()
            })
            .unique()
            .take(max_count)
            .collect::<Vec<_>>();

        debug!(count = links.len(), urls = ?links, "Discovered editorial links");
        links
    }

    fn extract_title(&self, article_html: &str) -> String {
        let document = Html::parse_document(article_html);

        if let Some(h1) = document.select(&HEADING).next() {
            let title = h1.text().collect::<String>();
            let title = title.trim();
            if !title.is_empty() {
                return title.to_string();
            }
        }

        document
            .select(&OG_TITLE)
            .filter_map(|meta| meta.value().attr("content"))
            .map(str::trim)
            .find(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| TITLE_PLACEHOLDER.to_string())
    }

    fn extract_content(&self, article_html: &str) -> String {
        let document = Html::parse_document(article_html);

        let Some(container) = document.select(&CONTENT_DIV).find(|div| {
            div.value()
                .id()
                .is_some_and(|id| CONTENT_ID.is_match(id))
        }) else {
            warn!("Article body container not found");
            return CONTENT_PLACEHOLDER.to_string();
        };

        let paragraphs = container
            .select(&PARAGRAPH)
            .filter(|p| !inside_boilerplate(p, &container))
            .filter_map(|p| paragraph_text(&p))
            .collect::<Vec<_>>();

        debug!(paragraphs = paragraphs.len(), "Extracted article body");
        paragraphs.join("\n")
    }
}

/// True when a related/topic/tag/category/meta block sits between `p` and
/// the content container.
fn inside_boilerplate(p: &ElementRef, container: &ElementRef) -> bool {
    p.ancestors()
        .take_while(|node| node.id() != container.id())
        .filter_map(ElementRef::wrap)
        .any(|el| {
            matches!(el.value().name(), "div" | "section" | "aside")
                && el
                    .value()
                    .attr("class")
                    .is_some_and(|class| BOILERPLATE_CLASS.is_match(class))
        })
}

/// The trimmed paragraph text, or `None` when the paragraph is noise.
fn paragraph_text(p: &ElementRef) -> Option<String> {
    let text = p.text().collect::<String>();
    let text = text.trim();

    if text.is_empty() || text.matches('/').count() > MAX_SLASHES {
        return None;
    }

    let anchors = p.select(&ANCHOR).collect::<Vec<_>>();
    if anchors.len() > MAX_LINKS {
        let link_chars: usize = anchors
            .iter()
            .map(|a| a.text().collect::<String>().trim().chars().count())
            .sum();
        let total_chars = text.chars().count();
        if link_chars as f64 / total_chars as f64 > MAX_LINK_TEXT_RATIO {
            return None;
        }
    }

    Some(text.to_string())
}
