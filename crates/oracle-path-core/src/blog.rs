//! Blog post types and FAQ extraction.
//!
//! Author-submitted post content may carry one embedded FAQ marker block:
//!
//! ```html
//! <script type="application/json" id="faq-data">{"faqs": [...]}</script>
//! ```
//!
//! Ingestion extracts the JSON payload into structured [`FaqSection`]s and
//! strips the block from the stored content. A malformed payload is never
//! fatal: the post is stored without FAQ data and the content, marker block
//! included, passes through byte-identical so admin content is never
//! destroyed by a parse failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::PostId;

/// Tag signature identifying the FAQ marker block.
const FAQ_MARKER_ID: &str = "id=\"faq-data\"";

/// Placeholder for a section missing its title.
const UNTITLED_SECTION: &str = "Untitled Section";

/// Placeholder for an item missing its question.
const MISSING_QUESTION: &str = "Question unavailable";

/// Placeholder for an item missing its answer.
const MISSING_ANSWER: &str = "Answer unavailable";

/// A published or draft blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    /// Unique, time-ordered identifier.
    pub id: PostId,

    /// Post title.
    pub title: String,

    /// URL-safe slug, unique among published posts.
    pub slug: String,

    /// Post body HTML, with the FAQ marker block removed if one was
    /// successfully extracted.
    pub content: String,

    /// Short summary for listings.
    pub excerpt: String,

    /// Author display name.
    pub author: String,

    /// Whether the post is publicly visible.
    pub published: bool,

    /// SEO title override.
    pub seo_title: String,

    /// SEO meta description.
    pub seo_description: String,

    /// SEO keywords, ordered.
    pub seo_keywords: Vec<String>,

    /// Structured FAQ sections extracted from the content, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faqs: Option<Vec<FaqSection>>,

    /// When the post was created.
    pub created_at: DateTime<Utc>,

    /// When the post was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A titled group of FAQ entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqSection {
    /// Section heading.
    pub title: String,

    /// Question/answer pairs, ordered.
    pub items: Vec<FaqItem>,
}

/// A single question/answer pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqItem {
    /// The question.
    pub question: String,

    /// The answer.
    pub answer: String,
}

/// Result of running FAQ extraction over post content.
#[derive(Debug, Clone)]
pub struct IngestedContent {
    /// Content to store: marker block removed on success, otherwise the
    /// input unchanged.
    pub content: String,

    /// Extracted FAQ sections, when a well-formed marker block was present.
    pub faqs: Option<Vec<FaqSection>>,

    /// Parse failure detail when a marker block was present but malformed.
    /// The caller is expected to log this; ingestion itself never fails.
    pub parse_error: Option<String>,
}

/// Raw FAQ payload as embedded by authors; every field is optional so a
/// sloppy payload coerces to displayable defaults instead of being rejected.
#[derive(Debug, Deserialize)]
struct RawFaqPayload {
    #[serde(default)]
    faqs: Vec<RawFaqSection>,
}

#[derive(Debug, Deserialize)]
struct RawFaqSection {
    title: Option<String>,
    #[serde(default)]
    items: Vec<RawFaqItem>,
}

#[derive(Debug, Deserialize)]
struct RawFaqItem {
    question: Option<String>,
    answer: Option<String>,
}

/// Extract the FAQ marker block from post content.
///
/// Returns the content to store together with any extracted FAQ data. See
/// the module docs for the fallback behavior on malformed payloads.
#[must_use]
pub fn extract_faqs(content: &str) -> IngestedContent {
    let Some(block) = locate_marker_block(content) else {
        return IngestedContent {
            content: content.to_string(),
            faqs: None,
            parse_error: None,
        };
    };

    let payload: RawFaqPayload = match serde_json::from_str(block.json) {
        Ok(payload) => payload,
        Err(e) => {
            // Leave the malformed block in place rather than destroy it.
            return IngestedContent {
                content: content.to_string(),
                faqs: None,
                parse_error: Some(e.to_string()),
            };
        }
    };

    let faqs: Vec<FaqSection> = payload.faqs.into_iter().map(normalize_section).collect();

    let mut cleaned = String::with_capacity(content.len() - (block.end - block.start));
    cleaned.push_str(&content[..block.start]);
    cleaned.push_str(&content[block.end..]);

    IngestedContent {
        content: cleaned,
        faqs: Some(faqs),
        parse_error: None,
    }
}

/// The located marker block: byte range within the content plus the enclosed
/// JSON payload.
struct MarkerBlock<'a> {
    start: usize,
    end: usize,
    json: &'a str,
}

fn locate_marker_block(content: &str) -> Option<MarkerBlock<'_>> {
    let id_pos = content.find(FAQ_MARKER_ID)?;

    // The id attribute must sit inside an opening <script ...> tag.
    let start = content[..id_pos].rfind("<script")?;
    let open_end = start + content[start..].find('>')?;
    if open_end < id_pos {
        return None;
    }

    let body_start = open_end + 1;
    let close_rel = content[body_start..].find("</script>")?;
    let body_end = body_start + close_rel;
    let end = body_end + "</script>".len();

    Some(MarkerBlock {
        start,
        end,
        json: content[body_start..body_end].trim(),
    })
}

fn normalize_section(raw: RawFaqSection) -> FaqSection {
    FaqSection {
        title: raw
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| UNTITLED_SECTION.to_string()),
        items: raw.items.into_iter().map(normalize_item).collect(),
    }
}

fn normalize_item(raw: RawFaqItem) -> FaqItem {
    FaqItem {
        question: raw
            .question
            .filter(|q| !q.trim().is_empty())
            .unwrap_or_else(|| MISSING_QUESTION.to_string()),
        answer: raw
            .answer
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| MISSING_ANSWER.to_string()),
    }
}
