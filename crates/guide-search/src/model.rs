use serde::{Deserialize, Serialize};

/// A single entry in the guide knowledge base.
///
/// Guides are created once per ingestion run and immutable afterwards; the
/// whole collection is replaced wholesale on the next ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guide {
    /// Stable identifier, unique within one loaded collection. Synthesized
    /// from the source row position, e.g. "guide-3".
    pub id: String,
    pub title: String,
    pub description: String,
    /// Free-text category label, e.g. "Billing".
    pub category: String,
    /// Resource locator; may be a "#" placeholder.
    pub url: String,
    /// Ordered tag list, may be empty.
    pub tags: Vec<String>,
}

/// A guide enriched with a relevance judgment for one specific query.
///
/// Never persisted; lives only as long as the displayed result set. The
/// embedded guide always comes from the collection that was searched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub guide: Guide,
    /// Relevance score, conventionally 0-100; higher is more relevant.
    pub relevance_score: f64,
    /// One-sentence explanation for the match. Empty when unranked.
    pub reasoning: String,
}
