/// Query ranker: delegates relevance judgment to Gemini and reconciles the
/// model's answer with the local guide collection.
///
/// The public entry point is total. Any failure along the remote path, from
/// transport errors to unusable JSON, degrades to a local case-insensitive
/// keyword match so the caller always gets a result set.
use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use guide_common::gemini::{
    Content, GeminiClient, GenerateContentRequest, GenerationConfig,
};

use crate::error::AppError;
use crate::model::{Guide, SearchResult};

const FALLBACK_SCORE: f64 = 50.0;
const FALLBACK_REASONING: &str = "Keyword match fallback.";

const SYSTEM_INSTRUCTION: &str = "You are an intelligent librarian for a guide database. \
Your goal is to find the most relevant guides for a user's query. \
You must analyze the user's intent, even if they use vague terms, and match it to the available guides. \
Return a ranked list of relevant guides. \
For each match, provide a 'relevanceScore' (0-100) and a brief 'reasoning' (one sentence) explaining why it matches. \
Only return guides that are actually relevant. If none are relevant, return an empty array.";

/// One entry of the model's ranked answer. Every field is required; an entry
/// missing any of them fails deserialization, which sends the whole response
/// through the fallback path.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RankedEntry {
    id: String,
    relevance_score: f64,
    reasoning: String,
}

/// Reduced projection of a guide sent to the model, keeping the payload small.
#[derive(Debug, Serialize)]
struct GuideProjection<'a> {
    id: &'a str,
    title: &'a str,
    description: &'a str,
    category: &'a str,
    tags: String,
}

/// Rank guides against a natural-language query.
///
/// An empty or whitespace-only query returns an empty set without any remote
/// call; showing the full collection for a cleared search is the caller's
/// concern. Never fails: a broken remote path yields [`keyword_fallback`]
/// results instead.
pub async fn search_guides_with_ai(
    gemini: &GeminiClient,
    model: &str,
    query: &str,
    guides: &[Guide],
) -> Vec<SearchResult> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    match rank_with_model(gemini, model, query, guides).await {
        Ok(results) => {
            info!(query, matches = results.len(), "model ranking complete");
            results
        }
        Err(e) => {
            warn!(query, error = %e, "model ranking failed, using keyword fallback");
            keyword_fallback(query, guides)
        }
    }
}

async fn rank_with_model(
    gemini: &GeminiClient,
    model: &str,
    query: &str,
    guides: &[Guide],
) -> Result<Vec<SearchResult>, AppError> {
    let projections: Vec<GuideProjection> = guides
        .iter()
        .map(|g| GuideProjection {
            id: &g.id,
            title: &g.title,
            description: &g.description,
            category: &g.category,
            tags: g.tags.join(", "),
        })
        .collect();

    let prompt = format!(
        "User Query: \"{query}\"\n\nAvailable Guides (JSON):\n{}",
        serde_json::to_string(&projections)?
    );

    let request = GenerateContentRequest {
        contents: vec![Content::user(prompt)],
        system_instruction: Some(Content::text(SYSTEM_INSTRUCTION)),
        generation_config: Some(GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(ranked_entry_schema()),
            temperature: None,
        }),
    };

    let response = gemini.generate_content(model, request, None).await?;
    // An empty answer goes through the same fallback as any other failure.
    let text = response.text().ok_or(AppError::EmptyModelResponse)?;
    let entries: Vec<RankedEntry> = serde_json::from_str(&text)?;

    Ok(merge_ranked(entries, guides))
}

/// Structured-output constraint for the model: an array of objects with
/// required `id`, `relevanceScore`, and `reasoning`.
fn ranked_entry_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "id": { "type": "STRING" },
                "relevanceScore": { "type": "NUMBER" },
                "reasoning": { "type": "STRING" },
            },
            "required": ["id", "relevanceScore", "reasoning"],
        },
    })
}

/// Merge ranked entries back onto full guides.
///
/// Entries whose id matches no known guide are dropped, never fabricated.
/// The result is sorted by score descending; ties carry no guaranteed order.
fn merge_ranked(entries: Vec<RankedEntry>, guides: &[Guide]) -> Vec<SearchResult> {
    let total = entries.len();
    let mut results: Vec<SearchResult> = entries
        .into_iter()
        .filter_map(|entry| {
            let guide = guides.iter().find(|g| g.id == entry.id)?;
            Some(SearchResult {
                guide: guide.clone(),
                relevance_score: entry.relevance_score,
                reasoning: entry.reasoning,
            })
        })
        .collect();

    if results.len() < total {
        warn!(
            dropped = total - results.len(),
            "model returned unknown guide ids, dropping"
        );
    }

    results.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(Ordering::Equal)
    });
    results
}

/// Local case-insensitive substring match over title, description, and tags.
///
/// Matches are unranked: fixed score, natural collection order.
fn keyword_fallback(query: &str, guides: &[Guide]) -> Vec<SearchResult> {
    let needle = query.to_lowercase();
    guides
        .iter()
        .filter(|g| {
            g.title.to_lowercase().contains(&needle)
                || g.description.to_lowercase().contains(&needle)
                || g.tags.iter().any(|t| t.to_lowercase().contains(&needle))
        })
        .map(|g| SearchResult {
            guide: g.clone(),
            relevance_score: FALLBACK_SCORE,
            reasoning: FALLBACK_REASONING.to_string(),
        })
        .collect()
}
