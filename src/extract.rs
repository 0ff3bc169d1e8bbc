use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static ITEM_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"MLB\d+").expect("item id pattern"));

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no MLB item id found in url: {0}")]
    NoIdentifierFound(String),
}

/// Pulls the listing id out of a product URL.
///
/// Marketplace URLs often embed several MLB codes (category ids, tracking
/// parameters, the listing itself). Best-effort heuristic: the longest match
/// is the listing id, ties broken by first occurrence.
pub fn extract_item_id(url: &str) -> Result<String, ExtractError> {
    let mut best: Option<&str> = None;
    for found in ITEM_ID_PATTERN.find_iter(url) {
        let candidate = found.as_str();
        // strict comparison keeps the first occurrence on equal lengths
        if best.is_none_or(|current| candidate.len() > current.len()) {
            best = Some(candidate);
        }
    }
    best.map(|id| id.to_string())
        .ok_or_else(|| ExtractError::NoIdentifierFound(url.to_string()))
}
