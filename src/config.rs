use crate::selector::SelectionPolicy;
use std::env;

/// Immutable process configuration, read from the environment once at
/// startup and passed explicitly to each component.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub urls_file: String,
    pub meli_base_url: String,
    pub source_mode: SourceMode,
    pub empty_urls_is_error: bool,
    pub selection_policy: SelectionPolicy,
    pub search_terms: Vec<String>,
    pub search_limit: u32,
    pub price_ceiling: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    /// Curated URL list in `urls_file`, one fetch per item.
    UrlList,
    /// Keyword search against the marketplace search endpoint.
    Search,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            urls_file: env::var("URLS_FILE").unwrap_or_else(|_| "urls.txt".to_string()),
            meli_base_url: env::var("MELI_BASE_URL")
                .unwrap_or_else(|_| "https://api.mercadolibre.com".to_string()),
            source_mode: source_mode_from_env(),
            empty_urls_is_error: parse_env_bool("EMPTY_URLS_IS_ERROR", true),
            selection_policy: SelectionPolicy::from_env(),
            search_terms: search_terms_from_env(),
            search_limit: env::var("SEARCH_LIMIT")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(20),
            price_ceiling: env::var("PRICE_CEILING")
                .ok()
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|v| *v > 0.0),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            urls_file: "urls.txt".to_string(),
            meli_base_url: "https://api.mercadolibre.com".to_string(),
            source_mode: SourceMode::UrlList,
            empty_urls_is_error: true,
            selection_policy: SelectionPolicy::Rotation,
            search_terms: Vec::new(),
            search_limit: 20,
            price_ceiling: None,
        }
    }
}

fn source_mode_from_env() -> SourceMode {
    match env::var("SOURCE_MODE") {
        Ok(value) if value.trim().eq_ignore_ascii_case("search") => SourceMode::Search,
        _ => SourceMode::UrlList,
    }
}

fn search_terms_from_env() -> Vec<String> {
    env::var("SEARCH_TERMS")
        .ok()
        .map(|v| {
            v.split(',')
                .map(|term| term.trim().to_string())
                .filter(|term| !term.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

pub fn parse_env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(
            value.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_original_service() {
        let config = AppConfig::default();
        assert_eq!(config.urls_file, "urls.txt");
        assert_eq!(config.source_mode, SourceMode::UrlList);
        assert!(config.empty_urls_is_error);
        assert_eq!(config.selection_policy, SelectionPolicy::Rotation);
    }
}
