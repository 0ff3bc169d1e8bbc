use crate::config::{AppConfig, SourceMode};
use crate::extract::extract_item_id;
use crate::meli::{MeliClient, MeliError};
use crate::models::{Product, Shift};
use crate::render::{render_empty_catalog, render_package};
use crate::selector::select;
use crate::sources::{SourceError, load_urls};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Request orchestration: candidates in, promotional text out.
///
/// Per-item failures (bad URL, upstream error, malformed payload) drop the
/// candidate and the batch keeps going; only a broken URL source or an
/// unknown shift name aborts a request.
#[derive(Clone)]
pub struct Radar {
    pub config: Arc<AppConfig>,
    meli: MeliClient,
}

#[derive(Debug, Error)]
pub enum RadarError {
    #[error("turno inválido: {0}")]
    InvalidShift(String),
    #[error(transparent)]
    Source(#[from] SourceError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadarErrorKind {
    InvalidInput,
    Internal,
}

impl RadarError {
    pub fn kind(&self) -> RadarErrorKind {
        match self {
            RadarError::InvalidShift(_) => RadarErrorKind::InvalidInput,
            RadarError::Source(_) => RadarErrorKind::Internal,
        }
    }
}

impl Radar {
    pub fn new(config: AppConfig) -> Self {
        let meli = MeliClient::new(&config.meli_base_url, crate::http::build_client());
        Self {
            config: Arc::new(config),
            meli,
        }
    }

    /// Builds the plain-text package for one shift on one date.
    pub async fn build_package(
        &self,
        shift_raw: &str,
        today: NaiveDate,
    ) -> Result<String, RadarError> {
        let shift = Shift::parse(shift_raw)
            .ok_or_else(|| RadarError::InvalidShift(shift_raw.to_string()))?;

        let products = match self.config.source_mode {
            SourceMode::UrlList => self.load_from_urls().await?,
            SourceMode::Search => self.load_from_search().await,
        };

        Ok(assemble_package(
            products,
            shift,
            today,
            self.config.selection_policy,
        ))
    }

    /// URL-list mode: one extract + fetch per configured URL, in file order,
    /// skipping any candidate that fails along the way.
    async fn load_from_urls(&self) -> Result<Vec<Product>, RadarError> {
        let urls = load_urls(&self.config.urls_file, self.config.empty_urls_is_error)?;

        let mut outcomes = Vec::with_capacity(urls.len());
        for url in &urls {
            match extract_item_id(url) {
                Ok(item_id) => {
                    let fetched = self.meli.fetch_item(&item_id, url).await;
                    outcomes.push((item_id, fetched));
                }
                Err(err) => {
                    warn!(target = "radar.pipeline", url = %url, error = %err, "item_id_skip");
                    crate::metrics::item_skipped("extract");
                }
            }
        }
        Ok(usable_products(outcomes))
    }

    /// Search mode: one query per configured term; a failing term is skipped
    /// like a failing item. Results are filtered and deduplicated.
    async fn load_from_search(&self) -> Vec<Product> {
        let mut raw = Vec::new();
        for term in &self.config.search_terms {
            match self.meli.search(term, self.config.search_limit).await {
                Ok(results) => raw.extend(results),
                Err(err) => {
                    warn!(target = "radar.pipeline", term = %term, error = %err, "search_term_skip");
                    crate::metrics::item_skipped("search");
                }
            }
        }
        filter_search_results(raw, self.config.price_ceiling)
    }
}

/// Pure tail of the pipeline: rank, select, render.
pub fn assemble_package(
    mut products: Vec<Product>,
    shift: Shift,
    today: NaiveDate,
    policy: crate::selector::SelectionPolicy,
) -> String {
    if products.is_empty() {
        return render_empty_catalog(shift);
    }

    // most sold first; stable sort keeps source order among ties
    products.sort_by(|a, b| b.sold_count.cmp(&a.sold_count));

    let selected = select(&products, shift, today, policy);
    crate::metrics::package_rendered(shift.as_str(), selected.len());
    render_package(shift, &selected)
}

/// Search-mode inclusion rules: free shipping, a usable link, and an
/// optional price ceiling. First occurrence wins on duplicate item ids.
pub fn filter_search_results(results: Vec<Product>, price_ceiling: Option<f64>) -> Vec<Product> {
    let mut seen: HashSet<String> = HashSet::new();
    results
        .into_iter()
        .filter(|p| p.shipping_is_free)
        .filter(|p| !p.link.trim().is_empty())
        .filter(|p| price_ceiling.is_none_or(|ceiling| p.price <= ceiling))
        .filter(|p| p.item_id.is_empty() || seen.insert(p.item_id.clone()))
        .collect()
}

/// Collapses labeled per-item outcomes into the usable subset, logging the
/// losses. Availability over completeness: failures never abort the batch.
pub fn usable_products<E: std::fmt::Display>(
    outcomes: Vec<(String, Result<Product, E>)>,
) -> Vec<Product> {
    let mut products = Vec::with_capacity(outcomes.len());
    for (item_id, result) in outcomes {
        match result {
            Ok(product) => products.push(product),
            Err(err) => {
                warn!(target = "radar.pipeline", item_id = %item_id, error = %err, "item_fetch_skip");
                crate::metrics::item_skipped("fetch");
            }
        }
    }
    products
}
