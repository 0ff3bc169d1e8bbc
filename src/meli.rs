use crate::models::Product;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum MeliError {
    #[error("item request failed: {0}")]
    Request(String),
    #[error("upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid upstream payload: {0}")]
    Deserialize(String),
}

/// Thin client for the public Mercado Livre item and search endpoints.
/// The only component that touches the network.
#[derive(Debug, Clone)]
pub struct MeliClient {
    base_url: String,
    http: Client,
}

/// Upstream item payload. Every field the service cares about is optional
/// on the wire; absence is tolerated through defaults at this boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemDetail {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default)]
    pub sold_quantity: Option<i64>,
    #[serde(default)]
    pub deal_ids: Vec<String>,
    #[serde(default)]
    pub shipping: Option<ShippingInfo>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ShippingInfo {
    #[serde(default)]
    pub free_shipping: bool,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<ItemDetail>,
}

impl ItemDetail {
    /// Collapses the optional wire fields into a usable Product.
    /// `source_url` backs the link when the API omits a permalink.
    pub fn into_product(self, item_id: &str, source_url: &str) -> Product {
        let name = self
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| Product::fallback_name(item_id));
        let sold_count = self.sold_quantity.unwrap_or(0).max(0) as u64;
        let price = self.price.unwrap_or(0.0).max(0.0);
        let original_price = self.original_price.filter(|op| *op > price);
        let link = self
            .permalink
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| source_url.to_string());
        Product {
            name,
            price,
            original_price,
            link,
            sold_count,
            coupon: self.deal_ids.into_iter().find(|d| !d.trim().is_empty()),
            item_id: item_id.to_string(),
            shipping_is_free: self.shipping.map(|s| s.free_shipping).unwrap_or(false),
            score: sold_count,
        }
    }
}

impl MeliClient {
    pub fn new(base_url: &str, http: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    /// Fetches one item's details. One bounded retry on transport errors;
    /// HTTP error statuses are final (the caller skips the item either way).
    pub async fn fetch_item(&self, item_id: &str, source_url: &str) -> Result<Product, MeliError> {
        let url = format!("{}/items/{}", self.base_url, item_id);
        let detail = match self.get_item(&url).await {
            Ok(detail) => detail,
            Err(MeliError::Request(first)) => {
                warn!(
                    target = "radar.meli",
                    item_id = %item_id,
                    error = %first,
                    "item_fetch_retry"
                );
                self.get_item(&url).await?
            }
            Err(err) => return Err(err),
        };
        Ok(detail.into_product(item_id, source_url))
    }

    async fn get_item(&self, url: &str) -> Result<ItemDetail, MeliError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| MeliError::Request(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MeliError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<ItemDetail>()
            .await
            .map_err(|err| MeliError::Deserialize(err.to_string()))
    }

    /// Keyword search, sorted by sales upstream. Results are mapped like
    /// item details; filtering happens in the pipeline.
    pub async fn search(&self, term: &str, limit: u32) -> Result<Vec<Product>, MeliError> {
        let url = format!("{}/sites/MLB/search", self.base_url);
        let response = self
            .http
            .get(url)
            .query(&[
                ("q", term),
                ("limit", &limit.to_string()),
                ("sort", "sold_quantity_desc"),
            ])
            .send()
            .await
            .map_err(|err| MeliError::Request(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MeliError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: SearchResponse = response
            .json()
            .await
            .map_err(|err| MeliError::Deserialize(err.to_string()))?;

        Ok(payload
            .results
            .into_iter()
            .map(|detail| {
                let item_id = detail.id.clone().unwrap_or_default();
                let source_url = detail.permalink.clone().unwrap_or_default();
                detail.into_product(&item_id, &source_url)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detail_from(value: serde_json::Value) -> ItemDetail {
        serde_json::from_value(value).expect("item detail")
    }

    #[test]
    fn maps_full_payload() {
        let detail = detail_from(json!({
            "id": "MLB123",
            "title": "Fone Bluetooth",
            "price": 99.9,
            "original_price": 150.0,
            "permalink": "https://produto.mercadolivre.com.br/MLB123",
            "sold_quantity": 512,
            "deal_ids": ["MLB779366-1"],
            "shipping": {"free_shipping": true}
        }));
        let product = detail.into_product("MLB123", "https://src.example/MLB123");
        assert_eq!(product.name, "Fone Bluetooth");
        assert_eq!(product.price, 99.9);
        assert_eq!(product.original_price, Some(150.0));
        assert_eq!(product.link, "https://produto.mercadolivre.com.br/MLB123");
        assert_eq!(product.sold_count, 512);
        assert_eq!(product.coupon.as_deref(), Some("MLB779366-1"));
        assert!(product.shipping_is_free);
        assert_eq!(product.score, 512);
    }

    #[test]
    fn defaults_missing_fields() {
        let detail = detail_from(json!({}));
        let product = detail.into_product("MLB9", "https://src.example/MLB9");
        assert_eq!(product.name, "Produto MLB9");
        assert_eq!(product.price, 0.0);
        assert_eq!(product.original_price, None);
        assert_eq!(product.link, "https://src.example/MLB9");
        assert_eq!(product.sold_count, 0);
        assert_eq!(product.coupon, None);
        assert!(!product.shipping_is_free);
    }

    #[test]
    fn original_price_kept_only_when_above_price() {
        let detail = detail_from(json!({"price": 100.0, "original_price": 100.0}));
        let product = detail.into_product("MLB1", "u");
        assert_eq!(product.original_price, None);

        let detail = detail_from(json!({"price": 100.0, "original_price": 120.0}));
        let product = detail.into_product("MLB1", "u");
        assert_eq!(product.original_price, Some(120.0));
    }

    #[test]
    fn negative_sold_quantity_clamps_to_zero() {
        let detail = detail_from(json!({"sold_quantity": -3}));
        let product = detail.into_product("MLB1", "u");
        assert_eq!(product.sold_count, 0);
    }

    #[test]
    fn blank_title_falls_back_to_placeholder() {
        let detail = detail_from(json!({"title": "   "}));
        let product = detail.into_product("MLB77", "u");
        assert_eq!(product.name, "Produto MLB77");
    }
}
