//! Wire and resolved types for the price service

use serde::{Deserialize, Serialize};

/// A tradable instrument known to the price service.
///
/// Immutable once fetched in a session. `asset` is the pair symbol, e.g.
/// "ETH/USD"; `asset_id` is the service-internal identifier.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Asset {
    pub asset_id: String,
    pub asset: String,
    #[serde(default)]
    pub address: Option<String>,
}

/// One historical change window attached to a quote (e.g. period "7d").
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PriceChange {
    pub period: String,
    pub change: f64,
    pub change_pct: f64,
    pub from_price: f64,
    pub to_price: f64,
    pub from_time: String,
    pub to_time: String,
}

/// Raw quote payload from `GET /prices/last`. Never mutated after decode.
///
/// `value` is a mantissa scaled by `10^expo`; a missing or zero value means
/// the service has no usable price for the asset right now.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "assetID", default)]
    pub asset_id: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub expo: i32,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub price_changes: Vec<PriceChange>,
}

/// Resolved per-asset quote, the cached unit of the quote cache.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub price: f64,
    pub change_7d: Option<f64>,
    pub change_7d_pct: Option<f64>,
}

impl Quote {
    /// Degraded quote used when a per-asset fetch fails. Never cached.
    pub fn zero() -> Self {
        Quote {
            price: 0.0,
            change_7d: None,
            change_7d_pct: None,
        }
    }
}

/// Display-ready price for one asset, as published to consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenPrice {
    pub symbol: String,
    pub price: f64,
    pub change_7d: Option<f64>,
    pub change_7d_pct: Option<f64>,
    pub icon: &'static str,
}
