//! The price service client
//!
//! `PriceClient` is the only component that talks to the network. It layers
//! three caches over the remote price service: a session-memoized asset
//! catalog, a per-asset quote cache (short TTL) and an aggregate cache of
//! the full resolved price list (longer TTL). Concurrent readers of a stale
//! entry are collapsed into a single in-flight fetch.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, instrument, warn};

use crate::cache::{TtlCache, TtlCell};
use crate::config::AppConfig;
use crate::error::{ApiError, ApiResult};
use crate::model::{Asset, PriceResponse, Quote, TokenPrice};
use crate::tokens;

/// Anything the polling store can poll for an aggregate price list.
///
/// Seam for substituting the network client in tests.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn get_all_token_prices(&self) -> ApiResult<Vec<TokenPrice>>;
}

pub struct PriceClient {
    http: reqwest::Client,
    base_url: String,
    assets: OnceCell<Vec<Asset>>,
    quotes: TtlCache<String, Quote>,
    quote_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    all_prices: TtlCell<Vec<TokenPrice>>,
    refresh_lock: Mutex<()>,
}

impl PriceClient {
    pub fn new(config: &AppConfig) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("oraclefeed/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout())
            .build()?;

        Ok(PriceClient {
            http,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            assets: OnceCell::new(),
            quotes: TtlCache::new(config.price_ttl()),
            quote_locks: Mutex::new(HashMap::new()),
            all_prices: TtlCell::new(config.all_prices_ttl()),
            refresh_lock: Mutex::new(()),
        })
    }

    /// The asset catalog, fetched once per session.
    ///
    /// A failed fetch leaves the catalog unset, so the next call is a fresh
    /// attempt; a successful fetch is memoized for the process lifetime.
    pub async fn get_assets(&self) -> ApiResult<&[Asset]> {
        let assets = self
            .assets
            .get_or_try_init(|| self.fetch_assets())
            .await?;
        Ok(assets)
    }

    async fn fetch_assets(&self) -> ApiResult<Vec<Asset>> {
        let url = format!("{}/assets", self.base_url);
        debug!("Requesting asset catalog from {}", url);

        let body = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let assets: Vec<Asset> = serde_json::from_str(&body).map_err(|e| {
            warn!(error = ?e, response = %body, "Failed to parse asset catalog");
            ApiError::Data(format!("asset catalog: {e}"))
        })?;
        debug!("Loaded {} assets", assets.len());
        Ok(assets)
    }

    /// Case-sensitive lookup of an asset id by its pair symbol. Loads the
    /// catalog on first use; an unknown symbol is `None`, not an error.
    pub async fn asset_id_by_symbol(&self, symbol: &str) -> ApiResult<Option<String>> {
        let assets = self.get_assets().await?;
        Ok(assets
            .iter()
            .find(|a| a.asset == symbol)
            .map(|a| a.asset_id.clone()))
    }

    /// Latest resolved quote for one asset.
    ///
    /// Served from the quote cache while fresh. A failed or unusable fetch
    /// degrades to a zero price and writes no cache entry, so the next call
    /// retries immediately. Concurrent callers for the same stale asset
    /// share one network request.
    #[instrument(name = "GetQuote", skip(self), fields(asset_id = %asset_id))]
    pub async fn get_quote(&self, asset_id: &str) -> Quote {
        if let Some(cached) = self.quotes.get(&asset_id.to_string()).await {
            return cached;
        }

        let lock = self.quote_lock(asset_id).await;
        let _guard = lock.lock().await;

        // Another caller may have refreshed the entry while we waited.
        if let Some(cached) = self.quotes.get(&asset_id.to_string()).await {
            return cached;
        }

        match self.fetch_quote(asset_id).await {
            Ok(Some(quote)) => {
                self.quotes.put(asset_id.to_string(), quote.clone()).await;
                quote
            }
            Ok(None) => {
                debug!("No usable quote value for asset {}", asset_id);
                Quote::zero()
            }
            Err(err) => {
                warn!(error = %err, "Quote fetch failed for asset {}", asset_id);
                Quote::zero()
            }
        }
    }

    async fn quote_lock(&self, asset_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.quote_locks.lock().await;
        locks
            .entry(asset_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// `Ok(None)` means the service answered but carried no usable value.
    async fn fetch_quote(&self, asset_id: &str) -> ApiResult<Option<Quote>> {
        let url = format!("{}/prices/last", self.base_url);
        debug!("Requesting quote from {} for {}", url, asset_id);

        let body = self
            .http
            .get(&url)
            .query(&[("asset", asset_id)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let raw: PriceResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(error = ?e, response = %body, "Failed to parse quote response");
            ApiError::Data(format!("quote for {asset_id}: {e}"))
        })?;

        let value = match raw.value {
            Some(v) if v != 0.0 => v,
            _ => return Ok(None),
        };

        let change_7d = raw.price_changes.iter().find(|c| c.period == "7d");

        Ok(Some(Quote {
            price: value * 10f64.powi(raw.expo),
            change_7d: change_7d.map(|c| c.change),
            change_7d_pct: change_7d.map(|c| c.change_pct),
        }))
    }

    /// The full resolved price list, sorted into canonical display order.
    ///
    /// Served verbatim from the aggregate cache while fresh. On a miss, the
    /// per-asset quotes are fetched fan-out and the list is published only
    /// once all of them have settled; a single bad asset degrades to a zero
    /// price without failing the aggregate. Only a catalog failure
    /// propagates. One refresh runs at a time; callers arriving mid-flight
    /// await it and are served from the just-written cache.
    #[instrument(name = "GetAllTokenPrices", skip(self))]
    pub async fn get_all_token_prices(&self) -> ApiResult<Vec<TokenPrice>> {
        if let Some(cached) = self.all_prices.get().await {
            return Ok(cached);
        }

        let _guard = self.refresh_lock.lock().await;
        if let Some(cached) = self.all_prices.get().await {
            return Ok(cached);
        }

        let assets = self.get_assets().await?.to_vec();
        let fetches = assets.iter().map(|asset| async {
            let quote = self.get_quote(&asset.asset_id).await;
            TokenPrice {
                symbol: asset.asset.clone(),
                price: quote.price,
                change_7d: quote.change_7d,
                change_7d_pct: quote.change_7d_pct,
                icon: tokens::icon_for(tokens::base_symbol(&asset.asset)),
            }
        });

        let mut prices = join_all(fetches).await;
        tokens::sort_prices(&mut prices);

        self.all_prices.put(prices.clone()).await;
        Ok(prices)
    }

    /// Ratio of two USD-quoted prices, e.g. ("ETH", "USDC") -> ETH in USDC.
    ///
    /// `None` when either symbol is unknown, any fetch fails, or the
    /// denominator resolves to zero.
    pub async fn get_price_for_pair(&self, from: &str, to: &str) -> Option<f64> {
        let from_pair = tokens::token_pair_name(from, "USD");
        let to_pair = tokens::token_pair_name(to, "USD");

        let from_id = self.asset_id_by_symbol(&from_pair).await.ok()??;
        let to_id = self.asset_id_by_symbol(&to_pair).await.ok()??;

        let from_price = self.get_quote(&from_id).await.price;
        let to_price = self.get_quote(&to_id).await.price;

        if to_price == 0.0 {
            return None;
        }
        Some(from_price / to_price)
    }

    /// Raw historical payload for an audit export. Deliberately uncached:
    /// this is a one-shot user action, and failures propagate for the
    /// caller to surface with a retryable message.
    pub async fn get_audit_prices(
        &self,
        from_iso: &str,
        to_iso: &str,
        asset_id: Option<&str>,
    ) -> ApiResult<serde_json::Value> {
        let url = format!("{}/prices/audit", self.base_url);
        debug!("Requesting audit export from {}", url);

        let mut query = vec![("from", from_iso), ("to", to_iso)];
        if let Some(id) = asset_id {
            query.push(("asset", id));
        }

        let payload = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;
        Ok(payload)
    }
}

#[async_trait]
impl PriceSource for PriceClient {
    async fn get_all_token_prices(&self) -> ApiResult<Vec<TokenPrice>> {
        PriceClient::get_all_token_prices(self).await
    }
}
