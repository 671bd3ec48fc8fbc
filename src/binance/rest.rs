use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::error::FetchError;

use super::types::{BinanceApiErrorResponse, ServerTimeResponse, TickerPriceResponse};

/// Source of the latest price for a symbol.
#[async_trait]
pub trait PriceSampler: Send + Sync {
    async fn fetch(&self, symbol: &str) -> Result<f64, FetchError>;
}

pub struct BinanceRestClient {
    http: reqwest::Client,
    base_url: String,
    timeout_ms: u64,
}

impl BinanceRestClient {
    pub fn new(base_url: &str, timeout_ms: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_ms,
        })
    }

    pub async fn ping(&self) -> Result<()> {
        let url = format!("{}/api/v3/ping", self.base_url);
        self.http
            .get(&url)
            .send()
            .await
            .context("ping failed")?
            .error_for_status()
            .context("ping returned error status")?;
        Ok(())
    }

    pub async fn server_time(&self) -> Result<u64> {
        let url = format!("{}/api/v3/time", self.base_url);
        let resp: ServerTimeResponse = self
            .http
            .get(&url)
            .send()
            .await
            .context("server_time failed")?
            .json()
            .await?;
        Ok(resp.server_time)
    }

    pub async fn ticker_price(&self, symbol: &str) -> Result<f64, FetchError> {
        let url = format!("{}/api/v3/ticker/price", self.base_url);

        let resp = self
            .http
            .get(&url)
            .query(&[("symbol", symbol)])
            .send()
            .await
            .map_err(|e| self.map_transport_error(symbol, e))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| self.map_transport_error(symbol, e))?;

        if !status.is_success() {
            if let Ok(err) = serde_json::from_str::<BinanceApiErrorResponse>(&body) {
                return Err(FetchError::Api {
                    code: err.code,
                    msg: err.msg,
                });
            }
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_ticker_price(symbol, &body)
    }

    fn map_transport_error(&self, symbol: &str, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout {
                symbol: symbol.to_string(),
                timeout_ms: self.timeout_ms,
            }
        } else {
            FetchError::Http(e)
        }
    }
}

#[async_trait]
impl PriceSampler for BinanceRestClient {
    async fn fetch(&self, symbol: &str) -> Result<f64, FetchError> {
        let price = self.ticker_price(symbol).await?;
        tracing::debug!(symbol, price, "Ticker price received");
        Ok(price)
    }
}

/// Decode a ticker body and check it is a usable price for `symbol`.
pub fn parse_ticker_price(symbol: &str, body: &str) -> Result<f64, FetchError> {
    let ticker: TickerPriceResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;
    if !ticker.symbol.eq_ignore_ascii_case(symbol) {
        return Err(FetchError::Malformed(format!(
            "requested {} but got {}",
            symbol, ticker.symbol
        )));
    }
    validate_price(symbol, ticker.price)
}

pub fn validate_price(symbol: &str, price: f64) -> Result<f64, FetchError> {
    if price.is_finite() && price > 0.0 {
        Ok(price)
    } else {
        Err(FetchError::InvalidPrice {
            symbol: symbol.to_string(),
            price,
        })
    }
}
