#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use spread_monitor::binance::PriceSampler;
use spread_monitor::error::FetchError;

/// In-memory sampler that replays a scripted sequence of prices per symbol.
/// `None` entries (and an exhausted script) fail with a timeout.
#[derive(Default)]
pub struct ScriptedSampler {
    scripts: Mutex<HashMap<String, VecDeque<Option<f64>>>>,
}

impl ScriptedSampler {
    pub fn with(mut self, symbol: &str, prices: &[Option<f64>]) -> Self {
        self.scripts
            .get_mut()
            .unwrap()
            .insert(symbol.to_string(), prices.iter().copied().collect());
        self
    }
}

#[async_trait]
impl PriceSampler for ScriptedSampler {
    async fn fetch(&self, symbol: &str) -> Result<f64, FetchError> {
        let next = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(symbol)
            .and_then(|q| q.pop_front())
            .flatten();
        next.ok_or_else(|| FetchError::Timeout {
            symbol: symbol.to_string(),
            timeout_ms: 5_000,
        })
    }
}
