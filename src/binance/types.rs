use serde::Deserialize;

/// Deserialize Binance string-encoded numbers to f64.
pub fn string_to_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse::<f64>().map_err(serde::de::Error::custom)
}

/// Symbol price ticker (GET /api/v3/ticker/price?symbol=...).
#[derive(Debug, Deserialize)]
pub struct TickerPriceResponse {
    pub symbol: String,
    #[serde(deserialize_with = "string_to_f64")]
    pub price: f64,
}

/// Binance error body.
#[derive(Debug, Deserialize)]
pub struct BinanceApiErrorResponse {
    pub code: i64,
    pub msg: String,
}

/// Binance server time response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerTimeResponse {
    pub server_time: u64,
}
