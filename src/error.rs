use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("export error: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to produce a usable price for one symbol. A tick that hits any of
/// these is skipped without touching the series.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request for {symbol} timed out after {timeout_ms}ms")]
    Timeout { symbol: String, timeout_ms: u64 },

    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("binance API error (code {code}): {msg}")]
    Api { code: i64, msg: String },

    #[error("malformed ticker response: {0}")]
    Malformed(String),

    #[error("invalid price for {symbol}: {price}")]
    InvalidPrice { symbol: String, price: f64 },
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}
