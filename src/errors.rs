use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Structural problem in a route or in the bot parameters. Fatal for the
    /// affected route, raised before any price fetch, never retried.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A leg's price/size lookup failed (timeout, disconnect, or a value
    /// violating the price > 0 / size >= 0 boundary contract). Fails only the
    /// current cycle's evaluation of that route.
    #[error("Price fetch failed for {market}: {reason}")]
    UpstreamFetch { market: String, reason: String },

    #[error("Environment variable error: {0}")]
    Env(#[from] std::env::VarError),

    #[error("Parse float error: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Other: {0}")]
    Other(String),
}
