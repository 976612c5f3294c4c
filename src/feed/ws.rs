//! WebSocket book-ticker client.
//!
//! Responsibilities:
//! • Subscribe to an exchange's public best-bid/ask stream for one market.
//! • Decode frames into `BookTop` snapshots, skipping malformed ones.
//! • Forward the latest snapshot into a `watch` channel for `CachedBook`.

use futures::{Stream, StreamExt};
use serde::Deserialize;
use tokio::sync::watch;
use tokio_tungstenite::connect_async;
use tracing::warn;
use url::Url;

use crate::errors::Result;

/// Latest best bid/ask for one market.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BookTop {
    pub bid: f64,
    pub bid_size: f64,
    pub ask: f64,
    pub ask_size: f64,
}

#[derive(Debug, Deserialize)]
struct BookTickerMsg {
    #[serde(rename = "b")]
    bid: String,
    #[serde(rename = "B")]
    bid_qty: String,
    #[serde(rename = "a")]
    ask: String,
    #[serde(rename = "A")]
    ask_qty: String,
}

/// Returns an asynchronous stream of `BookTop`s for the given stream symbol,
/// e.g. "solusdt". `endpoint` is the exchange's websocket base URL.
pub async fn connect_and_stream(
    endpoint: &str,
    symbol: &str,
) -> Result<impl Stream<Item = BookTop> + use<>> {
    let url = Url::parse(&format!(
        "{}/{}@bookTicker",
        endpoint.trim_end_matches('/'),
        symbol.to_lowercase()
    ))?;

    let (ws_stream, _resp) = connect_async(url).await?;

    let mapped = ws_stream.filter_map(|msg_res| async {
        match msg_res {
            Ok(msg) if msg.is_text() => {
                let txt = match msg.into_text() {
                    Ok(t) => t,
                    Err(e) => {
                        warn!(error = %e, "[FEED] text extraction failed");
                        return None;
                    }
                };
                let parsed: BookTickerMsg = match serde_json::from_str(&txt) {
                    Ok(p) => p,
                    Err(e) => {
                        warn!(error = %e, "[FEED] book ticker JSON parse failed");
                        return None;
                    }
                };
                decode_top(&parsed)
            }
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "[FEED] websocket error");
                None
            }
        }
    });

    Ok(mapped)
}

fn decode_top(msg: &BookTickerMsg) -> Option<BookTop> {
    Some(BookTop {
        bid: msg.bid.parse().ok()?,
        bid_size: msg.bid_qty.parse().ok()?,
        ask: msg.ask.parse().ok()?,
        ask_size: msg.ask_qty.parse().ok()?,
    })
}

/// Spawn a background task that keeps `tx` updated with the latest snapshot
/// for `symbol`. The task ends when the stream closes; reconnection policy
/// belongs to the supervisor, not here.
pub async fn spawn_book_watcher(
    endpoint: &str,
    symbol: &str,
    tx: watch::Sender<Option<BookTop>>,
) -> Result<tokio::task::JoinHandle<()>> {
    let stream = connect_and_stream(endpoint, symbol).await?;
    let symbol = symbol.to_string();
    let handle = tokio::spawn(async move {
        futures::pin_mut!(stream);
        while let Some(top) = stream.next().await {
            let _ = tx.send(Some(top));
        }
        warn!(%symbol, "[FEED] book stream closed");
    });
    Ok(handle)
}
