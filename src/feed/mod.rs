//! Market data access.
//!
//! Responsibilities:
//! • Define the `PriceSource` contract the evaluator fetches through.
//! • Cache the latest top-of-book per market and serve it as a snapshot.
//! • Enforce the price > 0 / size >= 0 boundary contract on every read.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::errors::{AppError, Result};
use crate::models::{BestPriceSize, Side};

pub mod ws;

pub use ws::{BookTop, connect_and_stream, spawn_book_watcher};

/// Supplier of one leg's best price and size.
///
/// Lookups are independent per leg and may run concurrently. A failed lookup
/// must propagate as an error, never be substituted with a default snapshot.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Best executable price and its size for taking `side` on `market`:
    /// the lowest ask for a buy, the highest bid for a sell.
    async fn best_price(&self, market: &str, side: Side) -> Result<BestPriceSize>;
}

/// `PriceSource` backed by per-market `watch` channels fed from a live
/// stream. Reads are non-blocking: a market with no snapshot yet is an
/// upstream failure for this cycle, not something to wait on.
pub struct CachedBook {
    books: HashMap<String, watch::Receiver<Option<BookTop>>>,
}

impl CachedBook {
    pub fn new(books: HashMap<String, watch::Receiver<Option<BookTop>>>) -> Self {
        Self { books }
    }
}

#[async_trait]
impl PriceSource for CachedBook {
    async fn best_price(&self, market: &str, side: Side) -> Result<BestPriceSize> {
        let rx = self.books.get(market).ok_or_else(|| AppError::UpstreamFetch {
            market: market.into(),
            reason: "no feed subscribed for market".into(),
        })?;
        let top = (*rx.borrow()).ok_or_else(|| AppError::UpstreamFetch {
            market: market.into(),
            reason: "no book snapshot received yet".into(),
        })?;
        let best = match side {
            Side::Buy => BestPriceSize {
                price: top.ask,
                size: top.ask_size,
            },
            Side::Sell => BestPriceSize {
                price: top.bid,
                size: top.bid_size,
            },
        };
        check_snapshot(market, best)
    }
}

/// Boundary contract for every snapshot leaving a price source. The core
/// arithmetic assumes positive prices and non-negative sizes and does not
/// re-validate, so a violation here is an upstream failure.
pub fn check_snapshot(market: &str, best: BestPriceSize) -> Result<BestPriceSize> {
    if !(best.price > 0.0) {
        return Err(AppError::UpstreamFetch {
            market: market.into(),
            reason: format!("non-positive price {}", best.price),
        });
    }
    if !(best.size >= 0.0) {
        return Err(AppError::UpstreamFetch {
            market: market.into(),
            reason: format!("negative size {}", best.size),
        });
    }
    Ok(best)
}

/// Best level of an L2 ladder for the given taking side: the minimum ask for
/// a buy, the maximum bid for a sell, together with that level's size. For
/// sources that deliver full ladders instead of a book-ticker stream.
pub fn best_for_side(side: Side, prices: &[f64], sizes: &[f64]) -> Option<BestPriceSize> {
    let pick = |ordering: fn(&f64, &f64) -> bool| {
        prices
            .iter()
            .zip(sizes)
            .reduce(|a, b| if ordering(a.0, b.0) { a } else { b })
    };
    let (price, size) = match side {
        Side::Buy => pick(|a, b| a <= b)?,
        Side::Sell => pick(|a, b| a >= b)?,
    };
    Some(BestPriceSize {
        price: *price,
        size: *size,
    })
}
