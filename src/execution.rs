//! Order submission for a winning route.
//!
//! The core hands over the route, the per-leg snapshots it evaluated, and the
//! same offset used during evaluation, so execution sizing matches the
//! liquidity constraint the decision was made on.

use async_trait::async_trait;
use tracing::info;

use crate::errors::{AppError, Result};
use crate::models::{BestPriceSize, OrderKind, Route, Side};

/// Destination for individual leg orders. Implementations own signing,
/// transport, and acknowledgement; the core only sequences the calls.
#[async_trait]
pub trait OrderSink: Send + Sync {
    async fn submit(
        &self,
        market: &str,
        side: Side,
        price: f64,
        size: f64,
        kind: OrderKind,
    ) -> Result<()>;
}

/// Submit one order per leg of `route`, strictly in route order, sizing each
/// leg as its observed size scaled by `offset`. Stops at the first failed
/// submission; partially filled routes are the sink's problem to unwind.
pub async fn submit_route(
    sink: &dyn OrderSink,
    route: &Route,
    legs: &[BestPriceSize],
    offset: f64,
    kind: OrderKind,
) -> Result<()> {
    if legs.len() != route.len() {
        return Err(AppError::Config(format!(
            "route has {} legs but {} snapshots were supplied for execution",
            route.len(),
            legs.len()
        )));
    }

    for ((market, side), best) in route.markets.iter().zip(&route.sides).zip(legs) {
        let size = best.size * offset;
        info!(%market, ?side, price = best.price, size, "[EXEC] submitting leg");
        sink.submit(market, *side, best.price, size, kind).await?;
    }
    Ok(())
}

/// Sink that only logs intended orders. Default wiring for dry runs and for
/// environments where no signing backend is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingSink;

#[async_trait]
impl OrderSink for LoggingSink {
    async fn submit(
        &self,
        market: &str,
        side: Side,
        price: f64,
        size: f64,
        kind: OrderKind,
    ) -> Result<()> {
        info!(market, ?side, price, size, ?kind, "[EXEC] dry-run order");
        Ok(())
    }
}
