//! Route evaluation: concurrent per-leg price fetch, fee compounding,
//! simulation, and depth standardization fused into one opportunity value.

use futures::future::try_join_all;

use crate::arbitrage::{depth, simulator};
use crate::errors::Result;
use crate::feed::PriceSource;
use crate::models::{ArbitrageOpportunity, BotParams, Route};

/// Effective fee fraction of paying a flat taker fee once per leg across
/// `legs` sequential legs. Compounded, because each leg's notional already
/// reflects the fee erosion of the legs before it.
pub fn compound_fee(taker_fee: f64, legs: usize) -> f64 {
    (1.0 + taker_fee).powi(legs as i32) - 1.0
}

/// Evaluate one route against the current books.
///
/// Leg lookups are mutually independent, so they are all issued at once and
/// joined; wall-clock cost is the slowest leg, not the sum. The join is
/// fail-fast: one failed leg fails the whole evaluation and no partial
/// opportunity is produced. Structural validation happens before any fetch.
pub async fn evaluate(
    route: &Route,
    source: &dyn PriceSource,
    params: &BotParams,
) -> Result<ArbitrageOpportunity> {
    route.validate()?;

    let fetches = route
        .markets
        .iter()
        .zip(&route.sides)
        .map(|(market, side)| source.best_price(market, *side));
    let prices = try_join_all(fetches).await?;

    let fee_cost = compound_fee(params.taker_fee, route.len());
    let gross = simulator::simulate(1.0, &route.sides, &prices);

    // Cost convention: lower (or negative) is better, since a gross
    // multiplier near or above 1 consumes the fee headroom. This is not a
    // profit percent.
    let cost_fraction = 1.0 + fee_cost - gross;

    let standardized = depth::standardize(route, &prices)?;
    let nominal_profit = cost_fraction * standardized * params.offset;

    Ok(ArbitrageOpportunity {
        cost_fraction,
        nominal_profit,
        sides: route.sides.clone(),
        legs: prices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::models::{BestPriceSize, QuoteMode, Side};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockSource {
        books: HashMap<String, BestPriceSize>,
        calls: AtomicUsize,
    }

    impl MockSource {
        fn new(entries: &[(&str, f64, f64)]) -> Self {
            let books = entries
                .iter()
                .map(|(m, p, s)| (m.to_string(), BestPriceSize { price: *p, size: *s }))
                .collect();
            Self {
                books,
                calls: AtomicUsize::new(0),
            }
        }

        fn fetches(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PriceSource for MockSource {
        async fn best_price(&self, market: &str, _side: Side) -> crate::errors::Result<BestPriceSize> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.books
                .get(market)
                .copied()
                .ok_or_else(|| AppError::UpstreamFetch {
                    market: market.into(),
                    reason: "unknown market".into(),
                })
        }
    }

    fn triangle() -> Route {
        Route {
            markets: vec!["A/USDC".into(), "B/A".into(), "B/EUR".into()],
            sides: vec![Side::Buy, Side::Buy, Side::Sell],
            modes: vec![QuoteMode::Direct, QuoteMode::Direct, QuoteMode::Indirect],
            proxy_index: 0,
        }
    }

    fn params(offset: f64) -> BotParams {
        BotParams {
            taker_fee: 0.0004,
            offset,
            profit_threshold: 1.01,
        }
    }

    #[test]
    fn fee_compounds_per_leg() {
        let fee = compound_fee(0.0004, 3);
        assert!((fee - 0.001200480064).abs() < 1e-12);
        assert_eq!(compound_fee(0.0004, 0), 0.0);
        assert!((compound_fee(0.01, 1) - 0.01).abs() < 1e-15);
    }

    #[tokio::test]
    async fn evaluates_three_leg_route_exactly() {
        let source = MockSource::new(&[
            ("A/USDC", 100.0, 10.0),
            ("B/A", 50.0, 20.0),
            ("B/EUR", 2.0, 5.0),
        ]);
        let opp = evaluate(&triangle(), &source, &params(0.9)).await.unwrap();

        // gross multiplier: 1/100 / 50 * 2 = 0.0004
        // cost fraction: 1 + (1.0004^3 - 1) - 0.0004
        assert!((opp.cost_fraction - 1.000800480064).abs() < 1e-12);
        // contributions 1000, 1000, 2*5*100 = 1000 -> standardized 1000
        assert!((opp.nominal_profit - 900.7204320576).abs() < 1e-9);
        assert_eq!(opp.sides, triangle().sides);
        assert_eq!(opp.legs.len(), 3);
        assert_eq!(source.fetches(), 3);
    }

    #[tokio::test]
    async fn nominal_profit_scales_linearly_with_offset() {
        let source = MockSource::new(&[
            ("A/USDC", 100.0, 10.0),
            ("B/A", 50.0, 20.0),
            ("B/EUR", 2.0, 5.0),
        ]);
        let full = evaluate(&triangle(), &source, &params(1.0)).await.unwrap();
        let half = evaluate(&triangle(), &source, &params(0.5)).await.unwrap();
        assert!((half.nominal_profit - full.nominal_profit / 2.0).abs() < 1e-12);
        assert_eq!(half.cost_fraction, full.cost_fraction);
    }

    #[tokio::test]
    async fn structural_mismatch_fails_before_any_fetch() {
        let mut route = triangle();
        route.sides.pop();
        let source = MockSource::new(&[("A/USDC", 100.0, 10.0)]);

        let res = evaluate(&route, &source, &params(0.9)).await;
        assert!(matches!(res, Err(AppError::Config(_))));
        assert_eq!(source.fetches(), 0);
    }

    #[tokio::test]
    async fn one_failed_leg_fails_the_whole_evaluation() {
        // B/A missing from the mock books
        let source = MockSource::new(&[("A/USDC", 100.0, 10.0), ("B/EUR", 2.0, 5.0)]);
        let res = evaluate(&triangle(), &source, &params(0.9)).await;
        assert!(matches!(res, Err(AppError::UpstreamFetch { .. })));
    }
}
