//! Shared data structures used throughout the application.

use serde::Deserialize;

use crate::errors::{AppError, Result};

/// Direction of one leg of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

/// How a leg's top-of-book liquidity is expressed in the reference unit.
///
/// `Direct` legs quote in the reference asset already, so their notional is
/// `price * size`. `Indirect` legs quote in some other asset and must be
/// chained through the route's proxy leg: `price * size * proxy_price`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteMode {
    Direct,
    Indirect,
}

/// Order kind forwarded to the order sink when a route executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    Limit,
    Ioc,
    PostOnly,
}

/// Immutable top-of-book snapshot for one leg, supplied fresh per evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestPriceSize {
    pub price: f64,
    pub size: f64,
}

/// One closed trading loop: parallel per-leg vectors plus the index of the
/// proxy leg used to convert `Indirect` liquidity into the reference unit.
///
/// The three vectors must have equal non-zero length and `proxy_index` must
/// address a leg; `validate` checks this once, before any price is fetched.
#[derive(Debug, Clone)]
pub struct Route {
    pub markets: Vec<String>,
    pub sides: Vec<Side>,
    pub modes: Vec<QuoteMode>,
    pub proxy_index: usize,
}

impl Route {
    /// Number of legs.
    pub fn len(&self) -> usize {
        self.markets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }

    /// Structural check. Any violation here is a configuration mistake, never
    /// a runtime race, so it is fatal for the route and is never retried.
    pub fn validate(&self) -> Result<()> {
        if self.markets.is_empty() {
            return Err(AppError::Config("route has no legs".into()));
        }
        if self.sides.len() != self.markets.len() || self.modes.len() != self.markets.len() {
            return Err(AppError::Config(format!(
                "route leg count mismatch: {} markets, {} sides, {} quote modes",
                self.markets.len(),
                self.sides.len(),
                self.modes.len()
            )));
        }
        if self.proxy_index >= self.markets.len() {
            return Err(AppError::Config(format!(
                "proxy index {} out of range for {} legs",
                self.proxy_index,
                self.markets.len()
            )));
        }
        Ok(())
    }
}

/// Evaluated outcome for one route in one cycle. Created fresh per
/// evaluation, never mutated afterwards.
///
/// `cost_fraction` is a COST measure: `1 + compounded fee - gross multiplier`.
/// Lower (or negative) means more profitable; it is NOT a conventional
/// "profit percent". Every comparison against a threshold must keep that
/// inverted sense in mind.
#[derive(Debug, Clone)]
pub struct ArbitrageOpportunity {
    pub cost_fraction: f64,
    pub nominal_profit: f64,
    pub sides: Vec<Side>,
    pub legs: Vec<BestPriceSize>,
}

/// Process-wide run parameters, loaded once at startup and passed explicitly
/// into the evaluator. `taker_fee` is a fraction (4 bps = 0.0004); `offset`
/// in (0, 1] shrinks the tradable size to hedge against book movement between
/// observation and execution.
#[derive(Debug, Clone, Copy)]
pub struct BotParams {
    pub taker_fee: f64,
    pub offset: f64,
    pub profit_threshold: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(legs: usize, proxy: usize) -> Route {
        Route {
            markets: (0..legs).map(|i| format!("M{i}")).collect(),
            sides: vec![Side::Buy; legs],
            modes: vec![QuoteMode::Direct; legs],
            proxy_index: proxy,
        }
    }

    #[test]
    fn valid_route_passes() {
        assert!(route(3, 0).validate().is_ok());
    }

    #[test]
    fn empty_route_rejected() {
        let r = route(0, 0);
        assert!(matches!(r.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn side_count_mismatch_rejected() {
        let mut r = route(3, 0);
        r.sides.pop();
        assert!(matches!(r.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn quote_mode_count_mismatch_rejected() {
        let mut r = route(3, 0);
        r.modes.push(QuoteMode::Indirect);
        assert!(matches!(r.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn proxy_out_of_range_rejected() {
        let r = route(3, 3);
        assert!(matches!(r.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn sides_deserialize_from_lowercase() {
        let sides: Vec<Side> = serde_json::from_str(r#"["buy","sell"]"#).unwrap();
        assert_eq!(sides, vec![Side::Buy, Side::Sell]);
    }
}
