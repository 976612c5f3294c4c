//! Depth standardization: convert each leg's top-of-book liquidity into one
//! reference unit and return the tightest constraint across the route.

use crate::errors::{AppError, Result};
use crate::models::{BestPriceSize, QuoteMode, Route};

/// Maximum size, in the reference unit, that every leg of `route` can
/// simultaneously support.
///
/// A `Direct` leg already quotes in the reference asset, so its contribution
/// is `price * size`. An `Indirect` leg quotes in some other asset; chaining
/// through the proxy leg's price converts it: `price * size * proxy_price`.
/// The binding constraint is the minimum contribution over all legs.
pub fn standardize(route: &Route, prices: &[BestPriceSize]) -> Result<f64> {
    if route.len() != prices.len() {
        return Err(AppError::Config(format!(
            "route has {} legs but {} price snapshots were supplied",
            route.len(),
            prices.len()
        )));
    }
    // A missing proxy price must never be read as zero; refuse instead.
    let proxy_price = prices
        .get(route.proxy_index)
        .map(|p| p.price)
        .ok_or_else(|| {
            AppError::Config(format!(
                "proxy index {} out of range for {} legs",
                route.proxy_index,
                route.len()
            ))
        })?;

    let binding = route
        .modes
        .iter()
        .zip(prices)
        .map(|(mode, best)| match mode {
            QuoteMode::Direct => best.price * best.size,
            QuoteMode::Indirect => best.price * best.size * proxy_price,
        })
        .fold(f64::INFINITY, f64::min);

    Ok(binding)
}
