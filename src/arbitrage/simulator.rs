//! Route simulation: walk a balance through the legs of a route at current
//! best prices to obtain the gross multiplier (fees excluded).

use crate::models::{BestPriceSize, Side};

/// Apply a single leg to a running balance.
///
/// A buy spends the quote asset to acquire the base asset, so the balance is
/// divided by the price; a sell converts base back to quote, multiplying.
pub fn apply_leg(balance: f64, side: Side, best: &BestPriceSize) -> f64 {
    match side {
        Side::Buy => balance / best.price,
        Side::Sell => balance * best.price,
    }
}

/// Walk `balance` through every leg in route order and return the ending
/// balance. Start from 1.0 for a rate-only simulation.
///
/// Legs must be applied strictly in order: each leg's output asset is assumed
/// to be the next leg's input asset. That, and prices being positive, are
/// caller invariants enforced at the price-source boundary, not here.
pub fn simulate(balance: f64, sides: &[Side], prices: &[BestPriceSize]) -> f64 {
    sides
        .iter()
        .zip(prices)
        .fold(balance, |b, (side, best)| apply_leg(b, *side, best))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn best(price: f64) -> BestPriceSize {
        BestPriceSize { price, size: 1.0 }
    }

    #[test]
    fn buy_divides_sell_multiplies() {
        assert_eq!(apply_leg(10.0, Side::Buy, &best(4.0)), 2.5);
        assert_eq!(apply_leg(10.0, Side::Sell, &best(4.0)), 40.0);
    }

    #[test]
    fn matches_closed_form_product() {
        let sides = [Side::Buy, Side::Sell, Side::Buy, Side::Sell];
        let prices = [best(2.0), best(3.0), best(5.0), best(7.0)];

        let expected: f64 = sides
            .iter()
            .zip(&prices)
            .map(|(s, p)| match s {
                Side::Buy => 1.0 / p.price,
                Side::Sell => p.price,
            })
            .product();

        let got = simulate(1.0, &sides, &prices);
        assert!((got - expected).abs() < 1e-12);
    }

    #[test]
    fn triangular_buy_buy_sell() {
        // 1.0 -> /100 -> /50 -> *2 = 0.0004
        let sides = [Side::Buy, Side::Buy, Side::Sell];
        let prices = [best(100.0), best(50.0), best(2.0)];
        assert!((simulate(1.0, &sides, &prices) - 0.0004).abs() < 1e-15);
    }

    #[test]
    fn empty_route_is_identity() {
        assert_eq!(simulate(1.0, &[], &[]), 1.0);
    }

    #[test]
    fn scales_linearly_in_starting_balance() {
        let sides = [Side::Buy, Side::Sell];
        let prices = [best(3.0), best(4.0)];
        let unit = simulate(1.0, &sides, &prices);
        assert!((simulate(5.0, &sides, &prices) - 5.0 * unit).abs() < 1e-12);
    }
}
