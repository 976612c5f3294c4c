//! Route selection: compare evaluated opportunities and apply the
//! profitability gate. No I/O happens here.

use crate::models::ArbitrageOpportunity;

/// Index of the opportunity with the strictly greatest `nominal_profit`.
/// Ties keep the first-seen candidate, so the result is stable in the order
/// routes were evaluated. `None` only for an empty slate.
pub fn select_best(opportunities: &[ArbitrageOpportunity]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, opp) in opportunities.iter().enumerate() {
        match best {
            Some(b) if opp.nominal_profit > opportunities[b].nominal_profit => best = Some(i),
            Some(_) => {}
            None => best = Some(i),
        }
    }
    best
}

/// Profitability gate for the winning route.
///
/// `cost_fraction` is a cost (lower is better), yet the long-standing gate
/// is `cost_fraction > profit_threshold`, reading the value as if it were a
/// ">1 means profitable" signal. The two conventions look inconsistent and
/// may be a latent bug; the comparison is kept exactly as-is because
/// flipping it would change which routes trade. See DESIGN.md.
pub fn clears_threshold(opp: &ArbitrageOpportunity, profit_threshold: f64) -> bool {
    opp.cost_fraction > profit_threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opp(cost_fraction: f64, nominal_profit: f64) -> ArbitrageOpportunity {
        ArbitrageOpportunity {
            cost_fraction,
            nominal_profit,
            sides: vec![],
            legs: vec![],
        }
    }

    #[test]
    fn strictly_larger_nominal_profit_wins() {
        let opps = [opp(1.0, 5.0), opp(1.0, 7.5), opp(1.0, 6.0)];
        assert_eq!(select_best(&opps), Some(1));
    }

    #[test]
    fn ties_keep_the_first_seen() {
        let opps = [opp(1.0, 7.5), opp(1.0, 7.5)];
        assert_eq!(select_best(&opps), Some(0));
    }

    #[test]
    fn empty_slate_selects_nothing() {
        assert_eq!(select_best(&[]), None);
    }

    #[test]
    fn gate_keeps_the_inherited_comparison_direction() {
        // Above the threshold fires, below or equal does not.
        assert!(clears_threshold(&opp(1.02, 0.0), 1.01));
        assert!(!clears_threshold(&opp(1.0008, 0.0), 1.01));
        assert!(!clears_threshold(&opp(1.01, 0.0), 1.01));
        // A deeply negative cost (very profitable by the cost reading) does
        // NOT clear the inherited gate; preserved, not fixed.
        assert!(!clears_threshold(&opp(-0.5, 0.0), 1.01));
    }
}
