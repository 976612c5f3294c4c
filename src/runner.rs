//! Cycle driver: evaluate every configured route, pick the winner, gate it,
//! and hand it to execution.
//!
//! Cycles are SERIALIZED: the next poll tick is not armed until the current
//! cycle has fully completed (`MissedTickBehavior::Delay`), matching a
//! sleep-after-cycle loop. In-flight cycles are never cancelled to start the
//! next one. Route evaluations inside one cycle run concurrently and share no
//! mutable state.

use futures::future::join_all;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::arbitrage::{clears_threshold, evaluate, select_best};
use crate::errors::Result;
use crate::execution::{OrderSink, submit_route};
use crate::feed::PriceSource;
use crate::models::{ArbitrageOpportunity, BotParams, OrderKind, Route};

/// What one cycle concluded. Mostly for logging and deterministic tests;
/// a cycle with no winner above the threshold is the normal outcome.
#[derive(Debug)]
pub struct CycleOutcome {
    /// Routes whose evaluation completed this cycle.
    pub evaluated: usize,
    /// Winning route index (into the configured route list) and its
    /// opportunity, if any route evaluated at all.
    pub winner: Option<(usize, ArbitrageOpportunity)>,
    /// Whether the winner cleared the gate and was submitted.
    pub executed: bool,
}

/// Run a single evaluation cycle over `routes`.
///
/// All route evaluations are issued concurrently; a route whose evaluation
/// fails (upstream fetch, bad config) is skipped for this cycle with a warn
/// and retried naturally on the next one. Only a failed order submission is
/// an error at this level.
pub async fn run_cycle(
    routes: &[Route],
    source: &dyn PriceSource,
    sink: &dyn OrderSink,
    params: &BotParams,
) -> Result<CycleOutcome> {
    let evaluations = join_all(routes.iter().map(|r| evaluate(r, source, params))).await;

    let mut indices = Vec::new();
    let mut opportunities = Vec::new();
    for (i, res) in evaluations.into_iter().enumerate() {
        match res {
            Ok(opp) => {
                indices.push(i);
                opportunities.push(opp);
            }
            Err(e) => warn!(route = i, error = %e, "[CYCLE] route skipped this cycle"),
        }
    }

    let Some(best) = select_best(&opportunities) else {
        return Ok(CycleOutcome {
            evaluated: 0,
            winner: None,
            executed: false,
        });
    };
    let route_index = indices[best];
    let winner = opportunities.swap_remove(best);

    let executed = if clears_threshold(&winner, params.profit_threshold) {
        info!(
            route = route_index,
            cost_fraction = winner.cost_fraction,
            nominal_profit = winner.nominal_profit,
            "[OPP] winner cleared threshold, executing"
        );
        submit_route(
            sink,
            &routes[route_index],
            &winner.legs,
            params.offset,
            OrderKind::Ioc,
        )
        .await?;
        true
    } else {
        debug!(
            route = route_index,
            cost_fraction = winner.cost_fraction,
            nominal_profit = winner.nominal_profit,
            "[CYCLE] winner below threshold, no action"
        );
        false
    };

    Ok(CycleOutcome {
        evaluated: indices.len(),
        winner: Some((route_index, winner)),
        executed,
    })
}

/// Poll loop: one cycle per `poll_interval` until `shutdown` is cancelled.
/// A cycle error (failed submission) is logged, not fatal to the loop.
pub async fn run_loop(
    routes: &[Route],
    source: &dyn PriceSource,
    sink: &dyn OrderSink,
    params: &BotParams,
    poll_interval: std::time::Duration,
    shutdown: CancellationToken,
) {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut ticks: u64 = 0;

    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                info!("[CYCLE] shutdown requested, stopping loop");
                return;
            }
            _ = ticker.tick() => {}
        }
        ticks += 1;

        match run_cycle(routes, source, sink, params).await {
            Ok(outcome) if outcome.executed => {
                info!(ticks, "[CYCLE] route executed");
            }
            Ok(outcome) => {
                if ticks % 5 == 0 {
                    debug!(
                        ticks,
                        evaluated = outcome.evaluated,
                        "[HEARTBEAT] no route above threshold"
                    );
                }
            }
            Err(e) => warn!(error = %e, "[CYCLE] cycle failed"),
        }
    }
}
