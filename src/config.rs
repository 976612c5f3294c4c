//! Configuration loader: `config.toml` into validated routes and parameters.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::errors::{AppError, Result};
use crate::models::{BotParams, QuoteMode, Route, Side};

/// Raw `[[routes]]` entry: leg markets are indices into the top-level
/// `markets` list. `modes` may be omitted; see `derive_modes`.
#[derive(Debug, Deserialize)]
struct RawRoute {
    markets: Vec<usize>,
    sides: Vec<Side>,
    proxy: usize,
    modes: Option<Vec<QuoteMode>>,
}

#[derive(Debug, Deserialize)]
struct RawParams {
    taker_fee: f64,
    offset: f64,
    profit_threshold: f64,
    #[serde(default = "default_poll_secs")]
    poll_interval_secs: u64,
}

fn default_poll_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    markets: Vec<String>,
    feed_endpoint: String,
    params: RawParams,
    routes: Vec<RawRoute>,
}

/// Consolidated, validated application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub markets: Vec<String>,
    pub feed_endpoint: String,
    pub params: BotParams,
    pub poll_interval: Duration,
    pub routes: Vec<Route>,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(contents)?;

        let params = BotParams {
            taker_fee: raw.params.taker_fee,
            offset: raw.params.offset,
            profit_threshold: raw.params.profit_threshold,
        };
        if !(params.taker_fee >= 0.0) {
            return Err(AppError::Config(format!(
                "taker_fee must be non-negative, got {}",
                params.taker_fee
            )));
        }
        if !(params.offset > 0.0 && params.offset <= 1.0) {
            return Err(AppError::Config(format!(
                "offset must be in (0, 1], got {}",
                params.offset
            )));
        }
        if raw.routes.is_empty() {
            return Err(AppError::Config("define at least one route".into()));
        }

        let routes = raw
            .routes
            .iter()
            .map(|r| build_route(r, &raw.markets))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            markets: raw.markets,
            feed_endpoint: raw.feed_endpoint,
            params,
            poll_interval: Duration::from_secs(raw.params.poll_interval_secs),
            routes,
        })
    }
}

fn build_route(raw: &RawRoute, markets: &[String]) -> Result<Route> {
    let leg_markets = raw
        .markets
        .iter()
        .map(|&i| {
            markets.get(i).cloned().ok_or_else(|| {
                AppError::Config(format!(
                    "route references market index {i} but only {} markets are defined",
                    markets.len()
                ))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let modes = match &raw.modes {
        Some(m) => m.clone(),
        None => derive_modes(leg_markets.len(), raw.proxy),
    };

    let route = Route {
        markets: leg_markets,
        sides: raw.sides.clone(),
        modes,
        proxy_index: raw.proxy,
    };
    route.validate()?;
    Ok(route)
}

/// Default quote modes when a route does not spell them out: the proxy leg
/// quotes through itself (Indirect), every other leg quotes the reference
/// unit directly.
pub fn derive_modes(legs: usize, proxy: usize) -> Vec<QuoteMode> {
    (0..legs)
        .map(|i| {
            if i == proxy {
                QuoteMode::Indirect
            } else {
                QuoteMode::Direct
            }
        })
        .collect()
}
