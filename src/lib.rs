//! Core library for the route-arbitrage project.
//!
//! Evaluates, on a fixed cadence, whether closed loops of trades across
//! several order-book markets still yield profit after per-leg taker fees
//! and a slippage offset, and triggers execution of the winning route.

pub mod arbitrage;
pub mod config;
pub mod errors;
pub mod execution;
pub mod feed;
pub mod models;
pub mod runner;
pub mod utils;
