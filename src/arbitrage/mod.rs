//! Arbitrage core: simulation, depth standardization, evaluation, selection.

pub mod depth;
pub mod evaluator;
pub mod selector;
pub mod simulator;

pub use depth::standardize;
pub use evaluator::{compound_fee, evaluate};
pub use selector::{clears_threshold, select_best};
pub use simulator::{apply_leg, simulate};
