//! Deterministic gradient-boosted decision-stump classifier.
//!
//! Each round adds one stump's vote to a single raw score; the logistic link
//! turns the score into P(Parkinson).

mod model;

pub use model::{GbdtStumpModel, Stump};
