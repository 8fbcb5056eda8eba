//! Risk scoring: threshold bands and the multi-factor scorer.

pub mod bands;
pub mod scorer;

pub use bands::{ScoreBand, ScoreBands};
pub use scorer::{RiskScorer, ScoringConfig, ScoringInput};
