//! Investability scoring engine.
//!
//! A pure, deterministic mapping from a company profile's current state to a
//! 0–100 score, a per-category breakdown and human-readable guidance. Never
//! persisted; always recomputable from the aggregate.

pub mod score;

pub use score::{Recommendation, ScoreBreakdown, ScoreView, compute_score};
