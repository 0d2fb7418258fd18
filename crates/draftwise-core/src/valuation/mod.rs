// Valuation: positional scarcity and recommendation scoring.

pub mod scarcity;
pub mod scoring;
