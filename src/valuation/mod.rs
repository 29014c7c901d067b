// Valuation engine: z-scores, VOR, auction dollar conversion.

pub mod auction;
pub mod projections;
pub mod scarcity;
pub mod vor;
pub mod zscore;
