pub mod compound;

pub use compound::{compound_factor, InterestProjector, MONTHLY_COMPOUNDING};
