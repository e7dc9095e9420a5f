pub mod eligibility;
pub mod fee;
pub mod frequency;

pub use eligibility::EligibilityEvaluator;
pub use fee::FeeCalculator;
pub use frequency::PayFrequency;
