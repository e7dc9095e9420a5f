pub mod amortization;

pub use amortization::{AmortizationEntry, AmortizationSchedule, AmortizationScheduler};
