/// loan schedule - interest projection and amortization table
use salary_advance_rs::{AmortizationScheduler, InterestProjector, LoanTerms, Money, Rate};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== loan schedule ===\n");

    let terms = LoanTerms::new(Money::from_major(5_000), Rate::from_percentage(5), 12);

    let total = InterestProjector::new().total_repayable(&terms)?;
    println!("total repayable with monthly compounding: {}", total.to_currency());

    let schedule = AmortizationScheduler::new().schedule(&terms)?;
    println!("\n{:>6} {:>12} {:>12} {:>12} {:>12}", "period", "payment", "interest", "principal", "balance");
    for entry in &schedule.entries {
        println!(
            "{:>6} {:>12} {:>12} {:>12} {:>12}",
            entry.period,
            entry.payment.to_currency(),
            entry.interest_portion.to_currency(),
            entry.principal_portion.to_currency(),
            entry.remaining_balance.to_currency(),
        );
    }

    println!("\ntotal paid:     {}", schedule.total_payment.to_currency());
    println!("total interest: {}", schedule.total_interest.to_currency());

    Ok(())
}
