/// shared ledger - one ledger behind engines running on several threads
use std::sync::Arc;

use salary_advance_rs::{
    AdvanceEngine, AdvancePolicy, AdvanceRequest, InMemoryLoanLedger, Money, PayFrequency,
    SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let ledger = Arc::new(InMemoryLoanLedger::new());
    let engine = AdvanceEngine::with_ledger(AdvancePolicy::standard(), ledger.clone())?;

    let loan_ids = std::thread::scope(|scope| {
        let workers: Vec<_> = PayFrequency::ALL
            .into_iter()
            .map(|frequency| {
                let engine = engine.clone();
                scope.spawn(move || {
                    let time = SafeTimeProvider::new(TimeSource::System);
                    let request = AdvanceRequest::new(
                        Money::from_major(2_500),
                        frequency,
                        Money::from_major(300),
                    );
                    engine.calculate(request, &time).map(|r| (frequency, r))
                })
            })
            .collect();

        workers
            .into_iter()
            .map(|w| w.join().expect("worker panicked"))
            .collect::<Result<Vec<_>, _>>()
    })?;

    for (frequency, response) in &loan_ids {
        println!(
            "{:>10}: eligible={} approved={} fee={} id={:?}",
            frequency.as_str(),
            response.eligible,
            response.approved_amount.to_currency(),
            response.fee.to_currency(),
            response.loan_id,
        );
    }
    println!("ledger holds {} loans", ledger.len()?);

    Ok(())
}
