/// json round trip - decode a request body, calculate, then look the loan up
use chrono::{TimeZone, Utc};
use salary_advance_rs::{AdvanceEngine, SafeTimeProvider, TimeSource};
use tracing_subscriber::EnvFilter;

const BODY: &str = r#"{
    "gross_salary": 1800,
    "pay_frequency": "Bi-Weekly",
    "advance_amount": 750,
    "loan_amount": 2400,
    "interest_rate": 7.5,
    "loan_term": 6,
    "include_amortization": true
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("salary_advance_rs=debug")),
        )
        .compact()
        .init();

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    ));
    let engine = AdvanceEngine::new();

    let response = engine.calculate_json(BODY, &time)?;
    println!("calculated:\n{}\n", response.to_json_pretty()?);

    if let Some(loan_id) = &response.loan_id {
        let record = engine.fetch_record(loan_id)?;
        println!("recorded at {}", record.created_at.to_rfc3339());
        assert_eq!(engine.lookup(loan_id)?, response);
    }

    match engine.lookup("00000000-0000-0000-0000-000000000000") {
        Err(err) if err.is_not_found() => println!("unknown loan: {}", err),
        other => println!("unexpected: {:?}", other),
    }

    Ok(())
}
