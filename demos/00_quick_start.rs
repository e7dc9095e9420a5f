/// quick start - minimal example to get started
use salary_advance_rs::{AdvanceEngine, AdvanceRequest, Money, PayFrequency, SafeTimeProvider, TimeSource};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("salary_advance_rs=info")),
        )
        .compact()
        .init();

    let engine = AdvanceEngine::new();
    let time = SafeTimeProvider::new(TimeSource::System);

    // $5,000 a month, asking for $1,000
    let request = AdvanceRequest::new(
        Money::from_major(5_000),
        PayFrequency::Monthly,
        Money::from_major(1_000),
    );

    let response = engine.calculate(request, &time)?;
    println!("{}", response.to_json_pretty()?);

    // $800 a month does not qualify
    let declined = engine.calculate(
        AdvanceRequest::new(Money::from_major(800), PayFrequency::Monthly, Money::from_major(100)),
        &time,
    )?;
    println!("{}", declined.message);

    Ok(())
}
