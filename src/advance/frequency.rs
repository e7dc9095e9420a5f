use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::decimal::Money;
use crate::errors::{AdvanceError, Result};

/// how often a salary is paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayFrequency {
    Weekly,
    #[serde(rename = "Bi-Weekly", alias = "BiWeekly")]
    BiWeekly,
    Monthly,
    Annually,
}

impl PayFrequency {
    pub const ALL: [PayFrequency; 4] = [
        PayFrequency::Weekly,
        PayFrequency::BiWeekly,
        PayFrequency::Monthly,
        PayFrequency::Annually,
    ];

    /// pay periods in a year
    pub fn periods_per_year(&self) -> u32 {
        match self {
            PayFrequency::Weekly => 52,
            PayFrequency::BiWeekly => 26,
            PayFrequency::Monthly => 12,
            PayFrequency::Annually => 1,
        }
    }

    /// exact monthly equivalent of a gross salary quoted per pay period
    pub fn monthly_amount(&self, gross_salary: Money) -> Result<Decimal> {
        let gross = gross_salary.as_decimal();
        match self {
            PayFrequency::Monthly => Ok(gross),
            other => gross
                .checked_mul(Decimal::from(other.periods_per_year()))
                .and_then(|annual| annual.checked_div(Decimal::from(12)))
                .ok_or_else(|| AdvanceError::overflow("monthly salary")),
        }
    }

    /// monthly equivalent at internal precision
    pub fn to_monthly(&self, gross_salary: Money) -> Result<Money> {
        self.monthly_amount(gross_salary).map(Money::from_decimal)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PayFrequency::Weekly => "Weekly",
            PayFrequency::BiWeekly => "Bi-Weekly",
            PayFrequency::Monthly => "Monthly",
            PayFrequency::Annually => "Annually",
        }
    }
}

impl fmt::Display for PayFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayFrequency {
    type Err = AdvanceError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Weekly" => Ok(PayFrequency::Weekly),
            "Bi-Weekly" | "BiWeekly" => Ok(PayFrequency::BiWeekly),
            "Monthly" => Ok(PayFrequency::Monthly),
            "Annually" => Ok(PayFrequency::Annually),
            other => Err(AdvanceError::InvalidFrequency {
                tag: other.to_string(),
            }),
        }
    }
}
