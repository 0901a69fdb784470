use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Trading days per calendar unit. Fixed approximations, not calendar-aware.
pub const TRADING_DAYS_PER_WEEK: u32 = 5;
pub const TRADING_DAYS_PER_MONTH: u32 = 21;
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// Calendar unit of a requested horizon, always in plural canonical form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Days,
    Weeks,
    Months,
    Years,
}

impl TimeUnit {
    pub const ALL: [Self; 4] = [Self::Days, Self::Weeks, Self::Months, Self::Years];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
            Self::Years => "years",
        }
    }

    pub const fn trading_days(self) -> u32 {
        match self {
            Self::Days => 1,
            Self::Weeks => TRADING_DAYS_PER_WEEK,
            Self::Months => TRADING_DAYS_PER_MONTH,
            Self::Years => TRADING_DAYS_PER_YEAR,
        }
    }
}

impl Display for TimeUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeUnit {
    type Err = ValidationError;

    /// Singular and plural spellings collapse to the plural unit.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lowered = value.trim().to_ascii_lowercase();
        match lowered.strip_suffix('s').unwrap_or(&lowered) {
            "day" => Ok(Self::Days),
            "week" => Ok(Self::Weeks),
            "month" => Ok(Self::Months),
            "year" => Ok(Self::Years),
            _ => Err(ValidationError::InvalidTimeUnit { value: lowered }),
        }
    }
}

/// Requested forecast distance in calendar units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Horizon {
    pub count: u32,
    pub unit: TimeUnit,
}

impl Horizon {
    pub const fn new(count: u32, unit: TimeUnit) -> Self {
        Self { count, unit }
    }

    pub const fn days(count: u32) -> Self {
        Self::new(count, TimeUnit::Days)
    }

    pub fn trading_days(self) -> usize {
        horizon_to_trading_days(self.count, self.unit)
    }
}

impl Display for Horizon {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.count, self.unit)
    }
}

/// days→n, weeks→5n, months→21n, years→252n.
pub fn horizon_to_trading_days(count: u32, unit: TimeUnit) -> usize {
    count as usize * unit.trading_days() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_units_to_trading_days() {
        assert_eq!(horizon_to_trading_days(2, TimeUnit::Weeks), 10);
        assert_eq!(horizon_to_trading_days(1, TimeUnit::Months), 21);
        assert_eq!(horizon_to_trading_days(1, TimeUnit::Years), 252);
        assert_eq!(horizon_to_trading_days(4, TimeUnit::Days), 4);
        assert_eq!(horizon_to_trading_days(0, TimeUnit::Days), 0);
    }

    #[test]
    fn unit_parsing_collapses_to_plural() {
        assert_eq!("day".parse::<TimeUnit>(), Ok(TimeUnit::Days));
        assert_eq!("Weeks".parse::<TimeUnit>(), Ok(TimeUnit::Weeks));
        assert_eq!("month".parse::<TimeUnit>(), Ok(TimeUnit::Months));
        assert!("fortnight".parse::<TimeUnit>().is_err());
    }

    #[test]
    fn displays_count_and_unit() {
        assert_eq!(Horizon::new(3, TimeUnit::Days).to_string(), "3 days");
        assert_eq!(Horizon::new(1, TimeUnit::Weeks).to_string(), "1 weeks");
    }
}
