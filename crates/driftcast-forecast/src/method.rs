use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Forecasting method selectable by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    #[default]
    EmaDrift,
    LinearTrend,
    MeanReversion,
    BaselineDrift,
    Ensemble,
    LightMl,
}

impl Method {
    pub const ALL: [Self; 6] = [
        Self::EmaDrift,
        Self::LinearTrend,
        Self::MeanReversion,
        Self::BaselineDrift,
        Self::Ensemble,
        Self::LightMl,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmaDrift => "ema_drift",
            Self::LinearTrend => "linear_trend",
            Self::MeanReversion => "mean_reversion",
            Self::BaselineDrift => "baseline_drift",
            Self::Ensemble => "ensemble",
            Self::LightMl => "light_ml",
        }
    }

    /// Parses a method name, falling back to [`Method::EmaDrift`].
    ///
    /// ```rust
    /// use driftcast_forecast::Method;
    ///
    /// assert_eq!(Method::parse_or_default(" Linear_Trend "), Method::LinearTrend);
    /// assert_eq!(Method::parse_or_default("garch"), Method::EmaDrift);
    /// ```
    pub fn parse_or_default(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            debug!(method = value, "unknown method, using ema_drift");
            Self::default()
        })
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized method name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown forecasting method '{0}'")]
pub struct UnknownMethod(pub String);

impl FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lowered = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == lowered)
            .ok_or(UnknownMethod(lowered))
    }
}
