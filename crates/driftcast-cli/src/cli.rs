//! CLI argument definitions for driftcast.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `predict` | Resolve free text and forecast the close |
//! | `diagnostics` | Trend and volatility diagnostics |
//! | `resolve` | Resolve free text to a ticker |
//! | `backtest` | Walk-forward forecast error for a ticker |
//! | `history` | Recent daily closes |
//! | `duration` | Parse the horizon out of free text |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--offline` | `false` | Use built-in demo data instead of Yahoo |
//! | `--strategy` | `search` | Company-name resolution strategy |
//! | `--timeout-ms` | `5000` | Per-request timeout in ms |
//!
//! # Examples
//!
//! ```bash
//! driftcast predict apple in 3 days
//! driftcast predict "\$TSLA next week" --method ensemble --pretty
//! driftcast diagnostics microsoft --format table
//! driftcast backtest AAPL --k 5 --offline
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use driftcast_core::ResolutionStrategy;

/// Short-horizon stock price forecasts from free-text queries.
#[derive(Debug, Parser)]
#[command(
    name = "driftcast",
    author,
    version,
    about = "Short-horizon stock price forecasts from free-text queries",
    long_about = "driftcast resolves queries like 'microsft in 3 days' to a ticker, \
pulls daily closes and reports a drift forecast with a walk-forward error estimate.\n\
\n\
Use 'driftcast <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Serve deterministic demo data instead of calling Yahoo Finance.
    #[arg(long, global = true, default_value_t = false)]
    pub offline: bool,

    /// Company-name resolution strategy; overrides DRIFTCAST_STRATEGY.
    #[arg(long, global = true, value_enum)]
    pub strategy: Option<StrategySelector>,

    /// Per-request timeout in milliseconds; overrides DRIFTCAST_TIMEOUT_MS.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Key/value layout for terminal display.
    Table,
    /// Single JSON object.
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategySelector {
    /// Provider search ranked by name overlap.
    Search,
    /// Built-in company catalog with fuzzy matching.
    Catalog,
}

impl From<StrategySelector> for ResolutionStrategy {
    fn from(selector: StrategySelector) -> Self {
        match selector {
            StrategySelector::Search => Self::Search,
            StrategySelector::Catalog => Self::Catalog,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Forecast the close for free text such as "apple in 3 days".
    ///
    /// Without a horizon only the last close is reported.
    ///
    /// # Examples
    ///
    ///   driftcast predict apple in 3 days
    ///   driftcast predict NVDA next month --method linear_trend
    Predict(PredictArgs),

    /// Momentum, moving-average slopes, Donchian breakout and HAR-RV
    /// volatility with a position size for a 20% vol target.
    Diagnostics(InputArgs),

    /// Resolve free text to a validated ticker, or list suggestions.
    Resolve(InputArgs),

    /// Walk-forward mean absolute error of a method at horizon k.
    Backtest(BacktestArgs),

    /// The most recent daily closes for a ticker.
    History(HistoryArgs),

    /// Parse the forecast horizon out of free text.
    Duration(InputArgs),
}

/// Free text; multiple words are joined with spaces.
#[derive(Debug, Args)]
pub struct InputArgs {
    #[arg(required = true, num_args = 1..)]
    pub input: Vec<String>,
}

impl InputArgs {
    pub fn text(&self) -> String {
        self.input.join(" ")
    }
}

#[derive(Debug, Args)]
pub struct PredictArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// ema_drift, linear_trend, mean_reversion, baseline_drift, ensemble or
    /// light_ml; unknown names fall back to ema_drift.
    #[arg(long, default_value = "ema_drift")]
    pub method: String,
}

#[derive(Debug, Args)]
pub struct BacktestArgs {
    pub symbol: String,

    /// Forecast horizon in trading days.
    #[arg(long, default_value_t = 3)]
    pub k: usize,

    #[arg(long, default_value = "ema_drift")]
    pub method: String,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    pub symbol: String,

    /// Number of closes to return.
    #[arg(long, default_value_t = 90)]
    pub days: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_free_text_and_reads_globals() {
        let cli = Cli::try_parse_from([
            "driftcast",
            "predict",
            "apple",
            "in",
            "3",
            "days",
            "--method",
            "ensemble",
            "--offline",
            "--strategy",
            "catalog",
        ])
        .expect("parses");

        assert!(cli.offline);
        assert_eq!(cli.strategy, Some(StrategySelector::Catalog));
        match cli.command {
            Command::Predict(args) => {
                assert_eq!(args.input.text(), "apple in 3 days");
                assert_eq!(args.method, "ensemble");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn backtest_defaults() {
        let cli = Cli::try_parse_from(["driftcast", "backtest", "AAPL"]).expect("parses");
        match cli.command {
            Command::Backtest(args) => {
                assert_eq!(args.k, 3);
                assert_eq!(args.method, "ema_drift");
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.timeout_ms, None);
    }
}
