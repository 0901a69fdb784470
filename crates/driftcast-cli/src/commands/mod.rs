mod backtest;
mod diagnostics;
mod duration;
mod history;
mod predict;
mod resolve;

use std::sync::Arc;
use std::time::Instant;

use driftcast_core::{
    EngineConfig, Envelope, EnvelopeError, FixtureSource, PriceSource, ProviderId, YahooAdapter,
};
use driftcast_forecast::{Engine, Method};
use serde_json::Value;
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::metadata::Metadata;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_error(mut self, error: EnvelopeError) -> Self {
        self.errors.push(error);
        self
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let config = engine_config(cli)?;
    debug!(?config, offline = cli.offline, "engine configuration");
    let engine = Engine::new(price_source(cli.offline, &config), config);

    let started = Instant::now();
    let command_result = match &cli.command {
        Command::Predict(args) => predict::run(args, &engine).await?,
        Command::Diagnostics(args) => diagnostics::run(args, &engine).await?,
        Command::Resolve(args) => resolve::run(args, &engine).await?,
        Command::Backtest(args) => backtest::run(args, &engine).await?,
        Command::History(args) => history::run(args, &engine).await?,
        Command::Duration(args) => duration::run(args)?,
    };
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let CommandResult {
        data,
        warnings,
        errors,
    } = command_result;

    let mut metadata = Metadata::new(vec![engine.source_id()], latency_ms)?;
    if cli.offline {
        metadata.push_warning("offline mode: prices are synthetic demo data");
    }
    for warning in warnings {
        metadata.push_warning(warning);
    }

    let meta = metadata.into_envelope_meta()?;
    Envelope::with_errors(meta, data, errors).map_err(CliError::from)
}

/// Environment overrides first, then explicit flags.
fn engine_config(cli: &Cli) -> Result<EngineConfig, CliError> {
    let mut config = EngineConfig::from_env()?;
    if let Some(strategy) = cli.strategy {
        config = config.with_strategy(strategy.into());
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        if timeout_ms == 0 {
            return Err(CliError::Command(String::from(
                "--timeout-ms must be greater than zero",
            )));
        }
        config = config.with_timeout_ms(timeout_ms);
    }
    Ok(config)
}

fn price_source(offline: bool, config: &EngineConfig) -> Arc<dyn PriceSource> {
    if offline {
        Arc::new(FixtureSource::demo())
    } else {
        Arc::new(YahooAdapter::default().with_timeout_ms(config.timeout_ms))
    }
}

/// Parses `--method`, warning when the name is unknown.
fn parse_method(raw: &str) -> (Method, Option<String>) {
    match raw.parse::<Method>() {
        Ok(method) => (method, None),
        Err(error) => (
            Method::default(),
            Some(format!("{error}; using {}", Method::default())),
        ),
    }
}

fn envelope_error(
    code: &str,
    message: impl Into<String>,
    source: ProviderId,
) -> Result<EnvelopeError, CliError> {
    Ok(EnvelopeError::new(code, message)?.with_source(source))
}
