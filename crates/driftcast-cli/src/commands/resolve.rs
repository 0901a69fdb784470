use driftcast_core::{extract_company_query, Resolution};
use driftcast_forecast::Engine;
use serde::Serialize;

use crate::cli::InputArgs;
use crate::error::CliError;

use super::{envelope_error, CommandResult};

#[derive(Debug, Serialize)]
struct ResolveResponseData {
    query: String,
    company_query: Option<String>,
    strategy: String,
    #[serde(flatten)]
    resolution: Resolution,
}

pub async fn run(args: &InputArgs, engine: &Engine) -> Result<CommandResult, CliError> {
    let query = args.text();
    let resolution = engine.resolve(&query).await;
    let unresolved = matches!(resolution, Resolution::Unresolved { .. });

    let data = serde_json::to_value(ResolveResponseData {
        company_query: extract_company_query(&query),
        strategy: engine.config().strategy.to_string(),
        query,
        resolution,
    })?;

    let result = CommandResult::ok(data);
    if unresolved {
        return Ok(result.with_error(envelope_error(
            "resolve.unresolved",
            "no ticker validated for this input",
            engine.source_id(),
        )?));
    }
    Ok(result)
}
