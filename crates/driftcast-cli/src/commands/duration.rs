use driftcast_core::{parse_duration_match, strip_duration_phrases, Horizon, MatchKind};
use serde::Serialize;

use crate::cli::InputArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct DurationResponseData {
    input: String,
    horizon: Option<Horizon>,
    duration: Option<String>,
    trading_days: Option<usize>,
    matched_by: Option<MatchKind>,
    remainder: String,
}

pub fn run(args: &InputArgs) -> Result<CommandResult, CliError> {
    let input = args.text();
    let found = parse_duration_match(&input);

    let data = serde_json::to_value(DurationResponseData {
        horizon: found.map(|found| found.horizon),
        duration: found.map(|found| found.horizon.to_string()),
        trading_days: found.map(|found| found.horizon.trading_days()),
        matched_by: found.map(|found| found.kind),
        remainder: strip_duration_phrases(&input),
        input,
    })?;

    let result = CommandResult::ok(data);
    Ok(if found.is_none() {
        result.with_warning("no duration found in input")
    } else {
        result
    })
}
