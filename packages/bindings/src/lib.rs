use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Waterfall
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_waterfall(input_json: String) -> NapiResult<String> {
    let input: cap_waterfall_core::waterfall::WaterfallInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        cap_waterfall_core::waterfall::run_waterfall(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Cap table inputs
// ---------------------------------------------------------------------------

#[napi]
pub fn generate_exit_scenarios(input_json: String) -> NapiResult<String> {
    let input: cap_waterfall_core::scenarios::ScenarioInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        cap_waterfall_core::scenarios::generate_scenarios(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn validate_cap_table(input_json: String) -> NapiResult<String> {
    let input: cap_waterfall_core::waterfall::WaterfallInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let warnings = cap_waterfall_core::cap_table::validation::validate_cap_table(
        &input.share_classes,
        &input.fund_holdings,
        &input.exit_scenarios,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&serde_json::json!({ "valid": true, "warnings": warnings }))
        .map_err(to_napi_error)
}
