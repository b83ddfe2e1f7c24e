use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Residential
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_costs(input_json: String) -> NapiResult<String> {
    let input: rei_calc_core::residential::costs::PurchaseCostsInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        rei_calc_core::residential::costs::analyze_costs(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_refinance(input_json: String) -> NapiResult<String> {
    let input: rei_calc_core::residential::brrrr::RefinanceInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        rei_calc_core::residential::brrrr::analyze_refinance(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_flip(input_json: String) -> NapiResult<String> {
    let input: rei_calc_core::residential::flip::FlipInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = rei_calc_core::residential::flip::analyze_flip(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Commercial
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_multifamily(input_json: String) -> NapiResult<String> {
    let input: rei_calc_core::commercial::multifamily::MultifamilyInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = rei_calc_core::commercial::multifamily::analyze_multifamily(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Wholesale
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_assignment(input_json: String) -> NapiResult<String> {
    let input: rei_calc_core::wholesale::assignment::WholesaleInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = rei_calc_core::wholesale::assignment::analyze_assignment(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

#[napi]
pub fn suggest_price(input_json: String) -> NapiResult<String> {
    let input: rei_calc_core::pricing::target_price::PriceTargetInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        rei_calc_core::pricing::target_price::suggest_price(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
