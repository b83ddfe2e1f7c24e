use clap::Args;
use serde_json::Value;

use rei_calc_core::residential::brrrr::{self, RefinanceInput};
use rei_calc_core::residential::costs::{self, PurchaseCostsInput};
use rei_calc_core::residential::flip::{self, FlipInput};

use crate::input;

/// Arguments for purchase cost analysis
#[derive(Args)]
pub struct CostsArgs {
    /// Path to JSON file with the purchase inputs
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for BRRRR refinance analysis
#[derive(Args)]
pub struct RefinanceArgs {
    /// Path to JSON file with the refinance inputs
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for flip profitability analysis
#[derive(Args)]
pub struct FlipArgs {
    /// Path to JSON file with the flip inputs
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_costs(args: CostsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input: PurchaseCostsInput = input::load(&args.input)?;
    let output = costs::analyze_costs(&input)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_refinance(args: RefinanceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input: RefinanceInput = input::load(&args.input)?;
    let output = brrrr::analyze_refinance(&input)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_flip(args: FlipArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input: FlipInput = input::load(&args.input)?;
    let output = flip::analyze_flip(&input)?;
    Ok(serde_json::to_value(output)?)
}
