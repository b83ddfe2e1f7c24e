use clap::Args;
use serde_json::Value;

use rei_calc_core::commercial::multifamily::{self, MultifamilyInput};

use crate::input;

/// Arguments for commercial multi-family analysis
#[derive(Args)]
pub struct MultifamilyArgs {
    /// Path to JSON file with the acquisition inputs
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_multifamily(args: MultifamilyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input: MultifamilyInput = input::load(&args.input)?;
    let output = multifamily::analyze_multifamily(&input)?;
    Ok(serde_json::to_value(output)?)
}
