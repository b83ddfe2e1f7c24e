use clap::Args;
use serde_json::Value;

use rei_calc_core::pricing::target_price::{self, PriceTargetInput};

use crate::input;

/// Arguments for purchase price suggestion
#[derive(Args)]
pub struct SuggestPriceArgs {
    /// Path to JSON file with the target and deal assumptions
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_suggest_price(args: SuggestPriceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input: PriceTargetInput = input::load(&args.input)?;
    let output = target_price::suggest_price(&input)?;
    Ok(serde_json::to_value(output)?)
}
