use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use rei_calc_core::expenses::OperatingExpenses;
use rei_calc_core::wholesale::assignment::{self, WholesaleInput};

use crate::input;

/// Arguments for wholesale assignment pricing.
///
/// The deal is simple enough to express inline: pass --arv and --rehab
/// directly, or use --input / stdin for the full JSON form with an
/// itemized expense schedule.
#[derive(Args)]
pub struct WholesaleArgs {
    /// Path to JSON file with the assignment inputs
    #[arg(long)]
    pub input: Option<String>,

    /// After-repair value
    #[arg(long)]
    pub arv: Option<Decimal>,

    /// Rehab budget
    #[arg(long, default_value = "0")]
    pub rehab: Decimal,

    /// Months under contract before assignment
    #[arg(long, default_value = "0")]
    pub months_held: u32,
}

pub fn run_wholesale(args: WholesaleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = if let Some(arv) = args.arv {
        WholesaleInput {
            after_repair_value: arv,
            rehab_cost: args.rehab,
            months_held: args.months_held,
            operating_expenses: OperatingExpenses::default(),
        }
    } else {
        input::load(&args.input)?
    };

    let output = assignment::analyze_assignment(&input)?;
    Ok(serde_json::to_value(output)?)
}
