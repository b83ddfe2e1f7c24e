use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ReiCalcError;
use crate::types::{with_metadata, Amount, ComputationOutput, Money, Rate};
use crate::ReiCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for buy-hold-sell profitability. `cash_to_close` and `monthly_cost`
/// come from a prior cost-basis analysis of the same purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlipInput {
    pub purchase_price: Money,
    /// Whether the purchase was all cash
    pub all_cash: bool,
    /// Expected sale price after rehab
    pub after_repair_value: Money,
    /// Listing agent commission: dollar or fraction of ARV
    pub agent_commission: Amount,
    /// Cash deployed at close (down payment + rehab + closing + one-time costs)
    pub cash_to_close: Money,
    /// Monthly carrying cost during the hold
    pub monthly_cost: Money,
    pub months_held: u32,
    /// Rent collected during the hold, if any
    pub monthly_rent: Money,
    /// Vacancy allowance as a fraction of monthly rent
    pub vacancy_rate: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlipOutput {
    /// ARV net of agent commission
    pub sale_proceeds: Money,
    pub agent_commission: Money,
    /// Cash at close plus carrying cost over the hold
    pub total_holding_cost: Money,
    pub total_profit: Money,
    /// Profit over purchase price
    pub return_on_purchase: Option<Decimal>,
    /// Profit over total holding cost — a different denominator, not
    /// interchangeable with `return_on_purchase`
    pub cash_roi: Option<Decimal>,
    /// Informational: rent less carrying cost and vacancy during the hold
    pub monthly_cashflow: Money,
    pub annual_cashflow: Money,
    /// ceil(cash at close / cashflow). Negative when cashflow is negative;
    /// undefined at exactly zero cashflow.
    pub months_to_break_even: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Analyze net profit and return metrics for a buy-hold-sell exit.
pub fn analyze_flip(input: &FlipInput) -> ReiCalcResult<ComputationOutput<FlipOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.after_repair_value <= Decimal::ZERO {
        return Err(ReiCalcError::InvalidInput {
            field: "after_repair_value".into(),
            reason: "After-repair value must be positive".into(),
        });
    }

    let agent_commission = input.agent_commission.resolve(input.after_repair_value);
    let sale_proceeds = input.after_repair_value - agent_commission;

    let total_holding_cost =
        input.cash_to_close + Decimal::from(input.months_held) * input.monthly_cost;

    // Cash purchases treat the holding cost as the full capital commitment
    // (cash at close already contains the price). Financed purchases must
    // also retire the price at sale, so it is subtracted separately.
    let total_profit = if input.all_cash {
        input.after_repair_value - (total_holding_cost + agent_commission)
    } else {
        input.after_repair_value - (input.purchase_price + agent_commission + total_holding_cost)
    };

    let return_on_purchase = if input.purchase_price.is_zero() {
        None
    } else {
        Some(total_profit / input.purchase_price)
    };

    let cash_roi = if total_holding_cost.is_zero() {
        None
    } else {
        Some(total_profit / total_holding_cost)
    };

    let vacancy_loss = input.monthly_rent * input.vacancy_rate;
    let monthly_cashflow = input.monthly_rent - (input.monthly_cost + vacancy_loss);
    let annual_cashflow = monthly_cashflow * dec!(12);

    let months_to_break_even = if monthly_cashflow.is_zero() {
        None
    } else {
        Some((input.cash_to_close / monthly_cashflow).ceil())
    };

    if total_profit < Decimal::ZERO {
        warnings.push("Flip loses money at these assumptions".into());
    }

    let output = FlipOutput {
        sale_proceeds: sale_proceeds.round_dp(2),
        agent_commission: agent_commission.round_dp(2),
        total_holding_cost: total_holding_cost.round_dp(2),
        total_profit: total_profit.round_dp(2),
        return_on_purchase,
        cash_roi,
        monthly_cashflow: monthly_cashflow.round_dp(2),
        annual_cashflow: annual_cashflow.round_dp(2),
        months_to_break_even,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Flip Profitability (Buy-Hold-Sell)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
