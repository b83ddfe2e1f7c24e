use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ReiCalcError;
use crate::mortgage;
use crate::types::{with_metadata, Amount, ComputationOutput, Money, Rate};
use crate::ReiCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for the refinance leg of a buy-rehab-rent-refinance deal.
///
/// The `original_*` fields and `principal_remaining` come straight out of a
/// prior [`crate::residential::costs::analyze_costs`] run on the purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinanceInput {
    /// After-repair value the new lender appraises against
    pub after_repair_value: Money,
    /// Annual note rate on the refinance loan
    pub annual_rate: Rate,
    /// Interest-only refinance loan
    pub interest_only: bool,
    /// Refinance amortization term in years
    pub loan_term_years: u32,
    /// Post-rehab monthly rent
    pub monthly_rent: Money,
    /// Vacancy allowance as a fraction of monthly rent
    pub vacancy_rate: Rate,
    /// Property tax: annual dollars, or annual fraction of ARV
    pub property_tax: Amount,
    /// CapEx reserve: annual dollars, or fraction of the new monthly rent
    pub capex: Amount,
    /// Closing costs on the refinance itself
    pub refinance_closing_costs: Money,
    /// Whether the original purchase was all cash
    pub original_all_cash: bool,
    /// Cash deployed at the original close
    pub original_cash_to_close: Money,
    /// Monthly carrying cost during the rehab/seasoning hold
    pub original_monthly_cost: Money,
    /// Months held before the refinance
    pub months_held: u32,
    /// Principal outstanding on the original loan at refinance
    pub principal_remaining: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinanceOutput {
    /// Debt service on the new 80%-LTV loan
    pub monthly_mortgage: Money,
    /// New monthly cost basis: mortgage + property tax + CapEx.
    /// Vacancy is deliberately NOT in here; see `monthly_cashflow`.
    pub monthly_cost: Money,
    /// Rent less monthly cost less vacancy allowance
    pub monthly_cashflow: Money,
    pub annual_cashflow: Money,
    /// Maximum cash-out: new loan proceeds net of the old loan's balance
    pub max_equity: Money,
    /// Max equity less everything invested to get here
    pub equity_return: Money,
    /// Equity return over total investment. Undefined when nothing was invested.
    pub equity_return_pct: Option<Decimal>,
    pub monthly_capex: Money,
    pub monthly_property_tax: Money,
    /// Annual cashflow over ORIGINAL cash at close — the return on the
    /// capital that was first deployed, which is what this strategy optimizes.
    pub cash_on_cash: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Analyze the refinance leg: new debt service at a fixed 80% LTV against
/// ARV, post-refinance cashflow, extractable equity, and return on the
/// originally deployed capital.
pub fn analyze_refinance(
    input: &RefinanceInput,
) -> ReiCalcResult<ComputationOutput<RefinanceOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.after_repair_value <= Decimal::ZERO {
        return Err(ReiCalcError::InvalidInput {
            field: "after_repair_value".into(),
            reason: "After-repair value must be positive".into(),
        });
    }

    if input.vacancy_rate > dec!(0.15) {
        warnings.push(format!(
            "Vacancy rate {:.1}% exceeds 15% — above typical market norms",
            input.vacancy_rate * dec!(100)
        ));
    }

    // --- New loan at the fixed refinance LTV ---
    let new_loan = input.after_repair_value * mortgage::REFINANCE_LTV;
    let monthly_mortgage = mortgage::monthly_payment(
        new_loan,
        input.annual_rate,
        input.loan_term_years,
        input.interest_only,
    )?;

    // --- Recomputed recurring expenses against ARV / new rent ---
    let monthly_property_tax = input.property_tax.per_month_of_annual(input.after_repair_value);
    let monthly_capex = input.capex.per_month_reserve(input.monthly_rent);
    let monthly_cost = monthly_mortgage + monthly_property_tax + monthly_capex;

    // Vacancy is netted from cashflow but kept out of the cost basis,
    // unlike the multifamily analyzer which folds it into expenses.
    let vacancy_loss = input.monthly_rent * input.vacancy_rate;
    let monthly_cashflow = input.monthly_rent - monthly_cost - vacancy_loss;
    let annual_cashflow = monthly_cashflow * dec!(12);

    // --- Extractable equity ---
    // A cash purchase has no prior lien to retire, so the whole new loan
    // comes out as proceeds.
    let max_equity = if input.original_all_cash {
        new_loan
    } else {
        new_loan - input.principal_remaining
    };

    let total_investment = input.original_cash_to_close
        + Decimal::from(input.months_held) * input.original_monthly_cost
        + input.refinance_closing_costs;

    let equity_return = max_equity - total_investment;
    let equity_return_pct = if total_investment > Decimal::ZERO {
        Some(equity_return / total_investment)
    } else {
        None
    };

    let cash_on_cash = if input.original_cash_to_close.is_zero() {
        None
    } else {
        Some(annual_cashflow / input.original_cash_to_close)
    };

    if monthly_cashflow < Decimal::ZERO {
        warnings.push("Post-refinance cashflow is negative".into());
    }

    let output = RefinanceOutput {
        monthly_mortgage: monthly_mortgage.round_dp(2),
        monthly_cost: monthly_cost.round_dp(2),
        monthly_cashflow: monthly_cashflow.round_dp(2),
        annual_cashflow: annual_cashflow.round_dp(2),
        max_equity: max_equity.round_dp(2),
        equity_return: equity_return.round_dp(2),
        equity_return_pct,
        monthly_capex: monthly_capex.round_dp(2),
        monthly_property_tax: monthly_property_tax.round_dp(2),
        cash_on_cash,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "BRRRR Refinance Analysis (80% LTV)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
