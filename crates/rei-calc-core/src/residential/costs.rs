use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ReiCalcError;
use crate::expenses::{self, OperatingExpenses};
use crate::mortgage;
use crate::types::{with_metadata, Amount, ComputationOutput, Money, Rate};
use crate::ReiCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input parameters for the purchase cost basis of a rental acquisition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseCostsInput {
    /// Contract purchase price
    pub purchase_price: Money,
    /// All-cash purchase: forces 100% down and zeroes every loan branch
    pub all_cash: bool,
    /// Down payment, dollar or fraction of purchase price
    pub down_payment: Amount,
    /// Annual note rate (0.06 = 6%)
    pub annual_rate: Rate,
    /// Interest-only loan: payment is interest with no principal paydown
    pub interest_only: bool,
    /// Amortization term in years
    pub loan_term_years: u32,
    /// Property tax: annual dollars, or annual fraction of purchase price
    pub property_tax: Amount,
    /// Monthly insurance premium
    pub monthly_insurance: Money,
    /// CapEx reserve: annual dollars, or fraction of monthly rent
    pub capex: Amount,
    /// Up-front rehab budget
    pub rehab_cost: Money,
    /// Closing costs: dollar or fraction of purchase price
    pub closing_costs: Amount,
    /// Gross monthly rent
    pub monthly_rent: Money,
    /// Months the property is held before exit or refinance
    pub months_held: u32,
    /// Itemized operating expense schedule
    #[serde(default)]
    pub operating_expenses: OperatingExpenses,
}

/// Purchase cost basis. Field order follows the display order of the
/// consuming screens: mortgage first, then the monthly and cash totals,
/// then the per-line breakdowns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseCostsOutput {
    /// Monthly debt service including any PMI-equivalent surcharge
    pub monthly_mortgage: Money,
    /// Total monthly cost: mortgage plus all recurring expenses
    pub monthly_cost: Money,
    /// Cash required at close: down payment + rehab + closing + one-time expenses
    pub cash_to_close: Money,
    /// Recurring monthly expenses excluding debt service
    pub monthly_expenses: Money,
    /// Principal outstanding after `months_held` payments
    pub principal_remaining: Money,
    /// Rent / (mortgage + property tax). Undefined for cash purchases.
    pub dscr: Option<Decimal>,
    pub monthly_property_tax: Money,
    pub monthly_capex: Money,
    /// Monthly share of the itemized operating expense schedule
    pub monthly_operating_expenses: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Analyze the full cost basis of a financed or all-cash purchase: debt
/// service with low-down-payment surcharges, recurring monthly expenses,
/// cash required at close, and the principal balance at exit.
pub fn analyze_costs(
    input: &PurchaseCostsInput,
) -> ReiCalcResult<ComputationOutput<PurchaseCostsOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input, &mut warnings)?;

    // --- Down payment and loan sizing ---
    let financing = mortgage::resolve_financing(
        input.purchase_price,
        input.all_cash,
        input.down_payment,
        &mut warnings,
    )?;

    // --- Debt service ---
    // Base payment first; PMI rides on top and never amortizes principal.
    let base_payment = if input.all_cash {
        Decimal::ZERO
    } else {
        mortgage::monthly_payment(
            financing.loan_amount,
            input.annual_rate,
            input.loan_term_years,
            input.interest_only,
        )?
    };

    let pmi = if !input.all_cash && financing.down_payment_pct < mortgage::PMI_DOWN_PAYMENT_THRESHOLD
    {
        mortgage::pmi_monthly(financing.loan_amount)
    } else {
        Decimal::ZERO
    };

    let monthly_mortgage = base_payment + pmi;

    let principal_remaining = if input.all_cash {
        Decimal::ZERO
    } else {
        mortgage::remaining_principal(
            financing.loan_amount,
            input.annual_rate,
            base_payment,
            input.months_held,
        )
    };

    // --- Recurring expenses ---
    let monthly_property_tax = input.property_tax.per_month_of_annual(input.purchase_price);
    let monthly_capex = input.capex.per_month_reserve(input.monthly_rent);
    let op_totals = expenses::aggregate(&input.operating_expenses);

    let monthly_expenses =
        monthly_property_tax + input.monthly_insurance + monthly_capex + op_totals.monthly;
    let monthly_cost = monthly_mortgage + monthly_expenses;

    // --- DSCR: meaningless with no debt service ---
    let dscr = if input.all_cash {
        None
    } else {
        let debt_obligation = monthly_mortgage + monthly_property_tax;
        if debt_obligation.is_zero() {
            None
        } else {
            Some(input.monthly_rent / debt_obligation)
        }
    };

    // --- Cash at close ---
    let cash_to_close = financing.down_payment
        + input.rehab_cost
        + input.closing_costs.resolve(input.purchase_price)
        + op_totals.one_time;

    let output = PurchaseCostsOutput {
        monthly_mortgage: monthly_mortgage.round_dp(2),
        monthly_cost: monthly_cost.round_dp(2),
        cash_to_close: cash_to_close.round_dp(2),
        monthly_expenses: monthly_expenses.round_dp(2),
        principal_remaining: principal_remaining.round_dp(2),
        dscr,
        monthly_property_tax: monthly_property_tax.round_dp(2),
        monthly_capex: monthly_capex.round_dp(2),
        monthly_operating_expenses: op_totals.monthly.round_dp(2),
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Rental Purchase Cost Basis",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &PurchaseCostsInput, warnings: &mut Vec<String>) -> ReiCalcResult<()> {
    if input.purchase_price <= Decimal::ZERO {
        return Err(ReiCalcError::InvalidInput {
            field: "purchase_price".into(),
            reason: "Purchase price must be positive".into(),
        });
    }

    if !input.all_cash && !input.interest_only && input.loan_term_years == 0 {
        return Err(ReiCalcError::InvalidInput {
            field: "loan_term_years".into(),
            reason: "Amortizing loan term must be at least 1 year".into(),
        });
    }

    if input.monthly_rent < Decimal::ZERO {
        warnings.push("Negative monthly rent — results will propagate the sign".into());
    }

    if input.annual_rate > dec!(0.20) {
        warnings.push(format!(
            "Note rate {:.1}% exceeds 20% — verify input units (rates are decimals)",
            input.annual_rate * dec!(100)
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
