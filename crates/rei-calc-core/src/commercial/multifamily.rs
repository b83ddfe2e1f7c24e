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

/// Input for a multi-family (commercial) acquisition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultifamilyInput {
    pub purchase_price: Money,
    pub all_cash: bool,
    /// Down payment, dollar or fraction of purchase price
    pub down_payment: Amount,
    pub annual_rate: Rate,
    pub interest_only: bool,
    pub loan_term_years: u32,
    /// Total scheduled rent across all units, per month
    pub monthly_rent: Money,
    /// Fee income: parking, laundry, storage, pet rent
    pub other_monthly_income: Money,
    /// Vacancy allowance as a fraction of monthly rent
    pub vacancy_rate: Rate,
    /// CapEx reserve as a fraction of monthly rent
    pub capex_rate: Rate,
    /// Property tax: annual dollars, or annual fraction of purchase price
    pub property_tax: Amount,
    pub monthly_insurance: Money,
    /// Closing costs: dollar or fraction of purchase price
    pub closing_costs: Amount,
    /// Broker, inspection, legal and lender fees at acquisition
    pub acquisition_fees: Money,
    #[serde(default)]
    pub operating_expenses: OperatingExpenses,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultifamilyOutput {
    /// Monthly debt service including any PMI-equivalent surcharge
    pub monthly_mortgage: Money,
    /// Scheduled rent plus fee income
    pub gross_monthly_income: Money,
    pub monthly_property_tax: Money,
    pub monthly_capex: Money,
    /// Vacancy + CapEx + tax + insurance + itemized schedule. Vacancy is
    /// folded in here, unlike the BRRRR analyzer.
    pub monthly_operating_expenses: Money,
    /// Operating expenses plus debt service
    pub monthly_cost: Money,
    /// Down payment + closing + acquisition fees + one-time expenses
    pub acquisition_cost: Money,
    pub monthly_cashflow: Money,
    pub annual_cashflow: Money,
    /// Annual NOI over purchase price
    pub cap_rate: Option<Decimal>,
    /// Annual cashflow over acquisition cost
    pub cash_on_cash: Option<Decimal>,
    /// Gross income / (mortgage + property tax). Undefined for cash purchases.
    pub dscr: Option<Decimal>,
    /// ceil(acquisition cost / cashflow); undefined at zero cashflow
    pub months_to_break_even: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Analyze a multi-family acquisition: financing with low-down surcharges,
/// gross income aggregation, operating expenses with vacancy folded in,
/// and the standard acquisition return metrics.
pub fn analyze_multifamily(
    input: &MultifamilyInput,
) -> ReiCalcResult<ComputationOutput<MultifamilyOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input, &mut warnings)?;

    // --- Financing ---
    let financing = mortgage::resolve_financing(
        input.purchase_price,
        input.all_cash,
        input.down_payment,
        &mut warnings,
    )?;

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

    // --- Income ---
    let gross_monthly_income = input.monthly_rent + input.other_monthly_income;

    // --- Operating expenses, vacancy folded in ---
    let monthly_vacancy = input.monthly_rent * input.vacancy_rate;
    let monthly_capex = input.monthly_rent * input.capex_rate;
    let monthly_property_tax = input.property_tax.per_month_of_annual(input.purchase_price);
    let op_totals = expenses::aggregate(&input.operating_expenses);

    let monthly_operating_expenses = monthly_vacancy
        + monthly_capex
        + monthly_property_tax
        + input.monthly_insurance
        + op_totals.monthly;

    let monthly_cost = monthly_mortgage + monthly_operating_expenses;
    let monthly_cashflow = gross_monthly_income - monthly_cost;
    let annual_cashflow = monthly_cashflow * dec!(12);

    // --- Acquisition cost ---
    let acquisition_cost = financing.down_payment
        + input.closing_costs.resolve(input.purchase_price)
        + input.acquisition_fees
        + op_totals.one_time;

    // --- Return metrics ---
    let monthly_noi = gross_monthly_income - monthly_operating_expenses;
    let cap_rate = if input.purchase_price.is_zero() {
        None
    } else {
        Some(monthly_noi * dec!(12) / input.purchase_price)
    };

    let cash_on_cash = if acquisition_cost.is_zero() {
        None
    } else {
        Some(annual_cashflow / acquisition_cost)
    };

    let dscr = if input.all_cash {
        None
    } else {
        let debt_obligation = monthly_mortgage + monthly_property_tax;
        if debt_obligation.is_zero() {
            None
        } else {
            Some(gross_monthly_income / debt_obligation)
        }
    };

    let months_to_break_even = if monthly_cashflow.is_zero() {
        None
    } else {
        Some((acquisition_cost / monthly_cashflow).ceil())
    };

    if let Some(d) = dscr {
        if d < dec!(1.2) && d > Decimal::ZERO {
            warnings.push(format!("DSCR of {d:.2} is below 1.20x — lender covenant risk"));
        }
    }

    let output = MultifamilyOutput {
        monthly_mortgage: monthly_mortgage.round_dp(2),
        gross_monthly_income: gross_monthly_income.round_dp(2),
        monthly_property_tax: monthly_property_tax.round_dp(2),
        monthly_capex: monthly_capex.round_dp(2),
        monthly_operating_expenses: monthly_operating_expenses.round_dp(2),
        monthly_cost: monthly_cost.round_dp(2),
        acquisition_cost: acquisition_cost.round_dp(2),
        monthly_cashflow: monthly_cashflow.round_dp(2),
        annual_cashflow: annual_cashflow.round_dp(2),
        cap_rate,
        cash_on_cash,
        dscr,
        months_to_break_even,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Commercial Multi-Family Acquisition Analysis",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &MultifamilyInput, warnings: &mut Vec<String>) -> ReiCalcResult<()> {
    if input.purchase_price <= Decimal::ZERO {
        return Err(ReiCalcError::InvalidInput {
            field: "purchase_price".into(),
            reason: "Purchase price must be positive".into(),
        });
    }

    if input.vacancy_rate < Decimal::ZERO || input.vacancy_rate >= Decimal::ONE {
        return Err(ReiCalcError::InvalidInput {
            field: "vacancy_rate".into(),
            reason: "Vacancy rate must be between 0 and 1 (exclusive upper)".into(),
        });
    }

    if input.vacancy_rate > dec!(0.15) {
        warnings.push(format!(
            "Vacancy rate {:.1}% exceeds 15% — above typical market norms",
            input.vacancy_rate * dec!(100)
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
