use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
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

/// Input for the purchase price suggestion solver.
///
/// Financing terms are fixed fractions here (not `Amount`s) because price is
/// the unknown: every price-relative quantity must stay symbolic until the
/// inversion produces a concrete price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceTargetInput {
    /// Desired monthly cashflow after all costs
    pub target_monthly_cashflow: Money,
    /// Down payment as a fraction of the (unknown) price
    pub down_payment_rate: Rate,
    pub annual_rate: Rate,
    pub interest_only: bool,
    pub loan_term_years: u32,
    /// Annual property tax as a fraction of the (unknown) price
    pub property_tax_rate: Rate,
    pub monthly_rent: Money,
    pub monthly_insurance: Money,
    /// CapEx reserve: annual dollars, or fraction of monthly rent.
    /// Rent is known, so this resolves before the inversion.
    pub capex: Amount,
    /// Closing costs as a fraction of the (unknown) price
    pub closing_cost_rate: Rate,
    pub rehab_cost: Money,
    #[serde(default)]
    pub operating_expenses: OperatingExpenses,
}

/// One solved price point and its implied deal figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetPrice {
    pub purchase_price: Money,
    pub loan_amount: Money,
    /// Debt service including any PMI-equivalent surcharge
    pub monthly_mortgage: Money,
    pub monthly_property_tax: Money,
    /// Mortgage + tax + insurance + CapEx + itemized schedule
    pub monthly_cost: Money,
    /// Down payment + closing costs + rehab + one-time expenses
    pub cash_required: Money,
}

/// Two price points solved in parallel: one hitting the cashflow target,
/// one at exactly break-even.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceTargetOutput {
    pub cashflow_target: TargetPrice,
    pub break_even: TargetPrice,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Solve for the maximum purchase price that achieves the target monthly
/// cashflow, and the price at which the deal exactly breaks even.
///
/// Inverts the cost model algebraically: with a fixed down-payment fraction
/// every mortgage and tax cost is linear in price, so
/// `price = budget / (effective_rate_factor + tax_rate / 12)` where the
/// effective factor carries the same sub-3.5% and sub-20% surcharges the
/// forward cost analysis applies to a known loan amount.
pub fn suggest_price(
    input: &PriceTargetInput,
) -> ReiCalcResult<ComputationOutput<PriceTargetOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    // --- Fixed monthly costs independent of price ---
    let monthly_capex = input.capex.per_month_reserve(input.monthly_rent);
    let op_totals = expenses::aggregate(&input.operating_expenses);
    let fixed_monthly = input.monthly_insurance + monthly_capex + op_totals.monthly;

    // --- Per-dollar-of-price mortgage factor ---
    let dp = input.down_payment_rate;
    let mut loan_fraction = Decimal::ONE - dp;
    if dp <= mortgage::FHA_DOWN_PAYMENT_THRESHOLD {
        loan_fraction *= Decimal::ONE + mortgage::FHA_UPFRONT_PREMIUM;
    }

    let payment_constant = payment_per_dollar(input)?;
    let pmi_constant = if dp < mortgage::PMI_DOWN_PAYMENT_THRESHOLD {
        mortgage::PMI_ANNUAL_RATE / dec!(12)
    } else {
        Decimal::ZERO
    };

    let mortgage_factor = loan_fraction * (payment_constant + pmi_constant);
    let tax_factor = input.property_tax_rate / dec!(12);
    let price_factor = mortgage_factor + tax_factor;

    if price_factor.is_zero() {
        return Err(ReiCalcError::DivisionByZero {
            context: "price suggestion factor (no price-linked costs)".into(),
        });
    }

    // --- Solve both targets ---
    let solve = |target: Money| -> TargetPrice {
        let budget = input.monthly_rent - fixed_monthly - target;
        let price = budget / price_factor;
        let loan_amount = price * loan_fraction;
        let monthly_mortgage = loan_amount * (payment_constant + pmi_constant);
        let monthly_property_tax = price * tax_factor;

        TargetPrice {
            purchase_price: price.round_dp(2),
            loan_amount: loan_amount.round_dp(2),
            monthly_mortgage: monthly_mortgage.round_dp(2),
            monthly_property_tax: monthly_property_tax.round_dp(2),
            monthly_cost: (monthly_mortgage + monthly_property_tax + fixed_monthly).round_dp(2),
            cash_required: (price * dp
                + price * input.closing_cost_rate
                + input.rehab_cost
                + op_totals.one_time)
                .round_dp(2),
        }
    };

    let cashflow_target = solve(input.target_monthly_cashflow);
    let break_even = solve(Decimal::ZERO);

    if cashflow_target.purchase_price <= Decimal::ZERO {
        warnings.push(
            "Fixed costs and target cashflow exceed rent — no positive price achieves the target"
                .into(),
        );
    }

    let output = PriceTargetOutput {
        cashflow_target,
        break_even,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Purchase Price Suggestion (Inverse Cost Model)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Monthly payment per dollar financed: the amortization constant, the bare
/// monthly rate for interest-only loans, or straight-line at a zero rate.
fn payment_per_dollar(input: &PriceTargetInput) -> ReiCalcResult<Rate> {
    let monthly_rate = input.annual_rate / dec!(12);

    if input.interest_only {
        return Ok(monthly_rate);
    }

    if input.loan_term_years == 0 {
        return Err(ReiCalcError::InvalidInput {
            field: "loan_term_years".into(),
            reason: "Amortizing loan term must be at least 1 year".into(),
        });
    }

    let total_months = input.loan_term_years * 12;

    if monthly_rate.is_zero() {
        return Ok(Decimal::ONE / Decimal::from(total_months));
    }

    let compound = (Decimal::ONE + monthly_rate).powd(Decimal::from(total_months));
    Ok(monthly_rate * compound / (compound - Decimal::ONE))
}

fn validate_input(input: &PriceTargetInput) -> ReiCalcResult<()> {
    if input.down_payment_rate < Decimal::ZERO || input.down_payment_rate > Decimal::ONE {
        return Err(ReiCalcError::InvalidInput {
            field: "down_payment_rate".into(),
            reason: "Down payment must be between 0 and 1 (a fraction of price)".into(),
        });
    }

    if input.property_tax_rate < Decimal::ZERO {
        return Err(ReiCalcError::InvalidInput {
            field: "property_tax_rate".into(),
            reason: "Property tax rate cannot be negative".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_input() -> PriceTargetInput {
        PriceTargetInput {
            target_monthly_cashflow: dec!(200),
            down_payment_rate: dec!(0.20),
            annual_rate: dec!(0.06),
            interest_only: false,
            loan_term_years: 30,
            property_tax_rate: dec!(0.02),
            monthly_rent: dec!(1800),
            monthly_insurance: dec!(0),
            capex: Amount::Dollar(dec!(0)),
            closing_cost_rate: dec!(0.03),
            rehab_cost: dec!(0),
            operating_expenses: OperatingExpenses::default(),
        }
    }

    #[test]
    fn test_forward_check_reproduces_target() {
        let result = suggest_price(&sample_input()).unwrap();
        let t = &result.result.cashflow_target;

        // Plugging the suggested price back into the forward cost model
        // must reproduce the target cashflow
        let payment = mortgage::monthly_payment(t.loan_amount, dec!(0.06), 30, false).unwrap();
        let tax = t.purchase_price * dec!(0.02) / dec!(12);
        let cashflow = dec!(1800) - payment - tax;

        assert!(
            (cashflow - dec!(200)).abs() < dec!(0.05),
            "forward check cashflow {cashflow}"
        );
    }

    #[test]
    fn test_reference_price_magnitude() {
        let result = suggest_price(&sample_input()).unwrap();
        let t = &result.result.cashflow_target;

        // 1600/mo of price-linked budget at ~0.646% of price per month
        assert!(
            t.purchase_price > dec!(246000) && t.purchase_price < dec!(249000),
            "price {}",
            t.purchase_price
        );
        assert!((t.loan_amount - t.purchase_price * dec!(0.80)).abs() < dec!(0.02));
    }

    #[test]
    fn test_break_even_price_exceeds_target_price() {
        let result = suggest_price(&sample_input()).unwrap();
        let out = &result.result;

        // A zero-cashflow target leaves more budget for the mortgage
        assert!(out.break_even.purchase_price > out.cashflow_target.purchase_price);
    }

    #[test]
    fn test_low_down_payment_shrinks_price() {
        let mut input = sample_input();
        input.down_payment_rate = dec!(0.10);
        let low_down = suggest_price(&input).unwrap();
        let standard = suggest_price(&sample_input()).unwrap();

        // More borrowed per dollar of price plus PMI means each dollar of
        // price costs more per month, so the affordable price drops
        assert!(
            low_down.result.cashflow_target.purchase_price
                < standard.result.cashflow_target.purchase_price
        );
    }

    #[test]
    fn test_fha_surcharge_in_inversion() {
        let mut input = sample_input();
        input.down_payment_rate = dec!(0.035);
        let result = suggest_price(&input).unwrap();
        let t = &result.result.cashflow_target;

        // Loan fraction carries the financed premium: 0.965 * 1.0175
        let expected_fraction = dec!(0.965) * dec!(1.0175);
        assert!((t.loan_amount - t.purchase_price * expected_fraction).abs() < dec!(0.02));
    }

    #[test]
    fn test_fixed_costs_reduce_budget() {
        let mut input = sample_input();
        input.monthly_insurance = dec!(100);
        input.capex = Amount::Percent(dec!(0.05));
        let with_fixed = suggest_price(&input).unwrap();
        let bare = suggest_price(&sample_input()).unwrap();

        assert!(
            with_fixed.result.cashflow_target.purchase_price
                < bare.result.cashflow_target.purchase_price
        );

        // Fixed costs appear in the implied monthly cost
        let t = &with_fixed.result.cashflow_target;
        let expected =
            t.monthly_mortgage + t.monthly_property_tax + dec!(100) + dec!(90);
        assert!((t.monthly_cost - expected).abs() < dec!(0.02));
    }

    #[test]
    fn test_cash_required_composition() {
        let mut input = sample_input();
        input.rehab_cost = dec!(15000);
        let result = suggest_price(&input).unwrap();
        let t = &result.result.cashflow_target;

        let expected = (t.purchase_price * dec!(0.20)
            + t.purchase_price * dec!(0.03)
            + dec!(15000))
        .round_dp(2);
        assert!((t.cash_required - expected).abs() < dec!(0.02));
    }

    #[test]
    fn test_unreachable_target_warns() {
        let mut input = sample_input();
        input.target_monthly_cashflow = dec!(2500); // exceeds rent
        let result = suggest_price(&input).unwrap();

        assert!(result.result.cashflow_target.purchase_price < Decimal::ZERO);
        assert!(result.warnings.iter().any(|w| w.contains("no positive price")));
    }

    #[test]
    fn test_invalid_down_payment_rejected() {
        let mut input = sample_input();
        input.down_payment_rate = dec!(1.5);
        assert!(suggest_price(&input).is_err());
    }

    #[test]
    fn test_interest_only_inversion() {
        let mut input = sample_input();
        input.interest_only = true;
        let result = suggest_price(&input).unwrap();
        let t = &result.result.cashflow_target;

        // IO payment per dollar is just the monthly rate
        let expected_payment = (t.loan_amount * dec!(0.005)).round_dp(2);
        assert!((t.monthly_mortgage - expected_payment).abs() < dec!(0.02));
    }
}
