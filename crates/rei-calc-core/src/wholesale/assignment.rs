use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ReiCalcError;
use crate::expenses::{self, OperatingExpenses};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::ReiCalcResult;

/// 70% rule: the ceiling offer is 70% of ARV less the rehab budget.
const MAO_ARV_FACTOR: Decimal = dec!(0.70);

/// Assignment fees are quoted as a band between 5% and 15% of ARV.
const MIN_FEE_ARV_FACTOR: Decimal = dec!(0.05);
const MAX_FEE_ARV_FACTOR: Decimal = dec!(0.15);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for a wholesale assignment deal. No loan, tax, or insurance logic:
/// the wholesaler never takes title long enough for any of that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WholesaleInput {
    pub after_repair_value: Money,
    pub rehab_cost: Money,
    /// Months under contract or holding before assignment
    pub months_held: u32,
    /// Carrying costs while the deal is marketed
    #[serde(default)]
    pub operating_expenses: OperatingExpenses,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WholesaleOutput {
    /// Maximum allowable offer: ARV x 0.70 - rehab
    pub max_allowable_offer: Money,
    /// 5% of ARV
    pub min_assignment_fee: Money,
    /// 15% of ARV
    pub max_assignment_fee: Money,
    /// MAO plus the minimum fee
    pub min_sale_price: Money,
    /// MAO plus the maximum fee
    pub max_sale_price: Money,
    /// Recurring carrying costs over the hold plus one-time costs
    pub total_carrying_cost: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Price a wholesale assignment: the 70%-rule ceiling offer, the assignment
/// fee band, and carrying costs over the contract period.
pub fn analyze_assignment(
    input: &WholesaleInput,
) -> ReiCalcResult<ComputationOutput<WholesaleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.after_repair_value < Decimal::ZERO {
        return Err(ReiCalcError::InvalidInput {
            field: "after_repair_value".into(),
            reason: "After-repair value cannot be negative".into(),
        });
    }

    let max_allowable_offer = input.after_repair_value * MAO_ARV_FACTOR - input.rehab_cost;
    let min_assignment_fee = input.after_repair_value * MIN_FEE_ARV_FACTOR;
    let max_assignment_fee = input.after_repair_value * MAX_FEE_ARV_FACTOR;

    let totals = expenses::aggregate(&input.operating_expenses);
    let total_carrying_cost = expenses::carrying_cost(totals, input.months_held);

    if max_allowable_offer < Decimal::ZERO {
        warnings.push("Rehab budget exceeds 70% of ARV — no workable offer exists".into());
    }

    let output = WholesaleOutput {
        max_allowable_offer: max_allowable_offer.round_dp(2),
        min_assignment_fee: min_assignment_fee.round_dp(2),
        max_assignment_fee: max_assignment_fee.round_dp(2),
        min_sale_price: (max_allowable_offer + min_assignment_fee).round_dp(2),
        max_sale_price: (max_allowable_offer + max_assignment_fee).round_dp(2),
        total_carrying_cost: total_carrying_cost.round_dp(2),
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Wholesale Assignment Pricing (70% Rule)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expenses::{ExpenseItem, Frequency};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn sample_input() -> WholesaleInput {
        WholesaleInput {
            after_repair_value: dec!(250000),
            rehab_cost: dec!(20000),
            months_held: 3,
            operating_expenses: OperatingExpenses::default(),
        }
    }

    #[test]
    fn test_mao_reference_case() {
        let result = analyze_assignment(&sample_input()).unwrap();
        // 250000 * 0.7 - 20000
        assert_eq!(result.result.max_allowable_offer, dec!(155000.00));
    }

    #[test]
    fn test_assignment_fee_band() {
        let result = analyze_assignment(&sample_input()).unwrap();
        let out = &result.result;

        assert_eq!(out.min_assignment_fee, dec!(12500.00));
        assert_eq!(out.max_assignment_fee, dec!(37500.00));
        assert_eq!(out.min_sale_price, dec!(167500.00));
        assert_eq!(out.max_sale_price, dec!(192500.00));
    }

    #[test]
    fn test_carrying_cost_over_contract() {
        let mut input = sample_input();
        input.operating_expenses = OperatingExpenses {
            active: true,
            items: vec![
                ExpenseItem {
                    category: "Utilities".into(),
                    cost: dec!(180),
                    frequency: Frequency::Monthly,
                },
                ExpenseItem {
                    category: "Title search".into(),
                    cost: dec!(350),
                    frequency: Frequency::NonRecurring,
                },
            ],
        };
        let result = analyze_assignment(&input).unwrap();
        // 180 * 3 + 350
        assert_eq!(result.result.total_carrying_cost, dec!(890.00));
    }

    #[test]
    fn test_heavy_rehab_warns_negative_mao() {
        let mut input = sample_input();
        input.rehab_cost = dec!(200000);
        let result = analyze_assignment(&input).unwrap();

        assert_eq!(result.result.max_allowable_offer, dec!(-25000.00));
        assert!(result.warnings.iter().any(|w| w.contains("no workable offer")));
    }

    #[test]
    fn test_negative_arv_rejected() {
        let mut input = sample_input();
        input.after_repair_value = dec!(-1);
        assert!(analyze_assignment(&input).is_err());
    }
}
