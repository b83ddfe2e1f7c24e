#![cfg(feature = "commercial")]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use rei_calc_core::commercial::multifamily::{analyze_multifamily, MultifamilyInput};
use rei_calc_core::expenses::{ExpenseItem, Frequency, OperatingExpenses};
use rei_calc_core::Amount;

/// 12-unit building: $1.5M, 30% down, 6.5%/25yr, $14,400 scheduled rent
fn building_input() -> MultifamilyInput {
    MultifamilyInput {
        purchase_price: dec!(1500000),
        all_cash: false,
        down_payment: Amount::Percent(dec!(0.30)),
        annual_rate: dec!(0.065),
        interest_only: false,
        loan_term_years: 25,
        monthly_rent: dec!(14400),
        other_monthly_income: dec!(600),
        vacancy_rate: dec!(0.07),
        capex_rate: dec!(0.08),
        property_tax: Amount::Percent(dec!(0.018)),
        monthly_insurance: dec!(900),
        closing_costs: Amount::Percent(dec!(0.02)),
        acquisition_fees: dec!(25000),
        operating_expenses: OperatingExpenses {
            active: true,
            items: vec![
                ExpenseItem {
                    category: "Property management".into(),
                    cost: dec!(1150),
                    frequency: Frequency::Monthly,
                },
                ExpenseItem {
                    category: "Phase I environmental".into(),
                    cost: dec!(3500),
                    frequency: Frequency::NonRecurring,
                },
            ],
        },
    }
}

#[test]
fn acquisition_cost_includes_fees_and_one_time_expenses() {
    let result = analyze_multifamily(&building_input()).unwrap();
    // 450k down + 30k closing + 25k fees + 3.5k environmental
    assert_eq!(result.result.acquisition_cost, dec!(508500.00));
}

#[test]
fn operating_expenses_fold_vacancy_in() {
    let result = analyze_multifamily(&building_input()).unwrap();
    let out = &result.result;

    // vacancy 1008 + capex 1152 + tax 2250 + insurance 900 + mgmt 1150
    assert_eq!(out.monthly_operating_expenses, dec!(6460.00));
    assert_eq!(out.monthly_capex, dec!(1152.00));
    assert_eq!(out.monthly_property_tax, dec!(2250.00));
    assert_eq!(out.gross_monthly_income, dec!(15000.00));
}

#[test]
fn cap_rate_uses_noi_not_cashflow() {
    let result = analyze_multifamily(&building_input()).unwrap();
    let out = &result.result;

    // NOI excludes debt service
    let monthly_noi = out.gross_monthly_income - out.monthly_operating_expenses;
    let expected = monthly_noi * dec!(12) / dec!(1500000);
    assert!((out.cap_rate.unwrap() - expected).abs() < dec!(0.0001));
}

#[test]
fn cash_purchase_has_no_dscr() {
    let mut input = building_input();
    input.all_cash = true;
    let result = analyze_multifamily(&input).unwrap();
    let out = &result.result;

    assert_eq!(out.monthly_mortgage, Decimal::ZERO);
    assert!(out.dscr.is_none());
    // Cashflow improves without debt service
    let financed = analyze_multifamily(&building_input()).unwrap();
    assert!(out.monthly_cashflow > financed.result.monthly_cashflow);
}

#[test]
fn thin_dscr_warns() {
    let mut input = building_input();
    input.monthly_rent = dec!(9000);
    let result = analyze_multifamily(&input).unwrap();
    assert!(result.warnings.iter().any(|w| w.contains("DSCR")));
}

#[test]
fn negative_cashflow_break_even_is_negative() {
    let mut input = building_input();
    input.monthly_rent = dec!(6000);
    let result = analyze_multifamily(&input).unwrap();
    let out = &result.result;

    assert!(out.monthly_cashflow < Decimal::ZERO);
    assert!(out.months_to_break_even.unwrap() < Decimal::ZERO);
}
