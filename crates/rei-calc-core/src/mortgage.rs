use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::ReiCalcError;
use crate::types::{Amount, Money, Rate};
use crate::ReiCalcResult;

/// Down payments at or below this fraction carry a financed upfront
/// mortgage-insurance premium (FHA-style).
pub const FHA_DOWN_PAYMENT_THRESHOLD: Rate = dec!(0.035);

/// Upfront premium financed into the loan for low-down-payment purchases.
pub const FHA_UPFRONT_PREMIUM: Rate = dec!(0.0175);

/// Down payments below this fraction carry a monthly PMI-equivalent charge.
pub const PMI_DOWN_PAYMENT_THRESHOLD: Rate = dec!(0.20);

/// Annual PMI-equivalent rate applied to the loan amount.
pub const PMI_ANNUAL_RATE: Rate = dec!(0.0085);

/// Fixed loan-to-value assumption for cash-out refinancing against ARV.
pub const REFINANCE_LTV: Rate = dec!(0.80);

/// Size the loan for a purchase: price minus down payment, grossed up by the
/// financed upfront premium when the down payment is at or below 3.5%.
pub fn size_loan(price: Money, down_payment: Money, down_payment_pct: Rate) -> Money {
    let base = price - down_payment;
    if down_payment_pct <= FHA_DOWN_PAYMENT_THRESHOLD {
        base * (Decimal::ONE + FHA_UPFRONT_PREMIUM)
    } else {
        base
    }
}

/// Fixed monthly payment on a loan.
///
/// Amortizing: P * r(1+r)^n / ((1+r)^n - 1) with r the monthly rate.
/// Interest-only: P * r. Zero-rate amortizing loans pay straight-line.
pub fn monthly_payment(
    principal: Money,
    annual_rate: Rate,
    term_years: u32,
    interest_only: bool,
) -> ReiCalcResult<Money> {
    if principal.is_zero() {
        return Ok(Decimal::ZERO);
    }

    let monthly_rate = annual_rate / dec!(12);

    if interest_only {
        return Ok(principal * monthly_rate);
    }

    if term_years == 0 {
        return Err(ReiCalcError::InvalidInput {
            field: "loan_term_years".into(),
            reason: "Amortizing loan term must be at least 1 year".into(),
        });
    }

    let total_months = term_years * 12;

    if monthly_rate.is_zero() {
        return Ok(principal / Decimal::from(total_months));
    }

    let compound = (Decimal::ONE + monthly_rate).powd(Decimal::from(total_months));
    let denominator = compound - Decimal::ONE;

    if denominator.is_zero() {
        return Err(ReiCalcError::DivisionByZero {
            context: "mortgage payment denominator".into(),
        });
    }

    Ok(principal * monthly_rate * compound / denominator)
}

/// Resolved purchase financing: the dollar down payment, the down payment as
/// a fraction of price, and the sized loan.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedFinancing {
    pub down_payment: Money,
    pub down_payment_pct: Rate,
    pub loan_amount: Money,
}

/// Turn a down-payment record into a dollar figure, a fraction of price, and
/// a sized loan. Cash purchases put 100% down and borrow nothing.
pub fn resolve_financing(
    price: Money,
    all_cash: bool,
    down_payment: Amount,
    warnings: &mut Vec<String>,
) -> ReiCalcResult<ResolvedFinancing> {
    if all_cash {
        return Ok(ResolvedFinancing {
            down_payment: price,
            down_payment_pct: Decimal::ONE,
            loan_amount: Decimal::ZERO,
        });
    }

    if price.is_zero() {
        return Err(ReiCalcError::DivisionByZero {
            context: "down payment fraction (down / price)".into(),
        });
    }

    let down = down_payment.resolve(price);
    let pct = down / price;

    if pct > Decimal::ONE {
        warnings.push(format!(
            "Down payment {down} exceeds purchase price {price} — loan amount is negative"
        ));
    }

    Ok(ResolvedFinancing {
        down_payment: down,
        down_payment_pct: pct,
        loan_amount: size_loan(price, down, pct),
    })
}

/// Monthly PMI-equivalent surcharge on a loan amount.
pub fn pmi_monthly(loan_amount: Money) -> Money {
    loan_amount * PMI_ANNUAL_RATE / dec!(12)
}

/// Outstanding principal after a number of monthly payments.
///
/// Steps the balance forward month by month, reducing it by the principal
/// portion of each payment (payment minus accrued interest). Interest-only
/// payments never reduce the balance. The balance floors at zero.
pub fn remaining_principal(
    principal: Money,
    annual_rate: Rate,
    payment: Money,
    months: u32,
) -> Money {
    let monthly_rate = annual_rate / dec!(12);
    let mut balance = principal;

    for _ in 0..months {
        let interest = balance * monthly_rate;
        balance -= payment - interest;
        if balance < Decimal::ZERO {
            return Decimal::ZERO;
        }
    }

    balance
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amortizing_payment_160k_6pct_30yr() {
        // Textbook case: $160k at 6% over 30 years is ~$959.28/mo
        let pmt = monthly_payment(dec!(160000), dec!(0.06), 30, false).unwrap();
        assert_eq!(pmt.round_dp(2), dec!(959.28));
    }

    #[test]
    fn test_interest_only_payment() {
        // $160k at 6% IO: 160000 * 0.005 = 800/mo
        let pmt = monthly_payment(dec!(160000), dec!(0.06), 30, true).unwrap();
        assert_eq!(pmt, dec!(800));
    }

    #[test]
    fn test_zero_rate_straight_line() {
        let pmt = monthly_payment(dec!(360000), Decimal::ZERO, 30, false).unwrap();
        assert_eq!(pmt, dec!(1000));
    }

    #[test]
    fn test_zero_principal_pays_nothing() {
        let pmt = monthly_payment(Decimal::ZERO, dec!(0.06), 30, false).unwrap();
        assert_eq!(pmt, Decimal::ZERO);
    }

    #[test]
    fn test_zero_term_amortizing_rejected() {
        assert!(monthly_payment(dec!(100000), dec!(0.06), 0, false).is_err());
    }

    #[test]
    fn test_loan_sizing_standard() {
        // 20% down on 200k: no gross-up
        assert_eq!(
            size_loan(dec!(200000), dec!(40000), dec!(0.20)),
            dec!(160000)
        );
    }

    #[test]
    fn test_loan_sizing_fha_premium() {
        // 3.5% down on 200k: 193000 * 1.0175
        let loan = size_loan(dec!(200000), dec!(7000), dec!(0.035));
        assert_eq!(loan, dec!(193000) * dec!(1.0175));
        assert_eq!(loan.round_dp(2), dec!(196377.50));
    }

    #[test]
    fn test_pmi_monthly() {
        // 160000 * 0.0085 / 12 = 113.33...
        assert_eq!(pmi_monthly(dec!(160000)).round_dp(2), dec!(113.33));
    }

    #[test]
    fn test_remaining_principal_declines() {
        let pmt = monthly_payment(dec!(160000), dec!(0.06), 30, false).unwrap();
        let after_12 = remaining_principal(dec!(160000), dec!(0.06), pmt, 12);

        // A year of payments retires roughly $1,965 of principal
        assert!(after_12 < dec!(160000));
        assert!(after_12 > dec!(157000));
        assert!((dec!(160000) - after_12 - dec!(1965)).abs() < dec!(10));
    }

    #[test]
    fn test_remaining_principal_interest_only_is_flat() {
        let pmt = monthly_payment(dec!(160000), dec!(0.06), 30, true).unwrap();
        let after_24 = remaining_principal(dec!(160000), dec!(0.06), pmt, 24);
        assert_eq!(after_24, dec!(160000));
    }

    #[test]
    fn test_resolve_financing_cash_purchase() {
        let mut warnings = Vec::new();
        let fin = resolve_financing(dec!(200000), true, Amount::Percent(dec!(0.20)), &mut warnings)
            .unwrap();
        assert_eq!(fin.down_payment, dec!(200000));
        assert_eq!(fin.down_payment_pct, Decimal::ONE);
        assert_eq!(fin.loan_amount, Decimal::ZERO);
    }

    #[test]
    fn test_resolve_financing_oversized_down_warns() {
        let mut warnings = Vec::new();
        let fin = resolve_financing(
            dec!(100000),
            false,
            Amount::Dollar(dec!(120000)),
            &mut warnings,
        )
        .unwrap();
        assert!(fin.loan_amount < Decimal::ZERO);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_remaining_principal_floors_at_zero() {
        // Oversized payment retires the loan immediately
        let balance = remaining_principal(dec!(1000), dec!(0.06), dec!(5000), 3);
        assert_eq!(balance, Decimal::ZERO);
    }
}
