use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Money;

/// How often an itemized operating expense recurs.
///
/// Frequencies we do not recognise deserialize to `Other` and contribute
/// nothing to either total, matching the tolerant handling of free-text
/// frequency tags in persisted deal records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    Monthly,
    Annually,
    #[serde(rename = "Non-recurring")]
    NonRecurring,
    #[serde(other)]
    Other,
}

/// A single user-itemized cost line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseItem {
    pub category: String,
    pub cost: Money,
    pub frequency: Frequency,
}

/// A user-maintained operating expense schedule. Only consulted when
/// `active` is true; an inactive schedule contributes zero regardless of
/// its items.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperatingExpenses {
    pub active: bool,
    #[serde(default)]
    pub items: Vec<ExpenseItem>,
}

/// Aggregated totals: a recurring monthly figure and a one-time figure.
/// One-time costs belong in cash-at-close, never in the monthly cost basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseTotals {
    pub monthly: Money,
    pub one_time: Money,
}

/// Collapse an expense schedule into monthly and one-time totals.
/// Annual items are spread over 12 months; non-recurring items are summed
/// separately.
pub fn aggregate(expenses: &OperatingExpenses) -> ExpenseTotals {
    let mut monthly = Decimal::ZERO;
    let mut one_time = Decimal::ZERO;

    if !expenses.active {
        return ExpenseTotals { monthly, one_time };
    }

    for item in &expenses.items {
        match item.frequency {
            Frequency::Monthly => monthly += item.cost,
            Frequency::Annually => monthly += item.cost / dec!(12),
            Frequency::NonRecurring => one_time += item.cost,
            Frequency::Other => {}
        }
    }

    ExpenseTotals { monthly, one_time }
}

/// Total cost of carrying the schedule over a holding period.
pub fn carrying_cost(totals: ExpenseTotals, months_held: u32) -> Money {
    totals.monthly * Decimal::from(months_held) + totals.one_time
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn schedule(active: bool) -> OperatingExpenses {
        OperatingExpenses {
            active,
            items: vec![
                ExpenseItem {
                    category: "Lawn care".into(),
                    cost: dec!(80),
                    frequency: Frequency::Monthly,
                },
                ExpenseItem {
                    category: "Umbrella policy".into(),
                    cost: dec!(600),
                    frequency: Frequency::Annually,
                },
                ExpenseItem {
                    category: "Appliance package".into(),
                    cost: dec!(2500),
                    frequency: Frequency::NonRecurring,
                },
            ],
        }
    }

    #[test]
    fn test_aggregate_mixed_frequencies() {
        let totals = aggregate(&schedule(true));
        // 80 monthly + 600/12 annually
        assert_eq!(totals.monthly, dec!(130));
        assert_eq!(totals.one_time, dec!(2500));
    }

    #[test]
    fn test_inactive_schedule_contributes_nothing() {
        let totals = aggregate(&schedule(false));
        assert_eq!(totals.monthly, Decimal::ZERO);
        assert_eq!(totals.one_time, Decimal::ZERO);
    }

    #[test]
    fn test_unknown_frequency_ignored() {
        let json = r#"{
            "active": true,
            "items": [
                { "category": "Mystery", "cost": "999", "frequency": "Fortnightly" },
                { "category": "HOA", "cost": "50", "frequency": "Monthly" }
            ]
        }"#;
        let parsed: OperatingExpenses = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.items[0].frequency, Frequency::Other);
        let totals = aggregate(&parsed);
        assert_eq!(totals.monthly, dec!(50));
        assert_eq!(totals.one_time, Decimal::ZERO);
    }

    #[test]
    fn test_carrying_cost_over_hold() {
        let totals = aggregate(&schedule(true));
        // 130 * 6 + 2500
        assert_eq!(carrying_cost(totals, 6), dec!(3280));
    }

    #[test]
    fn test_empty_active_schedule() {
        let totals = aggregate(&OperatingExpenses {
            active: true,
            items: vec![],
        });
        assert_eq!(totals.monthly, Decimal::ZERO);
        assert_eq!(totals.one_time, Decimal::ZERO);
    }
}
