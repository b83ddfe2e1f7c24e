use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// A quantity a user may enter either as an absolute dollar figure or as a
/// fraction of some context-dependent base (purchase price, ARV, or rent).
///
/// Replaces the `{ value, isDollar }` convention: the base an `Amount`
/// resolves against is decided by the call site, not by the record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum Amount {
    /// An absolute dollar figure.
    Dollar(Money),
    /// A fraction of the base (0.02 = 2%).
    Percent(Rate),
}

impl Amount {
    /// Resolve against a base in the same period as the base itself.
    pub fn resolve(&self, base: Money) -> Money {
        match self {
            Amount::Dollar(d) => *d,
            Amount::Percent(p) => base * p,
        }
    }

    /// Monthly share of an annual quantity. Dollar figures are annual and
    /// divided by 12; percentages are annual fractions of the base, also
    /// divided by 12. Used for property tax.
    pub fn per_month_of_annual(&self, base: Money) -> Money {
        match self {
            Amount::Dollar(d) => *d / dec!(12),
            Amount::Percent(p) => base * *p / dec!(12),
        }
    }

    /// Monthly reserve against rent. Dollar figures are annual and divided
    /// by 12, but a percentage is a fraction of MONTHLY rent applied as-is:
    /// reserve rates are conventionally quoted per month of rent, so no /12.
    pub fn per_month_reserve(&self, monthly_rent: Money) -> Money {
        match self {
            Amount::Dollar(d) => *d / dec!(12),
            Amount::Percent(p) => monthly_rent * *p,
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
