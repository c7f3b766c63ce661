use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates and fractions expressed as decimals (0.045 = 4.5%). Never as percentages.
pub type Rate = Decimal;

/// Whole-year durations and ages.
pub type Years = u32;

/// Round a currency amount to whole units, halves away from zero.
pub fn round_money(amount: Money) -> Money {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

// ---------------------------------------------------------------------------
// Ratio
// ---------------------------------------------------------------------------

/// Required installment over income-based installment capacity.
///
/// A borrower with no capacity at all has an `Unbounded` ratio rather than
/// a division error. The variant order makes every finite ratio compare
/// below `Unbounded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Ratio {
    Finite(Decimal),
    Unbounded,
}

impl Ratio {
    /// `required / capacity`, or `Unbounded` when capacity is not positive
    /// or so small that the quotient leaves the decimal range.
    pub fn of(required: Money, capacity: Money) -> Self {
        if capacity <= Decimal::ZERO {
            return Ratio::Unbounded;
        }
        match required.checked_div(capacity) {
            Some(r) => Ratio::Finite(r),
            None => Ratio::Unbounded,
        }
    }

    /// Round a finite ratio to `dp` places; `Unbounded` stays unbounded.
    pub fn round_dp(self, dp: u32) -> Self {
        match self {
            Ratio::Finite(r) => {
                Ratio::Finite(r.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
            }
            Ratio::Unbounded => Ratio::Unbounded,
        }
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ratio::Finite(r) => write!(f, "{r}"),
            Ratio::Unbounded => write!(f, "Infinity"),
        }
    }
}

impl Serialize for Ratio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Ratio::Finite(r) => Serialize::serialize(r, serializer),
            Ratio::Unbounded => serializer.serialize_str("Infinity"),
        }
    }
}

impl<'de> Deserialize<'de> for Ratio {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RatioRepr {
            Finite(Decimal),
            Text(String),
        }

        match RatioRepr::deserialize(deserializer)? {
            RatioRepr::Finite(r) => Ok(Ratio::Finite(r)),
            RatioRepr::Text(s) if s.eq_ignore_ascii_case("infinity") || s == "inf" => {
                Ok(Ratio::Unbounded)
            }
            RatioRepr::Text(s) => Err(serde::de::Error::custom(format!(
                "invalid ratio '{s}': expected a decimal or \"Infinity\""
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// Three-tier affordability classification.
///
/// Lower ratios mean more headroom, so `High` is the comfortable end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "BORDERLINE")]
    Borderline,
    #[serde(rename = "LOW")]
    Low,
}

const BORDERLINE_THRESHOLD: Decimal = dec!(0.9);

impl Verdict {
    /// ratio > 1 is LOW, 0.9 < ratio <= 1 is BORDERLINE, anything lower is HIGH.
    pub fn from_ratio(ratio: Ratio) -> Self {
        match ratio {
            Ratio::Unbounded => Verdict::Low,
            Ratio::Finite(r) if r > Decimal::ONE => Verdict::Low,
            Ratio::Finite(r) if r > BORDERLINE_THRESHOLD => Verdict::Borderline,
            Ratio::Finite(_) => Verdict::High,
        }
    }

    pub fn is_pass(&self) -> bool {
        !matches!(self, Verdict::Low)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Verdict::High => "HIGH",
            Verdict::Borderline => "BORDERLINE",
            Verdict::Low => "LOW",
        };
        write!(f, "{label}")
    }
}

// ---------------------------------------------------------------------------
// Output envelope
// ---------------------------------------------------------------------------

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
