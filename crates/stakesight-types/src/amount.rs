use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of decimals in the protocol's base token unit (1 token = 10^18 units).
pub const BASE_UNIT_DECIMALS: u32 = 18;

/// A token amount in display units.
///
/// This is the single entry point for the heterogeneous numeric encodings the
/// event-ingestion layer produces: human-readable decimal strings and integer
/// base-unit ("wei") strings. Construct through the named factories so the
/// caller's intent is explicit; `parse_lenient` keeps the legacy sniffing
/// behavior for feeds that cannot say which encoding they carry.
///
/// Malformed input never surfaces as an error: it is logged and substituted
/// with zero. Negative inputs clamp to zero, deposits cannot be negative.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Parse an integer base-unit amount, e.g. `"1500000000000000000"` -> 1.5.
    pub fn from_base_units(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<i128>() {
            Ok(units) if units >= 0 => {
                match Decimal::try_from_i128_with_scale(units, BASE_UNIT_DECIMALS) {
                    Ok(value) => Self(value.normalize()),
                    Err(e) => {
                        tracing::warn!("base-unit amount '{trimmed}' out of range: {e}, substituting zero");
                        Self::ZERO
                    }
                }
            }
            Ok(_) => {
                tracing::warn!("negative base-unit amount '{trimmed}', substituting zero");
                Self::ZERO
            }
            Err(e) => {
                tracing::warn!("failed to parse base-unit amount '{trimmed}': {e}, substituting zero");
                Self::ZERO
            }
        }
    }

    /// Parse a human-readable decimal token amount, e.g. `"1250.75"` or `"1.2e3"`.
    pub fn from_decimal_str(raw: &str) -> Self {
        let trimmed = raw.trim();
        let parsed = if trimmed.contains(['e', 'E']) {
            Decimal::from_scientific(trimmed)
        } else {
            trimmed.parse::<Decimal>()
        };
        match parsed {
            Ok(value) if value >= Decimal::ZERO => Self(value.normalize()),
            Ok(_) => {
                tracing::warn!("negative amount '{trimmed}', substituting zero");
                Self::ZERO
            }
            Err(e) => {
                tracing::warn!("failed to parse amount '{trimmed}': {e}, substituting zero");
                Self::ZERO
            }
        }
    }

    /// Coerce a value of unknown encoding.
    ///
    /// Policy: missing or empty -> zero; a token containing `.` or exponent
    /// notation is a decimal amount; anything else is an integer base-unit
    /// amount. A literal `"0"` agrees under both branches.
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        let Some(raw) = raw else { return Self::ZERO };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::ZERO;
        }
        if trimmed.contains(['.', 'e', 'E']) {
            Self::from_decimal_str(trimmed)
        } else {
            Self::from_base_units(trimmed)
        }
    }

    pub const fn value(&self) -> Decimal {
        self.0
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
