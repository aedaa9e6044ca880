use std::{fmt, sync::{Arc, LazyLock}};

use regex::Regex;

/// Default width of a `JPT_KOD_JE` code at the county (powiat) level.
pub const DEFAULT_CODE_WIDTH: usize = 4;

/// Numeric codes exported from spreadsheets come back as "206.0".
static INTEGRAL_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\.0*$").expect("valid regex")
});

/// Join key for an administrative unit.
/// Always stored zero-padded to the configured width, so equal units compare equal
/// regardless of how the source file typed the column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AdminCode(Arc<str>);

impl AdminCode {
    /// Normalize a raw code to `width` characters, left-padding with zeros.
    /// Longer codes are kept unchanged. Returns None for blank input.
    pub fn normalize(raw: &str, width: usize) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() { return None }

        let digits = INTEGRAL_FLOAT.captures(trimmed)
            .and_then(|caps| caps.get(1))
            .map_or(trimmed, |m| m.as_str());

        Some(Self(Arc::from(format!("{digits:0>width$}"))))
    }

    /// Normalize an integer code (dBASE `Numeric`/`Integer` fields).
    pub fn from_integer(value: i64, width: usize) -> Option<Self> {
        Self::normalize(&value.to_string(), width)
    }

    /// Normalize a floating-point code; non-integral values are rejected.
    pub fn from_float(value: f64, width: usize) -> Option<Self> {
        (value.is_finite() && value.fract() == 0.0)
            .then(|| Self::from_integer(value as i64, width))
            .flatten()
    }

    /// Stand-in for a region whose source record carries no code.
    /// Normalization never yields an empty code, so a blank code matches no table row.
    pub fn blank() -> Self { Self(Arc::from("")) }

    #[inline]
    pub fn is_blank(&self) -> bool { self.0.is_empty() }

    #[inline]
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for AdminCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AdminCode {
    fn as_ref(&self) -> &str { &self.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(raw: &str) -> String {
        AdminCode::normalize(raw, DEFAULT_CODE_WIDTH).unwrap().to_string()
    }

    #[test]
    fn pads_short_codes() {
        assert_eq!(AdminCode::from_integer(7, 4).unwrap().as_str(), "0007");
        assert_eq!(norm("123"), "0123");
        assert_eq!(norm("0206"), "0206");
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in ["7", "123", "0206", "3264", "12345", " 42 "] {
            let once = norm(raw);
            assert_eq!(norm(&once), once);
        }
    }

    #[test]
    fn strips_integral_float_rendering() {
        assert_eq!(norm("206.0"), "0206");
        assert_eq!(norm("1465.000"), "1465");
        assert_eq!(AdminCode::from_float(206.0, 4).unwrap().as_str(), "0206");
        assert!(AdminCode::from_float(20.5, 4).is_none());
    }

    #[test]
    fn keeps_long_codes_and_rejects_blank() {
        assert_eq!(norm("1465011"), "1465011");
        assert!(AdminCode::normalize("   ", 4).is_none());
        assert!(AdminCode::normalize("", 4).is_none());
    }
}
