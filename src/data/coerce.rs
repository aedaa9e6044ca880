/// Parse a locale-formatted number ("12,5", "1 234,5") into a float.
/// Anything that does not parse cleanly, including NaN and infinities, becomes None.
pub fn coerce_decimal(raw: &str) -> Option<f64> {
    let cleaned = raw.trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect::<String>();

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coerce a whole column, returning the values and how many non-blank cells failed to parse.
pub fn coerce_column<'a>(cells: impl IntoIterator<Item = Option<&'a str>>) -> (Vec<Option<f64>>, usize) {
    let mut rejected = 0;
    let values = cells.into_iter()
        .map(|cell| {
            let cell = cell?;
            let value = coerce_decimal(cell);
            if value.is_none() && !cell.trim().is_empty() { rejected += 1 }
            value
        })
        .collect();
    (values, rejected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_comma_becomes_point() {
        assert_eq!(coerce_decimal("12,5"), Some(12.5));
        assert_eq!(coerce_decimal(" -3,25 "), Some(-3.25));
        assert_eq!(coerce_decimal("40.1"), Some(40.1));
        assert_eq!(coerce_decimal("1 234,5"), Some(1234.5));
    }

    #[test]
    fn malformed_cells_become_null() {
        for raw in ["", "-", "x", "12,5,1", "NaN", "inf"] {
            assert_eq!(coerce_decimal(raw), None, "{raw:?}");
        }
    }

    #[test]
    fn column_counts_rejected_cells_only() {
        let (values, rejected) = coerce_column([Some("1,5"), None, Some(""), Some("n/a")]);
        assert_eq!(values, vec![Some(1.5), None, None, None]);
        assert_eq!(rejected, 1);
    }
}
