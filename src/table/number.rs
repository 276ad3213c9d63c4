/// Parse a number written with a decimal comma and dot thousands separators (`1.234,5`).
///
/// Blank cells, placeholders such as `-` and anything else that does not parse to a finite
/// value come back as `None`, the missing-value marker.
pub(crate) fn parse_localized(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() { return None }

    let normalized: String = cell.chars()
        .filter(|&c| c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a year cell. Accepts plain integers and localized numbers without a fraction.
pub(crate) fn parse_year(cell: &str) -> Option<i32> {
    let cell = cell.trim();
    if let Ok(year) = cell.parse::<i32>() { return Some(year) }
    parse_localized(cell).and_then(year_from_number)
}

/// A year read from an already numeric cell. Fractions and out-of-range values are rejected.
pub(crate) fn year_from_number(value: f64) -> Option<i32> {
    (value.fract() == 0.0 && value >= i32::MIN as f64 && value <= i32::MAX as f64).then_some(value as i32)
}
