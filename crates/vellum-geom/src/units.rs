//! CSS absolute units
//!
//! Conversions between the absolute units SVG documents use for
//! lengths and the px-based user-unit convention: a unit suffix is
//! converted to px first and then reinterpreted in user units, so
//! `1mm` in an mm-scaled document is *not* one physical millimeter.

/// px per unit, per CSS. Returns `None` for unknown or relative units.
pub fn unit_factor(unit: &str) -> Option<f64> {
    match unit {
        "" | "px" => Some(1.0),
        "in" => Some(96.0),
        "pt" => Some(96.0 / 72.0),
        "pc" => Some(16.0),
        "mm" => Some(96.0 / 25.4),
        "cm" => Some(96.0 / 2.54),
        "q" => Some(96.0 / 101.6),
        _ => None,
    }
}

/// Split a length into number and unit suffix. `"12.5mm"` parses to
/// `(12.5, "mm")`; a bare number has an empty suffix.
pub fn parse_unit(input: &str) -> Option<(f64, &str)> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    let b = s.as_bytes();
    let mut i = 0;
    if matches!(b.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    if i < b.len() && b[i] == b'.' {
        i += 1;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
    }
    // exponent only when actually followed by digits
    if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
        let mut j = i + 1;
        if j < b.len() && (b[j] == b'+' || b[j] == b'-') {
            j += 1;
        }
        if j < b.len() && b[j].is_ascii_digit() {
            i = j;
            while i < b.len() && b[i].is_ascii_digit() {
                i += 1;
            }
        }
    }
    let (num, unit) = s.split_at(i);
    let value: f64 = num.parse().ok()?;
    Some((value, unit.trim()))
}

/// Absolute length string to px. `None` for percentages, relative
/// units, and unparsable input.
pub fn to_px(input: &str) -> Option<f64> {
    let (value, unit) = parse_unit(input)?;
    Some(value * unit_factor(&unit.to_ascii_lowercase())?)
}

/// The implicit-px convention: lowercase, trim, convert to px. Sizes
/// read this way are then treated as user units by callers.
pub fn implicit_px(input: &str) -> Option<f64> {
    to_px(input.trim())
}

/// Render a px value in the given unit, e.g. `render_px(96.0, "in")`
/// is `"1in"`. Unknown units fall back to px.
pub fn render_px(value_px: f64, unit: &str) -> String {
    match unit_factor(unit) {
        Some(f) if !unit.is_empty() && unit != "px" => format!("{}{}", value_px / f, unit),
        _ => format!("{}", value_px),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unit() {
        assert_eq!(parse_unit("12.5mm"), Some((12.5, "mm")));
        assert_eq!(parse_unit("100"), Some((100.0, "")));
        assert_eq!(parse_unit("50%"), Some((50.0, "%")));
        assert_eq!(parse_unit("2em"), Some((2.0, "em")));
        assert_eq!(parse_unit("1e3px"), Some((1000.0, "px")));
        assert_eq!(parse_unit("abc"), None);
    }

    #[test]
    fn test_to_px() {
        assert_eq!(to_px("1in"), Some(96.0));
        assert_eq!(to_px("72pt"), Some(96.0));
        assert_eq!(to_px("25.4mm"), Some(96.0));
        assert_eq!(to_px("10"), Some(10.0));
        assert_eq!(to_px("50%"), None);
        assert_eq!(to_px("2em"), None);
    }

    #[test]
    fn test_implicit_px_normalizes() {
        assert_eq!(implicit_px(" 1IN "), Some(96.0));
    }

    #[test]
    fn test_render_px() {
        assert_eq!(render_px(96.0, "in"), "1in");
        assert_eq!(render_px(10.0, "px"), "10");
        assert_eq!(render_px(10.0, ""), "10");
    }
}
