//! Parsing of displayed ratings and abbreviated counts.

/// Parses a displayed rating such as `"7.4"`.
///
/// Returns `None` for sentinels, empty text, and non-finite values.
#[must_use]
pub fn parse_rating(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}

/// Parses a displayed count: `"350"`, `"1,234"`, `"1.2K"`, `"15K"`, `"2.3M"`,
/// `"1B"`.
///
/// Fractional digits beyond the suffix's precision are truncated. Values
/// that do not fit in a `u64` yield `None`.
#[must_use]
pub fn parse_count(text: &str) -> Option<u64> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    let (number, multiplier) = match cleaned.chars().last()? {
        'K' | 'k' => (&cleaned[..cleaned.len() - 1], 1_000u64),
        'M' | 'm' => (&cleaned[..cleaned.len() - 1], 1_000_000),
        'B' | 'b' => (&cleaned[..cleaned.len() - 1], 1_000_000_000),
        _ => (cleaned.as_str(), 1),
    };

    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let whole_value: u64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut total = whole_value.checked_mul(multiplier)?;

    let mut place = multiplier;
    for digit in fraction.chars() {
        place /= 10;
        if place == 0 {
            break;
        }
        total = total.checked_add(u64::from(digit.to_digit(10)?) * place)?;
    }

    Some(total)
}
