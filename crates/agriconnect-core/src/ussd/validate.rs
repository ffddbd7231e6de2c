// ── Handset input validation ──

/// A quantity the farmer typed: a positive, finite decimal number.
/// Anything else (including trailing garbage) is rejected.
pub fn parse_quantity(input: &str) -> Option<f64> {
    let qty: f64 = input.trim().parse().ok()?;
    (qty.is_finite() && qty > 0.0).then_some(qty)
}

/// Latin letters plus the Ethiopic block.
fn is_name_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || ('\u{1200}'..='\u{137F}').contains(&c)
}

/// A registration name: more than two characters, no digits, and at
/// least one Latin or Ethiopic letter.
pub fn is_valid_name(input: &str) -> bool {
    input.chars().count() > 2
        && !input.chars().any(|c| c.is_ascii_digit())
        && input.chars().any(is_name_letter)
}
