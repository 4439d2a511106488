//! Parsing of numbers out of DICOM text values.
//!
//! Decimal (DS) and integer (IS) strings are parsed with C `strtod`/
//! `strtol` prefix semantics: leading whitespace is skipped, the
//! longest valid numeric prefix is converted, and anything that does
//! not start with a number yields zero. This is the degradation policy
//! for malformed text throughout the value container.

/// Parse a floating point number from the start of the text.
/// Returns 0.0 when no numeric prefix is present.
pub(crate) fn parse_f64_prefix(text: &[u8]) -> f64 {
    let text = skip_space(text);
    let mut i = 0;
    let mut digits = false;
    if matches!(text.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }
    while text.get(i).map_or(false, u8::is_ascii_digit) {
        i += 1;
        digits = true;
    }
    if text.get(i) == Some(&b'.') {
        let mut j = i + 1;
        while text.get(j).map_or(false, u8::is_ascii_digit) {
            j += 1;
            digits = true;
        }
        if j > i + 1 || digits {
            i = j;
        }
    }
    if !digits {
        return 0.0;
    }
    if matches!(text.get(i), Some(b'e') | Some(b'E')) {
        let mut j = i + 1;
        if matches!(text.get(j), Some(b'+') | Some(b'-')) {
            j += 1;
        }
        let exp_start = j;
        while text.get(j).map_or(false, u8::is_ascii_digit) {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    std::str::from_utf8(&text[..i])
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.0)
}

/// Parse an integer from the start of the text, clamping on overflow.
/// Returns 0 when no numeric prefix is present.
pub(crate) fn parse_i64_prefix(text: &[u8]) -> i64 {
    let text = skip_space(text);
    let mut i = 0;
    let negative = match text.first() {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };
    let mut value: i128 = 0;
    let mut digits = false;
    while let Some(b) = text.get(i) {
        if !b.is_ascii_digit() {
            break;
        }
        digits = true;
        value = (value * 10 + i128::from(b - b'0')).min(i128::from(i64::MAX) + 1);
        i += 1;
    }
    if !digits {
        return 0;
    }
    let value = if negative { -value } else { value };
    value.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

fn skip_space(text: &[u8]) -> &[u8] {
    let n = text
        .iter()
        .take_while(|b| matches!(**b, b' ' | b'\t' | b'\n' | b'\r'))
        .count();
    &text[n..]
}
