//! Formatting of numbers into DICOM text form.
//!
//! Two consumers: construction of decimal (DS) and integer (IS) string
//! values from numeric sources, and the string rendering of binary
//! float values. Both follow C `printf` conventions for `%g`/`%e`,
//! with a sign and at least two digits in the exponent.

/// Largest magnitude that fits a 16-character decimal string
/// with 10 significant digits.
const DS_MAX: f64 = 9.999999999e99;

/// Format one element of a decimal string (DS) value.
///
/// The magnitude is clamped into the representable range;
/// values too small for the range, and NaN, collapse to zero.
/// The result is at most 16 characters.
pub(crate) fn format_ds(d: f64) -> String {
    // the negated comparison also catches NaN
    let d = if !(d.abs() >= 1e-99) {
        0.0
    } else if d > DS_MAX {
        DS_MAX
    } else if d < -DS_MAX {
        -DS_MAX
    } else {
        d
    };
    gfmt(d, 10, false)
}

/// Render a 64-bit float for display.
pub(crate) fn format_f64(f: f64) -> String {
    // 2^53: last magnitude at which every integer is exact
    format_float(f, 16, 9_007_199_254_740_992.0)
}

/// Render a 32-bit float for display.
pub(crate) fn format_f32(f: f32) -> String {
    // 2^24
    format_float(f64::from(f), 8, 16_777_216.0)
}

fn format_float(f: f64, prec: usize, exact_max: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f.is_sign_negative() { "-inf" } else { "inf" }.to_string();
    }
    let mut s = if f.abs() <= exact_max {
        gfmt(f, prec, true)
    } else {
        sci(f, prec - 1)
    };
    trim_mantissa_zeros(&mut s);
    s
}

/// `%g`-style formatting with `prec` significant digits.
/// With `alt`, trailing zeros are kept and a decimal point is
/// guaranteed, as with the `#` printf flag.
fn gfmt(f: f64, prec: usize, alt: bool) -> String {
    let prec = prec.max(1);
    let exp = decimal_exponent(f, prec);
    if exp >= -4 && exp < prec as i32 {
        let frac = (prec as i32 - 1 - exp).max(if alt { 1 } else { 0 }) as usize;
        let mut s = format!("{:.*}", frac, f);
        if !alt {
            trim_fraction(&mut s);
        }
        s
    } else {
        let mut s = sci(f, prec - 1);
        if !alt {
            let epos = s.find('e').unwrap_or(s.len());
            let tail = s.split_off(epos);
            trim_fraction(&mut s);
            s.push_str(&tail);
        }
        s
    }
}

/// Scientific form with the given number of fraction digits and a
/// C-style exponent: explicit sign, at least two digits.
fn sci(f: f64, decimals: usize) -> String {
    let s = format!("{:.*e}", decimals, f);
    let epos = s.find('e').unwrap_or(s.len());
    let exp: i32 = s[epos + 1..].parse().unwrap_or(0);
    let (sign, mag) = if exp < 0 { ('-', -exp) } else { ('+', exp) };
    format!("{}e{}{:02}", &s[..epos], sign, mag)
}

/// The decimal exponent the value will have after rounding to
/// `prec` significant digits.
fn decimal_exponent(f: f64, prec: usize) -> i32 {
    let s = format!("{:.*e}", prec - 1, f);
    match s.find('e') {
        Some(epos) => s[epos + 1..].parse().unwrap_or(0),
        None => 0,
    }
}

/// Drop trailing fraction zeros, and the point itself when bare.
fn trim_fraction(s: &mut String) {
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
}

/// Drop trailing zeros from the mantissa, keeping one digit
/// after the decimal point.
fn trim_mantissa_zeros(s: &mut String) {
    let epos = s.find('e').unwrap_or(s.len());
    let bytes = s.as_bytes();
    let mut j = epos;
    while j > 1 && bytes[j - 1] == b'0' && bytes[j - 2] != b'.' {
        j -= 1;
    }
    if j < epos {
        s.replace_range(j..epos, "");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_string_basics() {
        assert_eq!(format_ds(0.0), "0");
        assert_eq!(format_ds(1.0), "1");
        assert_eq!(format_ds(2.5), "2.5");
        assert_eq!(format_ds(-1.0), "-1");
        assert_eq!(format_ds(3.14159), "3.14159");
        assert_eq!(format_ds(1e-5), "1e-05");
        assert_eq!(format_ds(1e20), "1e+20");
    }

    #[test]
    fn decimal_string_rounds_to_ten_digits() {
        assert_eq!(format_ds(0.3333333333333333), "0.3333333333");
        assert_eq!(format_ds(1234567890123.0), "1.23456789e+12");
    }

    #[test]
    fn decimal_string_clamps_range() {
        assert_eq!(format_ds(1e200), "9.999999999e+99");
        assert_eq!(format_ds(-1e200), "-9.999999999e+99");
        assert_eq!(format_ds(1e-200), "0");
        assert_eq!(format_ds(-1e-200), "0");
        assert_eq!(format_ds(f64::NAN), "0");
        assert!(format_ds(-9.999999999e99).len() <= 16);
    }

    #[test]
    fn float_rendering_keeps_one_fraction_digit() {
        assert_eq!(format_f64(1.0), "1.0");
        assert_eq!(format_f64(2.5), "2.5");
        assert_eq!(format_f64(-150.0), "-150.0");
        assert_eq!(format_f32(1.0), "1.0");
        assert_eq!(format_f32(2.5), "2.5");
    }

    #[test]
    fn float_rendering_special_values() {
        assert_eq!(format_f64(f64::NAN), "nan");
        assert_eq!(format_f64(f64::INFINITY), "inf");
        assert_eq!(format_f64(f64::NEG_INFINITY), "-inf");
        assert_eq!(format_f32(f32::NAN), "nan");
    }

    #[test]
    fn float_rendering_large_magnitudes_go_scientific() {
        assert_eq!(format_f64(1e200), "1.0e+200");
        assert_eq!(format_f64(1e-10), "1.0e-10");
        assert_eq!(format_f32(1e30), "1.0e+30");
    }

    #[test]
    fn float_rendering_preserves_precision() {
        assert_eq!(format_f64(-4.23460975), "-4.23460975");
        assert_eq!(format_f32(0.15625), "0.15625");
        assert_eq!(format_f64(0.5), "0.5");
        assert_eq!(format_f64(1.5e-5), "1.5e-05");
    }
}
