/// Rounds half to even on the exact binary value to `decimals` places.
///
/// `0.125` is exactly representable and rounds to `0.12`; `0.675` is stored
/// just below and rounds to `0.67`.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", decimals as usize, value)
        .parse()
        .unwrap_or(value)
}

/// Shortest round-tripping decimal form, always with a fractional part.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let mut s = value.to_string();
    if !s.contains('.') {
        s.push_str(".0");
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_exact_ties_to_even() {
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(-0.125, 2), -0.12);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(5.0 / 16.0, 3), 0.312);
        assert_eq!(round_to(1.0 / 16.0, 3), 0.062);
        assert_eq!(round_to(3.0 / 16.0, 3), 0.188);
        assert_eq!(round_to(2.5, 0), 2.0);
    }

    #[test]
    fn rounds_inexact_values_by_their_binary_expansion() {
        assert_eq!(round_to(0.675, 2), 0.67);
        assert_eq!(round_to(78.114, 2), 78.11);
        assert_eq!(round_to(6.0 / 7.0, 3), 0.857);
        assert_eq!(round_to(1.0 / 7.0, 3), 0.143);
        assert!(round_to(f64::NAN, 2).is_nan());
    }

    #[test]
    fn formats_like_a_float_repr() {
        assert_eq!(format_float(0.0), "0.0");
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(78.11), "78.11");
        assert_eq!(format_float(-0.0), "-0.0");
        assert_eq!(format_float(round_to(-0.001, 2)), "-0.0");
        assert_eq!(format_float(round_to(20.23, 2)), "20.23");
        assert_eq!(format_float(1234.0), "1234.0");
        assert_eq!(format_float(f64::NAN), "nan");
        assert_eq!(format_float(f64::NEG_INFINITY), "-inf");
    }
}
