//! Numeric input coercion at the edit boundary.
//!
//! Invalid numbers are coerced to 0 rather than rejected.

/// Parses user-entered text as a non-negative amount; anything else becomes 0
pub fn coerce_number(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .map(sanitize_amount)
        .unwrap_or(0.0)
}

/// Maps negative and non-finite values to 0
pub fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Clamps a confidence fraction into (0, 1]; non-finite or non-positive becomes 0
pub fn sanitize_confidence(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value.min(1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_valid_numbers() {
        assert_eq!(coerce_number("40"), 40.0);
        assert_eq!(coerce_number(" 2.5 "), 2.5);
    }

    #[test]
    fn test_coerce_invalid_numbers() {
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("ten"), 0.0);
        assert_eq!(coerce_number("-5"), 0.0);
        assert_eq!(coerce_number("NaN"), 0.0);
        assert_eq!(coerce_number("inf"), 0.0);
    }

    #[test]
    fn test_sanitize_confidence() {
        assert_eq!(sanitize_confidence(0.8), 0.8);
        assert_eq!(sanitize_confidence(7.0), 1.0);
        assert_eq!(sanitize_confidence(-2.0), 0.0);
        assert_eq!(sanitize_confidence(f64::NAN), 0.0);
    }
}
