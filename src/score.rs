//! Exact rational scores.
//!
//! Stored as an arbitrary-precision numerator/denominator pair
//! (`num_rational::BigRational`) so that arithmetic and ordering never round,
//! regardless of a value's magnitude or decimal precision (spec.md §3, P6).

use std::ops::Add;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

use crate::error::ScoreParseError;

/// An exact rational score.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Score(BigRational);

impl Score {
    /// Construct a score directly from an exact rational.
    pub fn from_ratio(ratio: BigRational) -> Self {
        Score(ratio)
    }

    /// Exact, infallible conversion from a signed integer.
    pub fn from_i64(value: i64) -> Self {
        Score(BigRational::from_integer(BigInt::from(value)))
    }

    /// Parse a decimal string (`"-12.5"`, `"100"`, `"0.000001"`) into an exact rational.
    pub fn from_decimal_str(s: &str) -> Result<Score, ScoreParseError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ScoreParseError::InvalidFormat);
        }

        let (negative, rest) = match s.as_bytes()[0] {
            b'-' => (true, &s[1..]),
            b'+' => (false, &s[1..]),
            _ => (false, s),
        };
        if rest.is_empty() {
            return Err(ScoreParseError::InvalidFormat);
        }

        let mut split = rest.splitn(2, '.');
        let int_part = split.next().unwrap_or("");
        let frac_part = split.next();

        if let Some(frac) = frac_part {
            if frac.is_empty() || frac.contains('.') || !frac.bytes().all(|b| b.is_ascii_digit())
            {
                return Err(ScoreParseError::InvalidFormat);
            }
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ScoreParseError::InvalidFormat);
        }
        if int_part.is_empty() && frac_part.is_none() {
            return Err(ScoreParseError::InvalidFormat);
        }

        let frac_part = frac_part.unwrap_or("");
        let digits = format!("{}{}", int_part, frac_part);
        let digits = if digits.is_empty() { "0" } else { digits.as_str() };

        let mut numerator = digits
            .parse::<BigInt>()
            .map_err(|_| ScoreParseError::InvalidFormat)?;
        if negative {
            numerator = -numerator;
        }
        let denominator = BigInt::from(10u32).pow(frac_part.len() as u32);

        Ok(Score(BigRational::new(numerator, denominator)))
    }

    /// Convert an `f64` into the exact rational it represents (not a re-parse
    /// of its decimal rendering): preserves the IEEE-754 value bit-for-bit.
    pub fn from_f64(value: f64) -> Result<Score, ScoreParseError> {
        if value.is_nan() {
            return Err(ScoreParseError::NotFinite);
        }
        if value.is_infinite() {
            return Ok(if value > 0.0 {
                Score::positive_infinity_sentinel()
            } else {
                Score::negative_infinity_sentinel()
            });
        }
        BigRational::from_float(value)
            .map(Score)
            .ok_or(ScoreParseError::InvalidFormat)
    }

    /// A finite sentinel standing in for "+inf" when parsing score-range bounds.
    pub fn positive_infinity_sentinel() -> Score {
        Score(BigRational::from_integer(BigInt::from(10u32).pow(1000)))
    }

    /// A finite sentinel standing in for "-inf" when parsing score-range bounds.
    pub fn negative_infinity_sentinel() -> Score {
        Score(BigRational::from_integer(-BigInt::from(10u32).pow(1000)))
    }

    /// Render to a fixed number of fractional digits. Lossless when the
    /// denominator divides a power of ten; otherwise truncates trailing
    /// digits (spec.md §9: `FloatString(20)` behavior for `1/3`-like values).
    pub fn to_decimal_string(&self, precision: u32) -> String {
        let negative = self.0.is_negative();
        let numerator = self.0.numer().abs();
        let denominator = self.0.denom();

        let whole = &numerator / denominator;
        let mut remainder = &numerator % denominator;

        let mut out = String::new();
        if negative && (!whole.is_zero() || !remainder.is_zero()) {
            out.push('-');
        }
        out.push_str(&whole.to_string());

        if precision > 0 {
            out.push('.');
            for _ in 0..precision {
                remainder *= 10u32;
                let digit = &remainder / denominator;
                remainder %= denominator;
                out.push_str(&digit.to_string());
            }
        }
        out
    }
}

impl Add for Score {
    type Output = Score;
    fn add(self, rhs: Score) -> Score {
        Score(self.0 + rhs.0)
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_decimal_string(20))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_decimal_str_integer() {
        let s = Score::from_decimal_str("100").unwrap();
        assert_eq!(s, Score::from_i64(100));
    }

    #[test]
    fn test_from_decimal_str_negative() {
        let s = Score::from_decimal_str("-12.5").unwrap();
        assert!(s < Score::from_i64(0));
    }

    #[test]
    fn test_from_decimal_str_rejects_garbage() {
        assert!(Score::from_decimal_str("").is_err());
        assert!(Score::from_decimal_str("abc").is_err());
        assert!(Score::from_decimal_str("1.2.3").is_err());
        assert!(Score::from_decimal_str(".").is_err());
    }

    #[test]
    fn test_high_precision_decimal_is_exact() {
        // S2: a 40+ significant digit decimal must compare equal under
        // rational equality even though an f64 would have rounded it.
        let s = Score::from_decimal_str("12345678901234567890.12345678901234567890").unwrap();
        let same = Score::from_decimal_str("12345678901234567890.12345678901234567890").unwrap();
        assert_eq!(s, same);

        let slightly_different =
            Score::from_decimal_str("12345678901234567890.12345678901234567891").unwrap();
        assert_ne!(s, slightly_different);
    }

    #[test]
    fn test_from_f64_preserves_exact_value() {
        let s = Score::from_f64(0.1).unwrap();
        // 0.1 as f64 is not exactly 1/10; the exact rational must differ from it.
        let exact_tenth = Score::from_decimal_str("0.1").unwrap();
        assert_ne!(s, exact_tenth);
    }

    #[test]
    fn test_from_f64_rejects_nan() {
        assert_eq!(Score::from_f64(f64::NAN), Err(ScoreParseError::NotFinite));
    }

    #[test]
    fn test_infinity_sentinels_order_correctly() {
        assert!(Score::negative_infinity_sentinel() < Score::from_i64(i64::MIN));
        assert!(Score::positive_infinity_sentinel() > Score::from_i64(i64::MAX));
    }

    #[test]
    fn test_add_is_exact() {
        let a = Score::from_decimal_str("0.1").unwrap();
        let b = Score::from_decimal_str("0.2").unwrap();
        let sum = a + b;
        assert_eq!(sum, Score::from_decimal_str("0.3").unwrap());
    }

    #[test]
    fn test_to_decimal_string_truncates_repeating_expansion() {
        let third = Score::from_ratio(BigRational::new(BigInt::from(1), BigInt::from(3)));
        let rendered = third.to_decimal_string(5);
        assert_eq!(rendered, "0.33333");
    }

    #[test]
    fn test_to_decimal_string_negative() {
        let s = Score::from_decimal_str("-5.25").unwrap();
        assert_eq!(s.to_decimal_string(2), "-5.25");
    }

    #[test]
    fn test_to_decimal_string_zero_precision() {
        let s = Score::from_i64(42);
        assert_eq!(s.to_decimal_string(0), "42");
    }
}
