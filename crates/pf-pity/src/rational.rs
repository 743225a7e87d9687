//! Exact arithmetic plumbing
//!
//! Every probability in the pipeline is a `BigRational`. Floats are produced
//! only by [`to_f64`], once, when a report is rendered.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::{PityError, PityResult};

/// Exact probability value
pub type Prob = BigRational;

/// Default number of fractional digits kept by [`sqrt`] when the root is irrational
pub const SQRT_DIGITS: u32 = 60;

/// Build `numer / denom` exactly
pub fn ratio(numer: i64, denom: i64) -> Prob {
    BigRational::new(BigInt::from(numer), BigInt::from(denom))
}

/// Exact integer as a probability-typed value
pub fn integer(value: usize) -> Prob {
    BigRational::from_integer(BigInt::from(value))
}

/// Check `0 <= p <= 1`
pub fn is_probability(p: &Prob) -> bool {
    !p.is_negative() && *p <= Prob::one()
}

/// The single lossy conversion used for reporting
pub fn to_f64(p: &Prob) -> f64 {
    p.to_f64().unwrap_or(f64::NAN)
}

/// Power of ten as a big integer
fn pow10(digits: u32) -> BigInt {
    BigInt::from(10u32).pow(digits)
}

/// Square root of a non-negative rational
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root {
    /// The root, or its truncation to `digits` fractional digits
    pub value: Prob,
    /// Whether `value * value` equals the radicand exactly
    pub exact: bool,
}

/// Square root of `radicand`.
///
/// Returns the exact root when numerator and denominator (in lowest terms) are
/// both perfect squares. Otherwise returns `floor(sqrt(radicand) * 10^digits) / 10^digits`,
/// whose error is below `10^-digits`. Negative radicands are clamped to zero.
pub fn sqrt(radicand: &Prob, digits: u32) -> Root {
    if !radicand.is_positive() {
        return Root { value: Prob::zero(), exact: radicand.is_zero() };
    }

    let numer = radicand.numer();
    let denom = radicand.denom();

    let numer_root = numer.sqrt();
    let denom_root = denom.sqrt();
    if &numer_root * &numer_root == *numer && &denom_root * &denom_root == *denom {
        return Root { value: BigRational::new(numer_root, denom_root), exact: true };
    }

    // sqrt(n/d) = sqrt(n*d) / d
    let scale = pow10(digits);
    let root = (numer * denom * &scale * &scale).sqrt();
    Root { value: BigRational::new(root, denom * scale), exact: false }
}

/// Render `value` as a decimal truncated to `digits` fractional digits
pub fn to_decimal_string(value: &Prob, digits: u32) -> String {
    let sign = if value.is_negative() { "-" } else { "" };
    let magnitude = value.abs();
    let scale = pow10(digits);
    let scaled = (magnitude.numer() * &scale) / magnitude.denom();

    if digits == 0 {
        return format!("{sign}{scaled}");
    }

    let int_part = &scaled / &scale;
    let frac_part = &scaled % &scale;
    format!(
        "{sign}{int_part}.{frac:0>width$}",
        frac = frac_part.to_string(),
        width = digits as usize
    )
}

/// Parse `"a/b"`, `"a"` or a plain decimal such as `"0.006"` into an exact rational
pub fn parse_prob(text: &str) -> PityResult<Prob> {
    let text = text.trim();
    let invalid = || PityError::InvalidConfig(format!("not a rational number: {text:?}"));

    // At most one leading sign, nowhere else
    let unsigned = text.strip_prefix(['-', '+']).unwrap_or(text);
    if unsigned.contains(['-', '+']) {
        return Err(invalid());
    }

    if let Some((int_part, frac_part)) = text.split_once('.') {
        let (negative, int_digits) = match int_part.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, int_part.strip_prefix('+').unwrap_or(int_part)),
        };
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if frac_part.is_empty() || !all_digits(int_digits) || !all_digits(frac_part) {
            return Err(invalid());
        }
        let digits: BigInt = format!("{int_digits}{frac_part}").parse().map_err(|_| invalid())?;
        let value = BigRational::new(digits, pow10(frac_part.len() as u32));
        return Ok(if negative { -value } else { value });
    }

    let value: BigRational = text.parse().map_err(|_| invalid())?;
    Ok(value)
}

/// Serde adapter storing a [`Prob`] as its exact string form
pub mod prob_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{Prob, parse_prob};

    pub fn serialize<S: Serializer>(value: &Prob, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Prob, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_prob(&text).map_err(serde::de::Error::custom)
    }
}
