use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Zero;
use std::{cmp::Ordering, fmt, str::FromStr};
use thiserror::Error as ThisError;

/// Maximum count of significant digits one `Number` may carry.
pub const MAX_NUMBER_DIGITS: usize = 4096;

// Exponents inside this window render without scientific notation.
const PLAIN_EXPONENT_MIN: i64 = -20;
const PLAIN_EXPONENT_MAX: i64 = 40;

///
/// NumberError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum NumberError {
    #[error("invalid number literal '{0}'")]
    InvalidLiteral(String),

    #[error("number exponent overflows the supported range")]
    ExponentOverflow,

    #[error("number has {len} significant digits (limit {max})")]
    TooManyDigits { len: usize, max: usize },

    #[error("non-finite floating point value cannot become a number")]
    NonFinite,
}

///
/// Number
///
/// Arbitrary-precision decimal held in normalized scientific form:
/// `value = ±0.d1d2d3… × 10^(exponent + 1)`, i.e. `exponent` is the power of
/// ten of the first significant digit.
///
/// Invariants:
/// - zero has no digits, exponent 0, and is never negative
/// - non-zero digits are ASCII, with no leading or trailing `'0'`
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Number {
    negative: bool,
    digits: Vec<u8>,
    exponent: i64,
}

impl Number {
    pub const ZERO: Self = Self {
        negative: false,
        digits: Vec::new(),
        exponent: 0,
    };

    /// Build from an unscaled integer and a scale (`value = unscaled × 10^-scale`).
    pub fn from_parts(unscaled: &BigInt, scale: i64) -> Result<Self, NumberError> {
        if unscaled.is_zero() {
            return Ok(Self::ZERO);
        }

        let negative = unscaled.sign() == Sign::Minus;
        let digits = unscaled.magnitude().to_str_radix(10).into_bytes();
        let digit_count =
            i64::try_from(digits.len()).map_err(|_| NumberError::ExponentOverflow)?;

        // exponent = (digit_count - 1) - scale
        let exponent = digit_count
            .checked_sub(1)
            .and_then(|d| d.checked_sub(scale))
            .ok_or(NumberError::ExponentOverflow)?;

        Self::from_scientific(negative, digits, exponent)
    }

    /// Build from raw ASCII digits whose first digit sits at `10^exponent`.
    ///
    /// Leading and trailing zeros are normalized away.
    pub(crate) fn from_scientific(
        negative: bool,
        mut digits: Vec<u8>,
        mut exponent: i64,
    ) -> Result<Self, NumberError> {
        let leading = digits.iter().take_while(|d| **d == b'0').count();
        if leading == digits.len() {
            return Ok(Self::ZERO);
        }
        if leading > 0 {
            digits.drain(..leading);
            let shift = i64::try_from(leading).map_err(|_| NumberError::ExponentOverflow)?;
            exponent = exponent
                .checked_sub(shift)
                .ok_or(NumberError::ExponentOverflow)?;
        }
        while digits.last() == Some(&b'0') {
            digits.pop();
        }

        if digits.len() > MAX_NUMBER_DIGITS {
            return Err(NumberError::TooManyDigits {
                len: digits.len(),
                max: MAX_NUMBER_DIGITS,
            });
        }

        Ok(Self {
            negative,
            digits,
            exponent,
        })
    }

    /// Convert a finite double into its shortest round-trip decimal form.
    pub fn from_f64(value: f64) -> Result<Self, NumberError> {
        if !value.is_finite() {
            return Err(NumberError::NonFinite);
        }

        format!("{value:e}").parse()
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.digits.is_empty()
    }

    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.negative
    }

    /// Power of ten of the first significant digit (0 for zero).
    #[must_use]
    pub const fn exponent(&self) -> i64 {
        self.exponent
    }

    /// Significant digits as ASCII (empty for zero).
    #[must_use]
    pub fn digits(&self) -> &[u8] {
        &self.digits
    }

    /// Decompose into an unscaled integer and its scale.
    #[must_use]
    pub fn to_parts(&self) -> (BigInt, i128) {
        if self.is_zero() {
            return (BigInt::zero(), 0);
        }

        let magnitude =
            BigUint::parse_bytes(&self.digits, 10).unwrap_or_else(BigUint::zero);
        let sign = if self.negative { Sign::Minus } else { Sign::Plus };
        let digit_count = i128::try_from(self.digits.len()).unwrap_or(i128::MAX);
        let scale = digit_count - 1 - i128::from(self.exponent);

        (BigInt::from_biguint(sign, magnitude), scale)
    }

    fn cmp_magnitude(&self, other: &Self) -> Ordering {
        self.exponent
            .cmp(&other.exponent)
            .then_with(|| self.digits.cmp(&other.digits))
    }

    fn sign_rank(&self) -> u8 {
        match (self.is_zero(), self.negative) {
            (true, _) => 1,
            (false, true) => 0,
            (false, false) => 2,
        }
    }
}

impl Default for Number {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sign_rank()
            .cmp(&other.sign_rank())
            .then_with(|| match self.sign_rank() {
                0 => other.cmp_magnitude(self),
                2 => self.cmp_magnitude(other),
                _ => Ordering::Equal,
            })
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        let digits = value.unsigned_abs().to_string().into_bytes();
        let exponent = i64::try_from(digits.len()).unwrap_or(1) - 1;

        Self::from_scientific(value < 0, digits, exponent).unwrap_or(Self::ZERO)
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Self::from(i64::from(value))
    }
}

impl FromStr for Number {
    type Err = NumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || NumberError::InvalidLiteral(s.to_string());

        let trimmed = s.trim();
        let (negative, unsigned) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let (mantissa, exp) = match unsigned.find(['e', 'E']) {
            Some(at) => {
                let exp: i64 = unsigned[at + 1..].parse().map_err(|_| invalid())?;
                (&unsigned[..at], exp)
            }
            None => (unsigned, 0),
        };

        let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let mut digits = Vec::with_capacity(int_part.len() + frac_part.len());
        digits.extend_from_slice(int_part.as_bytes());
        digits.extend_from_slice(frac_part.as_bytes());

        // The first digit of `digits` sits at 10^(int_len - 1 + exp).
        let int_len = i64::try_from(int_part.len()).map_err(|_| NumberError::ExponentOverflow)?;
        let exponent = int_len
            .checked_sub(1)
            .and_then(|e| e.checked_add(exp))
            .ok_or(NumberError::ExponentOverflow)?;

        let number = Self::from_scientific(negative, digits, exponent)?;

        Ok(if number.is_zero() { Self::ZERO } else { number })
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        if self.negative {
            f.write_str("-")?;
        }

        // digits are ASCII by construction
        let digits = String::from_utf8_lossy(&self.digits);
        let len = i64::try_from(self.digits.len()).unwrap_or(i64::MAX);

        if !(PLAIN_EXPONENT_MIN..=PLAIN_EXPONENT_MAX).contains(&self.exponent) {
            let (head, tail) = digits.split_at(1);
            if tail.is_empty() {
                return write!(f, "{head}E{}", self.exponent);
            }
            return write!(f, "{head}.{tail}E{}", self.exponent);
        }

        if self.exponent < 0 {
            let zeros = usize::try_from(-self.exponent - 1).unwrap_or(0);
            return write!(f, "0.{}{digits}", "0".repeat(zeros));
        }

        let int_len = self.exponent + 1;
        if int_len >= len {
            let zeros = usize::try_from(int_len - len).unwrap_or(0);
            return write!(f, "{digits}{}", "0".repeat(zeros));
        }

        let split = usize::try_from(int_len).unwrap_or(0);
        let (int_digits, frac_digits) = digits.split_at(split);
        write!(f, "{int_digits}.{frac_digits}")
    }
}

///
/// TESTS
///
