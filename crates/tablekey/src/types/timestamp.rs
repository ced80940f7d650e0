use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error as ThisError;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Finest supported fractional-second precision (nanoseconds).
pub const MAX_TIMESTAMP_PRECISION: u8 = 9;

const NANOS_PER_SECOND: u32 = 1_000_000_000;

///
/// TimestampError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum TimestampError {
    #[error("timestamp {seconds}s/{nanos}ns is outside the supported range")]
    OutOfRange { seconds: i64, nanos: u32 },

    #[error("timestamp precision {0} exceeds {MAX_TIMESTAMP_PRECISION}")]
    InvalidPrecision(u8),

    #[error("timestamp parse error: {0}")]
    Parse(String),
}

///
/// Timestamp
///
/// UTC instant with nanosecond resolution.
/// Supported range: `-6383-01-01T00:00:00Z` through `9999-12-31T23:59:59.999999999Z`.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct Timestamp {
    seconds: i64,
    nanos: u32,
}

impl Timestamp {
    pub const MIN: Self = Self {
        seconds: -263_595_254_400,
        nanos: 0,
    };
    pub const MAX: Self = Self {
        seconds: 253_402_300_799,
        nanos: NANOS_PER_SECOND - 1,
    };
    pub const EPOCH: Self = Self {
        seconds: 0,
        nanos: 0,
    };

    /// Construct from unix seconds plus a nanosecond fraction.
    pub const fn new(seconds: i64, nanos: u32) -> Result<Self, TimestampError> {
        let candidate = Self { seconds, nanos };
        if nanos >= NANOS_PER_SECOND
            || seconds < Self::MIN.seconds
            || seconds > Self::MAX.seconds
        {
            return Err(TimestampError::OutOfRange { seconds, nanos });
        }

        Ok(candidate)
    }

    /// Construct from whole unix seconds.
    pub const fn from_seconds(seconds: i64) -> Result<Self, TimestampError> {
        Self::new(seconds, 0)
    }

    /// Construct from unix milliseconds.
    pub fn from_millis(millis: i64) -> Result<Self, TimestampError> {
        let seconds = millis.div_euclid(1_000);
        let nanos = u32::try_from(millis.rem_euclid(1_000) * 1_000_000)
            .map_err(|_| TimestampError::OutOfRange { seconds, nanos: 0 })?;

        Self::new(seconds, nanos)
    }

    #[must_use]
    pub const fn seconds(&self) -> i64 {
        self.seconds
    }

    #[must_use]
    pub const fn nanos(&self) -> u32 {
        self.nanos
    }

    /// Parse an RFC 3339 timestamp (`2024-03-01T12:00:00.5Z`).
    pub fn parse_rfc3339(s: &str) -> Result<Self, TimestampError> {
        let dt = OffsetDateTime::parse(s, &Rfc3339)
            .map_err(|err| TimestampError::Parse(err.to_string()))?;

        Self::new(dt.unix_timestamp(), dt.nanosecond())
    }

    /// Render as RFC 3339 when representable (years 0000–9999).
    #[must_use]
    pub fn to_rfc3339(&self) -> Option<String> {
        let dt = OffsetDateTime::from_unix_timestamp(self.seconds)
            .ok()?
            .replace_nanosecond(self.nanos)
            .ok()?;

        dt.format(&Rfc3339).ok()
    }

    /// Drop sub-precision digits (precision counts fractional decimal digits).
    pub fn truncate_to(self, precision: u8) -> Result<Self, TimestampError> {
        let unit = unit_nanos(precision)?;

        Ok(Self {
            seconds: self.seconds,
            nanos: self.nanos - self.nanos % unit,
        })
    }

    /// Fraction expressed in units of `10^-precision` seconds.
    pub(crate) fn fraction_units(&self, precision: u8) -> Result<u32, TimestampError> {
        Ok(self.nanos / unit_nanos(precision)?)
    }

    /// Rebuild from seconds and a fraction expressed at `precision`.
    pub(crate) fn from_fraction_units(
        seconds: i64,
        units: u32,
        precision: u8,
    ) -> Result<Self, TimestampError> {
        let nanos = units
            .checked_mul(unit_nanos(precision)?)
            .ok_or(TimestampError::OutOfRange { seconds, nanos: units })?;

        Self::new(seconds, nanos)
    }

    /// Next instant at `precision`, or `None` past [`Timestamp::MAX`].
    pub(crate) fn next_at(self, precision: u8) -> Result<Option<Self>, TimestampError> {
        let unit = unit_nanos(precision)?;
        let truncated = self.truncate_to(precision)?;
        let nanos = truncated.nanos + unit;

        let next = if nanos >= NANOS_PER_SECOND {
            match truncated.seconds.checked_add(1) {
                Some(seconds) => Self::new(seconds, nanos - NANOS_PER_SECOND),
                None => return Ok(None),
            }
        } else {
            Self::new(truncated.seconds, nanos)
        };

        Ok(next.ok())
    }
}

// Nanoseconds per unit at the given precision.
fn unit_nanos(precision: u8) -> Result<u32, TimestampError> {
    if precision > MAX_TIMESTAMP_PRECISION {
        return Err(TimestampError::InvalidPrecision(precision));
    }

    Ok(10u32.pow(u32::from(MAX_TIMESTAMP_PRECISION - precision)))
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_rfc3339() {
            Some(text) => f.write_str(&text),
            None => write!(f, "{}.{:09}s", self.seconds, self.nanos),
        }
    }
}

///
/// TESTS
///
