//! Scalar domain types that have no direct std counterpart.

mod number;
mod timestamp;

pub use number::{MAX_NUMBER_DIGITS, Number, NumberError};
pub use timestamp::{MAX_TIMESTAMP_PRECISION, Timestamp, TimestampError};
