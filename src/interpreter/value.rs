/// The numeric value type.
///
/// Defines `Value`, literal parsing from token text, and the integer to float
/// promotion applied before a mixed-kind reduction.
pub mod core;
