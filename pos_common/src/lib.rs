//! Value types shared between the order engine and the server.
mod money;

pub mod helpers;
pub mod op;

pub use money::{Money, MoneyConversionError, MINOR_UNITS_PER_MAJOR};
