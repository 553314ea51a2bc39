mod rupees;

pub mod op;
mod secret;

pub mod helpers;

pub use rupees::{Rupees, RupeesConversionError, FEE_CURRENCY_CODE};
pub use secret::Secret;
