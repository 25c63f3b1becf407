//! Core invoice domain: types, validation, totals, and numbering.
//!
//! Everything here is pure — no I/O and no interior mutability. The
//! storage seam lives in [`crate::store`], the creation use case in
//! [`crate::service`].

mod builder;
mod currencies;
mod error;
mod numbering;
mod totals;
mod types;
mod validation;

pub use builder::*;
pub use currencies::is_known_currency_code;
pub use error::*;
pub use numbering::*;
pub use totals::*;
pub use types::*;
pub use validation::*;
