//! Common types shared across the controller model.
//!
//! 1. **Address Types:** Request address decomposition into bank, row and column.
//! 2. **Error Handling:** Configuration-validity and simulation errors.

/// Request address decomposition.
pub mod addr;

/// Error types.
pub mod error;

pub use addr::{AddressMap, DecodedAddress};
pub use error::{ConfigError, SimError};
