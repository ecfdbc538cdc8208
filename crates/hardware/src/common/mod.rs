//! Common types used throughout the branch prediction models.
//!
//! 1. **Address Type:** A strong type for instruction addresses.
//! 2. **Constants:** Address width, alignment, and parameter limits.
//! 3. **Error Handling:** Configuration and loading errors.

/// Instruction address type.
pub mod addr;

/// Common constants used throughout the predictors.
pub mod constants;

/// Error types.
pub mod error;

pub use addr::Addr;
pub use constants::{ADDR_BITS, INSTRUCTION_BYTES};
pub use error::{ConfigError, Error};
