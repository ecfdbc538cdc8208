//! Common constants shared by the predictor tables.

/// Width of an instruction address in bits.
pub const ADDR_BITS: u32 = 32;

/// Size of one instruction in bytes; the fall-through distance.
pub const INSTRUCTION_BYTES: u32 = 4;

/// Number of low address bits ignored for indexing (4-byte alignment).
pub const ALIGN_BITS: u32 = 2;

/// Largest supported history register length (one machine word).
pub const MAX_HISTORY_LENGTH: usize = 64;

/// Largest local history length for the two-level predictor; its second level
/// holds `2^history_length` counters.
pub const MAX_LOCAL_HISTORY_LENGTH: usize = 24;

/// Largest supported table index width.
pub const MAX_INDEX_BITS: u32 = 24;

/// Largest supported perceptron weight width.
pub const MAX_WEIGHT_BITS: u32 = 16;

/// Largest supported direction counter width.
pub const MAX_COUNTER_BITS: u32 = 8;

/// Perceptron training threshold slope: `theta = round(1.93 * H + 14)`.
pub const THETA_COEFF: f64 = 1.93;

/// Perceptron training threshold intercept.
pub const THETA_BIAS: f64 = 14.0;
