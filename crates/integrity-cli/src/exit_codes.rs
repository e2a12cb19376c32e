//! Process exit codes.
//!
//! Verification failures exit with the number of failures (1..=100).
//! Errors that stop a command from running use fixed codes above 100,
//! taken from the library error types: 101 malformed input, 102
//! unsupported format variant, 103 unusable trust anchors, 104 I/O.
//! Usage and configuration errors use 105 so they never read as a
//! failure count.

pub const SUCCESS: i32 = 0;
/// Lookup found nothing.
pub const NOT_FOUND: i32 = 1;
pub const IO_ERROR: i32 = 104;
/// Bad arguments or unreadable configuration.
pub const CONFIG_ERROR: i32 = 105;
