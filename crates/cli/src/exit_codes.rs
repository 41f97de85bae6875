//! CLI Exit Code Registry
//!
//! Single source of truth for `liftboard` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success (including "no filter chosen" prompt)        |
//! | 1    | General error (unspecified)                          |
//! | 2    | Usage error (bad filter value, no records file)      |
//! | 3    | Records file unreadable (missing, decode, columns)   |
//! | 4    | Config file unreadable or invalid                    |
//! | 5    | Output could not be written                          |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unknown filter value, no source file configured.
pub const EXIT_USAGE: u8 = 2;

/// The records file could not be turned into a record set.
/// No partial results are shown.
pub const EXIT_SOURCE: u8 = 3;

/// Config file missing (when given explicitly) or invalid.
pub const EXIT_CONFIG: u8 = 4;

/// Writing stdout or the --output file failed.
pub const EXIT_WRITE: u8 = 5;
