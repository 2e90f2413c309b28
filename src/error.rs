//! Console error type
//!
//! Every fallible console operation reports through [`ConsoleError`]. The C
//! entry points in [`crate::ffi`] flatten it to a negative return value, and
//! [`ConsoleError::to_errno`] gives the matching POSIX code.

use core::fmt;

// Standard errno values used by the console
pub const ENODEV: i32 = 19; // No such device
pub const EINVAL: i32 = 22; // Invalid argument
pub const ENOSPC: i32 = 28; // No space left on device

/// Console errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleError {
    /// Buffer cannot hold even the terminator, or a null pointer at the C ABI
    InvalidArgument,
    /// Template asks for more arguments than were supplied
    MissingArgument { index: usize },
    /// Argument kind does not fit the directive consuming it
    ArgumentMismatch { index: usize, directive: u8 },
    /// A numeric field did not fit the conversion scratch buffer
    ScratchOverflow { capacity: usize },
    /// No process-wide console has been installed
    NotInstalled,
}

impl ConsoleError {
    /// Convert to a POSIX errno value
    pub fn to_errno(&self) -> i32 {
        match self {
            ConsoleError::InvalidArgument => EINVAL,
            ConsoleError::MissingArgument { .. } => EINVAL,
            ConsoleError::ArgumentMismatch { .. } => EINVAL,
            ConsoleError::ScratchOverflow { .. } => ENOSPC,
            ConsoleError::NotInstalled => ENODEV,
        }
    }
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleError::InvalidArgument => f.write_str("invalid argument"),
            ConsoleError::MissingArgument { index } => {
                write!(f, "missing argument #{}", index)
            }
            ConsoleError::ArgumentMismatch { index, directive } => write!(
                f,
                "argument #{} does not match directive %{}",
                index, *directive as char
            ),
            ConsoleError::ScratchOverflow { capacity } => {
                write!(f, "numeric field exceeds {} byte scratch buffer", capacity)
            }
            ConsoleError::NotInstalled => f.write_str("console not installed"),
        }
    }
}
