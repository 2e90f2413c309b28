//! hifive_console - polled UART console for the SiFive HiFive1
//!
//! This crate provides the human-visible I/O channel of a bare-metal RISC-V
//! target: byte transmit/receive over a memory-mapped UART, an editing line
//! reader, and a small printf engine.
//!
//! Layers, lowest first:
//! - [`channel`]: the blocking byte transport trait
//! - [`writer`]: LF → CR LF output
//! - [`reader`]: line input with backspace and CR LF pairing
//! - [`format`]: `%c %d %i %u %x %X %p %s %%` with width and zero fill
//! - [`console`]: a console bundling the above, plus the process-wide
//!   instance behind `print!`, `println!` and `printf!`

#![cfg_attr(not(any(test, feature = "std")), no_std)]
// Hardware register code often uses explicit bit shifts for documentation
#![allow(clippy::identity_op)]
// Register code often needs explicit casts for memory-mapped I/O
#![allow(clippy::unnecessary_cast)]
// Channel types have const constructors that don't fit Default
#![allow(clippy::new_without_default)]

pub mod channel;
pub mod console;
pub mod drivers;
pub mod error;
pub mod ffi;
pub mod format;
pub mod panic;
pub mod reader;
pub mod writer;

pub use channel::{BufferChannel, ByteChannel};
pub use console::{Console, ConsoleConfig};
pub use error::ConsoleError;
pub use format::{Arg, Args, HexCase};
pub use reader::LineState;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Crate name
pub const NAME: &str = "hifive_console";
