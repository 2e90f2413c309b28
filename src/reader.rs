//! Line reader with minimal editing
//!
//! Accumulates one line from a channel into a caller buffer. Backspace rubs
//! out the previous character, CR, LF and ESC end the line, and a CR LF pair
//! counts as a single terminator even when the LF arrives on the next call.
//! Accepted characters are echoed so the terminal shows what was typed.

use crate::channel::ByteChannel;
use crate::error::ConsoleError;
use crate::writer;

const BACKSPACE: u8 = 0x08;
const ESCAPE: u8 = 0x1b;

/// Rub-out sequence for one character
const ERASE: &[u8] = b"\x08 \x08";

/// Per-stream state carried from one read to the next
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LineState {
    last_was_cr: bool,
}

impl LineState {
    pub const fn new() -> Self {
        Self { last_was_cr: false }
    }

    /// True when the previous line ended with CR
    pub fn last_was_cr(&self) -> bool {
        self.last_was_cr
    }
}

/// Read one line into `buf`
///
/// At most `buf.len() - 1` bytes are stored; the byte after the data is set
/// to 0. Input beyond that is consumed and dropped. Blocks until a
/// terminator arrives. Returns the number of stored bytes.
pub fn read_line<C: ByteChannel + ?Sized>(
    channel: &mut C,
    state: &mut LineState,
    buf: &mut [u8],
) -> Result<usize, ConsoleError> {
    // Room for the terminator is required
    let usable = buf.len().checked_sub(1).ok_or(ConsoleError::InvalidArgument)?;
    let mut count = 0;

    loop {
        let byte = channel.getc();

        if byte == BACKSPACE {
            if count > 0 {
                writer::puts(channel, ERASE);
                count -= 1;
            }
            continue;
        }

        // LF completing a CR LF pair; the CR already ended the line
        if byte == b'\n' && state.last_was_cr {
            state.last_was_cr = false;
            continue;
        }

        if byte == b'\r' || byte == b'\n' || byte == ESCAPE {
            if byte == b'\r' {
                state.last_was_cr = true;
            }
            break;
        }

        if count < usable {
            buf[count] = byte;
            count += 1;
            channel.putc(byte);
        }
    }

    buf[count] = 0;
    writer::puts(channel, b"\r\n");

    Ok(count)
}
