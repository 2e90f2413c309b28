//! Line writer
//!
//! Sends byte buffers to a channel with serial-terminal line endings: every
//! LF goes out as CR LF.

use crate::channel::ByteChannel;

/// Write `buf`, translating `\n` to `\r\n`
///
/// Returns the number of input bytes consumed; inserted carriage returns are
/// not counted.
pub fn write<C: ByteChannel + ?Sized>(channel: &mut C, buf: &[u8]) -> usize {
    for &byte in buf {
        if byte == b'\n' {
            channel.putc(b'\r');
        }
        channel.putc(byte);
    }
    buf.len()
}

/// Write `buf` untranslated, returning the byte count
pub fn puts<C: ByteChannel + ?Sized>(channel: &mut C, buf: &[u8]) -> usize {
    for &byte in buf {
        channel.putc(byte);
    }
    buf.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::BufferChannel;

    #[test]
    fn test_write_translates_newlines() {
        let mut ch: BufferChannel<1, 64> = BufferChannel::new();
        let n = write(&mut ch, b"one\ntwo\n\n");
        assert_eq!(n, 9);
        assert_eq!(ch.output(), b"one\r\ntwo\r\n\r\n");
    }

    #[test]
    fn test_write_leaves_existing_cr_alone() {
        let mut ch: BufferChannel<1, 16> = BufferChannel::new();
        write(&mut ch, b"a\r\nb");
        assert_eq!(ch.output(), b"a\r\r\nb");
    }

    #[test]
    fn test_write_empty() {
        let mut ch: BufferChannel<1, 4> = BufferChannel::new();
        assert_eq!(write(&mut ch, b""), 0);
        assert!(ch.output().is_empty());
    }

    #[test]
    fn test_puts_is_raw() {
        let mut ch: BufferChannel<1, 16> = BufferChannel::new();
        assert_eq!(puts(&mut ch, b"x\ny"), 3);
        assert_eq!(ch.output(), b"x\ny");
    }
}
