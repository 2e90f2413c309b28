//! Byte channel abstraction
//!
//! The lowest layer of the console: a blocking single-byte transmit/receive
//! primitive. Hardware drivers implement the four polling methods and get
//! blocking `putc`/`getc` for free.

use core::hint::spin_loop;
use heapless::{Deque, Vec};

/// Polled byte transport underneath the console
pub trait ByteChannel {
    /// True when the transmitter can accept another byte
    fn transmit_ready(&mut self) -> bool;

    /// Hand one byte to the transmitter. Only valid after `transmit_ready`.
    fn transmit(&mut self, byte: u8);

    /// True when at least one received byte is waiting
    fn receive_ready(&mut self) -> bool;

    /// Take one received byte. Only valid after `receive_ready`.
    fn receive(&mut self) -> u8;

    /// Transmit one byte, spinning until the hardware is ready
    fn putc(&mut self, byte: u8) {
        while !self.transmit_ready() {
            spin_loop();
        }
        self.transmit(byte);
    }

    /// Receive one byte, spinning until data is available
    fn getc(&mut self) -> u8 {
        while !self.receive_ready() {
            spin_loop();
        }
        self.receive()
    }
}

impl<T: ByteChannel + ?Sized> ByteChannel for &mut T {
    fn transmit_ready(&mut self) -> bool {
        (**self).transmit_ready()
    }

    fn transmit(&mut self, byte: u8) {
        (**self).transmit(byte)
    }

    fn receive_ready(&mut self) -> bool {
        (**self).receive_ready()
    }

    fn receive(&mut self) -> u8 {
        (**self).receive()
    }
}

/// In-memory channel: scripted input, captured output
///
/// Used for host-side testing and for driving the console without hardware.
/// Output past `OUT` bytes is counted in `overflowed` and discarded. Receiving
/// from an empty input queue blocks forever, like an idle UART.
pub struct BufferChannel<const IN: usize, const OUT: usize> {
    input: Deque<u8, IN>,
    output: Vec<u8, OUT>,
    overflowed: usize,
}

impl<const IN: usize, const OUT: usize> BufferChannel<IN, OUT> {
    /// Create an empty channel
    pub const fn new() -> Self {
        Self {
            input: Deque::new(),
            output: Vec::new(),
            overflowed: 0,
        }
    }

    /// Queue bytes for the receiver, returning how many fit
    pub fn feed(&mut self, bytes: &[u8]) -> usize {
        let mut queued = 0;
        for &byte in bytes {
            if self.input.push_back(byte).is_err() {
                break;
            }
            queued += 1;
        }
        queued
    }

    /// Bytes transmitted so far
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Forget captured output
    pub fn clear_output(&mut self) {
        self.output.clear();
        self.overflowed = 0;
    }

    /// Received bytes not consumed yet
    pub fn pending_input(&self) -> usize {
        self.input.len()
    }

    /// Transmitted bytes that did not fit the capture buffer
    pub fn overflowed(&self) -> usize {
        self.overflowed
    }
}

impl<const IN: usize, const OUT: usize> ByteChannel for BufferChannel<IN, OUT> {
    fn transmit_ready(&mut self) -> bool {
        true
    }

    fn transmit(&mut self, byte: u8) {
        if self.output.push(byte).is_err() {
            self.overflowed += 1;
        }
    }

    fn receive_ready(&mut self) -> bool {
        !self.input.is_empty()
    }

    fn receive(&mut self) -> u8 {
        self.input.pop_front().unwrap_or(0)
    }
}

/// Host channel over the process stdin/stdout
///
/// End of input is reported as a stream of ESC bytes so a pending line read
/// always terminates.
#[cfg(feature = "std")]
pub struct StdChannel {
    pending: Option<u8>,
    eof: bool,
}

#[cfg(feature = "std")]
impl StdChannel {
    pub const fn new() -> Self {
        Self {
            pending: None,
            eof: false,
        }
    }

    /// True once stdin has been exhausted
    pub fn at_eof(&self) -> bool {
        self.eof
    }
}

#[cfg(feature = "std")]
impl ByteChannel for StdChannel {
    fn transmit_ready(&mut self) -> bool {
        true
    }

    fn transmit(&mut self, byte: u8) {
        use std::io::Write;

        let mut out = std::io::stdout().lock();
        let _ = out.write_all(&[byte]);
        let _ = out.flush();
    }

    fn receive_ready(&mut self) -> bool {
        use std::io::Read;

        if self.pending.is_some() || self.eof {
            return true;
        }
        let mut byte = [0u8; 1];
        match std::io::stdin().lock().read(&mut byte) {
            Ok(1) => self.pending = Some(byte[0]),
            _ => self.eof = true,
        }
        true
    }

    fn receive(&mut self) -> u8 {
        self.pending.take().unwrap_or(0x1b)
    }
}
