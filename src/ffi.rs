//! C entry points
//!
//! Lets C code on the board (the FreeRTOS demo, for instance) use the
//! console through the classic `uart.h` / `uartstdio.h` names. Every function
//! works on the process-wide console and fails with -1 while none is
//! installed. `uart_printf` has no counterpart because C variadics cannot be
//! defined in stable Rust; `uart_print` covers templates without arguments.
//!
//! # Safety
//!
//! Callers must pass valid, NUL-terminated strings and buffers of at least the
//! stated length.

#![allow(clippy::not_unsafe_ptr_arg_deref)]

use crate::console;
use crate::error::ConsoleError;

/// Length of a NUL-terminated C string
fn c_strlen(s: *const u8) -> usize {
    let mut len = 0;
    unsafe {
        while *s.add(len) != 0 {
            len += 1;
        }
    }
    len
}

fn status(result: Result<usize, ConsoleError>) -> i32 {
    match result {
        Ok(n) => n as i32,
        Err(_) => -1,
    }
}

/// Initialize UART0 and install it as the console
#[no_mangle]
pub extern "C" fn uart_init() -> i32 {
    status(console::init_uart0().map(|_| 0))
}

/// Transmit one byte, blocking while the FIFO is full
#[no_mangle]
pub extern "C" fn uart_putc(c: i32) {
    let _ = console::with(|con| con.putc(c as u8));
}

/// Transmit a NUL-terminated string untranslated
#[no_mangle]
pub extern "C" fn uart_puts(s: *const u8) -> i32 {
    if s.is_null() {
        return -1;
    }
    let bytes = unsafe { core::slice::from_raw_parts(s, c_strlen(s)) };
    status(console::with(|con| con.puts(bytes)))
}

/// Receive one byte, blocking until one arrives
#[no_mangle]
pub extern "C" fn uart_getc() -> i32 {
    status(console::with(|con| con.getc() as usize))
}

/// Write `len` bytes with LF → CR LF translation
///
/// Returns the number of bytes consumed, 0 for a null buffer.
#[no_mangle]
pub extern "C" fn uart_write(buf: *const u8, len: u32) -> i32 {
    if buf.is_null() {
        return 0;
    }
    let bytes = unsafe { core::slice::from_raw_parts(buf, len as usize) };
    status(console::with(|con| con.write(bytes)))
}

/// Read an edited line into `buf` (capacity `len`, terminator included)
///
/// Returns the number of characters stored, -1 for a null or empty buffer.
#[no_mangle]
pub extern "C" fn uart_gets(buf: *mut u8, len: u32) -> i32 {
    if buf.is_null() || len == 0 {
        return -1;
    }
    let line = unsafe { core::slice::from_raw_parts_mut(buf, len as usize) };
    status(console::with(|con| con.read_line(line)).and_then(|r| r))
}

/// Format a NUL-terminated template that takes no arguments
#[no_mangle]
pub extern "C" fn uart_print(template: *const u8) -> i32 {
    if template.is_null() {
        return -1;
    }
    let bytes = unsafe { core::slice::from_raw_parts(template, c_strlen(template)) };
    status(console::with(|con| con.printf(bytes, &[])).and_then(|r| r.map(|_| 0)))
}
