//! Console front end
//!
//! [`Console`] bundles a byte channel with its line-reader state and
//! formatting options. One console can be installed process-wide; the
//! `print!`, `println!` and `printf!` macros and the C entry points all go
//! through it. Output is silently dropped while no console is installed.

use crate::channel::ByteChannel;
use crate::drivers::{SifiveUart, UartConfig};
use crate::error::ConsoleError;
use crate::format::{self, Arg, Args, HexCase};
use crate::reader::{self, LineState};
use crate::writer;
use core::fmt::{self, Write};
use spin::{Mutex, Once};

/// Console options
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub hex_case: HexCase,
}

impl ConsoleConfig {
    /// Byte-compatible with the classic uartstdio output
    pub const LEGACY: ConsoleConfig = ConsoleConfig {
        hex_case: HexCase::Legacy,
    };
}

/// Console bound to one byte channel
pub struct Console<C: ByteChannel> {
    channel: C,
    line: LineState,
    config: ConsoleConfig,
}

impl<C: ByteChannel> Console<C> {
    /// Create a console with legacy options
    pub const fn new(channel: C) -> Self {
        Self::with_config(channel, ConsoleConfig::LEGACY)
    }

    pub const fn with_config(channel: C, config: ConsoleConfig) -> Self {
        Console {
            channel,
            line: LineState::new(),
            config,
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// CR-pairing state of the input side
    pub fn line_state(&self) -> LineState {
        self.line
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Give the channel back
    pub fn into_inner(self) -> C {
        self.channel
    }

    /// Transmit one byte untranslated
    pub fn putc(&mut self, byte: u8) {
        self.channel.putc(byte);
    }

    /// Receive one byte, blocking
    pub fn getc(&mut self) -> u8 {
        self.channel.getc()
    }

    /// Transmit bytes untranslated
    pub fn puts(&mut self, s: &[u8]) -> usize {
        writer::puts(&mut self.channel, s)
    }

    /// Transmit bytes with LF → CR LF translation
    pub fn write(&mut self, buf: &[u8]) -> usize {
        writer::write(&mut self.channel, buf)
    }

    /// Read one edited line into `buf`
    pub fn read_line(&mut self, buf: &mut [u8]) -> Result<usize, ConsoleError> {
        reader::read_line(&mut self.channel, &mut self.line, buf)
    }

    /// Formatted output
    pub fn printf<T>(&mut self, template: &T, args: &[Arg<'_>]) -> Result<(), ConsoleError>
    where
        T: AsRef<[u8]> + ?Sized,
    {
        format::printf(&mut self.channel, template, args, self.config.hex_case)
    }

    /// Formatted output from an open argument cursor
    pub fn vprintf<T>(&mut self, template: &T, args: &mut Args<'_, '_>) -> Result<(), ConsoleError>
    where
        T: AsRef<[u8]> + ?Sized,
    {
        format::vprintf(&mut self.channel, template, args, self.config.hex_case)
    }
}

impl<C: ByteChannel> fmt::Write for Console<C> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write(s.as_bytes());
        Ok(())
    }
}

/// Channel type held by the process-wide console
pub type SharedChannel = &'static mut (dyn ByteChannel + Send);

/// Global console instance
static CONSOLE: Mutex<Option<Console<SharedChannel>>> = Mutex::new(None);

/// Install the process-wide console, returning the one it replaces
pub fn install(channel: SharedChannel, config: ConsoleConfig) -> Option<Console<SharedChannel>> {
    CONSOLE
        .lock()
        .replace(Console::with_config(channel, config))
}

/// Remove the process-wide console
pub fn uninstall() -> Option<Console<SharedChannel>> {
    CONSOLE.lock().take()
}

pub fn is_installed() -> bool {
    CONSOLE.lock().is_some()
}

/// Run `f` on the process-wide console
///
/// The console lock is held for the duration of `f`; calling back into this
/// module from `f` deadlocks.
pub fn with<R>(f: impl FnOnce(&mut Console<SharedChannel>) -> R) -> Result<R, ConsoleError> {
    let mut guard = CONSOLE.lock();
    let console = guard.as_mut().ok_or(ConsoleError::NotInstalled)?;
    Ok(f(console))
}

/// HiFive1 UART0
static mut UART0: SifiveUart = SifiveUart::new(UartConfig::HIFIVE1);
static UART0_INIT: Once<Result<(), ConsoleError>> = Once::new();

/// Bring up UART0 and install it as the console
///
/// Only the first call touches the hardware; later calls report its outcome.
pub fn init_uart0() -> Result<(), ConsoleError> {
    *UART0_INIT.call_once(|| {
        // Once guarantees this is the only reference ever created
        let uart = unsafe { &mut *core::ptr::addr_of_mut!(UART0) };
        uart.init()?;
        install(uart, ConsoleConfig::LEGACY);
        Ok(())
    })
}

/// Print formatted text to console
pub fn print(args: fmt::Arguments) {
    let _ = with(|console| console.write_fmt(args));
}

/// Constrained printf on the process-wide console
pub fn printf<T>(template: &T, args: &[Arg<'_>]) -> Result<(), ConsoleError>
where
    T: AsRef<[u8]> + ?Sized,
{
    with(|console| console.printf(template, args))?
}

/// Print macro for console use
#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => {
        $crate::console::print(format_args!($($arg)*));
    };
}

/// Print with newline macro
#[macro_export]
macro_rules! println {
    () => {
        $crate::print!("\n");
    };
    ($($arg:tt)*) => {
        $crate::console::print(format_args!("{}\n", format_args!($($arg)*)))
    };
}

/// printf-style output with `%` directives
///
/// Arguments are converted with `Arg::from`, so integers, chars, strings and
/// pointers can be passed directly.
#[macro_export]
macro_rules! printf {
    ($template:expr $(, $arg:expr)* $(,)?) => {
        $crate::console::printf($template, &[$($crate::format::Arg::from($arg)),*])
    };
}


#[cfg(test)]
mod tests {
    use super::test_support::{captured, feed, install_recorder, LOCK};
    use super::*;
    use crate::channel::BufferChannel;

    type Chan = BufferChannel<64, 256>;

    #[test]
    fn test_console_write() {
        let mut console = Console::new(Chan::new());
        console.write(b"Hello, HiFive1!\n");
        assert_eq!(console.channel().output(), b"Hello, HiFive1!\r\n");
    }

    #[test]
    fn test_console_formatting() {
        let mut console = Console::new(Chan::new());
        write!(&mut console, "Test {}\n", 42).unwrap();
        assert_eq!(console.channel().output(), b"Test 42\r\n");
    }

    #[test]
    fn test_console_printf_uses_config() {
        let mut legacy = Console::new(Chan::new());
        legacy.printf("%X", &[Arg::Uint(0xAB)]).unwrap();
        assert_eq!(legacy.channel().output(), b"ab");

        let mut upper = Console::with_config(
            Chan::new(),
            ConsoleConfig {
                hex_case: HexCase::Upper,
            },
        );
        upper.printf("%X", &[Arg::Uint(0xAB)]).unwrap();
        assert_eq!(upper.into_inner().output(), b"AB");
    }

    #[test]
    fn test_console_keeps_line_state() {
        let mut ch = Chan::new();
        ch.feed(b"cmd\r\nnext\r");
        let mut console = Console::new(ch);
        let mut buf = [0u8; 16];

        assert_eq!(console.read_line(&mut buf), Ok(3));
        assert!(console.line_state().last_was_cr());
        assert_eq!(console.read_line(&mut buf), Ok(4));
        assert_eq!(&buf[..5], b"next\0");
    }

    #[test]
    fn test_console_vprintf() {
        let list = [Arg::from("a"), Arg::from("b")];
        let mut args = Args::new(&list);
        let mut console = Console::new(Chan::new());
        console.vprintf("%s", &mut args).unwrap();
        console.vprintf("-%s", &mut args).unwrap();
        assert_eq!(console.channel().output(), b"a-b");
    }

    #[test]
    fn test_console_raw_io() {
        let mut ch = Chan::new();
        ch.feed(b"k");
        let mut console = Console::new(ch);
        assert_eq!(console.getc(), b'k');
        console.putc(b'\n');
        console.puts(b"\n");
        assert_eq!(console.channel_mut().output(), b"\n\n");
    }

    #[test]
    fn test_global_console() {
        let _guard = LOCK.lock();

        uninstall();
        assert!(!is_installed());
        assert_eq!(
            printf("%d", &[Arg::Int(1)]),
            Err(ConsoleError::NotInstalled)
        );
        crate::println!("dropped");

        install_recorder();
        assert!(is_installed());
        crate::print!("boot {}", 1);
        crate::println!(" ok");
        crate::printf!("[%s] %04x\n", "uart0", 0x2au32).unwrap();
        assert_eq!(
            crate::printf!("%s", 5),
            Err(ConsoleError::ArgumentMismatch {
                index: 0,
                directive: b's'
            })
        );
        assert_eq!(captured(), b"boot 1 ok\r\n[uart0] 002a\r\n".to_vec());

        feed(b"hi\r");
        let mut buf = [0u8; 8];
        assert_eq!(with(|c| c.read_line(&mut buf)), Ok(Ok(2)));

        assert!(uninstall().is_some());
    }
}
