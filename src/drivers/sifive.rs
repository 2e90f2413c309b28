//! SiFive FE310 UART driver
//! Polled driver for the UART block found on the HiFive1 board

use crate::channel::ByteChannel;
use crate::error::ConsoleError;
use core::ptr::{read_volatile, write_volatile};

/// UART register offsets
const UART_TXDATA: usize = 0x00; // Transmit data register
const UART_RXDATA: usize = 0x04; // Receive data register
const UART_TXCTRL: usize = 0x08; // Transmit control register
const UART_RXCTRL: usize = 0x0C; // Receive control register
const UART_IE: usize = 0x10; // Interrupt enable register
const UART_IP: usize = 0x14; // Interrupt pending register
const UART_DIV: usize = 0x18; // Baud rate divisor

/// txdata/rxdata bits
const TXDATA_FULL: u32 = 1 << 31; // Transmit FIFO full
const RXDATA_EMPTY: u32 = 1 << 31; // Receive FIFO empty

/// txctrl/rxctrl bits
const TXCTRL_TXEN: u32 = 1 << 0; // Transmit enable
const RXCTRL_RXEN: u32 = 1 << 0; // Receive enable

/// ip bits
const IP_RXWM: u32 = 1 << 1; // Receive watermark (rxcnt = 0: FIFO not empty)

const DIV_MAX: u32 = 0xFFFF;

/// UART placement and line settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartConfig {
    pub base: usize,
    pub clock_hz: u32,
    pub baud: u32,
}

impl UartConfig {
    /// UART0 on the HiFive1 board
    pub const HIFIVE1: UartConfig = UartConfig {
        base: 0x1001_3000,
        clock_hz: 16_000_000,
        baud: 115_200,
    };

    /// Same placement, different baud rate
    pub const fn with_baud(self, baud: u32) -> Self {
        Self { baud, ..self }
    }

    /// Divisor so that `clock_hz / (div + 1)` is closest to `baud`
    pub fn divisor(&self) -> Result<u32, ConsoleError> {
        if self.baud == 0 || self.clock_hz < self.baud {
            return Err(ConsoleError::InvalidArgument);
        }
        let rounded = (self.clock_hz + self.baud / 2) / self.baud;
        Ok((rounded - 1).min(DIV_MAX))
    }
}

/// FE310 UART
pub struct SifiveUart {
    config: UartConfig,
    initialized: bool,
}

impl SifiveUart {
    /// Create a driver for the UART described by `config`
    pub const fn new(config: UartConfig) -> Self {
        Self {
            config,
            initialized: false,
        }
    }

    /// Driver configuration
    pub fn config(&self) -> &UartConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Program the divisor and enable the transmitter and receiver
    pub fn init(&mut self) -> Result<(), ConsoleError> {
        let div = self.config.divisor()?;

        // Polled mode only
        self.write_reg(UART_IE, 0);
        self.write_reg(UART_DIV, div);
        self.write_reg(UART_TXCTRL, TXCTRL_TXEN);
        self.write_reg(UART_RXCTRL, RXCTRL_RXEN);

        self.initialized = true;
        Ok(())
    }

    /// Read register
    fn read_reg(&self, offset: usize) -> u32 {
        unsafe { read_volatile((self.config.base + offset) as *const u32) }
    }

    /// Write register
    fn write_reg(&self, offset: usize, value: u32) {
        unsafe {
            write_volatile((self.config.base + offset) as *mut u32, value);
        }
    }
}

impl ByteChannel for SifiveUart {
    fn transmit_ready(&mut self) -> bool {
        (self.read_reg(UART_TXDATA) & TXDATA_FULL) == 0
    }

    fn transmit(&mut self, byte: u8) {
        self.write_reg(UART_TXDATA, byte as u32);
    }

    // rxdata pops the FIFO on read, so readiness comes from ip.rxwm
    fn receive_ready(&mut self) -> bool {
        (self.read_reg(UART_IP) & IP_RXWM) != 0
    }

    fn receive(&mut self) -> u8 {
        let data = self.read_reg(UART_RXDATA);
        if data & RXDATA_EMPTY != 0 {
            return 0;
        }
        (data & 0xFF) as u8
    }
}
