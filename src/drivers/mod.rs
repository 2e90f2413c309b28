//! UART drivers implementing the console byte channel

pub mod sifive;

pub use sifive::{SifiveUart, UartConfig};
