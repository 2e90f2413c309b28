//! Panic handler
//!
//! Firmware builds enable the `panic-handler` feature so a panic is reported
//! on the console before the hart parks itself.

use core::panic::PanicInfo;

pub fn console_panic(info: &PanicInfo) -> ! {
    crate::println!("\n!!! PANIC !!!");

    if let Some(location) = info.location() {
        crate::println!("Location: {}:{}", location.file(), location.line());
    }

    crate::println!("Message: {}", info.message());
    crate::println!("System halted.");

    loop {
        core::hint::spin_loop();
    }
}

#[cfg(all(feature = "panic-handler", not(test), not(feature = "std")))]
#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    console_panic(info)
}
