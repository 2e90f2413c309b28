//! Host console demo
//!
//! Runs the console over stdin/stdout so the line editor and printf engine
//! can be tried without a board. The terminal should be in raw mode
//! (`stty raw -echo`) to see the same echo behaviour as a serial terminal.

use hifive_console::channel::StdChannel;
use hifive_console::{Arg, Console, ConsoleError};

fn parse_number(text: &str) -> Option<i32> {
    match text.strip_prefix("0x") {
        Some(hex) => u32::from_str_radix(hex, 16).ok().map(|v| v as i32),
        None => text.parse().ok(),
    }
}

fn main() -> Result<(), ConsoleError> {
    let mut console = Console::new(StdChannel::new());
    console.printf(
        "\n=== %s v%s ===\ncommands: dec <n> | hex <n> | exit\n",
        &[Arg::from(hifive_console::NAME), Arg::from(hifive_console::VERSION)],
    )?;

    let mut line = [0u8; 64];
    loop {
        console.write(b"> ");
        let len = console.read_line(&mut line)?;
        if console.channel().at_eof() && len == 0 {
            break;
        }

        let text = core::str::from_utf8(&line[..len]).unwrap_or("");
        let mut words = text.split_whitespace();
        match (words.next(), words.next().and_then(parse_number)) {
            (Some("exit"), _) => break,
            (Some("dec"), Some(n)) => console.printf("%d (%010u)\n", &[n.into(), n.into()])?,
            (Some("hex"), Some(n)) => console.printf("0x%08x\n", &[n.into()])?,
            (None, _) => {}
            (Some(other), _) => console.printf("unknown command: %s\n", &[other.into()])?,
        }
    }

    console.write(b"bye\n");
    Ok(())
}
