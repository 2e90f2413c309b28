//! End-to-end console session over an in-memory channel

use hifive_console::format::Args;
use hifive_console::{Arg, BufferChannel, Console, ConsoleConfig, ConsoleError, HexCase};

type Chan = BufferChannel<256, 1024>;

fn console_with_input(input: &[u8]) -> Console<Chan> {
    let mut ch = Chan::new();
    assert_eq!(ch.feed(input), input.len());
    Console::new(ch)
}

#[test]
fn prompt_edit_and_reply() {
    // Terminal sends CR LF; user corrects a typo with backspace
    let mut console = console_with_input(b"led onn\x08\r\nstatus\r\n");
    let mut line = [0u8; 32];

    console.write(b"> ");
    let n = console.read_line(&mut line).unwrap();
    assert_eq!(&line[..n], b"led on");
    console
        .printf("ok: %s (%d bytes)\n", &[Arg::Str(&line[..n]), Arg::Int(n as i32)])
        .unwrap();

    console.write(b"> ");
    let n = console.read_line(&mut line).unwrap();
    assert_eq!(&line[..n], b"status");
    console
        .printf("uart0 @ %p div=%u\n", &[Arg::Addr(0x1001_3000), Arg::Uint(138)])
        .unwrap();

    let transcript = console.into_inner();
    assert_eq!(
        transcript.output(),
        &b"> led onn\x08 \x08\r\nok: led on (6 bytes)\r\n\
           > status\r\nuart0 @ 10013000 div=138\r\n"[..]
    );
    // The final LF stays queued until the next read swallows it
    assert_eq!(transcript.pending_input(), 1);
}

#[test]
fn escape_abandons_line_without_pairing() {
    let mut console = console_with_input(b"abc\x1b\nnext\r");
    let mut line = [0u8; 16];

    assert_eq!(console.read_line(&mut line), Ok(3));
    // ESC does not arm CR pairing, so the LF ends an empty line
    assert_eq!(console.read_line(&mut line), Ok(0));
    assert_eq!(console.read_line(&mut line), Ok(4));
    assert_eq!(&line[..5], b"next\0");
}

#[test]
fn hex_case_modes() {
    let mut legacy = Console::new(Chan::new());
    let mut upper = Console::with_config(
        Chan::new(),
        ConsoleConfig {
            hex_case: HexCase::Upper,
        },
    );

    legacy.printf("%X %x", &[Arg::Uint(0xCAFE), Arg::Uint(0xCAFE)]).unwrap();
    upper.printf("%X %x", &[Arg::Uint(0xCAFE), Arg::Uint(0xCAFE)]).unwrap();

    assert_eq!(legacy.channel().output(), b"cafe cafe");
    assert_eq!(upper.channel().output(), b"CAFE cafe");
}

#[test]
fn argument_list_spread_over_calls() {
    let list = [Arg::from("tx"), Arg::Uint(12), Arg::from("rx"), Arg::Uint(3)];
    let mut args = Args::new(&list);
    let mut console = Console::new(Chan::new());

    while args.remaining() > 0 {
        console.vprintf("%s=%u ", &mut args).unwrap();
    }
    assert_eq!(console.channel().output(), b"tx=12 rx=3 ");
    assert_eq!(
        console.vprintf("%s", &mut args),
        Err(ConsoleError::MissingArgument { index: 4 })
    );
}

#[test]
fn rejected_format_leaves_terminal_untouched() {
    let mut console = Console::new(Chan::new());
    console.write(b"before|");
    assert!(console.printf("%d %s", &[Arg::Int(1), Arg::Int(2)]).is_err());
    console.write(b"|after");
    assert_eq!(console.channel().output(), b"before||after");
}

#[test]
fn core_fmt_and_printf_share_line_endings() {
    use core::fmt::Write;

    let mut console = Console::new(Chan::new());
    writeln!(console, "fmt {}", 1).unwrap();
    console.printf("printf %d\n", &[Arg::Int(2)]).unwrap();
    assert_eq!(console.channel().output(), b"fmt 1\r\nprintf 2\r\n");
}
