//! Property-based tests for the printf engine and line reader
//!
//! Numeric output is checked against `core::fmt`, which pads the same way
//! for the widths the scratch buffer allows.

use hifive_console::format::{printf, SCRATCH_CAPACITY};
use hifive_console::reader::{read_line, LineState};
use hifive_console::{Arg, BufferChannel, HexCase};
use proptest::prelude::*;

type Chan = BufferChannel<128, 512>;

fn render(template: &str, args: &[Arg<'_>]) -> String {
    let mut ch = Chan::new();
    printf(&mut ch, template, args, HexCase::Legacy).expect("printf failed");
    String::from_utf8(ch.output().to_vec()).expect("non-UTF-8 output")
}

/// Printable text without directives, with the odd newline
fn literal_text() -> impl Strategy<Value = String> {
    "[ -$&-~\n]{0,80}".prop_map(|s| s.to_string())
}

fn width() -> impl Strategy<Value = usize> {
    0usize..=SCRATCH_CAPACITY
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Literal text passes through with CR inserted before each LF
    #[test]
    fn literal_templates_pass_through(text in literal_text()) {
        prop_assert_eq!(render(&text, &[]), text.replace('\n', "\r\n"));
    }

    #[test]
    fn signed_decimal_matches_core_fmt(v in any::<i32>(), w in width()) {
        prop_assert_eq!(render("%d", &[Arg::Int(v)]), format!("{}", v));
        prop_assert_eq!(
            render(&format!("%{}d", w), &[Arg::Int(v)]),
            format!("{:>w$}", v, w = w)
        );
        prop_assert_eq!(
            render(&format!("%0{}d", w), &[Arg::Int(v)]),
            format!("{:0w$}", v, w = w)
        );
    }

    #[test]
    fn unsigned_decimal_matches_core_fmt(v in any::<u32>(), w in width()) {
        prop_assert_eq!(
            render(&format!("%0{}u", w), &[Arg::Uint(v)]),
            format!("{:0w$}", v, w = w)
        );
    }

    #[test]
    fn hex_matches_core_fmt(v in any::<u32>(), w in width()) {
        prop_assert_eq!(
            render(&format!("%{}x", w), &[Arg::Uint(v)]),
            format!("{:>w$x}", v, w = w)
        );
        prop_assert_eq!(
            render(&format!("%0{}X", w), &[Arg::Uint(v)]),
            format!("{:0w$x}", v, w = w)
        );
    }

    #[test]
    fn string_padding(s in "[a-z]{0,12}", w in 0usize..24) {
        prop_assert_eq!(
            render(&format!("%{}s|", w), &[Arg::from(s.as_str())]),
            format!("{:<w$}|", s, w = w)
        );
    }

    #[test]
    fn output_is_repeatable(v in any::<i32>(), s in "[a-z]{0,8}") {
        let args = [Arg::Int(v), Arg::from(s.as_str()), Arg::Uint(v as u32)];
        let first = render("%08d %5s %x\n", &args);
        let second = render("%08d %5s %x\n", &args);
        prop_assert_eq!(first, second);
    }

    /// Stored text is the typed line cut to capacity - 1, NUL-terminated
    #[test]
    fn read_line_respects_capacity(line in "[a-z0-9 ]{0,40}", capacity in 1usize..32) {
        let mut ch = Chan::new();
        ch.feed(line.as_bytes());
        ch.feed(b"\r");
        let mut state = LineState::new();
        let mut buf = vec![0xffu8; capacity];

        let count = read_line(&mut ch, &mut state, &mut buf).expect("read_line failed");
        let expected = line.len().min(capacity - 1);

        prop_assert_eq!(count, expected);
        prop_assert_eq!(&buf[..count], &line.as_bytes()[..expected]);
        prop_assert_eq!(buf[count], 0);
        prop_assert!(state.last_was_cr());
        prop_assert_eq!(ch.pending_input(), 0);
    }
}
