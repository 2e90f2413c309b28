//! Constrained printf engine
//!
//! Supports `%c`, `%d`, `%i`, `%u`, `%x`, `%X`, `%p`, `%s` and `%%`, each with
//! an optional decimal field width. A leading `0` in the width selects zero
//! fill for the numeric directives; `%s` always pads with spaces, after the
//! text. Any other directive renders as the literal text `ERROR` and the rest
//! of the template is still processed.
//!
//! Arguments are typed [`Arg`] values. The template is checked against them
//! before anything is transmitted, so a missing or mismatched argument leaves
//! the terminal untouched.
//!
//! ## Numeric fields
//!
//! A numeric field is assembled in a 16-byte scratch buffer before it is
//! written. Field widths are clamped to that size; a value whose digits alone
//! do not fit (only a 64-bit address printed in decimal) is rejected up
//! front with [`ConsoleError::ScratchOverflow`].

use crate::channel::ByteChannel;
use crate::error::ConsoleError;
use crate::writer;
use heapless::Vec;

/// Size of the numeric conversion buffer
pub const SCRATCH_CAPACITY: usize = 16;

const DIGITS_LOWER: &[u8; 16] = b"0123456789abcdef";
const DIGITS_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Digit case used by `%X`
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum HexCase {
    /// `%X` prints lowercase digits, exactly like `%x`
    #[default]
    Legacy,
    /// `%X` prints uppercase digits
    Upper,
}

/// One formatting argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg<'a> {
    Int(i32),
    Uint(u32),
    Char(u8),
    /// Machine word, typically an address for `%p`
    Addr(usize),
    Str(&'a [u8]),
}

impl Arg<'_> {
    // Integer variants convert like C varargs: 32-bit values reinterpret,
    // addresses keep their full width.
    fn signed(&self) -> Option<i64> {
        match *self {
            Arg::Int(v) => Some(v as i64),
            Arg::Uint(v) => Some(v as i32 as i64),
            Arg::Char(v) => Some(v as i64),
            Arg::Addr(v) => Some(v as isize as i64),
            Arg::Str(_) => None,
        }
    }

    fn unsigned(&self) -> Option<u64> {
        match *self {
            Arg::Int(v) => Some(v as u32 as u64),
            Arg::Uint(v) => Some(v as u64),
            Arg::Char(v) => Some(v as u64),
            Arg::Addr(v) => Some(v as u64),
            Arg::Str(_) => None,
        }
    }
}

impl From<i32> for Arg<'_> {
    fn from(v: i32) -> Self {
        Arg::Int(v)
    }
}

impl From<u32> for Arg<'_> {
    fn from(v: u32) -> Self {
        Arg::Uint(v)
    }
}

impl From<u8> for Arg<'_> {
    fn from(v: u8) -> Self {
        Arg::Char(v)
    }
}

impl From<char> for Arg<'_> {
    fn from(v: char) -> Self {
        Arg::Char(v as u32 as u8)
    }
}

impl From<usize> for Arg<'_> {
    fn from(v: usize) -> Self {
        Arg::Addr(v)
    }
}

impl<T> From<*const T> for Arg<'_> {
    fn from(v: *const T) -> Self {
        Arg::Addr(v as usize)
    }
}

impl<T> From<*mut T> for Arg<'_> {
    fn from(v: *mut T) -> Self {
        Arg::Addr(v as usize)
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(v: &'a str) -> Self {
        Arg::Str(v.as_bytes())
    }
}

impl<'a> From<&'a [u8]> for Arg<'a> {
    fn from(v: &'a [u8]) -> Self {
        Arg::Str(v)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Arg<'a> {
    fn from(v: &'a [u8; N]) -> Self {
        Arg::Str(v)
    }
}

/// Cursor over an argument list
///
/// The counterpart of an opened `va_list`: each directive takes the next
/// argument, and a cursor can be handed to several [`vprintf`] calls in turn.
#[derive(Debug, Clone)]
pub struct Args<'s, 'a> {
    args: &'s [Arg<'a>],
    next: usize,
}

impl<'s, 'a> Args<'s, 'a> {
    pub const fn new(args: &'s [Arg<'a>]) -> Self {
        Self { args, next: 0 }
    }

    /// Arguments taken so far
    pub fn consumed(&self) -> usize {
        self.next
    }

    /// Arguments not taken yet
    pub fn remaining(&self) -> usize {
        self.args.len() - self.next
    }

    fn take(&mut self) -> Result<(usize, Arg<'a>), ConsoleError> {
        let index = self.next;
        let arg = *self
            .args
            .get(index)
            .ok_or(ConsoleError::MissingArgument { index })?;
        self.next += 1;
        Ok((index, arg))
    }
}

/// Parsed `%` directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Conversion {
    width: usize,
    zero_fill: bool,
    /// None when the template ends right after the `%` or its width
    directive: Option<u8>,
}

#[derive(Debug, PartialEq, Eq)]
enum Piece<'t> {
    Literal(&'t [u8]),
    Directive(Conversion),
}

/// Splits a template into literal runs and directives
struct Pieces<'t> {
    template: &'t [u8],
    pos: usize,
}

impl<'t> Pieces<'t> {
    fn new(template: &'t [u8]) -> Self {
        // C string semantics: a NUL ends the template
        let end = template
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(template.len());
        Self {
            template: &template[..end],
            pos: 0,
        }
    }
}

impl<'t> Iterator for Pieces<'t> {
    type Item = Piece<'t>;

    fn next(&mut self) -> Option<Piece<'t>> {
        let template: &'t [u8] = self.template;
        let rest = &template[self.pos..];
        let first = *rest.first()?;

        if first != b'%' {
            let len = rest.iter().position(|&b| b == b'%').unwrap_or(rest.len());
            self.pos += len;
            return Some(Piece::Literal(&rest[..len]));
        }

        self.pos += 1;
        let mut conv = Conversion {
            width: 0,
            zero_fill: false,
            directive: None,
        };
        while let Some(&b) = template.get(self.pos) {
            self.pos += 1;
            if !b.is_ascii_digit() {
                conv.directive = Some(b);
                break;
            }
            if b == b'0' && conv.width == 0 {
                conv.zero_fill = true;
            }
            conv.width = conv
                .width
                .saturating_mul(10)
                .saturating_add((b - b'0') as usize);
        }
        Some(Piece::Directive(conv))
    }
}

/// Unsigned magnitude plus pending sign, ready for digit conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Number {
    magnitude: u64,
    negative: bool,
    base: u64,
    digits: &'static [u8; 16],
}

impl Number {
    /// Highest place value of the magnitude and its digit count
    fn places(&self) -> (u64, usize) {
        let mut unit = 1u64;
        let mut count = 1;
        // A multiply overflow means no higher place can fit
        while let Some(next) = unit.checked_mul(self.base) {
            if next > self.magnitude {
                break;
            }
            unit = next;
            count += 1;
        }
        (unit, count)
    }

    /// Bytes needed for the digits and sign, ignoring padding
    fn min_len(&self) -> usize {
        self.places().1 + self.negative as usize
    }

    fn render(
        &self,
        scratch: &mut Vec<u8, SCRATCH_CAPACITY>,
        width: usize,
        zero_fill: bool,
    ) -> Result<(), ConsoleError> {
        let (mut unit, count) = self.places();
        let mut negative = self.negative;
        let fill = if zero_fill { b'0' } else { b' ' };
        let width = width.min(SCRATCH_CAPACITY);
        let padding = width.saturating_sub(count + negative as usize);

        // Zero fill goes between the sign and the digits
        if negative && zero_fill {
            push(scratch, b'-')?;
            negative = false;
        }
        for _ in 0..padding {
            push(scratch, fill)?;
        }
        if negative {
            push(scratch, b'-')?;
        }
        while unit > 0 {
            push(scratch, self.digits[((self.magnitude / unit) % self.base) as usize])?;
            unit /= self.base;
        }
        Ok(())
    }
}

fn push(scratch: &mut Vec<u8, SCRATCH_CAPACITY>, byte: u8) -> Result<(), ConsoleError> {
    scratch.push(byte).map_err(|_| ConsoleError::ScratchOverflow {
        capacity: SCRATCH_CAPACITY,
    })
}

/// What a single directive produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Value<'a> {
    Byte(u8),
    Number(Number),
    Text(&'a [u8]),
    Literal(&'static [u8]),
}

/// Take the argument a directive needs and convert it
fn resolve<'a>(
    conv: &Conversion,
    args: &mut Args<'_, 'a>,
    hex_case: HexCase,
) -> Result<Value<'a>, ConsoleError> {
    let directive = match conv.directive {
        Some(b'%') => return Ok(Value::Literal(b"%")),
        Some(d @ (b'c' | b'd' | b'i' | b'u' | b'x' | b'X' | b'p' | b's')) => d,
        _ => return Ok(Value::Literal(b"ERROR")),
    };

    let (index, arg) = args.take()?;
    let mismatch = ConsoleError::ArgumentMismatch { index, directive };

    let value = match directive {
        b'c' => Value::Byte(arg.unsigned().ok_or(mismatch)? as u8),
        b'd' | b'i' => {
            let v = arg.signed().ok_or(mismatch)?;
            Value::Number(Number {
                magnitude: v.unsigned_abs(),
                negative: v < 0,
                base: 10,
                digits: DIGITS_LOWER,
            })
        }
        b'u' => Value::Number(Number {
            magnitude: arg.unsigned().ok_or(mismatch)?,
            negative: false,
            base: 10,
            digits: DIGITS_LOWER,
        }),
        b's' => match arg {
            Arg::Str(text) => Value::Text(text),
            _ => return Err(mismatch),
        },
        // x, X, p
        _ => {
            let digits = if directive == b'X' && hex_case == HexCase::Upper {
                DIGITS_UPPER
            } else {
                DIGITS_LOWER
            };
            Value::Number(Number {
                magnitude: arg.unsigned().ok_or(mismatch)?,
                negative: false,
                base: 16,
                digits,
            })
        }
    };

    if let Value::Number(number) = value {
        if number.min_len() > SCRATCH_CAPACITY {
            return Err(ConsoleError::ScratchOverflow {
                capacity: SCRATCH_CAPACITY,
            });
        }
    }
    Ok(value)
}

/// Dry run over the whole template against a copy of the cursor
fn check(template: &[u8], mut args: Args<'_, '_>, hex_case: HexCase) -> Result<(), ConsoleError> {
    for piece in Pieces::new(template) {
        if let Piece::Directive(conv) = piece {
            resolve(&conv, &mut args, hex_case)?;
        }
    }
    Ok(())
}

fn emit<C: ByteChannel + ?Sized>(
    channel: &mut C,
    conv: &Conversion,
    value: Value<'_>,
) -> Result<(), ConsoleError> {
    match value {
        Value::Literal(text) => {
            writer::write(channel, text);
        }
        Value::Byte(byte) => {
            writer::write(channel, &[byte]);
        }
        Value::Text(text) => {
            writer::write(channel, text);
            for _ in text.len()..conv.width {
                writer::write(channel, b" ");
            }
        }
        Value::Number(number) => {
            let mut scratch: Vec<u8, SCRATCH_CAPACITY> = Vec::new();
            number.render(&mut scratch, conv.width, conv.zero_fill)?;
            writer::write(channel, &scratch);
        }
    }
    Ok(())
}

/// Format `template` with arguments taken from an open cursor
///
/// On error nothing is written and the cursor is left where it was.
pub fn vprintf<C, T>(
    channel: &mut C,
    template: &T,
    args: &mut Args<'_, '_>,
    hex_case: HexCase,
) -> Result<(), ConsoleError>
where
    C: ByteChannel + ?Sized,
    T: AsRef<[u8]> + ?Sized,
{
    let template = template.as_ref();
    check(template, args.clone(), hex_case)?;

    for piece in Pieces::new(template) {
        match piece {
            Piece::Literal(text) => {
                writer::write(channel, text);
            }
            Piece::Directive(conv) => {
                let value = resolve(&conv, args, hex_case)?;
                emit(channel, &conv, value)?;
            }
        }
    }
    Ok(())
}

/// Format `template` with `args`
pub fn printf<C, T>(
    channel: &mut C,
    template: &T,
    args: &[Arg<'_>],
    hex_case: HexCase,
) -> Result<(), ConsoleError>
where
    C: ByteChannel + ?Sized,
    T: AsRef<[u8]> + ?Sized,
{
    vprintf(channel, template, &mut Args::new(args), hex_case)
}
