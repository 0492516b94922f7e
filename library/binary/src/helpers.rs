use core::fmt;

/// Creates a mask which can be used to extract `n` bits from a byte,
/// starting from the least-significant bit.
///
/// # Example
///
/// ```rust,ignore
/// let mask = bitmask_le(3);
/// assert_eq!(0b00000111, mask);
/// ```
#[inline(always)]
pub const fn bitmask_le(n: u8) -> u8 {
    debug_assert!(n <= 8);
    if n == 0 {
        0
    } else {
        u8::MAX >> (8 - n)
    }
}

/// Creates a mask which can be used to extract `n` bits from a byte,
/// starting from the most-significant bit.
///
/// # Example
///
/// ```rust,ignore
/// let mask = bitmask_be(3);
/// assert_eq!(0b11100000, mask);
/// ```
#[inline(always)]
pub const fn bitmask_be(n: u8) -> u8 {
    debug_assert!(n <= 8);
    if n == 0 {
        0
    } else {
        u8::MAX << (8 - n)
    }
}

/// Combine bits from bytes `x` and `y` at the given offset.
///
/// The resulting byte will contain `8 - offset` bits from `x` starting
/// from the offset bit, and taking any remaining bits from `y` starting
/// with the most-significant bit.
///
/// # Example
///
/// ```rust,ignore
/// let offset = 6;
/// let x = 0b10000111;
/// let y = 0b01000010;
/// let z = splice_bits(x, y, offset);
/// assert_eq!(0b110100000, z);
/// ```
#[inline(always)]
pub fn splice_bits(x: u8, y: u8, offset: u8) -> u8 {
    debug_assert!(offset <= 8);
    let inverse_offset = 8 - offset;
    let offset_mask = bitmask_le(inverse_offset);
    let offset = offset as u32;
    let left_bits = (x & offset_mask).checked_shl(offset).unwrap_or(0);
    let right_bits = (y & !offset_mask)
        .checked_shr(inverse_offset as u32)
        .unwrap_or(0);
    left_bits | right_bits
}

/// Calculates a new index and offset in a byte slice, given the current index
/// and offset, and the number of bits that were consumed.
///
/// The number of bits consumed may span multiple bytes, and it is assumed that
/// consumption started at bit `(index * 8) + bit_offset` of the underlying memory.
///
/// The offset must be <= 8, or this function will panic
///
/// # Example
///
/// ```rust,ignore
/// let index = 0;
/// let offset = 1;
/// let bits_consumed = 5
/// assert_eq!(next_index(index, offset, bits_consumed), (0, 6));
/// assert_eq!(next_index(0, 3, bits_consumed), (1, 0));
/// ```
#[inline]
pub fn next_index(index: usize, bit_offset: u8, bits_consumed: usize) -> (usize, u8) {
    let delta_bytes = bits_consumed / 8;
    let next_index = index + delta_bytes;
    let delta_bits = (bits_consumed % 8) as u8;
    // The trailing bits may cross into the next byte
    let next_offset = bit_offset + delta_bits;
    if next_offset > 7 {
        (next_index + 1, next_offset - 8)
    } else {
        (next_index, next_offset)
    }
}

/// Returns true if `c` is printed literally, or with a standard escape, inside an
/// Erlang string, following `io_lib:printable_unicode_list/1`
pub fn is_printable_char(c: char) -> bool {
    match c {
        '\n' | '\r' | '\t' | '\u{0B}' | '\u{08}' | '\u{0C}' | '\u{1B}' => true,
        ' '..='~' => true,
        '\u{A0}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}' => true,
        _ => false,
    }
}

/// Returns true if every character of `s` is printable
pub fn is_printable_str(s: &str) -> bool {
    s.chars().all(is_printable_char)
}

/// Writes `s` with Erlang escapes applied, assuming it is delimited by `quote`
pub fn write_escaped<W: fmt::Write>(f: &mut W, s: &str, quote: char) -> fmt::Result {
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\u{0B}' => f.write_str("\\v")?,
            '\u{08}' => f.write_str("\\b")?,
            '\u{0C}' => f.write_str("\\f")?,
            '\u{1B}' => f.write_str("\\e")?,
            c if c == quote => {
                f.write_char('\\')?;
                f.write_char(c)?;
            }
            c => f.write_char(c)?,
        }
    }
    Ok(())
}

/// Displays a printable string as an Erlang binary literal, e.g. `<<"abc">>`
pub fn display_binary(s: &str, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str("<<\"")?;
    write_escaped(f, s, '"')?;
    f.write_str("\">>")
}

/// Displays a sequence of raw bytes using Erlang-style formatting.
///
/// When `trailing` is `Some((value, bits))`, a final segment `value:bits` is appended,
/// as when rendering a bitstring whose size is not a multiple of 8.
pub fn display_bytes<I: Iterator<Item = u8>>(
    bytes: I,
    trailing: Option<(u8, u8)>,
    f: &mut fmt::Formatter,
) -> fmt::Result {
    f.write_str("<<")?;

    let mut first = true;
    for byte in bytes {
        if !first {
            f.write_str(",")?;
        }
        write!(f, "{}", byte)?;
        first = false;
    }

    if let Some((value, bits)) = trailing {
        if !first {
            f.write_str(",")?;
        }
        write!(f, "{}:{}", value, bits)?;
    }

    f.write_str(">>")
}
