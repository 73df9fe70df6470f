//! Parsing of inbound `"<prefix> <level>:<duration>"` command strings.
//!
//! Parsing never fails. Anything that is not a number reads as 0, the way the
//! upstream hub framing has always behaved.

/// A decoded level/duration pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Command {
    pub level: i32,
    /// Seconds for a full 0..=100 sweep.
    pub duration_s: i32,
}

impl Command {
    pub fn new(level: i32, duration_s: i32) -> Self {
        Self { level, duration_s }
    }

    /// Decode a raw command string.
    ///
    /// - level: text between the first space and the first colon (from the
    ///   start of the string when there is no space, to the end when there
    ///   is no colon; reversed bounds are swapped)
    /// - duration: text after the first colon, or the whole string when
    ///   there is no colon
    pub fn parse(raw: &str) -> Self {
        let start = raw.find(' ').map_or(0, |i| i + 1);
        let colon = raw.find(':');
        let end = colon.unwrap_or(raw.len());
        let (lo, hi) = if start <= end {
            (start, end)
        } else {
            (end, start)
        };
        let level = &raw[lo..hi];
        let duration = match colon {
            Some(i) => &raw[i + 1..],
            None => raw,
        };
        Self {
            level: parse_int_or_zero(level),
            duration_s: parse_int_or_zero(duration),
        }
    }
}

/// `atol`-style integer parse: leading whitespace, optional sign, then as many
/// decimal digits as present. Returns 0 when no digits lead. Saturates at the
/// `i32` range.
pub fn parse_int_or_zero(s: &str) -> i32 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
        if value > i64::from(i32::MAX) + 1 {
            break;
        }
    }
    let signed = if negative { -value } else { value };
    signed.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_framed_command() {
        assert_eq!(Command::parse("servo1 75:3"), Command::new(75, 3));
        assert_eq!(Command::parse("servo1  42 : 7 "), Command::new(42, 7));
    }

    #[test]
    fn non_numeric_reads_as_zero() {
        assert_eq!(Command::parse("servo1 abc:xyz"), Command::new(0, 0));
        assert_eq!(Command::parse("servo1 12abc:5s"), Command::new(12, 5));
        assert_eq!(Command::parse(""), Command::new(0, 0));
    }

    #[test]
    fn missing_delimiters_follow_substring_rules() {
        // no space: level starts at the beginning
        assert_eq!(Command::parse("30:2"), Command::new(30, 2));
        // no colon: level runs to the end, duration re-reads the whole string
        assert_eq!(Command::parse("servo1 60"), Command::new(60, 0));
        assert_eq!(Command::parse("60"), Command::new(60, 60));
        // colon before the first space: bounds are swapped, level reads ":1 "
        assert_eq!(Command::parse("7:1 x"), Command::new(0, 1));
    }

    #[test]
    fn signs_and_overflow() {
        assert_eq!(parse_int_or_zero("-15"), -15);
        assert_eq!(parse_int_or_zero("+15"), 15);
        assert_eq!(parse_int_or_zero("  8"), 8);
        assert_eq!(parse_int_or_zero("-"), 0);
        assert_eq!(parse_int_or_zero("99999999999999999999"), i32::MAX);
        assert_eq!(parse_int_or_zero("-99999999999999999999"), i32::MIN);
    }
}
