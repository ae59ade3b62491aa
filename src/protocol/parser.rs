// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Line framing and command parsing for the operator protocol.
//!
//! [`LineAssembler`] runs in the receive interrupt and turns bytes into lines. [`parse_line`] runs
//! in the main loop and turns a line into a [`Command`].

use crate::protocol::messages::*;

/// Byte-at-a-time line framer.
pub struct LineAssembler {
    buf: Line,
}

impl LineAssembler {
    pub const fn new() -> Self {
        Self { buf: Line::new() }
    }

    /// Process a single incoming byte. Returns `Some(Line)` when CR or LF ends a non-empty line.
    ///
    /// A byte arriving when the line is already full discards the whole partial line. Non-ASCII
    /// bytes are dropped.
    pub fn push(&mut self, byte: u8) -> Option<Line> {
        match byte {
            b'\r' | b'\n' => {
                if self.buf.is_empty() {
                    None
                } else {
                    Some(core::mem::take(&mut self.buf))
                }
            }
            b if b.is_ascii() => {
                if self.buf.push(b as char).is_err() {
                    self.buf.clear();
                }
                None
            }
            _ => None,
        }
    }

    /// Number of buffered characters.
    #[inline]
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

impl Default for LineAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one command line.
///
/// Leading spaces and tabs are skipped. Numbers are read like C `atoi`: optional sign, leading
/// digits, anything after them ignored, no digits at all reads as zero.
pub fn parse_line(line: &str) -> Result<Command, Rejection<'_>> {
    let cmd = line.trim_start_matches(|c: char| c == ' ' || c == '\t');

    match cmd.as_bytes() {
        [b'h' | b'H' | b'?'] => Ok(Command::Status),
        [b'f' | b'F', ..] => {
            let arg = &cmd[1..];
            match atoi(arg) {
                hz if hz > 0 => Ok(Command::SetToggleFrequency(hz as u32)),
                _ => Err(Rejection::ToggleFrequency(arg)),
            }
        }
        [b'0'..=b'9', ..] => match atoi(cmd) {
            duty @ 0..=100 => Ok(Command::SetDuty(duty as u8)),
            _ => Err(Rejection::Duty(cmd)),
        },
        _ => Err(Rejection::Unknown(cmd)),
    }
}

/// Leading decimal integer of `s`, saturating at the `i32` bounds.
pub fn atoi(s: &str) -> i32 {
    let s = s.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    for d in digits.bytes().take_while(u8::is_ascii_digit) {
        value = (value * 10 + (d - b'0') as i64).min(i32::MAX as i64 + 1);
    }
    let value = if negative { -value } else { value };
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
