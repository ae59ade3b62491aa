// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Operator command protocol spoken over the debug terminal.
//!
//! One command per line, terminated by CR or LF:
//!
//! | Line        | Effect                                  |
//! | ----------- | --------------------------------------- |
//! | `h` `H` `?` | Print the current duty and frequency    |
//! | `f<N>`      | Set the toggle frequency to `N` Hz      |
//! | `<N>`       | Set the PWM duty to `N` percent (0-100) |

use core::fmt;

/// Longest accepted command line, excluding the terminator.
pub const LINE_CAPACITY: usize = 31;

/// A completed command line.
pub type Line = heapless::String<LINE_CAPACITY>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Status,
    SetToggleFrequency(u32),
    SetDuty(u8),
}

/// A line that does not form a valid command. Carries the offending text for the diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection<'a> {
    /// `f` argument that is not a positive integer. Holds the text after the `f`.
    ToggleFrequency(&'a str),
    /// Numeric line outside 0-100.
    Duty(&'a str),
    /// Anything else.
    Unknown(&'a str),
}

impl fmt::Display for Rejection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::ToggleFrequency(arg) => write!(f, "Invalid toggle freq: {}", arg),
            Rejection::Duty(arg) => write!(f, "Invalid PWM duty: {} (0-100)", arg),
            Rejection::Unknown(line) => write!(f, "Invalid command: {}", line),
        }
    }
}
