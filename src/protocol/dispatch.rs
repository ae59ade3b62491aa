// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Applies parsed operator commands to the actuator and reports the outcome on the terminal.

use core::fmt::Write;

use embedded_hal::digital::v2::{OutputPin, StatefulOutputPin};

use crate::control::{Actuator, HalfPeriodTimer, PwmOutput};
use crate::protocol::messages::Command;
use crate::protocol::parser::parse_line;

/// Parse `line`, apply it, and write one acknowledgement or rejection line to `out`.
///
/// Returns the applied command. A rejected line leaves the actuator untouched.
pub fn handle_line<P, T, IN1, IN2, W>(
    line: &str,
    actuator: &mut Actuator<P, T, IN1, IN2>,
    out: &mut W,
) -> Option<Command>
where
    P: PwmOutput,
    T: HalfPeriodTimer,
    IN1: OutputPin + StatefulOutputPin,
    IN2: OutputPin + StatefulOutputPin,
    W: Write,
{
    let cmd = match parse_line(line) {
        Ok(cmd) => cmd,
        Err(rejection) => {
            let _ = write!(out, "{}\r\n", rejection);
            return None;
        }
    };

    match cmd {
        Command::Status => {
            let _ = write!(
                out,
                "STATUS: PWM duty={}%, toggle={} Hz\r\n",
                actuator.duty_percent(),
                actuator.toggle_frequency_hz()
            );
        }
        Command::SetToggleFrequency(hz) => {
            actuator.set_toggle_frequency_hz(hz);
            let _ = write!(out, "Toggle freq set to {} Hz\r\n", hz);
        }
        Command::SetDuty(percent) => {
            actuator.set_duty_percent(percent as u32);
            let _ = write!(out, "PWM duty set to {}%\r\n", percent);
        }
    }
    Some(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::actuator::mock::{MockPwm, MockTimer};
    use crate::drivers::hbridge::mock::{MockPin, Trace};
    use crate::drivers::hbridge::HBridge;

    fn actuator() -> Actuator<MockPwm, MockTimer, MockPin, MockPin> {
        let trace = Trace::default();
        let mut a = Actuator::new(
            MockPwm {
                period: 999,
                compare: None,
            },
            MockTimer {
                tick_hz: 10_000,
                max_ticks: 65_536,
                ops: Vec::new(),
            },
            HBridge::new(MockPin::new(1, false, &trace), MockPin::new(2, false, &trace)),
        );
        a.set_duty_percent(50);
        a.set_toggle_frequency_hz(20);
        a
    }

    fn run(line: &str, a: &mut Actuator<MockPwm, MockTimer, MockPin, MockPin>) -> String {
        let mut out = String::new();
        handle_line(line, a, &mut out);
        out
    }

    #[test]
    fn duty_command_applies_and_acknowledges() {
        let mut a = actuator();
        assert_eq!(run("75", &mut a), "PWM duty set to 75%\r\n");
        assert_eq!(a.duty_percent(), 75);
    }

    #[test]
    fn frequency_command_applies_and_acknowledges() {
        let mut a = actuator();
        assert_eq!(run("f5", &mut a), "Toggle freq set to 5 Hz\r\n");
        assert_eq!(a.toggle_frequency_hz(), 5);
    }

    #[test]
    fn status_reports_without_change() {
        let mut a = actuator();
        assert_eq!(run("h", &mut a), "STATUS: PWM duty=50%, toggle=20 Hz\r\n");
        assert_eq!(a.duty_percent(), 50);
        assert_eq!(a.toggle_frequency_hz(), 20);
    }

    #[test]
    fn rejected_lines_leave_state_unchanged() {
        let mut a = actuator();
        assert_eq!(run("f0", &mut a), "Invalid toggle freq: 0\r\n");
        assert_eq!(run("abc", &mut a), "Invalid command: abc\r\n");
        assert_eq!(run("150", &mut a), "Invalid PWM duty: 150 (0-100)\r\n");
        assert_eq!(handle_line("x", &mut a, &mut String::new()), None);
        assert_eq!(a.duty_percent(), 50);
        assert_eq!(a.toggle_frequency_hz(), 20);
    }
}
