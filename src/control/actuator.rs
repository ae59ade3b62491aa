// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Timed actuation: PWM drive level plus a periodically reversed H-bridge.
//!
//! A hardware timer fires every half period of the toggle frequency and raises an [`EventFlag`]
//! from its interrupt. The main loop calls [`Actuator::handle_pending_toggle`] once per iteration,
//! which consumes the flag and performs the dead-time guarded reversal. The reversal blocks, so it
//! must never run in interrupt context.
//!
//! Typical usage pattern:
//!
//! ```no_run
//! actuator.set_duty_percent(50);
//! actuator.set_toggle_frequency_hz(20);
//!
//! loop {
//!     actuator.handle_pending_toggle(&shared.toggle_pending, &mut delay);
//!     // ...
//! }
//! ```

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::{OutputPin, StatefulOutputPin};

use crate::drivers::hbridge::{Direction, HBridge};
use crate::shared_state::EventFlag;

/// PWM channel driving the bridge enable line.
pub trait PwmOutput {
    /// Auto-reload value. Compare values range over `0..=period`.
    fn period(&self) -> u32;
    fn set_compare(&mut self, compare: u32);
}

/// Periodic timer whose update interrupt requests a toggle.
pub trait HalfPeriodTimer {
    /// Counter clock after the prescaler.
    fn tick_hz(&self) -> u32;
    /// Longest representable period, in ticks.
    fn max_period_ticks(&self) -> u32;
    fn stop(&mut self);
    /// Program an update event every `ticks` counter ticks (`ticks >= MIN_PERIOD_TICKS`).
    fn set_period_ticks(&mut self, ticks: u32);
    fn reset_counter(&mut self);
    fn start(&mut self);
}

/// Compare value for `percent` duty on a timer with the given auto-reload.
pub fn duty_compare(percent: u32, period: u32) -> u32 {
    let percent = percent.min(100) as u64;
    let compare = percent * (period as u64 + 1) / 100;
    compare.min(period as u64) as u32
}

/// Shortest half period, in ticks. One tick would load a zero auto-reload, which stalls the
/// counter.
pub const MIN_PERIOD_TICKS: u32 = 2;

/// Timer period in ticks for one half period of `hz`.
pub fn half_period_ticks(tick_hz: u32, hz: u32, max_ticks: u32) -> u32 {
    let ticks = tick_hz as u64 / (2 * hz as u64);
    let max_ticks = max_ticks.max(MIN_PERIOD_TICKS) as u64;
    ticks.clamp(MIN_PERIOD_TICKS as u64, max_ticks) as u32
}

pub struct Actuator<P, T, IN1, IN2> {
    pwm: P,
    timer: T,
    bridge: HBridge<IN1, IN2>,
    duty_percent: u8,
    toggle_hz: u32,
}

impl<P, T, IN1, IN2> Actuator<P, T, IN1, IN2>
where
    P: PwmOutput,
    T: HalfPeriodTimer,
    IN1: OutputPin + StatefulOutputPin,
    IN2: OutputPin + StatefulOutputPin,
{
    /// Wrap the outputs. Nothing is driven until a duty and frequency are set.
    pub fn new(pwm: P, timer: T, bridge: HBridge<IN1, IN2>) -> Self {
        Self {
            pwm,
            timer,
            bridge,
            duty_percent: 0,
            toggle_hz: 0,
        }
    }

    /// Set the drive level. Values above 100 are clamped. Takes effect within one PWM cycle.
    pub fn set_duty_percent(&mut self, percent: u32) {
        let percent = percent.min(100);
        self.pwm.set_compare(duty_compare(percent, self.pwm.period()));
        self.duty_percent = percent as u8;
    }

    /// Set the reversal frequency. `0` keeps the current setting.
    ///
    /// The timer is stopped, reprogrammed, zeroed and restarted inside a critical section, so its
    /// interrupt never observes a half-applied period.
    pub fn set_toggle_frequency_hz(&mut self, hz: u32) {
        if hz == 0 {
            return;
        }
        let ticks = half_period_ticks(self.timer.tick_hz(), hz, self.timer.max_period_ticks());
        let timer = &mut self.timer;
        critical_section::with(|_| {
            timer.stop();
            timer.set_period_ticks(ticks);
            timer.reset_counter();
            timer.start();
        });
        self.toggle_hz = hz;
    }

    /// Consume a pending toggle request, if any, and reverse the bridge.
    ///
    /// A request raised while this runs is kept for the next call.
    pub fn handle_pending_toggle<D: DelayMs<u32>>(
        &mut self,
        pending: &EventFlag,
        delay: &mut D,
    ) -> Option<Direction> {
        if pending.take() {
            Some(self.bridge.toggle(delay))
        } else {
            None
        }
    }

    #[inline]
    pub fn duty_percent(&self) -> u8 {
        self.duty_percent
    }

    #[inline]
    pub fn toggle_frequency_hz(&self) -> u32 {
        self.toggle_hz
    }

    #[inline]
    pub fn direction(&self) -> Option<Direction> {
        self.bridge.direction()
    }
}


#[cfg(test)]
mod tests {
    use super::mock::{MockPwm, MockTimer, TimerOp};
    use super::*;
    use crate::drivers::hbridge::mock::{MockPin, Trace};
    use crate::hw::i2c::mock::RecordingDelay;

    type TestActuator = Actuator<MockPwm, MockTimer, MockPin, MockPin>;

    fn actuator() -> TestActuator {
        let trace = Trace::default();
        let bridge = HBridge::new(MockPin::new(1, false, &trace), MockPin::new(2, false, &trace));
        Actuator::new(
            MockPwm {
                period: 4999,
                compare: None,
            },
            MockTimer {
                tick_hz: 10_000,
                max_ticks: 65_536,
                ops: Vec::new(),
            },
            bridge,
        )
    }

    #[test]
    fn duty_compare_scales_over_period_plus_one() {
        assert_eq!(duty_compare(0, 4999), 0);
        assert_eq!(duty_compare(50, 4999), 2500);
        assert_eq!(duty_compare(100, 4999), 4999);
        assert_eq!(duty_compare(33, 99), 33);
        assert_eq!(duty_compare(100, u32::MAX), u32::MAX);
    }

    #[test]
    fn duty_is_clamped_not_rejected() {
        let mut a = actuator();
        a.set_duty_percent(150);
        assert_eq!(a.duty_percent(), 100);
        assert_eq!(a.pwm.compare, Some(4999));

        let mut b = actuator();
        b.set_duty_percent(100);
        assert_eq!(a.pwm.compare, b.pwm.compare);
    }

    #[test]
    fn half_period_ticks_bounds() {
        assert_eq!(half_period_ticks(10_000, 20, 65_536), 250);
        assert_eq!(half_period_ticks(10_000, 1, 65_536), 5_000);
        assert_eq!(half_period_ticks(10_000, 100_000, 65_536), MIN_PERIOD_TICKS);
        assert_eq!(half_period_ticks(u32::MAX, 1, 65_536), 65_536);
        assert_eq!(half_period_ticks(10_000, u32::MAX, 65_536), MIN_PERIOD_TICKS);
        assert_eq!(half_period_ticks(10_000, 20, 0), MIN_PERIOD_TICKS);
    }

    #[test]
    fn high_frequency_keeps_timer_running() {
        // 3334 Hz on a 10 kHz tick rounds down to a single tick.
        let mut a = actuator();
        a.set_toggle_frequency_hz(3_334);
        assert_eq!(a.toggle_frequency_hz(), 3_334);
        assert_eq!(
            a.timer.ops,
            vec![
                TimerOp::Stop,
                TimerOp::Period(MIN_PERIOD_TICKS),
                TimerOp::Reset,
                TimerOp::Start
            ]
        );
    }

    #[test]
    fn frequency_change_restarts_timer_in_order() {
        let mut a = actuator();
        a.set_toggle_frequency_hz(20);
        assert_eq!(a.toggle_frequency_hz(), 20);
        assert_eq!(
            a.timer.ops,
            vec![
                TimerOp::Stop,
                TimerOp::Period(250),
                TimerOp::Reset,
                TimerOp::Start
            ]
        );
    }

    #[test]
    fn zero_frequency_keeps_previous_setting() {
        let mut a = actuator();
        a.set_toggle_frequency_hz(5);
        let ops = a.timer.ops.len();
        a.set_toggle_frequency_hz(0);
        assert_eq!(a.toggle_frequency_hz(), 5);
        assert_eq!(a.timer.ops.len(), ops);
    }

    #[test]
    fn pending_toggle_is_consumed_once() {
        let mut a = actuator();
        let flag = EventFlag::new();
        let mut delay = RecordingDelay::default();

        assert_eq!(a.handle_pending_toggle(&flag, &mut delay), None);
        assert!(delay.calls.is_empty());

        flag.raise();
        flag.raise();
        assert_eq!(
            a.handle_pending_toggle(&flag, &mut delay),
            Some(Direction::AForward)
        );
        assert_eq!(a.handle_pending_toggle(&flag, &mut delay), None);

        flag.raise();
        assert_eq!(
            a.handle_pending_toggle(&flag, &mut delay),
            Some(Direction::BForward)
        );
        assert_eq!(a.direction(), Some(Direction::BForward));
        assert_eq!(delay.total_ms(), 2 * crate::drivers::hbridge::DEAD_TIME_MS);
    }
}
