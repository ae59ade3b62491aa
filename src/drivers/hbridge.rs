// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Two-input H-bridge direction control.
//!
//! The bridge is driven by two GPIOs: IN1 high with IN2 low runs side A forward, IN1 low with IN2
//! high runs side B forward. Switching direction always passes through a dead-time with both inputs
//! low so that the two half-bridges never conduct at the same time.
//!
//! Speed is set separately through the PWM enable line (see [`crate::control::Actuator`]).

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::{OutputPin, StatefulOutputPin};

/// Both inputs low between direction changes.
pub const DEAD_TIME_MS: u32 = 2;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// IN1 high, IN2 low.
    AForward,
    /// IN1 low, IN2 high.
    BForward,
}

impl Direction {
    /// Direction a toggle moves to, given the currently latched input levels.
    ///
    /// A forward moves to B forward. Everything else, including idle (both low) and invalid (both
    /// high), moves to A forward.
    pub fn after_toggle(in1_high: bool, in2_high: bool) -> Self {
        match (in1_high, in2_high) {
            (true, false) => Direction::BForward,
            _ => Direction::AForward,
        }
    }
}

pub struct HBridge<IN1, IN2> {
    in1: IN1,
    in2: IN2,
}

impl<IN1, IN2> HBridge<IN1, IN2>
where
    IN1: OutputPin + StatefulOutputPin,
    IN2: OutputPin + StatefulOutputPin,
{
    /// Take both inputs and park the bridge with both low.
    pub fn new(in1: IN1, in2: IN2) -> Self {
        let mut bridge = Self { in1, in2 };
        bridge.coast();
        bridge
    }

    /// Both inputs low.
    pub fn coast(&mut self) {
        self.in1.set_low().ok();
        self.in2.set_low().ok();
    }

    pub fn drive(&mut self, dir: Direction) {
        match dir {
            Direction::AForward => {
                self.in1.set_high().ok();
                self.in2.set_low().ok();
            }
            Direction::BForward => {
                self.in1.set_low().ok();
                self.in2.set_high().ok();
            }
        }
    }

    /// Direction the latched outputs currently encode, or `None` when both levels match.
    pub fn direction(&self) -> Option<Direction> {
        match (self.in1_high(), self.in2_high()) {
            (true, false) => Some(Direction::AForward),
            (false, true) => Some(Direction::BForward),
            _ => None,
        }
    }

    /// Reverse the bridge: coast, wait [`DEAD_TIME_MS`], then assert the opposite direction.
    pub fn toggle<D: DelayMs<u32>>(&mut self, delay: &mut D) -> Direction {
        let next = Direction::after_toggle(self.in1_high(), self.in2_high());
        self.coast();
        delay.delay_ms(DEAD_TIME_MS);
        self.drive(next);
        next
    }

    pub fn free(self) -> (IN1, IN2) {
        (self.in1, self.in2)
    }

    fn in1_high(&self) -> bool {
        self.in1.is_set_high().unwrap_or(false)
    }

    fn in2_high(&self) -> bool {
        self.in2.is_set_high().unwrap_or(false)
    }
}


#[cfg(test)]
mod tests {
    use super::mock::{MockPin, Trace};
    use super::*;
    use crate::hw::i2c::mock::RecordingDelay;

    fn bridge(in1: bool, in2: bool) -> (HBridge<MockPin, MockPin>, Trace) {
        let trace = Trace::default();
        let bridge = HBridge {
            in1: MockPin::new(1, in1, &trace),
            in2: MockPin::new(2, in2, &trace),
        };
        (bridge, trace)
    }

    #[test]
    fn toggle_table() {
        assert_eq!(Direction::after_toggle(true, false), Direction::BForward);
        assert_eq!(Direction::after_toggle(false, true), Direction::AForward);
        assert_eq!(Direction::after_toggle(false, false), Direction::AForward);
        assert_eq!(Direction::after_toggle(true, true), Direction::AForward);
    }

    #[test]
    fn new_parks_both_low() {
        let trace = Trace::default();
        let bridge = HBridge::new(MockPin::new(1, true, &trace), MockPin::new(2, true, &trace));
        assert_eq!(bridge.direction(), None);
        assert_eq!(*trace.borrow(), vec![(1, false), (2, false)]);
    }

    #[test]
    fn toggle_passes_through_dead_time() {
        let (mut bridge, trace) = bridge(false, false);
        let mut delay = RecordingDelay::default();
        let coast = [(1, false), (2, false)];

        // Idle -> A
        assert_eq!(bridge.toggle(&mut delay), Direction::AForward);
        assert_eq!(bridge.direction(), Some(Direction::AForward));
        assert_eq!(trace.borrow()[..2], coast);
        assert_eq!(trace.borrow()[2..], [(1, true), (2, false)]);
        trace.borrow_mut().clear();

        // A -> B
        assert_eq!(bridge.toggle(&mut delay), Direction::BForward);
        assert_eq!(bridge.direction(), Some(Direction::BForward));
        assert_eq!(trace.borrow()[..2], coast);
        assert_eq!(trace.borrow()[2..], [(1, false), (2, true)]);
        trace.borrow_mut().clear();

        // B -> A
        assert_eq!(bridge.toggle(&mut delay), Direction::AForward);
        assert_eq!(bridge.direction(), Some(Direction::AForward));
        assert_eq!(trace.borrow()[..2], coast);
        assert_eq!(trace.borrow()[2..], [(1, true), (2, false)]);

        assert_eq!(delay.calls, vec![DEAD_TIME_MS; 3]);
    }

    #[test]
    fn invalid_state_recovers_to_a_forward() {
        let (mut bridge, _) = bridge(true, true);
        let mut delay = RecordingDelay::default();
        assert_eq!(bridge.toggle(&mut delay), Direction::AForward);
        assert_eq!(bridge.direction(), Some(Direction::AForward));
    }
}
