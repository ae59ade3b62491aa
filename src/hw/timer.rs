// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Actuation timers via direct PAC register access.
//!
//! - TIM2 runs PWM mode 1 on CH1 and drives the H-bridge enable line.
//! - TIM3 is a free-running up-counter whose update interrupt requests a direction toggle.

use stm32f7xx_hal::pac;

use crate::control::actuator::MIN_PERIOD_TICKS;
use crate::control::{HalfPeriodTimer, PwmOutput};

/// TIM2 CH1 PWM output.
pub struct Tim2Pwm {
    tim: pac::TIM2,
    period: u32,
}

impl Tim2Pwm {
    /// Configure TIM2 for `pwm_hz` on CH1 with 0% duty and start it.
    ///
    /// `timclk_hz` is the APB1 timer clock.
    pub fn new(tim2: pac::TIM2, timclk_hz: u32, pwm_hz: u32) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim2en().set_bit());

        let tim = tim2;

        // Disable counter while configuring
        tim.cr1.modify(|_, w| w.cen().clear_bit());

        // No prescaler: full resolution on the 32-bit counter
        let period = (timclk_hz / pwm_hz.max(1)).saturating_sub(1).max(1);
        tim.psc.write(|w| unsafe { w.psc().bits(0) });
        tim.arr.write(|w| w.bits(period));
        tim.ccr1.write(|w| unsafe { w.bits(0) });

        // PWM mode 1 with preload so compare changes land on the next period
        tim.ccmr1_output()
            .modify(|_, w| unsafe { w.oc1m().bits(0b110).oc1pe().set_bit() });
        tim.ccer.modify(|_, w| w.cc1p().clear_bit().cc1e().set_bit());

        // Auto-reload preload, then load the shadow registers
        tim.cr1.modify(|_, w| w.arpe().set_bit());
        tim.egr.write(|w| w.ug().set_bit());

        // Enable counter
        tim.cr1.modify(|_, w| w.cen().set_bit());

        Self { tim, period }
    }

    /// Consume the wrapper and return the underlying timer peripheral.
    #[inline]
    pub fn free(self) -> pac::TIM2 {
        self.tim
    }
}

impl PwmOutput for Tim2Pwm {
    #[inline]
    fn period(&self) -> u32 {
        self.period
    }

    #[inline]
    fn set_compare(&mut self, compare: u32) {
        let compare = compare.min(self.period);
        self.tim.ccr1.write(|w| unsafe { w.bits(compare) });
    }
}

/// TIM3 half-period timer.
pub struct Tim3Toggle {
    tim: pac::TIM3,
    tick_hz: u32,
}

impl Tim3Toggle {
    /// 16-bit auto-reload, so a half period spans at most 65536 ticks.
    pub const MAX_PERIOD_TICKS: u32 = 1 << 16;

    /// Configure TIM3 to count at `tick_hz` with the update interrupt enabled. The counter stays
    /// stopped until a period is programmed.
    pub fn new(tim3: pac::TIM3, timclk_hz: u32, tick_hz: u32) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim3en().set_bit());

        let tim = tim3;

        // Disable counter while configuring
        tim.cr1.modify(|_, w| w.cen().clear_bit());

        let psc = (timclk_hz / tick_hz.max(1)).saturating_sub(1).min(0xFFFF);
        let tick_hz = timclk_hz / (psc + 1);
        tim.psc.write(|w| unsafe { w.psc().bits(psc as u16) });
        tim.arr.write(|w| unsafe { w.bits(0xFFFF) });

        // Load PSC without raising a spurious update interrupt
        tim.cr1.modify(|_, w| w.urs().set_bit());
        tim.egr.write(|w| w.ug().set_bit());
        tim.sr.modify(|_, w| w.uif().clear_bit());

        tim.dier.modify(|_, w| w.uie().set_bit());

        Self { tim, tick_hz }
    }

    /// Acknowledge the update interrupt. Called from the TIM3 handler, which does not own the
    /// peripheral.
    #[inline]
    pub fn clear_update_interrupt() {
        let tim = unsafe { &*pac::TIM3::ptr() };
        tim.sr.modify(|_, w| w.uif().clear_bit());
    }

    /// Consume the wrapper and return the underlying timer peripheral.
    #[inline]
    pub fn free(self) -> pac::TIM3 {
        self.tim
    }
}

impl HalfPeriodTimer for Tim3Toggle {
    #[inline]
    fn tick_hz(&self) -> u32 {
        self.tick_hz
    }

    #[inline]
    fn max_period_ticks(&self) -> u32 {
        Self::MAX_PERIOD_TICKS
    }

    fn stop(&mut self) {
        self.tim.cr1.modify(|_, w| w.cen().clear_bit());
    }

    fn set_period_ticks(&mut self, ticks: u32) {
        let arr = ticks.clamp(MIN_PERIOD_TICKS, Self::MAX_PERIOD_TICKS) - 1;
        self.tim.arr.write(|w| unsafe { w.bits(arr) });
    }

    fn reset_counter(&mut self) {
        self.tim.cnt.write(|w| unsafe { w.bits(0) });
        self.tim.sr.modify(|_, w| w.uif().clear_bit());
    }

    fn start(&mut self) {
        self.tim.cr1.modify(|_, w| w.cen().set_bit());
    }
}
