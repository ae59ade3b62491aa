// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! 1 kHz SysTick time base.
//!
//! The SysTick exception handler calls [`on_tick`]. Everything else reads the counter: the
//! diagnostics clock and the blocking millisecond delay used throughout the firmware.
//!
//! Example:
//! ```no_run
//! tick::start(cp.SYST, clocks.sysclk().raw());
//! let mut delay = TickDelay;
//! delay.delay_ms(10_u32);
//! ```

use core::sync::atomic::{AtomicU32, Ordering};

use cortex_m::peripheral::{syst::SystClkSource, SYST};
use embedded_hal::blocking::delay::DelayMs;

use crate::diag::Clock;

static MILLIS: AtomicU32 = AtomicU32::new(0);

/// Start SysTick at 1 kHz with its exception enabled.
pub fn start(mut syst: SYST, sysclk_hz: u32) {
    syst.set_clock_source(SystClkSource::Core);
    syst.set_reload(sysclk_hz / 1_000 - 1);
    syst.clear_current();
    syst.enable_interrupt();
    syst.enable_counter();
}

/// Advance the millisecond counter. Call from the SysTick handler only.
#[inline]
pub fn on_tick() {
    MILLIS.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub fn now_ms() -> u32 {
    MILLIS.load(Ordering::Relaxed)
}

#[derive(Copy, Clone, Default)]
pub struct SysTickClock;

impl Clock for SysTickClock {
    #[inline]
    fn now_ms(&self) -> u32 {
        now_ms()
    }
}

/// Blocking delay on the SysTick counter. Sleeps between ticks. Never use from an interrupt
/// handler at or above SysTick priority.
#[derive(Copy, Clone, Default)]
pub struct TickDelay;

impl DelayMs<u32> for TickDelay {
    fn delay_ms(&mut self, ms: u32) {
        // `<=`: at least `ms` whole ticks elapse.
        let start = now_ms();
        while now_ms().wrapping_sub(start) <= ms {
            cortex_m::asm::wfi();
        }
    }
}

impl DelayMs<u16> for TickDelay {
    #[inline]
    fn delay_ms(&mut self, ms: u16) {
        DelayMs::<u32>::delay_ms(self, ms as u32);
    }
}

impl DelayMs<u8> for TickDelay {
    #[inline]
    fn delay_ms(&mut self, ms: u8) {
        DelayMs::<u32>::delay_ms(self, ms as u32);
    }
}
