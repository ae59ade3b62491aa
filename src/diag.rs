// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Diagnostics sink for the debug terminal.
//!
//! `Console` wraps any `core::fmt::Write` sink (the USART on the board) and adds a rate-limited
//! print for error paths that would otherwise flood the terminal. Rate limiting is per call site:
//! a `print_limited` call is dropped if the same source location printed less than
//! [`RATE_LIMIT_WINDOW_MS`] ago.
//!
//! Note: include `\r\n` in format strings, the terminal expects CRLF line endings.

use core::fmt;
use core::panic::Location;

use heapless::LinearMap;

pub const RATE_LIMIT_WINDOW_MS: u32 = 1_000;

/// Number of call sites tracked by the rate limiter.
const TRACKED_SITES: usize = 8;

/// Monotonic millisecond counter. Wraps after ~49 days.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

impl<C: Clock> Clock for &C {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

type Site = (&'static str, u32, u32);

/// Per-call-site emission gate.
pub struct RateLimiter {
    last: LinearMap<Site, u32, TRACKED_SITES>,
    window_ms: u32,
}

impl RateLimiter {
    pub const fn new(window_ms: u32) -> Self {
        Self {
            last: LinearMap::new(),
            window_ms,
        }
    }

    /// Returns `true` and records `now_ms` if `site` may emit.
    pub fn allow(&mut self, site: &'static Location<'static>, now_ms: u32) -> bool {
        let key = (site.file(), site.line(), site.column());
        if let Some(last) = self.last.get_mut(&key) {
            if now_ms.wrapping_sub(*last) < self.window_ms {
                return false;
            }
            *last = now_ms;
            return true;
        }

        if self.last.len() == TRACKED_SITES {
            let oldest = self
                .last
                .iter()
                .max_by_key(|(_, t)| now_ms.wrapping_sub(**t))
                .map(|(k, _)| *k);
            if let Some(k) = oldest {
                self.last.remove(&k);
            }
        }
        let _ = self.last.insert(key, now_ms);
        true
    }
}

/// Debug terminal with plain and rate-limited printing.
pub struct Console<W, C> {
    out: W,
    clock: C,
    limiter: RateLimiter,
}

impl<W: fmt::Write, C: Clock> Console<W, C> {
    pub fn new(out: W, clock: C) -> Self {
        Self {
            out,
            clock,
            limiter: RateLimiter::new(RATE_LIMIT_WINDOW_MS),
        }
    }

    pub fn print(&mut self, args: fmt::Arguments<'_>) {
        let _ = self.out.write_fmt(args);
    }

    /// Print unless this call site already printed within the rate-limit window.
    #[track_caller]
    pub fn print_limited(&mut self, args: fmt::Arguments<'_>) {
        let site = Location::caller();
        if self.limiter.allow(site, self.clock.now_ms()) {
            let _ = self.out.write_fmt(args);
        }
    }

    pub fn free(self) -> (W, C) {
        (self.out, self.clock)
    }
}

impl<W: fmt::Write, C: Clock> fmt::Write for Console<W, C> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.out.write_str(s)
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use core::cell::Cell;

    use super::Clock;

    #[derive(Default)]
    pub struct ManualClock {
        pub now: Cell<u32>,
    }

    impl ManualClock {
        pub fn advance(&self, ms: u32) {
            self.now.set(self.now.get().wrapping_add(ms));
        }
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> u32 {
            self.now.get()
        }
    }
}
