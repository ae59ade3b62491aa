// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! State shared between interrupt handlers and the main loop.
//!
//! Handlers only ever raise flags, bump counters, or post a completed command line. All real work
//! (bus traffic, printing, timer reconfiguration) happens in the main loop.
//!
//! Each field has one writer and one reader. The firmware keeps a single `SharedState` in a static
//! and hands references to the interrupt handlers and the main loop.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use critical_section::Mutex;

use crate::protocol::Line;

/// One-bit event raised from interrupt context and consumed by the main loop.
pub struct EventFlag(AtomicBool);

impl EventFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    #[inline]
    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Test-and-clear. Returns `true` at most once per `raise`, however many times it was raised.
    #[inline]
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    #[inline]
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Default for EventFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Single-slot handoff of a completed command line. Posting over an unread line replaces it.
pub struct CommandMailbox {
    slot: Mutex<RefCell<Option<Line>>>,
}

impl CommandMailbox {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(RefCell::new(None)),
        }
    }

    pub fn post(&self, line: Line) {
        critical_section::with(|cs| {
            self.slot.borrow(cs).replace(Some(line));
        });
    }

    pub fn take(&self) -> Option<Line> {
        critical_section::with(|cs| self.slot.borrow(cs).take())
    }
}

impl Default for CommandMailbox {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SharedState {
    /// Raised by the toggle timer on every update event.
    pub toggle_pending: EventFlag,
    /// Latest completed line from the debug terminal.
    pub command: CommandMailbox,
    /// Receive interrupts serviced, including ones that carried no data.
    pub rx_events: AtomicU32,
}

impl SharedState {
    pub const fn new() -> Self {
        Self {
            toggle_pending: EventFlag::new(),
            command: CommandMailbox::new(),
            rx_events: AtomicU32::new(0),
        }
    }

    #[inline]
    pub fn count_rx_event(&self) {
        self.rx_events.fetch_add(1, Ordering::Relaxed);
    }

    /// Events counted since the previous call.
    #[inline]
    pub fn take_rx_events(&self) -> u32 {
        self.rx_events.swap(0, Ordering::Relaxed)
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
