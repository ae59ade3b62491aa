// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! USART abstraction layer for the debug terminal.
//!
//! The transmit half is wrapped in `Usart`, which implements `core::fmt::Write` so the diagnostics
//! console can format straight onto the wire. The receive half is handed back separately with the
//! RXNE interrupt enabled; its handler feeds bytes into the command line assembler.
//!
//! Note: When using `write!`, be sure to include `\r\n` in the format string to ensure correct
//! line endings on the terminal.
//!
//! To access the terminal on the host machine, connect to the debug USB port and use
//! ```
//! $ screen /dev/tty.usbmodem* <baud_rate>
//! ```
//!
//! To close the debug terminal, press `Ctrl+A` then `Ctrl+\` then `y`.

use core::fmt;
use embedded_hal::serial::Read as _;
use nb::block;

use stm32f7xx_hal::{
    prelude::*,
    serial::{Event, Instance, Pins, Rx, Serial, Tx},
};

pub struct Usart<U: Instance> {
    tx: Tx<U>,
}

impl<U: Instance> Usart<U> {
    /// Split `serial`, enabling the receive interrupt. Returns the writer and the receive half.
    pub fn new<PINS: Pins<U>>(mut serial: Serial<U, PINS>) -> (Self, Rx<U>) {
        serial.listen(Event::Rxne);
        let (tx, rx) = serial.split();
        (Self { tx }, rx)
    }

    #[inline]
    pub fn write_byte(&mut self, b: u8) {
        let _ = block!(self.tx.write(b));
    }

    pub fn write_str(&mut self, s: &str) {
        for &b in s.as_bytes() {
            self.write_byte(b);
        }
    }

    /// Block until the hardware TX FIFO/drain is flushed.
    #[inline]
    pub fn flush(&mut self) {
        let _ = block!(self.tx.flush());
    }
}

impl<U: Instance> fmt::Write for Usart<U> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Usart::write_str(self, s);
        Ok(())
    }
}

/// Drain every byte currently held by `rx` into `sink`. Stops at the first empty or faulted read.
pub fn drain_rx<U, F>(rx: &mut Rx<U>, mut sink: F)
where
    U: Instance,
    F: FnMut(u8),
{
    while let Ok(b) = rx.read() {
        sink(b);
    }
}
