// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Inter-Integrated Circuit (I²C) abstraction layer.
//!
//! - `I2cBus` binds a blocking HAL I²C instance to one fixed 7-bit device address.
//! - Every transfer is retried as a whole according to a `RetryPolicy`. A failed attempt is never
//!   resumed; the next attempt starts the transfer from the first byte.

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c::{Read, Write};

/// Bounded whole-transfer retry policy.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts per transfer (at least one is always made).
    pub max_attempts: u8,
    /// Pause between a failed attempt and the next one.
    pub backoff_ms: u32,
    /// Per-attempt bus timeout. Applied by the HAL when the peripheral is constructed.
    pub timeout_ms: u32,
}

impl RetryPolicy {
    /// Per-attempt timeout in microseconds, as expected by the HAL constructor.
    #[inline]
    pub fn timeout_us(&self) -> u32 {
        self.timeout_ms.saturating_mul(1_000)
    }
}

/// Blocking I²C transport for a single device.
///
/// The bus is owned exclusively: a logical register access made of several transfers cannot be
/// interleaved with anything else.
pub struct I2cBus<I2C, D> {
    i2c: I2C,
    delay: D,
    addr: u8,
    policy: RetryPolicy,
}

impl<I2C, D, E> I2cBus<I2C, D>
where
    I2C: Write<Error = E> + Read<Error = E>,
    D: DelayMs<u32>,
{
    pub fn new(i2c: I2C, delay: D, addr: u8, policy: RetryPolicy) -> Self {
        Self {
            i2c,
            delay,
            addr,
            policy,
        }
    }

    #[inline]
    pub fn address(&self) -> u8 {
        self.addr
    }

    #[inline]
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Transmit `bytes` in one bus write. Returns the last bus error once the attempts run out.
    pub fn transmit(&mut self, bytes: &[u8]) -> Result<(), E> {
        let addr = self.addr;
        self.with_retries(|i2c| i2c.write(addr, bytes))
    }

    /// Fill `buf` from one bus read. Returns the last bus error once the attempts run out.
    pub fn receive(&mut self, buf: &mut [u8]) -> Result<(), E> {
        let addr = self.addr;
        self.with_retries(|i2c| i2c.read(addr, buf))
    }

    /// Busy-wait on the bus's delay provider.
    #[inline]
    pub fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    fn with_retries<F>(&mut self, mut op: F) -> Result<(), E>
    where
        F: FnMut(&mut I2C) -> Result<(), E>,
    {
        let attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op(&mut self.i2c) {
                Ok(()) => return Ok(()),
                Err(e) if attempt >= attempts => return Err(e),
                Err(_) => {
                    self.delay.delay_ms(self.policy.backoff_ms);
                    attempt += 1;
                }
            }
        }
    }

    pub fn free(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }
}
