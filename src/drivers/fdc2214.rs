// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! FDC2214 4-channel capacitance-to-digital converter.
//!
//! This module handles I²C framing and register access for the FDC2214. Every register is 16 bits
//! wide and big-endian on the wire:
//!
//! - write: `[addr, value_hi, value_lo]` in a single bus write
//! - read: `[addr]` to set the register pointer, then a 2-byte read
//!
//! A channel's 28-bit conversion result is split over two adjacent registers (see [`result`]).

use core::fmt;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c::{Read, Write};

use crate::hw::I2cBus;

// Register addresses
pub mod reg {
    pub const DATA_CH0: u8 = 0x00;
    pub const DATA_LSB_CH0: u8 = 0x01;
    pub const DATA_CH1: u8 = 0x02;
    pub const DATA_LSB_CH1: u8 = 0x03;
    pub const DATA_CH2: u8 = 0x04;
    pub const DATA_LSB_CH2: u8 = 0x05;
    pub const DATA_CH3: u8 = 0x06;
    pub const DATA_LSB_CH3: u8 = 0x07;

    pub const RCOUNT_CH0: u8 = 0x08;
    pub const OFFSET_CH0: u8 = 0x0C;
    pub const SETTLECOUNT_CH0: u8 = 0x10;
    pub const CLOCK_DIVIDERS_CH0: u8 = 0x14;

    pub const STATUS: u8 = 0x18;
    pub const STATUS_CONFIG: u8 = 0x19;
    pub const CONFIG: u8 = 0x1A;
    pub const MUX_CONFIG: u8 = 0x1B;

    pub const DRIVE_CURRENT_CH0: u8 = 0x1E;

    pub const MANUFACTURER_ID: u8 = 0x7E;
    pub const DEVICE_ID: u8 = 0x7F;
}

/// CONFIG bit 9: 1 selects the external reference clock.
pub const CONFIG_REF_CLK_SRC: u16 = 1 << 9;

pub const MANUFACTURER_ID: u16 = 0x5449;
pub const EXPECTED_DEVICE_ID: u16 = 0x3055;

/// Pattern written to CONFIG by [`Fdc2214::reset`].
pub const RESET_PATTERN: u16 = 0x8000;

/// Wait after the configuration sequence before conversions are trusted.
pub const SETTLE_DELAY_MS: u32 = 10;

// Default configuration written by `initialize`.
const CLOCK_DIVIDERS: u16 = 0x2001;
const DRIVE_CURRENT: u16 = 0x7800;
const SETTLECOUNT: u16 = 0x000A;
/// fREF = 40 MHz, 4 channels at 100 SPS: RCOUNT = fREF * tC / 16 rounded down.
const RCOUNT: u16 = 0x1866;
const MUX_CONFIG: u16 = 0xC20D;
/// Written last: leaves sleep mode and starts converting.
const CONFIG: u16 = 0x1601;

/// Driver errors.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error<E> {
    /// The bus transfer still failed after the retry budget. Carries the last bus error.
    Bus(E),
    /// Out-of-range channel or zero sample count.
    InvalidParam,
    /// Reserved. Bus timeouts currently surface as `Bus`.
    Timeout,
    /// Reserved for protocol anomalies.
    Unknown,
}

impl<E> Error<E> {
    pub fn as_str(&self) -> &'static str {
        match self {
            Error::Bus(_) => "BUS_ERROR",
            Error::InvalidParam => "INVALID_PARAM",
            Error::Timeout => "TIMEOUT",
            Error::Unknown => "UNKNOWN",
        }
    }

    /// Numeric code printed next to the name in diagnostics.
    pub fn code(&self) -> i8 {
        match self {
            Error::Bus(_) => -1,
            Error::InvalidParam => -2,
            Error::Timeout => -3,
            Error::Unknown => -10,
        }
    }
}

impl<E> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_str(), self.code())
    }
}

/// One of the four sensing channels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Channel {
    Ch0 = 0,
    Ch1 = 1,
    Ch2 = 2,
    Ch3 = 3,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::Ch0, Channel::Ch1, Channel::Ch2, Channel::Ch3];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Address of the DATA_CHx register holding the high half of the result.
    #[inline]
    pub fn data_msb(self) -> u8 {
        reg::DATA_CH0 + (self as u8) * 2
    }

    /// Address of the DATA_LSB_CHx register holding the low half of the result.
    #[inline]
    pub fn data_lsb(self) -> u8 {
        self.data_msb() + 1
    }
}

/// Channel number outside 0..=3.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InvalidChannel(pub u8);

impl<E> From<InvalidChannel> for Error<E> {
    fn from(_: InvalidChannel) -> Self {
        Error::InvalidParam
    }
}

impl TryFrom<u8> for Channel {
    type Error = InvalidChannel;

    fn try_from(n: u8) -> Result<Self, InvalidChannel> {
        match n {
            0 => Ok(Channel::Ch0),
            1 => Ok(Channel::Ch1),
            2 => Ok(Channel::Ch2),
            3 => Ok(Channel::Ch3),
            _ => Err(InvalidChannel(n)),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CH{}", *self as u8)
    }
}

/// 28-bit conversion result codec.
///
/// Layout of the value carried in a `u32`:
///
/// | bits   | source                              |
/// | ------ | ----------------------------------- |
/// | 31..28 | always zero                         |
/// | 27..16 | DATA_CHx bits 11..0                 |
/// | 15..0  | DATA_LSB_CHx bits 15..0             |
///
/// DATA_CHx bits 15..12 never reach the result.
pub mod result {
    pub const HIGH_MASK: u16 = 0x0FFF;
    pub const RESULT_MASK: u32 = 0x0FFF_FFFF;

    #[inline]
    pub fn assemble(high: u16, low: u16) -> u32 {
        (((high & HIGH_MASK) as u32) << 16) | low as u32
    }

    /// Inverse of [`assemble`] for a value within 28 bits.
    #[inline]
    pub fn split(raw: u32) -> (u16, u16) {
        let raw = raw & RESULT_MASK;
        ((raw >> 16) as u16, raw as u16)
    }
}

/// FDC2214 driver owning its bus.
pub struct Fdc2214<I2C, D> {
    bus: I2cBus<I2C, D>,
}

impl<I2C, D, E> Fdc2214<I2C, D>
where
    I2C: Write<Error = E> + Read<Error = E>,
    D: DelayMs<u32>,
{
    pub fn new(bus: I2cBus<I2C, D>) -> Self {
        Self { bus }
    }

    /// Release the bus.
    pub fn free(self) -> I2cBus<I2C, D> {
        self.bus
    }

    /// Write a 16-bit register in one atomic bus write.
    pub fn write_register(&mut self, addr: u8, value: u16) -> Result<(), Error<E>> {
        let [hi, lo] = value.to_be_bytes();
        self.bus.transmit(&[addr, hi, lo]).map_err(Error::Bus)
    }

    /// Read a 16-bit register: pointer write, then a 2-byte read.
    pub fn read_register(&mut self, addr: u8) -> Result<u16, Error<E>> {
        self.bus.transmit(&[addr]).map_err(Error::Bus)?;
        let mut buf = [0u8; 2];
        self.bus.receive(&mut buf).map_err(Error::Bus)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Read a channel's 28-bit result. The high register is always read before the low one.
    pub fn read_channel_result(&mut self, ch: Channel) -> Result<u32, Error<E>> {
        let high = self.read_register(ch.data_msb())?;
        let low = self.read_register(ch.data_lsb())?;
        Ok(result::assemble(high, low))
    }

    /// [`Self::read_channel_result`] for a raw channel number.
    pub fn read_channel_number(&mut self, n: u8) -> Result<u32, Error<E>> {
        let ch = Channel::try_from(n)?;
        self.read_channel_result(ch)
    }

    /// Read DEVICE_ID. Used to check connectivity only.
    pub fn read_identity(&mut self) -> Result<u16, Error<E>> {
        self.read_register(reg::DEVICE_ID)
    }

    pub fn read_manufacturer_id(&mut self) -> Result<u16, Error<E>> {
        self.read_register(reg::MANUFACTURER_ID)
    }

    pub fn read_status(&mut self) -> Result<u16, Error<E>> {
        self.read_register(reg::STATUS)
    }

    /// Write the reset pattern to CONFIG. Nothing is read back.
    pub fn reset(&mut self) -> Result<(), Error<E>> {
        self.write_register(reg::CONFIG, RESET_PATTERN)
    }

    /// Select the external reference clock, leaving the other CONFIG bits untouched.
    pub fn set_ref_clock_external(&mut self) -> Result<(), Error<E>> {
        let cfg = self.read_register(reg::CONFIG)?;
        self.write_register(reg::CONFIG, cfg | CONFIG_REF_CLK_SRC)
    }

    /// Bring the device up.
    ///
    /// An unreachable device fails with `Error::Bus`. An unexpected DEVICE_ID is reported on
    /// `diag` and the sequence continues. Per-channel registers go first and CONFIG last, since
    /// writing CONFIG arms conversion.
    pub fn initialize<W: fmt::Write>(&mut self, diag: &mut W) -> Result<(), Error<E>> {
        let did = self.read_identity()?;
        if did != EXPECTED_DEVICE_ID {
            let _ = write!(
                diag,
                "Warning: unexpected DEVICE_ID=0x{:04X}, continuing\r\n",
                did
            );
        }

        for ch in Channel::ALL {
            self.write_register(reg::CLOCK_DIVIDERS_CH0 + ch as u8, CLOCK_DIVIDERS)?;
        }
        for ch in Channel::ALL {
            self.write_register(reg::DRIVE_CURRENT_CH0 + ch as u8, DRIVE_CURRENT)?;
        }
        for ch in Channel::ALL {
            self.write_register(reg::SETTLECOUNT_CH0 + ch as u8, SETTLECOUNT)?;
        }
        for ch in Channel::ALL {
            self.write_register(reg::RCOUNT_CH0 + ch as u8, RCOUNT)?;
        }
        self.write_register(reg::MUX_CONFIG, MUX_CONFIG)?;
        self.write_register(reg::CONFIG, CONFIG)?;

        self.bus.delay_ms(SETTLE_DELAY_MS);
        Ok(())
    }

    /// Busy-wait using the bus's delay provider.
    #[inline]
    pub fn pause_ms(&mut self, ms: u32) {
        self.bus.delay_ms(ms);
    }
}
