// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Periodic acquisition of all four channels, reported on the debug terminal.
//!
//! Per channel and pass, one of:
//!
//! ```text
//! CH0 raw=1234567 delta=-42 f=184000 Hz C=12.345 pF
//! CH1 raw=0 delta=- f=0 Hz C=ERR
//! Read CH2 failed: BUS_ERROR (-1)
//! ```
//!
//! Read failures go through the rate-limited print so a disconnected sensor does not flood the
//! terminal.

use core::fmt;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c::{Read, Write};

use crate::diag::{Clock, Console};
use crate::drivers::fdc2214::{Channel, Fdc2214};
use crate::sensing::{Baselines, Reading, SensorConstants};

/// One reported line for a successfully read channel.
pub struct ChannelReport {
    pub channel: Channel,
    pub reading: Reading,
    pub delta: Option<i32>,
}

impl fmt::Display for ChannelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} raw={} delta=", self.channel, self.reading.raw)?;
        match self.delta {
            Some(d) => write!(f, "{}", d)?,
            None => f.write_str("-")?,
        }
        write!(f, " f={:.0} Hz C=", self.reading.frequency_hz)?;
        match self.reading.capacitance_pf() {
            Some(pf) => write!(f, "{:.3} pF", pf),
            None => f.write_str("ERR"),
        }
    }
}

pub struct Acquisition {
    constants: SensorConstants,
    baselines: Baselines,
}

impl Acquisition {
    pub fn new(constants: SensorConstants) -> Self {
        Self {
            constants,
            baselines: Baselines::new(),
        }
    }

    #[inline]
    pub fn baselines(&self) -> &Baselines {
        &self.baselines
    }

    /// Calibrate every channel in turn, pausing `gap_ms` after each one.
    ///
    /// A failing channel is reported and skipped. Returns the number of calibrated channels.
    pub fn calibrate_all<I2C, D, E, W, C>(
        &mut self,
        fdc: &mut Fdc2214<I2C, D>,
        samples: u8,
        gap_ms: u32,
        console: &mut Console<W, C>,
    ) -> usize
    where
        I2C: Write<Error = E> + Read<Error = E>,
        D: DelayMs<u32>,
        W: fmt::Write,
        C: Clock,
    {
        let mut calibrated = 0;
        for ch in Channel::ALL {
            match self.baselines.calibrate(fdc, ch, samples) {
                Ok(value) => {
                    console.print(format_args!("calibrate {} baseline={}\r\n", ch, value));
                    calibrated += 1;
                }
                Err(e) => {
                    console.print_limited(format_args!("calibrate {} failed: {}\r\n", ch, e));
                }
            }
            fdc.pause_ms(gap_ms);
        }
        calibrated
    }

    /// Read, convert and report all channels, pausing `pacing_ms` after each one.
    pub fn run_pass<I2C, D, E, W, C>(
        &mut self,
        fdc: &mut Fdc2214<I2C, D>,
        pacing_ms: u32,
        console: &mut Console<W, C>,
    ) -> [Option<Reading>; 4]
    where
        I2C: Write<Error = E> + Read<Error = E>,
        D: DelayMs<u32>,
        W: fmt::Write,
        C: Clock,
    {
        let mut readings = [None; 4];
        for ch in Channel::ALL {
            match fdc.read_channel_result(ch) {
                Ok(raw) => {
                    let report = ChannelReport {
                        channel: ch,
                        reading: Reading::from_raw(raw, &self.constants),
                        delta: self.baselines.delta(ch, raw),
                    };
                    console.print(format_args!("{}\r\n", report));
                    readings[ch.index()] = Some(report.reading);
                }
                Err(e) => {
                    console.print_limited(format_args!("Read {} failed: {}\r\n", ch, e));
                }
            }
            fdc.pause_ms(pacing_ms);
        }
        readings
    }
}
