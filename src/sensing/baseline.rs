// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Baseline calibration.
//!
//! A baseline is the averaged resting reading of a channel. Deltas (`raw - baseline`) are only
//! meaningful once the channel has been calibrated.

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c::{Read, Write};

use crate::drivers::fdc2214::{Channel, Error, Fdc2214};

/// Pause between calibration samples.
pub const SAMPLE_INTERVAL_MS: u32 = 5;

/// Average `samples` consecutive readings of `ch`.
///
/// The first failed read aborts the calibration and its error is returned as-is. The average is
/// truncated toward zero.
pub fn calibrate_baseline<I2C, D, E>(
    fdc: &mut Fdc2214<I2C, D>,
    ch: Channel,
    samples: u8,
) -> Result<u32, Error<E>>
where
    I2C: Write<Error = E> + Read<Error = E>,
    D: DelayMs<u32>,
{
    if samples == 0 {
        return Err(Error::InvalidParam);
    }

    // 255 samples of 28 bits need 36 bits.
    let mut acc: u64 = 0;
    for _ in 0..samples {
        acc += fdc.read_channel_result(ch)? as u64;
        fdc.pause_ms(SAMPLE_INTERVAL_MS);
    }
    Ok((acc / samples as u64) as u32)
}

/// Per-channel baselines, populated by calibration only.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Baselines {
    values: [Option<u32>; 4],
}

impl Baselines {
    pub const fn new() -> Self {
        Self { values: [None; 4] }
    }

    #[inline]
    pub fn get(&self, ch: Channel) -> Option<u32> {
        self.values[ch.index()]
    }

    /// Calibrate `ch` and store the result. The stored value is kept on failure.
    pub fn calibrate<I2C, D, E>(
        &mut self,
        fdc: &mut Fdc2214<I2C, D>,
        ch: Channel,
        samples: u8,
    ) -> Result<u32, Error<E>>
    where
        I2C: Write<Error = E> + Read<Error = E>,
        D: DelayMs<u32>,
    {
        let value = calibrate_baseline(fdc, ch, samples)?;
        self.values[ch.index()] = Some(value);
        Ok(value)
    }

    /// `raw - baseline`, or `None` before `ch` is calibrated.
    #[inline]
    pub fn delta(&self, ch: Channel, raw: u32) -> Option<i32> {
        self.get(ch).map(|b| raw as i32 - b as i32)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::drivers::fdc2214::{reg, result};
    use crate::hw::i2c::mock::{BusFault, MockI2c, RecordingDelay};
    use crate::hw::{I2cBus, RetryPolicy};

    const POLICY: RetryPolicy = RetryPolicy {
        max_attempts: 3,
        backoff_ms: 5,
        timeout_ms: 100,
    };

    fn fdc_with_result(ch: Channel, raw: u32) -> Fdc2214<MockI2c, RecordingDelay> {
        let (hi, lo) = result::split(raw);
        let i2c = MockI2c::with_regs(&[(ch.data_msb(), hi), (ch.data_lsb(), lo)]);
        Fdc2214::new(I2cBus::new(i2c, RecordingDelay::default(), 0x2A, POLICY))
    }

    #[test]
    fn constant_reading_averages_to_itself() {
        for n in [1u8, 2, 7, 255] {
            let mut fdc = fdc_with_result(Channel::Ch1, 0x0ABC_DEF1);
            assert_eq!(calibrate_baseline(&mut fdc, Channel::Ch1, n), Ok(0x0ABC_DEF1));
        }
    }

    #[test]
    fn full_scale_samples_do_not_overflow() {
        let mut fdc = fdc_with_result(Channel::Ch0, 0x0FFF_FFFF);
        assert_eq!(calibrate_baseline(&mut fdc, Channel::Ch0, 255), Ok(0x0FFF_FFFF));
    }

    #[test]
    fn average_truncates_and_paces_samples() {
        let mut i2c = MockI2c::default();
        i2c.sequences.insert(reg::DATA_LSB_CH3, VecDeque::from([10, 11, 11]));
        let mut fdc = Fdc2214::new(I2cBus::new(i2c, RecordingDelay::default(), 0x2A, POLICY));

        assert_eq!(calibrate_baseline(&mut fdc, Channel::Ch3, 3), Ok(10));
        let (_, delay) = fdc.free().free();
        assert_eq!(delay.calls, vec![SAMPLE_INTERVAL_MS; 3]);
    }

    #[test]
    fn zero_samples_is_invalid_param() {
        let mut fdc = fdc_with_result(Channel::Ch0, 1);
        assert_eq!(
            calibrate_baseline(&mut fdc, Channel::Ch0, 0),
            Err(Error::InvalidParam)
        );
        assert!(fdc.free().free().0.ops.is_empty());
    }

    #[test]
    fn read_failure_aborts_without_partial_average() {
        let mut fdc = fdc_with_result(Channel::Ch2, 500);
        let mut baselines = Baselines::new();
        assert_eq!(baselines.calibrate(&mut fdc, Channel::Ch2, 4), Ok(500));

        let (mut i2c, delay) = fdc.free().free();
        // Second sample's first transfer fails through the whole retry budget.
        i2c.faults.extend([false, false, false, false, true, true, true]);
        let mut fdc = Fdc2214::new(I2cBus::new(i2c, delay, 0x2A, POLICY));

        assert_eq!(
            baselines.calibrate(&mut fdc, Channel::Ch2, 4),
            Err(Error::Bus(BusFault))
        );
        assert_eq!(baselines.get(Channel::Ch2), Some(500));
    }

    #[test]
    fn delta_requires_calibration() {
        let mut fdc = fdc_with_result(Channel::Ch0, 1000);
        let mut baselines = Baselines::new();
        assert_eq!(baselines.delta(Channel::Ch0, 1200), None);

        baselines.calibrate(&mut fdc, Channel::Ch0, 8).unwrap();
        assert_eq!(baselines.delta(Channel::Ch0, 1200), Some(200));
        assert_eq!(baselines.delta(Channel::Ch0, 900), Some(-100));
        assert_eq!(baselines.delta(Channel::Ch1, 900), None);
    }
}
