// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Unit conversion for the LC-tank front-end.
//!
//! The FDC2214 reports `DATA = f_sensor * 2^28 / f_ref`. The tank resonates at
//! `f = 1 / (2π·sqrt(L·(C + C0)))`, so the measured capacitance is
//! `C = 1 / (L·(2π·f)²) - C0`.
//!
//! None of these functions fail. Capacitance that cannot be computed is reported as
//! [`CAPACITANCE_INVALID`], so check the sign before using it.

use core::f64::consts::PI;

/// Returned by [`frequency_to_capacitance`] for `freq <= 0` or `L <= 0`.
pub const CAPACITANCE_INVALID: f64 = -1.0;

/// 2^28, full scale of a conversion result.
const FULL_SCALE: f64 = (1u32 << 28) as f64;

/// Board-supplied constants of the sensing front-end.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SensorConstants {
    /// Reference clock fed to the converter.
    pub f_ref_hz: f64,
    /// Tank inductance.
    pub inductance_h: f64,
    /// Fixed capacitance in parallel with the sensor.
    pub parallel_capacitance_f: f64,
}

#[inline]
pub fn raw_to_frequency(raw: u32, f_ref_hz: f64) -> f64 {
    raw as f64 * f_ref_hz / FULL_SCALE
}

pub fn frequency_to_capacitance(freq_hz: f64, inductance_h: f64, parallel_f: f64) -> f64 {
    if freq_hz <= 0.0 || inductance_h <= 0.0 {
        return CAPACITANCE_INVALID;
    }
    let omega = 2.0 * PI * freq_hz;
    1.0 / (inductance_h * omega * omega) - parallel_f
}

/// 12-bit ADC counts to volts against `vref`.
#[inline]
pub fn adc_counts_to_volts(counts: u16, vref: f32) -> f32 {
    (counts.min(4095) as f32 / 4095.0) * vref
}

/// One converted channel sample.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Reading {
    pub raw: u32,
    pub frequency_hz: f64,
    /// Farads, or [`CAPACITANCE_INVALID`].
    pub capacitance_f: f64,
}

impl Reading {
    pub fn from_raw(raw: u32, k: &SensorConstants) -> Self {
        let frequency_hz = raw_to_frequency(raw, k.f_ref_hz);
        Self {
            raw,
            frequency_hz,
            capacitance_f: frequency_to_capacitance(
                frequency_hz,
                k.inductance_h,
                k.parallel_capacitance_f,
            ),
        }
    }

    /// Capacitance in picofarads when it could be computed.
    pub fn capacitance_pf(&self) -> Option<f64> {
        (self.capacitance_f >= 0.0).then(|| self.capacitance_f * 1e12)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const K: SensorConstants = SensorConstants {
        f_ref_hz: 40e6,
        inductance_h: 18e-6,
        parallel_capacitance_f: 20e-12,
    };

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn frequency_scales_with_reference() {
        assert_eq!(raw_to_frequency(0, 40e6), 0.0);
        assert!(close(raw_to_frequency(1 << 27, 40e6), 20e6));
        for raw in [1u32, 0x1234, 0x0ABC_DEF0, (1 << 28) - 1] {
            let expected = raw as f64 * 40e6 / 268_435_456.0;
            assert!(close(raw_to_frequency(raw, 40e6), expected));
        }
    }

    #[test]
    fn capacitance_sentinel_only_for_invalid_domain() {
        assert!(frequency_to_capacitance(0.0, 18e-6, 20e-12) < 0.0);
        assert!(frequency_to_capacitance(-5.0, 18e-6, 20e-12) < 0.0);
        assert!(frequency_to_capacitance(3e6, 0.0, 20e-12) < 0.0);
        assert!(frequency_to_capacitance(3e6, -1e-6, 0.0) < 0.0);
        assert!(frequency_to_capacitance(3e6, 18e-6, 20e-12) >= 0.0);
    }

    #[test]
    fn capacitance_matches_tank_equation() {
        let f = 3.2e6;
        let omega = 2.0 * PI * f;
        let expected = 1.0 / (18e-6 * omega * omega) - 20e-12;
        assert!(close(frequency_to_capacitance(f, 18e-6, 20e-12), expected));
    }

    #[test]
    fn capacitance_inverts_resonance() {
        // 18 µH with 20 pF + 100 pF total.
        let c_total = 120e-12;
        let f = 1.0 / (2.0 * PI * (18e-6f64 * c_total).sqrt());
        let c = frequency_to_capacitance(f, 18e-6, 20e-12);
        assert!((c - 100e-12).abs() < 1e-18);
    }

    #[test]
    fn reading_reports_pf_only_when_valid() {
        let r = Reading::from_raw(0, &K);
        assert_eq!(r.capacitance_pf(), None);

        let r = Reading::from_raw(0x0100_0000, &K);
        assert!(close(r.frequency_hz, 2.5e6));
        assert!(r.capacitance_pf().unwrap() > 0.0);
    }

    #[test]
    fn adc_counts_span_reference() {
        assert_eq!(adc_counts_to_volts(0, 3.3), 0.0);
        assert!((adc_counts_to_volts(4095, 3.3) - 3.3).abs() < 1e-6);
        assert!((adc_counts_to_volts(5000, 3.3) - 3.3).abs() < 1e-6);
    }
}
