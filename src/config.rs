// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Board constants shared by the drivers and the main loop.

use crate::hw::RetryPolicy;
use crate::sensing::SensorConstants;

// FDC2214 bus parameters
/// 7-bit address with ADDR tied low (0x2B when tied high).
pub const FDC_I2C_ADDR: u8 = 0x2A;
pub const FDC_I2C_FREQUENCY_HZ: u32 = 100_000;
pub const FDC_BUS_POLICY: RetryPolicy = RetryPolicy {
    max_attempts: 3,
    backoff_ms: 5,
    timeout_ms: 100,
};

// Sensor front-end
pub const SENSOR: SensorConstants = SensorConstants {
    f_ref_hz: 40e6,
    inductance_h: 18e-6,
    parallel_capacitance_f: 20e-12,
};

// Acquisition
pub const CALIBRATION_SAMPLES: u8 = 32;
pub const CALIBRATION_CHANNEL_GAP_MS: u32 = 50;
pub const CHANNEL_PACING_MS: u32 = 5;
pub const PASS_PERIOD_MS: u32 = 50;

// Actuation
pub const TOGGLE_TIMER_TICK_HZ: u32 = 10_000;
pub const PWM_FREQUENCY_HZ: u32 = 20_000;
pub const DEFAULT_DUTY_PERCENT: u8 = 50;
pub const DEFAULT_TOGGLE_HZ: u32 = 20;

// Debug terminal
pub const USART_BAUD_RATE: u32 = 115_200;

// Analog monitor
pub const ADC_MONITOR_CHANNEL: u8 = 3;
pub const ADC_VREF_V: f32 = 3.3;
