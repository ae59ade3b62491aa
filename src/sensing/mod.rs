// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Sensing
//!
//! Turns raw FDC2214 counts into physical quantities and tracks per-channel baselines.
//!
//! - [`conversion`] – raw count → sensor frequency → capacitance
//! - [`baseline`] – averaged resting readings and deltas against them
//! - [`acquisition`] – startup calibration and the periodic read-convert-report pass

pub mod acquisition;
pub mod baseline;
pub mod conversion;

pub use acquisition::Acquisition;
pub use baseline::{calibrate_baseline, Baselines};
pub use conversion::{Reading, SensorConstants};
