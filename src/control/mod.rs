// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Actuation Control
//!
//! This module drives the actuation outputs from operator settings.
//!
//! ## Modules
//!
//! - [`actuator`] - PWM duty and timer-paced, dead-time guarded H-bridge reversal.

pub mod actuator;

pub use actuator::{Actuator, HalfPeriodTimer, PwmOutput};
