// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! This module contains device-specific drivers that sit above the raw `hw/` layer and below the
//! application logic.
//!
//! ## Existing drivers
//!
//! - [`fdc2214`] – TI FDC2214 4-channel capacitance-to-digital converter over I²C
//! - [`hbridge`] – two-input H-bridge with dead-time guarded direction reversal

pub mod fdc2214;
pub mod hbridge;

pub use fdc2214::{Channel, Fdc2214};
pub use hbridge::{Direction, HBridge};
