// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # MCU-Level Wrappers
//!
//! The I²C transport is generic over `embedded-hal` and builds everywhere. The rest wraps STM32F7
//! peripherals and only builds for the bare-metal target.

pub mod i2c;

#[cfg(target_os = "none")]
pub mod adc;
#[cfg(target_os = "none")]
pub mod pins;
#[cfg(target_os = "none")]
pub mod tick;
#[cfg(target_os = "none")]
pub mod timer;
#[cfg(target_os = "none")]
pub mod usart;

pub use i2c::{I2cBus, RetryPolicy};

#[cfg(target_os = "none")]
pub use adc::Adc1;
#[cfg(target_os = "none")]
pub use pins::BoardPins;
#[cfg(target_os = "none")]
pub use tick::{SysTickClock, TickDelay};
#[cfg(target_os = "none")]
pub use timer::{Tim2Pwm, Tim3Toggle};
#[cfg(target_os = "none")]
pub use usart::Usart;
