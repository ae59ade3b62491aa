// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Capdrive Firmware
//!
//! Firmware for a 4-channel capacitive sensing board with a PWM-driven, periodically reversed
//! H-bridge output, written in Rust, targeting an STM32F777 MCU.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`hw`] | MCU-level wrappers around I²C, USART, timers, ADC, SysTick |
//! | [`drivers`] | Device-level drivers (FDC2214, H-bridge) |
//! | [`sensing`] | Unit conversion, baselines, acquisition pass |
//! | [`control`] | PWM duty and timed direction reversal |
//! | [`protocol`] | Operator command lines over the debug terminal |
//! | [`diag`] | Debug terminal with per-call-site rate limiting |
//! | [`shared_state`] | Interrupt to main-loop handoff |
//! | [`config`] | Board constants |
//!
//! Everything except the MCU wrappers in `hw` is generic over `embedded-hal` and unit-tested on
//! the host:
//!
//! ```bash
//! cargo test --lib --target x86_64-unknown-linux-gnu
//! ```
//!
//! ## Getting Started
//!
//! Build docs:
//!
//! ```bash
//! cargo doc --no-deps --open
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod control;
pub mod diag;
pub mod drivers;
pub mod hw;
pub mod protocol;
pub mod sensing;
pub mod shared_state;
