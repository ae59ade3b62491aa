// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the STM32F777 capacitive sensing and actuation board.

use stm32f7xx_hal::{
    gpio::{gpioa, gpiob, Alternate, Analog, OpenDrain, Output, PushPull},
    pac,
    prelude::*,
};

/// All board pins. Construct this once at startup using:
///
/// ```rust
/// let pins = BoardPins::new(dp.GPIOA, dp.GPIOB);
/// ```
pub struct BoardPins {
    pub usart1: Usart1Pins,
    pub i2c1: I2c1Pins,
    pub bridge: BridgePins,
    pub monitor: gpioa::PA3<Analog>, // ADC1_IN3
}

pub struct Usart1Pins {
    pub tx: gpioa::PA9<Alternate<7>>,
    pub rx: gpioa::PA10<Alternate<7>>,
}

/// I2C1 to the FDC2214. External pull-ups on the board.
pub struct I2c1Pins {
    pub scl: gpiob::PB8<Alternate<4, OpenDrain>>,
    pub sda: gpiob::PB9<Alternate<4, OpenDrain>>,
}

/// H-bridge control pins
pub struct BridgePins {
    pub enable: gpioa::PA0<Alternate<1>>, // TIM2_CH1 (PWM)
    pub in1: gpiob::PB0<Output<PushPull>>,
    pub in2: gpiob::PB1<Output<PushPull>>,
}

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals.
    pub fn new(gpioa: pac::GPIOA, gpiob: pac::GPIOB) -> Self {
        let gpioa = gpioa.split();
        let gpiob = gpiob.split();

        Self {
            usart1: Usart1Pins {
                tx: gpioa.pa9.into_alternate::<7>(),
                rx: gpioa.pa10.into_alternate::<7>(),
            },

            i2c1: I2c1Pins {
                scl: gpiob.pb8.into_alternate_open_drain::<4>(),
                sda: gpiob.pb9.into_alternate_open_drain::<4>(),
            },

            bridge: BridgePins {
                enable: gpioa.pa0.into_alternate::<1>(),
                in1: gpiob.pb0.into_push_pull_output(),
                in2: gpiob.pb1.into_push_pull_output(),
            },

            monitor: gpioa.pa3.into_analog(),
        }
    }
}
