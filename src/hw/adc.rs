// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Blocking single-channel ADC1 reads using direct PAC register access.
//!
//! Example:
//! ```no_run
//! let adc = Adc1::new(dp.ADC1);
//! let volts = adc.read_volts(3, 3.3);
//! ```

use stm32f7xx_hal::pac;

use crate::sensing::conversion::adc_counts_to_volts;

pub struct Adc1 {
    adc: pac::ADC1,
}

impl Adc1 {
    /// Enable and power up ADC1: 12-bit, right-aligned, software trigger.
    pub fn new(adc1: pac::ADC1) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb2enr.modify(|_, w| w.adc1en().set_bit());

        // ADC prescaler: PCLK2 / 4
        let common = unsafe { &*pac::ADC_COMMON::ptr() };
        common.ccr.modify(|_, w| w.adcpre().div4());

        let adc = adc1;

        // Power off to configure
        adc.cr2.modify(|_, w| w.adon().clear_bit());

        adc.cr1.modify(|_, w| w.res().bits(0b00));
        adc.cr2.modify(|_, w| {
            w.cont().clear_bit();
            w.align().right();
            w.exten().disabled();
            w
        });

        // Longest sample time on every regular channel
        adc.smpr2.write(|w| unsafe { w.bits(0x3FFF_FFFF) });

        // Sequence length = 1 conversion
        adc.sqr1.modify(|_, w| w.l().bits(0));

        // Power on
        adc.cr2.modify(|_, w| w.adon().set_bit());

        Self { adc }
    }

    /// Convert `channel` once and return the raw 12-bit count.
    pub fn read(&self, channel: u8) -> u16 {
        let adc = &self.adc;

        adc.sqr3.modify(|_, w| unsafe { w.sq1().bits(channel & 0x1F) });
        adc.cr2.modify(|_, w| w.swstart().set_bit());

        // Wait for completion
        while adc.sr.read().eoc().bit_is_clear() {}

        adc.dr.read().data().bits()
    }

    /// [`Self::read`] scaled to volts against `vref`.
    #[inline]
    pub fn read_volts(&self, channel: u8, vref: f32) -> f32 {
        adc_counts_to_volts(self.read(channel), vref)
    }

    #[inline]
    pub fn free(self) -> pac::ADC1 {
        self.adc
    }
}
