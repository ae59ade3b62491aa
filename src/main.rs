// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Capdrive firmware entry point.
//!
//! Bring-up order: clocks and SysTick, debug terminal, actuation outputs at their defaults, FDC2214
//! initialization and baseline calibration, ADC, then the interrupts. The main loop services
//! toggle requests and operator commands, and runs one acquisition pass per iteration.

#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
mod firmware {
    use core::cell::RefCell;

    use cortex_m::peripheral::NVIC;
    use cortex_m_rt::{entry, exception};
    use critical_section::Mutex;
    use embedded_hal::blocking::delay::DelayMs;
    use panic_halt as _;

    use hal::{
        i2c::{BlockingI2c, Mode},
        pac::{self, interrupt},
        prelude::*,
        serial::{self, Rx, Serial},
    };
    use stm32f7xx_hal as hal;

    use capdrive::config;
    use capdrive::control::Actuator;
    use capdrive::diag::Console;
    use capdrive::drivers::{Fdc2214, HBridge};
    use capdrive::hw::{
        tick, usart, Adc1, BoardPins, I2cBus, SysTickClock, TickDelay, Tim2Pwm, Tim3Toggle, Usart,
    };
    use capdrive::protocol::{handle_line, LineAssembler};
    use capdrive::sensing::Acquisition;
    use capdrive::shared_state::SharedState;

    static SHARED: SharedState = SharedState::new();

    /// Receive half of the debug terminal, owned by the USART1 handler after bring-up.
    static RX: Mutex<RefCell<Option<Rx<pac::USART1>>>> = Mutex::new(RefCell::new(None));

    #[entry]
    fn main() -> ! {
        // Peripherals
        let dp = pac::Peripherals::take().unwrap();
        let cp = cortex_m::Peripherals::take().unwrap();

        // Clocks
        let rcc = dp.RCC.constrain();
        let clocks = rcc.cfgr.sysclk(216.MHz()).freeze();
        let mut apb1 = rcc.apb1;

        tick::start(cp.SYST, clocks.sysclk().raw());
        let mut delay = TickDelay;

        let pins = BoardPins::new(dp.GPIOA, dp.GPIOB);

        // USART1 (DBG)
        let usart_cfg = serial::Config {
            baud_rate: config::USART_BAUD_RATE.bps(),
            ..Default::default()
        };
        let serial = Serial::new(
            dp.USART1,
            (pins.usart1.tx, pins.usart1.rx),
            &clocks,
            usart_cfg,
        );
        let (usart, rx) = Usart::new(serial);
        critical_section::with(|cs| RX.borrow(cs).replace(Some(rx)));
        let mut console = Console::new(usart, SysTickClock);

        console.print(format_args!("\r\ncapdrive starting\r\n"));

        // Actuation outputs
        let timclk_hz = clocks.timclk1().raw();
        let pwm = Tim2Pwm::new(dp.TIM2, timclk_hz, config::PWM_FREQUENCY_HZ);
        let toggle_timer = Tim3Toggle::new(dp.TIM3, timclk_hz, config::TOGGLE_TIMER_TICK_HZ);
        let bridge = HBridge::new(pins.bridge.in1, pins.bridge.in2);
        let mut actuator = Actuator::new(pwm, toggle_timer, bridge);
        actuator.set_duty_percent(config::DEFAULT_DUTY_PERCENT as u32);
        actuator.set_toggle_frequency_hz(config::DEFAULT_TOGGLE_HZ);

        // I2C1 (FDC2214)
        let i2c = BlockingI2c::i2c1(
            dp.I2C1,
            (pins.i2c1.scl, pins.i2c1.sda),
            Mode::standard(config::FDC_I2C_FREQUENCY_HZ.Hz()),
            &clocks,
            &mut apb1,
            config::FDC_BUS_POLICY.timeout_us(),
        );
        let bus = I2cBus::new(i2c, TickDelay, config::FDC_I2C_ADDR, config::FDC_BUS_POLICY);
        let mut fdc = Fdc2214::new(bus);
        let mut acquisition = Acquisition::new(config::SENSOR);

        match fdc.initialize(&mut console) {
            Ok(()) => {
                console.print(format_args!("fdc init OK\r\n"));
                acquisition.calibrate_all(
                    &mut fdc,
                    config::CALIBRATION_SAMPLES,
                    config::CALIBRATION_CHANNEL_GAP_MS,
                    &mut console,
                );
            }
            Err(e) => console.print_limited(format_args!("fdc init failed: {}\r\n", e)),
        }

        // PA3 stays in analog mode for ADC1_IN3
        let _monitor = pins.monitor;
        let adc = Adc1::new(dp.ADC1);

        unsafe {
            NVIC::unmask(pac::Interrupt::TIM3);
            NVIC::unmask(pac::Interrupt::USART1);
        }

        console.print(format_args!(
            "STATUS: PWM duty={}%, toggle={} Hz\r\n",
            actuator.duty_percent(),
            actuator.toggle_frequency_hz()
        ));

        loop {
            actuator.handle_pending_toggle(&SHARED.toggle_pending, &mut delay);

            if let Some(line) = SHARED.command.take() {
                handle_line(&line, &mut actuator, &mut console);
            }

            acquisition.run_pass(&mut fdc, config::CHANNEL_PACING_MS, &mut console);

            let volts = adc.read_volts(config::ADC_MONITOR_CHANNEL, config::ADC_VREF_V);
            console.print(format_args!("ADC1: {:.2} V\r\n", volts));

            let rx_events = SHARED.take_rx_events();
            if rx_events > 0 {
                console.print_limited(format_args!("RX events={}\r\n", rx_events));
            }

            delay.delay_ms(config::PASS_PERIOD_MS);
        }
    }

    #[interrupt]
    fn TIM3() {
        Tim3Toggle::clear_update_interrupt();
        SHARED.toggle_pending.raise();
    }

    #[interrupt]
    fn USART1() {
        static mut LINE: LineAssembler = LineAssembler::new();

        SHARED.count_rx_event();
        critical_section::with(|cs| {
            if let Some(rx) = RX.borrow(cs).borrow_mut().as_mut() {
                usart::drain_rx(rx, |b| {
                    if let Some(line) = LINE.push(b) {
                        SHARED.command.post(line);
                    }
                });
            }
        });
    }

    #[exception]
    fn SysTick() {
        tick::on_tick();
    }
}

#[cfg(not(target_os = "none"))]
fn main() {}
