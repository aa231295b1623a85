#![no_std]
#![no_main]
#![feature(abi_avr_interrupt)]

#[cfg(feature = "defmt")]
use defmt_rtt as _;

// Panic handler
use panic_halt as _;

use avr_device::atmega32u4::Peripherals;

use macropad_core::*;
use macropad_firmware::*;

/// Main firmware entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    #[cfg(feature = "defmt")]
    defmt::info!("macropad firmware starting");

    // SAFETY: taken exactly once, before any task runs.
    let dp = unsafe { Peripherals::steal() };
    time_driver::start(&dp.TC0);
    // SAFETY: every static touched from interrupts is guarded by a critical section.
    unsafe { avr_device::interrupt::enable() };

    let config = default_config();

    let scanner = match board::init_scanner(&config) {
        Ok(scanner) => scanner,
        Err(_msg) => {
            #[cfg(feature = "defmt")]
            defmt::error!("bad keymap: {}", _msg);
            return;
        }
    };
    let mut pad = Macropad::new(scanner, board::init_indicators(&config));
    if let Err(_e) = pad.init() {
        #[cfg(feature = "defmt")]
        defmt::error!("init failed: {}", _e);
        return;
    }
    let (scanner, indicators) = pad.into_parts();

    spawner.must_spawn(report_task());
    spawner.must_spawn(indicator_task(indicators));
    spawner.must_spawn(scan_task(scanner, config));

    #[cfg(feature = "defmt")]
    defmt::info!("macropad ready");
}

#[avr_device::interrupt(atmega32u4)]
fn TIMER0_COMPA() {
    time_driver::on_timer_interrupt();
}
