//! Millisecond embassy time driver on TIMER0 for ATmega32U4

use avr_device::atmega32u4::TC0;
use core::cell::Cell;
use critical_section::Mutex;
use embassy_time_driver::{AlarmHandle, Driver};
use portable_atomic::{AtomicBool, AtomicU64, Ordering};

type AlarmCallback = (fn(*mut ()), *mut ());

/// 1 kHz tick counter with a single alarm
pub struct TickDriver {
    ticks: AtomicU64,
    alarm_taken: AtomicBool,
    alarm_at: Mutex<Cell<u64>>,
    callback: Mutex<Cell<Option<AlarmCallback>>>,
}

// SAFETY: the callback context pointer is only touched inside critical sections.
unsafe impl Sync for TickDriver {}

impl TickDriver {
    const fn new() -> Self {
        Self {
            ticks: AtomicU64::new(0),
            alarm_taken: AtomicBool::new(false),
            alarm_at: Mutex::new(Cell::new(u64::MAX)),
            callback: Mutex::new(Cell::new(None)),
        }
    }

    /// Advance time by one tick (called from the TIMER0 compare interrupt)
    pub fn tick(&self) {
        let now = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;

        let due = critical_section::with(|cs| {
            let alarm_at = self.alarm_at.borrow(cs);
            if now >= alarm_at.get() {
                alarm_at.set(u64::MAX);
                self.callback.borrow(cs).get()
            } else {
                None
            }
        });

        if let Some((callback, ctx)) = due {
            callback(ctx);
        }
    }
}

impl Driver for TickDriver {
    fn now(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    unsafe fn allocate_alarm(&self) -> Option<AlarmHandle> {
        if self.alarm_taken.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(AlarmHandle::new(0))
        }
    }

    fn set_alarm_callback(&self, _alarm: AlarmHandle, callback: fn(*mut ()), ctx: *mut ()) {
        critical_section::with(|cs| self.callback.borrow(cs).set(Some((callback, ctx))));
    }

    fn set_alarm(&self, _alarm: AlarmHandle, timestamp: u64) -> bool {
        critical_section::with(|cs| {
            if timestamp <= self.now() {
                self.alarm_at.borrow(cs).set(u64::MAX);
                false
            } else {
                self.alarm_at.borrow(cs).set(timestamp);
                true
            }
        })
    }
}

embassy_time_driver::time_driver_impl!(static DRIVER: TickDriver = TickDriver::new());

/// Start TIMER0 in CTC mode: 16 MHz / 64 / 250 = 1 kHz
pub fn start(tc0: &TC0) {
    tc0.tccr0a.write(|w| w.wgm0().ctc());
    tc0.ocr0a.write(|w| w.bits(249));
    tc0.tccr0b.write(|w| w.cs0().prescale_64());
    tc0.timsk0.write(|w| w.ocie0a().set_bit());
}

/// Hook for the TIMER0_COMPA interrupt handler
pub fn on_timer_interrupt() {
    DRIVER.tick();
}
