#![no_std]

//! Firmware library: board wiring, host services and embassy tasks

pub use embassy_executor::Spawner;
pub use embassy_time::Duration;

pub use macropad_core::*;

pub use crate::board::*;
pub use crate::host::*;
pub use crate::tasks::*;

pub mod board;
pub mod host;
pub mod time_driver;

// Embassy tasks module
pub mod tasks {
    use super::*;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use embassy_sync::channel::Channel;
    use embassy_time::Ticker;

    /// Every report state, in order, for the platform USB endpoint
    pub static REPORTS: Channel<CriticalSectionRawMutex, KeyboardReport, 8> = Channel::new();

    /// Scan tick: debounce the direct switches and dispatch their actions
    #[embassy_executor::task]
    pub async fn scan_task(mut scanner: BoardScanner, config: PadConfig) {
        #[cfg(feature = "defmt")]
        defmt::info!("scan task started");

        let mut host = BoardHost::new();
        let mut ticker = Ticker::every(config.scan_interval());

        loop {
            if let Err(_e) = scanner.tick(&mut host) {
                #[cfg(feature = "defmt")]
                defmt::warn!("scan tick failed: {}", _e);
            }
            ticker.next().await;
        }
    }

    /// Indicator sync, driven by layer-change notifications
    #[embassy_executor::task]
    pub async fn indicator_task(mut indicators: BoardIndicators) {
        #[cfg(feature = "defmt")]
        defmt::info!("indicator task started");

        loop {
            let state = LAYER_CHANGED.wait().await;
            if let Err(_e) = indicators.sync(state.highest()) {
                #[cfg(feature = "defmt")]
                defmt::warn!("indicator sync failed: {}", _e);
            }
        }
    }

    /// Fold key events into the current report, publishing each state.
    ///
    /// A tap is a register followed by an unregister, so the report holding
    /// the key has to reach the endpoint before the next event is folded in.
    #[embassy_executor::task]
    pub async fn report_task() {
        let mut report = KeyboardReport::default();
        loop {
            let event = KEY_EVENTS.receive().await;
            #[cfg(feature = "defmt")]
            defmt::debug!("key {}", event);
            report.apply(event.key, event.pressed);
            REPORTS.send(report).await;
        }
    }
}
