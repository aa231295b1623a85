//! Test utilities for macropad core functionality

pub mod sample_trace {
    //! Raw sample traces for driving a debouncer tick by tick

    use crate::debounce::Debouncer;
    use crate::hal::Instant;
    use crate::types::Edge;
    use std::vec::Vec;

    /// Level change in a trace
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LevelChange {
        pub at_ms: u64,
        pub pressed: bool,
    }

    /// Piecewise-constant raw signal, sampled every millisecond
    #[derive(Debug, Clone, Default)]
    pub struct SampleTrace {
        changes: Vec<LevelChange>,
        end_ms: u64,
    }

    impl SampleTrace {
        /// Released from t=0 until `end_ms`
        pub fn released_until(end_ms: u64) -> Self {
            Self {
                changes: Vec::new(),
                end_ms,
            }
        }

        /// Change the raw level from `at_ms` onwards
        pub fn level_at(mut self, at_ms: u64, pressed: bool) -> Self {
            self.changes.push(LevelChange { at_ms, pressed });
            self.changes.sort_by_key(|change| change.at_ms);
            self.end_ms = self.end_ms.max(at_ms);
            self
        }

        /// Single clean press held for `hold_ms`
        pub fn press(at_ms: u64, hold_ms: u64, end_ms: u64) -> Self {
            Self::released_until(end_ms)
                .level_at(at_ms, true)
                .level_at(at_ms + hold_ms, false)
        }

        /// Contact chatter: toggles every `period_ms` from `from_ms` for `cycles` toggles
        pub fn chatter(mut self, from_ms: u64, period_ms: u64, cycles: u64) -> Self {
            let mut level = true;
            for i in 0..cycles {
                self = self.level_at(from_ms + i * period_ms, level);
                level = !level;
            }
            self
        }

        /// Raw level at a given time
        pub fn level(&self, at_ms: u64) -> bool {
            self.changes
                .iter()
                .take_while(|change| change.at_ms <= at_ms)
                .last()
                .map(|change| change.pressed)
                .unwrap_or(false)
        }

        /// Raw samples at 1ms spacing, t=0..=end
        pub fn samples(&self) -> impl Iterator<Item = (u64, bool)> + '_ {
            (0..=self.end_ms).map(move |t| (t, self.level(t)))
        }

        /// Run a debouncer over the whole trace
        pub fn run(&self, debouncer: &mut Debouncer) -> Vec<(u64, Edge)> {
            self.samples()
                .filter_map(|(t, raw)| debouncer.update(raw, Instant::from_millis(t)).map(|edge| (t, edge)))
                .collect()
        }
    }
}

pub mod event_capture {
    //! Analysis of captured edges and host events

    use crate::hal::mock::HostEvent;
    use crate::types::Edge;

    /// Largest press-minus-release imbalance seen at any prefix.
    ///
    /// Returns None if the sequence ever releases more than it pressed.
    pub fn max_imbalance<'a>(edges: impl IntoIterator<Item = &'a Edge>) -> Option<u32> {
        let mut open: i64 = 0;
        let mut worst: i64 = 0;
        for edge in edges {
            open += if edge.is_press() { 1 } else { -1 };
            if open < 0 {
                return None;
            }
            worst = worst.max(open);
        }
        Some(worst as u32)
    }

    /// True when presses and releases strictly alternate, starting with a press
    pub fn alternates<'a>(edges: impl IntoIterator<Item = &'a Edge>) -> bool {
        let mut expect_press = true;
        for edge in edges {
            if edge.is_press() != expect_press {
                return false;
            }
            expect_press = !expect_press;
        }
        true
    }

    /// Number of register/unregister events, ignoring delays
    pub fn report_count(events: &[HostEvent]) -> usize {
        events
            .iter()
            .filter(|event| !matches!(event, HostEvent::Delay(_)))
            .count()
    }

    /// Delays in the order the host performed them
    pub fn delays(events: &[HostEvent]) -> std::vec::Vec<u32> {
        events
            .iter()
            .filter_map(|event| match event {
                HostEvent::Delay(ms) => Some(*ms),
                _ => None,
            })
            .collect()
    }
}
