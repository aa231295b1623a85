//! Bound actions and scripted key sequences

use crate::hal::{HalError, KeyReporter};
use crate::keycode::Keycode;
use embedded_hal::delay::DelayNs;
use heapless::Vec;

/// Most keys a script may hold down at the same time
pub const MAX_SCRIPT_HELD: usize = 6;

/// Keys registered by a script and not unregistered yet
pub type HeldKeys = Vec<Keycode, MAX_SCRIPT_HELD>;

/// One step of a scripted sequence
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Step {
    /// Register a key and keep it held
    Press(Keycode),
    /// Unregister a key
    Release(Keycode),
    /// Press and immediately release
    Tap(Keycode),
    /// Blocking pause
    DelayMs(u32),
    /// Type literal text, one tap per character
    Text(&'static str),
}

/// What an input does on a given layer
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum Action {
    #[default]
    NoAction,
    /// Held for as long as the input is pressed
    SimpleKey(Keycode),
    /// Played to completion on press
    Script(&'static [Step]),
}

impl Action {
    /// Press-side effect.
    ///
    /// Keys a failed script could not release are left in `stranded`.
    pub fn press<H>(&self, host: &mut H, stranded: &mut HeldKeys) -> Result<(), HalError>
    where
        H: KeyReporter + DelayNs,
    {
        match self {
            Action::NoAction => Ok(()),
            Action::SimpleKey(key) => host.register(*key),
            Action::Script(steps) => run_script(steps, host, stranded),
        }
    }

    /// Release-side effect: the bound key, or whatever a script left behind
    pub fn release<H: KeyReporter>(&self, host: &mut H, stranded: &mut HeldKeys) -> Result<(), HalError> {
        match self {
            Action::NoAction => Ok(()),
            Action::SimpleKey(key) => host.unregister(*key),
            Action::Script(_) => release_keys(host, stranded),
        }
    }

    pub const fn is_none(&self) -> bool {
        matches!(self, Action::NoAction)
    }
}

/// Reporter that remembers which keys are still registered
struct Tracked<'a, H> {
    host: &'a mut H,
    held: &'a mut HeldKeys,
}

impl<H: KeyReporter> KeyReporter for Tracked<'_, H> {
    fn register(&mut self, key: Keycode) -> Result<(), HalError> {
        let known = self.held.contains(&key);
        if !known && self.held.is_full() {
            return Err(HalError::InvalidConfig);
        }
        self.host.register(key)?;
        if !known {
            self.held.push(key).map_err(|_| HalError::InvalidConfig)?;
        }
        Ok(())
    }

    fn unregister(&mut self, key: Keycode) -> Result<(), HalError> {
        self.host.unregister(key)?;
        if let Some(pos) = self.held.iter().position(|k| *k == key) {
            self.held.remove(pos);
        }
        Ok(())
    }
}

/// Execute every step in order, blocking through delays.
///
/// When a report fails the script stops, releases what it still holds and
/// returns the error. Keys that cannot be released either stay in `held`.
pub fn run_script<H>(steps: &[Step], host: &mut H, held: &mut HeldKeys) -> Result<(), HalError>
where
    H: KeyReporter + DelayNs,
{
    let result = play(steps, host, held);
    if result.is_err() {
        // The report error wins; anything still held is retried on release.
        let _ = release_keys(host, held);
    }
    result
}

fn play<H>(steps: &[Step], host: &mut H, held: &mut HeldKeys) -> Result<(), HalError>
where
    H: KeyReporter + DelayNs,
{
    let mut keys = Tracked { host, held };
    for step in steps {
        match *step {
            Step::Press(key) => keys.register(key)?,
            Step::Release(key) => keys.unregister(key)?,
            Step::Tap(key) => {
                keys.register(key)?;
                keys.unregister(key)?;
            }
            Step::DelayMs(ms) => keys.host.delay_ms(ms),
            Step::Text(text) => keys.type_text(text)?,
        }
    }
    Ok(())
}

/// Unregister held keys, most recent first, stopping at the first failure
pub fn release_keys<H: KeyReporter>(host: &mut H, held: &mut HeldKeys) -> Result<(), HalError> {
    while let Some(&key) = held.last() {
        host.unregister(key)?;
        held.pop();
    }
    Ok(())
}

/// Total time a script blocks the scan loop in explicit delays
pub const fn script_delay_ms(steps: &[Step]) -> u32 {
    let mut total = 0;
    let mut i = 0;
    while i < steps.len() {
        if let Step::DelayMs(ms) = steps[i] {
            total += ms;
        }
        i += 1;
    }
    total
}

/// Register/unregister reports a script sends when it runs to completion
pub const fn script_report_count(steps: &[Step]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < steps.len() {
        total += match steps[i] {
            Step::Press(_) | Step::Release(_) => 1,
            Step::Tap(_) => 2,
            Step::DelayMs(_) => 0,
            Step::Text(text) => text_report_count(text),
        };
        i += 1;
    }
    total
}

const fn text_report_count(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut total = 0;
    let mut i = 0;
    while i < bytes.len() {
        total += match Keycode::from_ascii(bytes[i] as char) {
            Some((_, true)) => 4,
            Some((_, false)) => 2,
            None => 0,
        };
        i += 1;
    }
    total
}
