//! Pin-level checks against embedded-hal-mock expectations

use embedded_hal_mock::eh1::digital::{Mock as PinMock, State as PinState, Transaction as PinTransaction};
use macropad_core::{
    Duration, Edge, EmbeddedHalIndicator, EmbeddedHalSwitch, IndicatorSet, InputId, Instant, Layer, MonitoredInput,
    Polarity,
};

use PinState::{High, Low};

fn sets(levels: &[PinState]) -> Vec<PinTransaction> {
    levels.iter().map(|level| PinTransaction::set(*level)).collect()
}

fn gets(levels: &[PinState]) -> Vec<PinTransaction> {
    levels.iter().map(|level| PinTransaction::get(*level)).collect()
}

#[test]
fn layer_change_moves_light_without_touching_other_states() {
    let pins = [
        PinMock::new(&sets(&[Low, High, Low])),
        PinMock::new(&sets(&[Low, Low])),
        PinMock::new(&sets(&[Low, Low, High])),
        PinMock::new(&sets(&[Low, Low])),
    ];
    let mut handles = pins.clone();

    let mut set = IndicatorSet::new(pins.map(|pin| EmbeddedHalIndicator::new(pin, false)));
    set.init().unwrap();
    assert_eq!(set.states(), [true, false, false, false]);

    set.sync(Layer::LAYER_2).unwrap();
    assert_eq!(set.states(), [false, false, true, false]);
    assert_eq!(set.active(), Some(Layer::LAYER_2));

    for pin in handles.iter_mut() {
        pin.done();
    }
}

#[test]
fn inverted_indicators_drive_low_to_light() {
    let pins = [
        PinMock::new(&sets(&[High, High])),
        PinMock::new(&sets(&[High, Low])),
    ];
    let mut handles = pins.clone();

    let mut set = IndicatorSet::new(pins.map(|pin| EmbeddedHalIndicator::new(pin, true)));
    set.sync(Layer::LAYER_1).unwrap();
    assert_eq!(set.active(), Some(Layer::LAYER_1));

    for pin in handles.iter_mut() {
        pin.done();
    }
}

#[test]
fn unknown_layer_drives_everything_off() {
    let pins = [PinMock::new(&sets(&[Low])), PinMock::new(&sets(&[Low]))];
    let mut handles = pins.clone();

    let mut set = IndicatorSet::new(pins.map(|pin| EmbeddedHalIndicator::new(pin, false)));
    set.sync(Layer(7)).unwrap();
    assert_eq!(set.active(), None);
    assert_eq!(set.states(), [false, false]);

    for pin in handles.iter_mut() {
        pin.done();
    }
}

/// One sample per millisecond from t=0
fn poll_all(input: &mut MonitoredInput<EmbeddedHalSwitch<PinMock>>, samples: usize) -> Vec<(u64, Edge)> {
    (0..samples as u64)
        .filter_map(|t| input.poll(Instant::from_millis(t)).unwrap().map(|edge| (t, edge)))
        .collect()
}

#[test]
fn active_low_switch_presses_on_low_level() {
    let mut levels = vec![High; 2];
    levels.extend([Low; 8]);
    levels.extend([High; 8]);
    let mut pin = PinMock::new(&gets(&levels));

    let switch = EmbeddedHalSwitch::new(pin.clone(), Polarity::ActiveLow);
    let mut input = MonitoredInput::new(InputId::Encoder1Switch, switch, Duration::from_millis(5));

    let edges = poll_all(&mut input, levels.len());
    assert_eq!(edges, vec![(7, Edge::Pressed), (15, Edge::Released)]);
    pin.done();
}

#[test]
fn active_high_switch_presses_on_high_level() {
    let mut levels = vec![Low; 2];
    levels.extend([High; 8]);
    let mut pin = PinMock::new(&gets(&levels));

    let switch = EmbeddedHalSwitch::new(pin.clone(), Polarity::ActiveHigh);
    let mut input = MonitoredInput::new(InputId::Spacebar, switch, Duration::from_millis(5));

    let edges = poll_all(&mut input, levels.len());
    assert_eq!(edges, vec![(7, Edge::Pressed)]);
    assert!(input.is_pressed());
    pin.done();
}

#[test]
fn resting_switches_never_fire() {
    let mut high = PinMock::new(&gets(&[High; 20]));
    let mut low = PinMock::new(&gets(&[Low; 20]));

    let mut encoder = MonitoredInput::new(
        InputId::Encoder2Switch,
        EmbeddedHalSwitch::new(high.clone(), Polarity::ActiveLow),
        Duration::from_millis(5),
    );
    let mut spacebar = MonitoredInput::new(
        InputId::Spacebar,
        EmbeddedHalSwitch::new(low.clone(), Polarity::ActiveHigh),
        Duration::from_millis(5),
    );

    assert!(poll_all(&mut encoder, 20).is_empty());
    assert!(poll_all(&mut spacebar, 20).is_empty());
    high.done();
    low.done();
}
