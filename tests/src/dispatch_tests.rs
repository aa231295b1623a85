//! Per-layer dispatch through a fully wired pad

use crate::Rig;
use macropad_core::hal::mock::{HostEvent, MockHost};
use macropad_core::test_utils::event_capture::{delays, report_count};
use macropad_core::{
    default_config, Action, ActionMap, Dispatcher, Edge, InputId, Keycode, Layer, LayerState,
};
use proptest::prelude::*;
use rstest::rstest;

use HostEvent::{Register, Unregister};

/// Spacebar sends a different letter per layer, everything else is inert
fn lettered_keymap() -> ActionMap {
    let mut map = ActionMap::new();
    let letters = [Keycode::A, Keycode::B, Keycode::C, Keycode::D];
    for (layer, key) in Layer::ALL.iter().zip(letters) {
        map.bind(InputId::Spacebar, *layer, Action::SimpleKey(key)).unwrap();
    }
    map.bind_all_layers(InputId::Encoder1Switch, Action::NoAction)
        .unwrap()
        .bind_all_layers(InputId::Encoder2Switch, Action::NoAction)
        .unwrap();
    map
}

/// Distinct key for every (input, layer) pair
fn distinct_keymap() -> ActionMap {
    const KEYS: [Keycode; 12] = [
        Keycode::A,
        Keycode::B,
        Keycode::C,
        Keycode::D,
        Keycode::E,
        Keycode::F,
        Keycode::G,
        Keycode::H,
        Keycode::I,
        Keycode::J,
        Keycode::K,
        Keycode::L,
    ];
    let mut map = ActionMap::new();
    let mut keys = KEYS.iter();
    for input in InputId::ALL {
        for layer in Layer::ALL {
            map.bind(input, layer, Action::SimpleKey(*keys.next().unwrap())).unwrap();
        }
    }
    map
}

/// Press, hold well past the window, release, settle
fn click(rig: &mut Rig, input: InputId) {
    rig.set_pressed(input, true);
    rig.run_for(20);
    rig.set_pressed(input, false);
    rig.run_for(20);
}

#[rstest]
#[case::base(Layer::BASE)]
#[case::layer_1(Layer::LAYER_1)]
#[case::layer_2(Layer::LAYER_2)]
#[case::layer_3(Layer::LAYER_3)]
fn spacebar_taps_space_on_every_layer(#[case] layer: Layer) {
    let mut rig = Rig::new();
    rig.host.set_layer(layer);

    click(&mut rig, InputId::Spacebar);

    assert_eq!(rig.host.events(), &[Register(Keycode::Space), Unregister(Keycode::Space)]);
}

#[rstest]
#[case::layer_1_undo(Layer::LAYER_1, Keycode::LCtrl, Keycode::Z)]
#[case::layer_2_redo(Layer::LAYER_2, Keycode::LCtrl, Keycode::Y)]
#[case::layer_3_lock(Layer::LAYER_3, Keycode::LGui, Keycode::L)]
fn encoder_switch_runs_chord_script(#[case] layer: Layer, #[case] modifier: Keycode, #[case] key: Keycode) {
    let mut rig = Rig::new();
    rig.host.set_layer(layer);

    rig.set_pressed(InputId::Encoder1Switch, true);
    rig.run_for(20);
    let on_press = rig.host.take_events();

    rig.set_pressed(InputId::Encoder1Switch, false);
    rig.run_for(20);

    assert_eq!(on_press, vec![Register(modifier), Register(key), Unregister(key), Unregister(modifier)]);
    assert!(rig.host.events().is_empty(), "release must not run the script again");
}

#[test]
fn encoder_switch_on_base_opens_configurator() {
    let mut rig = Rig::new();

    click(&mut rig, InputId::Encoder1Switch);

    let events = rig.host.events();
    assert_eq!(
        &events[..4],
        &[Register(Keycode::LGui), Register(Keycode::R), Unregister(Keycode::R), Unregister(Keycode::LGui)]
    );
    assert_eq!(&events[events.len() - 2..], &[Register(Keycode::Enter), Unregister(Keycode::Enter)]);
    assert_eq!(delays(events), vec![100, 100]);
    assert!(rig.host.held_keys().is_empty());
}

#[rstest]
#[case(Layer::BASE)]
#[case(Layer::LAYER_1)]
#[case(Layer::LAYER_2)]
#[case(Layer::LAYER_3)]
fn second_encoder_switch_does_nothing(#[case] layer: Layer) {
    let mut rig = Rig::new();
    rig.host.set_layer(layer);

    click(&mut rig, InputId::Encoder2Switch);

    assert_eq!(report_count(rig.host.events()), 0);
}

#[rstest]
#[case(Layer::BASE, Layer::LAYER_1, Keycode::A)]
#[case(Layer::LAYER_1, Layer::BASE, Keycode::B)]
#[case(Layer::LAYER_2, Layer::LAYER_3, Keycode::C)]
#[case(Layer::LAYER_3, Layer::LAYER_2, Keycode::D)]
fn release_uses_layer_active_at_press(#[case] pressed_on: Layer, #[case] released_on: Layer, #[case] key: Keycode) {
    let mut rig = Rig::with_keymap(lettered_keymap(), default_config());
    rig.host.set_layer(pressed_on);

    rig.set_pressed(InputId::Spacebar, true);
    rig.run_for(20);
    rig.host.set_layer(released_on);
    rig.set_pressed(InputId::Spacebar, false);
    rig.run_for(20);

    assert_eq!(rig.host.events(), &[Register(key), Unregister(key)]);
}

#[test]
fn unknown_layer_is_silent() {
    let mut rig = Rig::with_keymap(lettered_keymap(), default_config());
    rig.host.set_layer_state(LayerState::only(Layer(9)));

    click(&mut rig, InputId::Spacebar);

    assert!(rig.host.events().is_empty());
}

#[derive(Clone, Copy, Debug)]
enum Op {
    Press(InputId),
    Release(InputId),
    Layer(u8),
}

fn op() -> impl Strategy<Value = Op> {
    let input = prop::sample::select(InputId::ALL.to_vec());
    prop_oneof![
        input.clone().prop_map(Op::Press),
        input.prop_map(Op::Release),
        (0u8..4).prop_map(Op::Layer),
    ]
}

proptest! {
    #[test]
    fn layer_churn_never_leaks_or_invents_keys(ops in prop::collection::vec(op(), 0..64)) {
        let mut dispatcher = Dispatcher::new(distinct_keymap());
        let mut host = MockHost::new();

        for op in ops {
            match op {
                Op::Press(input) => dispatcher.dispatch(input, Edge::Pressed, &mut host).unwrap(),
                Op::Release(input) => dispatcher.dispatch(input, Edge::Released, &mut host).unwrap(),
                Op::Layer(layer) => host.set_layer(Layer(layer)),
            }
        }
        for input in InputId::ALL {
            dispatcher.dispatch(input, Edge::Released, &mut host).unwrap();
        }

        let mut held: Vec<Keycode> = Vec::new();
        for event in host.events() {
            match event {
                Register(key) => held.push(*key),
                Unregister(key) => {
                    let pos = held.iter().position(|k| k == key);
                    prop_assert!(pos.is_some(), "{:?} released but never pressed", key);
                    held.remove(pos.unwrap());
                }
                HostEvent::Delay(_) => {}
            }
        }
        prop_assert!(held.is_empty(), "left registered: {:?}", held);
    }
}
