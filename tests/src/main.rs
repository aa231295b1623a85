// Integration walk-through of a wired pad on mock hardware

use macropad_core::hal::mock::HostEvent;
use macropad_core::test_utils::event_capture::{delays, report_count};
use macropad_core::{InputId, Keycode, Layer, LayerState, PadConfig, OPEN_VIA_CONFIGURATOR_BLOCKING_MS};
use macropad_tests::Rig;

fn main() {
    println!("🧪 Macropad Integration Tests");

    // Test 1: Configuration validation
    test_configuration_validation();

    // Test 2: Spacebar debounce and report
    test_spacebar_tap();

    // Test 3: Encoder switch scripts per layer
    test_encoder_scripts();

    // Test 4: Indicator follows the layer hook
    test_layer_indicators();

    println!("✅ All integration tests passed!");
    println!();
    println!("📝 Run property tests with: cargo test -p macropad-tests");
}

/// Test configuration validation rules
fn test_configuration_validation() {
    println!("⚙️  Testing Configuration Validation...");

    assert!(PadConfig::new(5, 1, true).is_ok());
    assert!(PadConfig::new(0, 0, true).is_err());
    assert!(PadConfig::new(101, 1, true).is_err());
    assert!(PadConfig::new(5, 10, false).is_err());

    println!("  ✅ Configuration validation working");
}

/// Test a clean tap and a chattering tap on the spacebar
fn test_spacebar_tap() {
    println!("⌨️  Testing Spacebar...");

    let mut rig = Rig::new();
    rig.set_pressed(InputId::Spacebar, true);
    rig.run_for(4);
    assert!(rig.host.events().is_empty());
    rig.run_for(10);
    assert_eq!(rig.host.events(), &[HostEvent::Register(Keycode::Space)]);
    println!("  ✅ Press reported after {}ms", rig.now_ms());

    for level in [false, true, false, true, false] {
        rig.set_pressed(InputId::Spacebar, level);
        rig.tick();
    }
    rig.run_for(20);
    assert_eq!(report_count(rig.host.events()), 2);
    assert!(rig.host.held_keys().is_empty());
    println!("  ✅ Chatter collapsed into a single release");
}

/// Test the encoder push switch on every layer
fn test_encoder_scripts() {
    println!("🎛️  Testing Encoder Switch Scripts...");

    for layer in Layer::ALL {
        let mut rig = Rig::new();
        rig.host.set_layer(layer);
        rig.set_pressed(InputId::Encoder1Switch, true);
        rig.run_for(10);
        rig.set_pressed(InputId::Encoder1Switch, false);
        rig.run_for(10);

        let events = rig.host.events();
        assert!(rig.host.held_keys().is_empty());
        println!(
            "  ✅ Layer {}: {} reports, {}ms blocked",
            layer.0,
            report_count(events),
            delays(events).iter().sum::<u32>()
        );
        if layer == Layer::BASE {
            assert_eq!(delays(events).iter().sum::<u32>(), OPEN_VIA_CONFIGURATOR_BLOCKING_MS);
        }
    }
}

/// Test the layer-change hook against the indicator set
fn test_layer_indicators() {
    println!("💡 Testing Layer Indicators...");

    let mut rig = Rig::new();
    assert_eq!(rig.pad.indicators().active(), Some(Layer::BASE));

    for layer in Layer::ALL {
        rig.pad.layer_state_set(LayerState::only(Layer::BASE).with(layer));
        assert_eq!(rig.pad.indicators().active(), Some(layer));
    }

    rig.pad.layer_state_set(LayerState::only(Layer(5)));
    assert_eq!(rig.pad.indicators().active(), None);

    println!("  ✅ Exactly one indicator lit per known layer");
}
