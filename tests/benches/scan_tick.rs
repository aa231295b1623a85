use criterion::{black_box, criterion_group, criterion_main, Criterion};
use macropad_core::{Duration, Debouncer, InputId, Instant};
use macropad_tests::Rig;

fn idle_scan(c: &mut Criterion) {
    let mut rig = Rig::new();
    c.bench_function("scan_tick idle", |b| b.iter(|| black_box(rig.tick())));
}

fn spacebar_taps(c: &mut Criterion) {
    let mut rig = Rig::new();
    c.bench_function("scan_tick spacebar tap", |b| {
        b.iter(|| {
            rig.set_pressed(InputId::Spacebar, true);
            rig.run_for(6);
            rig.set_pressed(InputId::Spacebar, false);
            rig.run_for(6);
            black_box(rig.host.take_events())
        })
    });
}

fn debouncer_chatter(c: &mut Criterion) {
    c.bench_function("debouncer chatter", |b| {
        b.iter(|| {
            let mut debouncer = Debouncer::new(Duration::from_millis(5));
            let mut edges = 0;
            for t in 0..1_000u64 {
                if debouncer.update((t / 3) % 2 == 0, Instant::from_millis(t)).is_some() {
                    edges += 1;
                }
            }
            black_box(edges)
        })
    });
}

criterion_group!(benches, idle_scan, spacebar_taps, debouncer_chatter);
criterion_main!(benches);
