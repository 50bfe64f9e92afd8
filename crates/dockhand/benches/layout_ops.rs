//! Benchmarks for layout mutation, drop resolution and persistence

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use dockhand::{DockZone, DragSource, Rect, Vec2};
use dockhand_test_utils::fixtures::{self, Fixture};

fn names(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("panel-{}", i)).collect()
}

/// `count` widgets spread over a grid of nested splitters.
fn grid(count: usize) -> Fixture {
    let names = names(count);
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let mut fixture = fixtures::registered(&refs);
    for (i, widget) in fixture.widgets.clone().into_iter().enumerate() {
        let zone = if i % 2 == 0 { DockZone::Right } else { DockZone::Bottom };
        let target = fixture
            .system
            .container(fixture.system.main_container())
            .and_then(|c| c.layout().areas().last().copied());
        fixture
            .system
            .add_widget(widget, zone, target, None)
            .expect("grid docking succeeds");
    }
    fixture
}

fn bench_build_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_layout");

    for count in [4, 16, 64] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| black_box(grid(count)));
        });
    }

    group.finish();
}

fn bench_relayout(c: &mut Criterion) {
    let mut group = c.benchmark_group("relayout");

    for count in [16, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut fixture = grid(count);
            let mut width = 1280.0;
            b.iter(|| {
                width = if width > 1280.0 { 1024.0 } else { 1600.0 };
                fixture.system.set_main_geometry(Rect::new(0.0, 0.0, width, 900.0));
                black_box(())
            });
        });
    }

    group.finish();
}

fn bench_resolve_drop_target(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_drop_target");

    for count in [16, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let fixture = grid(count);
            let source = DragSource::Widget(fixture.widgets[0]);
            let points: Vec<Vec2> = (0..32)
                .map(|i| Vec2::new(20.0 + i as f32 * 39.0, 15.0 + i as f32 * 21.0))
                .collect();
            b.iter(|| {
                for point in &points {
                    black_box(fixture.system.resolve_drop_target(*point, source));
                }
            });
        });
    }

    group.finish();
}

fn bench_save_restore(c: &mut Criterion) {
    let mut group = c.benchmark_group("persistence");

    let fixture = grid(64);
    let document = fixture.system.save_state(0);
    group.bench_function("save_64", |b| {
        b.iter(|| black_box(fixture.system.save_state(0)));
    });
    group.bench_function("restore_64", |b| {
        let mut target = fixtures::registered(
            &names(64).iter().map(String::as_str).collect::<Vec<_>>(),
        );
        b.iter(|| {
            target
                .system
                .restore_state(&document, 0)
                .expect("saved document restores");
            target.system.drain_events();
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_build_layout,
    bench_relayout,
    bench_resolve_drop_target,
    bench_save_restore
);
criterion_main!(benches);
