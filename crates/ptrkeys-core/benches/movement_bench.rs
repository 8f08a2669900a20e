//! Criterion benchmarks for the [`Movement`] integration hot path.
//!
//! `pointer_update` and `scroll_update` run once per tick (60 times a second
//! by default) while any direction is held, and `find_press` runs on every
//! key event, so all three should stay in the low-nanosecond range.
//!
//! Run with:
//! ```bash
//! cargo bench --package ptrkeys-core --bench movement_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ptrkeys_core::keymap::keysyms::{XK_J, XK_K, XK_L, XK_SEMICOLON};
use ptrkeys_core::{
    BindingOptions, BindingTable, Command, DirectionSet, KeyBinding, Keysym, ModMask, Movement,
};

// ── Fixture builders ──────────────────────────────────────────────────────────

fn moving_pointer() -> Movement {
    let mut m = Movement::new(1000.0);
    m.start(DirectionSet::RIGHT | DirectionSet::UP)
        .expect("diagonal start must be valid");
    m
}

/// Builds a table of `n` grabbed movement bindings on consecutive keysyms.
fn build_table_with_n_bindings(n: u32) -> BindingTable {
    let bindings = (0..n)
        .map(|i| KeyBinding {
            mods: ModMask::NONE,
            keysym: Keysym(0x100 + i),
            options: BindingOptions {
                requires_grab: true,
                no_autorepeat: true,
            },
            on_press: Some(Command::MoveStart(DirectionSet::RIGHT)),
            on_release: Some(Command::MoveStop(DirectionSet::RIGHT)),
        })
        .collect();
    BindingTable::new(bindings)
}

// ── Benchmarks: integration ───────────────────────────────────────────────────

/// Benchmarks one 60fps pointer tick with both axes active.
fn bench_pointer_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("integration");

    group.bench_function("pointer_update_16ms", |b| {
        let mut m = moving_pointer();
        b.iter(|| m.pointer_update(black_box(16_667)))
    });

    group.bench_function("pointer_update_idle", |b| {
        let mut m = Movement::new(1000.0);
        b.iter(|| m.pointer_update(black_box(16_667)))
    });

    group.finish();
}

/// Benchmarks one scroll tick, including the immediate-pulse branch.
fn bench_scroll_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("integration");

    group.bench_function("scroll_update_16ms", |b| {
        let mut m = Movement::new(14.0);
        m.start(DirectionSet::DOWN).expect("single direction");
        b.iter(|| m.scroll_update(black_box(16_667)))
    });

    group.finish();
}

// ── Benchmarks: dispatch ──────────────────────────────────────────────────────

/// Benchmarks press dispatch against the realistic default-size table and
/// its scaling with table length (worst case: last binding matches).
fn bench_find_press_scaling(c: &mut Criterion) {
    let table_sizes = [8u32, 32, 128];
    let mut group = c.benchmark_group("find_press_scaling");

    for &size in &table_sizes {
        let table = build_table_with_n_bindings(size);
        let last = Keysym(0x100 + size - 1);

        group.bench_with_input(BenchmarkId::new("bindings", size), &last, |b, &keysym| {
            b.iter(|| {
                table.find_press(
                    black_box(true),
                    black_box(keysym),
                    black_box(ModMask::NONE),
                    black_box(ModMask::MOD2),
                )
            })
        });
    }

    group.finish();
}

/// Benchmarks the default-style movement keys against a small table.
fn bench_find_press_default_keys(c: &mut Criterion) {
    let bindings = [XK_J, XK_K, XK_L, XK_SEMICOLON]
        .into_iter()
        .zip([
            DirectionSet::LEFT,
            DirectionSet::DOWN,
            DirectionSet::UP,
            DirectionSet::RIGHT,
        ])
        .map(|(keysym, dir)| KeyBinding {
            mods: ModMask::NONE,
            keysym,
            options: BindingOptions {
                requires_grab: true,
                no_autorepeat: true,
            },
            on_press: Some(Command::MoveStart(dir)),
            on_release: Some(Command::MoveStop(dir)),
        })
        .collect();
    let table = BindingTable::new(bindings);

    c.bench_function("find_press_home_row", |b| {
        b.iter(|| {
            table.find_press(
                black_box(true),
                black_box(XK_SEMICOLON),
                black_box(ModMask::NONE),
                black_box(ModMask::MOD2),
            )
        })
    });
}

criterion_group!(
    benches,
    bench_pointer_update,
    bench_scroll_update,
    bench_find_press_scaling,
    bench_find_press_default_keys,
);
criterion_main!(benches);
