use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use seqguid::{
    AtomicSequencer, GeneratorConfiguration, GeneratorRegistry, GuidGenerator, IdFactory, Layout,
    MonotonicClock, Node, Optimization, Sequencer, SpinSequencer, Stamp, SystemIdentity,
    TimeSource,
};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};

struct FixedMockTime {
    ticks: i64,
}

impl TimeSource for FixedMockTime {
    fn current_ticks(&self) -> i64 {
        self.ticks
    }
}

// Number of IDs generated per benchmark iteration (split across threads for
// contended runs).
const TOTAL_IDS: usize = 4096;

/// Benchmarks a sequencer on one thread.
fn bench_sequencer<S>(c: &mut Criterion, group_name: &str, sequencer_factory: impl Fn() -> S)
where
    S: Sequencer,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{}", TOTAL_IDS), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let sequencer = sequencer_factory();
                for _ in 0..TOTAL_IDS {
                    black_box(sequencer.next_stamp());
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks one shared sequencer across threads.
fn bench_sequencer_contended<S>(
    c: &mut Criterion,
    group_name: &str,
    sequencer_factory: impl Fn() -> S,
) where
    S: Sequencer + Send + Sync,
{
    let mut group = c.benchmark_group(group_name);
    let max_threads = num_cpus::get().max(1);

    for thread_count in [1, 2, 4, 8, 16].into_iter().filter(|&n| n <= max_threads) {
        let ids_per_thread = TOTAL_IDS / thread_count;
        group.throughput(Throughput::Elements(TOTAL_IDS as u64));
        group.bench_function(
            format!("elems/{}/threads/{}", TOTAL_IDS, thread_count),
            |b| {
                b.iter_custom(|iters| {
                    let start = Instant::now();
                    for _ in 0..iters {
                        let sequencer = Arc::new(sequencer_factory());
                        let barrier = Arc::new(Barrier::new(thread_count + 1));
                        scope(|s| {
                            for _ in 0..thread_count {
                                let sequencer = Arc::clone(&sequencer);
                                let barrier = Arc::clone(&barrier);
                                s.spawn(move || {
                                    barrier.wait();
                                    for _ in 0..ids_per_thread {
                                        black_box(sequencer.next_stamp());
                                    }
                                });
                            }
                            barrier.wait();
                        });
                    }
                    start.elapsed()
                });
            },
        );
    }
    group.finish();
}

/// Benchmarks a layout's encoder alone.
fn bench_layout(c: &mut Criterion, layout: Layout) {
    let node = Node::from_bytes([0x00, 0x1a, 0x2b, 0x3c, 0x4d, 0x5e]);
    let mut group = c.benchmark_group(format!("layout/{layout}"));
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{}", TOTAL_IDS), |b| {
        b.iter(|| {
            for sequence in 0..TOTAL_IDS as u16 {
                black_box(layout.encode(Stamp::new(638_000_000_000_000_000, sequence), &node));
            }
        });
    });

    group.finish();
}

/// Benchmarks a full factory call: stamp plus encoding.
fn bench_factory(c: &mut Criterion, optimization: Optimization) {
    let registry: GeneratorRegistry =
        GeneratorRegistry::new(SystemIdentity, MonotonicClock::default())
            .allow_mixed_configurations(true);
    let Ok(factory) = IdFactory::new(&registry, optimization) else {
        return;
    };

    let mut group = c.benchmark_group(format!("factory/{optimization}"));
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{}", TOTAL_IDS), |b| {
        b.iter(|| {
            for _ in 0..TOTAL_IDS {
                black_box(factory.new_id());
            }
        });
    });

    group.finish();
}

// --- MOCK CLOCK (every call lands in one tick) ---

fn benchmark_mock_sequential_spin(c: &mut Criterion) {
    bench_sequencer(c, "mock/sequential/spin", || {
        SpinSequencer::new(FixedMockTime { ticks: 1 })
    });
}

fn benchmark_mock_sequential_atomic(c: &mut Criterion) {
    bench_sequencer(c, "mock/sequential/atomic", || {
        AtomicSequencer::new(FixedMockTime { ticks: 1 })
    });
}

/// Raw contention on the spin guard.
fn benchmark_mock_contended_spin(c: &mut Criterion) {
    bench_sequencer_contended(c, "mock/contended/spin", || {
        SpinSequencer::new(FixedMockTime { ticks: 1 })
    });
}

fn benchmark_mock_contended_atomic(c: &mut Criterion) {
    bench_sequencer_contended(c, "mock/contended/atomic", || {
        AtomicSequencer::new(FixedMockTime { ticks: 1 })
    });
}

// --- MONOTONIC CLOCK ---

fn benchmark_mono_sequential_spin(c: &mut Criterion) {
    let clock = MonotonicClock::default();
    bench_sequencer(c, "mono/sequential/spin", || {
        SpinSequencer::new(clock.clone())
    });
}

fn benchmark_mono_contended_spin(c: &mut Criterion) {
    let clock = MonotonicClock::default();
    bench_sequencer_contended(c, "mono/contended/spin", || {
        SpinSequencer::new(clock.clone())
    });
}

fn benchmark_mono_contended_atomic(c: &mut Criterion) {
    let clock = MonotonicClock::default();
    bench_sequencer_contended(c, "mono/contended/atomic", || {
        AtomicSequencer::new(clock.clone())
    });
}

// --- ENCODING ---

fn benchmark_layouts(c: &mut Criterion) {
    for layout in Layout::ALL {
        bench_layout(c, layout);
    }
}

// --- END TO END ---

fn benchmark_factories(c: &mut Criterion) {
    for optimization in [
        Optimization::None,
        Optimization::SqlServer,
        Optimization::MySql,
        Optimization::Oracle,
    ] {
        bench_factory(c, optimization);
    }
}

/// Registry lookups for an already-created configuration.
fn benchmark_registry_cached(c: &mut Criterion) {
    let registry = GeneratorRegistry::system();
    let config = GeneratorConfiguration::default();
    if registry.get_or_create(config).is_err() {
        return;
    }

    c.bench_function("registry/cached", |b| {
        b.iter(|| black_box(registry.get_or_create(config).is_ok()));
    });
}

criterion_group!(
    benches,
    benchmark_mock_sequential_spin,
    benchmark_mock_sequential_atomic,
    benchmark_mock_contended_spin,
    benchmark_mock_contended_atomic,
    benchmark_mono_sequential_spin,
    benchmark_mono_contended_spin,
    benchmark_mono_contended_atomic,
    benchmark_layouts,
    benchmark_factories,
    benchmark_registry_cached,
);
criterion_main!(benches);
