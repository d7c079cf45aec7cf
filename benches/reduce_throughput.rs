use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use parallel_sum::device::{CpuDevice, GlobalAccumulator};
use parallel_sum::input::{max_safe_bound, InputArray};
use parallel_sum::reduce::sum::KernelParams;
use parallel_sum::registry::build_registry;
use std::hint::black_box;

const SIZES: [usize; 2] = [1 << 16, 1 << 22];

fn bench_reduce(c: &mut Criterion) {
    let device = CpuDevice::new(None).unwrap();
    let registry = build_registry(&KernelParams::default()).unwrap();
    let acc = GlobalAccumulator::new();

    let mut group = c.benchmark_group("sum_u32");
    for n in SIZES {
        let input = InputArray::generate(42, n, max_safe_bound(n)).unwrap();
        group.throughput(Throughput::Elements(n as u64));

        for strategy in registry.all() {
            group.bench_with_input(BenchmarkId::new(strategy.name(), n), &input, |b, input| {
                b.iter(|| {
                    acc.reset();
                    let sum = strategy.execute(black_box(input.values()), &device, &acc);
                    black_box(sum)
                })
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_reduce);
criterion_main!(benches);
