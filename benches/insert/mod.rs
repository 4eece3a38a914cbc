use criterion::{
    measurement::Measurement, BatchSize, BenchmarkGroup, BenchmarkId, Criterion, Throughput,
};
use arboretum::Tree;

use crate::Lfsr;

#[derive(Debug, Clone, Copy)]
struct BenchName {
    strategy: &'static str,
    n_values: usize,
}

impl From<BenchName> for BenchmarkId {
    fn from(v: BenchName) -> Self {
        Self::new(format!("{}/n_values", v.strategy), v.n_values)
    }
}

pub(super) fn bench(c: &mut Criterion) {
    let mut g = c.benchmark_group("insert");
    for n_values in [1, 100, 1_000, 10_000] {
        for_each_strategy!(bench_random(&mut g, n_values));
    }
    g.finish();

    let mut g = c.benchmark_group("bulk_build");
    for n_values in [100, 1_000, 10_000] {
        for_each_strategy!(bench_bulk(&mut g, n_values));
    }
}

/// Measure the time needed to insert `n_values` number of randomly generated
/// keys into an empty tree.
fn bench_random<T, M>(g: &mut BenchmarkGroup<'_, M>, n_values: usize)
where
    T: Tree<u16, usize>,
    M: Measurement,
{
    let bench_name = BenchName {
        strategy: T::STRATEGY,
        n_values,
    };
    g.throughput(Throughput::Elements(n_values as _)); // Keys inserted per second
    g.bench_function(BenchmarkId::from(bench_name), |b| {
        b.iter_batched(
            || (T::default(), Lfsr::default()),
            |(mut t, mut rand)| {
                for _i in 0..n_values {
                    t.insert(rand.next(), 42_usize);
                }
                t
            },
            BatchSize::PerIteration,
        );
    });
}

/// Measure the time needed to build a tree from `n_values` unordered entries
/// in one call.
fn bench_bulk<T, M>(g: &mut BenchmarkGroup<'_, M>, n_values: usize)
where
    T: Tree<u16, usize>,
    M: Measurement,
{
    let mut rand = Lfsr::default();
    let entries = (0..n_values)
        .map(|_| (rand.next(), 42_usize))
        .collect::<Vec<_>>();

    let bench_name = BenchName {
        strategy: T::STRATEGY,
        n_values,
    };
    g.throughput(Throughput::Elements(n_values as _));
    g.bench_function(BenchmarkId::from(bench_name), |b| {
        b.iter_batched(
            || entries.clone(),
            |entries| T::from_entries(entries),
            BatchSize::LargeInput,
        );
    });
}
