use std::hint::black_box;

use criterion::{measurement::Measurement, BenchmarkGroup, BenchmarkId, Criterion, Throughput};
use arboretum::Tree;

use crate::Lfsr;

#[derive(Debug)]
struct BenchName {
    bench_name: &'static str,
    strategy: &'static str,
    n_values: usize,
}

impl From<BenchName> for BenchmarkId {
    fn from(v: BenchName) -> Self {
        Self::new(
            format!("{}/{}/n_values", v.strategy, v.bench_name),
            v.n_values,
        )
    }
}

pub(super) fn bench(c: &mut Criterion) {
    let mut g = c.benchmark_group("iter");

    for n_values in [1, 100, 1_000, 10_000] {
        for_each_strategy!(bench_param(&mut g, n_values));
    }
}

fn bench_param<T, M>(g: &mut BenchmarkGroup<'_, M>, n_values: usize)
where
    T: Tree<u16, usize>,
    M: Measurement,
{
    // Generate the tree.
    let mut rand = Lfsr::default();
    let mut t = T::default();

    for _i in 0..n_values {
        t.insert(rand.next(), 42_usize);
    }

    bench_iter(n_values, g, &t);
    bench_iter_rev(n_values, g, &t);
    bench_successor(n_values, g, &t);
}

macro_rules! iter_bench {
    (
        $name:ident,
        |$t:ident| $body:expr
    ) => {
        paste::paste! {
            fn [<bench_ $name>]<T, M>(n_values: usize, g: &mut BenchmarkGroup<M>, $t: &T)
            where
                T: Tree<u16, usize>,
                M: Measurement,
            {
                let bench_name = BenchName {
                    n_values,
                    strategy: T::STRATEGY,
                    bench_name: stringify!($name),
                };

                g.throughput(Throughput::Elements(n_values as _));
                // Values per second
                g.bench_function(BenchmarkId::from(bench_name), |b| {
                    b.iter(|| {
                        for v in $body {
                            black_box(v);
                        }
                    })
                });
            }
        }
    };
}

iter_bench!(iter, |t| t.iter());
iter_bench!(iter_rev, |t| t.iter_rev());

// Walk the tree one neighbour at a time from the minimum.
iter_bench!(successor, |t| std::iter::successors(t.min(), |&id| t.successor(id)));
