use criterion::{criterion_group, criterion_main, Criterion};
use ndarray::{aview1, Array1};
use ndarray_rand::rand::SeedableRng;
use planbox_doe::{expand_grid, DOptimal, Lhs, LhsKind, SamplingMethod};
use rand_xoshiro::Xoshiro256Plus;

fn criterion_lhs(c: &mut Criterion) {
    let dims = [10, 100];
    let sizes = [10, 100];
    let kinds = [LhsKind::Centered, LhsKind::CenteredMaximin];

    let mut group = c.benchmark_group("doe");
    group.sample_size(10);
    let arr1 = aview1(&[0., 1.]);
    let rng = Xoshiro256Plus::seed_from_u64(42);
    for dim in dims {
        for size in sizes {
            for kind in kinds {
                group.bench_function(format!("lhs-{kind:?}-{dim}-dim-{size}-size"), |b| {
                    let xlimits = arr1.broadcast((dim, 2)).unwrap();
                    b.iter(|| {
                        std::hint::black_box(
                            Lhs::new(&xlimits)
                                .kind(kind)
                                .with_rng(rng.clone())
                                .sample(size),
                        )
                    });
                });
            }
        }
    }
    group.finish();
}

fn criterion_dopt(c: &mut Criterion) {
    let mut group = c.benchmark_group("doe");
    group.sample_size(10);
    for nx in [3, 5] {
        let levels: Vec<Array1<f64>> = (0..nx).map(|_| Array1::linspace(0., 1., 4)).collect();
        let candidates = expand_grid(&levels).unwrap();
        group.bench_function(format!("dopt-{nx}-factors"), |b| {
            b.iter(|| {
                std::hint::black_box(
                    DOptimal::new(&candidates, 2 * (nx + 1))
                        .unwrap()
                        .with_rng(Xoshiro256Plus::seed_from_u64(42))
                        .select()
                        .unwrap(),
                )
            });
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_lhs, criterion_dopt);
criterion_main!(benches);
