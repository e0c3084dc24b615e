use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use flamegen::affine::Matrix;
use flamegen::stats::CoverageCollector;
use flamegen::system::{BlendedVar, EmptyProgress, FlameSystem, FlameTerm};
use flamegen::variation::{Params, Variation};

fn spherical_pair() -> FlameSystem {
    let v = Variation::from_name("Spherical", &Params::new()).unwrap();
    let a1 = Matrix::new(0.70, -0.14, -0.61, -0.05, 0.17, 0.73);
    let a2 = Matrix::new(-0.58, 0.25, -0.38, -0.08, -0.29, 0.40);
    FlameSystem {
        variations: vec![Variation::Spherical],
        flames: vec![
            FlameTerm {
                affine: a1,
                blend: vec![BlendedVar {
                    weight: 1.0,
                    var: v.create(&a1),
                }],
                color: 0.0,
            },
            FlameTerm {
                affine: a2,
                blend: vec![BlendedVar {
                    weight: 1.0,
                    var: v.create(&a2),
                }],
                color: 1.0,
            },
        ],
    }
}

fn bench_draw(c: &mut Criterion) {
    let sys = spherical_pair();
    let screen = Matrix::scaling(32.0, 32.0).then(&Matrix::translation(32.0, 32.0));
    c.bench_function("draw 10k spherical into coverage", move |b| {
        b.iter(|| {
            let mut cover = CoverageCollector::new(64, 64, screen);
            let mut progress = EmptyProgress;
            let mut rng = StdRng::seed_from_u64(1);
            sys.draw(10_000, &mut cover, &mut progress, &mut rng)
        })
    });
}

criterion_group!(benches, bench_draw);
criterion_main!(benches);
