//! Random exploration of flame-parameter space.
//!
//! Candidates come from one of two generators: a count-based one that
//! invents whole parameter sets from scratch, and a perturbation-based
//! one that jitters a reference element.  Each candidate is scored by
//! running the chaos game twice: once into a span collector to learn
//! where the attractor lives, then into a coverage grid framed by that
//! span.  Candidates whose coverage ratio beats the threshold are kept;
//! the threshold halves after too many consecutive rejections so a
//! search always terminates.

use rand::{Rng, RngCore};
use std::f64::consts::PI;

use crate::affine::{Affine, Matrix};
use crate::error::Error;
use crate::model::{Element, Flame};
use crate::stats::{CoverageCollector, SpanCollector};
use crate::system::Progress;

/// Produces a full candidate flame list.
pub trait FlameGenerator {
    fn random_flames(&self, rng: &mut dyn RngCore) -> Vec<Flame>;
}

/// Invents `flames` flames against `varias` variations: each gets a
/// random skew/rotation/scale/translation composite (in that order), a
/// normalized random blend vector, and a color evenly spaced across
/// [0, 1] by index.
pub struct CountGenerator {
    pub flames: usize,
    pub varias: usize,
}

impl FlameGenerator for CountGenerator {
    fn random_flames(&self, rng: &mut dyn RngCore) -> Vec<Flame> {
        let dc = 1.0 / (self.flames.max(2) - 1) as f64;
        (0..self.flames)
            .map(|i| {
                let skw = Affine::Skew {
                    skx: rng.gen_range(-1.0, 1.0),
                    sky: rng.gen_range(-1.0, 1.0),
                };
                let rot = Affine::Rotation {
                    angle: rng.gen_range(-PI, PI),
                };
                let scl = Affine::Scale {
                    sx: rng.gen_range(-1.0, 1.0),
                    sy: rng.gen_range(-1.0, 1.0),
                };
                let tr = Affine::Translation {
                    tx: rng.gen_range(-1.0, 1.0),
                    ty: rng.gen_range(-1.0, 1.0),
                };
                let blend: Vec<f64> =
                    (0..self.varias).map(|_| rng.gen_range(0.0, 1.0)).collect();
                Flame {
                    affine: Affine::Composite(vec![skw, rot, scl, tr]),
                    blend: normalized(&blend),
                    color: i as f64 * dc,
                }
            })
            .collect()
    }
}

/// Jitters each flattened affine coefficient and each blend weight of a
/// reference element by uniform noise in [-0.1, 0.1); colors are kept.
pub struct PerturbGenerator<'a> {
    pub base: &'a Element,
}

impl<'a> FlameGenerator for PerturbGenerator<'a> {
    fn random_flames(&self, rng: &mut dyn RngCore) -> Vec<Flame> {
        self.base
            .flames
            .iter()
            .map(|flame| {
                let m = flame.affine.flatten();
                let jittered = Matrix::new(
                    m.a + rng.gen_range(-0.1, 0.1),
                    m.b + rng.gen_range(-0.1, 0.1),
                    m.c + rng.gen_range(-0.1, 0.1),
                    m.d + rng.gen_range(-0.1, 0.1),
                    m.tx + rng.gen_range(-0.1, 0.1),
                    m.ty + rng.gen_range(-0.1, 0.1),
                );
                // Unlike the count generator, the jittered blend is not
                // renormalized; the drift is part of the exploration.
                let blend: Vec<f64> = flame
                    .blend
                    .iter()
                    .map(|b| b + rng.gen_range(-0.1, 0.1))
                    .collect();
                Flame {
                    affine: Affine::Matrix(jittered),
                    blend,
                    color: flame.color,
                }
            })
            .collect()
    }
}

fn normalized(v: &[f64]) -> Vec<f64> {
    let total: f64 = v.iter().sum();
    v.iter().map(|x| x / total).collect()
}

/// Search configuration; `run` appends accepted candidates to a fresh
/// parent element until `count` of them are found.
pub struct RandomSearch {
    pub count: usize,
    pub threshold: f64,
    pub concession: usize,
    pub iterations: usize,
    pub width: usize,
    pub height: usize,
    pub scale: f64,
    pub use_base: bool,
}

impl RandomSearch {
    pub fn run(
        &self,
        reference: &Element,
        rng: &mut dyn RngCore,
        image_progress: &mut dyn Progress,
        count_progress: &mut dyn Progress,
    ) -> Result<Element, Error> {
        if reference.is_invalid() {
            return Err(Error::EmptyElement);
        }
        let half_w = self.width as f64 / 2.0;
        let half_h = self.height as f64 / 2.0;
        let at2 = Matrix::scaling(self.scale, self.scale)
            .then(&Matrix::scaling(half_w, half_h))
            .then(&Matrix::translation(half_w, half_h));

        let count_gen;
        let base_gen;
        let generator: &dyn FlameGenerator = if self.use_base {
            base_gen = PerturbGenerator { base: reference };
            &base_gen
        } else {
            count_gen = CountGenerator {
                flames: reference.flames.len(),
                varias: reference.varias.len(),
            };
            &count_gen
        };

        let mut parent = Element::new();
        let mut found = 0;
        let mut failed = 0;
        let mut threshold = self.threshold;
        count_progress.begin();
        while found < self.count {
            let flames = generator.random_flames(rng);
            let mut elt = Element::with_parts(reference.varias.clone(), flames, vec![]);
            let sys = elt.flame_system();

            let mut stat = SpanCollector::new();
            if !sys.draw(self.iterations, &mut stat, image_progress, rng) {
                // overflow: the candidate is unusable, but it does not
                // count against the concession budget
                tracing::debug!("candidate overflowed, discarding");
                continue;
            }
            let at1 = stat.point.framing();
            let mut cover = CoverageCollector::new(self.width, self.height, at1.then(&at2));
            let succeeded = sys.draw(self.iterations, &mut cover, image_progress, rng);
            if !succeeded {
                tracing::debug!("candidate overflowed on the coverage pass, discarding");
                continue;
            }
            let ratio = cover.ratio();
            if ratio > threshold {
                tracing::debug!(ratio, threshold, "good candidate");
                elt.title = Some(format!("{:04}", found));
                elt.stat = Some(stat.node());
                parent.add(elt);
                found += 1;
                count_progress.progress(found as f64 / self.count as f64);
                failed = 0;
            } else {
                tracing::debug!(ratio, threshold, "bad candidate");
                failed += 1;
                if failed > self.concession {
                    failed = 0;
                    threshold *= 0.5;
                    tracing::debug!(threshold, "conceding, threshold halved");
                }
            }
        }
        count_progress.end();
        Ok(parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::EmptyProgress;
    use crate::variation::Varia;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn stable_reference() -> Element {
        let mut e = Element::new();
        e.varias = vec![Varia::named("Spherical")];
        e.flames = vec![
            Flame {
                affine: Affine::Matrix(Matrix::new(0.70, -0.14, -0.61, -0.05, 0.17, 0.73)),
                blend: vec![1.0],
                color: 0.0,
            },
            Flame {
                affine: Affine::Matrix(Matrix::new(-0.58, 0.25, -0.38, -0.08, -0.29, 0.40)),
                blend: vec![1.0],
                color: 1.0,
            },
        ];
        e
    }

    #[test]
    fn count_generator_shapes_its_candidates() {
        let gen = CountGenerator {
            flames: 3,
            varias: 2,
        };
        let mut rng = StdRng::seed_from_u64(11);
        let flames = gen.random_flames(&mut rng);
        assert_eq!(flames.len(), 3);
        // colors are evenly spaced across [0, 1]
        assert!((flames[0].color - 0.0).abs() < 1e-12);
        assert!((flames[1].color - 0.5).abs() < 1e-12);
        assert!((flames[2].color - 1.0).abs() < 1e-12);
        for flame in &flames {
            // blend normalizes to 1
            let sum: f64 = flame.blend.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9);
            // composite order is skew, rotation, scale, translation
            match &flame.affine {
                Affine::Composite(members) => {
                    assert_eq!(members.len(), 4);
                    assert!(matches!(members[0], Affine::Skew { .. }));
                    assert!(matches!(members[1], Affine::Rotation { .. }));
                    assert!(matches!(members[2], Affine::Scale { .. }));
                    assert!(matches!(members[3], Affine::Translation { .. }));
                }
                other => panic!("expected composite, got {:?}", other),
            }
        }
    }

    #[test]
    fn perturb_generator_jitters_without_renormalizing() {
        let base = stable_reference();
        let gen = PerturbGenerator { base: &base };
        let mut rng = StdRng::seed_from_u64(21);
        let flames = gen.random_flames(&mut rng);
        assert_eq!(flames.len(), 2);
        for (flame, orig) in flames.iter().zip(base.flames.iter()) {
            let m = flame.affine.flatten();
            let o = orig.affine.flatten();
            for (got, was) in [
                (m.a, o.a),
                (m.b, o.b),
                (m.c, o.c),
                (m.d, o.d),
                (m.tx, o.tx),
                (m.ty, o.ty),
            ]
            .iter()
            {
                assert!((got - was).abs() < 0.1);
            }
            for (b, ob) in flame.blend.iter().zip(orig.blend.iter()) {
                assert!((b - ob).abs() < 0.1);
            }
            // color is carried over untouched
            assert_eq!(flame.color, orig.color);
        }
    }

    #[test]
    fn search_rejects_a_flameless_reference() {
        let search = RandomSearch {
            count: 1,
            threshold: 0.1,
            concession: 10,
            iterations: 100,
            width: 16,
            height: 16,
            scale: 1.0,
            use_base: false,
        };
        let mut rng = StdRng::seed_from_u64(1);
        let mut p1 = EmptyProgress;
        let mut p2 = EmptyProgress;
        let result = search.run(&Element::new(), &mut rng, &mut p1, &mut p2);
        assert!(result.is_err());
    }

    #[test]
    fn search_accepts_candidates_near_a_stable_reference() {
        let reference = stable_reference();
        let search = RandomSearch {
            count: 2,
            threshold: 0.0,
            concession: 5,
            iterations: 500,
            width: 32,
            height: 32,
            scale: 1.0,
            use_base: true,
        };
        let mut rng = StdRng::seed_from_u64(7);
        let mut p1 = EmptyProgress;
        let mut p2 = EmptyProgress;
        let parent = search
            .run(&reference, &mut rng, &mut p1, &mut p2)
            .expect("search completes");
        assert_eq!(parent.children.len(), 2);
        assert_eq!(parent.children[0].title.as_deref(), Some("0000"));
        assert_eq!(parent.children[1].title.as_deref(), Some("0001"));
        for child in &parent.children {
            assert!(child.stat.is_some());
            assert_eq!(child.varias.len(), 1);
            assert_eq!(child.flames.len(), 2);
        }
    }
}
