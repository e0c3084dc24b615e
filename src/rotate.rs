//! Rotation sweeps.
//!
//! Produces `count` copies of an element, the i-th with `2π·i/count`
//! added to every Rotation node in every flame's transform tree.  Only
//! the angular degrees of freedom move: translations, scales, skews,
//! and raw matrices pass through untouched, and composites recurse
//! into their members.

use std::f64::consts::PI;

use crate::affine::Affine;
use crate::error::Error;
use crate::model::{Element, Flame};

pub struct Rotate {
    pub count: usize,
}

impl Rotate {
    pub fn run(&self, element: &Element) -> Result<Element, Error> {
        if element.is_invalid() {
            return Err(Error::EmptyElement);
        }
        let delta = 2.0 * PI / self.count as f64;
        let mut parent = Element::new();
        for i in 0..self.count {
            let mut child = rotated_element(element, delta * i as f64);
            child.stat = element.stat;
            parent.add(child);
        }
        Ok(parent)
    }
}

fn rotated_element(elt: &Element, delta: f64) -> Element {
    let flames = elt
        .flames
        .iter()
        .map(|f| rotated_flame(f, delta))
        .collect();
    Element::with_parts(elt.varias.clone(), flames, elt.children.clone())
}

fn rotated_flame(flame: &Flame, delta: f64) -> Flame {
    Flame {
        affine: rotated_affine(&flame.affine, delta),
        blend: flame.blend.clone(),
        color: flame.color,
    }
}

/// Add `delta` to Rotation nodes only, recursing through composites.
pub fn rotated_affine(affine: &Affine, delta: f64) -> Affine {
    match affine {
        Affine::Rotation { angle } => Affine::Rotation {
            angle: angle + delta,
        },
        Affine::Composite(members) => Affine::Composite(
            members.iter().map(|m| rotated_affine(m, delta)).collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variation::Varia;

    fn sample_element() -> Element {
        let mut e = Element::new();
        e.varias = vec![Varia::named("Linear")];
        e.flames = vec![Flame {
            affine: Affine::Composite(vec![
                Affine::Rotation { angle: 0.5 },
                Affine::Translation { tx: 1.0, ty: 2.0 },
            ]),
            blend: vec![1.0],
            color: 0.3,
        }];
        e
    }

    #[test]
    fn zero_delta_changes_nothing() {
        let e = sample_element();
        let rotated = rotated_element(&e, 0.0);
        assert_eq!(rotated.flames, e.flames);
    }

    #[test]
    fn only_rotation_nodes_move() {
        let e = sample_element();
        let rotated = rotated_element(&e, 1.0);
        match &rotated.flames[0].affine {
            Affine::Composite(members) => {
                assert_eq!(members[0], Affine::Rotation { angle: 1.5 });
                assert_eq!(members[1], Affine::Translation { tx: 1.0, ty: 2.0 });
            }
            other => panic!("expected composite, got {:?}", other),
        }
    }

    #[test]
    fn run_spreads_deltas_over_the_full_circle() {
        let e = sample_element();
        let out = Rotate { count: 4 }.run(&e).unwrap();
        assert_eq!(out.children.len(), 4);
        let angles: Vec<f64> = out
            .children
            .iter()
            .map(|c| match &c.flames[0].affine {
                Affine::Composite(m) => match m[0] {
                    Affine::Rotation { angle } => angle,
                    _ => panic!("rotation expected"),
                },
                _ => panic!("composite expected"),
            })
            .collect();
        assert!((angles[0] - 0.5).abs() < 1e-12);
        assert!((angles[1] - (0.5 + PI / 2.0)).abs() < 1e-12);
        assert!((angles[3] - (0.5 + 3.0 * PI / 2.0)).abs() < 1e-12);
    }

    #[test]
    fn matrices_pass_through_unchanged() {
        use crate::affine::Matrix;
        let m = Affine::Matrix(Matrix::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0));
        assert_eq!(rotated_affine(&m, 1.0), m);
    }

    #[test]
    fn flameless_input_is_an_error() {
        assert!(Rotate { count: 4 }.run(&Element::new()).is_err());
    }
}
