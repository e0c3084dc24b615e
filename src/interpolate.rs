//! Interpolation between flame systems.
//!
//! The input element's children are treated as an ordered list of
//! endpoints sharing one variation declaration; every consecutive pair
//! yields `count` in-between elements at `t = k/count`, lerping each
//! corresponding flame's affine (through the transform arithmetic),
//! blend vector, and color, plus the endpoint statistics when both
//! sides carry them.

use crate::error::Error;
use crate::model::{Element, Flame, Stat};
use crate::variation::Varia;

pub struct Interpolate {
    pub count: usize,
}

impl Interpolate {
    pub fn run(&self, element: &Element) -> Result<Element, Error> {
        let endpoints = &element.children;
        let first = endpoints.first().ok_or(Error::NoChildren)?;
        let varias = first.varias.clone();
        let mut parent = Element::new();
        for pair in endpoints.windows(2) {
            self.between(&mut parent, &varias, &pair[0], &pair[1]);
        }
        Ok(parent)
    }

    fn between(&self, parent: &mut Element, varias: &[Varia], from: &Element, to: &Element) {
        for k in 0..self.count {
            let t = k as f64 / self.count as f64;
            let flames = from
                .flames
                .iter()
                .zip(to.flames.iter())
                .map(|(start, goal)| lerp_flame(t, start, goal))
                .collect();
            let mut child = Element::with_parts(varias.to_vec(), flames, vec![]);
            child.stat = lerp_stat(t, from.stat.as_ref(), to.stat.as_ref());
            parent.add(child);
        }
    }
}

fn lerp_flame(t: f64, start: &Flame, goal: &Flame) -> Flame {
    let delta = &goal.affine - &start.affine;
    let affine = &start.affine + &(t * &delta);
    let blend = start
        .blend
        .iter()
        .zip(goal.blend.iter())
        .map(|(s, g)| s + t * (g - s))
        .collect();
    let color = start.color + t * (goal.color - start.color);
    Flame {
        affine,
        blend,
        color,
    }
}

fn lerp_stat(t: f64, from: Option<&Stat>, to: Option<&Stat>) -> Option<Stat> {
    match (from, to) {
        (Some(start), Some(goal)) => Some(start.lerp(goal, t)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affine::{Affine, Matrix};
    use crate::span::Span;
    use crate::variation::Varia;

    fn endpoint(a: f64, color: f64) -> Element {
        let mut e = Element::new();
        e.varias = vec![Varia::named("Linear")];
        e.flames = vec![Flame {
            affine: Affine::Matrix(Matrix::new(a, 0.0, 0.0, 1.0, 0.0, 0.0)),
            blend: vec![1.0],
            color,
        }];
        e
    }

    fn parent_with(children: Vec<Element>) -> Element {
        let mut root = Element::new();
        root.children = children;
        root
    }

    #[test]
    fn t_zero_reproduces_the_start() {
        let root = parent_with(vec![endpoint(1.0, 0.0), endpoint(3.0, 1.0)]);
        let out = Interpolate { count: 4 }.run(&root).unwrap();
        assert_eq!(out.children.len(), 4);
        let first = &out.children[0];
        assert_eq!(first.flames[0].affine.flatten().a, 1.0);
        assert_eq!(first.flames[0].color, 0.0);
    }

    #[test]
    fn late_steps_approach_the_goal() {
        let root = parent_with(vec![endpoint(1.0, 0.0), endpoint(3.0, 1.0)]);
        let count = 100;
        let out = Interpolate { count }.run(&root).unwrap();
        let last = &out.children[count - 1];
        let a = last.flames[0].affine.flatten().a;
        assert!((a - 3.0).abs() < 0.05);
        assert!((last.flames[0].color - 1.0).abs() < 0.05);
    }

    #[test]
    fn like_variants_interpolate_in_their_own_terms() {
        let mut from = Element::new();
        from.varias = vec![Varia::named("Linear")];
        from.flames = vec![Flame {
            affine: Affine::Rotation { angle: 0.0 },
            blend: vec![1.0],
            color: 0.0,
        }];
        let mut to = from.clone();
        to.flames[0].affine = Affine::Rotation { angle: 1.0 };
        let root = parent_with(vec![from, to]);
        let out = Interpolate { count: 2 }.run(&root).unwrap();
        assert_eq!(
            out.children[1].flames[0].affine,
            Affine::Rotation { angle: 0.5 }
        );
    }

    #[test]
    fn stats_lerp_only_when_both_endpoints_have_them() {
        let mut a = endpoint(1.0, 0.0);
        a.stat = Some(Stat {
            x: Span::new(0.0, 1.0),
            y: Span::new(0.0, 1.0),
            v: Span::new(0.0, 1.0),
        });
        let b = endpoint(2.0, 1.0);
        let root = parent_with(vec![a, b]);
        let out = Interpolate { count: 2 }.run(&root).unwrap();
        assert!(out.children[0].stat.is_none());

        let mut a2 = endpoint(1.0, 0.0);
        a2.stat = Some(Stat {
            x: Span::new(0.0, 1.0),
            y: Span::new(0.0, 1.0),
            v: Span::new(0.0, 1.0),
        });
        let mut b2 = endpoint(2.0, 1.0);
        b2.stat = Some(Stat {
            x: Span::new(1.0, 3.0),
            y: Span::new(0.0, 1.0),
            v: Span::new(0.0, 1.0),
        });
        let root2 = parent_with(vec![a2, b2]);
        let out2 = Interpolate { count: 2 }.run(&root2).unwrap();
        let mid = out2.children[1].stat.unwrap();
        assert!((mid.x.min - 0.5).abs() < 1e-12);
        assert!((mid.x.max - 2.0).abs() < 1e-12);
    }

    #[test]
    fn no_children_is_an_error() {
        assert!(Interpolate { count: 4 }.run(&Element::new()).is_err());
    }

    #[test]
    fn generated_children_share_the_first_declaration() {
        let root = parent_with(vec![endpoint(1.0, 0.0), endpoint(2.0, 1.0)]);
        let out = Interpolate { count: 3 }.run(&root).unwrap();
        for child in &out.children {
            assert_eq!(child.varias, vec![Varia::named("Linear")]);
        }
    }
}
