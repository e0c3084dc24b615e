//! The element tree: the persistent document structure holding flame
//! declarations, nested children, and cached statistics.

use crate::span::{PointSpan, Span};
use crate::system::{BlendedVar, FlameSystem, FlameTerm};
use crate::affine::Affine;
use crate::variation::{Varia, Variation};

/// Cached run statistics: point x/y spans and velocity-magnitude span.
/// Persisting one on an element lets later renders frame themselves
/// without re-sampling.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Stat {
    pub x: Span,
    pub y: Span,
    pub v: Span,
}

impl Stat {
    pub fn lerp(&self, other: &Stat, t: f64) -> Stat {
        Stat {
            x: self.x.lerp(&other.x, t),
            y: self.y.lerp(&other.y, t),
            v: self.v.lerp(&other.v, t),
        }
    }
}

/// One term of the iterated function system as declared: an affine
/// transform, per-variation blend weights, and a color coordinate.
#[derive(Clone, Debug, PartialEq)]
pub struct Flame {
    pub affine: Affine,
    pub blend: Vec<f64>,
    pub color: f64,
}

impl Flame {
    pub fn new() -> Flame {
        Flame {
            affine: Affine::identity(),
            blend: vec![],
            color: 0.0,
        }
    }

    fn term(&self, vars: &[Variation]) -> FlameTerm {
        let m = self.affine.flatten();
        let blend = self
            .blend
            .iter()
            .zip(vars.iter())
            .map(|(&w, v)| BlendedVar {
                weight: w,
                var: v.create(&m),
            })
            .collect();
        FlameTerm {
            affine: m,
            blend,
            color: self.color,
        }
    }
}

impl Default for Flame {
    fn default() -> Self {
        Flame::new()
    }
}

/// A document node.  Children are owned top-down; a node is valid when
/// it declares at least one flame, and declaration-less nodes are
/// allowed as grouping containers.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub varias: Vec<Varia>,
    pub flames: Vec<Flame>,
    pub children: Vec<Element>,
    pub title: Option<String>,
    pub stat: Option<Stat>,
}

impl Element {
    pub fn new() -> Element {
        Element {
            varias: vec![],
            flames: vec![],
            children: vec![],
            title: None,
            stat: None,
        }
    }

    pub fn with_parts(varias: Vec<Varia>, flames: Vec<Flame>, children: Vec<Element>) -> Element {
        Element {
            varias,
            flames,
            children,
            title: None,
            stat: None,
        }
    }

    pub fn add(&mut self, child: Element) {
        self.children.push(child);
    }

    pub fn is_invalid(&self) -> bool {
        self.flames.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        !self.is_invalid()
    }

    /// Depth-first walk; the callback receives each node with its depth
    /// and its index among its siblings (the root counts as 0/0).
    pub fn traverse<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(&'a Element, usize, usize),
    {
        Element::walk(self, 0, 0, f);
    }

    fn walk<'a, F>(elt: &'a Element, depth: usize, number: usize, f: &mut F)
    where
        F: FnMut(&'a Element, usize, usize),
    {
        f(elt, depth, number);
        for (i, child) in elt.children.iter().enumerate() {
            Element::walk(child, depth + 1, i, f);
        }
    }

    /// The tree's only valid element, if there is exactly one.
    pub fn singular(&self) -> Option<&Element> {
        let mut found: Option<&Element> = None;
        let mut dup = false;
        self.traverse(&mut |elt, _, _| {
            if elt.is_valid() {
                if found.is_some() {
                    dup = true;
                } else {
                    found = Some(elt);
                }
            }
        });
        if dup {
            None
        } else {
            found
        }
    }

    /// Point range from the cached stat, defaulting to the unit square
    /// [-1, 1] x [-1, 1] when no statistics were recorded.
    pub fn point_span(&self) -> PointSpan {
        match self.stat {
            Some(s) => PointSpan::new(s.x, s.y),
            None => PointSpan::new(Span::new(-1.0, 1.0), Span::new(-1.0, 1.0)),
        }
    }

    /// Velocity range from the cached stat, defaulting to [0, 1].
    pub fn velocity_span(&self) -> Span {
        match self.stat {
            Some(s) => s.v,
            None => Span::new(0.0, 1.0),
        }
    }

    /// Build the runnable system: resolve the declared variations
    /// (silently dropping unresolvable names) and instantiate each one
    /// against each flame's flattened affine matrix.
    pub fn flame_system(&self) -> FlameSystem {
        let vars: Vec<Variation> = self.varias.iter().filter_map(|v| v.resolve()).collect();
        let flames = self.flames.iter().map(|fl| fl.term(&vars)).collect();
        FlameSystem {
            variations: vars,
            flames,
        }
    }
}

impl Default for Element {
    fn default() -> Self {
        Element::new()
    }
}
