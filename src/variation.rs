// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The variation function library.
//!
//! A variation is a nonlinear point-to-point map composed with a
//! flame's affine transform.  The library carries the 49 documented
//! variations: most are pure closed forms, a handful read coefficients
//! of the enclosing affine matrix ("dependent" variations), and a
//! handful draw fresh randomness on every evaluation (marked
//! non-continuous, since interpolating them makes no sense).
//!
//! Names resolve through a two-tier registry: zero-parameter names
//! resolve only when the declaration carries no parameters, parametric
//! names only when it carries at least one.  Anything else is reported
//! as unresolvable and the caller drops it.
//!
//! Two inequivalent angle conventions appear below: `theta` is
//! `atan2(x, y)` and `phi` is `atan2(y, x)`.  Each published formula
//! fixes its own; they are reproduced per variation, not unified.

use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::fmt;

use rand::{Rng, RngCore};

use crate::affine::Matrix;
use crate::geom::Point;

/// An instantiated variation: a point map that may consume randomness.
pub type VarFn = Box<dyn Fn(Point, &mut dyn RngCore) -> Point>;

/// Named float parameters attached to a variation declaration.  Keys
/// are unique and iterate in sorted order.  Any key a formula asks for
/// that the bag does not hold reads as 1.0.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Params {
    values: BTreeMap<String, f64>,
}

impl Params {
    pub fn new() -> Params {
        Params::default()
    }

    pub fn from_pairs(pairs: &[(&str, f64)]) -> Params {
        let mut p = Params::new();
        for &(k, v) in pairs {
            p.insert(k, v);
        }
        p
    }

    pub fn insert(&mut self, key: &str, value: f64) {
        self.values.insert(key.to_string(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, key: &str) -> f64 {
        self.values.get(key).cloned().unwrap_or(1.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// A variation declaration as it appears in a flame document: a name
/// plus an optional parameter bag.  Resolution may fail; the enclosing
/// system simply proceeds without the instance.
#[derive(Clone, Debug, PartialEq)]
pub struct Varia {
    pub name: String,
    pub params: Params,
}

impl Varia {
    pub fn named(name: &str) -> Varia {
        Varia {
            name: name.to_string(),
            params: Params::new(),
        }
    }

    pub fn with_params(name: &str, pairs: &[(&str, f64)]) -> Varia {
        Varia {
            name: name.to_string(),
            params: Params::from_pairs(pairs),
        }
    }

    pub fn resolve(&self) -> Option<Variation> {
        Variation::from_name(&self.name, &self.params)
    }
}

/// One of the 49 documented variation kinds.  Parametric kinds carry
/// their parameters; stochastic kinds report `continuous() == false`.
#[derive(Clone, Debug, PartialEq)]
pub enum Variation {
    Linear,
    Sinusoidal,
    Spherical,
    Swirl,
    Horseshoe,
    Polar,
    Handkerchief,
    Heart,
    Disc,
    Spiral,
    Hyperbolic,
    Diamond,
    Ex,
    Julia,
    Bent,
    Waves,
    Fisheye,
    Popcorn,
    Exponential,
    Power,
    Cosine,
    Rings,
    Fan,
    Eyefish,
    Bubble,
    Cylinder,
    Noise,
    Blur,
    Gaussian,
    Tangent,
    Square,
    Cross,
    Blob { high: f64, low: f64, waves: f64 },
    Pdj { a: f64, b: f64, c: f64, d: f64 },
    Fan2 { x: f64, y: f64 },
    Rings2 { val: f64 },
    Perspective { angle: f64, dist: f64 },
    JuliaN { power: f64, dist: f64 },
    JuliaScope { power: f64, dist: f64 },
    RadialBlur { angle: f64, dist: f64 },
    Pie { slices: f64, rotation: f64, thickness: f64 },
    Ngon { power: f64, sides: f64, corners: f64, circle: f64 },
    Curl { c1: f64, c2: f64 },
    Rectangles { x: f64, y: f64 },
    Arch { amount: f64 },
    Rays { amount: f64 },
    Blade { amount: f64 },
    Secant { amount: f64 },
    Twintrian { amount: f64 },
}

impl Variation {
    /// Resolve a declared name.  An empty bag selects the
    /// zero-parameter tier, a non-empty bag the parametric tier;
    /// a name in the wrong tier (or unknown) resolves to nothing.
    pub fn from_name(name: &str, params: &Params) -> Option<Variation> {
        if params.is_empty() {
            Variation::simple(name)
        } else {
            Variation::parametric(name, params)
        }
    }

    fn simple(name: &str) -> Option<Variation> {
        use self::Variation::*;
        Some(match name {
            "Linear" => Linear,
            "Sinusoidal" => Sinusoidal,
            "Spherical" => Spherical,
            "Swirl" => Swirl,
            "Horseshoe" => Horseshoe,
            "Polar" => Polar,
            "Handkerchief" => Handkerchief,
            "Heart" => Heart,
            "Disc" => Disc,
            "Spiral" => Spiral,
            "Hyperbolic" => Hyperbolic,
            "Diamond" => Diamond,
            "Ex" => Ex,
            "Julia" => Julia,
            "Bent" => Bent,
            "Waves" => Waves,
            "Fisheye" => Fisheye,
            "Popcorn" => Popcorn,
            "Exponential" => Exponential,
            "Power" => Power,
            "Cosine" => Cosine,
            "Rings" => Rings,
            "Fan" => Fan,
            "Eyefish" => Eyefish,
            "Bubble" => Bubble,
            "Cylinder" => Cylinder,
            "Noise" => Noise,
            "Blur" => Blur,
            "Gaussian" => Gaussian,
            "Tangent" => Tangent,
            "Square" => Square,
            "Cross" => Cross,
            _ => return None,
        })
    }

    fn parametric(name: &str, o: &Params) -> Option<Variation> {
        use self::Variation::*;
        Some(match name {
            "Blob" => Blob {
                high: o.get("high"),
                low: o.get("low"),
                waves: o.get("waves"),
            },
            "PDJ" => Pdj {
                a: o.get("a"),
                b: o.get("b"),
                c: o.get("c"),
                d: o.get("d"),
            },
            "Fan2" => Fan2 {
                x: o.get("x"),
                y: o.get("y"),
            },
            "Rings2" => Rings2 {
                val: o.get("rings2"),
            },
            "Perspective" => Perspective {
                angle: o.get("angle"),
                dist: o.get("dist"),
            },
            "JuliaN" => JuliaN {
                power: o.get("power"),
                dist: o.get("dist"),
            },
            "JuliaScope" => JuliaScope {
                power: o.get("power"),
                dist: o.get("dist"),
            },
            "RadialBlur" => RadialBlur {
                angle: o.get("angle"),
                dist: o.get("dist"),
            },
            "Pie" => Pie {
                slices: o.get("slices"),
                rotation: o.get("rotation"),
                thickness: o.get("thickness"),
            },
            "Ngon" => Ngon {
                power: o.get("power"),
                sides: o.get("sides"),
                corners: o.get("corners"),
                circle: o.get("circle"),
            },
            "Curl" => Curl {
                c1: o.get("c1"),
                c2: o.get("c2"),
            },
            "Rectangles" => Rectangles {
                x: o.get("x"),
                y: o.get("y"),
            },
            "Arch" => Arch {
                amount: o.get("v41"),
            },
            "Rays" => Rays {
                amount: o.get("v44"),
            },
            "Blade" => Blade {
                amount: o.get("v45"),
            },
            "Secant" => Secant {
                amount: o.get("v46"),
            },
            "Twintrian" => Twintrian {
                amount: o.get("v47"),
            },
            _ => return None,
        })
    }

    /// False for the kinds that consume randomness per evaluation.
    pub fn continuous(&self) -> bool {
        use self::Variation::*;
        !matches!(
            self,
            Julia
                | Noise
                | JuliaN { .. }
                | JuliaScope { .. }
                | Blur
                | Gaussian
                | RadialBlur { .. }
                | Pie { .. }
                | Square
                | Arch { .. }
                | Rays { .. }
                | Blade { .. }
                | Twintrian { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        use self::Variation::*;
        match self {
            Linear => "Linear",
            Sinusoidal => "Sinusoidal",
            Spherical => "Spherical",
            Swirl => "Swirl",
            Horseshoe => "Horseshoe",
            Polar => "Polar",
            Handkerchief => "Handkerchief",
            Heart => "Heart",
            Disc => "Disc",
            Spiral => "Spiral",
            Hyperbolic => "Hyperbolic",
            Diamond => "Diamond",
            Ex => "Ex",
            Julia => "Julia",
            Bent => "Bent",
            Waves => "Waves",
            Fisheye => "Fisheye",
            Popcorn => "Popcorn",
            Exponential => "Exponential",
            Power => "Power",
            Cosine => "Cosine",
            Rings => "Rings",
            Fan => "Fan",
            Eyefish => "Eyefish",
            Bubble => "Bubble",
            Cylinder => "Cylinder",
            Noise => "Noise",
            Blur => "Blur",
            Gaussian => "Gaussian",
            Tangent => "Tangent",
            Square => "Square",
            Cross => "Cross",
            Blob { .. } => "Blob",
            Pdj { .. } => "PDJ",
            Fan2 { .. } => "Fan2",
            Rings2 { .. } => "Rings2",
            Perspective { .. } => "Perspective",
            JuliaN { .. } => "JuliaN",
            JuliaScope { .. } => "JuliaScope",
            RadialBlur { .. } => "RadialBlur",
            Pie { .. } => "Pie",
            Ngon { .. } => "Ngon",
            Curl { .. } => "Curl",
            Rectangles { .. } => "Rectangles",
            Arch { .. } => "Arch",
            Rays { .. } => "Rays",
            Blade { .. } => "Blade",
            Secant { .. } => "Secant",
            Twintrian { .. } => "Twintrian",
        }
    }

    /// Instantiate the point map against the enclosing flame's affine
    /// matrix.  Dependent kinds capture coefficients of `t` now; the
    /// returned closure owns everything it needs.
    pub fn create(&self, t: &Matrix) -> VarFn {
        use self::Variation::*;
        match *self {
            Linear => Box::new(|p, _| p),
            Sinusoidal => Box::new(|p, _| Point::new(p.x.sin(), p.y.sin())),
            Spherical => Box::new(|p, _| p / p.quadrance()),
            Swirl => Box::new(|p, _| {
                let r2 = p.quadrance();
                let (s, c) = (r2.sin(), r2.cos());
                Point::new(p.x * s - p.y * c, p.x * c + p.y * s)
            }),
            Horseshoe => Box::new(|p, _| {
                Point::new((p.x - p.y) * (p.x + p.y), 2.0 * p.x * p.y) / p.norm()
            }),
            Polar => Box::new(|p, _| Point::new(p.theta() / PI, p.norm() - 1.0)),
            Handkerchief => Box::new(|p, _| {
                let (r, th) = (p.norm(), p.theta());
                Point::new((th + r).sin(), (th - r).cos()) * r
            }),
            Heart => Box::new(|p, _| {
                let (r, th) = (p.norm(), p.theta());
                Point::new((th * r).sin(), -(th * r).cos()) * r
            }),
            Disc => Box::new(|p, _| {
                let (r, th) = (p.norm(), p.theta());
                Point::new((PI * r).sin(), (PI * r).cos()) * (th / PI)
            }),
            Spiral => Box::new(|p, _| {
                let (r, th) = (p.norm(), p.theta());
                Point::new(th.cos() + r.sin(), th.sin() - r.cos()) / r
            }),
            Hyperbolic => Box::new(|p, _| {
                let (r, th) = (p.norm(), p.theta());
                Point::new(th.sin() / r, th.cos() * r)
            }),
            Diamond => Box::new(|p, _| {
                let (r, th) = (p.norm(), p.theta());
                Point::new(th.sin() * r.cos(), th.cos() * r.sin())
            }),
            Ex => Box::new(|p, _| {
                let (r, th) = (p.norm(), p.theta());
                let (p0, p1) = ((th + r).sin(), (th - r).cos());
                let (p0c, p1c) = (p0 * p0 * p0, p1 * p1 * p1);
                Point::new(p0c + p1c, p0c - p1c) * r
            }),
            Julia => Box::new(|p, rng| {
                // omega is 0 or pi, chosen fresh per evaluation
                let omega = PI * rng.gen_range(0, 2) as f64;
                let (r, th) = (p.norm(), p.theta());
                Point::new((th / 2.0 + omega).cos(), (th / 2.0 + omega).sin()) * r.sqrt()
            }),
            Bent => Box::new(|p, _| {
                let (x, y) = (p.x, p.y);
                if x < 0.0 {
                    if y < 0.0 {
                        Point::new(2.0 * x, y / 2.0)
                    } else {
                        Point::new(2.0 * x, y)
                    }
                } else if y < 0.0 {
                    Point::new(x, y / 2.0)
                } else {
                    p
                }
            }),
            Waves => {
                let (b, c, e, f) = (t.c, t.tx, t.d, t.ty);
                let (c2, f2) = (c * c, f * f);
                Box::new(move |p, _| {
                    Point::new(p.x + b * (p.y / c2).sin(), p.y + e * (p.x / f2).sin())
                })
            }
            Fisheye => Box::new(|p, _| Point::new(p.y, p.x) * (2.0 / (p.norm() + 1.0))),
            Popcorn => {
                let (c, f) = (t.tx, t.ty);
                Box::new(move |p, _| {
                    Point::new(
                        p.x + c * (3.0 * p.y).tan().sin(),
                        p.y + f * (3.0 * p.x).tan().sin(),
                    )
                })
            }
            Exponential => Box::new(|p, _| {
                Point::new((PI * p.y).cos(), (PI * p.y).sin()) * (p.x - 1.0).exp()
            }),
            Power => Box::new(|p, _| {
                let (r, th) = (p.norm(), p.theta());
                Point::new(th.cos(), th.sin()) * r.powf(th.sin())
            }),
            Cosine => Box::new(|p, _| {
                Point::new(
                    (PI * p.x).cos() * p.y.cosh(),
                    -(PI * p.x).sin() * p.y.sinh(),
                )
            }),
            Rings => {
                let c2 = t.tx * t.tx;
                Box::new(move |p, _| {
                    let (r, th) = (p.norm(), p.theta());
                    let s = ieee_rem(r + c2, 2.0 * c2);
                    let u = c2 + r * (1.0 - c2);
                    Point::new(th.cos(), th.sin()) * (s - u)
                })
            }
            Fan => {
                let (c, f) = (t.tx, t.ty);
                Box::new(move |p, _| {
                    let u = PI * c * c;
                    let (r, th) = (p.norm(), p.theta());
                    if (th + f) % u > u / 2.0 {
                        Point::new((th - u / 2.0).cos(), (th - u / 2.0).sin()) * r
                    } else {
                        Point::new((th + u / 2.0).cos(), (th + u / 2.0).sin()) * r
                    }
                })
            }
            Eyefish => Box::new(|p, _| p * (2.0 / (p.norm() + 1.0))),
            Bubble => Box::new(|p, _| p * (4.0 / (p.quadrance() + 4.0))),
            Cylinder => Box::new(|p, _| Point::new(p.x.sin(), p.y)),
            Noise => Box::new(|p, rng| {
                let psi1: f64 = rng.gen_range(0.0, 1.0);
                let psi2: f64 = rng.gen_range(0.0, 1.0);
                Point::new(p.x * (2.0 * PI * psi2).cos(), p.y * (2.0 * PI * psi2).sin()) * psi1
            }),
            Blur => Box::new(|_, rng| {
                let psi1: f64 = rng.gen_range(0.0, 1.0);
                let psi2: f64 = rng.gen_range(0.0, 1.0);
                Point::new((2.0 * PI * psi2).cos(), (2.0 * PI * psi2).sin()) * psi1
            }),
            Gaussian => Box::new(|_, rng| {
                // four summed uniforms approximate a Gaussian
                let sum: f64 = (0..4).map(|_| rng.gen_range(0.0, 1.0)).sum();
                let psi5: f64 = rng.gen_range(0.0, 1.0);
                Point::new((2.0 * PI * psi5).cos(), (2.0 * PI * psi5).sin()) * (sum - 2.0)
            }),
            Tangent => Box::new(|p, _| Point::new(p.x.sin() / p.y.cos(), p.y.tan())),
            Square => Box::new(|_, rng| {
                let psi1: f64 = rng.gen_range(0.0, 1.0);
                let psi2: f64 = rng.gen_range(0.0, 1.0);
                Point::new(psi1 - 0.5, psi2 - 0.5)
            }),
            Cross => Box::new(|p, _| {
                let s = p.x * p.x - p.y * p.y;
                p * (1.0 / (s * s)).sqrt()
            }),
            Blob { high, low, waves } => Box::new(move |p, _| {
                let (r, th) = (p.norm(), p.theta());
                let q = r * (low + ((high - low) / 2.0) * ((waves * th).sin() + 1.0));
                Point::new(th.cos(), th.sin()) * q
            }),
            Pdj { a, b, c, d } => Box::new(move |p, _| {
                Point::new(
                    (a * p.y).sin() - (b * p.x).cos(),
                    (c * p.x).sin() - (d * p.y).cos(),
                )
            }),
            Fan2 { x, y } => Box::new(move |p, _| {
                let p1 = PI * x * x;
                let p2 = y;
                let (r, th) = (p.norm(), p.theta());
                let u = th + p2 - p1 * (2.0 * th * p2 / p1).trunc();
                if u > p1 / 2.0 {
                    Point::new((th - p1 / 2.0).sin(), (th - p1 / 2.0).cos()) * r
                } else {
                    Point::new((th + p1 / 2.0).sin(), (th + p1 / 2.0).cos()) * r
                }
            }),
            Rings2 { val } => Box::new(move |p, _| {
                let q = val * val;
                let (r, th) = (p.norm(), p.theta());
                let u = r - 2.0 * q * ((r + q) / (2.0 * q)).trunc() + r * (1.0 - q);
                Point::new(th.sin(), th.cos()) * u
            }),
            Perspective { angle, dist } => Box::new(move |p, _| {
                Point::new(p.x, p.y * angle.cos()) * (dist / (dist - p.y * angle.sin()))
            }),
            JuliaN { power, dist } => Box::new(move |p, rng| {
                let psi: f64 = rng.gen_range(0.0, 1.0);
                let p3 = (power.abs() * psi).trunc();
                let u = (p.phi() + 2.0 * PI * p3) / power;
                Point::new(u.cos(), u.sin()) * p.norm().powf(dist / power)
            }),
            JuliaScope { power, dist } => Box::new(move |p, rng| {
                // lambda is -1 or 1, psi uniform on [0, 1)
                let lambda = (rng.gen_range(0, 2) * 2 - 1) as f64;
                let psi: f64 = rng.gen_range(0.0, 1.0);
                let p3 = (power.abs() * psi).trunc();
                let u = (lambda * p.phi() + 2.0 * PI * p3) / power;
                Point::new(u.cos(), u.sin()) * p.norm().powf(dist / power)
            }),
            RadialBlur { angle, dist } => Box::new(move |p, rng| {
                let p1 = angle * (PI / 2.0);
                let sum: f64 = (0..4).map(|_| rng.gen_range(0.0, 1.0) - 2.0).sum();
                let t1 = dist * sum;
                let t2 = p.phi() + t1 * p1.sin();
                let t3 = t1 * p1.cos() - 1.0;
                let r = p.norm();
                Point::new(r * t2.cos() + t3 * p.x, r * t2.sin() + t3 * p.y) / dist
            }),
            Pie {
                slices,
                rotation,
                thickness,
            } => Box::new(move |_, rng| {
                let psi1: f64 = rng.gen_range(0.0, 1.0);
                let psi2: f64 = rng.gen_range(0.0, 1.0);
                let psi3: f64 = rng.gen_range(0.0, 1.0);
                let t1 = (psi1 * slices + 0.5).trunc();
                let t2 = rotation + (2.0 * PI / slices) * (t1 + psi2 * thickness);
                Point::new(t2.cos(), t2.sin()) * psi3
            }),
            Ngon {
                power,
                sides,
                corners,
                circle,
            } => Box::new(move |p, _| {
                let p2 = 2.0 * PI / sides;
                let phi = p.phi();
                let t3 = phi - p2 * (phi / p2).floor();
                let t4 = if t3 > p2 / 2.0 { t3 } else { t3 - p2 };
                let k = (corners * (1.0 / t4.cos() - 1.0) + circle) / p.norm().powf(power);
                p * k
            }),
            Curl { c1, c2 } => Box::new(move |p, _| {
                let (x, y) = (p.x, p.y);
                let t1 = 1.0 + c1 * x + c2 * (x * x - y * y);
                let t2 = c1 * y + 2.0 * c2 * x * y;
                Point::new(x * t1 + y * t2, y * t1 - x * t2) / (t1 * t1 + t2 * t2)
            }),
            Rectangles { x, y } => Box::new(move |p, _| {
                Point::new(
                    (2.0 * (p.x / x).floor() + 1.0) * x - p.x,
                    (2.0 * (p.y / y).floor() + 1.0) * y - p.y,
                )
            }),
            Arch { amount } => Box::new(move |_, rng| {
                let psi: f64 = rng.gen_range(0.0, 1.0);
                let s = (psi * PI * amount).sin();
                Point::new(s, s * s / (psi * PI * amount).cos())
            }),
            Rays { amount } => Box::new(move |p, rng| {
                let psi: f64 = rng.gen_range(0.0, 1.0);
                Point::new(p.x.cos(), p.y.sin())
                    * (amount * (psi * PI * amount).tan() / p.quadrance())
            }),
            Blade { amount } => Box::new(move |p, rng| {
                let psi: f64 = rng.gen_range(0.0, 1.0);
                let w = psi * p.norm() * amount;
                Point::new(w.cos() + w.sin(), w.cos() - w.sin()) * p.x
            }),
            Secant { amount } => Box::new(move |p, _| {
                Point::new(p.x, 1.0 / (amount * (amount * p.norm()).cos()))
            }),
            Twintrian { amount } => Box::new(move |p, rng| {
                let psi: f64 = rng.gen_range(0.0, 1.0);
                let w = psi * p.norm() * amount;
                let s = w.sin();
                let u = (s * s).log10() + w.cos();
                Point::new(u, u - PI * s) * p.x
            }),
        }
    }
}

impl fmt::Display for Variation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::Variation::*;
        match *self {
            Blob { high, low, waves } => {
                write!(f, "Blob(high:{:.2}, low:{:.2}, waves:{:.2})", high, low, waves)
            }
            Pdj { a, b, c, d } => {
                write!(f, "PDJ(a:{:.2}, b:{:.2}, c:{:.2}, d:{:.2})", a, b, c, d)
            }
            Fan2 { x, y } => write!(f, "Fan2(x:{:.2}, y:{:.2})", x, y),
            Rings2 { val } => write!(f, "Rings2(rings2:{:.2})", val),
            Perspective { angle, dist } => {
                write!(f, "Perspective(angle:{:.2}, dist:{:.2})", angle, dist)
            }
            JuliaN { power, dist } => write!(f, "JuliaN(power:{:.2}, dist:{:.2})", power, dist),
            JuliaScope { power, dist } => {
                write!(f, "JuliaScope(power:{:.2}, dist:{:.2})", power, dist)
            }
            RadialBlur { angle, dist } => {
                write!(f, "RadialBlur(angle:{:.2}, dist:{:.2})", angle, dist)
            }
            Pie {
                slices,
                rotation,
                thickness,
            } => write!(
                f,
                "Pie(slices:{:.2}, rotation:{:.2}, thickness:{:.2})",
                slices, rotation, thickness
            ),
            Ngon {
                power,
                sides,
                corners,
                circle,
            } => write!(
                f,
                "Ngon(power:{:.2}, sides:{:.2}, corners:{:.2}, circle:{:.2})",
                power, sides, corners, circle
            ),
            Curl { c1, c2 } => write!(f, "Curl(c1:{:.2}, c2:{:.2})", c1, c2),
            Rectangles { x, y } => write!(f, "Rectangles(x:{:.2}, y:{:.2})", x, y),
            Arch { amount } => write!(f, "Arch(v41:{:.2})", amount),
            Rays { amount } => write!(f, "Rays(v44:{:.2})", amount),
            Blade { amount } => write!(f, "Blade(v45:{:.2})", amount),
            Secant { amount } => write!(f, "Secant(v46:{:.2})", amount),
            Twintrian { amount } => write!(f, "Twintrian(v47:{:.2})", amount),
            _ => write!(f, "{}", self.name()),
        }
    }
}

/// IEEE-style remainder: distance to the nearest multiple of `y`.
fn ieee_rem(x: f64, y: f64) -> f64 {
    x - y * (x / y).round()
}

/// Every variation the tool knows, each with its customary parameter
/// defaults.  Drives the expand generator.
pub fn catalog() -> Vec<Varia> {
    vec![
        Varia::named("Linear"),
        Varia::named("Sinusoidal"),
        Varia::named("Spherical"),
        Varia::named("Swirl"),
        Varia::named("Horseshoe"),
        Varia::named("Polar"),
        Varia::named("Handkerchief"),
        Varia::named("Heart"),
        Varia::named("Disc"),
        Varia::named("Spiral"),
        Varia::named("Hyperbolic"),
        Varia::named("Diamond"),
        Varia::named("Ex"),
        Varia::named("Julia"),
        Varia::named("Bent"),
        Varia::named("Waves"),
        Varia::named("Fisheye"),
        Varia::named("Popcorn"),
        Varia::named("Exponential"),
        Varia::named("Power"),
        Varia::named("Cosine"),
        Varia::named("Rings"),
        Varia::named("Fan"),
        Varia::with_params("Blob", &[("high", 1.0), ("low", 0.5), ("waves", 5.0)]),
        Varia::with_params("PDJ", &[("a", 1.3), ("b", 1.7), ("c", 0.9), ("d", 1.8)]),
        Varia::with_params("Fan2", &[("x", 0.4), ("y", 0.5)]),
        Varia::with_params("Rings2", &[("rings2", 0.5)]),
        Varia::named("Eyefish"),
        Varia::named("Bubble"),
        Varia::named("Cylinder"),
        Varia::with_params("Perspective", &[("angle", 0.3), ("dist", 0.6)]),
        Varia::named("Noise"),
        Varia::with_params("JuliaN", &[("power", 3.0), ("dist", 0.8)]),
        Varia::with_params("JuliaScope", &[("power", 4.0), ("dist", 0.8)]),
        Varia::named("Blur"),
        Varia::named("Gaussian"),
        Varia::with_params("RadialBlur", &[("angle", 3.0), ("dist", 1.0)]),
        Varia::with_params(
            "Pie",
            &[("slices", 5.0), ("rotation", 0.3), ("thickness", 0.5)],
        ),
        Varia::with_params(
            "Ngon",
            &[("power", 2.0), ("sides", 5.0), ("corners", 0.1), ("circle", 0.7)],
        ),
        Varia::with_params("Curl", &[("c1", 0.1), ("c2", 0.8)]),
        Varia::with_params("Rectangles", &[("x", 0.3), ("y", 0.7)]),
        Varia::with_params("Arch", &[("v41", 1.0)]),
        Varia::named("Tangent"),
        Varia::named("Square"),
        Varia::with_params("Rays", &[("v44", 1.0)]),
        Varia::with_params("Blade", &[("v45", 1.0)]),
        Varia::with_params("Secant", &[("v46", 1.0)]),
        Varia::with_params("Twintrian", &[("v47", 1.0)]),
        Varia::named("Cross"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affine::IDENTITY;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn linear_is_the_identity_map() {
        let v = Variation::from_name("Linear", &Params::new()).unwrap();
        let f = v.create(&IDENTITY);
        let mut rng = StdRng::seed_from_u64(0);
        let p = f(Point::new(100.0, 100.0), &mut rng);
        assert_eq!(p, Point::new(100.0, 100.0));
    }

    #[test]
    fn spherical_divides_by_squared_radius() {
        let v = Variation::from_name("Spherical", &Params::new()).unwrap();
        let f = v.create(&IDENTITY);
        let mut rng = StdRng::seed_from_u64(0);
        let p = f(Point::new(2.0, 0.0), &mut rng);
        assert!((p.x - 0.5).abs() < 1e-12);
        assert!(p.y.abs() < 1e-12);
    }

    #[test]
    fn unknown_names_do_not_resolve() {
        assert!(Variation::from_name("Zzyzx", &Params::new()).is_none());
    }

    #[test]
    fn registry_tiers_are_strict() {
        // a parametric name without parameters is unresolvable
        assert!(Variation::from_name("Blob", &Params::new()).is_none());
        // and a zero-parameter name with parameters is too
        let p = Params::from_pairs(&[("high", 2.0)]);
        assert!(Variation::from_name("Linear", &p).is_none());
    }

    #[test]
    fn missing_parameters_read_as_one() {
        let p = Params::from_pairs(&[("unrelated", 3.0)]);
        match Variation::from_name("Secant", &p) {
            Some(Variation::Secant { amount }) => assert_eq!(amount, 1.0),
            other => panic!("unexpected resolution: {:?}", other),
        }
    }

    #[test]
    fn continuity_flags() {
        assert!(Variation::Linear.continuous());
        assert!(Variation::Waves.continuous());
        assert!(!Variation::Julia.continuous());
        assert!(!Variation::Square.continuous());
        assert!(!Variation::JuliaN { power: 3.0, dist: 0.8 }.continuous());
    }

    #[test]
    fn waves_reads_the_enclosing_matrix() {
        let t = Matrix::new(0.0, 0.0, 0.5, 2.0, 2.0, 3.0);
        let f = Variation::Waves.create(&t);
        let mut rng = StdRng::seed_from_u64(0);
        let p = f(Point::new(1.0, 1.0), &mut rng);
        // b = c-coefficient, c = tx, e = d, f = ty
        let expect_x = 1.0 + 0.5 * (1.0f64 / 4.0).sin();
        let expect_y = 1.0 + 2.0 * (1.0f64 / 9.0).sin();
        assert!((p.x - expect_x).abs() < 1e-12);
        assert!((p.y - expect_y).abs() < 1e-12);
    }

    #[test]
    fn stochastic_maps_are_deterministic_under_a_seed() {
        let v = Variation::from_name("Julia", &Params::new()).unwrap();
        let f = v.create(&IDENTITY);
        let p = Point::new(0.3, 0.7);
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        assert_eq!(f(p, &mut a), f(p, &mut b));
    }

    #[test]
    fn catalog_covers_every_variation() {
        let all = catalog();
        assert_eq!(all.len(), 49);
        for varia in &all {
            assert!(varia.resolve().is_some(), "catalog entry {} must resolve", varia.name);
        }
    }
}
