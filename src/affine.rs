//! Affine transform algebra.
//!
//! Transforms come in the several shapes a flame document may declare
//! (matrix, rotation, translation, scale, skew, or an ordered composite
//! of those), every one of which flattens to a six-coefficient matrix.
//! Arithmetic on transforms (`+`, `-`, scalar `*`) drives interpolation
//! and perturbation: like variants combine directly, mixed variants
//! combine through their flattened forms.

use std::ops::{Add, Mul, Sub};

use crate::geom::Point;

/// A 2D affine matrix in the coefficient layout the rest of the crate
/// assumes: `x' = a·x + c·y + tx`, `y' = b·x + d·y + ty`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

pub const IDENTITY: Matrix = Matrix {
    a: 1.0,
    b: 0.0,
    c: 0.0,
    d: 1.0,
    tx: 0.0,
    ty: 0.0,
};

impl Matrix {
    pub fn new(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Matrix {
        Matrix { a, b, c, d, tx, ty }
    }

    pub fn translation(tx: f64, ty: f64) -> Matrix {
        Matrix::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub fn scaling(sx: f64, sy: f64) -> Matrix {
        Matrix::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.tx,
            self.b * p.x + self.d * p.y + self.ty,
        )
    }

    /// Composition applying `self` first and `other` second.
    pub fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            tx: self.tx * other.a + self.ty * other.c + other.tx,
            ty: self.tx * other.b + self.ty * other.d + other.ty,
        }
    }
}

impl Add for Matrix {
    type Output = Matrix;
    fn add(self, o: Matrix) -> Matrix {
        Matrix::new(
            self.a + o.a,
            self.b + o.b,
            self.c + o.c,
            self.d + o.d,
            self.tx + o.tx,
            self.ty + o.ty,
        )
    }
}

impl Sub for Matrix {
    type Output = Matrix;
    fn sub(self, o: Matrix) -> Matrix {
        Matrix::new(
            self.a - o.a,
            self.b - o.b,
            self.c - o.c,
            self.d - o.d,
            self.tx - o.tx,
            self.ty - o.ty,
        )
    }
}

impl Mul<Matrix> for f64 {
    type Output = Matrix;
    fn mul(self, m: Matrix) -> Matrix {
        Matrix::new(
            self * m.a,
            self * m.b,
            self * m.c,
            self * m.d,
            self * m.tx,
            self * m.ty,
        )
    }
}

/// A transform as declared in a flame document.  Immutable after
/// construction; all geometric meaning is reachable through
/// [`Affine::flatten`].
#[derive(Clone, Debug, PartialEq)]
pub enum Affine {
    Matrix(Matrix),
    Rotation { angle: f64 },
    Translation { tx: f64, ty: f64 },
    Scale { sx: f64, sy: f64 },
    Skew { skx: f64, sky: f64 },
    Composite(Vec<Affine>),
}

impl Affine {
    pub fn identity() -> Affine {
        Affine::Matrix(IDENTITY)
    }

    /// Evaluate the variant down to its matrix form.  Composites fold
    /// their members in list order (the first member applies first).
    pub fn flatten(&self) -> Matrix {
        match *self {
            Affine::Matrix(m) => m,
            // This basis differs from the textbook rotation matrix on
            // purpose: every document ever rendered was framed by it,
            // and changing it would silently re-shape them all.
            Affine::Rotation { angle } => Matrix::new(
                angle.sin(),
                -angle.cos(),
                angle.cos(),
                angle.sin(),
                0.0,
                0.0,
            ),
            Affine::Translation { tx, ty } => Matrix::translation(tx, ty),
            Affine::Scale { sx, sy } => Matrix::scaling(sx, sy),
            Affine::Skew { skx, sky } => Matrix::new(1.0, skx, sky, 1.0, 0.0, 0.0),
            Affine::Composite(ref members) => members
                .iter()
                .fold(IDENTITY, |acc, m| acc.then(&m.flatten())),
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        self.flatten().apply(p)
    }

    /// Apply `self`, then `other`.
    pub fn compose(&self, other: &Affine) -> Affine {
        Affine::Matrix(self.flatten().then(&other.flatten()))
    }
}

impl Add for &Affine {
    type Output = Affine;
    fn add(self, o: &Affine) -> Affine {
        match (self, o) {
            (Affine::Rotation { angle: a }, Affine::Rotation { angle: b }) => {
                Affine::Rotation { angle: a + b }
            }
            (
                Affine::Translation { tx: ax, ty: ay },
                Affine::Translation { tx: bx, ty: by },
            ) => Affine::Translation {
                tx: ax + bx,
                ty: ay + by,
            },
            (Affine::Scale { sx: ax, sy: ay }, Affine::Scale { sx: bx, sy: by }) => {
                Affine::Scale {
                    sx: ax + bx,
                    sy: ay + by,
                }
            }
            (Affine::Skew { skx: ax, sky: ay }, Affine::Skew { skx: bx, sky: by }) => {
                Affine::Skew {
                    skx: ax + bx,
                    sky: ay + by,
                }
            }
            (Affine::Matrix(a), Affine::Matrix(b)) => Affine::Matrix(*a + *b),
            _ => Affine::Matrix(self.flatten() + o.flatten()),
        }
    }
}

impl Sub for &Affine {
    type Output = Affine;
    fn sub(self, o: &Affine) -> Affine {
        match (self, o) {
            (Affine::Rotation { angle: a }, Affine::Rotation { angle: b }) => {
                Affine::Rotation { angle: a - b }
            }
            (
                Affine::Translation { tx: ax, ty: ay },
                Affine::Translation { tx: bx, ty: by },
            ) => Affine::Translation {
                tx: ax - bx,
                ty: ay - by,
            },
            (Affine::Scale { sx: ax, sy: ay }, Affine::Scale { sx: bx, sy: by }) => {
                Affine::Scale {
                    sx: ax - bx,
                    sy: ay - by,
                }
            }
            (Affine::Skew { skx: ax, sky: ay }, Affine::Skew { skx: bx, sky: by }) => {
                Affine::Skew {
                    skx: ax - bx,
                    sky: ay - by,
                }
            }
            (Affine::Matrix(a), Affine::Matrix(b)) => Affine::Matrix(*a - *b),
            _ => Affine::Matrix(self.flatten() - o.flatten()),
        }
    }
}

impl Mul<&Affine> for f64 {
    type Output = Affine;
    fn mul(self, v: &Affine) -> Affine {
        match *v {
            Affine::Rotation { angle } => Affine::Rotation {
                angle: self * angle,
            },
            Affine::Translation { tx, ty } => Affine::Translation {
                tx: self * tx,
                ty: self * ty,
            },
            Affine::Scale { sx, sy } => Affine::Scale {
                sx: self * sx,
                sy: self * sy,
            },
            Affine::Skew { skx, sky } => Affine::Skew {
                skx: self * skx,
                sky: self * sky,
            },
            Affine::Matrix(m) => Affine::Matrix(self * m),
            Affine::Composite(_) => Affine::Matrix(self * v.flatten()),
        }
    }
}
