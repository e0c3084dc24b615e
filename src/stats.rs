//! Plotters that collect statistics instead of pixels: the bounding
//! spans used to auto-frame a render, and the canvas-coverage ratio
//! used as a fitness signal by the random search.

use crate::affine::Matrix;
use crate::geom::Point;
use crate::model::Stat;
use crate::span::{PointSpan, Span};
use crate::system::Plotter;

/// Tracks the x/y range of plotted points and the magnitude range of
/// their velocities.
pub struct SpanCollector {
    pub point: PointSpan,
    pub velocity: Span,
}

impl SpanCollector {
    pub fn new() -> SpanCollector {
        SpanCollector {
            point: PointSpan::empty(),
            velocity: Span::empty(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.point.is_valid() && self.velocity.is_valid()
    }

    /// Immutable snapshot for persisting on an element.
    pub fn node(&self) -> Stat {
        Stat {
            x: self.point.x,
            y: self.point.y,
            v: self.velocity,
        }
    }
}

impl Default for SpanCollector {
    fn default() -> Self {
        SpanCollector::new()
    }
}

impl Plotter for SpanCollector {
    fn plot(&mut self, point: Point, _color: f64, velocity: Point) {
        self.point.update(point);
        self.velocity.update(velocity.norm());
    }
}

/// A boolean occupancy grid in row-major order.
pub struct BitGrid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl BitGrid {
    pub fn new(width: usize, height: usize) -> BitGrid {
        BitGrid {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    pub fn inside(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    pub fn set(&mut self, x: usize, y: usize) {
        self.cells[y * self.width + x] = true;
    }

    /// Fraction of cells touched at least once.
    pub fn ratio(&self) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        let set = self.cells.iter().filter(|&&b| b).count();
        set as f64 / self.cells.len() as f64
    }
}

/// Marks the screen-mapped cell of each sample; its [`ratio`] says how
/// much of the frame the attractor reaches.  Higher is better: a
/// candidate that fills the canvas beats one collapsed to a speck.
///
/// [`ratio`]: CoverageCollector::ratio
pub struct CoverageCollector {
    screen: Matrix,
    width: f64,
    height: f64,
    grid: BitGrid,
}

impl CoverageCollector {
    pub fn new(width: usize, height: usize, screen: Matrix) -> CoverageCollector {
        CoverageCollector {
            screen,
            width: width as f64,
            height: height as f64,
            grid: BitGrid::new(width, height),
        }
    }

    pub fn ratio(&self) -> f64 {
        self.grid.ratio()
    }
}

impl Plotter for CoverageCollector {
    fn plot(&mut self, point: Point, _color: f64, _velocity: Point) {
        let p = self.screen.apply(point);
        if p.x >= 0.0 && p.x < self.width && p.y >= 0.0 && p.y < self.height {
            let (x, y) = (p.x as usize, p.y as usize);
            if self.grid.inside(x, y) {
                self.grid.set(x, y);
            }
        }
    }
}
