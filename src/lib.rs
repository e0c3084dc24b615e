// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Fractal flame generator
//!
//! A fractal flame is the attractor of an iterated function system
//! played as a "chaos game": a running point is repeatedly passed
//! through one randomly chosen flame (an affine transform composed
//! with a weighted blend of nonlinear "variation" functions), and the
//! trajectory, after a short warm-up that lets it fall onto the
//! attractor, is accumulated into an image.  Each sample also carries
//! a running color coordinate, averaged toward the chosen flame's
//! color at every step, and a velocity (the step the iteration just
//! took); together they decide the pixel color.
//!
//! The crate is organized around that loop.  [`model::Element`] is the
//! persistent document node; [`system::FlameSystem`] is its runnable
//! form, streaming samples into any [`system::Plotter`]: a
//! [`raster::Rasterizer`] for pixels, a [`stats::SpanCollector`] for
//! auto-framing statistics, or a [`stats::CoverageCollector`] whose
//! fill ratio scores candidates for the [`search::RandomSearch`]
//! engine.  The [`interpolate`], [`rotate`], and [`expand`] generators
//! derive new documents from existing ones through the same affine
//! arithmetic the evaluator uses.

pub mod affine;
pub mod doc;
pub mod error;
pub mod expand;
pub mod export;
pub mod geom;
pub mod interpolate;
pub mod model;
pub mod progress;
pub mod raster;
pub mod rotate;
pub mod search;
pub mod span;
pub mod stats;
pub mod system;
pub mod variation;

pub use crate::error::Error;
pub use crate::model::{Element, Flame, Stat};
pub use crate::system::{EmptyProgress, FlameSystem, Plotter, Progress};
