// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The rasterizer: a plotter that writes each retained sample as a
//! single pixel, colored from the running color coordinate and the
//! sample's velocity.  Later hits overwrite earlier ones; perceived
//! density comes from the supersampling path (render at `density²`
//! the pixel and iteration count, downsample, gamma-correct).

use image::{Rgba, RgbaImage};
use num::clamp;
use rand::RngCore;

use crate::affine::Matrix;
use crate::error::Error;
use crate::geom::Point;
use crate::span::Span;
use crate::system::{FlameSystem, Plotter, Progress};

/// Background policy.  A dark canvas renders samples at full
/// brightness; a light canvas lets the saturation carry brightness so
/// faint samples fade toward the paper.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Background {
    Dark,
    Light,
}

impl Background {
    fn fill(&self) -> Rgba<u8> {
        match self {
            Background::Dark => Rgba([0, 0, 0, 255]),
            Background::Light => Rgba([255, 255, 255, 255]),
        }
    }

    fn brightness(&self, saturation: f64) -> f64 {
        match self {
            Background::Dark => 1.0,
            Background::Light => saturation,
        }
    }
}

/// Maps a sample's running color and velocity to a pixel color: hue is
/// the fractional part of the color coordinate, saturation the
/// velocity magnitude normalized against the run's velocity span and
/// scaled by `factor`.
pub struct VelocityColor {
    pub velocity: Span,
    pub factor: f64,
    pub background: Background,
}

impl VelocityColor {
    pub fn resolve(&self, color: f64, velocity: Point) -> Rgba<u8> {
        let sat = clamp(self.velocity.normalized(velocity.norm()) * self.factor, 0.0, 1.0);
        let hue = color - color.floor();
        let bri = self.background.brightness(sat);
        let (r, g, b) = hsb_to_rgb(hue, sat, bri);
        Rgba([r, g, b, 255])
    }
}

/// Hue/saturation/brightness to 8-bit RGB.  Hue wraps on [0, 1).
fn hsb_to_rgb(h: f64, s: f64, b: f64) -> (u8, u8, u8) {
    let h6 = (h - h.floor()) * 6.0;
    let sector = h6.floor() as u32 % 6;
    let f = h6 - h6.floor();
    let p = b * (1.0 - s);
    let q = b * (1.0 - s * f);
    let t = b * (1.0 - s * (1.0 - f));
    let (r, g, bl) = match sector {
        0 => (b, t, p),
        1 => (q, b, p),
        2 => (p, b, t),
        3 => (p, q, b),
        4 => (t, p, b),
        _ => (b, p, q),
    };
    (channel(r), channel(g), channel(bl))
}

fn channel(v: f64) -> u8 {
    (clamp(v, 0.0, 1.0) * 255.0).round() as u8
}

/// Writes samples through a logical-to-pixel screen transform into an
/// RGBA buffer.
pub struct Rasterizer {
    screen: Matrix,
    width: u32,
    height: u32,
    resolver: VelocityColor,
    img: RgbaImage,
}

impl Rasterizer {
    pub fn new(width: u32, height: u32, screen: Matrix, resolver: VelocityColor) -> Rasterizer {
        let mut img = RgbaImage::new(width, height);
        let fill = resolver.background.fill();
        for pixel in img.pixels_mut() {
            *pixel = fill;
        }
        Rasterizer {
            screen,
            width,
            height,
            resolver,
            img,
        }
    }

    /// Run the chaos game into this canvas.  A numerically invalid run
    /// yields an error rather than a half-painted image.
    pub fn render(
        mut self,
        system: &FlameSystem,
        iterations: usize,
        progress: &mut dyn Progress,
        rng: &mut dyn RngCore,
    ) -> Result<RgbaImage, Error> {
        if system.flames.is_empty() {
            return Err(Error::EmptyElement);
        }
        if system.draw(iterations, &mut self, progress, rng) {
            Ok(self.img)
        } else {
            Err(Error::NumericOverflow)
        }
    }

    pub fn into_image(self) -> RgbaImage {
        self.img
    }
}

impl Plotter for Rasterizer {
    fn plot(&mut self, point: Point, color: f64, velocity: Point) {
        let p = self.screen.apply(point);
        if p.x >= 0.0 && p.x < self.width as f64 && p.y >= 0.0 && p.y < self.height as f64 {
            let rgba = self.resolver.resolve(color, velocity);
            self.img.put_pixel(p.x as u32, p.y as u32, rgba);
        }
    }
}

/// Shrink a supersampled canvas back to its target size.
pub fn downsample(img: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    image::imageops::resize(img, width, height, image::FilterType::Triangle)
}

/// Apply a power curve to the color channels, approximating the
/// brightness accumulation a density histogram would give.
pub fn gamma_adjust(img: &RgbaImage, gamma: f64) -> RgbaImage {
    let mut out = img.clone();
    for pixel in out.pixels_mut() {
        for i in 0..3 {
            let v = pixel[i] as f64 / 255.0;
            pixel[i] = channel(v.powf(gamma));
        }
    }
    out
}
