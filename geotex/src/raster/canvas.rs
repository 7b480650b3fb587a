//! Drawing normalized shapes with tiny-skia.

use geo_types::Coord;
use image::{Rgba, RgbaImage};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Shader, Stroke, Transform};

use super::paint::Paint as FeaturePaint;
use super::RenderError;
use crate::config::RasterConfig;
use crate::extent::Extent;
use crate::geometry::Shape;
use crate::style::Color;

/// A square pixmap mapped onto an extent; north is up.
pub(super) struct Canvas {
    pixmap: Pixmap,
    extent: Extent,
    scale_x: f64,
    scale_y: f64,
    point_radius: f32,
    anti_alias: bool,
}

impl Canvas {
    pub fn new(size: u32, extent: Extent, config: &RasterConfig) -> Result<Self, RenderError> {
        let pixmap = Pixmap::new(size, size).ok_or(RenderError::Canvas(size))?;
        Ok(Self {
            pixmap,
            extent,
            scale_x: size as f64 / extent.width().max(f64::EPSILON),
            scale_y: size as f64 / extent.height().max(f64::EPSILON),
            point_radius: config.point_radius(),
            anti_alias: config.anti_alias(),
        })
    }

    #[inline]
    fn to_pixel(&self, coord: &Coord<f64>) -> (f32, f32) {
        let x = (coord.x - self.extent.west()) * self.scale_x;
        let y = (self.extent.north() - coord.y) * self.scale_y;
        (x as f32, y as f32)
    }

    pub fn draw(&mut self, shape: &Shape, paint: &FeaturePaint) {
        match shape {
            Shape::Points(points) => {
                let mut pb = PathBuilder::new();
                for point in points {
                    let (x, y) = self.to_pixel(point);
                    pb.push_circle(x, y, self.point_radius);
                }
                self.fill_and_stroke(pb, paint);
            }
            Shape::Lines(lines) => {
                let mut pb = PathBuilder::new();
                for line in lines {
                    self.trace(&mut pb, line, false);
                }
                self.stroke(pb, paint);
            }
            Shape::Polygons(polygons) => {
                let mut pb = PathBuilder::new();
                for ring in polygons.iter().flat_map(|p| p.rings()) {
                    self.trace(&mut pb, ring, true);
                }
                self.fill_and_stroke(pb, paint);
            }
        }
    }

    fn trace(&self, pb: &mut PathBuilder, coords: &[Coord<f64>], close: bool) {
        let mut pixels = coords.iter().map(|c| self.to_pixel(c));
        let Some((x, y)) = pixels.next() else {
            return;
        };
        pb.move_to(x, y);
        for (x, y) in pixels {
            pb.line_to(x, y);
        }
        if close {
            pb.close();
        }
    }

    fn fill_and_stroke(&mut self, pb: PathBuilder, paint: &FeaturePaint) {
        let Some(path) = pb.finish() else {
            return;
        };
        if paint.fill.a > 0 {
            let fill = self.solid(paint.fill);
            self.pixmap.fill_path(
                &path,
                &fill,
                FillRule::EvenOdd,
                Transform::identity(),
                None,
            );
        }
        if paint.stroke_width > 0.0 && paint.stroke.a > 0 {
            let stroke = self.solid(paint.stroke);
            self.pixmap.stroke_path(
                &path,
                &stroke,
                &Stroke {
                    width: paint.stroke_width,
                    ..Default::default()
                },
                Transform::identity(),
                None,
            );
        }
    }

    fn stroke(&mut self, pb: PathBuilder, paint: &FeaturePaint) {
        let stroke_only = FeaturePaint {
            fill: Color::rgba(0, 0, 0, 0),
            ..*paint
        };
        self.fill_and_stroke(pb, &stroke_only);
    }

    fn solid(&self, color: Color) -> Paint<'static> {
        Paint {
            shader: Shader::SolidColor(tiny_skia::Color::from_rgba8(
                color.r, color.g, color.b, color.a,
            )),
            anti_alias: self.anti_alias,
            ..Default::default()
        }
    }

    /// Converts the premultiplied pixmap into a straight-alpha image.
    pub fn into_image(self) -> RgbaImage {
        let mut image = RgbaImage::new(self.pixmap.width(), self.pixmap.height());
        for (dst, src) in image.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        image
    }
}
