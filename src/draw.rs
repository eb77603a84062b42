//! Drawing layer over a tiny-skia `Pixmap`
//!
//! Every shape is rasterized without anti-aliasing, so edges stay hard like
//! the rest of the artwork. The blend mode is fixed per canvas: `SourceOver`
//! for opaque backgrounds that composite translucent shapes, `Source` for
//! canvases whose shapes replace the pixels underneath, alpha included.

use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use tiny_skia::{
    BlendMode, ColorU8, FillRule, IntSize, Paint, Path, PathBuilder, Pixmap, Rect, Stroke,
    Transform,
};

/// A point in canvas coordinates
pub type Point = (f32, f32);

pub struct Canvas {
    pixmap: Pixmap,
    blend_mode: BlendMode,
}

impl Canvas {
    /// A fully transparent canvas
    pub fn new(width: u32, height: u32, blend_mode: BlendMode) -> Result<Self> {
        let pixmap = Pixmap::new(width, height)
            .with_context(|| format!("Can't allocate a {width}x{height} canvas"))?;
        Ok(Self { pixmap, blend_mode })
    }

    /// Start from the pixels of an existing image
    pub fn from_image(image: &RgbaImage, blend_mode: BlendMode) -> Result<Self> {
        let (width, height) = image.dimensions();
        let size = IntSize::from_wh(width, height)
            .with_context(|| format!("Invalid canvas size {width}x{height}"))?;

        // tiny-skia stores premultiplied alpha
        let data: Vec<u8> = image
            .pixels()
            .flat_map(|p| {
                let color = ColorU8::from_rgba(p[0], p[1], p[2], p[3]).premultiply();
                [color.red(), color.green(), color.blue(), color.alpha()]
            })
            .collect();

        let pixmap =
            Pixmap::from_vec(data, size).context("Pixel data doesn't match the canvas size")?;
        Ok(Self { pixmap, blend_mode })
    }

    /// Convert back to straight-alpha RGBA
    pub fn into_image(self) -> RgbaImage {
        let width = self.pixmap.width();
        let pixels = self.pixmap.pixels();

        RgbaImage::from_fn(width, self.pixmap.height(), |x, y| {
            let color = pixels[(y * width + x) as usize].demultiply();
            Rgba([color.red(), color.green(), color.blue(), color.alpha()])
        })
    }

    fn create_paint(&self, color: Rgba<u8>) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
        paint.anti_alias = false;
        paint.blend_mode = self.blend_mode;
        paint
    }

    /// Fill an axis-aligned rectangle
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba<u8>) {
        if let Some(rect) = Rect::from_xywh(x, y, width, height) {
            let paint = self.create_paint(color);
            self.pixmap
                .fill_rect(rect, &paint, Transform::identity(), None);
        }
    }

    pub fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba<u8>) {
        if let Some(path) = PathBuilder::from_circle(center.0, center.1, radius) {
            self.fill(&path, color);
        }
    }

    /// Stroke a circle outline. The stroke grows inward from `radius`, so the
    /// ring never extends past its nominal bounding box.
    pub fn stroke_circle(&mut self, center: Point, radius: f32, width: f32, color: Rgba<u8>) {
        let path_radius = radius - width / 2.0;
        if let Some(path) = PathBuilder::from_circle(center.0, center.1, path_radius) {
            self.stroke(&path, width, color);
        }
    }

    pub fn fill_polygon(&mut self, points: &[Point], color: Rgba<u8>) {
        if points.len() < 3 {
            return;
        }
        if let Some(path) = polyline_path(points, true) {
            self.fill(&path, color);
        }
    }

    /// Outline a closed polygon
    pub fn stroke_polygon(&mut self, points: &[Point], width: f32, color: Rgba<u8>) {
        if let Some(path) = polyline_path(points, true) {
            self.stroke(&path, width, color);
        }
    }

    /// Draw connected segments through `points`
    pub fn draw_polyline(&mut self, points: &[Point], width: f32, color: Rgba<u8>) {
        if let Some(path) = polyline_path(points, false) {
            self.stroke(&path, width, color);
        }
    }

    pub fn draw_line(&mut self, from: Point, to: Point, width: f32, color: Rgba<u8>) {
        self.draw_polyline(&[from, to], width, color);
    }

    fn fill(&mut self, path: &Path, color: Rgba<u8>) {
        let paint = self.create_paint(color);
        self.pixmap
            .fill_path(path, &paint, FillRule::EvenOdd, Transform::identity(), None);
    }

    fn stroke(&mut self, path: &Path, width: f32, color: Rgba<u8>) {
        let paint = self.create_paint(color);
        let stroke = Stroke {
            width,
            ..Default::default()
        };
        self.pixmap
            .stroke_path(path, &paint, &stroke, Transform::identity(), None);
    }
}

fn polyline_path(points: &[Point], closed: bool) -> Option<Path> {
    let (&(first_x, first_y), rest) = points.split_first()?;
    if rest.is_empty() {
        return None;
    }

    let mut pb = PathBuilder::new();
    pb.move_to(first_x, first_y);
    for &(x, y) in rest {
        pb.line_to(x, y);
    }
    if closed {
        pb.close();
    }
    pb.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn painted(image: &RgbaImage, x: u32, y: u32) -> bool {
        image.get_pixel(x, y)[3] != 0
    }

    #[test]
    fn image_round_trip_keeps_opaque_and_transparent_pixels() {
        let mut source = RgbaImage::new(4, 4);
        source.put_pixel(1, 1, Rgba([20, 30, 60, 255]));

        let canvas = Canvas::from_image(&source, BlendMode::SourceOver).unwrap();
        let image = canvas.into_image();

        assert_eq!(*image.get_pixel(1, 1), Rgba([20, 30, 60, 255]));
        assert_eq!(image.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn source_blend_replaces_alpha() {
        let base = RgbaImage::from_pixel(10, 10, RED);
        let mut canvas = Canvas::from_image(&base, BlendMode::Source).unwrap();
        canvas.fill_rect(0.0, 0.0, 5.0, 5.0, Rgba([0, 0, 255, 100]));
        let image = canvas.into_image();

        assert_eq!(image.get_pixel(2, 2)[3], 100);
        assert_eq!(*image.get_pixel(7, 7), RED);
    }

    #[test]
    fn source_over_blend_stays_opaque() {
        let base = RgbaImage::from_pixel(10, 10, RED);
        let mut canvas = Canvas::from_image(&base, BlendMode::SourceOver).unwrap();
        canvas.fill_rect(0.0, 0.0, 5.0, 5.0, Rgba([0, 0, 255, 100]));
        let pixel = *canvas.into_image().get_pixel(2, 2);

        assert_eq!(pixel[3], 255);
        assert!(pixel[0] < 255 && pixel[2] > 0);
    }

    #[test]
    fn stroke_circle_grows_inward() {
        let mut canvas = Canvas::new(40, 40, BlendMode::Source).unwrap();
        canvas.stroke_circle((20.0, 20.0), 10.0, 2.0, RED);
        let image = canvas.into_image();

        assert!(!painted(&image, 20, 20));
        assert!(painted(&image, 29, 20));
        assert!(!painted(&image, 31, 20));
    }

    #[test]
    fn fill_polygon_triangle() {
        let mut canvas = Canvas::new(20, 20, BlendMode::Source).unwrap();
        canvas.fill_polygon(&[(2.0, 2.0), (17.0, 2.0), (9.5, 17.0)], RED);
        let image = canvas.into_image();

        assert_eq!(*image.get_pixel(9, 5), RED);
        assert!(!painted(&image, 2, 15));
        assert!(!painted(&image, 17, 15));
    }

    #[test]
    fn draw_line_has_stroke_width() {
        let mut canvas = Canvas::new(20, 20, BlendMode::Source).unwrap();
        canvas.draw_line((0.0, 10.0), (20.0, 10.0), 4.0, RED);
        let image = canvas.into_image();

        assert!(painted(&image, 5, 8));
        assert!(painted(&image, 5, 11));
        assert!(!painted(&image, 5, 14));
    }

    #[test]
    fn shapes_outside_canvas_are_ignored() {
        let mut canvas = Canvas::new(10, 10, BlendMode::Source).unwrap();
        canvas.fill_circle((-50.0, -50.0), 5.0, RED);
        canvas.draw_line((20.0, 20.0), (30.0, 30.0), 2.0, RED);
        canvas.fill_polygon(&[(-10.0, -10.0), (-5.0, -10.0), (-5.0, -5.0)], RED);
        canvas.fill_polygon(&[(1.0, 1.0), (5.0, 5.0)], RED);

        assert!(canvas.into_image().pixels().all(|p| p[3] == 0));
    }
}
