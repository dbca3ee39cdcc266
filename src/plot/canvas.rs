use image::{Rgb, RgbImage};
use std::path::Path;

use super::font::{GLYPH_HEIGHT, GLYPH_WIDTH, glyph};
use crate::error::{Error, Result};

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const GREY: Rgb<u8> = Rgb([200, 200, 200]);

/// An RGB raster with the handful of primitives the charts need.
pub struct Canvas {
    img: RgbImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Canvas {
            img: RgbImage::from_pixel(width, height, WHITE),
        }
    }

    pub fn width(&self) -> u32 {
        self.img.width()
    }

    pub fn height(&self) -> u32 {
        self.img.height()
    }

    fn put(&mut self, x: i64, y: i64, color: Rgb<u8>) {
        if x >= 0 && y >= 0 && (x as u32) < self.img.width() && (y as u32) < self.img.height() {
            self.img.put_pixel(x as u32, y as u32, color);
        }
    }

    pub fn fill_rect(&mut self, x: i64, y: i64, w: i64, h: i64, color: Rgb<u8>) {
        for py in y..y + h {
            for px in x..x + w {
                self.put(px, py, color);
            }
        }
    }

    pub fn stroke_rect(&mut self, x: i64, y: i64, w: i64, h: i64, color: Rgb<u8>) {
        self.line((x, y), (x + w, y), color, 1);
        self.line((x, y + h), (x + w, y + h), color, 1);
        self.line((x, y), (x, y + h), color, 1);
        self.line((x + w, y), (x + w, y + h), color, 1);
    }

    /// Bresenham line drawn with a square pen `thickness` pixels wide.
    pub fn line(&mut self, from: (i64, i64), to: (i64, i64), color: Rgb<u8>, thickness: i64) {
        self.pattern_line(from, to, color, thickness, None);
    }

    /// Like [`Canvas::line`] but alternating `dash` pixels on and off.
    pub fn dashed_line(
        &mut self,
        from: (i64, i64),
        to: (i64, i64),
        color: Rgb<u8>,
        thickness: i64,
        dash: i64,
    ) {
        self.pattern_line(from, to, color, thickness, Some(dash.max(1)));
    }

    fn pattern_line(
        &mut self,
        (mut x0, mut y0): (i64, i64),
        (x1, y1): (i64, i64),
        color: Rgb<u8>,
        thickness: i64,
        dash: Option<i64>,
    ) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let half = thickness / 2;
        let mut step = 0i64;

        loop {
            let on = dash.is_none_or(|d| (step / d) % 2 == 0);
            if on {
                self.fill_rect(x0 - half, y0 - half, thickness.max(1), thickness.max(1), color);
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
            step += 1;
        }
    }

    /// Pixel width of `text` at the given integer `scale`.
    pub fn text_width(text: &str, scale: u32) -> i64 {
        let n = text.chars().count() as i64;
        if n == 0 {
            0
        } else {
            (n * (GLYPH_WIDTH as i64 + 1) - 1) * scale as i64
        }
    }

    pub fn text_height(scale: u32) -> i64 {
        (GLYPH_HEIGHT * scale) as i64
    }

    /// Draws `text` with its top-left corner at `(x, y)`.
    pub fn text(&mut self, x: i64, y: i64, text: &str, scale: u32, color: Rgb<u8>) {
        let s = scale as i64;
        for (i, c) in text.chars().enumerate() {
            let origin = x + i as i64 * (GLYPH_WIDTH as i64 + 1) * s;
            for (row, &bits) in glyph(c).iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if (bits >> (GLYPH_WIDTH - 1 - col)) & 1 == 1 {
                        self.fill_rect(origin + col as i64 * s, y + row as i64 * s, s, s, color);
                    }
                }
            }
        }
    }

    /// Draws `text` centred on `(cx, cy)`.
    pub fn text_centered(&mut self, cx: i64, cy: i64, text: &str, scale: u32, color: Rgb<u8>) {
        let x = cx - Self::text_width(text, scale) / 2;
        let y = cy - Self::text_height(scale) / 2;
        self.text(x, y, text, scale, color);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb<u8> {
        *self.img.get_pixel(x, y)
    }

    /// Encodes as PNG, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.img.save(path).map_err(|source| Error::Image {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb<u8> = Rgb([255, 0, 0]);

    #[test]
    fn clipped_drawing_does_not_panic() {
        let mut c = Canvas::new(10, 10);
        c.fill_rect(-5, -5, 30, 30, RED);
        c.line((-20, 3), (40, 3), BLACK, 3);
        assert_eq!(c.pixel(0, 0), RED);
        assert_eq!(c.pixel(9, 3), BLACK);
    }

    #[test]
    fn diagonal_line_hits_both_ends() {
        let mut c = Canvas::new(20, 20);
        c.line((0, 0), (19, 19), BLACK, 1);
        assert_eq!(c.pixel(0, 0), BLACK);
        assert_eq!(c.pixel(19, 19), BLACK);
        assert_eq!(c.pixel(19, 0), WHITE);
    }

    #[test]
    fn dashes_leave_gaps() {
        let mut c = Canvas::new(40, 3);
        c.dashed_line((0, 1), (39, 1), BLACK, 1, 5);
        assert_eq!(c.pixel(2, 1), BLACK);
        assert_eq!(c.pixel(7, 1), WHITE);
        assert_eq!(c.pixel(12, 1), BLACK);
    }

    #[test]
    fn text_metrics() {
        assert_eq!(Canvas::text_width("AB", 2), 22);
        assert_eq!(Canvas::text_height(3), 21);
        let mut c = Canvas::new(20, 10);
        c.text(0, 0, "1", 1, BLACK);
        // Top row of '1' is a single pixel in the centre column.
        assert_eq!(c.pixel(2, 0), BLACK);
        assert_eq!(c.pixel(0, 0), WHITE);
    }
}
