use egui::{Color32, Pos2};
use image::{Rgba, RgbaImage};

/// How painted pixels combine with what is already on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Composite {
    /// Paint covers the destination
    #[default]
    SourceOver,
    /// Paint removes the destination, leaving transparent pixels
    DestinationOut,
}

/// Drawing attributes held by the surface, the raster counterpart of a 2D
/// context's stroke style, line width and composite operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintState {
    pub color: Color32,
    pub line_width: f32,
    pub composite: Composite,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            color: Color32::BLACK,
            line_width: 1.0,
            composite: Composite::SourceOver,
        }
    }
}

impl PaintState {
    fn half_width(&self) -> f32 {
        self.line_width.max(1.0) / 2.0
    }

    fn plot(&self, image: &mut RgbaImage, x: u32, y: u32) {
        let pixel = match self.composite {
            Composite::SourceOver => Rgba([self.color.r(), self.color.g(), self.color.b(), 255]),
            Composite::DestinationOut => Rgba([0, 0, 0, 0]),
        };
        image.put_pixel(x, y, pixel);
    }
}

/// Pixel range covering `[min, max]` clipped to `0..limit`
fn clip_span(min: f32, max: f32, limit: u32) -> Option<(u32, u32)> {
    if limit == 0 || max < 0.0 || min >= limit as f32 {
        return None;
    }
    let lo = min.floor().max(0.0) as u32;
    let hi = (max.ceil().max(0.0) as u32).min(limit - 1);
    (lo <= hi).then_some((lo, hi))
}

fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Stroke a straight segment with round caps.
///
/// A pixel is painted when its center lies within half the line width of
/// the segment, so consecutive segments of a path join seamlessly.
pub fn stroke_segment(image: &mut RgbaImage, from: Pos2, to: Pos2, paint: &PaintState) {
    let hw = paint.half_width();
    let Some((x0, x1)) = clip_span(from.x.min(to.x) - hw, from.x.max(to.x) + hw, image.width())
    else {
        return;
    };
    let Some((y0, y1)) = clip_span(from.y.min(to.y) - hw, from.y.max(to.y) + hw, image.height())
    else {
        return;
    };

    for y in y0..=y1 {
        for x in x0..=x1 {
            let center = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
            if distance_to_segment(center, from, to) <= hw {
                paint.plot(image, x, y);
            }
        }
    }
}

/// Outline the axis-aligned rectangle spanned by two opposite corners.
///
/// Returns false without painting when both extents are zero.
pub fn stroke_rect(image: &mut RgbaImage, corner: Pos2, opposite: Pos2, paint: &PaintState) -> bool {
    if corner.x == opposite.x && corner.y == opposite.y {
        return false;
    }
    let top_right = Pos2::new(opposite.x, corner.y);
    let bottom_left = Pos2::new(corner.x, opposite.y);
    stroke_segment(image, corner, top_right, paint);
    stroke_segment(image, top_right, opposite, paint);
    stroke_segment(image, opposite, bottom_left, paint);
    stroke_segment(image, bottom_left, corner, paint);
    true
}

/// Outline a circle. Returns false without painting when `radius <= 0`.
pub fn stroke_circle(image: &mut RgbaImage, center: Pos2, radius: f32, paint: &PaintState) -> bool {
    if radius.is_nan() || radius <= 0.0 {
        return false;
    }
    let hw = paint.half_width();
    let reach = radius + hw;
    let Some((x0, x1)) = clip_span(center.x - reach, center.x + reach, image.width()) else {
        return true;
    };
    let Some((y0, y1)) = clip_span(center.y - reach, center.y + reach, image.height()) else {
        return true;
    };

    for y in y0..=y1 {
        for x in x0..=x1 {
            let p = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
            if (p.distance(center) - radius).abs() <= hw {
                paint.plot(image, x, y);
            }
        }
    }
    true
}
