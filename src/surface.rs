use egui::{Color32, ColorImage};
use image::{Rgba, RgbaImage};

use crate::error::{CanvasError, CanvasResult};
use crate::stroke::PaintState;

/// Largest width or height a surface accepts
pub const MAX_DIMENSION: u32 = 8192;

/// Reject empty surfaces and sizes beyond [`MAX_DIMENSION`]
pub fn check_dimensions(width: u32, height: u32) -> CanvasResult<()> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(CanvasError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// The raster the engine draws on.
///
/// Like a 2D drawing context, the surface carries its own paint state.
/// Resizing resets that state to its defaults and the owner must apply
/// the active tool's attributes again.
#[derive(Debug, Clone)]
pub struct Surface {
    pixels: RgbaImage,
    background: Color32,
    paint: PaintState,
    revision: u64,
}

impl Surface {
    /// Create a surface filled with `background`
    pub fn new(width: u32, height: u32, background: Color32) -> CanvasResult<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            pixels: RgbaImage::from_pixel(width, height, opaque(background)),
            background,
            paint: PaintState::default(),
            revision: 0,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn background(&self) -> Color32 {
        self.background
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.pixels.get_pixel_checked(x, y).copied()
    }

    pub fn paint(&self) -> &PaintState {
        &self.paint
    }

    pub fn set_paint(&mut self, paint: PaintState) {
        self.paint = paint;
    }

    /// Incremented by every pixel mutation, lets viewers skip re-uploads
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Mutable pixel access. Counts as a modification.
    pub fn pixels_mut(&mut self) -> &mut RgbaImage {
        self.revision += 1;
        &mut self.pixels
    }

    /// Paint a closure's changes with the current paint state
    pub fn draw<R>(&mut self, f: impl FnOnce(&mut RgbaImage, &PaintState) -> R) -> R {
        self.revision += 1;
        f(&mut self.pixels, &self.paint)
    }

    /// Overwrite every pixel with the background color
    pub fn fill_background(&mut self) {
        let bg = opaque(self.background);
        self.pixels_mut().pixels_mut().for_each(|px| *px = bg);
    }

    /// Replace the pixels with an exact copy of `image` (same dimensions)
    pub fn put_image(&mut self, image: &RgbaImage) {
        if image.dimensions() == self.dimensions() {
            self.pixels_mut().copy_from_slice(image.as_raw());
        } else {
            log::warn!(
                "Ignoring {}x{} pixel copy onto {}x{} surface",
                image.width(),
                image.height(),
                self.width(),
                self.height()
            );
        }
    }

    /// Fill the background, then composite `image` over it at the origin.
    ///
    /// Transparent regions of `image` show the background and anything
    /// beyond the surface is clipped.
    pub fn restore_from(&mut self, image: &RgbaImage) {
        self.fill_background();
        composite_over(self.pixels_mut(), image);
    }

    /// Change the raster dimensions, carrying the existing content forward.
    ///
    /// The old pixels are composited at the origin of a background-filled
    /// buffer of the new size, the same way a restore is. The paint state
    /// is reset.
    pub fn resize(&mut self, width: u32, height: u32) -> CanvasResult<()> {
        check_dimensions(width, height)?;
        let captured = std::mem::replace(
            &mut self.pixels,
            RgbaImage::from_pixel(width, height, opaque(self.background)),
        );
        composite_over(&mut self.pixels, &captured);
        self.paint = PaintState::default();
        self.revision += 1;
        Ok(())
    }

    /// Upload format for egui textures
    pub fn to_color_image(&self) -> ColorImage {
        let (w, h) = self.dimensions();
        ColorImage::from_rgba_unmultiplied([w as usize, h as usize], self.pixels.as_raw())
    }
}

fn opaque(color: Color32) -> Rgba<u8> {
    Rgba([color.r(), color.g(), color.b(), 255])
}

/// Source-over compositing of `top` onto `bottom` at the origin, clipped.
fn composite_over(bottom: &mut RgbaImage, top: &RgbaImage) {
    let w = bottom.width().min(top.width());
    let h = bottom.height().min(top.height());
    for y in 0..h {
        for x in 0..w {
            let src = top.get_pixel(x, y).0;
            let a = u32::from(src[3]);
            match a {
                0 => {}
                255 => bottom.put_pixel(x, y, Rgba(src)),
                _ => {
                    let dst = bottom.get_pixel_mut(x, y);
                    for c in 0..3 {
                        let blended = (u32::from(src[c]) * a + u32::from(dst.0[c]) * (255 - a) + 127) / 255;
                        dst.0[c] = blended as u8;
                    }
                    let da = u32::from(dst.0[3]);
                    dst.0[3] = (a + (da * (255 - a) + 127) / 255) as u8;
                }
            }
        }
    }
}
