use std::collections::VecDeque;

use image::{Rgba, RgbaImage};

use crate::error::{CanvasError, CanvasResult};

/// Repaint the 4-connected region of pixels sharing the seed's RGB.
///
/// Alpha is ignored when matching and every repainted pixel becomes fully
/// opaque. Returns the number of repainted pixels; zero means the seed
/// already had the fill color and the image was left untouched.
pub fn flood_fill(image: &mut RgbaImage, x: i64, y: i64, fill: [u8; 3]) -> CanvasResult<usize> {
    let (width, height) = image.dimensions();
    if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
        return Err(CanvasError::SeedOutOfBounds {
            x,
            y,
            width,
            height,
        });
    }
    let (sx, sy) = (x as u32, y as u32);

    let seed = image.get_pixel(sx, sy).0;
    let target = [seed[0], seed[1], seed[2]];
    if target == fill {
        return Ok(0);
    }

    let paint = Rgba([fill[0], fill[1], fill[2], 255]);
    let matches = |px: &Rgba<u8>| px.0[0] == target[0] && px.0[1] == target[1] && px.0[2] == target[2];

    // Paint before enqueueing: a repainted pixel no longer matches, so no
    // pixel is queued twice.
    let mut queue = VecDeque::new();
    image.put_pixel(sx, sy, paint);
    queue.push_back((sx, sy));
    let mut filled = 1;

    while let Some((cx, cy)) = queue.pop_front() {
        let neighbors = [
            (cx.checked_add(1).filter(|&nx| nx < width), Some(cy)),
            (cx.checked_sub(1), Some(cy)),
            (Some(cx), cy.checked_add(1).filter(|&ny| ny < height)),
            (Some(cx), cy.checked_sub(1)),
        ];
        for (nx, ny) in neighbors {
            let (Some(nx), Some(ny)) = (nx, ny) else {
                continue;
            };
            if matches(image.get_pixel(nx, ny)) {
                image.put_pixel(nx, ny, paint);
                queue.push_back((nx, ny));
                filled += 1;
            }
        }
    }

    Ok(filled)
}
