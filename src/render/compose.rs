//! Full-surface compositing of one image against a background policy.

use rayon::prelude::*;

use crate::error::Error;
use crate::options::{Background, Position};
use crate::processing::layout::translate;
use crate::types::{Image, Point};

/// Bytes per surface pixel (B, G, R, A).
pub const BYTES_PER_PIXEL: usize = 4;

/// Byte size of a surface with the given resolution.
#[must_use]
pub fn surface_size(resolution: Point) -> usize {
    resolution.area() * BYTES_PER_PIXEL
}

/// Produce a new surface buffer showing `image` placed per `position`.
///
/// The output starts as a copy of `current`, so with [`Background::Disabled`]
/// pixels outside the image keep their previous content. Rows are filled in
/// parallel; every pixel depends only on its own coordinate.
///
/// # Errors
/// Returns [`Error::InvariantViolation`] if `current` is not exactly the size
/// of a `surface`-sized buffer.
pub fn render(
    image: &Image,
    surface: Point,
    current: &[u8],
    position: Position,
    background: Background,
) -> Result<Vec<u8>, Error> {
    let expected = surface_size(surface);
    if current.len() != expected {
        return Err(Error::InvariantViolation(format!(
            "surface buffer holds {} bytes, expected {expected} for {}x{}",
            current.len(),
            surface.x,
            surface.y
        )));
    }

    let mut out = current.to_vec();
    if expected == 0 {
        return Ok(out);
    }
    let fill = background.color().map(|c| c.to_bgra());
    let im = image.resolution();
    let stride = surface.x as usize * BYTES_PER_PIXEL;

    out.par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y_, row)| {
            for (x_, px) in row.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
                let dest = Point::new(x_ as i32, y_ as i32);
                let src = translate(position, im, surface, dest);
                match image.color_at(src.x, src.y) {
                    Some(color) => px.copy_from_slice(&color.to_bgra()),
                    None => {
                        if let Some(bg) = fill {
                            px.copy_from_slice(&bg);
                        }
                    }
                }
            }
        });

    Ok(out)
}
