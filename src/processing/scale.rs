use fast_image_resize as fir;
use tracing::debug;

use crate::error::Error;
use crate::render::compose::surface_size;
use crate::types::{Image, Point};

/// How many surface-sized buffers a resampled image may occupy.
pub const MAX_SURFACE_MULTIPLE: usize = 4;

/// Largest resample output, in bytes, accepted for a given viewport.
#[must_use]
pub fn byte_budget(viewport: Point) -> usize {
    surface_size(viewport).saturating_mul(MAX_SURFACE_MULTIPLE)
}

/// Resample `image` to `target`, keeping its channel count.
///
/// The output buffer is sized up front, so a target needing more than
/// `max_bytes` is refused before anything is allocated.
///
/// # Errors
/// Returns [`Error::Resample`] for a non-positive or oversized target, or when
/// the resampler rejects the buffers. `image` is never modified.
pub fn resize(image: &Image, target: Point, max_bytes: usize) -> Result<Image, Error> {
    if target.x <= 0 || target.y <= 0 {
        return Err(Error::Resample(format!(
            "resize dimensions must be positive, got {}x{}",
            target.x, target.y
        )));
    }
    if image.resolution() == target {
        return Ok(image.clone());
    }
    let src = image.resolution();
    if src.x <= 0 || src.y <= 0 {
        return Err(Error::Resample(format!(
            "cannot resample empty image {}x{}",
            src.x, src.y
        )));
    }

    let needed = (target.x as usize)
        .checked_mul(target.y as usize)
        .and_then(|n| n.checked_mul(usize::from(image.channels())));
    match needed {
        Some(n) if n <= max_bytes => {}
        _ => {
            return Err(Error::Resample(format!(
                "{}x{} target exceeds the {max_bytes} byte budget",
                target.x, target.y
            )));
        }
    }

    let pixel_type = match image.channels() {
        1 => fir::PixelType::U8,
        2 => fir::PixelType::U8x2,
        3 => fir::PixelType::U8x3,
        4 => fir::PixelType::U8x4,
        other => {
            return Err(Error::InvariantViolation(format!(
                "image with {other} channels"
            )));
        }
    };

    let src_view =
        fir::images::ImageRef::new(src.x as u32, src.y as u32, image.pixels(), pixel_type)
            .map_err(|e| Error::Resample(format!("failed to create source view: {e}")))?;
    let mut dst_image = fir::images::Image::new(target.x as u32, target.y as u32, pixel_type);
    // Alpha is carried as a plain channel; nothing is premultiplied.
    let options = fir::ResizeOptions::new()
        .resize_alg(fir::ResizeAlg::Convolution(fir::FilterType::CatmullRom))
        .use_alpha(false);
    let mut resizer = fir::Resizer::new();
    resizer
        .resize(&src_view, &mut dst_image, Some(&options))
        .map_err(|e| Error::Resample(e.to_string()))?;

    debug!(
        from = %format_args!("{}x{}", src.x, src.y),
        to = %format_args!("{}x{}", target.x, target.y),
        channels = image.channels(),
        "resampled image"
    );
    Image::new(target, image.channels(), dst_image.into_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ScaleMode;
    use crate::processing::layout::target_dims;

    fn solid(w: i32, h: i32, px: &[u8]) -> Image {
        let pixels = px.repeat((w * h) as usize);
        Image::new(Point::new(w, h), px.len() as u8, pixels).unwrap()
    }

    #[test]
    fn preserves_channel_count() {
        for px in [&[9u8][..], &[9, 200], &[1, 2, 3], &[1, 2, 3, 4]] {
            let img = solid(8, 6, px);
            let out = resize(&img, Point::new(4, 3), usize::MAX).unwrap();
            assert_eq!(out.channels(), img.channels());
            assert_eq!(out.resolution(), Point::new(4, 3));
            assert_eq!(out.pixels().len(), 4 * 3 * px.len());
        }
    }

    #[test]
    fn solid_color_survives_upscale() {
        let img = solid(2, 2, &[10, 20, 30, 40]);
        let out = resize(&img, Point::new(5, 7), usize::MAX).unwrap();
        for chunk in out.pixels().chunks_exact(4) {
            let close = chunk.iter().zip([10u8, 20, 30, 40]).all(|(a, b)| a.abs_diff(b) <= 1);
            assert!(close, "{chunk:?}");
        }
    }

    #[test]
    fn zero_target_fails_without_touching_source() {
        let img = solid(3, 3, &[1, 2, 3]);
        let before = img.clone();
        let err = resize(&img, Point::new(0, 5), usize::MAX).unwrap_err();
        assert!(matches!(err, Error::Resample(_)));
        assert_eq!(img, before);
    }

    #[test]
    fn same_size_is_a_copy() {
        let img = solid(3, 2, &[5, 6]);
        assert_eq!(resize(&img, Point::new(3, 2), 0).unwrap(), img);
    }

    #[test]
    fn fill_of_thin_strip_is_refused_before_allocating() {
        let img = solid(1, 4000, &[1, 2, 3]);
        let viewport = Point::new(1920, 1080);
        let target = target_dims(img.resolution(), viewport, ScaleMode::Fill);
        assert_eq!(target, Point::new(1920, 7_680_000));

        let err = resize(&img, target, byte_budget(viewport)).unwrap_err();
        assert!(matches!(err, Error::Resample(_)), "{err}");
    }

    #[test]
    fn budget_is_inclusive() {
        let img = solid(2, 2, &[1, 2, 3]);
        // 3x3 RGB needs 27 bytes.
        let err = resize(&img, Point::new(3, 3), 26).unwrap_err();
        assert!(matches!(err, Error::Resample(_)));
        assert!(resize(&img, Point::new(3, 3), 27).is_ok());
    }

    #[test]
    fn target_within_budget_is_resampled() {
        let img = solid(4, 4, &[7]);
        let viewport = Point::new(4, 4);
        // 8x8 gray is 64 bytes; the budget is 4 * 64.
        let out = resize(&img, Point::new(8, 8), byte_budget(viewport)).unwrap();
        assert_eq!(out.resolution(), Point::new(8, 8));
    }
}
