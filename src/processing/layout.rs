use crate::options::{Position, ScaleMode};
use crate::types::Point;

/// Map a surface pixel to the image pixel drawn there.
///
/// No clamping: a result outside `[0, image)` means the pixel belongs to the
/// background.
#[must_use]
pub fn translate(position: Position, image: Point, surface: Point, dest: Point) -> Point {
    match position {
        Position::TopLeft => dest,
        Position::TopRight => Point::new(dest.x - (surface.x - image.x), dest.y),
        Position::BottomRight => Point::new(
            dest.x - (surface.x - image.x),
            dest.y - (surface.y - image.y),
        ),
        Position::BottomLeft => Point::new(dest.x, dest.y - (surface.y - image.y)),
        Position::Centered => Point::new(
            dest.x - (surface.x / 2 - image.x / 2),
            dest.y - (surface.y / 2 - image.y / 2),
        ),
    }
}

/// Dimensions `src` should be resampled to for the given scale mode.
#[must_use]
pub fn target_dims(src: Point, viewport: Point, mode: ScaleMode) -> Point {
    match mode {
        ScaleMode::Disabled => src,
        ScaleMode::Fill | ScaleMode::Fit if src.x <= 0 || src.y <= 0 => src,
        ScaleMode::Stretch => viewport,
        ScaleMode::Fill => {
            let scaled = resize_uniform(src, viewport, f64::max);
            Point::new(scaled.x.max(viewport.x), scaled.y.max(viewport.y))
        }
        ScaleMode::Fit => {
            let scaled = resize_uniform(src, viewport, f64::min);
            Point::new(scaled.x.min(viewport.x), scaled.y.min(viewport.y))
        }
    }
}

fn resize_uniform(src: Point, viewport: Point, pick: fn(f64, f64) -> f64) -> Point {
    let iw = f64::from(src.x);
    let ih = f64::from(src.y);
    let scale = pick(f64::from(viewport.x) / iw, f64::from(viewport.y) / ih);
    let scale = if scale.is_finite() { scale } else { 1.0 };
    let w = (iw * scale).round().clamp(1.0, f64::from(i32::MAX));
    let h = (ih * scale).round().clamp(1.0, f64::from(i32::MAX));
    Point::new(w as i32, h as i32)
}
