//! Plain data shared by the loader, scaler and compositor.

use crate::error::Error;
use crate::processing::color::Color;

/// Integer pair used for resolutions and pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Build a resolution from unsigned dimensions.
    ///
    /// # Errors
    /// Returns [`Error::InvariantViolation`] if either side does not fit an `i32`.
    pub fn from_dims(width: u32, height: u32) -> Result<Self, Error> {
        let x = i32::try_from(width)
            .map_err(|_| Error::InvariantViolation(format!("width {width} out of range")))?;
        let y = i32::try_from(height)
            .map_err(|_| Error::InvariantViolation(format!("height {height} out of range")))?;
        Ok(Self { x, y })
    }

    /// Number of pixels covered when read as a resolution.
    #[must_use]
    pub fn area(&self) -> usize {
        self.x.max(0) as usize * self.y.max(0) as usize
    }
}

/// A decoded image: resolution, channel count and owned pixel bytes.
///
/// The buffer always holds `width * height * channels` bytes; [`Image::new`]
/// refuses anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    resolution: Point,
    channels: u8,
    pixels: Vec<u8>,
}

impl Image {
    /// # Errors
    /// Returns [`Error::InvariantViolation`] for a channel count outside 1..=4,
    /// a negative resolution, or a buffer whose length does not match.
    pub fn new(resolution: Point, channels: u8, pixels: Vec<u8>) -> Result<Self, Error> {
        if !(1..=4).contains(&channels) {
            return Err(Error::InvariantViolation(format!(
                "channel count {channels} outside 1..=4"
            )));
        }
        if resolution.x < 0 || resolution.y < 0 {
            return Err(Error::InvariantViolation(format!(
                "negative resolution {}x{}",
                resolution.x, resolution.y
            )));
        }
        let expected = resolution.area() * usize::from(channels);
        if pixels.len() != expected {
            return Err(Error::InvariantViolation(format!(
                "pixel buffer holds {} bytes, expected {expected} for {}x{}x{channels}",
                pixels.len(),
                resolution.x,
                resolution.y
            )));
        }
        Ok(Self {
            resolution,
            channels,
            pixels,
        })
    }

    #[must_use]
    pub const fn resolution(&self) -> Point {
        self.resolution
    }

    #[must_use]
    pub const fn channels(&self) -> u8 {
        self.channels
    }

    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Raw channel bytes of the pixel at `(x, y)`, or `None` outside the image.
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> Option<&[u8]> {
        if x < 0 || y < 0 || x >= self.resolution.x || y >= self.resolution.y {
            return None;
        }
        let c = usize::from(self.channels);
        let offset = (y as usize * self.resolution.x as usize + x as usize) * c;
        self.pixels.get(offset..offset + c)
    }

    /// Color of the pixel at `(x, y)`.
    ///
    /// Gray images replicate luminance into R, G and B. Alpha comes from the
    /// last channel of two- and four-channel images and is opaque otherwise.
    #[must_use]
    pub fn color_at(&self, x: i32, y: i32) -> Option<Color> {
        let px = self.pixel(x, y)?;
        let color = match *px {
            [l] => Color::new(l, l, l, 0xff),
            [l, a] => Color::new(l, l, l, a),
            [r, g, b] => Color::new(r, g, b, 0xff),
            [r, g, b, a] => Color::new(r, g, b, a),
            _ => return None,
        };
        Some(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_buffer() {
        let err = Image::new(Point::new(2, 2), 3, vec![0; 11]).unwrap_err();
        assert!(matches!(err, Error::InvariantViolation(_)));
    }

    #[test]
    fn rejects_bad_channel_count() {
        assert!(Image::new(Point::new(1, 1), 5, vec![0; 5]).is_err());
        assert!(Image::new(Point::new(1, 1), 0, vec![]).is_err());
    }

    #[test]
    fn pixel_access_is_bounds_checked() {
        let img = Image::new(Point::new(2, 1), 1, vec![10, 20]).unwrap();
        assert_eq!(img.pixel(1, 0), Some(&[20u8][..]));
        assert_eq!(img.pixel(2, 0), None);
        assert_eq!(img.pixel(-1, 0), None);
        assert_eq!(img.pixel(0, 1), None);
    }

    #[test]
    fn color_mapping_by_channel_count() {
        let gray = Image::new(Point::new(1, 1), 1, vec![7]).unwrap();
        assert_eq!(gray.color_at(0, 0), Some(Color::new(7, 7, 7, 255)));

        let gray_alpha = Image::new(Point::new(1, 1), 2, vec![7, 9]).unwrap();
        assert_eq!(gray_alpha.color_at(0, 0), Some(Color::new(7, 7, 7, 9)));

        let rgb = Image::new(Point::new(1, 1), 3, vec![1, 2, 3]).unwrap();
        assert_eq!(rgb.color_at(0, 0), Some(Color::new(1, 2, 3, 255)));

        let rgba = Image::new(Point::new(1, 1), 4, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(rgba.color_at(0, 0), Some(Color::new(1, 2, 3, 4)));
    }
}
