use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::DynamicImage;
use tracing::debug;

use crate::error::Error;
use crate::types::{Image, Point};

/// Turns a path into a resident item. Decoding is synchronous and blocking.
pub trait Decode {
    type Output;

    /// # Errors
    /// Returns [`Error::Decode`] when the path cannot be turned into an item.
    fn decode(&self, path: &Path) -> Result<Self::Output, Error>;
}

/// Decoder backed by the `image` crate.
///
/// Keeps the source channel count (1 to 4), narrowing deeper formats to
/// 8 bits per channel, and applies the EXIF orientation tag when present.
#[derive(Debug, Clone, Copy)]
pub struct ImageDecoder {
    pub apply_exif_orientation: bool,
}

impl Default for ImageDecoder {
    fn default() -> Self {
        Self {
            apply_exif_orientation: true,
        }
    }
}

impl Decode for ImageDecoder {
    type Output = Image;

    fn decode(&self, path: &Path) -> Result<Image, Error> {
        let fail = |reason: String| Error::Decode {
            path: path.to_path_buf(),
            reason,
        };

        let img = image::ImageReader::open(path)
            .map_err(|e| fail(e.to_string()))?
            .with_guessed_format() // sniff based on content/extension
            .map_err(|e| fail(e.to_string()))?
            .decode()
            .map_err(|e| fail(e.to_string()))?;

        let img = if self.apply_exif_orientation {
            apply_orientation(img, read_orientation(path).unwrap_or(1))
        } else {
            img
        };

        let resolution = Point::from_dims(img.width(), img.height())?;
        let channels = img.color().channel_count();
        let pixels = match channels {
            1 => img.into_luma8().into_raw(),
            2 => img.into_luma_alpha8().into_raw(),
            3 => img.into_rgb8().into_raw(),
            _ => img.into_rgba8().into_raw(),
        };
        let image = Image::new(resolution, channels.min(4), pixels)?;
        debug!(
            path = %path.display(),
            width = resolution.x,
            height = resolution.y,
            channels = image.channels(),
            "decoded image"
        );
        Ok(image)
    }
}

// Unsupported orientation values fall through as-is.
fn apply_orientation(img: DynamicImage, orientation: u16) -> DynamicImage {
    match orientation {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        // transpose: rotate 90 then mirror
        5 => img.rotate90().fliph(),
        6 => img.rotate90(),
        // transverse: rotate 270 then mirror
        7 => img.rotate270().fliph(),
        8 => img.rotate270(),
        _ => img,
    }
}

fn read_orientation(path: &Path) -> Option<u16> {
    let file = File::open(path).ok()?;
    let mut buf = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut buf).ok()?;
    let field = exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?;
    let o = u16::try_from(field.value.get_uint(0)?).ok()?;
    debug!("exif orientation {} for {}", o, path.display());
    Some(o)
}
