use std::fmt;
use std::fs::{File, OpenOptions};
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use memmap2::{MmapMut, MmapOptions};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::Error;
use crate::render::compose::{BYTES_PER_PIXEL, surface_size};
use crate::render::surface::{Surface, check_frame_len};
use crate::types::Point;

const FB_DEV_BASE: &str = "/dev/fb";
const FB_CLASS_GLOB: &str = "/sys/class/graphics/fb[0-9]*";
const FBIOGET_VSCREENINFO: libc::c_ulong = 0x4600;

/// Which framebuffer to open.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FramebufferId {
    /// `/dev/fb<index>`
    Index(u32),
    Path(PathBuf),
}

impl FramebufferId {
    #[must_use]
    pub fn device_path(&self) -> PathBuf {
        match self {
            Self::Index(idx) => PathBuf::from(format!("{FB_DEV_BASE}{idx}")),
            Self::Path(p) => p.clone(),
        }
    }
}

impl FromStr for FramebufferId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::UnknownOption {
                kind: "framebuffer",
                value: s.to_string(),
                expected: "an index or a device path".into(),
            });
        }
        Ok(match s.parse::<u32>() {
            Ok(idx) => Self::Index(idx),
            Err(_) => Self::Path(PathBuf::from(s)),
        })
    }
}

impl fmt::Display for FramebufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.device_path().display())
    }
}

/// Path of the lowest-numbered framebuffer registered in sysfs.
///
/// # Errors
/// Returns [`Error::ResourceUnavailable`] if no framebuffer is registered.
pub fn default_device() -> Result<PathBuf, Error> {
    let entries = glob::glob(FB_CLASS_GLOB)
        .map_err(|e| Error::ResourceUnavailable(format!("bad framebuffer glob: {e}")))?;
    let lowest = entries
        .flatten()
        .filter_map(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.strip_prefix("fb"))
                .and_then(|n| n.parse::<u32>().ok())
        })
        .min()
        .ok_or_else(|| Error::ResourceUnavailable("no framebuffers found".into()))?;
    debug!(index = lowest, "discovered default framebuffer");
    Ok(FramebufferId::Index(lowest).device_path())
}

#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
struct FbBitfield {
    offset: u32,
    length: u32,
    msb_right: u32,
}

/// Mirror of the kernel's `struct fb_var_screeninfo`.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
struct FbVarScreeninfo {
    xres: u32,
    yres: u32,
    xres_virtual: u32,
    yres_virtual: u32,
    xoffset: u32,
    yoffset: u32,
    bits_per_pixel: u32,
    grayscale: u32,
    red: FbBitfield,
    green: FbBitfield,
    blue: FbBitfield,
    transp: FbBitfield,
    nonstd: u32,
    activate: u32,
    height: u32,
    width: u32,
    accel_flags: u32,
    pixclock: u32,
    left_margin: u32,
    right_margin: u32,
    upper_margin: u32,
    lower_margin: u32,
    hsync_len: u32,
    vsync_len: u32,
    sync: u32,
    vmode: u32,
    rotate: u32,
    colorspace: u32,
    reserved: [u32; 4],
}

/// A mapped Linux framebuffer device.
///
/// The mapping is released and the device closed when this is dropped.
pub struct Framebuffer {
    path: PathBuf,
    resolution: Point,
    map: MmapMut,
    // Held open for the lifetime of the mapping.
    _file: File,
}

impl fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Framebuffer")
            .field("path", &self.path)
            .field("resolution", &self.resolution)
            .field("byte_size", &self.map.len())
            .finish()
    }
}

impl Framebuffer {
    /// Open and map the framebuffer at `path`.
    ///
    /// # Errors
    /// Returns [`Error::ResourceUnavailable`] if the device cannot be opened,
    /// queried or mapped, and [`Error::UnsupportedDepth`] for any depth other
    /// than 32 bits per pixel.
    pub fn open(path: &Path) -> Result<Self, Error> {
        let unavailable =
            |what: &str, e: std::io::Error| Error::ResourceUnavailable(format!("{what} {}: {e}", path.display()));

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| unavailable("failed to open", e))?;

        let mut vinfo = FbVarScreeninfo::default();
        // SAFETY: FBIOGET_VSCREENINFO fills a `fb_var_screeninfo`, which
        // `FbVarScreeninfo` mirrors field for field.
        let rc = unsafe {
            libc::ioctl(
                file.as_raw_fd(),
                FBIOGET_VSCREENINFO as _,
                &mut vinfo as *mut FbVarScreeninfo,
            )
        };
        if rc < 0 {
            return Err(unavailable(
                "FBIOGET_VSCREENINFO failed on",
                std::io::Error::last_os_error(),
            ));
        }

        if vinfo.bits_per_pixel as usize != BYTES_PER_PIXEL * 8 {
            return Err(Error::UnsupportedDepth {
                bits_per_pixel: vinfo.bits_per_pixel,
            });
        }

        let resolution = Point::from_dims(vinfo.xres, vinfo.yres)?;
        let size = surface_size(resolution);
        if size == 0 {
            return Err(Error::ResourceUnavailable(format!(
                "{} reports an empty resolution",
                path.display()
            )));
        }

        // SAFETY: the mapping is shared with the kernel's framebuffer and only
        // ever accessed through this struct, which owns the file handle.
        let map = unsafe { MmapOptions::new().len(size).map_mut(&file) }
            .map_err(|e| unavailable("failed to map", e))?;

        info!(
            device = %path.display(),
            width = resolution.x,
            height = resolution.y,
            bytes = size,
            "framebuffer opened"
        );
        Ok(Self {
            path: path.to_path_buf(),
            resolution,
            map,
            _file: file,
        })
    }
}

impl Surface for Framebuffer {
    fn resolution(&self) -> Point {
        self.resolution
    }

    fn bytes(&self) -> &[u8] {
        &self.map
    }

    fn write_frame(&mut self, frame: &[u8]) -> Result<(), Error> {
        check_frame_len(frame, self.map.len())?;
        self.map.copy_from_slice(frame);
        Ok(())
    }

    fn clear(&mut self) {
        self.map.fill(0);
        debug!(device = %self.path.display(), "framebuffer cleared");
    }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        info!(device = %self.path.display(), "framebuffer released");
    }
}
