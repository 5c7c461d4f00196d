//! Target grid sizing and resampling of the source image to one pixel per cell.

use crate::{Result, TermglyphError};
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Terminal cells are roughly twice as tall as wide, so rows get about
/// half the proportional count.
pub const DEFAULT_ASPECT_CORRECTION: f32 = 0.5;

pub const DEFAULT_SCALE: u32 = 4;

/// Largest grid `resample` will request from an image source.
pub const MAX_CELLS: usize = 1 << 26;

/// Interpolation kernel used when resizing to the cell grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    Nearest,
    Bilinear,
    Bicubic,
    Lanczos,
}

impl Filter {
    pub const ALL: [Filter; 4] = [Filter::Nearest, Filter::Bilinear, Filter::Bicubic, Filter::Lanczos];

    pub fn name(&self) -> &'static str {
        match self {
            Filter::Nearest => "nearest",
            Filter::Bilinear => "bilinear",
            Filter::Bicubic => "bicubic",
            Filter::Lanczos => "lanczos",
        }
    }
}

impl From<Filter> for FilterType {
    fn from(f: Filter) -> Self {
        match f {
            Filter::Nearest => FilterType::Nearest,
            Filter::Bilinear => FilterType::Triangle,
            Filter::Bicubic => FilterType::CatmullRom,
            Filter::Lanczos => FilterType::Lanczos3,
        }
    }
}

impl FromStr for Filter {
    type Err = TermglyphError;

    fn from_str(s: &str) -> Result<Self> {
        Filter::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| {
                TermglyphError::Config(format!(
                    "unknown filter '{}', expected one of nearest, bilinear, bicubic, lanczos",
                    s
                ))
            })
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sizing parameters. Explicit dimensions take priority over `scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sizing {
    pub scale: u32,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub aspect_correction: f32,
}

impl Default for Sizing {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            width: None,
            height: None,
            aspect_correction: DEFAULT_ASPECT_CORRECTION,
        }
    }
}

impl Sizing {
    pub fn validate(&self) -> Result<()> {
        if self.scale == 0 {
            return Err(TermglyphError::Config("scale must be greater than 0".into()));
        }
        if self.width == Some(0) {
            return Err(TermglyphError::Config("width must be greater than 0".into()));
        }
        if self.height == Some(0) {
            return Err(TermglyphError::Config("height must be greater than 0".into()));
        }
        if !self.aspect_correction.is_finite() || self.aspect_correction <= 0.0 {
            return Err(TermglyphError::Config(format!(
                "aspect correction must be a positive number, got {}",
                self.aspect_correction
            )));
        }
        Ok(())
    }
}

/// Output grid `(cols, rows)` for a source of `src_w` x `src_h` pixels.
///
/// Both explicit: used as-is. One explicit: the other follows the source
/// aspect ratio, corrected for cell shape. Neither: source divided by scale.
/// Never returns a zero dimension.
pub fn target_dimensions(src_w: u32, src_h: u32, sizing: &Sizing) -> Result<(u32, u32)> {
    sizing.validate()?;
    if src_w == 0 || src_h == 0 {
        return Err(TermglyphError::ImageSource(format!(
            "source image has no pixels ({}x{})",
            src_w, src_h
        )));
    }

    let (w, h) = (src_w as f64, src_h as f64);
    let aspect = sizing.aspect_correction as f64;
    let at_least_one = |v: f64| v.max(1.0).min(u32::MAX as f64) as u32;

    let dims = match (sizing.width, sizing.height) {
        (Some(cols), Some(rows)) => (cols, rows),
        (Some(cols), None) => (cols, at_least_one((h * (cols as f64 / w) * aspect).round())),
        (None, Some(rows)) => (at_least_one((w * (rows as f64 / h) / aspect).round()), rows),
        (None, None) => {
            let scale = sizing.scale as f64;
            ((src_w / sizing.scale).max(1), at_least_one((h / scale * aspect).floor()))
        }
    };
    Ok(dims)
}

/// Image collaborator: anything that knows its size and can hand back an
/// RGBA grid resized with one of the supported kernels.
pub trait PixelSource {
    fn dimensions(&self) -> (u32, u32);

    fn resized(&self, cols: u32, rows: u32, filter: Filter) -> Result<RgbaImage>;
}

impl PixelSource for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        RgbaImage::dimensions(self)
    }

    fn resized(&self, cols: u32, rows: u32, filter: Filter) -> Result<RgbaImage> {
        if RgbaImage::dimensions(self) == (cols, rows) {
            return Ok(self.clone());
        }
        Ok(imageops::resize(self, cols, rows, filter.into()))
    }
}

impl PixelSource for DynamicImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn resized(&self, cols: u32, rows: u32, filter: Filter) -> Result<RgbaImage> {
        self.to_rgba8().resized(cols, rows, filter)
    }
}

/// Resize `source` to exactly `cols` x `rows`, one sample per output cell.
pub fn resample<S: PixelSource + ?Sized>(
    source: &S,
    cols: u32,
    rows: u32,
    filter: Filter,
) -> Result<RgbaImage> {
    if cols == 0 || rows == 0 {
        return Err(TermglyphError::Config(format!(
            "target grid must be at least 1x1, got {}x{}",
            cols, rows
        )));
    }
    match (cols as usize).checked_mul(rows as usize) {
        Some(cells) if cells <= MAX_CELLS => {}
        _ => {
            return Err(TermglyphError::ImageSource(format!(
                "{}x{} grid exceeds the {} cell limit",
                cols, rows, MAX_CELLS
            )))
        }
    }
    let grid = source.resized(cols, rows, filter)?;
    if grid.dimensions() != (cols, rows) {
        return Err(TermglyphError::ImageSource(format!(
            "image source returned {}x{} pixels, requested {}x{}",
            grid.width(),
            grid.height(),
            cols,
            rows
        )));
    }
    tracing::trace!(cols, rows, %filter, "resampled source");
    Ok(grid)
}
