//! Image to terminal text converter: one glyph per cell, optional truecolor.

pub mod color;
pub mod config;
pub mod resample;
pub mod symbols;
pub mod text_image;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use color::{ColorModel, Escapes, Pen, Rgb};
pub use config::Config;
pub use resample::{target_dimensions, Filter, PixelSource, Sizing};
pub use symbols::SymbolRamp;
pub use text_image::{Cell, TextImage};

use image::RgbaImage;
#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;
use std::io::Write;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TermglyphError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Image source error: {0}")]
    ImageSource(String),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Text image error: {0}")]
    Grid(String),
}

pub type Result<T> = std::result::Result<T, TermglyphError>;

/// BT.601 luma of an RGB sample, normalized to [0, 1].
pub fn intensity(rgb: Rgb) -> f32 {
    let luma = 0.299 * rgb.r as f32 + 0.587 * rgb.g as f32 + 0.114 * rgb.b as f32;
    (luma / 255.0).clamp(0.0, 1.0)
}

/// Render engine. Holds a validated config and nothing else, so repeated
/// renders of the same image are byte-identical.
#[derive(Debug, Clone)]
pub struct Converter {
    config: Config,
    colors: ColorModel,
}

impl Converter {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let colors = config.color_model();
        Ok(Self { config, colors })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Output grid `(cols, rows)` for `image`.
    pub fn dimensions<S: PixelSource + ?Sized>(&self, image: &S) -> Result<(u32, u32)> {
        let (w, h) = image.dimensions();
        target_dimensions(w, h, &self.config.sizing())
    }

    fn cell_for(&self, px: &image::Rgba<u8>) -> Cell {
        let [r, g, b, _] = px.0;
        let sample = Rgb::new(r, g, b);
        Cell::new(
            self.config.symbols().glyph_for(intensity(sample)),
            self.colors.pen_for(sample),
        )
    }

    fn sampled<S: PixelSource + ?Sized>(&self, image: &S) -> Result<RgbaImage> {
        let (cols, rows) = self.dimensions(image)?;
        let (w, h) = image.dimensions();
        tracing::debug!(
            src_w = w,
            src_h = h,
            cols,
            rows,
            filter = %self.config.filter(),
            color = self.config.color(),
            reverse = self.config.reverse(),
            "rendering"
        );
        resample::resample(image, cols, rows, self.config.filter())
    }

    fn shade_row(&self, grid: &RgbaImage, y: u32, out: &mut [Cell]) {
        for (x, cell) in out.iter_mut().enumerate() {
            *cell = self.cell_for(grid.get_pixel(x as u32, y));
        }
    }

    fn shade(&self, grid: &RgbaImage) -> Vec<Cell> {
        let cols = grid.width() as usize;
        let mut cells = vec![Cell::plain(' '); cols * grid.height() as usize];

        #[cfg(not(target_arch = "wasm32"))]
        cells
            .par_chunks_mut(cols)
            .enumerate()
            .for_each(|(y, row)| self.shade_row(grid, y as u32, row));

        #[cfg(target_arch = "wasm32")]
        cells
            .chunks_mut(cols)
            .enumerate()
            .for_each(|(y, row)| self.shade_row(grid, y as u32, row));

        cells
    }

    /// Render into a new `TextImage` sized to the target grid.
    pub fn convert<S: PixelSource + ?Sized>(&self, image: &S) -> Result<TextImage> {
        let grid = self.sampled(image)?;
        TextImage::from_cells(grid.width(), grid.height(), self.shade(&grid))
    }

    /// Render into a caller-owned, still empty `TextImage`.
    ///
    /// The sink must be blank and have the target grid's dimensions;
    /// nothing is written otherwise.
    pub fn render_into<S: PixelSource + ?Sized>(&self, image: &S, sink: &mut TextImage) -> Result<()> {
        let (cols, rows) = self.dimensions(image)?;
        if (sink.cols(), sink.rows()) != (cols, rows) {
            return Err(TermglyphError::Config(format!(
                "sink is {}x{}, render target is {}x{}",
                sink.cols(),
                sink.rows(),
                cols,
                rows
            )));
        }
        if !sink.is_blank() {
            return Err(TermglyphError::Config("sink already holds written cells".into()));
        }
        let grid = self.sampled(image)?;
        for (row, cells) in self.shade(&grid).chunks(cols as usize).enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                sink.set(row as u32, col as u32, *cell)?;
            }
        }
        Ok(())
    }

    /// Stream rows to `out` top to bottom as they are shaded.
    ///
    /// All configuration and image errors surface before the first byte is
    /// written.
    pub fn render_to<S: PixelSource + ?Sized, W: Write>(&self, image: &S, mut out: W) -> Result<()> {
        let grid = self.sampled(image)?;
        let cols = grid.width() as usize;
        let mut row = vec![Cell::plain(' '); cols];
        let mut line = String::new();
        for y in 0..grid.height() {
            self.shade_row(&grid, y, &mut row);
            line.clear();
            text_image::encode_row(&row, &mut line);
            out.write_all(line.as_bytes())?;
            tracing::trace!(row = y, "row written");
        }
        out.flush()?;
        Ok(())
    }
}

/// One-shot convenience over [`Converter`].
pub fn render<S: PixelSource + ?Sized>(config: &Config, image: &S) -> Result<TextImage> {
    Converter::new(config.clone())?.convert(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn intensity_extremes() {
        assert_eq!(intensity(Rgb::BLACK), 0.0);
        assert!((intensity(Rgb::new(255, 255, 255)) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn intensity_weights_green_most() {
        let r = intensity(Rgb::new(255, 0, 0));
        let g = intensity(Rgb::new(0, 255, 0));
        let b = intensity(Rgb::new(0, 0, 255));
        assert!(g > r && r > b);
        assert!((r - 0.299).abs() < 1e-4);
    }

    #[test]
    fn converter_rejects_invalid_config() {
        let config = Config::default().with_scale(0);
        assert!(matches!(Converter::new(config), Err(TermglyphError::Config(_))));
    }

    #[test]
    fn render_into_rejects_mismatched_sink() {
        let image = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255]));
        let converter = Converter::new(Config::default()).unwrap();
        let mut sink = TextImage::new(5, 5).unwrap();
        assert!(matches!(
            converter.render_into(&image, &mut sink),
            Err(TermglyphError::Config(_))
        ));
        assert_eq!(sink.get(0, 0).unwrap(), None);
    }

    #[test]
    fn render_into_rejects_partly_written_sink() {
        let image = RgbaImage::from_pixel(2, 1, Rgba([255, 255, 255, 255]));
        let config = Config::new(" #".parse().unwrap()).with_width(Some(2)).with_height(Some(1));
        let converter = Converter::new(config).unwrap();
        let mut sink = TextImage::new(2, 1).unwrap();
        sink.set(0, 1, Cell::plain('x')).unwrap();
        assert!(matches!(
            converter.render_into(&image, &mut sink),
            Err(TermglyphError::Config(_))
        ));
        assert_eq!(sink.get(0, 0).unwrap(), None);
        assert_eq!(sink.get(0, 1).unwrap(), Some(&Cell::plain('x')));
    }

    #[test]
    fn huge_explicit_grid_is_source_error() {
        let image = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        let config = Config::default().with_width(Some(u32::MAX)).with_height(Some(u32::MAX));
        let converter = Converter::new(config).unwrap();
        assert!(matches!(converter.convert(&image), Err(TermglyphError::ImageSource(_))));

        let mut out: Vec<u8> = Vec::new();
        assert!(matches!(
            converter.render_to(&image, &mut out),
            Err(TermglyphError::ImageSource(_))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn alpha_is_ignored() {
        let config = Config::new(" #".parse().unwrap()).with_scale(1).with_width(Some(1)).with_height(Some(1));
        let transparent = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 0]));
        assert_eq!(render(&config, &transparent).unwrap().to_string(), "#\n");
    }
}
