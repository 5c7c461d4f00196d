//! Render configuration: immutable once built, loadable from JSON.

use crate::color::{ColorModel, Rgb};
use crate::resample::{Filter, Sizing, DEFAULT_ASPECT_CORRECTION, DEFAULT_SCALE};
use crate::symbols::SymbolRamp;
use crate::{Result, TermglyphError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    symbols: SymbolRamp,
    scale: u32,
    width: Option<u32>,
    height: Option<u32>,
    color: bool,
    reverse: bool,
    background: Option<Rgb>,
    filter: Filter,
    aspect_correction: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            symbols: SymbolRamp::default(),
            scale: DEFAULT_SCALE,
            width: None,
            height: None,
            color: false,
            reverse: false,
            background: None,
            filter: Filter::default(),
            aspect_correction: DEFAULT_ASPECT_CORRECTION,
        }
    }
}

impl Config {
    pub fn new(symbols: SymbolRamp) -> Self {
        Self { symbols, ..Self::default() }
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config =
            serde_json::from_str(json).map_err(|e| TermglyphError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
            .map_err(|e| TermglyphError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| TermglyphError::Config(e.to_string()))
    }

    pub fn with_symbols(mut self, symbols: SymbolRamp) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_width(mut self, width: Option<u32>) -> Self {
        self.width = width;
        self
    }

    pub fn with_height(mut self, height: Option<u32>) -> Self {
        self.height = height;
        self
    }

    pub fn with_color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    pub fn with_reverse(mut self, enabled: bool) -> Self {
        self.reverse = enabled;
        self
    }

    pub fn with_background(mut self, background: Option<Rgb>) -> Self {
        self.background = background;
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_aspect_correction(mut self, aspect: f32) -> Self {
        self.aspect_correction = aspect;
        self
    }

    pub fn symbols(&self) -> &SymbolRamp {
        &self.symbols
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn width(&self) -> Option<u32> {
        self.width
    }

    pub fn height(&self) -> Option<u32> {
        self.height
    }

    pub fn color(&self) -> bool {
        self.color
    }

    pub fn reverse(&self) -> bool {
        self.reverse
    }

    pub fn background(&self) -> Option<Rgb> {
        self.background
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn aspect_correction(&self) -> f32 {
        self.aspect_correction
    }

    pub fn sizing(&self) -> Sizing {
        Sizing {
            scale: self.scale,
            width: self.width,
            height: self.height,
            aspect_correction: self.aspect_correction,
        }
    }

    pub fn color_model(&self) -> ColorModel {
        ColorModel::new(self.color, self.reverse, self.background)
    }

    /// Check every invariant. Ramp and colors are validated when parsed,
    /// so only sizing can still be wrong here.
    pub fn validate(&self) -> Result<()> {
        self.sizing().validate()
    }
}
