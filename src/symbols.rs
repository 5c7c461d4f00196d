//! Glyph ramps - ordered glyph sets mapping intensity to a character.

use crate::{Result, TermglyphError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default ramp, lightest to densest.
pub const DEFAULT_SYMBOLS: &str = " .,-~!;:=*&%$@#";

/// Ordered glyphs: index 0 is the lowest intensity, the last the highest.
///
/// Duplicates are kept, a repeated glyph simply widens its intensity band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SymbolRamp {
    glyphs: Vec<char>,
}

impl SymbolRamp {
    pub fn new(glyphs: impl IntoIterator<Item = char>) -> Result<Self> {
        let glyphs: Vec<char> = glyphs.into_iter().collect();
        if glyphs.is_empty() {
            return Err(TermglyphError::Config("symbol ramp is empty".into()));
        }
        // A control glyph (newline, escape) would corrupt the line structure
        if let Some(c) = glyphs.iter().find(|c| c.is_control()) {
            return Err(TermglyphError::Config(format!(
                "symbol ramp contains control character {:?}",
                c
            )));
        }
        Ok(Self { glyphs })
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Always false, `new` rejects empty ramps. Pairs with `len`.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }

    /// Index for an intensity in [0, 1], rounding half up.
    ///
    /// Out of range intensities are clamped, NaN maps to 0.
    pub fn index_for(&self, intensity: f32) -> usize {
        let max = self.glyphs.len() - 1;
        if intensity.is_nan() {
            return 0;
        }
        let scaled = intensity.clamp(0.0, 1.0) * max as f32;
        ((scaled + 0.5).floor() as usize).min(max)
    }

    pub fn glyph_for(&self, intensity: f32) -> char {
        self.glyphs[self.index_for(intensity)]
    }
}

impl Default for SymbolRamp {
    fn default() -> Self {
        Self {
            glyphs: DEFAULT_SYMBOLS.chars().collect(),
        }
    }
}

impl FromStr for SymbolRamp {
    type Err = TermglyphError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s.chars())
    }
}

impl TryFrom<String> for SymbolRamp {
    type Error = TermglyphError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<SymbolRamp> for String {
    fn from(ramp: SymbolRamp) -> Self {
        ramp.glyphs.into_iter().collect()
    }
}

impl fmt::Display for SymbolRamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.glyphs.iter().try_for_each(|c| write!(f, "{}", c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_map_to_first_and_last() {
        for ramp in [" #", "AB", " .:#@", DEFAULT_SYMBOLS, " ░▒▓█"] {
            let ramp: SymbolRamp = ramp.parse().unwrap();
            assert_eq!(ramp.glyph_for(0.0), ramp.glyphs()[0]);
            assert_eq!(ramp.glyph_for(1.0), *ramp.glyphs().last().unwrap());
        }
    }

    #[test]
    fn single_glyph_ramp_is_valid() {
        let ramp: SymbolRamp = "█".parse().unwrap();
        assert_eq!(ramp.glyph_for(0.0), '█');
        assert_eq!(ramp.glyph_for(0.5), '█');
        assert_eq!(ramp.glyph_for(1.0), '█');
    }

    #[test]
    fn empty_ramp_is_rejected() {
        assert!(matches!(
            "".parse::<SymbolRamp>(),
            Err(TermglyphError::Config(_))
        ));
    }

    #[test]
    fn control_glyph_is_rejected() {
        assert!(matches!(
            " \n#".parse::<SymbolRamp>(),
            Err(TermglyphError::Config(_))
        ));
    }

    #[test]
    fn rounds_half_up() {
        // 3 glyphs: 0.25 * 2 = 0.5 exactly, must land on the middle glyph
        let ramp: SymbolRamp = "abc".parse().unwrap();
        assert_eq!(ramp.index_for(0.25), 1);
        assert_eq!(ramp.index_for(0.2499), 0);
        assert_eq!(ramp.index_for(0.75), 2);
        assert_eq!(ramp.index_for(0.7499), 1);
    }

    #[test]
    fn out_of_range_is_clamped() {
        let ramp: SymbolRamp = " .:#@".parse().unwrap();
        assert_eq!(ramp.glyph_for(-3.0), ' ');
        assert_eq!(ramp.glyph_for(7.0), '@');
        assert_eq!(ramp.glyph_for(f32::NAN), ' ');
    }

    #[test]
    fn mapping_is_monotonic() {
        let ramp = SymbolRamp::default();
        let mut prev = 0;
        for i in 0..=1000 {
            let idx = ramp.index_for(i as f32 / 1000.0);
            assert!(idx >= prev, "not monotonic at {}", i);
            prev = idx;
        }
        assert_eq!(prev, ramp.len() - 1);
    }

    #[test]
    fn string_round_trip_keeps_order_and_duplicates() {
        let ramp: SymbolRamp = "..##".parse().unwrap();
        assert_eq!(ramp.len(), 4);
        assert_eq!(ramp.to_string(), "..##");
    }
}
