//! Truecolor ANSI escapes and the foreground/background policy.

use crate::{Result, TermglyphError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `ESC[38;2;r;g;bm`
    pub fn fg_code(&self) -> String {
        format!("\x1b[38;2;{};{};{}m", self.r, self.g, self.b)
    }

    /// `ESC[48;2;r;g;bm`
    pub fn bg_code(&self) -> String {
        format!("\x1b[48;2;{};{};{}m", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

/// Parses `r,g,b` (decimal, 0-255 each) or `#RRGGBB`.
impl FromStr for Rgb {
    type Err = TermglyphError;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || {
            TermglyphError::Config(format!(
                "invalid color '{}', expected r,g,b or #RRGGBB",
                s
            ))
        };
        let s_trim = s.trim();

        if let Some(hex) = s_trim.strip_prefix('#') {
            if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(malformed());
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| malformed());
            return Ok(Self::new(channel(0)?, channel(2)?, channel(4)?));
        }

        let parts: Vec<&str> = s_trim.split(',').map(str::trim).collect();
        match parts.as_slice() {
            [r, g, b] => {
                let channel = |p: &str| {
                    if p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()) {
                        return Err(malformed());
                    }
                    p.parse::<u8>().map_err(|_| malformed())
                };
                Ok(Self::new(channel(r)?, channel(g)?, channel(b)?))
            }
            _ => Err(malformed()),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = TermglyphError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

/// Terminal color state of one cell. `None` means the terminal default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pen {
    pub fg: Option<Rgb>,
    pub bg: Option<Rgb>,
}

impl Pen {
    pub fn is_plain(&self) -> bool {
        self.fg.is_none() && self.bg.is_none()
    }

    /// Appends the escapes that move the terminal from `self` to `to`
    /// and returns the new state.
    ///
    /// Components that stay the same are not re-emitted. A reset is only
    /// needed when `to` clears a component that `self` had set.
    pub(crate) fn transition(self, to: Pen, out: &mut String) -> Pen {
        let mut from = self;
        if (from.fg.is_some() && to.fg.is_none()) || (from.bg.is_some() && to.bg.is_none()) {
            out.push_str(RESET);
            from = Pen::default();
        }
        if to.fg != from.fg {
            if let Some(c) = to.fg {
                out.push_str(&c.fg_code());
            }
        }
        if to.bg != from.bg {
            if let Some(c) = to.bg {
                out.push_str(&c.bg_code());
            }
        }
        to
    }
}

/// Escapes wrapped around a single glyph.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Escapes {
    pub prefix: String,
    pub suffix: String,
}

/// Foreground/background policy for colored output.
///
/// | color | reverse | foreground           | background           |
/// |-------|---------|----------------------|----------------------|
/// | off   | any     | -                    | -                    |
/// | on    | off     | sample               | fixed background     |
/// | on    | on      | fixed bg (or black)  | sample               |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorModel {
    pub enabled: bool,
    pub reverse: bool,
    pub background: Option<Rgb>,
}

impl ColorModel {
    pub fn new(enabled: bool, reverse: bool, background: Option<Rgb>) -> Self {
        Self { enabled, reverse, background }
    }

    pub fn pen_for(&self, sample: Rgb) -> Pen {
        match (self.enabled, self.reverse) {
            (false, _) => Pen::default(),
            (true, false) => Pen { fg: Some(sample), bg: self.background },
            (true, true) => Pen {
                fg: Some(self.background.unwrap_or(Rgb::BLACK)),
                bg: Some(sample),
            },
        }
    }

    /// Uncoalesced escapes for one cell: set foreground, then background,
    /// then reset after the glyph.
    pub fn escapes_for(&self, sample: Rgb) -> Escapes {
        let pen = self.pen_for(sample);
        if pen.is_plain() {
            return Escapes::default();
        }
        let mut prefix = String::new();
        Pen::default().transition(pen, &mut prefix);
        Escapes { prefix, suffix: RESET.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: Rgb = Rgb::new(200, 100, 50);
    const BG: Rgb = Rgb::new(40, 40, 40);

    #[test]
    fn parses_triplet_and_hex() {
        assert_eq!("40,40,40".parse::<Rgb>().unwrap(), BG);
        assert_eq!(" 200 , 100,50 ".parse::<Rgb>().unwrap(), SAMPLE);
        assert_eq!("#C86432".parse::<Rgb>().unwrap(), SAMPLE);
        assert_eq!("#c86432".parse::<Rgb>().unwrap(), SAMPLE);
    }

    #[test]
    fn rejects_malformed_colors() {
        for bad in ["", "1,2", "1,2,3,4", "256,0,0", "-1,0,0", "a,b,c", "#12345", "#GG0000", "#+12345", "red", "+1,+2,+3", "1,2,+3", "1, ,3"] {
            assert!(
                matches!(bad.parse::<Rgb>(), Err(TermglyphError::Config(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn disabled_emits_nothing() {
        for reverse in [false, true] {
            let model = ColorModel::new(false, reverse, Some(BG));
            assert_eq!(model.escapes_for(SAMPLE), Escapes::default());
        }
    }

    #[test]
    fn color_without_background() {
        let model = ColorModel::new(true, false, None);
        let e = model.escapes_for(SAMPLE);
        assert_eq!(e.prefix, "\x1b[38;2;200;100;50m");
        assert_eq!(e.suffix, RESET);
    }

    #[test]
    fn color_with_fixed_background() {
        let model = ColorModel::new(true, false, Some(BG));
        let e = model.escapes_for(SAMPLE);
        assert_eq!(e.prefix, "\x1b[38;2;200;100;50m\x1b[48;2;40;40;40m");
        assert_eq!(e.suffix, RESET);
    }

    #[test]
    fn reverse_swaps_roles() {
        let model = ColorModel::new(true, true, Some(BG));
        let e = model.escapes_for(SAMPLE);
        assert_eq!(e.prefix, "\x1b[38;2;40;40;40m\x1b[48;2;200;100;50m");
        assert_eq!(e.suffix, RESET);
    }

    #[test]
    fn reverse_defaults_foreground_to_black() {
        let model = ColorModel::new(true, true, None);
        let pen = model.pen_for(SAMPLE);
        assert_eq!(pen.fg, Some(Rgb::BLACK));
        assert_eq!(pen.bg, Some(SAMPLE));
    }

    #[test]
    fn transition_skips_unchanged_components() {
        let a = Pen { fg: Some(SAMPLE), bg: Some(BG) };
        let b = Pen { fg: Some(Rgb::BLACK), bg: Some(BG) };
        let mut out = String::new();
        let state = a.transition(b, &mut out);
        assert_eq!(out, "\x1b[38;2;0;0;0m");
        assert_eq!(state, b);

        out.clear();
        b.transition(b, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn transition_resets_when_clearing() {
        let a = Pen { fg: Some(SAMPLE), bg: Some(BG) };
        let b = Pen { fg: Some(SAMPLE), bg: None };
        let mut out = String::new();
        a.transition(b, &mut out);
        assert_eq!(out, format!("{}\x1b[38;2;200;100;50m", RESET));
    }
}
