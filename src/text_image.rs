//! Addressable grid of rendered cells and its byte serialization.

use crate::color::{Pen, RESET};
use crate::{Result, TermglyphError};
use std::fmt;
use std::io::Write;

/// Approximate bytes of escapes per colored cell (fg + bg codes).
const COLOR_CELL_BYTES: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub pen: Pen,
}

impl Cell {
    pub fn plain(glyph: char) -> Self {
        Self { glyph, pen: Pen::default() }
    }

    pub fn new(glyph: char, pen: Pen) -> Self {
        Self { glyph, pen }
    }
}

/// Serialize one row: glyphs with coalesced escapes, reset if any color
/// is still active, then `\n`.
pub(crate) fn encode_row<'a>(cells: impl IntoIterator<Item = &'a Cell>, out: &mut String) {
    let mut pen = Pen::default();
    for cell in cells {
        pen = pen.transition(cell.pen, out);
        out.push(cell.glyph);
    }
    if !pen.is_plain() {
        out.push_str(RESET);
    }
    out.push('\n');
}

/// Dense `rows x cols` grid. Each cell may be written once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextImage {
    cols: u32,
    rows: u32,
    cells: Vec<Option<Cell>>,
}

impl TextImage {
    pub fn new(cols: u32, rows: u32) -> Result<Self> {
        if cols == 0 || rows == 0 {
            return Err(TermglyphError::Config(format!(
                "text image must be at least 1x1, got {}x{}",
                cols, rows
            )));
        }
        Ok(Self {
            cols,
            rows,
            cells: vec![None; cols as usize * rows as usize],
        })
    }

    /// Build from a complete row-major cell vector.
    pub(crate) fn from_cells(cols: u32, rows: u32, cells: Vec<Cell>) -> Result<Self> {
        let mut image = Self::new(cols, rows)?;
        if cells.len() != image.cells.len() {
            return Err(TermglyphError::Grid(format!(
                "{} cells do not fill a {}x{} grid",
                cells.len(),
                cols,
                rows
            )));
        }
        image.cells = cells.into_iter().map(Some).collect();
        Ok(image)
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    fn index(&self, row: u32, col: u32) -> Result<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(TermglyphError::Grid(format!(
                "cell ({}, {}) outside {}x{} grid",
                row, col, self.cols, self.rows
            )));
        }
        Ok(row as usize * self.cols as usize + col as usize)
    }

    pub fn set(&mut self, row: u32, col: u32, cell: Cell) -> Result<()> {
        let idx = self.index(row, col)?;
        let slot = &mut self.cells[idx];
        if slot.is_some() {
            return Err(TermglyphError::Grid(format!("cell ({}, {}) already written", row, col)));
        }
        *slot = Some(cell);
        Ok(())
    }

    /// `Ok(None)` for a cell that has not been written yet.
    pub fn get(&self, row: u32, col: u32) -> Result<Option<&Cell>> {
        Ok(self.cells[self.index(row, col)?].as_ref())
    }

    /// True while no cell has been written.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Glyphs of one row, colors dropped.
    pub fn row_text(&self, row: u32) -> Option<String> {
        self.row(row).map(|cells| cells.iter().map(|c| c.map_or(' ', |c| c.glyph)).collect())
    }

    fn row(&self, row: u32) -> Option<&[Option<Cell>]> {
        let cols = self.cols as usize;
        let start = row as usize * cols;
        self.cells.get(start..start + cols)
    }

    pub fn encoded_len_hint(&self) -> usize {
        let colored = self.cells.iter().flatten().filter(|c| !c.pen.is_plain()).count();
        self.cells.len() + self.rows as usize + colored * COLOR_CELL_BYTES
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }

    pub fn write_to<W: Write>(&self, mut out: W) -> Result<()> {
        out.write_all(self.to_string().as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

impl fmt::Display for TextImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let blank = Cell::plain(' ');
        let mut buf = String::with_capacity(self.encoded_len_hint());
        for row in self.cells.chunks(self.cols as usize) {
            encode_row(row.iter().map(|c| c.as_ref().unwrap_or(&blank)), &mut buf);
        }
        f.write_str(&buf)
    }
}
