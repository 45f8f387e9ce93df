use std::io::Write;

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::Print;

use crate::content::Labelled;
use crate::error::Result;
use crate::geometry::{Rect, Size};
use crate::layout::{LayoutFrame, RegionFrame};
use crate::width::{clip_to_width, display_width};

/// Preview parameters.
#[derive(Debug, Clone)]
pub struct PreviewSettings {
    /// Logical pixels covered by one terminal cell.
    pub cell_size: Size,
    /// Terminal origin the preview is drawn at.
    pub origin: (u16, u16),
    pub restore_cursor: Option<(u16, u16)>,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            cell_size: Size::new(8.0, 16.0),
            origin: (0, 0),
            restore_cursor: None,
        }
    }
}

/// A region snapped to terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub col: u16,
    pub row: u16,
    pub width: u16,
    pub height: u16,
}

/// Draws a layout frame as labelled boxes on a terminal.
pub struct PreviewRenderer {
    settings: PreviewSettings,
}

impl PreviewRenderer {
    pub fn new(settings: PreviewSettings) -> Self {
        Self { settings }
    }

    pub fn with_default() -> Self {
        Self::new(PreviewSettings::default())
    }

    pub fn settings_mut(&mut self) -> &mut PreviewSettings {
        &mut self.settings
    }

    /// Snap a logical rect to whole cells. `None` when it covers no cell.
    pub fn cells(&self, rect: Rect) -> Option<CellRect> {
        let Size {
            width: cell_w,
            height: cell_h,
        } = self.settings.cell_size;
        if cell_w <= 0.0 || cell_h <= 0.0 || !rect.is_finite() {
            return None;
        }

        let to_cell = |value: f64, cell: f64| (value / cell).round().clamp(0.0, u16::MAX as f64) as u16;
        let col = to_cell(rect.x, cell_w);
        let row = to_cell(rect.y, cell_h);
        let width = to_cell(rect.right(), cell_w).saturating_sub(col);
        let height = to_cell(rect.bottom(), cell_h).saturating_sub(row);
        if width == 0 || height == 0 {
            return None;
        }
        Some(CellRect {
            col: col.saturating_add(self.settings.origin.0),
            row: row.saturating_add(self.settings.origin.1),
            width,
            height,
        })
    }

    pub fn render<C: Labelled>(
        &self,
        writer: &mut impl Write,
        frame: &LayoutFrame<C>,
    ) -> Result<()> {
        for region in frame.regions.iter().filter(|region| region.visible) {
            if let Some(cells) = self.cells(region.rect) {
                render_region(writer, cells, &region_label(region))?;
            }
        }

        if let Some((row, col)) = self.settings.restore_cursor {
            queue!(writer, MoveTo(col, row))?;
        }

        writer.flush()?;
        Ok(())
    }
}

fn region_label<C: Labelled>(region: &RegionFrame<C>) -> String {
    region
        .top_child()
        .map(|child| child.content.label().to_string())
        .unwrap_or_else(|| region.slot.name().to_string())
}

fn render_region(writer: &mut impl Write, cells: CellRect, label: &str) -> Result<()> {
    let CellRect {
        col,
        row,
        width,
        height,
    } = cells;

    if width < 2 || height < 2 {
        let text = clip_to_width(label, width as usize);
        queue!(writer, MoveTo(col, row), Print(text))?;
        return Ok(());
    }

    let inner = (width - 2) as usize;
    let rule = "─".repeat(inner);
    queue!(writer, MoveTo(col, row), Print(format!("┌{rule}┐")))?;
    for offset in 1..height - 1 {
        queue!(
            writer,
            MoveTo(col, row + offset),
            Print(format!("│{}│", " ".repeat(inner)))
        )?;
    }
    queue!(
        writer,
        MoveTo(col, row + height - 1),
        Print(format!("└{rule}┘"))
    )?;

    let text = clip_to_width(label, inner);
    if display_width(&text) > 0 {
        let label_row = if height > 2 { row + 1 } else { row };
        queue!(writer, MoveTo(col + 1, label_row), Print(text))?;
    }
    Ok(())
}
