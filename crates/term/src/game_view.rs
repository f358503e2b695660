//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::snapshot::GameSnapshot;
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::types::{GRID_HEIGHT, GRID_WIDTH, PieceKind};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// A lightweight terminal renderer for the playfield and side panel.
pub struct GameView {
    /// Grid cell width in terminal columns.
    cell_w: u16,
    /// Grid cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self { cell_w, cell_h }
    }

    /// Render a game snapshot into a framebuffer.
    pub fn render(&self, snapshot: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        fb.clear(Cell {
            ch: ' ',
            style: CellStyle::default(),
        });

        let grid_px_w = (GRID_WIDTH as u16) * self.cell_w;
        let grid_px_h = (GRID_HEIGHT as u16) * self.cell_h;
        let frame_w = grid_px_w + 2;
        let frame_h = grid_px_h + 2;

        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = viewport.height.saturating_sub(frame_h) / 2;

        let bg = CellStyle {
            fg: Rgb::new(80, 80, 90),
            bg: Rgb::new(20, 20, 28),
            bold: false,
            dim: false,
        };
        let border = CellStyle {
            fg: Rgb::new(200, 200, 200),
            bg: Rgb::new(0, 0, 0),
            bold: false,
            dim: false,
        };

        // Background for play area.
        fb.fill_rect(start_x + 1, start_y + 1, grid_px_w, grid_px_h, ' ', bg);

        // Border.
        self.draw_border(&mut fb, start_x, start_y, frame_w, frame_h, border);

        // Locked stack. The grid is binary, so locked cells share one
        // neutral style regardless of the piece that placed them.
        for y in 0..GRID_HEIGHT as u16 {
            for x in 0..GRID_WIDTH as u16 {
                if snapshot.grid[y as usize][x as usize] != 0 {
                    self.draw_locked_cell(&mut fb, start_x, start_y, x, y);
                } else {
                    self.draw_empty_cell(&mut fb, start_x, start_y, x, y);
                }
            }
        }

        // Active piece, colored by kind.
        if let Some(active) = snapshot.active {
            for &(dx, dy) in active.shape.offsets().iter() {
                let x = active.x + dx;
                let y = active.y + dy;
                if x >= 0 && x < GRID_WIDTH as i8 && y >= 0 && y < GRID_HEIGHT as i8 {
                    self.draw_piece_cell(
                        &mut fb,
                        start_x,
                        start_y,
                        x as u16,
                        y as u16,
                        active.kind,
                    );
                }
            }
        }

        // Side panel (score/level/lines/controls).
        self.draw_side_panel(&mut fb, snapshot, viewport, start_x, start_y, frame_w);

        // Overlays.
        if snapshot.game_over {
            self.draw_overlay_text(&mut fb, start_x, start_y, frame_w, frame_h, "GAME OVER");
        } else if snapshot.paused {
            self.draw_overlay_text(&mut fb, start_x, start_y, frame_w, frame_h, "PAUSED");
        }

        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_empty_cell(&self, fb: &mut FrameBuffer, start_x: u16, start_y: u16, x: u16, y: u16) {
        let style = CellStyle {
            fg: Rgb::new(70, 70, 82),
            bg: Rgb::new(20, 20, 28),
            bold: false,
            dim: true,
        };
        self.fill_cell_rect(fb, start_x, start_y, x, y, '·', style);
    }

    fn draw_locked_cell(&self, fb: &mut FrameBuffer, start_x: u16, start_y: u16, x: u16, y: u16) {
        let style = CellStyle {
            fg: Rgb::new(150, 150, 160),
            bg: Rgb::new(20, 20, 28),
            bold: false,
            dim: false,
        };
        self.fill_cell_rect(fb, start_x, start_y, x, y, '█', style);
    }

    fn draw_piece_cell(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        x: u16,
        y: u16,
        kind: PieceKind,
    ) {
        let fg = match kind {
            PieceKind::I => Rgb::new(80, 220, 220),
            PieceKind::O => Rgb::new(240, 220, 80),
            PieceKind::T => Rgb::new(200, 120, 220),
            PieceKind::S => Rgb::new(100, 220, 120),
            PieceKind::Z => Rgb::new(220, 80, 80),
            PieceKind::J => Rgb::new(80, 120, 220),
            PieceKind::L => Rgb::new(255, 165, 0),
        };
        let style = CellStyle {
            fg,
            bg: Rgb::new(20, 20, 28),
            bold: true,
            dim: false,
        };
        self.fill_cell_rect(fb, start_x, start_y, x, y, '█', style);
    }

    fn fill_cell_rect(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        cell_x: u16,
        cell_y: u16,
        ch: char,
        style: CellStyle,
    ) {
        let px = start_x + 1 + cell_x * self.cell_w;
        let py = start_y + 1 + cell_y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snapshot: &GameSnapshot,
        viewport: Viewport,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
    ) {
        let panel_x = start_x.saturating_add(frame_w).saturating_add(2);
        if panel_x >= viewport.width {
            return;
        }
        let panel_w = viewport.width - panel_x;
        if panel_w < 12 {
            return;
        }

        let label = CellStyle {
            fg: Rgb::new(220, 220, 220),
            bg: Rgb::new(0, 0, 0),
            bold: true,
            dim: false,
        };
        let value = CellStyle {
            fg: Rgb::new(200, 200, 200),
            bg: Rgb::new(0, 0, 0),
            bold: false,
            dim: false,
        };
        let hint = CellStyle {
            fg: Rgb::new(160, 160, 160),
            bg: Rgb::new(0, 0, 0),
            bold: false,
            dim: true,
        };

        let mut y = start_y;
        fb.put_str(panel_x, y, "SCORE", label);
        y = y.saturating_add(1);
        fb.put_str(panel_x, y, &format!("{}", snapshot.score), value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "LEVEL", label);
        y = y.saturating_add(1);
        fb.put_str(panel_x, y, &format!("{}", snapshot.level), value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "LINES", label);
        y = y.saturating_add(1);
        fb.put_str(panel_x, y, &format!("{}", snapshot.lines), value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "CONTROLS", label);
        y = y.saturating_add(1);
        let legend = [
            "← →  move",
            "↓    drop one",
            "↑    rotate",
            "spc  hard drop",
            "p    pause",
            "r    restart",
            "q    quit",
        ];
        for line in legend {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, line, hint);
            y = y.saturating_add(1);
        }
    }

    fn draw_overlay_text(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        text: &str,
    ) {
        let mid_y = start_y.saturating_add(frame_h / 2);
        let text_w = text.chars().count() as u16;
        let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
        let style = CellStyle {
            fg: Rgb::new(255, 255, 255),
            bg: Rgb::new(0, 0, 0),
            bold: true,
            dim: false,
        };
        fb.put_str(x, mid_y, text, style);
    }
}
