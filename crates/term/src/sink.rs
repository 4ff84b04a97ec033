//! Terminal render sink.
//!
//! Layout: a one-glyph border around the board, each board cell two glyphs
//! wide, and a status panel to the right of the border.

use std::io::{self, Write};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use tracing::warn;

use crate::engine::{RenderSink, Status};
use crate::fb::{CellStyle, FrameBuffer, Glyph};
use crate::renderer::TerminalRenderer;
use crate::types::{Rgb, BACKGROUND, BOARD_HEIGHT, BOARD_WIDTH};

/// Terminal columns per board cell
pub const CELL_COLUMNS: u16 = 2;

const BORDER: u16 = 1;
const PANEL_GAP: u16 = 2;
const PANEL_WIDTH: u16 = 14;

const BOARD_COLUMNS: u16 = BOARD_WIDTH as u16 * CELL_COLUMNS;
const BOARD_ROWS: u16 = BOARD_HEIGHT as u16;

/// Total frame size in glyphs
pub const FRAME_WIDTH: u16 = BOARD_COLUMNS + 2 * BORDER + PANEL_GAP + PANEL_WIDTH;
pub const FRAME_HEIGHT: u16 = BOARD_ROWS + 2 * BORDER;

const BORDER_STYLE: CellStyle = CellStyle {
    fg: Rgb::new(150, 150, 150),
    bg: BACKGROUND,
    bold: false,
};

const GRID_STYLE: CellStyle = CellStyle {
    fg: Rgb::new(60, 60, 60),
    bg: BACKGROUND,
    bold: false,
};

const LABEL_STYLE: CellStyle = CellStyle {
    fg: Rgb::new(220, 220, 220),
    bg: BACKGROUND,
    bold: true,
};

/// Top-left glyph of board cell (x, y)
pub fn cell_origin(x: usize, y: usize) -> (u16, u16) {
    (BORDER + x as u16 * CELL_COLUMNS, BORDER + y as u16)
}

struct Screen<W: Write> {
    fb: FrameBuffer,
    renderer: TerminalRenderer<W>,
}

impl<W: Write> Screen<W> {
    fn paint(&mut self, x: usize, y: usize, glyphs: [Glyph; CELL_COLUMNS as usize]) {
        if x >= BOARD_WIDTH || y >= BOARD_HEIGHT {
            return;
        }
        let (col, row) = cell_origin(x, y);
        for (i, glyph) in glyphs.into_iter().enumerate() {
            self.fb.set(col + i as u16, row, glyph);
        }
    }
}

fn block(color: Rgb) -> [Glyph; 2] {
    let glyph = Glyph {
        ch: ' ',
        style: CellStyle::solid(color),
    };
    [glyph, glyph]
}

fn grid() -> [Glyph; 2] {
    [
        Glyph {
            ch: ' ',
            style: GRID_STYLE,
        },
        Glyph {
            ch: '.',
            style: GRID_STYLE,
        },
    ]
}

/// Background frame: border plus an empty grid
fn background() -> FrameBuffer {
    let mut fb = FrameBuffer::new(FRAME_WIDTH, FRAME_HEIGHT);
    fb.clear(Glyph {
        ch: ' ',
        style: CellStyle::solid(BACKGROUND),
    });

    let right = BOARD_COLUMNS + BORDER;
    let bottom = BOARD_ROWS + BORDER;
    let edge = |ch| Glyph {
        ch,
        style: BORDER_STYLE,
    };
    fb.fill_rect(0, 0, right + 1, 1, edge('-'));
    fb.fill_rect(0, bottom, right + 1, 1, edge('-'));
    fb.fill_rect(0, 1, 1, BOARD_ROWS, edge('|'));
    fb.fill_rect(right, 1, 1, BOARD_ROWS, edge('|'));
    for corner in [(0, 0), (right, 0), (0, bottom), (right, bottom)] {
        fb.set(corner.0, corner.1, edge('+'));
    }

    let [left, dot] = grid();
    for y in 0..BOARD_HEIGHT {
        for x in 0..BOARD_WIDTH {
            let (col, row) = cell_origin(x, y);
            fb.set(col, row, left);
            fb.set(col + 1, row, dot);
        }
    }
    fb
}

/// [`RenderSink`] backed by a framebuffer and a [`TerminalRenderer`].
///
/// Paint calls only touch the framebuffer; `refresh` writes the diff.
pub struct TerminalSink<W: Write + Send = io::Stdout> {
    screen: Mutex<Screen<W>>,
}

impl TerminalSink<io::Stdout> {
    pub fn new() -> Self {
        Self::with_renderer(TerminalRenderer::new())
    }
}

impl Default for TerminalSink<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> TerminalSink<W> {
    pub fn with_renderer(renderer: TerminalRenderer<W>) -> Self {
        Self {
            screen: Mutex::new(Screen {
                fb: background(),
                renderer,
            }),
        }
    }

    fn with_screen<T>(&self, f: impl FnOnce(&mut Screen<W>) -> Result<T>) -> Result<T> {
        let mut screen = self
            .screen
            .lock()
            .map_err(|_| anyhow!("terminal sink lock poisoned"))?;
        f(&mut screen)
    }

    /// Enter raw mode and draw the background
    pub fn enter(&self) -> Result<()> {
        self.with_screen(|screen| {
            screen.renderer.enter()?;
            screen.renderer.invalidate();
            screen.renderer.present(&screen.fb)
        })
    }

    /// Restore the terminal
    pub fn exit(&self) -> Result<()> {
        self.with_screen(|screen| screen.renderer.exit())
    }

    /// Rewrite the status panel; shown on the next refresh
    pub fn set_status(&self, status: &Status) {
        let lines = [
            format!("Score  {:>6}", status.score),
            format!("Rows   {:>6}", status.rows_cleared),
            format!("Pieces {:>6}", status.pieces),
            String::new(),
            if status.is_over() {
                "GAME OVER".to_string()
            } else {
                String::new()
            },
            String::new(),
            "q  quit".to_string(),
        ];

        let result = self.with_screen(|screen| {
            let left = BOARD_COLUMNS + 2 * BORDER + PANEL_GAP;
            let blank = Glyph {
                ch: ' ',
                style: CellStyle::solid(BACKGROUND),
            };
            screen
                .fb
                .fill_rect(left, BORDER, PANEL_WIDTH, lines.len() as u16, blank);
            for (i, line) in lines.iter().enumerate() {
                screen.fb.put_str(left, BORDER + i as u16, line, LABEL_STYLE);
            }
            Ok(())
        });
        if let Err(err) = result {
            warn!(%err, "status update skipped");
        }
    }

    /// Copy of the current frame
    pub fn frame(&self) -> Option<FrameBuffer> {
        self.with_screen(|screen| Ok(screen.fb.clone())).ok()
    }
}

impl<W: Write + Send> RenderSink for TerminalSink<W> {
    fn draw_cell(&self, x: usize, y: usize, color: Rgb) {
        let _ = self.with_screen(|screen| {
            screen.paint(x, y, block(color));
            Ok(())
        });
    }

    fn erase_cell(&self, x: usize, y: usize) {
        let _ = self.with_screen(|screen| {
            screen.paint(x, y, grid());
            Ok(())
        });
    }

    fn refresh(&self) {
        let result = self.with_screen(|screen| screen.renderer.present(&screen.fb));
        if let Err(err) = result {
            warn!(%err, "terminal write failed");
        }
    }
}
