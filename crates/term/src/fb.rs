//! Framebuffer and style types for terminal rendering.

use crate::types::Rgb;

/// Minimal per-glyph styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub fg: Rgb,
    pub bg: Rgb,
    pub bold: bool,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            fg: Rgb::new(220, 220, 220),
            bg: Rgb::new(0, 0, 0),
            bold: false,
        }
    }
}

impl CellStyle {
    /// Solid block of `color`
    pub const fn solid(color: Rgb) -> Self {
        Self {
            fg: color,
            bg: color,
            bold: false,
        }
    }
}

/// A single terminal character cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub style: CellStyle,
}

impl Default for Glyph {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: CellStyle::default(),
        }
    }
}

/// 2D framebuffer of styled glyphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    glyphs: Vec<Glyph>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            glyphs: vec![Glyph::default(); len],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    #[inline(always)]
    fn idx(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Glyph> {
        self.idx(x, y).map(|i| self.glyphs[i])
    }

    /// Out-of-range writes are ignored.
    pub fn set(&mut self, x: u16, y: u16, glyph: Glyph) {
        if let Some(i) = self.idx(x, y) {
            self.glyphs[i] = glyph;
        }
    }

    pub fn clear(&mut self, glyph: Glyph) {
        self.glyphs.fill(glyph);
    }

    pub fn put_str(&mut self, x: u16, y: u16, s: &str, style: CellStyle) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width {
                break;
            }
            self.set(cx, y, Glyph { ch, style });
            cx += 1;
        }
    }

    pub fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, glyph: Glyph) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x.saturating_add(dx), y.saturating_add(dy), glyph);
            }
        }
    }
}
