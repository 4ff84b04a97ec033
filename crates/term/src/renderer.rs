//! TerminalRenderer: flushes a framebuffer to a terminal.
//!
//! The first frame (and any frame after a size change or `invalidate`) is a
//! full redraw; after that only runs of changed glyphs are written.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{CellStyle, FrameBuffer};
use crate::types::Rgb;

pub struct TerminalRenderer<W: Write = io::Stdout> {
    out: W,
    last: Option<FrameBuffer>,
    buf: Vec<u8>,
}

impl TerminalRenderer<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for TerminalRenderer<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            last: None,
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    /// Raw mode, alternate screen, hidden cursor
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next frame to be a full redraw.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Write `fb`, diffed against the previously presented frame.
    pub fn present(&mut self, fb: &FrameBuffer) -> Result<()> {
        self.buf.clear();
        match self.last.as_mut() {
            Some(prev) if prev.width() == fb.width() && prev.height() == fb.height() => {
                encode_diff_into(prev, fb, &mut self.buf)?;
                prev.clone_from(fb);
            }
            _ => {
                encode_full_into(fb, &mut self.buf)?;
                self.last = Some(fb.clone());
            }
        }
        self.flush_buf()
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.out.write_all(&self.buf)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Encode a full-frame redraw into `out`.
fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    out.queue(cursor::MoveTo(0, 0))?;

    let mut current_style: Option<CellStyle> = None;
    for y in 0..fb.height() {
        for x in 0..fb.width() {
            let glyph = fb.get(x, y).unwrap_or_default();
            if current_style != Some(glyph.style) {
                apply_style_into(out, glyph.style)?;
                current_style = Some(glyph.style);
            }
            out.queue(Print(glyph.ch))?;
        }
        if y + 1 < fb.height() {
            out.queue(Print("\r\n"))?;
        }
    }

    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

/// Encode the changed runs between two frames of equal size into `out`.
///
/// Writes nothing when the frames are identical.
fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut current_style: Option<CellStyle> = None;

    for_each_changed_run(prev, next, |x, y, len| {
        out.queue(cursor::MoveTo(x, y))?;
        for dx in 0..len {
            let glyph = next.get(x + dx, y).unwrap_or_default();
            if current_style != Some(glyph.style) {
                apply_style_into(out, glyph.style)?;
                current_style = Some(glyph.style);
            }
            out.queue(Print(glyph.ch))?;
        }
        Ok(())
    })?;

    if current_style.is_some() {
        out.queue(ResetColor)?;
        out.queue(SetAttribute(Attribute::Reset))?;
    }
    Ok(())
}

fn apply_style_into(out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
    out.queue(SetForegroundColor(rgb_to_color(style.fg)))?;
    out.queue(SetBackgroundColor(rgb_to_color(style.bg)))?;
    out.queue(SetAttribute(Attribute::Reset))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    Ok(())
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

fn for_each_changed_run(
    prev: &FrameBuffer,
    next: &FrameBuffer,
    mut f: impl FnMut(u16, u16, u16) -> Result<()>,
) -> Result<()> {
    if prev.width() != next.width() || prev.height() != next.height() {
        for y in 0..next.height() {
            f(0, y, next.width())?;
        }
        return Ok(());
    }

    let w = next.width();
    for y in 0..next.height() {
        let mut x = 0;
        while x < w {
            if prev.get(x, y) == next.get(x, y) {
                x += 1;
                continue;
            }

            let start = x;
            x += 1;
            while x < w && prev.get(x, y) != next.get(x, y) {
                x += 1;
            }
            f(start, y, x - start)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fb::Glyph;

    fn glyph(ch: char) -> Glyph {
        Glyph {
            ch,
            style: CellStyle::default(),
        }
    }

    #[test]
    fn changed_run_iterator_coalesces_adjacent_cells() {
        let a = FrameBuffer::new(5, 1);
        let mut b = FrameBuffer::new(5, 1);
        for x in 1..=3 {
            b.set(x, 0, glyph('X'));
        }

        let mut runs = Vec::new();
        for_each_changed_run(&a, &b, |x, y, len| {
            runs.push((x, y, len));
            Ok(())
        })
        .unwrap();
        assert_eq!(runs, vec![(1, 0, 3)]);
    }

    #[test]
    fn identical_frames_encode_nothing() {
        let fb = FrameBuffer::new(4, 3);
        let mut out = Vec::new();
        encode_diff_into(&fb, &fb.clone(), &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn present_diffs_after_first_frame() {
        let mut renderer = TerminalRenderer::with_writer(Vec::new());
        let mut fb = FrameBuffer::new(6, 2);

        renderer.present(&fb).unwrap();
        let full = renderer.out.len();
        assert!(full > 0);

        renderer.present(&fb).unwrap();
        assert_eq!(renderer.out.len(), full, "unchanged frame writes nothing");

        fb.set(2, 1, glyph('Z'));
        renderer.present(&fb).unwrap();
        let written = &renderer.out[full..];
        assert!(String::from_utf8_lossy(written).contains('Z'));
    }
}
