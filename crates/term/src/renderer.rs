//! TerminalRenderer: flushes a framebuffer to a real terminal.
//!
//! Frames are encoded into a reusable byte buffer first and written with a
//! single `write_all`, so a frame never reaches the terminal half drawn.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{CellStyle, FrameBuffer, Rgb};

/// Owns the terminal session and the previously drawn frame.
///
/// Generic over the output so tests can render into a `Vec<u8>`.
pub struct TerminalRenderer<W: Write = io::Stdout> {
    out: W,
    prev: FrameBuffer,
    /// The next draw must repaint everything.
    stale: bool,
    buf: Vec<u8>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            prev: FrameBuffer::new(0, 0),
            stale: true,
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    /// Raw mode, alternate screen, hidden cursor.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        self.stale = true;
        Ok(())
    }

    /// Undo `enter`. Safe to call on an error path.
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

    /// Force the next draw to be a full redraw (e.g. after a resize).
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Draw `fb`, then swap it with the previous frame.
    ///
    /// After the call `fb` holds stale contents of matching size; the caller
    /// renders the next frame into it, so no frame is ever cloned.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        let resized = self.prev.width() != fb.width() || self.prev.height() != fb.height();

        self.buf.clear();
        if self.stale || resized {
            encode_full_into(fb, &mut self.buf)?;
            self.stale = false;
        } else {
            encode_diff_into(&self.prev, fb, &mut self.buf)?;
        }
        self.flush_buf()?;

        std::mem::swap(&mut self.prev, fb);
        fb.resize(self.prev.width(), self.prev.height());
        Ok(())
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    fn flush_buf(&mut self) -> Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        self.out.write_all(&self.buf)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Tracks the terminal's active colors so unchanged attributes are not re-sent.
#[derive(Default)]
struct Pen {
    current: Option<CellStyle>,
}

impl Pen {
    fn apply(&mut self, out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
        let prev = self.current;
        if prev == Some(style) {
            return Ok(());
        }

        let attrs_changed = prev.map_or(true, |p| p.bold != style.bold || p.dim != style.dim);
        if attrs_changed {
            // Reset also drops colors, so repaint both below.
            out.queue(SetAttribute(Attribute::Reset))?;
            if style.bold {
                out.queue(SetAttribute(Attribute::Bold))?;
            }
            if style.dim {
                out.queue(SetAttribute(Attribute::Dim))?;
            }
        }
        if attrs_changed || prev.map_or(true, |p| p.fg != style.fg) {
            out.queue(SetForegroundColor(rgb_to_color(style.fg)))?;
        }
        if attrs_changed || prev.map_or(true, |p| p.bg != style.bg) {
            out.queue(SetBackgroundColor(rgb_to_color(style.bg)))?;
        }

        self.current = Some(style);
        Ok(())
    }

    fn finish(self, out: &mut Vec<u8>) -> Result<()> {
        if self.current.is_some() {
            out.queue(ResetColor)?;
            out.queue(SetAttribute(Attribute::Reset))?;
        }
        Ok(())
    }
}

/// Encode a full-frame redraw into `out`.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let mut pen = Pen::default();
    let width = fb.width() as usize;
    if width == 0 {
        return Ok(());
    }
    for (y, row) in fb.cells().chunks(width).enumerate() {
        out.queue(cursor::MoveTo(0, y as u16))?;
        for cell in row {
            pen.apply(out, cell.style)?;
            out.queue(Print(cell.ch))?;
        }
    }
    pen.finish(out)
}

/// Encode only the cells that differ from `prev`.
///
/// Frames of different sizes fall back to a full redraw.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    if prev.width() != next.width() || prev.height() != next.height() {
        return encode_full_into(next, out);
    }

    let mut pen = Pen::default();
    for run in changed_runs(prev, next) {
        out.queue(cursor::MoveTo(run.x, run.y))?;
        for cell in &next.cells()[run.range(next.width())] {
            pen.apply(out, cell.style)?;
            out.queue(Print(cell.ch))?;
        }
    }
    pen.finish(out)
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// A horizontal span of changed cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    x: u16,
    y: u16,
    len: u16,
}

impl Run {
    fn range(&self, width: u16) -> std::ops::Range<usize> {
        let start = self.y as usize * width as usize + self.x as usize;
        start..start + self.len as usize
    }
}

/// Maximal runs of differing cells, row by row. Both frames must have the same size.
fn changed_runs<'a>(prev: &'a FrameBuffer, next: &'a FrameBuffer) -> impl Iterator<Item = Run> + 'a {
    let width = next.width().max(1) as usize;
    prev.cells()
        .chunks(width)
        .zip(next.cells().chunks(width))
        .enumerate()
        .flat_map(|(y, (a, b))| {
            let mut x = 0;
            std::iter::from_fn(move || {
                while x < b.len() && a[x] == b[x] {
                    x += 1;
                }
                if x == b.len() {
                    return None;
                }
                let start = x;
                while x < b.len() && a[x] != b[x] {
                    x += 1;
                }
                Some(Run {
                    x: start as u16,
                    y: y as u16,
                    len: (x - start) as u16,
                })
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fb::Cell;

    fn mark(fb: &mut FrameBuffer, x: u16, y: u16, ch: char) {
        fb.set(x, y, Cell::new(ch, CellStyle::default()));
    }

    #[test]
    fn test_changed_runs_coalesce_adjacent_cells() {
        let a = FrameBuffer::new(6, 2);
        let mut b = FrameBuffer::new(6, 2);
        for x in 1..=3 {
            mark(&mut b, x, 0, 'X');
        }
        mark(&mut b, 5, 0, 'Y');
        mark(&mut b, 0, 1, 'Z');

        let runs: Vec<Run> = changed_runs(&a, &b).collect();
        assert_eq!(
            runs,
            vec![
                Run { x: 1, y: 0, len: 3 },
                Run { x: 5, y: 0, len: 1 },
                Run { x: 0, y: 1, len: 1 },
            ]
        );
    }

    #[test]
    fn test_identical_frames_encode_no_cells() {
        let a = FrameBuffer::new(4, 2);
        let b = a.clone();
        let mut out = Vec::new();
        encode_diff_into(&a, &b, &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_diff_only_prints_changed_chars() {
        let a = FrameBuffer::new(8, 1);
        let mut b = a.clone();
        mark(&mut b, 2, 0, 'Q');

        let mut out = Vec::new();
        encode_diff_into(&a, &b, &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains('Q'));
        assert_eq!(text.matches(' ').count(), 0);
    }

    #[test]
    fn test_full_redraw_prints_every_cell() {
        let mut fb = FrameBuffer::new(3, 2);
        for (i, ch) in "abcdef".chars().enumerate() {
            mark(&mut fb, (i % 3) as u16, (i / 3) as u16, ch);
        }
        let mut out = Vec::new();
        encode_full_into(&fb, &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        for ch in "abcdef".chars() {
            assert!(text.contains(ch));
        }
    }

    #[test]
    fn test_draw_swap_diffs_after_first_frame() {
        let mut r = TerminalRenderer::with_writer(Vec::new());
        let mut fb = FrameBuffer::new(4, 1);
        mark(&mut fb, 0, 0, 'A');
        r.draw_swap(&mut fb).unwrap();
        let first = r.writer().len();
        assert!(first > 0);
        assert_eq!((fb.width(), fb.height()), (4, 1));

        // Same content again: nothing to send.
        fb.clear(Cell::default());
        mark(&mut fb, 0, 0, 'A');
        r.draw_swap(&mut fb).unwrap();
        assert_eq!(r.writer().len(), first);

        r.invalidate();
        fb.clear(Cell::default());
        mark(&mut fb, 0, 0, 'A');
        r.draw_swap(&mut fb).unwrap();
        assert!(r.writer().len() > first);
    }

    #[test]
    fn test_pen_skips_repeated_styles() {
        let mut pen = Pen::default();
        let mut out = Vec::new();
        pen.apply(&mut out, CellStyle::default()).unwrap();
        let once = out.len();
        pen.apply(&mut out, CellStyle::default()).unwrap();
        assert_eq!(out.len(), once);
    }
}
