//! GameView: lays a [`GameSnapshot`] out on a terminal framebuffer.
//!
//! Pure, no I/O. Board dimensions come from the snapshot, so every layout
//! preset renders through the same code.

use crate::core::GameSnapshot;
use crate::fb::{FrameBuffer, Glyph, Rgb, Style};
use crate::types::{Phase, PieceKind};

/// Length of one on/off phase of the cleared-row blink.
const BLINK_PHASE_MS: u32 = 100;

const PANEL_MIN_WIDTH: u16 = 12;

/// Widest accepted board cell, in columns.
const MAX_CELL_WIDTH: u16 = 4;

const WELL_BG: Rgb = Rgb::new(24, 24, 32);

/// Terminal size in character cells.
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

/// Board-cell to terminal-cell scaling plus the palette.
#[derive(Debug, Clone, Copy)]
pub struct GameView {
    /// Columns per board cell. 2 roughly squares up typical terminal glyphs.
    cell_w: u16,
    show_grid: bool,
}

impl Default for GameView {
    fn default() -> Self {
        Self {
            cell_w: 2,
            show_grid: true,
        }
    }
}

/// Where the well landed inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl Frame {
    fn inner_x(&self) -> u16 {
        self.x + 1
    }

    fn inner_y(&self) -> u16 {
        self.y + 1
    }
}

impl GameView {
    /// `cell_w` is clamped to `1..=4` columns.
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.clamp(1, MAX_CELL_WIDTH),
            ..Self::default()
        }
    }

    pub fn with_grid(mut self, show_grid: bool) -> Self {
        self.show_grid = show_grid;
        self
    }

    /// Render into a caller-owned framebuffer, resizing it to the viewport.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.fill(Glyph::default());

        let frame = self.frame_for(snap, viewport);
        self.draw_well(fb, frame, snap);

        // Locked cells, then the blink over freshly cleared rows.
        for y in 0..snap.height as u16 {
            let blinking = snap.is_clearing(y) && blink_on(snap.clear_remaining_ms);
            for x in 0..snap.width as u16 {
                if blinking {
                    self.paint(fb, frame, x, y, '▓', Style::new(Rgb::new(255, 255, 200), WELL_BG));
                    continue;
                }
                match snap.cell(x, y).and_then(PieceKind::from_id) {
                    Some(kind) => self.paint_block(fb, frame, x, y, kind),
                    None if self.show_grid => self.paint(
                        fb,
                        frame,
                        x,
                        y,
                        '·',
                        Style::new(Rgb::new(70, 70, 84), WELL_BG),
                    ),
                    None => {}
                }
            }
        }

        if snap.phase != Phase::GameOver {
            for (x, y) in snap.current.cells() {
                // Rows above the top stay hidden.
                if x >= 0 && y >= 0 && x < snap.width as i16 && y < snap.height as i16 {
                    self.paint_block(fb, frame, x as u16, y as u16, snap.current.kind);
                }
            }
        }

        self.draw_panel(fb, frame, snap, viewport);

        match snap.phase {
            Phase::Paused => self.draw_banner(fb, frame, "PAUSED"),
            Phase::GameOver => self.draw_banner(fb, frame, "GAME OVER"),
            Phase::Running => {}
        }
    }

    /// Allocating convenience wrapper over [`GameView::render_into`].
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn frame_for(&self, snap: &GameSnapshot, viewport: Viewport) -> Frame {
        let w = snap.width as u16 * self.cell_w + 2;
        let h = snap.height as u16 + 2;
        Frame {
            x: viewport.width.saturating_sub(w + PANEL_MIN_WIDTH + 2) / 2,
            y: viewport.height.saturating_sub(h) / 2,
            w,
            h,
        }
    }

    fn draw_well(&self, fb: &mut FrameBuffer, frame: Frame, snap: &GameSnapshot) {
        let border = Style::new(Rgb::new(190, 190, 200), Rgb::new(0, 0, 0));
        fb.fill_rect(
            frame.inner_x(),
            frame.inner_y(),
            snap.width as u16 * self.cell_w,
            snap.height as u16,
            ' ',
            Style::new(WELL_BG, WELL_BG),
        );

        let right = frame.x + frame.w - 1;
        let bottom = frame.y + frame.h - 1;
        for x in frame.x + 1..right {
            fb.put(x, frame.y, '─', border);
            fb.put(x, bottom, '─', border);
        }
        for y in frame.y + 1..bottom {
            fb.put(frame.x, y, '│', border);
            fb.put(right, y, '│', border);
        }
        fb.put(frame.x, frame.y, '┌', border);
        fb.put(right, frame.y, '┐', border);
        fb.put(frame.x, bottom, '└', border);
        fb.put(right, bottom, '┘', border);
    }

    fn paint(&self, fb: &mut FrameBuffer, frame: Frame, x: u16, y: u16, ch: char, style: Style) {
        fb.fill_rect(
            frame.inner_x() + x * self.cell_w,
            frame.inner_y() + y,
            self.cell_w,
            1,
            ch,
            style,
        );
    }

    fn paint_block(&self, fb: &mut FrameBuffer, frame: Frame, x: u16, y: u16, kind: PieceKind) {
        self.paint(fb, frame, x, y, '█', Style::new(piece_color(kind), WELL_BG));
    }

    fn draw_panel(&self, fb: &mut FrameBuffer, frame: Frame, snap: &GameSnapshot, viewport: Viewport) {
        let x = frame.x + frame.w + 2;
        if x.saturating_add(PANEL_MIN_WIDTH) > viewport.width {
            return;
        }

        let label = Style::default().bold();
        let value = Style::default();
        let mut y = frame.y;

        fb.put_str(x, y, "NEXT", label);
        y += 1;
        let preview = snap.next.shape;
        for (dx, dy) in preview.cells() {
            fb.fill_rect(
                x + dx as u16 * self.cell_w,
                y + dy as u16,
                self.cell_w,
                1,
                '█',
                Style::new(piece_color(snap.next.kind), Rgb::new(0, 0, 0)),
            );
        }
        y += preview.height() as u16 + 1;

        for (name, n) in [
            ("SCORE", snap.score),
            ("LEVEL", snap.level),
            ("LINES", snap.lines),
            ("BEST", snap.high_score),
        ] {
            fb.put_str(x, y, name, label);
            fb.put_u32(x, y + 1, n, value);
            y += 3;
        }
    }

    fn draw_banner(&self, fb: &mut FrameBuffer, frame: Frame, text: &str) {
        let len = text.chars().count() as u16;
        let x = frame.x + frame.w.saturating_sub(len) / 2;
        let y = frame.y + frame.h / 2;
        fb.put_str(
            x,
            y,
            text,
            Style::new(Rgb::new(255, 255, 255), Rgb::new(120, 30, 30)).bold(),
        );
    }
}

fn blink_on(remaining_ms: u32) -> bool {
    (remaining_ms / BLINK_PHASE_MS) % 2 == 0
}

fn piece_color(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::I => Rgb::new(80, 220, 220),
        PieceKind::O => Rgb::new(240, 220, 80),
        PieceKind::T => Rgb::new(200, 120, 220),
        PieceKind::L => Rgb::new(255, 165, 0),
        PieceKind::J => Rgb::new(80, 120, 220),
        PieceKind::S => Rgb::new(100, 220, 120),
        PieceKind::Z => Rgb::new(220, 80, 80),
    }
}
