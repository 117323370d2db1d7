//! Custom Ratatui widgets that draw the landing page from a
//! [`PageDocument`] and the values the motion modules left in [`PageView`].

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    widgets::Widget,
};

use crate::core::elements::{ElementId, Role};
use crate::core::reveal::RevealPhase;
use crate::core::tilt::TiltFrame;

use super::document::{Block, PageDocument};
use super::theme::{self, Theme, CARD_FACE, GLARE_TINT};
use super::view::PageView;

const MARQUEE: &str = "  ✦ springs  ✦ tilt  ✦ reveals  ✦ count-ups  ✦ focus-aware loops  ✦ reduced motion";
/// Marquee speed, milliseconds per column.
const MARQUEE_MS_PER_COL: f64 = 90.0;
/// Glare falloff radius as a fraction of the card diagonal.
const GLARE_RADIUS: f64 = 0.6;

// ───────────────────────────────────────── canvas ────────────

/// Document-space drawing onto a scrolled viewport.  Everything outside
/// `area` is clipped.
struct Canvas<'b> {
    buf: &'b mut Buffer,
    area: Rect,
    scroll: i32,
}

impl Canvas<'_> {
    fn to_screen(&self, x: i32, y: i32) -> Option<Position> {
        let sx = self.area.x as i32 + x;
        let sy = self.area.y as i32 + y - self.scroll;
        let inside = sx >= self.area.x as i32
            && sx < self.area.right() as i32
            && sy >= self.area.y as i32
            && sy < self.area.bottom() as i32;
        inside.then(|| Position::new(sx as u16, sy as u16))
    }

    fn put(&mut self, x: i32, y: i32, text: &str, style: Style) {
        for (i, ch) in text.chars().enumerate() {
            if let Some(pos) = self.to_screen(x + i as i32, y) {
                if let Some(cell) = self.buf.cell_mut(pos) {
                    cell.set_char(ch).set_style(style);
                }
            }
        }
    }

    fn put_centred(&mut self, x: i32, y: i32, width: i32, text: &str, style: Style) {
        let len = text.chars().count() as i32;
        self.put(x + (width - len).max(0) / 2, y, text, style);
    }

    fn paint_bg(&mut self, x: i32, y: i32, width: i32, height: i32, bg: Color) {
        for row in y..y + height {
            for col in x..x + width {
                if let Some(pos) = self.to_screen(col, row) {
                    if let Some(cell) = self.buf.cell_mut(pos) {
                        cell.set_bg(bg);
                    }
                }
            }
        }
    }

    /// Rounded box outline with an optional title on the top edge.
    fn outline(&mut self, x: i32, y: i32, width: i32, height: i32, style: Style, title: Option<&str>) {
        if width < 2 || height < 2 {
            return;
        }
        let inner = (width - 2) as usize;
        let bottom = y + height - 1;
        self.put(x, y, &format!("╭{}╮", "─".repeat(inner)), style);
        for row in y + 1..bottom {
            self.put(x, row, "│", style);
            self.put(x + width - 1, row, "│", style);
        }
        self.put(x, bottom, &format!("╰{}╯", "─".repeat(inner)), style);
        if let Some(title) = title {
            self.put(x + 2, y, title, Theme::title_style());
        }
    }
}

fn dim_if(style: Style, dim: bool) -> Style {
    if dim {
        style.add_modifier(Modifier::DIM)
    } else {
        style
    }
}

// ───────────────────────────────────────── page ──────────────

/// The scrolling page body, created fresh each frame.
pub struct PageWidget<'a> {
    doc: &'a PageDocument,
    view: &'a PageView,
    scroll_y: u16,
    decor_ms: f64,
    hovered: Option<ElementId>,
}

impl<'a> PageWidget<'a> {
    pub fn new(doc: &'a PageDocument, view: &'a PageView) -> Self {
        Self {
            doc,
            view,
            scroll_y: 0,
            decor_ms: 0.0,
            hovered: None,
        }
    }

    pub fn scroll(mut self, scroll_y: u16) -> Self {
        self.scroll_y = scroll_y;
        self
    }

    /// Playback position of the footer marquee.
    pub fn decor_ms(mut self, ms: f64) -> Self {
        self.decor_ms = ms;
        self
    }

    pub fn hovered(mut self, id: Option<ElementId>) -> Self {
        self.hovered = id;
        self
    }

    fn is_hovered(&self, block: &Block) -> bool {
        self.hovered == Some(block.id)
    }

    fn draw_hero(&self, canvas: &mut Canvas<'_>) {
        for (i, block) in self.doc.all(Role::HeroFragment).enumerate() {
            let progress = self.view.entrance(block.id);
            if progress <= 0.0 {
                continue;
            }
            let drop = ((1.0 - progress) * 2.0).round() as i32;
            let base = if i == 0 {
                Theme::hero_style()
            } else {
                Theme::subtitle_style()
            };
            let r = block.rect;
            canvas.put(r.x as i32, r.y as i32 + drop, &block.text, dim_if(base, progress < 0.6));
        }
        for block in self.doc.all(Role::Button) {
            let style = if self.is_hovered(block) {
                Theme::button_style().add_modifier(Modifier::UNDERLINED)
            } else {
                Theme::button_style()
            };
            canvas.put(block.rect.x as i32, block.rect.y as i32, &block.text, style);
        }
    }

    fn draw_stats(&self, canvas: &mut Canvas<'_>) {
        if let Some(container) = self.doc.first(Role::StatsContainer) {
            let r = container.rect;
            canvas.outline(
                r.x as i32,
                r.y as i32,
                r.width as i32,
                r.height as i32,
                Theme::border_style(),
                Some(&container.text),
            );
        }
        for stat in self.doc.all(Role::Stat) {
            let r = stat.rect;
            let value = self.view.stat_text(stat.id).unwrap_or("—");
            canvas.put_centred(r.x as i32, r.y as i32, r.width as i32, value, Theme::stat_value_style());
            canvas.put_centred(
                r.x as i32,
                r.y as i32 + 1,
                r.width as i32,
                &stat.text,
                Theme::stat_label_style(),
            );
        }
    }

    fn draw_showcase(&self, canvas: &mut Canvas<'_>) {
        let (Some(stage), Some(card)) = (self.doc.first(Role::TiltStage), self.doc.first(Role::TiltCard))
        else {
            return;
        };
        let s = stage.rect;
        let stage_style = if self.is_hovered(stage) || self.is_hovered(card) {
            Theme::hovered_style()
        } else {
            Theme::border_style()
        };
        canvas.outline(
            s.x as i32,
            s.y as i32,
            s.width as i32,
            s.height as i32,
            stage_style,
            Some(&stage.text),
        );

        let layers: Vec<&Block> = self.doc.all(Role::ParallaxLayer).collect();
        let resting;
        let frame = match self.view.tilt() {
            Some(frame) => frame,
            None => {
                resting = TiltFrame::resting(layers.len());
                &resting
            }
        };
        let c = card.rect;

        // Shadow sits under the card, offset by the light direction.
        if self.doc.first(Role::Shadow).is_some() {
            let sx = c.x as i32 + (frame.shadow.offset_x / 4.0).round() as i32;
            let sy = c.y as i32 + (frame.shadow.offset_y / 9.0).round() as i32;
            canvas.paint_bg(sx, sy, c.width as i32, c.height as i32, theme::shadow_colour(frame.shadow.opacity));
        }

        self.draw_card(canvas, card, frame);

        for (block, offset) in layers.iter().zip(&frame.parallax) {
            let x = block.rect.x as i32 + (offset.x / 4.0).round() as i32;
            let y = block.rect.y as i32 + (offset.y / 6.0).round() as i32;
            canvas.put(x, y, &block.text, Theme::parallax_style());
        }
    }

    /// The card face, sheared row by row to suggest rotation, with a glare
    /// highlight blended into the background.
    fn draw_card(&self, canvas: &mut Canvas<'_>, card: &Block, frame: &TiltFrame) {
        let c = card.rect;
        let (w, h) = (c.width as i32, c.height as i32);
        if w < 4 || h < 3 {
            return;
        }
        let mid = (h - 1) as f64 / 2.0;
        let glare_on = self.doc.first(Role::Glare).is_some();
        let gx = frame.glare.x_pct / 100.0;
        let gy = frame.glare.y_pct / 100.0;

        for row in 0..h {
            let shear = frame.rotate_y * 0.3 - (row as f64 - mid) * frame.rotate_x * 0.1;
            let x0 = c.x as i32 + shear.round() as i32;
            let y = c.y as i32 + row;
            for col in 0..w {
                let fx = col as f64 / (w - 1) as f64;
                let fy = row as f64 / (h - 1) as f64;
                let glare = if glare_on {
                    let d = (fx - gx).hypot(fy - gy) / GLARE_RADIUS;
                    frame.glare.intensity * (1.0 - d).max(0.0)
                } else {
                    0.0
                };
                let ch = match (row, col) {
                    (0, 0) => '╭',
                    (0, x) if x == w - 1 => '╮',
                    (r, 0) if r == h - 1 => '╰',
                    (r, x) if r == h - 1 && x == w - 1 => '╯',
                    (0, _) => '─',
                    (r, _) if r == h - 1 => '─',
                    (_, 0) => '│',
                    (_, x) if x == w - 1 => '│',
                    _ => ' ',
                };
                if let Some(pos) = canvas.to_screen(x0 + col, y) {
                    if let Some(cell) = canvas.buf.cell_mut(pos) {
                        cell.set_char(ch)
                            .set_fg(Color::Gray)
                            .set_bg(theme::mix(CARD_FACE, GLARE_TINT, glare));
                    }
                }
            }
            let text_x = x0 + 1;
            let text_w = w - 2;
            if row == 2 {
                canvas.put_centred(text_x, y, text_w, &card.text, Theme::card_title_style());
            } else if row >= 4 {
                if let Some(line) = card.body.get((row - 4) as usize) {
                    canvas.put_centred(text_x, y, text_w, line, Theme::card_body_style());
                }
            }
        }
    }

    fn draw_features(&self, canvas: &mut Canvas<'_>) {
        for block in self.doc.all(Role::RevealTarget) {
            if self.view.reveal_phase(block.id) == RevealPhase::Hidden {
                continue;
            }
            let progress = self.view.reveal_progress(block.id);
            let rise = ((1.0 - progress) * 3.0).round() as i32;
            let faded = progress < 0.5;
            let r = block.rect;
            let (x, y) = (r.x as i32, r.y as i32 + rise);
            canvas.outline(x, y, r.width as i32, r.height as i32, dim_if(Theme::border_style(), faded), None);
            canvas.put(x + 2, y + 1, &block.text, dim_if(Theme::card_title_style(), faded));
            for (i, line) in block.body.iter().enumerate() {
                canvas.put(x + 2, y + 3 + i as i32, line, dim_if(Theme::card_body_style(), faded));
            }
        }
    }

    fn draw_gallery(&self, canvas: &mut Canvas<'_>) {
        for block in self.doc.all(Role::PlayControl) {
            let style = if self.is_hovered(block) {
                Theme::hovered_style()
            } else {
                Theme::title_style()
            };
            canvas.put(block.rect.x as i32, block.rect.y as i32, &block.text, style);
        }
        for block in self.doc.all(Role::Thumbnail) {
            let r = block.rect;
            let style = if self.is_hovered(block) {
                Theme::hovered_style()
            } else {
                Theme::border_style()
            };
            canvas.outline(r.x as i32, r.y as i32, r.width as i32, r.height as i32, style, None);
            canvas.put_centred(
                r.x as i32,
                r.y as i32 + r.height as i32 / 2,
                r.width as i32,
                &block.text,
                Theme::card_body_style(),
            );
        }
    }

    fn draw_marquee(&self, canvas: &mut Canvas<'_>) {
        let glyphs: Vec<char> = MARQUEE.chars().collect();
        let shift = (self.decor_ms / MARQUEE_MS_PER_COL) as usize;
        let width = canvas.area.width as usize;
        let line: String = (0..width)
            .map(|i| glyphs[(i + shift) % glyphs.len()])
            .collect();
        canvas.put(0, self.doc.footer_row() as i32, &line, Theme::marquee_style());
    }
}

impl Widget for PageWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let mut canvas = Canvas {
            buf,
            area,
            scroll: self.scroll_y as i32,
        };
        self.draw_hero(&mut canvas);
        self.draw_stats(&mut canvas);
        self.draw_showcase(&mut canvas);
        self.draw_features(&mut canvas);
        self.draw_gallery(&mut canvas);
        self.draw_marquee(&mut canvas);

        render_scrollbar(
            area,
            self.doc.height as usize,
            self.scroll_y as usize,
            area.height as usize,
            canvas.buf,
        );
    }
}

// ───────────────────────────────────────── nav ───────────────

/// The fixed nav bar plus its drop-down when open.
pub struct NavWidget<'a> {
    doc: &'a PageDocument,
    open: bool,
    hovered: Option<ElementId>,
}

impl<'a> NavWidget<'a> {
    pub fn new(doc: &'a PageDocument, open: bool) -> Self {
        Self {
            doc,
            open,
            hovered: None,
        }
    }

    pub fn hovered(mut self, id: Option<ElementId>) -> Self {
        self.hovered = id;
        self
    }
}

impl Widget for NavWidget<'_> {
    /// `area` starts at the nav row and extends over the page so the
    /// drop-down can overlap it.
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let mut canvas = Canvas {
            buf,
            area,
            scroll: 0,
        };
        canvas.paint_bg(0, 0, area.width as i32, 1, Color::Rgb(24, 26, 40));
        for block in self.doc.blocks.iter().filter(|b| b.fixed) {
            let style = match block.role {
                Role::NavBar => Theme::nav_style().add_modifier(Modifier::BOLD),
                Role::NavToggle if self.hovered == Some(block.id) => {
                    Theme::nav_style().add_modifier(Modifier::REVERSED)
                }
                Role::NavToggle => Theme::nav_style(),
                Role::NavLink if self.open => {
                    if self.hovered == Some(block.id) {
                        Theme::nav_link_style().add_modifier(Modifier::REVERSED)
                    } else {
                        Theme::nav_link_style()
                    }
                }
                _ => continue,
            };
            let r = block.rect;
            if block.role == Role::NavLink {
                canvas.paint_bg(r.x as i32, r.y as i32, r.width as i32, 1, Color::Rgb(40, 44, 66));
                canvas.put(r.x as i32 + 1, r.y as i32, &block.text, style);
            } else {
                canvas.put(r.x as i32, r.y as i32, &block.text, style);
            }
        }
    }
}

// ─── scrollbar ──────────────────────────────────────────────────

fn render_scrollbar(area: Rect, total: usize, offset: usize, visible: usize, buf: &mut Buffer) {
    if total <= visible || area.height < 2 || area.width == 0 {
        return;
    }
    let x = area.x + area.width.saturating_sub(1);
    let h = area.height as f64;
    let thumb_sz = ((visible as f64 / total as f64) * h).ceil().max(1.0) as u16;
    let max_off = total.saturating_sub(visible) as f64;
    let thumb_pos = if max_off > 0.0 {
        ((offset as f64 / max_off) * (h - thumb_sz as f64)).round() as u16
    } else {
        0
    };

    for row in 0..area.height {
        let y = area.y + row;
        let is_thumb = row >= thumb_pos && row < thumb_pos + thumb_sz;
        let (ch, fg) = if is_thumb {
            ('█', Theme::scrollbar_thumb())
        } else {
            ('│', Theme::scrollbar_track())
        };
        if let Some(cell) = buf.cell_mut(Position::new(x, y)) {
            cell.set_char(ch).set_fg(fg);
        }
    }
}
