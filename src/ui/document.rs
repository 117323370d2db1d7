//! The landing page itself: sections, element roles and geometry.
//!
//! The document is laid out once per boot for either the wide or the narrow
//! layout class.  Blocks in the nav bar are `fixed` (screen-relative to the
//! nav area); everything else lives in document rows and scrolls.

use ratatui::layout::Rect;

use crate::core::elements::{ElementId, PageElements, Role};
use crate::core::scroll::ElementGeometry;

/// One laid-out element.
#[derive(Debug, Clone)]
pub struct Block {
    pub id: ElementId,
    pub role: Role,
    /// Document-space rectangle (nav-relative when `fixed`).
    pub rect: Rect,
    pub fixed: bool,
    /// Primary text (title, label, fragment line).
    pub text: String,
    /// Secondary text lines (card body).
    pub body: Vec<String>,
}

/// The laid-out page.
#[derive(Debug, Clone)]
pub struct PageDocument {
    pub elements: PageElements,
    pub blocks: Vec<Block>,
    pub width: u16,
    pub height: u16,
}

const HERO_LINES: &[&str] = &[
    "Motion that feels alive.",
    "Springs, tilt and reveals for the terminal age.",
    "Every frame earns its place — idle pages cost nothing.",
];

const STATS: &[(&str, Option<&str>, &str)] = &[
    ("120", Some("fps"), "frame budget"),
    ("98", Some("%"), "idle frames skipped"),
    ("2200", Some("ms"), "count-up"),
    ("16", Some("°"), "max tilt"),
];

const FEATURES: &[(&str, &[&str])] = &[
    ("Spring cursor", &["A dot that never lags,", "a ring that always catches up."]),
    ("Tilt card", &["Pointer or arrow keys —", "glare, shadow and depth follow."]),
    ("One-shot reveals", &["Cards appear once as you scroll.", "Scroll back; they stay put."]),
    ("Count-ups", &["Numbers ease in from zero", "and land exactly on target."]),
    ("Visibility aware", &["Lose focus and every loop", "pauses. Nothing catches up."]),
    ("Reduced motion", &["One flag and the page is", "calm, complete and readable."]),
];

const NAV_LINKS: &[&str] = &["Features", "Showcase", "Stats", "Contact"];

struct Builder {
    elements: PageElements,
    blocks: Vec<Block>,
}

impl Builder {
    fn add(&mut self, role: Role, rect: Rect, text: &str) -> ElementId {
        let id = self.elements.add(role);
        self.push(id, role, rect, text, false);
        id
    }

    fn add_fixed(&mut self, role: Role, rect: Rect, text: &str) -> ElementId {
        let id = self.elements.add(role);
        self.push(id, role, rect, text, true);
        id
    }

    fn push(&mut self, id: ElementId, role: Role, rect: Rect, text: &str, fixed: bool) {
        self.blocks.push(Block {
            id,
            role,
            rect,
            fixed,
            text: text.to_string(),
            body: Vec::new(),
        });
    }
}

/// Centre a box of `w` columns inside `width`.
fn centred(width: u16, w: u16) -> u16 {
    width.saturating_sub(w) / 2
}

impl PageDocument {
    /// Lay the page out for a terminal `width` columns wide.
    pub fn build(width: u16, narrow: bool) -> Self {
        let width = width.max(20);
        let mut b = Builder {
            elements: PageElements::new(),
            blocks: Vec::new(),
        };

        // ── fixed chrome ───────────────────────────────────────
        b.add_fixed(Role::CursorDot, Rect::default(), "");
        b.add_fixed(Role::CursorRing, Rect::default(), "");
        b.add_fixed(Role::NavBar, Rect::new(0, 0, width, 1), " ◆ drift");
        let toggle_w = 10;
        let toggle_x = width.saturating_sub(toggle_w + 1);
        b.add_fixed(Role::NavToggle, Rect::new(toggle_x, 0, toggle_w, 1), "[≡ menu]");
        for (i, link) in NAV_LINKS.iter().enumerate() {
            b.add_fixed(
                Role::NavLink,
                Rect::new(toggle_x, 1 + i as u16, toggle_w, 1),
                link,
            );
        }

        // ── hero ───────────────────────────────────────────────
        let mut y: u16 = 3;
        for line in HERO_LINES {
            let w = (line.chars().count() as u16).min(width);
            b.add(Role::HeroFragment, Rect::new(centred(width, w), y, w, 1), line);
            y += 2;
        }
        let cta = "[ Get started → ]";
        let cta_w = cta.chars().count() as u16;
        b.add(Role::Button, Rect::new(centred(width, cta_w), y + 1, cta_w, 1), cta);
        y += 6;

        // ── stats ──────────────────────────────────────────────
        let cols: u16 = if narrow { 2 } else { 4 };
        let rows = (STATS.len() as u16).div_ceil(cols);
        let stats_w = width.saturating_sub(4);
        let stats_h = rows * 3 + 2;
        b.add(
            Role::StatsContainer,
            Rect::new(2, y, stats_w, stats_h),
            " By the numbers ",
        );
        let cell_w = stats_w.saturating_sub(2) / cols;
        for (i, (target, suffix, label)) in STATS.iter().enumerate() {
            let (col, row) = (i as u16 % cols, i as u16 / cols);
            let rect = Rect::new(3 + col * cell_w, y + 1 + row * 3, cell_w, 2);
            let id = b.elements.add_stat(target, *suffix);
            b.push(id, Role::Stat, rect, label, false);
        }
        y += stats_h + 3;

        // ── tilt showcase ──────────────────────────────────────
        let stage_w = width.saturating_sub(4).min(72);
        let stage_h = 20;
        let stage_x = centred(width, stage_w);
        b.add(
            Role::TiltStage,
            Rect::new(stage_x, y, stage_w, stage_h),
            " Showcase — hover, or use ← ↑ → ↓ ",
        );
        let card_w = stage_w.saturating_sub(20).clamp(16, 40);
        let card_h = 10;
        let card = Rect::new(centred(width, card_w), y + (stage_h - card_h) / 2, card_w, card_h);
        let card_id = b.add(Role::TiltCard, card, "drift pro");
        if let Some(block) = b.blocks.iter_mut().find(|bl| bl.id == card_id) {
            block.body = vec![
                "spring-driven".to_string(),
                "glare · shadow · depth".to_string(),
            ];
        }
        b.add(Role::Shadow, card, "");
        b.add(Role::Glare, card, "");
        let layer_spots = [
            (card.x.saturating_sub(6), card.y + 1, "✦"),
            (card.right() + 4, card.y + 2, "◆"),
            (card.x.saturating_sub(3), card.bottom().saturating_sub(2), "●"),
        ];
        for (lx, ly, glyph) in layer_spots {
            b.add(Role::ParallaxLayer, Rect::new(lx, ly, 1, 1), glyph);
        }
        y += stage_h + 3;

        // ── feature cards (reveal targets) ─────────────────────
        let per_row: u16 = if narrow { 1 } else { 3 };
        let gap = 2;
        let feat_w = (width.saturating_sub(4) - gap * (per_row - 1)) / per_row;
        let feat_h = 6;
        for (i, (title, body)) in FEATURES.iter().enumerate() {
            let (col, row) = (i as u16 % per_row, i as u16 / per_row);
            let rect = Rect::new(2 + col * (feat_w + gap), y + row * (feat_h + 1), feat_w, feat_h);
            let id = b.add(Role::RevealTarget, rect, title);
            if let Some(block) = b.blocks.iter_mut().find(|bl| bl.id == id) {
                block.body = body.iter().map(|s| s.to_string()).collect();
            }
        }
        let feature_rows = (FEATURES.len() as u16).div_ceil(per_row);
        y += feature_rows * (feat_h + 1) + 2;

        // ── gallery ────────────────────────────────────────────
        let play = "[ ▶ Play demo ]";
        let play_w = play.chars().count() as u16;
        b.add(Role::PlayControl, Rect::new(centred(width, play_w), y, play_w, 1), play);
        y += 2;
        let thumbs: u16 = if narrow { 2 } else { 4 };
        let thumb_w = 12;
        let row_w = thumbs * thumb_w + (thumbs - 1) * gap;
        let thumb_x = centred(width, row_w);
        for i in 0..thumbs {
            b.add(
                Role::Thumbnail,
                Rect::new(thumb_x + i * (thumb_w + gap), y, thumb_w, 4),
                &format!("clip {}", i + 1),
            );
        }
        y += 7;

        // ── footer ─────────────────────────────────────────────
        // The marquee is decoration only; it is not a page element.
        y += 3;

        Self {
            elements: b.elements,
            blocks: b.blocks,
            width,
            height: y,
        }
    }

    pub fn block(&self, id: ElementId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn first(&self, role: Role) -> Option<&Block> {
        self.blocks.iter().find(|b| b.role == role)
    }

    pub fn all(&self, role: Role) -> impl Iterator<Item = &Block> + '_ {
        self.blocks.iter().filter(move |b| b.role == role)
    }

    /// Row where the footer marquee is drawn.
    pub fn footer_row(&self) -> u16 {
        self.height.saturating_sub(2)
    }

    /// Largest useful scroll offset for a viewport `viewport_h` rows tall.
    pub fn max_scroll(&self, viewport_h: u16) -> u16 {
        self.height.saturating_sub(viewport_h)
    }

    /// Innermost scrolling block under document point `(x, y)`.
    ///
    /// Later blocks are nested in or drawn above earlier ones, so the last
    /// match wins.  Decorative layers are not hit-testable.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<&Block> {
        self.blocks
            .iter()
            .filter(|b| !b.fixed && is_interactive(b.role))
            .filter(|b| point_in(b.rect, x, y))
            .last()
    }

    /// Fixed nav block under nav-relative point `(x, y)`.  Links only count
    /// while the menu is open.
    pub fn hit_test_nav(&self, x: u16, y: u16, nav_open: bool) -> Option<&Block> {
        self.blocks
            .iter()
            .filter(|b| b.fixed && (nav_open || b.role != Role::NavLink))
            .filter(|b| point_in(b.rect, x, y))
            .last()
    }
}

fn is_interactive(role: Role) -> bool {
    !matches!(role, Role::Glare | Role::Shadow | Role::ParallaxLayer)
}

fn point_in(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.right() && y >= rect.y && y < rect.bottom()
}

impl ElementGeometry for PageDocument {
    fn vertical_span(&self, id: ElementId) -> Option<(f64, f64)> {
        let block = self.block(id)?;
        if block.fixed {
            return None;
        }
        Some((block.rect.y as f64, block.rect.bottom() as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_role_the_modules_need_is_present() {
        let doc = PageDocument::build(120, false);
        for role in [
            Role::CursorDot,
            Role::CursorRing,
            Role::NavBar,
            Role::NavToggle,
            Role::HeroFragment,
            Role::StatsContainer,
            Role::Stat,
            Role::TiltStage,
            Role::TiltCard,
            Role::Glare,
            Role::Shadow,
            Role::ParallaxLayer,
            Role::PlayControl,
            Role::Thumbnail,
            Role::RevealTarget,
        ] {
            assert!(doc.elements.first(role).is_some(), "missing {role:?}");
        }
        assert_eq!(doc.elements.all(Role::ParallaxLayer).count(), 3);
    }

    #[test]
    fn stats_carry_parseable_declarations() {
        let doc = PageDocument::build(120, false);
        let parsed: Vec<u64> = doc
            .elements
            .all(Role::Stat)
            .filter_map(|id| doc.elements.stat_decl(id)?.ok())
            .map(|d| d.target)
            .collect();
        assert_eq!(parsed, vec![120, 98, 2200, 16]);
    }

    #[test]
    fn narrow_layout_stacks_features() {
        let wide = PageDocument::build(120, false);
        let narrow = PageDocument::build(60, true);
        let xs: Vec<u16> = narrow.all(Role::RevealTarget).map(|b| b.rect.x).collect();
        assert!(xs.iter().all(|&x| x == 2));
        assert!(narrow.height > wide.height);
    }

    #[test]
    fn hit_test_finds_innermost_block() {
        let doc = PageDocument::build(120, false);
        let card = doc.first(Role::TiltCard).unwrap().rect;
        let hit = doc.hit_test(card.x + 1, card.y + 1).unwrap();
        assert_eq!(hit.role, Role::TiltCard);

        let stage = doc.first(Role::TiltStage).unwrap().rect;
        let hit = doc.hit_test(stage.x + 1, stage.y + 1).unwrap();
        assert_eq!(hit.role, Role::TiltStage);
    }

    #[test]
    fn nav_links_only_hit_when_open() {
        let doc = PageDocument::build(120, false);
        let link = doc.first(Role::NavLink).unwrap().rect;
        assert!(doc.hit_test_nav(link.x, link.y, false).is_none());
        assert_eq!(
            doc.hit_test_nav(link.x, link.y, true).map(|b| b.role),
            Some(Role::NavLink)
        );
    }

    #[test]
    fn geometry_is_document_space() {
        let doc = PageDocument::build(120, false);
        let stage = doc.first(Role::TiltStage).unwrap();
        assert_eq!(
            doc.vertical_span(stage.id),
            Some((stage.rect.y as f64, stage.rect.bottom() as f64))
        );
        let nav = doc.first(Role::NavBar).unwrap();
        assert_eq!(doc.vertical_span(nav.id), None);
    }
}
