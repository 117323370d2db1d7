//! The presentation-tree contract: which elements exist and in what role.
//!
//! Modules never see layout or rendering; they look elements up by [`Role`]
//! and get back opaque [`ElementId`]s to address presentation writes.

use thiserror::Error;

/// Opaque identity of one element on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

/// What an element is for.  Lookups are by role, never by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    CursorDot,
    CursorRing,
    NavBar,
    NavToggle,
    NavLink,
    HeroFragment,
    StatsContainer,
    Stat,
    TiltStage,
    TiltCard,
    Glare,
    Shadow,
    ParallaxLayer,
    PlayControl,
    Thumbnail,
    RevealTarget,
    Button,
}

/// Declared count-up value of a [`Role::Stat`] element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatDecl {
    pub target: u64,
    pub suffix: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatParseError {
    #[error("stat target `{0}` is not an integer")]
    NotAnInteger(String),
    #[error("stat target is zero or negative")]
    NothingToAnimate,
}

impl StatDecl {
    /// Parse a declared target such as `"120"` with an optional suffix.
    pub fn parse(raw_target: &str, suffix: Option<&str>) -> Result<Self, StatParseError> {
        let raw = raw_target.trim();
        let value: i64 = raw
            .parse()
            .map_err(|_| StatParseError::NotAnInteger(raw.to_string()))?;
        if value <= 0 {
            return Err(StatParseError::NothingToAnimate);
        }
        Ok(Self {
            target: value as u64,
            suffix: suffix.unwrap_or_default().to_string(),
        })
    }
}

/// One element of the page.
#[derive(Debug, Clone)]
pub struct Element {
    pub id: ElementId,
    pub role: Role,
    /// Raw count-up declaration (`target`, `suffix`) for stat elements.
    pub stat: Option<(String, Option<String>)>,
}

/// Flat registry of page elements, in document order.
#[derive(Debug, Clone, Default)]
pub struct PageElements {
    elements: Vec<Element>,
}

impl PageElements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element and return its id.
    pub fn add(&mut self, role: Role) -> ElementId {
        let id = ElementId(self.elements.len() as u32);
        self.elements.push(Element {
            id,
            role,
            stat: None,
        });
        id
    }

    /// Append a stat element carrying a raw target and optional suffix.
    pub fn add_stat(&mut self, target: &str, suffix: Option<&str>) -> ElementId {
        let id = self.add(Role::Stat);
        if let Some(el) = self.elements.last_mut() {
            el.stat = Some((target.to_string(), suffix.map(str::to_string)));
        }
        id
    }

    /// First element with `role`, if any.
    pub fn first(&self, role: Role) -> Option<ElementId> {
        self.elements.iter().find(|e| e.role == role).map(|e| e.id)
    }

    /// All elements with `role`, in document order.
    pub fn all(&self, role: Role) -> impl Iterator<Item = ElementId> + '_ {
        self.elements
            .iter()
            .filter(move |e| e.role == role)
            .map(|e| e.id)
    }

    pub fn role_of(&self, id: ElementId) -> Option<Role> {
        self.get(id).map(|e| e.role)
    }

    /// Parsed count-up declaration for a stat element.
    pub fn stat_decl(&self, id: ElementId) -> Option<Result<StatDecl, StatParseError>> {
        let (target, suffix) = self.get(id)?.stat.as_ref()?;
        Some(StatDecl::parse(target, suffix.as_deref()))
    }

    fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0 as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_decl_parses_target_and_suffix() {
        assert_eq!(
            StatDecl::parse(" 98 ", Some("%")),
            Ok(StatDecl {
                target: 98,
                suffix: "%".into()
            })
        );
        assert_eq!(StatDecl::parse("12", None).map(|d| d.suffix), Ok(String::new()));
    }

    #[test]
    fn stat_decl_rejects_zero_and_garbage() {
        assert_eq!(StatDecl::parse("0", None), Err(StatParseError::NothingToAnimate));
        assert_eq!(StatDecl::parse("-4", None), Err(StatParseError::NothingToAnimate));
        assert!(matches!(
            StatDecl::parse("12.5", None),
            Err(StatParseError::NotAnInteger(_))
        ));
    }

    #[test]
    fn lookup_by_role() {
        let mut els = PageElements::new();
        let stage = els.add(Role::TiltStage);
        let a = els.add(Role::RevealTarget);
        let b = els.add(Role::RevealTarget);

        assert_eq!(els.first(Role::TiltStage), Some(stage));
        assert_eq!(els.first(Role::TiltCard), None);
        assert_eq!(els.all(Role::RevealTarget).collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(els.role_of(b), Some(Role::RevealTarget));
    }
}
