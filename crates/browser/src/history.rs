//! Back-navigation history.

use satchel_provider::{DirectoryEntry, LocationId};
use std::sync::Arc;

/// One visited folder: its id plus the name it was entered under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub id: LocationId,
    pub name: String,
}
impl Crumb {
    pub fn new(id: impl Into<LocationId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
impl From<&DirectoryEntry> for Crumb {
    fn from(entry: &DirectoryEntry) -> Self {
        Self::new(entry.id.clone(), entry.name.clone())
    }
}

/// Stack of previously visited folders, oldest first.
///
/// Never mutated in place: [`pushed()`](Self::pushed) and
/// [`popped()`](Self::popped) hand back a new history, so a snapshot someone
/// else is holding can't change underneath them. Cloning is a pointer copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    frames: Arc<[Crumb]>,
}

impl History {
    pub fn pushed(&self, crumb: Crumb) -> Self {
        let frames: Vec<Crumb> = self.frames.iter().cloned().chain(std::iter::once(crumb)).collect();
        Self { frames: frames.into() }
    }

    /// The most recent frame, and the history that remains without it.
    /// `None` when empty.
    pub fn popped(&self) -> Option<(Crumb, Self)> {
        let (top, rest) = self.frames.split_last()?;
        Some((top.clone(), Self { frames: rest.into() }))
    }

    pub fn peek(&self) -> Option<&Crumb> {
        self.frames.last()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frames from the root down to the most recent.
    pub fn iter(&self) -> impl Iterator<Item = &Crumb> {
        self.frames.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &LocationId> {
        self.frames.iter().map(|crumb| &crumb.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_leaves_original_untouched() {
        let empty = History::default();
        let one = empty.pushed(Crumb::new("root", "Material"));
        let two = one.pushed(Crumb::new("1", "Math"));
        assert!(empty.is_empty());
        assert_eq!(one.len(), 1);
        assert_eq!(two.ids().map(LocationId::as_str).collect::<Vec<_>>(), ["root", "1"]);
        assert_eq!(two.peek().map(|c| c.name.as_str()), Some("Math"));
    }

    #[test]
    fn test_pop_returns_top_and_remainder() {
        let history = History::default().pushed(Crumb::new("root", "Material")).pushed(Crumb::new("1", "Math"));
        let (top, rest) = history.popped().unwrap();
        assert_eq!(top, Crumb::new("1", "Math"));
        assert_eq!(rest, History::default().pushed(Crumb::new("root", "Material")));
        // Popping doesn't alias.
        assert_eq!(history.len(), 2);
        let (_, empty) = rest.popped().unwrap();
        assert!(empty.popped().is_none());
    }
}
