/// Labeling session: item list, cursor, and the label mapping
///
/// Every reviewer interaction is a `ReviewAction` applied to explicit state;
/// the returned `Outcome` tells the UI what needs refreshing.

pub mod label;
pub mod pager;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::data::item::{Item, ItemId};
use crate::error::Result;
use label::StormLabel;
use pager::Pager;

/// Reviewer interactions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReviewAction {
    Next,
    Previous,
    Select(StormLabel),
    /// Move to the next item (after the cursor) without a label
    JumpToUnlabelled,
}

impl std::fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewAction::Next => write!(f, "Next"),
            ReviewAction::Previous => write!(f, "Previous"),
            ReviewAction::Select(label) => write!(f, "Select '{}'", label),
            ReviewAction::JumpToUnlabelled => write!(f, "Jump to unlabelled"),
        }
    }
}

/// What an action changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    pub cursor_moved: bool,
    pub labels_changed: bool,
}

/// Serializable session state for save/load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSave {
    pub session_id: String,
    pub saved_at: DateTime<Local>,
    pub cursor: usize,
    pub labels: BTreeMap<ItemId, StormLabel>,
}

impl SessionSave {
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Session saved: {}", path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    items: Vec<Item>,
    pager: Pager,
    labels: BTreeMap<ItemId, StormLabel>,
}

impl Session {
    /// `None` when `items` is empty
    pub fn new(items: Vec<Item>) -> Option<Self> {
        let pager = Pager::new(items.len())?;
        Some(Self {
            items,
            pager,
            labels: BTreeMap::new(),
        })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn cursor(&self) -> usize {
        self.pager.cursor()
    }

    pub fn current(&self) -> &Item {
        &self.items[self.pager.cursor()]
    }

    pub fn labels(&self) -> &BTreeMap<ItemId, StormLabel> {
        &self.labels
    }

    pub fn label_of(&self, id: &ItemId) -> Option<StormLabel> {
        self.labels.get(id).copied()
    }

    pub fn current_label(&self) -> Option<StormLabel> {
        self.label_of(&self.current().id)
    }

    pub fn labelled_count(&self) -> usize {
        self.labels.len()
    }

    /// Fraction of items labelled, in `[0, 1]`
    pub fn progress(&self) -> f32 {
        self.labels.len() as f32 / self.pager.item_count() as f32
    }

    /// Index of the first unlabelled item after the cursor, wrapping
    pub fn next_unlabelled(&self) -> Option<usize> {
        let n = self.items.len();
        (1..=n)
            .map(|step| (self.cursor() + step) % n)
            .find(|&i| !self.labels.contains_key(&self.items[i].id))
    }

    /// Apply one reviewer interaction
    pub fn apply(&mut self, action: ReviewAction) -> Outcome {
        let before = self.cursor();
        let mut outcome = Outcome::default();
        match action {
            ReviewAction::Next => self.pager.advance(),
            ReviewAction::Previous => self.pager.retreat(),
            ReviewAction::JumpToUnlabelled => {
                if let Some(index) = self.next_unlabelled() {
                    self.pager.jump_to(index);
                }
            }
            ReviewAction::Select(label) => {
                let id = self.current().id;
                let previous = self.labels.insert(id, label);
                outcome.labels_changed = previous != Some(label);
                if outcome.labels_changed {
                    log::info!("Labelled {} as '{}'", id, label);
                }
            }
        }
        outcome.cursor_moved = self.cursor() != before;
        outcome
    }

    pub fn to_save(&self, session_id: &str) -> SessionSave {
        SessionSave {
            session_id: session_id.to_string(),
            saved_at: Local::now(),
            cursor: self.cursor(),
            labels: self.labels.clone(),
        }
    }

    /// Restore labels for items present in this session. Returns how many
    /// labels were kept.
    pub fn restore(&mut self, save: &SessionSave) -> usize {
        self.labels = save
            .labels
            .iter()
            .filter(|(id, _)| self.items.iter().any(|item| &item.id == *id))
            .map(|(id, label)| (*id, *label))
            .collect();
        self.pager.jump_to(save.cursor.min(self.items.len() - 1));
        self.labels.len()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::PathBuf;

    pub(crate) fn five_items() -> Vec<Item> {
        (0..5)
            .map(|i| Item {
                id: ItemId::new(100 + i, i),
                path: PathBuf::from(format!("storm_{}_frame_{}.npy", 100 + i, i)),
            })
            .collect()
    }

    #[test]
    fn test_empty_session_rejected() {
        assert!(Session::new(Vec::new()).is_none());
    }

    #[test]
    fn test_advance_twice_then_select() {
        let mut session = Session::new(five_items()).unwrap();
        assert!(session.apply(ReviewAction::Next).cursor_moved);
        session.apply(ReviewAction::Next);
        assert_eq!(session.cursor(), 2);

        let outcome = session.apply(ReviewAction::Select(StormLabel::LargeCircular));
        assert!(outcome.labels_changed);
        assert!(!outcome.cursor_moved);
        assert_eq!(session.labels().len(), 1);
        assert_eq!(
            session.label_of(&ItemId::new(102, 2)),
            Some(StormLabel::LargeCircular)
        );
        assert!((session.progress() - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_select_is_idempotent() {
        let mut session = Session::new(five_items()).unwrap();
        session.apply(ReviewAction::Select(StormLabel::NoOrganisation));
        let snapshot = session.labels().clone();
        let outcome = session.apply(ReviewAction::Select(StormLabel::NoOrganisation));
        assert!(!outcome.labels_changed);
        assert_eq!(session.labels(), &snapshot);
    }

    #[test]
    fn test_reselect_overwrites() {
        let mut session = Session::new(five_items()).unwrap();
        session.apply(ReviewAction::Select(StormLabel::LargeCircular));
        session.apply(ReviewAction::Select(StormLabel::SmallerScaleLinear));
        assert_eq!(session.labelled_count(), 1);
        assert_eq!(session.current_label(), Some(StormLabel::SmallerScaleLinear));
    }

    #[test]
    fn test_label_all_items_reaches_full_progress() {
        let mut session = Session::new(five_items()).unwrap();
        for label in StormLabel::ALL.iter().take(5) {
            session.apply(ReviewAction::Select(*label));
            session.apply(ReviewAction::Next);
        }
        assert_eq!(session.labelled_count(), 5);
        assert_eq!(session.progress(), 1.0);
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.next_unlabelled(), None);
    }

    #[test]
    fn test_previous_wraps_to_last() {
        let mut session = Session::new(five_items()).unwrap();
        session.apply(ReviewAction::Previous);
        assert_eq!(session.cursor(), 4);
        assert_eq!(session.current().id, ItemId::new(104, 4));
    }

    #[test]
    fn test_jump_to_unlabelled() {
        let mut session = Session::new(five_items()).unwrap();
        session.apply(ReviewAction::Select(StormLabel::LargeCircular));
        session.apply(ReviewAction::Next);
        session.apply(ReviewAction::Select(StormLabel::LargeCircular));
        session.apply(ReviewAction::Previous);
        let outcome = session.apply(ReviewAction::JumpToUnlabelled);
        assert!(outcome.cursor_moved);
        assert_eq!(session.cursor(), 2);
    }

    #[test]
    fn test_save_and_restore() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut session = Session::new(five_items()).unwrap();
        session.apply(ReviewAction::Next);
        session.apply(ReviewAction::Select(StormLabel::LargeLinearSystem));
        let mut save = session.to_save("abc123");
        // a label for an item that is not listed is dropped on restore
        save.labels.insert(ItemId::new(999, 9), StormLabel::NoneOfTheAbove);
        save.save(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"(101, 1)\": \"Large Linear System\""));

        let loaded = SessionSave::load(&path).unwrap();
        let mut fresh = Session::new(five_items()).unwrap();
        assert_eq!(fresh.restore(&loaded), 1);
        assert_eq!(fresh.cursor(), 1);
        assert_eq!(fresh.current_label(), Some(StormLabel::LargeLinearSystem));
    }
}
