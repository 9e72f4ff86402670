//! Compare tray fed by the checkboxes on hostel cards.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Hostels compared side by side.
pub const COMPARE_MAX: usize = 2;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompareError {
    #[error("You can only select 2 hostels for comparison. Uncheck one first.")]
    TrayFull,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostelPick {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompareSnapshot {
    pub selected: Vec<HostelPick>,
    pub button_enabled: bool,
    pub prompt: Option<&'static str>,
}

#[derive(Debug, Default)]
pub struct CompareTray {
    picks: Vec<HostelPick>,
}

impl CompareTray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> &[HostelPick] {
        &self.picks
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.picks.iter().any(|p| p.id == id)
    }

    /// Flip the checkbox for `id`. Returns whether it is now checked. A new
    /// pick on a full tray is refused and leaves the tray unchanged.
    pub fn toggle(&mut self, id: &str, name: &str) -> Result<bool, CompareError> {
        if let Some(pos) = self.picks.iter().position(|p| p.id == id) {
            self.picks.remove(pos);
            debug!(target: "page.compare", id, "hostel_unchecked");
            return Ok(false);
        }
        if self.picks.len() >= COMPARE_MAX {
            warn!(target: "page.compare", id, "compare_tray_full");
            return Err(CompareError::TrayFull);
        }
        self.picks.push(HostelPick {
            id: id.to_string(),
            name: name.to_string(),
        });
        debug!(target: "page.compare", id, selected = self.picks.len(), "hostel_checked");
        Ok(true)
    }

    pub fn button_enabled(&self) -> bool {
        self.picks.len() == COMPARE_MAX
    }

    /// Hint shown under the selection list.
    pub fn prompt(&self) -> Option<&'static str> {
        match self.picks.len() {
            0 => Some("Use the checkboxes on hostel cards to select hostels for comparison"),
            1 => Some("Select 1 more hostel to compare"),
            _ => None,
        }
    }

    /// Ids to compare, in pick order, once the tray is full.
    pub fn pair(&self) -> Option<(&str, &str)> {
        match self.picks.as_slice() {
            [a, b] => Some((a.id.as_str(), b.id.as_str())),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> CompareSnapshot {
        CompareSnapshot {
            selected: self.picks.clone(),
            button_enabled: self.button_enabled(),
            prompt: self.prompt(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn button_needs_exactly_two() {
        let mut tray = CompareTray::new();
        assert!(!tray.button_enabled());
        assert_eq!(
            tray.prompt(),
            Some("Use the checkboxes on hostel cards to select hostels for comparison")
        );
        assert_eq!(tray.toggle("7", "Qwetu"), Ok(true));
        assert!(!tray.button_enabled());
        assert_eq!(tray.prompt(), Some("Select 1 more hostel to compare"));
        assert_eq!(tray.toggle("9", "Bluebird"), Ok(true));
        assert!(tray.button_enabled());
        assert_eq!(tray.prompt(), None);
        assert_eq!(tray.pair(), Some(("7", "9")));
    }

    #[test]
    fn third_pick_is_refused() {
        let mut tray = CompareTray::new();
        tray.toggle("7", "Qwetu").unwrap();
        tray.toggle("9", "Bluebird").unwrap();
        let err = tray.toggle("12", "Acacia").unwrap_err();
        assert_eq!(
            err.to_string(),
            "You can only select 2 hostels for comparison. Uncheck one first."
        );
        assert!(!tray.is_selected("12"));
        assert_eq!(tray.selected().len(), 2);
        assert!(tray.button_enabled());
    }

    #[test]
    fn unchecking_frees_a_slot() {
        let mut tray = CompareTray::new();
        tray.toggle("7", "Qwetu").unwrap();
        tray.toggle("9", "Bluebird").unwrap();
        assert_eq!(tray.toggle("7", "Qwetu"), Ok(false));
        assert!(!tray.button_enabled());
        assert_eq!(tray.pair(), None);
        assert_eq!(tray.toggle("12", "Acacia"), Ok(true));
        assert_eq!(tray.pair(), Some(("9", "12")));
        assert_eq!(
            tray.snapshot().selected,
            vec![
                HostelPick {
                    id: "9".into(),
                    name: "Bluebird".into()
                },
                HostelPick {
                    id: "12".into(),
                    name: "Acacia".into()
                },
            ]
        );
    }
}
