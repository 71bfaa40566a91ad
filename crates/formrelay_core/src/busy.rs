use std::collections::BTreeMap;

use crate::{Control, ControlId};

/// Restore token for a control put into busy state.
///
/// Restoring consumes the lease, so a control is restored at most once per
/// submission. A lease acquired without a control restores nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a busy control stays disabled until its lease is restored"]
pub struct BusyLease {
    held: Option<HeldControl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct HeldControl {
    control_id: ControlId,
    original_text: String,
}

impl BusyLease {
    /// Disable `control` and replace its text with `busy_label`.
    pub fn acquire(control: Option<&mut Control>, busy_label: &str) -> Self {
        let Some(control) = control else {
            return Self { held: None };
        };
        let original_text = std::mem::replace(&mut control.text, busy_label.to_string());
        control.enabled = false;
        Self {
            held: Some(HeldControl {
                control_id: control.id,
                original_text,
            }),
        }
    }

    pub fn control_id(&self) -> Option<ControlId> {
        self.held.as_ref().map(|held| held.control_id)
    }

    /// Re-enable the control and put its original text back.
    ///
    /// A control that has since disappeared from the page is skipped.
    pub fn restore(self, controls: &mut BTreeMap<ControlId, Control>) {
        let Some(held) = self.held else {
            return;
        };
        if let Some(control) = controls.get_mut(&held.control_id) {
            control.enabled = true;
            control.text = held.original_text;
        }
    }
}
