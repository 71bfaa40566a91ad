use std::collections::BTreeMap;

use crate::busy::BusyLease;
use crate::flash::{Flash, FlashRegion};
use crate::view_model::{ControlView, PageViewModel};
use crate::{Control, ControlId, Form, FormId, FormKind, SubmissionId};

const DEFAULT_RUN_LABEL: &str = "Run";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingSubmission {
    pub(crate) kind: FormKind,
    pub(crate) label: String,
    pub(crate) lease: BusyLease,
}

/// Everything the interceptor knows about the page it is installed on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageState {
    forms: BTreeMap<FormId, Form>,
    controls: BTreeMap<ControlId, Control>,
    region: FlashRegion,
    pending: BTreeMap<SubmissionId, PendingSubmission>,
    next_submission_id: SubmissionId,
    dirty: bool,
}

impl PageState {
    /// Page without a notification region.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, region: FlashRegion) -> Self {
        self.region = region;
        self
    }

    pub fn with_form(mut self, form: Form) -> Self {
        self.forms.insert(form.id, form);
        self
    }

    pub fn with_control(mut self, control: Control) -> Self {
        self.controls.insert(control.id, control);
        self
    }

    pub fn form(&self, form_id: FormId) -> Option<&Form> {
        self.forms.get(&form_id)
    }

    pub fn control(&self, control_id: ControlId) -> Option<&Control> {
        self.controls.get(&control_id)
    }

    pub fn current_flash(&self) -> Option<&Flash> {
        self.region.current()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn view(&self) -> PageViewModel {
        PageViewModel {
            controls: self
                .controls
                .values()
                .map(|c| ControlView {
                    id: c.id,
                    text: c.text.clone(),
                    enabled: c.enabled,
                })
                .collect(),
            flash: self.region.current().cloned(),
            region_html: self.region.to_html(),
            pending: self.pending.len(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Label for a run summary: the submitter's trimmed text, or "Run".
    pub(crate) fn submitter_label(&self, submitter: Option<ControlId>) -> String {
        submitter
            .and_then(|id| self.controls.get(&id))
            .map(|c| c.text.trim())
            .filter(|text| !text.is_empty())
            .unwrap_or(DEFAULT_RUN_LABEL)
            .to_string()
    }

    /// Put the submitter into busy state and record the pending submission.
    pub(crate) fn begin_submission(
        &mut self,
        kind: FormKind,
        label: String,
        submitter: Option<ControlId>,
    ) -> SubmissionId {
        let control = submitter.and_then(|id| self.controls.get_mut(&id));
        let lease = BusyLease::acquire(control, kind.busy_label());

        self.next_submission_id += 1;
        let submission_id = self.next_submission_id;
        self.pending
            .insert(submission_id, PendingSubmission { kind, label, lease });
        self.mark_dirty();
        submission_id
    }

    /// Remove a pending submission and restore its control. `None` when the
    /// submission is unknown or already settled.
    pub(crate) fn settle_submission(
        &mut self,
        submission_id: SubmissionId,
    ) -> Option<(FormKind, String)> {
        let pending = self.pending.remove(&submission_id)?;
        pending.lease.restore(&mut self.controls);
        self.mark_dirty();
        Some((pending.kind, pending.label))
    }

    pub(crate) fn show_flash(&mut self, flash: Flash) -> bool {
        let shown = self.region.show(flash);
        if shown {
            self.mark_dirty();
        }
        shown
    }
}
