use crate::{FormField, FormId, FormKind, FormMethod, SubmissionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// The page must not perform its default navigation for this form.
    PreventDefault { form_id: FormId },
    Submit(SubmissionRequest),
    /// Bring the notification region into view (smooth scroll).
    ScrollIntoView,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub submission_id: SubmissionId,
    pub kind: FormKind,
    /// Action as declared by the form; may be relative to the page.
    pub action: String,
    pub method: FormMethod,
    /// Multipart parts. Always empty for run-stage submissions.
    pub fields: Vec<FormField>,
}
