//! Formrelay core: page model, submission state machine and banner rendering.
mod busy;
mod effect;
mod flash;
mod msg;
mod page;
mod payload;
mod state;
mod summary;
mod update;
mod view_model;

pub use busy::BusyLease;
pub use effect::{Effect, SubmissionRequest};
pub use flash::{escape_html, Flash, FlashRegion, Severity};
pub use msg::{AnalyzeOutcome, Msg, RunStageOutcome};
pub use page::{
    Control, ControlId, Form, FormField, FormId, FormKind, FormMethod, SubmissionId, SubmitEvent,
    ANALYZE_FORM_CLASS, RUN_STAGE_FORM_CLASS,
};
pub use payload::{ErrorPayload, Messages, RunResult, SummaryValue};
pub use state::PageState;
pub use summary::{download_flash, run_summary_flash, warnings_flash};
pub use update::update;
pub use view_model::{ControlView, PageViewModel};
