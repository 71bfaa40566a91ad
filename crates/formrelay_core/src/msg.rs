use crate::{RunResult, SubmissionId, SubmitEvent};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// A form on the page was submitted (delegated: every form ends up here).
    FormSubmitted(SubmitEvent),
    /// Engine completion for an analyze submission.
    AnalyzeSettled {
        submission_id: SubmissionId,
        outcome: AnalyzeOutcome,
    },
    /// Engine completion for a run-stage submission.
    RunStageSettled {
        submission_id: SubmissionId,
        outcome: RunStageOutcome,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyzeOutcome {
    /// The response body was saved under `filename`.
    Downloaded { filename: String },
    /// The endpoint answered with JSON instead of a file.
    Refused { message: String },
    /// Transport, status or parse failure.
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunStageOutcome {
    Completed(RunResult),
    Failed { message: String },
}
