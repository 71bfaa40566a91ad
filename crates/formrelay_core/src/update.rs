use relay_logging::{relay_debug, relay_warn};

use crate::summary::{download_flash, run_summary_flash, warnings_flash};
use crate::{
    AnalyzeOutcome, Effect, Flash, FormKind, Msg, PageState, RunStageOutcome, Severity,
    SubmissionRequest,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: PageState, msg: Msg) -> (PageState, Vec<Effect>) {
    let effects = match msg {
        Msg::FormSubmitted(event) => {
            let Some(form) = state.form(event.form_id) else {
                relay_debug!("Submit for unknown form {} ignored", event.form_id);
                return (state, Vec::new());
            };
            let Some(kind) = FormKind::classify(form) else {
                // Not ours: the page navigates as usual.
                relay_debug!("Form {} is not intercepted", event.form_id);
                return (state, Vec::new());
            };
            // A disabled button cannot fire a submit.
            if let Some(control) = event.submitter.and_then(|id| state.control(id)) {
                if !control.enabled {
                    relay_debug!(
                        "Form {} submitted through busy control {}; ignored",
                        event.form_id,
                        control.id
                    );
                    return (state, Vec::new());
                }
            }
            let action = form.action.clone();
            let method = form.method;
            let fields = match kind {
                FormKind::Analyze => form.fields.clone(),
                FormKind::RunStage => Vec::new(),
            };

            // Captured before the busy label overwrites the control text.
            let label = state.submitter_label(event.submitter);
            let submission_id = state.begin_submission(kind, label, event.submitter);
            vec![
                Effect::PreventDefault {
                    form_id: event.form_id,
                },
                Effect::Submit(SubmissionRequest {
                    submission_id,
                    kind,
                    action,
                    method,
                    fields,
                }),
            ]
        }
        Msg::AnalyzeSettled {
            submission_id,
            outcome,
        } => {
            if state.settle_submission(submission_id).is_none() {
                relay_warn!("Analyze submission {} settled twice", submission_id);
                return (state, Vec::new());
            }
            let flash = match outcome {
                AnalyzeOutcome::Downloaded { filename } => download_flash(&filename),
                AnalyzeOutcome::Refused { message } => Flash::text(Severity::Danger, &message),
                AnalyzeOutcome::Failed { message } => Flash::text(
                    Severity::Danger,
                    &format!("{} {}", FormKind::Analyze.error_prefix(), message),
                ),
            };
            flash_effects(&mut state, vec![flash])
        }
        Msg::RunStageSettled {
            submission_id,
            outcome,
        } => {
            let Some((_, label)) = state.settle_submission(submission_id) else {
                relay_warn!("Run-stage submission {} settled twice", submission_id);
                return (state, Vec::new());
            };
            let flashes = match outcome {
                RunStageOutcome::Completed(result) if result.success => {
                    let mut flashes = vec![run_summary_flash(&label, &result)];
                    // Shown after the summary, so it is the one left visible.
                    if let Some(entries) = result.warning_entries() {
                        flashes.push(warnings_flash(&entries));
                    }
                    flashes
                }
                RunStageOutcome::Completed(result) => {
                    vec![Flash::text(Severity::Danger, &result.failure_message())]
                }
                RunStageOutcome::Failed { message } => vec![Flash::text(
                    Severity::Danger,
                    &format!("{} {}", FormKind::RunStage.error_prefix(), message),
                )],
            };
            flash_effects(&mut state, flashes)
        }
    };

    (state, effects)
}

fn flash_effects(state: &mut PageState, flashes: Vec<Flash>) -> Vec<Effect> {
    flashes
        .into_iter()
        .filter_map(|flash| state.show_flash(flash).then_some(Effect::ScrollIntoView))
        .collect()
}
