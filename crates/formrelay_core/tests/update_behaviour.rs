mod common;

use formrelay_core::{
    update, AnalyzeOutcome, Control, Effect, Form, FormField, FormKind, FormMethod, FlashRegion,
    Msg, PageState, Severity, SubmissionRequest, SubmitEvent,
};
use pretty_assertions::assert_eq;

use common::init_logging;

fn form(id: u32, class: &str, action: &str) -> Form {
    Form {
        id,
        classes: vec!["d-inline".to_string(), class.to_string()],
        action: action.to_string(),
        method: FormMethod::Post,
        fields: vec![FormField::new("stage", "0")],
    }
}

fn page() -> PageState {
    PageState::new()
        .with_region(FlashRegion::present())
        .with_form(form(1, "analyze-form", "/api/minmax-analysis/0"))
        .with_form(form(2, "run-stage-form", "/api/run-minmax-stage/0"))
        .with_form(form(3, "delete-form", "/delete/0"))
        .with_control(Control::new(10, "Analyze"))
        .with_control(Control::new(20, "Run Stage 1"))
        .with_control(Control::new(30, "Delete"))
}

fn submit(state: PageState, form_id: u32, submitter: Option<u32>) -> (PageState, Vec<Effect>) {
    update(
        state,
        Msg::FormSubmitted(SubmitEvent {
            form_id,
            submitter,
        }),
    )
}

fn submission_id(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::Submit(request) => Some(request.submission_id),
            _ => None,
        })
        .expect("submit effect")
}

#[test]
fn other_forms_are_left_alone() {
    init_logging();
    let state = page();
    let (mut next, effects) = submit(state.clone(), 3, Some(30));

    assert!(effects.is_empty());
    assert_eq!(next.control(30), state.control(30));
    assert!(!next.consume_dirty());
}

#[test]
fn unknown_form_is_ignored() {
    init_logging();
    let (next, effects) = submit(page(), 99, None);
    assert!(effects.is_empty());
    assert_eq!(next.pending_count(), 0);
}

#[test]
fn analyze_submit_prevents_default_and_goes_busy() {
    init_logging();
    let (next, effects) = submit(page(), 1, Some(10));

    assert_eq!(
        effects,
        vec![
            Effect::PreventDefault { form_id: 1 },
            Effect::Submit(SubmissionRequest {
                submission_id: 1,
                kind: FormKind::Analyze,
                action: "/api/minmax-analysis/0".to_string(),
                method: FormMethod::Post,
                fields: vec![FormField::new("stage", "0")],
            }),
        ]
    );
    let control = next.control(10).unwrap();
    assert_eq!(control.text, "Analyzing...");
    assert!(!control.enabled);
    assert_eq!(next.pending_count(), 1);
}

#[test]
fn run_stage_submit_sends_no_fields() {
    init_logging();
    let (next, effects) = submit(page(), 2, Some(20));

    match &effects[1] {
        Effect::Submit(request) => {
            assert_eq!(request.kind, FormKind::RunStage);
            assert!(request.fields.is_empty());
        }
        other => panic!("unexpected effect {other:?}"),
    }
    assert_eq!(next.control(20).unwrap().text, "Running...");
}

#[test]
fn analyze_control_restored_after_every_outcome() {
    init_logging();
    let outcomes = vec![
        AnalyzeOutcome::Downloaded {
            filename: "report.csv".to_string(),
        },
        AnalyzeOutcome::Refused {
            message: "bad input".to_string(),
        },
        AnalyzeOutcome::Failed {
            message: "connection refused".to_string(),
        },
    ];

    for outcome in outcomes {
        let (state, effects) = submit(page(), 1, Some(10));
        let id = submission_id(&effects);
        let (next, _) = update(
            state,
            Msg::AnalyzeSettled {
                submission_id: id,
                outcome,
            },
        );
        let control = next.control(10).unwrap();
        assert_eq!(control.text, "Analyze");
        assert!(control.enabled);
        assert_eq!(next.pending_count(), 0);
    }
}

#[test]
fn download_flash_names_file() {
    init_logging();
    let (state, effects) = submit(page(), 1, Some(10));
    let (next, effects) = update(
        state,
        Msg::AnalyzeSettled {
            submission_id: submission_id(&effects),
            outcome: AnalyzeOutcome::Downloaded {
                filename: "résultat.csv".to_string(),
            },
        },
    );

    let flash = next.current_flash().unwrap();
    assert_eq!(flash.severity, Severity::Success);
    assert_eq!(
        flash.body,
        "Your analysis file <code>résultat.csv</code> has been downloaded."
    );
    assert_eq!(effects, vec![Effect::ScrollIntoView]);
}

#[test]
fn refused_analyze_shows_message_without_prefix() {
    init_logging();
    let (state, effects) = submit(page(), 1, Some(10));
    let (next, _) = update(
        state,
        Msg::AnalyzeSettled {
            submission_id: submission_id(&effects),
            outcome: AnalyzeOutcome::Refused {
                message: "bad input".to_string(),
            },
        },
    );
    let flash = next.current_flash().unwrap();
    assert_eq!(flash.severity, Severity::Danger);
    assert_eq!(flash.body, "bad input");
}

#[test]
fn failed_analyze_is_prefixed() {
    init_logging();
    let (state, effects) = submit(page(), 1, Some(10));
    let (next, _) = update(
        state,
        Msg::AnalyzeSettled {
            submission_id: submission_id(&effects),
            outcome: AnalyzeOutcome::Failed {
                message: "Internal Server Error".to_string(),
            },
        },
    );
    assert_eq!(
        next.current_flash().unwrap().body,
        "Analyze error: Internal Server Error"
    );
}

#[test]
fn second_settle_is_ignored() {
    init_logging();
    let (state, effects) = submit(page(), 1, Some(10));
    let id = submission_id(&effects);
    let settle = |message: &str| Msg::AnalyzeSettled {
        submission_id: id,
        outcome: AnalyzeOutcome::Failed {
            message: message.to_string(),
        },
    };

    let (state, _) = update(state, settle("first"));
    let (next, effects) = update(state, settle("second"));
    assert!(effects.is_empty());
    assert_eq!(next.current_flash().unwrap().body, "Analyze error: first");
}

#[test]
fn missing_submitter_still_submits() {
    init_logging();
    let (state, effects) = submit(page(), 1, None);
    assert_eq!(effects.len(), 2);
    let (next, _) = update(
        state,
        Msg::AnalyzeSettled {
            submission_id: submission_id(&effects),
            outcome: AnalyzeOutcome::Refused {
                message: "x".to_string(),
            },
        },
    );
    assert_eq!(next.control(10).unwrap().text, "Analyze");
    assert!(next.control(10).unwrap().enabled);
}

#[test]
fn page_without_region_settles_silently() {
    init_logging();
    let state = PageState::new()
        .with_form(form(1, "analyze-form", "/a"))
        .with_control(Control::new(10, "Analyze"));
    let (state, effects) = submit(state, 1, Some(10));
    let (next, effects) = update(
        state,
        Msg::AnalyzeSettled {
            submission_id: submission_id(&effects),
            outcome: AnalyzeOutcome::Refused {
                message: "x".to_string(),
            },
        },
    );
    assert!(effects.is_empty());
    assert!(next.current_flash().is_none());
    assert!(next.control(10).unwrap().enabled);
}

#[test]
fn overlapping_submissions_restore_their_own_controls() {
    init_logging();
    let state = page().with_control(Control::new(11, "Analyze again"));
    let (state, first) = submit(state, 1, Some(10));
    let (state, second) = submit(state, 1, Some(11));
    assert_ne!(submission_id(&first), submission_id(&second));

    let (state, _) = update(
        state,
        Msg::AnalyzeSettled {
            submission_id: submission_id(&second),
            outcome: AnalyzeOutcome::Failed {
                message: "late".to_string(),
            },
        },
    );
    assert_eq!(state.control(10).unwrap().text, "Analyzing...");
    assert_eq!(state.control(11).unwrap().text, "Analyze again");

    let (state, _) = update(
        state,
        Msg::AnalyzeSettled {
            submission_id: submission_id(&first),
            outcome: AnalyzeOutcome::Refused {
                message: "last writer".to_string(),
            },
        },
    );
    assert_eq!(state.control(10).unwrap().text, "Analyze");
    assert_eq!(state.current_flash().unwrap().body, "last writer");
}

#[test]
fn busy_control_cannot_submit_again() {
    init_logging();
    let (state, first) = submit(page(), 1, Some(10));
    let (state, second) = submit(state, 1, Some(10));
    assert!(second.is_empty());
    assert_eq!(state.pending_count(), 1);

    let (state, _) = update(
        state,
        Msg::AnalyzeSettled {
            submission_id: submission_id(&first),
            outcome: AnalyzeOutcome::Downloaded {
                filename: "a.csv".to_string(),
            },
        },
    );
    let control = state.control(10).unwrap();
    assert_eq!(control.text, "Analyze");
    assert!(control.enabled);

    // Once restored, the control submits again.
    let (_, third) = submit(state, 1, Some(10));
    assert_eq!(third.len(), 2);
}

#[test]
fn busy_control_shared_across_forms_is_not_relabelled() {
    init_logging();
    let (state, first) = submit(page(), 1, Some(20));
    assert_eq!(state.control(20).unwrap().text, "Analyzing...");

    let (state, run) = submit(state, 2, Some(20));
    assert!(run.is_empty());

    let (state, _) = update(
        state,
        Msg::AnalyzeSettled {
            submission_id: submission_id(&first),
            outcome: AnalyzeOutcome::Refused {
                message: "no".to_string(),
            },
        },
    );
    assert_eq!(state.control(20).unwrap().text, "Run Stage 1");
    assert_eq!(state.pending_count(), 0);
}
