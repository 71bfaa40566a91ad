use std::fs;

use formrelay_core::{
    update, Control, Effect, FlashRegion, Form, FormField, FormMethod, Msg, PageState, Severity,
    SubmitEvent,
};
use formrelay_engine::{perform, AtomicFileWriter, ReqwestSubmitter, SubmitSettings};
use pretty_assertions::assert_eq;
use reqwest::Url;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ANALYZE_FORM: u32 = 1;
const RUN_FORM: u32 = 2;
const ANALYZE_BUTTON: u32 = 10;
const RUN_BUTTON: u32 = 20;

fn page() -> PageState {
    PageState::new()
        .with_region(FlashRegion::present())
        .with_form(Form {
            id: ANALYZE_FORM,
            classes: vec!["analyze-form".to_string()],
            action: "/analyze".to_string(),
            method: FormMethod::Post,
            fields: vec![FormField::new("stage", "0")],
        })
        .with_form(Form {
            id: RUN_FORM,
            classes: vec!["run-stage-form".to_string()],
            action: "/run".to_string(),
            method: FormMethod::Post,
            fields: Vec::new(),
        })
        .with_control(Control::new(ANALYZE_BUTTON, "Analyze"))
        .with_control(Control::new(RUN_BUTTON, "Run Stage 1"))
}

/// Submit a form and drive the submission to completion.
async fn submit_and_settle(
    server: &MockServer,
    downloads: &AtomicFileWriter,
    form_id: u32,
    submitter_id: u32,
) -> PageState {
    let settings = SubmitSettings::new(Url::parse(&server.uri()).unwrap());
    let submitter = ReqwestSubmitter::new(settings).unwrap();

    let (state, effects) = update(
        page(),
        Msg::FormSubmitted(SubmitEvent {
            form_id,
            submitter: Some(submitter_id),
        }),
    );
    let busy = state.control(submitter_id).unwrap();
    assert!(!busy.enabled);

    let request = effects
        .into_iter()
        .find_map(|effect| match effect {
            Effect::Submit(request) => Some(request),
            _ => None,
        })
        .expect("submit effect");
    let msg = perform(&submitter, downloads, &request).await;
    let (state, _) = update(state, msg);
    state
}

async fn mount(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn analyze_downloads_file_and_restores_button() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/analyze",
        ResponseTemplate::new(200)
            .insert_header("Content-Disposition", "attachment; filename=\"report.csv\"")
            .set_body_raw("a,b\n", "text/csv"),
    )
    .await;
    let temp = TempDir::new().unwrap();
    let downloads = AtomicFileWriter::new(temp.path().join("downloads"));

    let state = submit_and_settle(&server, &downloads, ANALYZE_FORM, ANALYZE_BUTTON).await;

    let saved = temp.path().join("downloads").join("report.csv");
    assert_eq!(fs::read_to_string(saved).unwrap(), "a,b\n");
    let flash = state.current_flash().unwrap();
    assert_eq!(flash.severity, Severity::Success);
    assert_eq!(
        flash.body,
        "Your analysis file <code>report.csv</code> has been downloaded."
    );
    let button = state.control(ANALYZE_BUTTON).unwrap();
    assert_eq!(button.text, "Analyze");
    assert!(button.enabled);

    // Only the finished file remains; the temp file is gone.
    let entries = fs::read_dir(temp.path().join("downloads")).unwrap().count();
    assert_eq!(entries, 1);
}

#[tokio::test]
async fn analyze_saves_utf8_name() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/analyze",
        ResponseTemplate::new(200)
            .insert_header(
                "Content-Disposition",
                "attachment; filename*=UTF-8''r%C3%A9sultat.csv",
            )
            .set_body_raw("x", "text/csv"),
    )
    .await;
    let temp = TempDir::new().unwrap();
    let downloads = AtomicFileWriter::new(temp.path().to_path_buf());

    let state = submit_and_settle(&server, &downloads, ANALYZE_FORM, ANALYZE_BUTTON).await;

    assert!(temp.path().join("résultat.csv").exists());
    assert!(state.current_flash().unwrap().body.contains("<code>résultat.csv</code>"));
}

#[tokio::test]
async fn analyze_json_error_shows_danger_without_download() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/analyze",
        ResponseTemplate::new(200).set_body_raw(r#"{"error":"bad input"}"#, "application/json"),
    )
    .await;
    let temp = TempDir::new().unwrap();
    let downloads = AtomicFileWriter::new(temp.path().join("downloads"));

    let state = submit_and_settle(&server, &downloads, ANALYZE_FORM, ANALYZE_BUTTON).await;

    let flash = state.current_flash().unwrap();
    assert_eq!(flash.severity, Severity::Danger);
    assert_eq!(flash.body, "bad input");
    assert!(!temp.path().join("downloads").exists());
    assert!(state.control(ANALYZE_BUTTON).unwrap().enabled);
}

#[tokio::test]
async fn server_error_text_is_prefixed_per_handler() {
    let server = MockServer::start().await;
    for route in ["/analyze", "/run"] {
        mount(
            &server,
            route,
            ResponseTemplate::new(500).set_body_raw("Internal Server Error", "text/plain"),
        )
        .await;
    }
    let temp = TempDir::new().unwrap();
    let downloads = AtomicFileWriter::new(temp.path().to_path_buf());

    let state = submit_and_settle(&server, &downloads, ANALYZE_FORM, ANALYZE_BUTTON).await;
    assert_eq!(
        state.current_flash().unwrap().body,
        "Analyze error: Internal Server Error"
    );
    assert_eq!(state.control(ANALYZE_BUTTON).unwrap().text, "Analyze");

    let state = submit_and_settle(&server, &downloads, RUN_FORM, RUN_BUTTON).await;
    assert_eq!(
        state.current_flash().unwrap().body,
        "Run error: Internal Server Error"
    );
    assert_eq!(state.control(RUN_BUTTON).unwrap().text, "Run Stage 1");
}

#[tokio::test]
async fn run_stage_summary_then_warnings() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/run",
        ResponseTemplate::new(200).set_body_raw(
            r#"{"success": true, "Value fallbacks": 2, "Bound warnings": 0, "Value errors": [],
                "Values ignored": 1, "Values imported": 10, "Values missing": 0,
                "Values imputed": 0, "Duration": "1.2s", "warnings": ["low confidence"]}"#,
            "application/json",
        ),
    )
    .await;
    let temp = TempDir::new().unwrap();
    let downloads = AtomicFileWriter::new(temp.path().to_path_buf());

    let state = submit_and_settle(&server, &downloads, RUN_FORM, RUN_BUTTON).await;

    let flash = state.current_flash().unwrap();
    assert_eq!(flash.severity, Severity::Warning);
    assert!(flash.body.contains("<li>low confidence</li>"));
    assert!(state.control(RUN_BUTTON).unwrap().enabled);
}

#[tokio::test]
async fn run_stage_failure_joins_errors() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/run",
        ResponseTemplate::new(200).set_body_raw(
            r#"{"success": false, "errors": ["missing column A", "bad type"]}"#,
            "application/json",
        ),
    )
    .await;
    let temp = TempDir::new().unwrap();
    let downloads = AtomicFileWriter::new(temp.path().to_path_buf());

    let state = submit_and_settle(&server, &downloads, RUN_FORM, RUN_BUTTON).await;
    assert_eq!(
        state.current_flash().unwrap().body,
        "missing column A, bad type"
    );
}

#[tokio::test]
async fn unwritable_download_dir_is_reported() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/analyze",
        ResponseTemplate::new(200).set_body_raw("x", "text/csv"),
    )
    .await;
    let temp = TempDir::new().unwrap();
    let not_a_dir = temp.path().join("file");
    fs::write(&not_a_dir, "x").unwrap();
    let downloads = AtomicFileWriter::new(not_a_dir);

    let state = submit_and_settle(&server, &downloads, ANALYZE_FORM, ANALYZE_BUTTON).await;
    let flash = state.current_flash().unwrap();
    assert_eq!(flash.severity, Severity::Danger);
    assert!(flash.body.starts_with("Analyze error: could not save download"));
    assert!(state.control(ANALYZE_BUTTON).unwrap().enabled);
}
