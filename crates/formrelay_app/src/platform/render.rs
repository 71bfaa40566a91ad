use std::fmt::Write as _;

use formrelay_core::{Form, FormKind, FormMethod, PageViewModel};

/// Terminal rendering of the page after its submissions settled.
pub fn render(view: &PageViewModel, region_present: bool) -> String {
    let mut out = String::new();
    let notice = if !region_present {
        "(no notification region)".to_string()
    } else if view.region_html.is_empty() {
        "(nothing to show)".to_string()
    } else {
        html2md::parse_html(&view.region_html).trim().to_string()
    };
    let _ = writeln!(out, "{notice}");

    if !view.controls.is_empty() {
        out.push('\n');
    }
    for control in &view.controls {
        let state = if control.enabled { "" } else { " (disabled)" };
        let _ = writeln!(out, "[{}] {}{}", control.id, control.text, state);
    }
    if view.pending > 0 {
        let _ = writeln!(out, "\n{} submission(s) still pending", view.pending);
    }
    out
}

pub fn form_line(form: &Form) -> String {
    let handling = match FormKind::classify(form) {
        Some(FormKind::Analyze) => "analyze",
        Some(FormKind::RunStage) => "run-stage",
        None => "not intercepted",
    };
    let method = match form.method {
        FormMethod::Get => "GET",
        FormMethod::Post => "POST",
    };
    format!("{:>4}  {:<16} {} {}", form.id, handling, method, form.action)
}
