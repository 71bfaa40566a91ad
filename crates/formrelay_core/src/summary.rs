use crate::flash::{escape_html, Flash, Severity};
use crate::payload::{RunResult, SummaryValue};

const MISSING: &str = "n/a";

/// Success banner for a completed run.
pub fn run_summary_flash(label: &str, result: &RunResult) -> Flash {
    let plain = |value: &Option<SummaryValue>| {
        value
            .as_ref()
            .map(|v| escape_html(&v.to_string()))
            .unwrap_or_else(|| MISSING.to_string())
    };
    let value_errors = result
        .value_errors
        .as_ref()
        .map(|v| escape_html(&v.count_display()))
        .unwrap_or_else(|| MISSING.to_string());

    let rows = [
        ("Value fallbacks", plain(&result.value_fallbacks)),
        ("Bound warnings", plain(&result.bound_warnings)),
        ("Value errors", value_errors),
        ("Values ignored", plain(&result.values_ignored)),
        ("Values imported", plain(&result.values_imported)),
        ("Values missing", plain(&result.values_missing)),
        ("Values imputed", plain(&result.values_imputed)),
        ("Duration", plain(&result.duration)),
    ];

    let mut body = format!("<strong>{} Summary</strong>", escape_html(label));
    for (name, value) in rows {
        body.push_str("<br>\n");
        body.push_str(name);
        body.push_str(": ");
        body.push_str(&value);
    }
    Flash::new(Severity::Success, body)
}

pub fn warnings_flash(entries: &[String]) -> Flash {
    let items: String = entries
        .iter()
        .map(|entry| format!("<li>{}</li>", escape_html(entry)))
        .collect();
    Flash::new(
        Severity::Warning,
        format!("<strong>Warnings</strong>\n<ul class=\"mb-0\">{items}</ul>"),
    )
}

pub fn download_flash(filename: &str) -> Flash {
    Flash::new(
        Severity::Success,
        format!(
            "Your analysis file <code>{}</code> has been downloaded.",
            escape_html(filename)
        ),
    )
}
