use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Danger,
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dismissible banner. `body` is an HTML fragment; any server-provided
/// text in it has already been escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub severity: Severity,
    pub body: String,
}

impl Flash {
    pub fn new(severity: Severity, body: impl Into<String>) -> Self {
        Self {
            severity,
            body: body.into(),
        }
    }

    /// Banner whose body is plain text.
    pub fn text(severity: Severity, text: &str) -> Self {
        Self::new(severity, escape_html(text))
    }

    /// Markup placed into the notification region.
    pub fn to_html(&self) -> String {
        format!(
            "<div class=\"alert alert-{severity} alert-dismissible fade show\" role=\"alert\">\n  {body}\n  <button type=\"button\" class=\"btn-close\" data-bs-dismiss=\"alert\" aria-label=\"Close\"></button>\n</div>",
            severity = self.severity,
            body = self.body,
        )
    }
}

/// The page's single notification region (`#run-summary`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlashRegion {
    present: bool,
    current: Option<Flash>,
}

impl FlashRegion {
    pub fn present() -> Self {
        Self {
            present: true,
            current: None,
        }
    }

    pub fn absent() -> Self {
        Self::default()
    }

    pub fn is_present(&self) -> bool {
        self.present
    }

    /// Replace whatever the region shows. Returns `false` when the page has
    /// no region, in which case nothing happens.
    pub fn show(&mut self, flash: Flash) -> bool {
        if !self.present {
            return false;
        }
        self.current = Some(flash);
        true
    }

    pub fn current(&self) -> Option<&Flash> {
        self.current.as_ref()
    }

    /// Inner HTML of the region.
    pub fn to_html(&self) -> String {
        self.current.as_ref().map(Flash::to_html).unwrap_or_default()
    }
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
