pub type FormId = u32;
pub type ControlId = u32;
pub type SubmissionId = u64;

/// Class marking forms whose submission downloads an analysis file.
pub const ANALYZE_FORM_CLASS: &str = "analyze-form";
/// Class marking forms whose submission runs a stage and reports a summary.
pub const RUN_STAGE_FORM_CLASS: &str = "run-stage-form";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMethod {
    Get,
    #[default]
    Post,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

impl FormField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub id: FormId,
    pub classes: Vec<String>,
    pub action: String,
    pub method: FormMethod,
    pub fields: Vec<FormField>,
}

impl Form {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// A submit button. Its text doubles as the label of a run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub id: ControlId,
    pub text: String,
    pub enabled: bool,
}

impl Control {
    pub fn new(id: ControlId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            enabled: true,
        }
    }
}

/// A form submission as seen by the page, before any default handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitEvent {
    pub form_id: FormId,
    pub submitter: Option<ControlId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Analyze,
    RunStage,
}

impl FormKind {
    /// Classify a form by its marker class; `None` for forms left to the page.
    pub fn classify(form: &Form) -> Option<Self> {
        if form.has_class(ANALYZE_FORM_CLASS) {
            Some(FormKind::Analyze)
        } else if form.has_class(RUN_STAGE_FORM_CLASS) {
            Some(FormKind::RunStage)
        } else {
            None
        }
    }

    pub fn busy_label(self) -> &'static str {
        match self {
            FormKind::Analyze => "Analyzing...",
            FormKind::RunStage => "Running...",
        }
    }

    /// Prefix of the danger banner shown when a submission of this kind fails.
    pub fn error_prefix(self) -> &'static str {
        match self {
            FormKind::Analyze => "Analyze error:",
            FormKind::RunStage => "Run error:",
        }
    }
}
