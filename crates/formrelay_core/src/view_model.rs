use crate::{ControlId, Flash};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageViewModel {
    pub controls: Vec<ControlView>,
    pub flash: Option<Flash>,
    /// Inner HTML of the notification region; empty when nothing is shown.
    pub region_html: String,
    pub pending: usize,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlView {
    pub id: ControlId,
    pub text: String,
    pub enabled: bool,
}
