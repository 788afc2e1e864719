use serde::Serialize;

use crate::domain::submission::StatusMessage;

/// Everything a view needs to draw the widget.
///
/// Fields are read-only outside this module; handlers change them only through
/// the transition methods below.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    is_loading: bool,
    is_submit_enabled: bool,
    message: Option<StatusMessage>,
    selected_file_label: Option<String>,
    is_drag_over: bool,
}

impl UiState {
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_submit_enabled(&self) -> bool {
        self.is_submit_enabled
    }

    pub fn message(&self) -> Option<&StatusMessage> {
        self.message.as_ref()
    }

    pub fn selected_file_label(&self) -> Option<&str> {
        self.selected_file_label.as_deref()
    }

    pub fn is_drag_over(&self) -> bool {
        self.is_drag_over
    }

    pub fn file_accepted(&mut self, file_name: &str) {
        self.selected_file_label = Some(format!("Selected file: {}", file_name));
        self.is_submit_enabled = !self.is_loading;
    }

    pub fn show_message(&mut self, message: StatusMessage) {
        self.message = Some(message);
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn begin_submission(&mut self) {
        self.is_loading = true;
        self.is_submit_enabled = false;
    }

    /// Releases the in-flight scope. Submit comes back only if a file is selected.
    pub fn end_submission(&mut self) {
        self.is_loading = false;
        self.is_submit_enabled = self.selected_file_label.is_some();
    }

    pub fn drag_entered(&mut self) {
        self.is_drag_over = true;
    }

    pub fn drag_left(&mut self) {
        self.is_drag_over = false;
    }
}
