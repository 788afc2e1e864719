use crate::domain::ui_state::UiState;

/// A rendering surface for the upload widget.
///
/// The widget calls `render` after every state transition; the view decides
/// how to show the file label, loading indicator, submit control and message.
pub trait WidgetView {
    fn render(&mut self, state: &UiState);
}
