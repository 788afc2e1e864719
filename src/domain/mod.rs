pub mod error;
pub mod submission;
pub mod ui_state;
pub mod upload;
pub mod widget_config;
