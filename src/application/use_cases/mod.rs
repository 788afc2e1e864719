pub mod transfer;
pub mod upload_widget;
pub mod validation;
