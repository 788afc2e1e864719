pub mod use_cases;

pub use use_cases::transfer::TransferUseCase;
pub use use_cases::upload_widget::UploadWidget;
