pub mod form_submission;
pub mod reminder;
pub mod upload;
