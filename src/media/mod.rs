//! Media concerns: checking remote cover images and uploading new ones.

pub mod upload;
pub mod validator;

pub use upload::MediaUploader;
pub use validator::RemoteImageValidator;
