mod client_utils;
mod content_model;
mod errors;
pub mod google;
mod opentelemetry;
mod options;
pub mod response;
mod studio;
pub mod studio_test;
mod types;

pub use content_model::ContentModel;
pub use errors::*;
pub use options::*;
pub use studio::Studio;
pub use types::*;

pub use songsmith_audio as audio;
