pub mod dto;
pub mod service;

pub use dto::{Translation, TranslationRequest, TranslationResponse};
pub use service::{TranslationService, TranslationServiceApi};
