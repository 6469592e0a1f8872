pub mod dto;
pub mod language;

pub use dto::{AudioFormat, SynthesisRequest, SynthesisResponse, VoiceSettings};
pub use language::{build_detector, detect_language, LanguageCode};
