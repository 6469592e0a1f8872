pub mod narration;
pub mod text;
pub mod translation;
pub mod tts;
