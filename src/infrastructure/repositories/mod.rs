pub mod audio_repository;
pub mod azure_translator_repository;
pub mod azure_tts_repository;
pub mod batching;
pub mod polly_tts_repository;
pub mod translator_repository;
pub mod tts_repository;

pub use audio_repository::AudioRepository;
pub use azure_translator_repository::AzureTranslatorRepository;
pub use azure_tts_repository::AzureTtsRepository;
pub use polly_tts_repository::PollyTtsRepository;
pub use translator_repository::TranslatorRepository;
pub use tts_repository::TtsRepository;
