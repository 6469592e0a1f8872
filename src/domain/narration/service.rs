use crate::domain::text::{self, TextSource};
use crate::domain::translation::TranslationServiceApi;
use crate::domain::tts::{
    build_detector, detect_language, AudioFormat, LanguageCode, SynthesisRequest, VoiceSettings,
};
use crate::error::{AppError, AppResult};
use crate::infrastructure::repositories::{AudioRepository, TtsRepository};
use async_trait::async_trait;
use lingua::LanguageDetector;
use std::path::PathBuf;
use std::sync::Arc;

/// Rough narration speed used for the duration estimate
const CHARACTERS_PER_MINUTE: f32 = 1000.0;

#[derive(Debug, Clone)]
pub struct NarrationRequest {
    pub source: TextSource,
    pub output: PathBuf,
    /// Language of the input, `None` to detect
    pub source_language: Option<String>,
    /// Translate to this language before synthesis
    pub target_language: Option<String>,
    pub voice: VoiceSettings,
    pub format: AudioFormat,
}

#[derive(Debug, Clone)]
pub struct NarrationResult {
    pub output: PathBuf,
    pub audio_size: u64,
    pub char_count: usize,
    pub language: Option<LanguageCode>,
    pub translated_to: Option<String>,
    pub voice: String,
    pub duration_minutes: f32,
}

pub struct NarrationService {
    translation_service: Option<Arc<dyn TranslationServiceApi>>,
    tts_repo: Arc<dyn TtsRepository>,
    audio_repo: Arc<AudioRepository>,
    language_detector: LanguageDetector,
}

impl NarrationService {
    /// `translation_service` may be absent when no run needs translation
    pub fn new(
        translation_service: Option<Arc<dyn TranslationServiceApi>>,
        tts_repo: Arc<dyn TtsRepository>,
        audio_repo: Arc<AudioRepository>,
    ) -> Self {
        Self {
            translation_service,
            tts_repo,
            audio_repo,
            language_detector: build_detector(),
        }
    }
}

#[async_trait]
pub trait NarrationServiceApi: Send + Sync {
    /// Turn one text source into one audio file
    ///
    /// This operation:
    /// - Loads and normalizes the input text
    /// - Translates it when a target language is requested
    /// - Synthesizes the resulting text
    /// - Writes the audio, only once synthesis fully succeeded
    ///
    /// Any failing step aborts the run and nothing is written.
    async fn narrate(&self, request: NarrationRequest) -> AppResult<NarrationResult>;
}

#[async_trait]
impl NarrationServiceApi for NarrationService {
    async fn narrate(&self, request: NarrationRequest) -> AppResult<NarrationResult> {
        // 1. Load the text
        let input = text::load(&request.source).await?;

        tracing::info!(
            origin = %input.origin(),
            text_length = input.char_count(),
            "Input text loaded"
        );

        // 2. Translate (optional) and settle the language of the spoken text
        let (spoken_text, language) = match request.target_language.as_deref() {
            Some(target) => {
                let translation_service = self.translation_service.as_ref().ok_or_else(|| {
                    AppError::Configuration("Translation requested but no translator is configured".to_string())
                })?;

                let response = translation_service
                    .translate(
                        input.as_str(),
                        request.source_language.as_deref(),
                        &[target.to_string()],
                    )
                    .await?;

                let translated = response.text_for(target).ok_or_else(|| {
                    AppError::ExternalService(format!("No translation returned for '{}'", target))
                })?;

                if translated.trim().is_empty() {
                    return Err(AppError::ExternalService(format!(
                        "Translation to '{}' came back empty",
                        target
                    )));
                }

                (translated.to_string(), LanguageCode::from_tag(target))
            }
            None => {
                let language = match request.source_language.as_deref() {
                    Some(source) => LanguageCode::from_tag(source),
                    None => self.detect_language(input.as_str()),
                };
                (input.into_string(), language)
            }
        };

        let char_count = spoken_text.chars().count();

        tracing::info!(
            language = ?language,
            translated = request.target_language.is_some(),
            provider = self.tts_repo.provider(),
            "Synthesizing narration"
        );

        // 3. Synthesize
        let synthesis = self
            .tts_repo
            .synthesize(&SynthesisRequest {
                text: spoken_text,
                language,
                voice: request.voice.clone(),
                format: request.format,
            })
            .await?;

        // 4. Write
        let audio_size = self.audio_repo.save(&request.output, &synthesis.audio).await?;

        Ok(NarrationResult {
            output: request.output,
            audio_size,
            char_count,
            language,
            translated_to: request.target_language,
            voice: synthesis.voice,
            duration_minutes: char_count as f32 / CHARACTERS_PER_MINUTE,
        })
    }
}

impl NarrationService {
    /// Detect language from text
    fn detect_language(&self, text: &str) -> Option<LanguageCode> {
        let detected = detect_language(&self.language_detector, text);
        if detected.is_none() {
            tracing::warn!("Could not detect language, an explicit voice will be required");
        }
        detected
    }
}
