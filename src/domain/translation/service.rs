use super::dto::{TranslationRequest, TranslationResponse};
use crate::error::{AppError, AppResult};
use crate::infrastructure::repositories::TranslatorRepository;
use async_trait::async_trait;
use std::sync::Arc;

pub struct TranslationService {
    translator: Arc<dyn TranslatorRepository>,
}

impl TranslationService {
    pub fn new(translator: Arc<dyn TranslatorRepository>) -> Self {
        Self { translator }
    }
}

#[async_trait]
pub trait TranslationServiceApi: Send + Sync {
    /// Translate text into every requested target language
    ///
    /// Targets are de-duplicated (case-insensitive) keeping first occurrence.
    /// The response carries exactly one translation per remaining target.
    async fn translate(
        &self,
        text: &str,
        source: Option<&str>,
        targets: &[String],
    ) -> AppResult<TranslationResponse>;
}

#[async_trait]
impl TranslationServiceApi for TranslationService {
    async fn translate(
        &self,
        text: &str,
        source: Option<&str>,
        targets: &[String],
    ) -> AppResult<TranslationResponse> {
        if text.trim().is_empty() {
            return Err(AppError::InvalidInput("Text cannot be empty".to_string()));
        }

        let mut unique_targets: Vec<String> = Vec::new();
        for target in targets.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
            if !unique_targets.iter().any(|t| t.eq_ignore_ascii_case(target)) {
                unique_targets.push(target.to_string());
            }
        }

        if unique_targets.is_empty() {
            return Err(AppError::InvalidInput(
                "At least one target language is required".to_string(),
            ));
        }

        tracing::info!(
            source = source.unwrap_or("auto"),
            targets = ?unique_targets,
            text_length = text.chars().count(),
            "Translation request"
        );

        let request = TranslationRequest {
            text: text.to_string(),
            source: source.map(str::to_string),
            targets: unique_targets.clone(),
        };

        let response = self.translator.translate(&request).await?;

        // Every requested target must come back, otherwise the audio would silently miss a language
        for target in &unique_targets {
            if response.text_for(target).is_none() {
                return Err(AppError::ExternalService(format!(
                    "Translator returned no translation for '{}'",
                    target
                )));
            }
        }

        if let Some(detected) = &response.detected_source {
            tracing::info!(detected_source = %detected, "Source language detected by translator");
        }

        Ok(response)
    }
}
