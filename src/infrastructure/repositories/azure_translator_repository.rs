use super::batching::split_into_batches;
use super::translator_repository::TranslatorRepository;
use crate::domain::translation::{Translation, TranslationRequest, TranslationResponse};
use crate::domain::tts::LanguageCode;
use crate::error::{AppError, AppResult};
use crate::infrastructure::http::{ensure_success, RetryPolicy};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Azure Translator accepts 50,000 characters per request; stay well below it
const MAX_BATCH_SIZE: usize = 10_000;

const SERVICE_NAME: &str = "Azure Translator";

#[derive(Serialize)]
struct AzureTextItem<'a> {
    #[serde(rename = "Text")]
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct AzureTranslationItem {
    #[serde(rename = "detectedLanguage")]
    detected_language: Option<AzureDetectedLanguage>,
    translations: Vec<AzureTranslation>,
}

#[derive(Debug, Deserialize)]
struct AzureDetectedLanguage {
    language: String,
}

#[derive(Debug, Deserialize)]
struct AzureTranslation {
    text: String,
    to: String,
}

/// Azure Translator (REST v3) implementation of the translator repository
pub struct AzureTranslatorRepository {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    region: String,
    retry: RetryPolicy,
}

impl AzureTranslatorRepository {
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        region: impl Into<String>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            region: region.into(),
            retry,
        }
    }

    /// Call the translate endpoint for a single text batch
    async fn call_azure(
        &self,
        text: &str,
        source: Option<&str>,
        targets: &[String],
    ) -> AppResult<AzureTranslationItem> {
        let url = format!("{}/translate", self.endpoint.trim_end_matches('/'));
        let trace_id = Uuid::new_v4().to_string();

        let mut query: Vec<(&str, &str)> = vec![("api-version", "3.0")];
        if let Some(source) = source {
            query.push(("from", source));
        }
        for target in targets {
            query.push(("to", target.as_str()));
        }

        tracing::debug!(
            trace_id = %trace_id,
            text_length = text.chars().count(),
            targets = ?targets,
            "Calling Azure Translator"
        );

        let response = self
            .client
            .post(&url)
            .query(&query)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .header("Ocp-Apim-Subscription-Region", &self.region)
            .header("X-ClientTraceId", &trace_id)
            .json(&[AzureTextItem { text }])
            .send()
            .await?;

        let response = ensure_success(SERVICE_NAME, response).await?;

        let items: Vec<AzureTranslationItem> = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("{} returned an unreadable body: {}", SERVICE_NAME, e))
        })?;

        items.into_iter().next().ok_or_else(|| {
            AppError::ExternalService(format!("{} returned no translations", SERVICE_NAME))
        })
    }
}

/// Languages written without spaces between words
fn batch_separator(target: &str) -> &'static str {
    match LanguageCode::from_tag(target) {
        Some(LanguageCode::Chinese) | Some(LanguageCode::Japanese) => "",
        _ => " ",
    }
}

#[async_trait]
impl TranslatorRepository for AzureTranslatorRepository {
    async fn translate(&self, request: &TranslationRequest) -> AppResult<TranslationResponse> {
        let start_time = std::time::Instant::now();
        let source = request.source.as_deref();

        let batches = split_into_batches(&request.text, MAX_BATCH_SIZE);
        tracing::info!(
            batch_count = batches.len(),
            text_length = request.text.chars().count(),
            "Text split into batches"
        );

        let mut parts: Vec<Vec<String>> = vec![Vec::new(); request.targets.len()];
        let mut detected_source = None;

        for (index, batch) in batches.iter().enumerate() {
            let item = self
                .retry
                .execute("azure_translate", || {
                    self.call_azure(batch, source, &request.targets)
                })
                .await?;

            if detected_source.is_none() {
                detected_source = item.detected_language.map(|d| d.language);
            }

            for translation in item.translations {
                if let Some(slot) = request
                    .targets
                    .iter()
                    .position(|t| t.eq_ignore_ascii_case(&translation.to))
                {
                    parts[slot].push(translation.text);
                }
            }

            tracing::info!(batch_index = index, "Batch translated");
        }

        let translations = request
            .targets
            .iter()
            .zip(parts)
            .filter(|(_, texts)| texts.len() == batches.len())
            .map(|(target, texts)| Translation {
                target: target.clone(),
                text: texts.join(batch_separator(target)),
            })
            .collect();

        tracing::info!(
            provider = "azure",
            latency_ms = start_time.elapsed().as_millis() as u64,
            batch_count = batches.len(),
            "Translation completed"
        );

        Ok(TranslationResponse {
            detected_source,
            translations,
        })
    }
}
