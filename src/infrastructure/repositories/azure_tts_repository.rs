use super::batching::split_into_batches;
use super::tts_repository::TtsRepository;
use crate::domain::tts::{AudioFormat, LanguageCode, SynthesisRequest, SynthesisResponse, VoiceSettings};
use crate::error::{AppError, AppResult};
use crate::infrastructure::http::{ensure_success, RetryPolicy};
use async_trait::async_trait;
use html_escape::{encode_double_quoted_attribute, encode_text};
use reqwest::header::CONTENT_TYPE;

/// Characters per real-time request, Azure caps one response at 10 minutes of audio
const MAX_BATCH_SIZE: usize = 5000;

const SERVICE_NAME: &str = "Azure Speech";

/// Azure Speech (real-time REST) implementation of TTS repository
pub struct AzureTtsRepository {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    retry: RetryPolicy,
}

impl AzureTtsRepository {
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            retry,
        }
    }

    /// Explicit voice first, then the language default
    fn resolve_voice(request: &SynthesisRequest) -> AppResult<String> {
        if let Some(voice) = request.voice.voice.as_deref().filter(|v| !v.trim().is_empty()) {
            return Ok(voice.trim().to_string());
        }

        request
            .language
            .map(|language| language.azure_voice().to_string())
            .ok_or_else(|| {
                AppError::InvalidInput(
                    "No default voice for the text language, pass --voice".to_string(),
                )
            })
    }

    /// Call Azure Speech to synthesize a single text batch
    async fn call_azure(&self, ssml: &str, format: AudioFormat) -> AppResult<Vec<u8>> {
        let url = format!("{}/cognitiveservices/v1", self.endpoint.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .header(CONTENT_TYPE, "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", format.azure_output_format())
            .body(ssml.to_string())
            .send()
            .await?;

        let response = ensure_success(SERVICE_NAME, response).await?;
        let audio = response.bytes().await?;

        tracing::debug!(audio_size = audio.len(), "Azure Speech audio received");

        Ok(audio.to_vec())
    }

    /// Synthesize multiple text batches and merge the audio results in order
    async fn synthesize_batches(
        &self,
        batches: &[String],
        voice: &str,
        settings: &VoiceSettings,
        fallback_language: Option<LanguageCode>,
        format: AudioFormat,
    ) -> AppResult<Vec<u8>> {
        let mut merged_audio = Vec::new();

        for (index, batch) in batches.iter().enumerate() {
            tracing::info!(
                batch_index = index,
                batch_size = batch.chars().count(),
                "Synthesizing batch"
            );

            let ssml = build_ssml(batch, voice, settings, fallback_language);
            let audio_data = self
                .retry
                .execute("azure_synthesize", || self.call_azure(&ssml, format))
                .await?;
            merged_audio.extend(audio_data);

            tracing::info!(
                batch_index = index,
                total_audio_size = merged_audio.len(),
                "Batch synthesized and merged"
            );
        }

        Ok(merged_audio)
    }
}

/// Locale prefix of an Azure voice name (`zh-CN-XiaoxiaoNeural` -> `zh-CN`)
fn voice_locale(voice: &str) -> Option<String> {
    let mut parts = voice.splitn(3, '-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(lang), Some(region), Some(_)) if !lang.is_empty() && !region.is_empty() => {
            Some(format!("{}-{}", lang, region))
        }
        _ => None,
    }
}

/// Wrap text in SSML for the chosen voice and prosody
pub fn build_ssml(
    text: &str,
    voice: &str,
    settings: &VoiceSettings,
    fallback_language: Option<LanguageCode>,
) -> String {
    let locale = voice_locale(voice)
        .or_else(|| {
            fallback_language
                .and_then(|language| voice_locale(language.azure_voice()))
        })
        .unwrap_or_else(|| "en-US".to_string());

    let mut inner = encode_text(text).into_owned();

    let prosody: Vec<String> = [
        ("rate", &settings.rate),
        ("pitch", &settings.pitch),
        ("volume", &settings.volume),
    ]
    .iter()
    .filter_map(|(name, value)| {
        value
            .as_deref()
            .map(|v| format!(r#"{}="{}""#, name, encode_double_quoted_attribute(v)))
    })
    .collect();

    if !prosody.is_empty() {
        inner = format!("<prosody {}>{}</prosody>", prosody.join(" "), inner);
    }

    if let Some(style) = &settings.style {
        inner = format!(
            r#"<mstts:express-as style="{}">{}</mstts:express-as>"#,
            encode_double_quoted_attribute(style),
            inner
        );
    }

    format!(
        r#"<speak version="1.0" xmlns="http://www.w3.org/2001/10/synthesis" xmlns:mstts="https://www.w3.org/2001/mstts" xml:lang="{}"><voice name="{}">{}</voice></speak>"#,
        locale,
        encode_double_quoted_attribute(voice),
        inner
    )
}

#[async_trait]
impl TtsRepository for AzureTtsRepository {
    async fn synthesize(&self, request: &SynthesisRequest) -> AppResult<SynthesisResponse> {
        let start_time = std::time::Instant::now();
        let voice = Self::resolve_voice(request)?;

        tracing::info!(
            language = ?request.language,
            voice = %voice,
            format = %request.format,
            text_length = request.text.chars().count(),
            "Starting Azure Speech synthesis"
        );

        // Split text into batches based on Azure's limitations
        let batches = split_into_batches(&request.text, MAX_BATCH_SIZE);
        tracing::info!(
            batch_count = batches.len(),
            text_length = request.text.chars().count(),
            "Text split into batches"
        );

        let audio_data = self
            .synthesize_batches(
                &batches,
                &voice,
                &request.voice,
                request.language,
                request.format,
            )
            .await?;

        if audio_data.is_empty() {
            return Err(AppError::ExternalService(format!(
                "{} returned no audio",
                SERVICE_NAME
            )));
        }

        let duration = start_time.elapsed();
        let characters_count = request.text.chars().count();
        let throughput_chars_per_sec = if duration.as_secs_f64() > 0.0 {
            characters_count as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        tracing::info!(
            provider = "azure",
            voice = %voice,
            latency_ms = duration.as_millis() as u64,
            characters_count = characters_count,
            batch_count = batches.len(),
            audio_size_bytes = audio_data.len(),
            throughput_chars_per_sec = format!("{:.2}", throughput_chars_per_sec),
            "TTS synthesis completed"
        );

        Ok(SynthesisResponse {
            audio: audio_data,
            format: request.format,
            voice,
        })
    }

    fn provider(&self) -> &'static str {
        "azure"
    }
}
