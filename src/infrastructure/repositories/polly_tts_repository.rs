use super::batching::split_into_batches;
use super::tts_repository::TtsRepository;
use crate::domain::tts::language::is_voice_neural_compatible;
use crate::domain::tts::{AudioFormat, SynthesisRequest, SynthesisResponse};
use crate::error::{AppError, AppResult};
use crate::infrastructure::http::RetryPolicy;
use async_trait::async_trait;
use aws_sdk_polly::{
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    types::{Engine, OutputFormat, VoiceId},
    Client as PollyClient,
};
use std::sync::Arc;

/// AWS Polly has a limit of 3000 characters per request
const MAX_BATCH_SIZE: usize = 3000;

/// AWS Polly implementation of TTS repository
pub struct PollyTtsRepository {
    polly_client: Arc<PollyClient>,
    retry: RetryPolicy,
}

impl PollyTtsRepository {
    pub fn new(polly_client: Arc<PollyClient>, retry: RetryPolicy) -> Self {
        Self {
            polly_client,
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
            .map(|language| language.polly_voice().to_string())
            .ok_or_else(|| {
                AppError::InvalidInput(
                    "No default Polly voice for the text language, pass --voice".to_string(),
                )
            })
    }

    /// Call AWS Polly to synthesize a single text batch
    async fn call_polly(
        &self,
        text: &str,
        voice_name: &str,
        format: AudioFormat,
    ) -> AppResult<Vec<u8>> {
        let voice_id = VoiceId::from(voice_name);
        let engine = if is_voice_neural_compatible(voice_name) {
            Engine::Neural
        } else {
            Engine::Standard
        };
        let output_format = match format {
            AudioFormat::Mp3 => OutputFormat::Mp3,
            AudioFormat::Ogg => OutputFormat::OggVorbis,
        };

        tracing::debug!(
            voice = voice_name,
            engine = ?engine,
            output_format = ?output_format,
            text_length = text.chars().count(),
            "Calling AWS Polly synthesize_speech"
        );

        let result = self
            .polly_client
            .synthesize_speech()
            .text(text)
            .voice_id(voice_id)
            .output_format(output_format)
            .engine(engine.clone())
            .send()
            .await
            .map_err(|e| {
                let err = classify_sdk_error(&e);
                tracing::error!(
                    error = %DisplayErrorContext(&e),
                    error_kind = err.kind(),
                    voice = voice_name,
                    engine = ?engine,
                    text_length = text.len(),
                    "AWS Polly synthesize_speech failed"
                );
                err
            })?;

        let audio_stream = result.audio_stream.collect().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to collect audio stream from Polly response");
            AppError::Network(format!("Failed to read Polly audio stream: {}", e))
        })?;

        Ok(audio_stream.into_bytes().to_vec())
    }
}

/// Map an SDK failure into the error taxonomy
pub fn classify_sdk_error<E, R>(err: &SdkError<E, R>) -> AppError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match err {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) => {
            AppError::Network(format!("AWS Polly unreachable: {}", DisplayErrorContext(err)))
        }
        SdkError::ServiceError(context) => {
            let service_err = context.err();
            classify_service_code(service_err.code(), service_err.message().unwrap_or_default())
        }
        _ => AppError::ExternalService(format!("AWS Polly error: {}", DisplayErrorContext(err))),
    }
}

/// Map a Polly/AWS error code into the error taxonomy
pub fn classify_service_code(code: Option<&str>, message: &str) -> AppError {
    let code_str = code.unwrap_or("Unknown");
    let detail = format!("AWS Polly {}: {}", code_str, message);

    match code_str {
        "ThrottlingException" | "Throttling" | "ServiceQuotaExceededException"
        | "LimitExceededException" => AppError::QuotaExceeded(detail),
        "UnrecognizedClientException"
        | "InvalidSignatureException"
        | "AccessDeniedException"
        | "ExpiredTokenException"
        | "InvalidClientTokenId"
        | "MissingAuthenticationToken" => AppError::Authentication(detail),
        "ServiceFailureException" | "ServiceUnavailable" | "InternalFailure" => {
            AppError::Network(detail)
        }
        "TextLengthExceededException"
        | "InvalidSsmlException"
        | "LanguageNotSupportedException"
        | "EngineNotSupportedException"
        | "ValidationException" => AppError::InvalidInput(detail),
        _ => AppError::ExternalService(detail),
    }
}

#[async_trait]
impl TtsRepository for PollyTtsRepository {
    async fn synthesize(&self, request: &SynthesisRequest) -> AppResult<SynthesisResponse> {
        let start_time = std::time::Instant::now();
        let voice = Self::resolve_voice(request)?;

        if request.voice.style.is_some()
            || request.voice.rate.is_some()
            || request.voice.pitch.is_some()
            || request.voice.volume.is_some()
        {
            tracing::warn!("Polly provider ignores style and prosody settings");
        }

        // Split text into batches based on Polly's limitations
        let batches = split_into_batches(&request.text, MAX_BATCH_SIZE);
        tracing::info!(
            batch_count = batches.len(),
            text_length = request.text.chars().count(),
            "Text split into batches"
        );

        // Synthesize each batch and merge results in order
        let mut audio_data = Vec::new();
        for (index, batch) in batches.iter().enumerate() {
            tracing::info!(
                batch_index = index,
                batch_size = batch.chars().count(),
                "Synthesizing batch"
            );

            let chunk = self
                .retry
                .execute("polly_synthesize", || {
                    self.call_polly(batch, &voice, request.format)
                })
                .await?;
            audio_data.extend(chunk);
        }

        if audio_data.is_empty() {
            return Err(AppError::ExternalService(
                "AWS Polly returned no audio".to_string(),
            ));
        }

        let duration = start_time.elapsed();
        let characters_count = request.text.chars().count();
        let throughput_chars_per_sec = if duration.as_secs_f64() > 0.0 {
            characters_count as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        tracing::info!(
            provider = "polly",
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
        "polly"
    }
}
