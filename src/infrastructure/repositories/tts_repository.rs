use crate::domain::tts::{SynthesisRequest, SynthesisResponse};
use crate::error::AppResult;
use async_trait::async_trait;

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider (Azure Speech, AWS Polly)
///
/// Implementations are responsible for:
/// - Handling provider-specific text length limitations
/// - Splitting text into batches if needed
/// - Merging audio chunks into a single audio stream
/// - Provider-specific voice selection
/// - Mapping provider failures into the `AppError` taxonomy
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize the request text to speech
    ///
    /// Returns merged audio data ready for playback, never empty
    ///
    /// # Errors
    /// `Authentication`, `QuotaExceeded` or `Network` for provider failures,
    /// `InvalidInput` when no voice can be resolved
    async fn synthesize(&self, request: &SynthesisRequest) -> AppResult<SynthesisResponse>;

    /// Short provider name for logs
    fn provider(&self) -> &'static str;
}
