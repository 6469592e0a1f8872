use super::language::LanguageCode;
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Voice selection and prosody, loadable from a JSON voice configuration file:
///
/// ```json
/// { "voice": "zh-CN-XiaoxiaoNeural", "style": "narration-relaxed", "rate": "-5%" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VoiceSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
}

impl VoiceSettings {
    pub async fn load(path: &Path) -> AppResult<Self> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::InvalidInput(format!(
                "The voice configuration file {} could not be read: {}",
                path.display(),
                e
            ))
        })?;

        serde_json::from_str(&raw).map_err(|e| {
            AppError::InvalidInput(format!(
                "The voice configuration file {} is not valid: {}",
                path.display(),
                e
            ))
        })
    }

    /// Replace the voice name, keeping the prosody settings
    pub fn with_voice(mut self, voice: Option<String>) -> Self {
        if voice.is_some() {
            self.voice = voice;
        }
        self
    }
}

/// Audio container produced by the synthesizer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
    Ogg,
}

impl AudioFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Ogg => "ogg",
        }
    }

    /// Value for Azure's `X-Microsoft-OutputFormat` header
    pub fn azure_output_format(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "audio-48khz-192kbitrate-mono-mp3",
            AudioFormat::Ogg => "ogg-48khz-16bit-mono-opus",
        }
    }
}

impl FromStr for AudioFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mp3" => Ok(AudioFormat::Mp3),
            "ogg" | "opus" => Ok(AudioFormat::Ogg),
            other => Err(format!("unsupported audio format '{}' (expected mp3 or ogg)", other)),
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Text handed to a speech provider
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub text: String,
    pub language: Option<LanguageCode>,
    pub voice: VoiceSettings,
    pub format: AudioFormat,
}

#[derive(Debug, Clone)]
pub struct SynthesisResponse {
    pub audio: Vec<u8>,
    pub format: AudioFormat,
    /// Voice the provider actually used
    pub voice: String,
}
