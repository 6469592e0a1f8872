use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

pub const DEFAULT_AZURE_REGION: &str = "northeurope";
pub const DEFAULT_TRANSLATOR_ENDPOINT: &str = "https://api.cognitive.microsofttranslator.com";

/// Upper bound for attempts against a remote API, first try included
pub const MAX_ATTEMPTS_LIMIT: u32 = 3;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Combined Azure resource key, shared by Translator and Speech
    pub resource_key: Option<String>,
    pub azure_region: String,
    pub translator_endpoint: String,
    /// Falls back to the regional TTS host when unset
    pub speech_endpoint: Option<String>,
    pub speech_provider: SpeechProvider,
    pub aws_region: String,
    pub http_timeout_secs: u64,
    pub retry_max_attempts: u32,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SpeechProvider {
    Azure,
    Polly,
}

impl FromStr for SpeechProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "azure" => Ok(SpeechProvider::Azure),
            "polly" => Ok(SpeechProvider::Polly),
            other => Err(format!("unknown speech provider '{}' (expected azure or polly)", other)),
        }
    }
}

impl std::fmt::Display for SpeechProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpeechProvider::Azure => write!(f, "azure"),
            SpeechProvider::Polly => write!(f, "polly"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Config {
            resource_key: non_empty("RESOURCE_KEY"),
            azure_region: non_empty("AZURE_REGION")
                .unwrap_or_else(|| DEFAULT_AZURE_REGION.to_string()),
            translator_endpoint: non_empty("TRANSLATOR_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_TRANSLATOR_ENDPOINT.to_string()),
            speech_endpoint: non_empty("SPEECH_ENDPOINT"),
            speech_provider: non_empty("SPEECH_PROVIDER")
                .unwrap_or_else(|| "azure".to_string())
                .parse()
                .map_err(AppError::Configuration)?,
            aws_region: non_empty("AWS_REGION").unwrap_or_else(|| "eu-west-1".to_string()),
            http_timeout_secs: non_empty("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|| "60".to_string())
                .parse()
                .map_err(|e| AppError::Configuration(format!("HTTP_TIMEOUT_SECS: {}", e)))?,
            retry_max_attempts: non_empty("RETRY_MAX_ATTEMPTS")
                .unwrap_or_else(|| MAX_ATTEMPTS_LIMIT.to_string())
                .parse::<u32>()
                .map_err(|e| AppError::Configuration(format!("RETRY_MAX_ATTEMPTS: {}", e)))?
                .clamp(1, MAX_ATTEMPTS_LIMIT),
            log_format: match non_empty("LOG_FORMAT")
                .unwrap_or_else(|| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        Ok(config)
    }

    /// The Azure key, or an authentication error naming the missing variable.
    /// Callers check this before any client is built.
    pub fn require_resource_key(&self) -> AppResult<&str> {
        self.resource_key.as_deref().ok_or_else(|| {
            AppError::Authentication(
                "Please set the RESOURCE_KEY environment variable to use the Azure services"
                    .to_string(),
            )
        })
    }

    pub fn speech_endpoint(&self) -> String {
        self.speech_endpoint
            .clone()
            .unwrap_or_else(|| format!("https://{}.tts.speech.microsoft.com", self.azure_region))
    }
}
