use lingua::{Language, LanguageDetector, LanguageDetectorBuilder};
use serde::{Deserialize, Serialize};

/// ISO 639-1 language codes we have default voices for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageCode {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "it")]
    Italian,
    #[serde(rename = "pt")]
    Portuguese,
    #[serde(rename = "zh")]
    Chinese,
    #[serde(rename = "ja")]
    Japanese,
}

const SUPPORTED_LANGUAGES: [Language; 8] = [
    Language::English,
    Language::Spanish,
    Language::French,
    Language::German,
    Language::Italian,
    Language::Portuguese,
    Language::Chinese,
    Language::Japanese,
];

impl LanguageCode {
    /// Get the ISO 639-1 code as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageCode::English => "en",
            LanguageCode::Spanish => "es",
            LanguageCode::French => "fr",
            LanguageCode::German => "de",
            LanguageCode::Italian => "it",
            LanguageCode::Portuguese => "pt",
            LanguageCode::Chinese => "zh",
            LanguageCode::Japanese => "ja",
        }
    }

    /// Parse a BCP-47 tag by its primary subtag (`zh-Hans` -> Chinese, `pt-BR` -> Portuguese)
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.split(['-', '_']).next()?.trim().to_lowercase();
        match primary.as_str() {
            "en" => Some(LanguageCode::English),
            "es" => Some(LanguageCode::Spanish),
            "fr" => Some(LanguageCode::French),
            "de" => Some(LanguageCode::German),
            "it" => Some(LanguageCode::Italian),
            "pt" => Some(LanguageCode::Portuguese),
            "zh" => Some(LanguageCode::Chinese),
            "ja" => Some(LanguageCode::Japanese),
            _ => None,
        }
    }

    /// Convert lingua Language to LanguageCode
    #[allow(unreachable_patterns)]
    pub fn from_lingua(language: Language) -> Option<Self> {
        match language {
            Language::English => Some(LanguageCode::English),
            Language::Spanish => Some(LanguageCode::Spanish),
            Language::French => Some(LanguageCode::French),
            Language::German => Some(LanguageCode::German),
            Language::Italian => Some(LanguageCode::Italian),
            Language::Portuguese => Some(LanguageCode::Portuguese),
            Language::Chinese => Some(LanguageCode::Chinese),
            Language::Japanese => Some(LanguageCode::Japanese),
            _ => None,
        }
    }

    /// Default Azure neural voice for the language
    pub fn azure_voice(&self) -> &'static str {
        match self {
            LanguageCode::English => "en-US-JennyNeural",
            LanguageCode::Spanish => "es-ES-ElviraNeural",
            LanguageCode::French => "fr-FR-DeniseNeural",
            LanguageCode::German => "de-DE-KatjaNeural",
            LanguageCode::Italian => "it-IT-ElsaNeural",
            LanguageCode::Portuguese => "pt-BR-FranciscaNeural",
            LanguageCode::Chinese => "zh-CN-XiaoxiaoNeural",
            LanguageCode::Japanese => "ja-JP-NanamiNeural",
        }
    }

    /// Default Polly voice ID for the language
    pub fn polly_voice(&self) -> &'static str {
        match self {
            LanguageCode::English => "Joanna",
            LanguageCode::Spanish => "Lupe",
            LanguageCode::French => "Lea",
            LanguageCode::German => "Vicki",
            LanguageCode::Italian => "Bianca",
            LanguageCode::Portuguese => "Ines",
            LanguageCode::Chinese => "Zhiyu",
            LanguageCode::Japanese => "Kazuha",
        }
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Build a detector restricted to the languages we can voice
pub fn build_detector() -> LanguageDetector {
    LanguageDetectorBuilder::from_languages(&SUPPORTED_LANGUAGES).build()
}

/// Detect the language of the given text, `None` when lingua is unsure
pub fn detect_language(detector: &LanguageDetector, text: &str) -> Option<LanguageCode> {
    detector
        .detect_language_of(text)
        .and_then(LanguageCode::from_lingua)
}

/// Check if a Polly voice supports the neural engine
pub fn is_voice_neural_compatible(voice: &str) -> bool {
    // Based on AWS Polly documentation
    const NEURAL_VOICES: &[&str] = &[
        // English
        "Joanna", "Matthew", "Ivy", "Kendra", "Kimberly", "Salli", "Joey", "Justin", "Kevin",
        // Spanish
        "Lupe", "Pedro", "Sergio", // French
        "Lea", "Remi", // German
        "Vicki", "Daniel", // Italian
        "Bianca", "Adriano", // Portuguese
        "Ines", "Camila", "Vitoria", "Thiago", // Japanese
        "Takumi", "Kazuha", "Tomoko",  // Korean
        "Seoyeon", // Mandarin Chinese
        "Zhiyu",   // Arabic
        "Hala", "Zayd",
    ];

    NEURAL_VOICES.contains(&voice)
}
